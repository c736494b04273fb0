//! Minimal document model: a tree of elements addressable by id.
//!
//! Only what the renderer needs is modelled. Text is set wholesale (which
//! drops children, like assigning `textContent`), children are appended in
//! order, and the tree serializes to HTML or to plain terminal lines.

use std::fmt::Write as _;

use crate::view::ViewIds;

/// One node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    id: Option<String>,
    class: Option<String>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            class: None,
            text: String::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Replace all content with `text`.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children.clear();
        self.text = text.into();
    }

    /// Remove all content.
    pub fn clear(&mut self) {
        self.children.clear();
        self.text.clear();
    }

    pub fn append(&mut self, child: Self) {
        self.children.push(child);
    }

    /// Concatenated text of this element and its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = self.text.clone();
        for child in &self.children {
            out.push_str(&child.text_content());
        }
        out
    }

    fn is_block_container(&self) -> bool {
        self.text.is_empty() && !self.children.is_empty()
    }

    fn find(&self, id: &str) -> Option<&Self> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Self> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if let Some(id) = &self.id {
            let _ = write!(out, " id=\"{}\"", escape_html(id));
        }
        if let Some(class) = &self.class {
            let _ = write!(out, " class=\"{}\"", escape_html(class));
        }
        out.push('>');
        out.push_str(&escape_html(&self.text));
        let block = self.is_block_container();
        for child in &self.children {
            if block {
                out.push('\n');
            }
            child.write_html(out);
        }
        if block {
            out.push('\n');
        }
        let _ = write!(out, "</{}>", self.tag);
    }

    fn collect_lines(&self, lines: &mut Vec<String>) {
        if self.is_block_container() {
            for child in &self.children {
                child.collect_lines(lines);
            }
        } else {
            let text = self.text_content();
            if !text.is_empty() {
                lines.push(text);
            }
        }
    }
}

/// A host page: a title plus the body's top-level elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    title: String,
    body: Vec<Element>,
}

impl Document {
    /// Empty document with no elements.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: Vec::new(),
        }
    }

    /// The standard event page: heading, last-updated status line, container.
    #[must_use]
    pub fn page(title: &str, ids: &ViewIds) -> Self {
        Self::new(title)
            .with_element(Element::new("h1").with_text(title))
            .with_element(
                Element::new("p").with_class("status").with_text("Last updated: ").with_child(
                    Element::new("span")
                        .with_id(&ids.status)
                        .with_text(crate::feed::format::LAST_UPDATED_FALLBACK),
                ),
            )
            .with_element(Element::new("div").with_id(&ids.container))
    }

    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
        self.body.push(element);
        self
    }

    /// Element with the given id, searched depth-first.
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.body.iter().find_map(|element| element.find(id))
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.body.iter_mut().find_map(|element| element.find_mut(id))
    }

    /// Text of the element with `id`, if present.
    pub fn text_of(&self, id: &str) -> Option<String> {
        self.element(id).map(Element::text_content)
    }

    /// Serialize as a standalone HTML5 page.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        out.push_str("<meta charset=\"utf-8\">\n");
        let _ = writeln!(out, "<title>{}</title>", escape_html(&self.title));
        out.push_str("</head>\n<body>\n");
        for element in &self.body {
            element.write_html(&mut out);
            out.push('\n');
        }
        out.push_str("</body>\n</html>\n");
        out
    }

    /// Plain text, one line per line-level element.
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for element in &self.body {
            element.collect_lines(&mut lines);
        }
        lines
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
