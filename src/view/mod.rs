//! Document view the renderer writes into.

pub mod document;

pub use document::{Document, Element};

/// Default id of the element hosting event lines.
pub const DEFAULT_CONTAINER_ID: &str = "event-container";
/// Default id of the optional last-updated status element.
pub const DEFAULT_STATUS_ID: &str = "last-updated";

/// Ids of the elements the renderer addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewIds {
    /// Required: receives event lines or the placeholder/failure message.
    pub container: String,
    /// Optional: receives the last-updated value when the document has it.
    pub status: String,
}

impl Default for ViewIds {
    fn default() -> Self {
        Self {
            container: DEFAULT_CONTAINER_ID.to_string(),
            status: DEFAULT_STATUS_ID.to_string(),
        }
    }
}
