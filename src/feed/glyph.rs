//! Confidence glyph: a fixed five-segment solid/hollow indicator.

use serde::{Deserialize, Serialize};

/// Number of segments in every glyph.
pub const GLYPH_WIDTH: usize = 5;

/// Character set used to draw the glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlyphStyle {
    /// Small squares: ▪ filled, ▫ hollow.
    #[default]
    Small,
    /// Full-size squares: ■ filled, □ hollow.
    Block,
}

impl GlyphStyle {
    #[must_use]
    pub const fn filled(self) -> char {
        match self {
            Self::Small => '▪',
            Self::Block => '■',
        }
    }

    #[must_use]
    pub const fn hollow(self) -> char {
        match self {
            Self::Small => '▫',
            Self::Block => '□',
        }
    }

    /// Config/CLI label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Block => "block",
        }
    }

    /// Parse a config/CLI label, case-insensitively.
    #[must_use]
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "small" => Some(Self::Small),
            "block" => Some(Self::Block),
            _ => None,
        }
    }
}

/// Number of filled segments for `confidence`, before saturation.
///
/// Rounds half up, so 0.5 (2.5 segments) fills three. The result may lie
/// outside `0..=5` for out-of-range confidences.
#[must_use]
pub fn filled_segments(confidence: f64) -> f64 {
    (confidence * 5.0).round()
}

/// Encode `confidence` as exactly [`GLYPH_WIDTH`] characters.
///
/// Values are not clamped: anything at or above 0.9 fills every segment and
/// anything below 0.1 fills none.
#[must_use]
pub fn confidence_glyph(confidence: f64, style: GlyphStyle) -> String {
    let filled = filled_segments(confidence);
    let mut glyph = String::with_capacity(GLYPH_WIDTH * 3);
    let mut position = 0.0_f64;
    for _ in 0..GLYPH_WIDTH {
        glyph.push(if position < filled {
            style.filled()
        } else {
            style.hollow()
        });
        position += 1.0;
    }
    glyph
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_all_hollow() {
        assert_eq!(confidence_glyph(0.0, GlyphStyle::Small), "▫▫▫▫▫");
    }

    #[test]
    fn one_is_all_filled() {
        assert_eq!(confidence_glyph(1.0, GlyphStyle::Small), "▪▪▪▪▪");
    }

    #[test]
    fn half_rounds_up() {
        assert_eq!(confidence_glyph(0.5, GlyphStyle::Small), "▪▪▪▫▫");
        assert_eq!(confidence_glyph(0.1, GlyphStyle::Small), "▪▫▫▫▫");
    }

    #[test]
    fn just_below_half_segment_rounds_down() {
        let confidence = 9.999_999_999_999_999e-2_f64;
        assert!(confidence * 5.0 < 0.5);
        assert_eq!(filled_segments(confidence), 0.0);
        assert_eq!(confidence_glyph(confidence, GlyphStyle::Small), "▫▫▫▫▫");
    }

    #[test]
    fn intermediate_values() {
        assert_eq!(confidence_glyph(0.6, GlyphStyle::Small), "▪▪▪▫▫");
        assert_eq!(confidence_glyph(0.85, GlyphStyle::Small), "▪▪▪▪▫");
        assert_eq!(confidence_glyph(0.09, GlyphStyle::Small), "▫▫▫▫▫");
    }

    #[test]
    fn out_of_range_saturates() {
        assert_eq!(confidence_glyph(3.7, GlyphStyle::Small), "▪▪▪▪▪");
        assert_eq!(confidence_glyph(-0.4, GlyphStyle::Small), "▫▫▫▫▫");
        assert_eq!(confidence_glyph(f64::INFINITY, GlyphStyle::Small), "▪▪▪▪▪");
    }

    #[test]
    fn block_style_uses_full_squares() {
        assert_eq!(confidence_glyph(0.4, GlyphStyle::Block), "■■□□□");
    }

    #[test]
    fn style_labels_round_trip() {
        for style in [GlyphStyle::Small, GlyphStyle::Block] {
            assert_eq!(GlyphStyle::from_label(style.label()), Some(style));
        }
        assert_eq!(GlyphStyle::from_label(" BLOCK "), Some(GlyphStyle::Block));
        assert_eq!(GlyphStyle::from_label("round"), None);
    }
}
