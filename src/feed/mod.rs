//! Feed pipeline pieces: transport, shape validation, record model, formatting.

pub mod format;
pub mod glyph;
pub mod load;
pub mod record;
pub mod source;
