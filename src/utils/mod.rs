//! Shared text utilities.
//!
//! - `html`: HTML to plain text conversion and whitespace helpers

mod html;

pub use html::{collapse_whitespace, strip_html, truncate_chars};
