mod cache;
mod descriptor;
mod element;
mod parse;

use std::sync::Arc;

pub use cache::{DEFAULT_CACHE_CAPACITY, FormatCache, global as global_cache};
pub use descriptor::{Field, Format, IntoFormat};
pub use element::ElementType;
pub use parse::normalize;

use crate::error::FormatError;

/// Parses a format string such as `"(3f)[vertex](4B)[color]"`.
///
/// Results are cached by their whitespace-stripped form, so calling this
/// repeatedly with the same format is cheap.
pub fn parse_format(spec: &str) -> Result<Arc<Format>, FormatError> {
    Format::parse(spec)
}
