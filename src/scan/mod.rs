//! Tag-stream scanning for advisory pages.
//!
//! Every extractor works on the same flat sequence of [`TagEvent`]s, so none
//! of them depends on how the markup was tokenized.

mod decode;
mod stream;

pub use decode::{Decoded, decode};
pub use stream::{TagEvent, TagStream};
