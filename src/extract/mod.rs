//! Advisory extraction from list and detail pages.
//!
//! - [`AnchorTableExtractor`]: table rows with a marker anchor per advisory
//! - [`UnorderedListExtractor`]: `<ul>` items with `<volcano> - <date> utc`
//! - [`GraphicsTableExtractor`]: table rows with advisory and graphic links
//! - [`PlainTextExtractor`]: a single plain-text advisory
//! - [`MessageExtractor`]: the advisory text block of a detail page
//!
//! Each extractor keeps its state in a machine that is created fresh for
//! every page, so extracting the same page twice gives the same result.

mod anchor_table;
mod graphics_table;
mod message;
mod plain_text;
mod unordered_list;

pub use anchor_table::{AnchorTableExtractor, AnchorTableState, RowAnchor};
pub use graphics_table::{GraphicsTableExtractor, GraphicsTableState, TableCell};
pub use message::{MessageExtractor, MessageState, extract_message};
pub use plain_text::PlainTextExtractor;
pub use unordered_list::{UnorderedListExtractor, UnorderedListState};

use crate::models::{AdvisoryListEntry, ListFormat};

/// Produces the advisories listed on a source's index page.
pub trait ListExtractor: Send + Sync {
    /// Entries in document order.
    fn extract(&self, page: &[u8]) -> Vec<AdvisoryListEntry>;
}

/// Select the extractor for a list page layout.
pub fn extractor_for(format: &ListFormat) -> Box<dyn ListExtractor> {
    match format {
        ListFormat::AnchorTable { marker, directory } => {
            Box::new(AnchorTableExtractor::new(marker.clone(), directory.clone()))
        }
        ListFormat::UnorderedList => Box::new(UnorderedListExtractor),
        ListFormat::GraphicsTable { columns } => Box::new(GraphicsTableExtractor::new(*columns)),
        ListFormat::PlainText => Box::new(PlainTextExtractor),
    }
}
