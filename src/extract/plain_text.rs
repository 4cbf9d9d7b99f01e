//! Plain-text advisory pages.
//!
//! The page is itself one advisory; its `DTG:` and `VOLCANO:` lines
//! identify it.

use crate::models::AdvisoryListEntry;
use crate::scan::decode;

use super::ListExtractor;

const UNKNOWN_VOLCANO: &str = "Unknown";

/// Extractor for pages holding a single plain-text advisory.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl ListExtractor for PlainTextExtractor {
    fn extract(&self, page: &[u8]) -> Vec<AdvisoryListEntry> {
        let decoded = decode(page);
        let mut observed_at = None;
        let mut volcano = None;

        for line in decoded.text.lines().map(str::trim) {
            if let Some(rest) = line.strip_prefix("DTG:") {
                observed_at = Some(rest.trim().to_string());
            } else if let Some(rest) = line.strip_prefix("VOLCANO:") {
                volcano = Some(rest.trim().to_string());
            }
        }

        // Without a DTG there is nothing to name the advisory after.
        let Some(observed_at) = observed_at else {
            return Vec::new();
        };

        vec![AdvisoryListEntry {
            link: String::new(),
            volcano: volcano
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| UNKNOWN_VOLCANO.to_string()),
            observed_at,
            graphic: None,
            extra_row: Vec::new(),
        }]
    }
}
