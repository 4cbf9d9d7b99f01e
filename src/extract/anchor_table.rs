// src/extract/anchor_table.rs

//! Table layout where each row carries a timestamp, a volcano and links.
//!
//! Rows look like:
//!
//! ```text
//! <tr><td>2020-05-01 12:00:00</td><td>Shishaldin</td><td><a href="VAA/x.html">X</a></td></tr>
//! ```
//!
//! Only anchors whose text equals the marker and whose href sits in the
//! expected directory are advisories; the other links on the row are
//! decorative.
//!
//! Each anchor is captured when it closes, together with the cells the row
//! has accumulated so far. Captured anchors are released once the row ends,
//! either at its closing tag or at the start of the next row; a row cut off
//! by the end of the page is discarded. Anchors outside any row are ignored.

use std::mem;

use crate::models::AdvisoryListEntry;
use crate::scan::{TagEvent, TagStream};
use crate::utils::url::second_to_last_segment;

use super::ListExtractor;

/// Anchor captured at its closing tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAnchor {
    pub href: String,
    /// Display text of the anchor
    pub text: String,
    /// Cell texts of the row before the anchor closed
    pub cells: Vec<String>,
}

/// Row being accumulated.
#[derive(Debug, Default)]
struct Row {
    cells: Vec<String>,
    anchors: Vec<RowAnchor>,
}

/// Parsing state for [`AnchorTableExtractor`].
#[derive(Debug, Default)]
pub struct AnchorTableState {
    href: String,
    cell_text: String,
    row: Option<Row>,
}

impl AnchorTableState {
    /// Advance on one event, returning the anchors of a row that just ended.
    ///
    /// Anchors are returned unfiltered.
    pub fn step(&mut self, event: &TagEvent) -> Vec<RowAnchor> {
        match event {
            TagEvent::StartTag { name, .. } => match name.as_str() {
                "a" => self.href = event.attr("href").unwrap_or_default().to_string(),
                "tr" | "li" => {
                    let ended = self.close_row();
                    self.row = Some(Row::default());
                    self.cell_text.clear();
                    return ended;
                }
                _ => {}
            },
            TagEvent::Text { content } => self.cell_text.push_str(content.trim()),
            TagEvent::EndTag { name } => match name.as_str() {
                "a" => {
                    if let Some(row) = self.row.as_mut() {
                        row.anchors.push(RowAnchor {
                            href: mem::take(&mut self.href),
                            text: self.cell_text.clone(),
                            cells: row.cells.clone(),
                        });
                    }
                }
                "td" => self.close_cell(),
                "li" => {
                    self.close_cell();
                    return self.close_row();
                }
                "tr" => return self.close_row(),
                _ => {}
            },
        }
        Vec::new()
    }

    fn close_cell(&mut self) {
        let text = mem::take(&mut self.cell_text);
        if let Some(row) = self.row.as_mut() {
            row.cells.push(text);
        }
    }

    fn close_row(&mut self) -> Vec<RowAnchor> {
        self.row.take().map(|row| row.anchors).unwrap_or_default()
    }
}

/// Extractor for anchor/table list pages.
#[derive(Debug, Clone)]
pub struct AnchorTableExtractor {
    marker: String,
    directory: String,
}

impl AnchorTableExtractor {
    pub fn new(marker: impl Into<String>, directory: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            directory: directory.into(),
        }
    }

    fn is_advisory_link(&self, href: &str, text: &str) -> bool {
        text == self.marker && second_to_last_segment(href) == Some(self.directory.as_str())
    }
}

impl ListExtractor for AnchorTableExtractor {
    fn extract(&self, page: &[u8]) -> Vec<AdvisoryListEntry> {
        let mut state = AnchorTableState::default();
        let mut entries = Vec::new();

        for event in TagStream::from_bytes(page) {
            for anchor in state.step(&event) {
                if !self.is_advisory_link(&anchor.href, &anchor.text) {
                    continue;
                }
                let [observed_at, volcano, ..] = anchor.cells.as_slice() else {
                    log::debug!(
                        "Skipping advisory link {}: {} cells before it",
                        anchor.href,
                        anchor.cells.len()
                    );
                    continue;
                };
                entries.push(AdvisoryListEntry {
                    volcano: volcano.replace('_', " "),
                    observed_at: observed_at.clone(),
                    graphic: None,
                    extra_row: anchor.cells.clone(),
                    link: anchor.href,
                });
            }
        }

        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_PAGE: &str = r#"
        <html><body>
        <table>
          <tr><th>Date</th><th>Volcano</th><th>VAA</th><th>Graphic</th></tr>
          <tr>
            <td>2020-05-01 12:00:00</td>
            <td>Great_Sitkin</td>
            <td><a href="/products/VAA/adv_20200501.html">X</a></td>
            <td><a href="/products/VAG/adv_20200501.png">X</a></td>
          </tr>
          <tr>
            <td>2020-04-30 06:00:00</td>
            <td>Shishaldin</td>
            <td><a href="/products/VAA/adv_20200430.html">X</a></td>
            <td><a href="/products/VAA/adv_20200430.html">details</a></td>
          </tr>
        </table>
        </body></html>
    "#;

    fn extractor() -> AnchorTableExtractor {
        AnchorTableExtractor::new("X", "VAA")
    }

    #[test]
    fn test_extracts_marker_links_in_order() {
        let entries = extractor().extract(LIST_PAGE.as_bytes());

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].link, "/products/VAA/adv_20200501.html");
        assert_eq!(entries[0].observed_at, "2020-05-01 12:00:00");
        assert_eq!(entries[0].volcano, "Great Sitkin");
        assert_eq!(entries[1].link, "/products/VAA/adv_20200430.html");
        assert_eq!(entries[1].volcano, "Shishaldin");
    }

    #[test]
    fn test_cells_before_anchor_are_kept() {
        let entries = extractor().extract(LIST_PAGE.as_bytes());
        assert_eq!(entries[0].extra_row, vec!["2020-05-01 12:00:00", "Great_Sitkin"]);

        let graphics = AnchorTableExtractor::new("X", "VAG").extract(LIST_PAGE.as_bytes());
        assert_eq!(
            graphics[0].extra_row,
            vec!["2020-05-01 12:00:00", "Great_Sitkin", "X"]
        );
    }

    #[test]
    fn test_truncated_row_discarded() {
        let page = r#"<table>
            <tr><td>2020-05-01 12:00:00</td><td>Etna</td><td><a href="/VAA/a.html">X</a></td></tr>
            <tr><td>2020-05-01 18:00:00</td><td>Etna</td><td><a href="/VAA/b.html">X</a>"#;
        let entries = extractor().extract(page.as_bytes());

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].link, "/VAA/a.html");
    }

    #[test]
    fn test_row_without_close_tag_ends_at_next_row() {
        let page = r#"<table>
            <tr><td>2020-05-01 12:00:00</td><td>Etna</td><td><a href="/VAA/a.html">X</a></td>
            <tr><td>2020-05-01 18:00:00</td><td>Etna</td><td><a href="/VAA/b.html">X</a></td></tr>
        </table>"#;
        let links: Vec<_> = extractor()
            .extract(page.as_bytes())
            .into_iter()
            .map(|e| e.link)
            .collect();
        assert_eq!(links, ["/VAA/a.html", "/VAA/b.html"]);
    }

    #[test]
    fn test_anchor_outside_row_ignored() {
        let page = r#"<p><a href="/VAA/a.html">X</a></p>"#;
        assert!(extractor().extract(page.as_bytes()).is_empty());
    }

    #[test]
    fn test_filter_is_configurable() {
        let entries = AnchorTableExtractor::new("X", "VAG").extract(LIST_PAGE.as_bytes());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].link, "/products/VAG/adv_20200501.png");
    }

    #[test]
    fn test_rows_without_enough_cells_are_skipped() {
        let page = r#"<table><tr><td><a href="/VAA/a.html">X</a></td></tr></table>"#;
        assert!(extractor().extract(page.as_bytes()).is_empty());
    }

    #[test]
    fn test_anchor_without_href() {
        let page = r#"<table><tr><td>2020-05-01 12:00:00</td><td>Etna</td><td><a>X</a></td></tr></table>"#;
        assert!(extractor().extract(page.as_bytes()).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let extractor = extractor();
        let first = extractor.extract(LIST_PAGE.as_bytes());
        let second = extractor.extract(LIST_PAGE.as_bytes());
        assert_eq!(first, second);
    }

    #[test]
    fn test_state_releases_anchor_at_row_close() {
        let mut state = AnchorTableState::default();
        let events: Vec<_> = TagStream::new(
            r#"<table><tr><td>t</td><td>v</td><td><a href="/VAA/a.html">X</a></td></tr></table>"#,
        )
        .collect();

        let mut emitted = Vec::new();
        for event in &events {
            let out = state.step(event);
            if !out.is_empty() {
                assert!(event.is_end("tr"));
                emitted.extend(out);
            }
        }

        assert_eq!(
            emitted,
            vec![RowAnchor {
                href: "/VAA/a.html".to_string(),
                text: "X".to_string(),
                cells: vec!["t".to_string(), "v".to_string()],
            }]
        );
    }
}
