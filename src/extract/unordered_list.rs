// src/extract/unordered_list.rs

//! List layout with one advisory per list item.
//!
//! ```text
//! <ul>
//!   <li><a href="...">ETNA - 2020-05-01 12:00 utc</a></li>
//! </ul>
//! ```

use std::mem;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::AdvisoryListEntry;
use crate::scan::{TagEvent, TagStream};

use super::ListExtractor;

static ITEM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(.*) - (\d{4}-\d{2}-\d{2} \d{2}:\d{2}) utc").expect("valid item pattern")
});

/// Parsing state for [`UnorderedListExtractor`].
#[derive(Debug, Default)]
pub struct UnorderedListState {
    active: bool,
    href: String,
    text: String,
}

impl UnorderedListState {
    /// Advance on one event, returning an entry when a matching item closes.
    pub fn step(&mut self, event: &TagEvent) -> Option<AdvisoryListEntry> {
        match event {
            TagEvent::StartTag { name, .. } => match name.as_str() {
                "ul" => self.active = true,
                "li" if self.active => self.reset(),
                "a" if self.active => {
                    if let Some(href) = event.attr("href") {
                        self.href = href.to_string();
                    }
                }
                _ => {}
            },
            TagEvent::Text { content } if self.active => self.text.push_str(content.trim()),
            TagEvent::Text { .. } => {}
            TagEvent::EndTag { name } => match name.as_str() {
                "ul" => self.active = false,
                "li" if self.active => return self.close_item(),
                _ => {}
            },
        }
        None
    }

    fn reset(&mut self) {
        self.href.clear();
        self.text.clear();
    }

    fn close_item(&mut self) -> Option<AdvisoryListEntry> {
        let href = mem::take(&mut self.href);
        let text = mem::take(&mut self.text);

        // Headers and descriptive items do not match and are dropped.
        let caps = ITEM_PATTERN.captures(&text)?;
        Some(AdvisoryListEntry {
            link: href,
            volcano: caps[1].to_string(),
            observed_at: caps[2].to_string(),
            graphic: None,
            extra_row: Vec::new(),
        })
    }
}

/// Extractor for unordered-list pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnorderedListExtractor;

impl ListExtractor for UnorderedListExtractor {
    fn extract(&self, page: &[u8]) -> Vec<AdvisoryListEntry> {
        let mut state = UnorderedListState::default();
        TagStream::from_bytes(page)
            .filter_map(|event| state.step(&event))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_PAGE: &str = r#"
        <html><body>
        <p>Latest advisories - 2020-05-01 13:00 utc</p>
        <ul>
          <li>Advisories issued during the last 48 hours</li>
          <li><a href="/adv/FVFE01_20200501_1200/text.html">ETNA - 2020-05-01 12:00 utc</a></li>
          <li><a href="/adv/FVFE01_20200501_0600/text.html">STROMBOLI - 2020-05-01 06:00 utc</a></li>
        </ul>
        <ul><li><a href="/about.html">About</a></li></ul>
        </body></html>
    "#;

    #[test]
    fn test_extracts_matching_items() {
        let entries = UnorderedListExtractor.extract(LIST_PAGE.as_bytes());

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].link, "/adv/FVFE01_20200501_1200/text.html");
        assert_eq!(entries[0].volcano, "ETNA");
        assert_eq!(entries[0].observed_at, "2020-05-01 12:00");
        assert_eq!(entries[1].volcano, "STROMBOLI");
    }

    #[test]
    fn test_single_item() {
        let page = r#"<ul><li><a href="/adv/123.html">Volcano X - 2020-05-01 12:00 utc</a></li></ul>"#;
        let entries = UnorderedListExtractor.extract(page.as_bytes());

        assert_eq!(
            entries,
            vec![AdvisoryListEntry {
                link: "/adv/123.html".to_string(),
                volcano: "Volcano X".to_string(),
                observed_at: "2020-05-01 12:00".to_string(),
                graphic: None,
                extra_row: Vec::new(),
            }]
        );
    }

    #[test]
    fn test_non_matching_item_dropped() {
        let page = r#"<ul><li><a href="/adv/123.html">Volcano X on 1 May</a></li></ul>"#;
        assert!(UnorderedListExtractor.extract(page.as_bytes()).is_empty());
    }

    #[test]
    fn test_text_outside_list_ignored() {
        let page = "<p>Volcano X - 2020-05-01 12:00 utc</p>";
        assert!(UnorderedListExtractor.extract(page.as_bytes()).is_empty());
    }

    #[test]
    fn test_href_does_not_leak_between_items() {
        let page = r#"<ul>
            <li><a href="/adv/1.html">Etna</a></li>
            <li>Etna - 2020-05-01 12:00 utc</li>
        </ul>"#;
        let entries = UnorderedListExtractor.extract(page.as_bytes());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].link, "");
    }

    #[test]
    fn test_truncated_item_discarded() {
        let page = r#"<ul>
            <li><a href="/adv/1.html">Etna - 2020-05-01 12:00 utc</a></li>
            <li><a href="/adv/2.html">Etna - 2020-05-01 18:00 utc"#;
        let entries = UnorderedListExtractor.extract(page.as_bytes());

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].link, "/adv/1.html");
    }

    #[test]
    fn test_idempotent() {
        let first = UnorderedListExtractor.extract(LIST_PAGE.as_bytes());
        let second = UnorderedListExtractor.extract(LIST_PAGE.as_bytes());
        assert_eq!(first, second);
    }
}
