// src/extract/message.rs

//! Isolates the advisory text block on an advisory-detail page.
//!
//! Capture starts at the `VA ADVISORY` (or `VA EXTENDED ADVISORY`) heading
//! and stops after the line holding `NXT ADVISORY:`. Markup is dropped;
//! block-level closing tags become line breaks.

use std::sync::LazyLock;

use regex::Regex;

use crate::scan::{TagEvent, TagStream};

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"VA (EXTENDED )?ADVISORY").expect("valid heading pattern"));

static TERMINAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"NXT ADVISORY:\s*\w+.*?\n").expect("valid terminal pattern"));

/// Tags whose closing ends a line of the advisory.
const LINE_BREAKING_TAGS: &[&str] = &["h1", "h2", "h3", "div", "p", "br", "code"];

/// Capture state of a [`MessageExtractor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessageState {
    /// No heading seen yet
    #[default]
    Inactive,
    /// Accumulating advisory text
    Active,
    /// Terminal line found; nothing more is captured
    Complete,
}

/// State machine accumulating one advisory's text.
#[derive(Debug, Default)]
pub struct MessageExtractor {
    state: MessageState,
    text: String,
}

impl MessageExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MessageState {
        self.state
    }

    /// Advance on one event.
    pub fn step(&mut self, event: &TagEvent) {
        match event {
            TagEvent::Text { content } => self.on_text(content.trim()),
            TagEvent::EndTag { name } if self.state == MessageState::Active => self.on_close(name),
            _ => {}
        }
    }

    fn on_text(&mut self, chunk: &str) {
        if chunk.is_empty() {
            return;
        }
        match self.state {
            MessageState::Inactive => {
                if let Some(heading) = HEADING.find(chunk) {
                    log::debug!("Advisory heading found: {}", heading.as_str());
                    self.state = MessageState::Active;
                    self.text = chunk[heading.start()..].to_string();
                }
            }
            MessageState::Active => {
                self.text.push_str(chunk);
                self.text.push(' ');
            }
            MessageState::Complete => {}
        }
    }

    fn on_close(&mut self, tag: &str) {
        if LINE_BREAKING_TAGS.contains(&tag) {
            self.text.truncate(self.text.trim_end().len());
            self.text.push('\n');
        }
        self.check_terminal();
    }

    fn check_terminal(&mut self) {
        if let Some(end) = TERMINAL.find(&self.text).map(|m| m.end()) {
            self.text.truncate(end);
            self.state = MessageState::Complete;
        }
    }

    /// Captured text; partial when the terminal line never appeared.
    pub fn finish(mut self) -> String {
        if self.state == MessageState::Active {
            self.check_terminal();
        }
        self.text
    }
}

/// Extract the advisory text from a detail page.
///
/// Returns an empty string when the page holds no advisory heading.
pub fn extract_message(page: &[u8]) -> String {
    let mut extractor = MessageExtractor::new();
    for event in TagStream::from_bytes(page) {
        extractor.step(&event);
    }
    extractor.finish()
}
