//! Streaming start-tag, text and end-tag events over a page.
//!
//! Built on html5ever's tokenizer rather than its tree builder: only tags
//! present in the source are reported. Nothing is inserted (no implied
//! `<tbody>`) and nothing is closed at end of input, so a page cut off
//! mid-row never produces that row's closing tags.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::mem;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

use super::decode;

/// Bytes of source text handed to the tokenizer per refill.
const CHUNK_SIZE: usize = 8 * 1024;

/// Elements that never have content; their start tag also closes them.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// A single event produced while scanning a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagEvent {
    StartTag {
        name: String,
        /// Attributes in document order.
        attributes: Vec<(String, String)>,
    },
    Text {
        content: String,
    },
    EndTag {
        name: String,
    },
}

impl TagEvent {
    /// Look up an attribute value on a start tag.
    pub fn attr(&self, key: &str) -> Option<&str> {
        match self {
            TagEvent::StartTag { attributes, .. } => attributes
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.as_str()),
            _ => None,
        }
    }

    pub fn is_start(&self, tag: &str) -> bool {
        matches!(self, TagEvent::StartTag { name, .. } if name == tag)
    }

    pub fn is_end(&self, tag: &str) -> bool {
        matches!(self, TagEvent::EndTag { name } if name == tag)
    }
}

/// Collects tokenizer output as events.
///
/// Adjacent character tokens are joined so a text run split by an entity or
/// a chunk boundary comes out as one event.
#[derive(Default)]
struct EventSink {
    events: RefCell<VecDeque<TagEvent>>,
    text: RefCell<String>,
}

impl EventSink {
    fn flush_text(&self) {
        let content = mem::take(&mut *self.text.borrow_mut());
        if !content.is_empty() {
            self.events.borrow_mut().push_back(TagEvent::Text { content });
        }
    }

    fn push(&self, event: TagEvent) {
        self.flush_text();
        self.events.borrow_mut().push_back(event);
    }

    fn pop(&self) -> Option<TagEvent> {
        self.events.borrow_mut().pop_front()
    }
}

impl TokenSink for EventSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::CharacterTokens(chunk) => self.text.borrow_mut().push_str(&chunk),
            Token::TagToken(tag) => {
                let name = tag.name.to_string();
                match tag.kind {
                    TagKind::StartTag => {
                        let closes_itself =
                            tag.self_closing || VOID_ELEMENTS.contains(&name.as_str());
                        self.push(TagEvent::StartTag {
                            name: name.clone(),
                            attributes: tag
                                .attrs
                                .iter()
                                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                                .collect(),
                        });
                        if closes_itself {
                            self.push(TagEvent::EndTag { name: name.clone() });
                        }
                        // Script and style bodies are text, not markup.
                        return match name.as_str() {
                            "script" => TokenSinkResult::RawData(RawKind::ScriptData),
                            "style" | "xmp" | "iframe" | "noembed" | "noframes" => {
                                TokenSinkResult::RawData(RawKind::Rawtext)
                            }
                            "title" | "textarea" => TokenSinkResult::RawData(RawKind::Rcdata),
                            _ => TokenSinkResult::Continue,
                        };
                    }
                    TagKind::EndTag => self.push(TagEvent::EndTag { name }),
                }
            }
            Token::CommentToken(_) | Token::DoctypeToken(_) | Token::EOFToken => self.flush_text(),
            Token::NullCharacterToken | Token::ParseError(_) => {}
        }
        TokenSinkResult::Continue
    }

    fn end(&self) {
        self.flush_text();
    }
}

/// Single-use, lazy iterator over the events of one page.
///
/// The source is tokenized a chunk at a time as events are pulled. Markup
/// is read leniently: unknown entities stay as text, comments and doctypes
/// are skipped, and unterminated tags are left unterminated. Void elements
/// such as `<br>` and self-closing tags yield an end tag right after their
/// start tag.
pub struct TagStream {
    source: String,
    offset: usize,
    input: BufferQueue,
    tokenizer: Tokenizer<EventSink>,
    finished: bool,
}

impl TagStream {
    /// Scan already decoded text.
    pub fn new(text: &str) -> Self {
        Self {
            source: text.to_string(),
            offset: 0,
            input: BufferQueue::default(),
            tokenizer: Tokenizer::new(EventSink::default(), TokenizerOpts::default()),
            finished: false,
        }
    }

    /// Decode a raw body and scan it.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(&decode(bytes).text)
    }

    /// Hand the next chunk of source to the tokenizer; false once exhausted.
    fn refill(&mut self) -> bool {
        if self.offset < self.source.len() {
            let mut end = (self.offset + CHUNK_SIZE).min(self.source.len());
            while !self.source.is_char_boundary(end) {
                end += 1;
            }
            self.input
                .push_back(StrTendril::from_slice(&self.source[self.offset..end]));
            self.offset = end;
            let _ = self.tokenizer.feed(&self.input);
            true
        } else if !self.finished {
            self.finished = true;
            self.tokenizer.end();
            true
        } else {
            false
        }
    }
}

impl Iterator for TagStream {
    type Item = TagEvent;

    fn next(&mut self) -> Option<TagEvent> {
        loop {
            if let Some(event) = self.tokenizer.sink.pop() {
                return Some(event);
            }
            if !self.refill() {
                return None;
            }
        }
    }
}
