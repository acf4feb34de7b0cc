//! "See also" link extraction.
//!
//! Pages are scanned as a stream of HTML tokens, not parsed into a DOM. The
//! section looks like this on the source site:
//!
//! ```text
//! <h2><span class="mw-headline" id="See_also">See also</span></h2>
//! <ul>
//!   <li><a href="/wiki/Australian_native_bees" title="Australian native bees">...</a></li>
//!   <li><a href="/wiki/Superorganism" title="Superorganism">...</a></li>
//! </ul>
//! ```
//!
//! Every anchor title after the `See_also` span is collected until the first
//! closing `</ul>`.

use crate::error::{Result, ScanError};
use crate::source::PageSource;
use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
    TokenizerResult,
};
use std::collections::HashMap;
use tracing::debug;

pub const SECTION_ID: &str = "See_also";
pub const EDIT_SECTION_PREFIX: &str = "Edit section";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionState {
    Scanning,
    InSection,
    Done,
}

/// Tokenizer mode for the content of an element whose text is not markup.
/// Without a tree builder the sink has to ask for these switches itself.
fn raw_kind(tag: &Tag) -> Option<RawKind> {
    if tag.kind != TagKind::StartTag || tag.self_closing {
        return None;
    }
    match &*tag.name {
        "script" => Some(RawKind::ScriptData),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => Some(RawKind::Rawtext),
        "title" | "textarea" => Some(RawKind::Rcdata),
        _ => None,
    }
}

/// Attribute name to value for a single tag.
fn attributes(tag: &Tag) -> HashMap<&str, &str> {
    tag.attrs
        .iter()
        .map(|attr| (&*attr.name.local, &*attr.value))
        .collect()
}

struct SeeAlsoSink {
    state: SectionState,
    links: Vec<String>,
}

impl SeeAlsoSink {
    fn process_tag(&mut self, tag: Tag) {
        match (self.state, tag.kind) {
            (SectionState::Scanning, TagKind::StartTag) => {
                if &*tag.name == "span" && attributes(&tag).get("id").copied() == Some(SECTION_ID) {
                    self.state = SectionState::InSection;
                }
            }
            (SectionState::InSection, TagKind::StartTag) => {
                if &*tag.name != "a" {
                    return;
                }
                let attrs = attributes(&tag);
                if let Some(title) = attrs.get("title")
                    && !title.starts_with(EDIT_SECTION_PREFIX)
                {
                    self.links.push(title.to_string());
                }
            }
            (SectionState::InSection, TagKind::EndTag) => {
                if &*tag.name == "ul" {
                    self.state = SectionState::Done;
                }
            }
            _ => {}
        }
    }
}

impl TokenSink for SeeAlsoSink {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        let Token::TagToken(tag) = token else {
            return TokenSinkResult::Continue;
        };

        let raw = raw_kind(&tag);
        if self.state != SectionState::Done {
            self.process_tag(tag);
        }
        match raw {
            Some(kind) => TokenSinkResult::RawData(kind),
            None => TokenSinkResult::Continue,
        }
    }
}

/// Incremental "See also" scanner. Feed it chunks of a page in order and
/// stop as soon as [`SeeAlsoScanner::is_done`] reports the section closed.
pub struct SeeAlsoScanner {
    tokenizer: Tokenizer<SeeAlsoSink>,
    input: BufferQueue,
    pending: Vec<u8>,
}

impl SeeAlsoScanner {
    pub fn new() -> Self {
        let sink = SeeAlsoSink {
            state: SectionState::Scanning,
            links: Vec::new(),
        };
        Self {
            tokenizer: Tokenizer::new(sink, TokenizerOpts::default()),
            input: BufferQueue::new(),
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> SectionState {
        self.tokenizer.sink.state
    }

    pub fn is_done(&self) -> bool {
        self.state() == SectionState::Done
    }

    pub fn feed_str(&mut self, text: &str) {
        if text.is_empty() || self.is_done() {
            return;
        }
        self.input.push_back(StrTendril::from_slice(text));
        // `Script` only pauses the tokenizer for a script to run; resume until
        // the queue is drained.
        while let TokenizerResult::Script(()) = self.tokenizer.feed(&mut self.input) {}
    }

    /// Feed raw body bytes. A multi-byte character split across chunks is
    /// held back until the rest of it arrives.
    pub fn feed_bytes(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
        let decoded = match std::str::from_utf8(&self.pending) {
            Ok(text) => {
                let text = text.to_string();
                self.pending.clear();
                text
            }
            Err(e) if e.error_len().is_none() => {
                let valid = e.valid_up_to();
                let text = String::from_utf8_lossy(&self.pending[..valid]).into_owned();
                self.pending.drain(..valid);
                text
            }
            Err(_) => {
                let text = String::from_utf8_lossy(&self.pending).into_owned();
                self.pending.clear();
                text
            }
        };
        self.feed_str(&decoded);
    }

    /// Titles collected so far, in document order.
    pub fn finish(mut self) -> Vec<String> {
        if !self.pending.is_empty() {
            let rest = String::from_utf8_lossy(&self.pending).into_owned();
            self.pending.clear();
            self.feed_str(&rest);
        }
        if !self.is_done() {
            self.tokenizer.end();
        }
        std::mem::take(&mut self.tokenizer.sink.links)
    }
}

impl Default for SeeAlsoScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan a complete page body for "See also" titles.
pub fn scan_see_also(html: &str) -> Vec<String> {
    let mut scanner = SeeAlsoScanner::new();
    scanner.feed_str(html);
    scanner.finish()
}

/// Fetch the page for `topic` and return the titles in its "See also"
/// section. A page without the section yields an empty list.
pub async fn extract_see_also(source: &PageSource, topic: &str) -> Result<Vec<String>> {
    let mut response = source.fetch(topic).await?;
    let mut scanner = SeeAlsoScanner::new();

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| ScanError::Body(e.to_string()))?
    {
        scanner.feed_bytes(&chunk);
        if scanner.is_done() {
            debug!("See also section of {} closed, dropping rest of body", topic);
            break;
        }
    }
    drop(response);

    let links = scanner.finish();
    debug!("Extracted {} see-also links from {}", links.len(), topic);
    Ok(links)
}
