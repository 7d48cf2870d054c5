// SPDX-License-Identifier: AGPL-3.0-or-later
//! Gemtext format handler
//!
//! Lines are classified one at a time by [`Fragments`], a pull-driven
//! iterator with two states: scanning, or inside a preformatted block.

use tracing::debug;

use crate::ast::{Document, Fragment, Warning};
use crate::group::group_lists;
use crate::resolve::Resolver;
use crate::traits::{ParseConfig, Parser, Result};

/// Marker line that opens and closes a preformatted block
pub const FENCE: &str = "```";

const LINK_PREFIX: &str = "=> ";
const ITEM_PREFIX: &str = "* ";
const QUOTATION_PREFIX: &str = "> ";

/// Gemtext format handler
pub struct GemtextParser;

impl GemtextParser {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GemtextParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for GemtextParser {
    fn parse(&self, input: &str, config: &ParseConfig) -> Result<Document> {
        let mut classifier = Fragments::new(source_lines(input), config)?;
        let content = group_lists(&mut classifier).collect();

        let mut doc = Document::new();
        doc.content = content;
        doc.warnings.extend(classifier.warning());
        Ok(doc)
    }
}

/// Split `input` at `\n`, `\r\n` or a lone `\r`.
///
/// A terminator at the very end does not produce a trailing empty line.
pub fn source_lines(input: &str) -> SourceLines<'_> {
    SourceLines { rest: input }
}

/// Iterator returned by [`source_lines`]
#[derive(Debug, Clone)]
pub struct SourceLines<'a> {
    rest: &'a str,
}

impl<'a> Iterator for SourceLines<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let Some(end) = self.rest.find(['\r', '\n']) else {
            return Some(std::mem::take(&mut self.rest));
        };
        let line = &self.rest[..end];
        let width = if self.rest[end..].starts_with("\r\n") { 2 } else { 1 };
        self.rest = &self.rest[end + width..];
        Some(line)
    }
}

/// Classifier state
#[derive(Debug)]
enum State {
    Scanning,
    InBlock { opened_at: usize, lines: Vec<String> },
}

/// Lazily classifies raw lines into flat (ungrouped) fragments
#[derive(Debug)]
pub struct Fragments<'a, I> {
    lines: I,
    italics: Option<char>,
    resolver: Resolver,
    state: State,
    line_no: usize,
    unterminated: Option<Warning>,
    _source: std::marker::PhantomData<&'a str>,
}

impl<'a, I> Fragments<'a, I>
where
    I: Iterator<Item = &'a str>,
{
    /// Fails only when the configured base address is unusable.
    pub fn new(lines: I, config: &ParseConfig) -> Result<Self> {
        Ok(Self {
            lines,
            italics: config.italics_delimiter,
            resolver: Resolver::new(config.base_url.as_deref())?,
            state: State::Scanning,
            line_no: 0,
            unterminated: None,
            _source: std::marker::PhantomData,
        })
    }

    /// Set once the input has ended inside a preformatted block.
    pub fn warning(&self) -> Option<Warning> {
        self.unterminated.clone()
    }

    fn classify(&self, line: &str) -> Fragment {
        if let Some(level) = heading_level(line) {
            return Fragment::Heading {
                level,
                text: line[level as usize..].trim_start_matches(' ').to_string(),
            };
        }

        if let Some(rest) = line.strip_prefix(LINK_PREFIX) {
            let (reference, caption) = match rest.split_once(' ') {
                Some((reference, caption)) => (reference, Some(caption.to_string())),
                None => (rest, None),
            };
            return Fragment::Link {
                address: self.resolver.resolve(reference),
                caption,
            };
        }

        if let Some(text) = line.strip_prefix(ITEM_PREFIX) {
            return Fragment::Item {
                text: text.to_string(),
                italics: self.italics,
            };
        }

        if let Some(text) = line.strip_prefix(QUOTATION_PREFIX) {
            return Fragment::Quotation {
                text: text.to_string(),
                italics: self.italics,
            };
        }

        Fragment::Paragraph {
            text: line.to_string(),
            italics: self.italics,
        }
    }
}

impl<'a, I> Iterator for Fragments<'a, I>
where
    I: Iterator<Item = &'a str>,
{
    type Item = Fragment;

    fn next(&mut self) -> Option<Fragment> {
        loop {
            let Some(raw) = self.lines.next() else {
                if let State::InBlock { opened_at, lines } = &self.state {
                    if self.unterminated.is_none() {
                        debug!(line = opened_at, "input ended inside a preformatted block");
                        self.unterminated = Some(Warning::UnterminatedBlock {
                            line: *opened_at,
                            dropped_lines: lines.len(),
                        });
                    }
                }
                return None;
            };
            self.line_no += 1;
            let line = raw.trim_end_matches(['\r', '\n']);

            match &mut self.state {
                State::InBlock { lines, .. } => {
                    if line.starts_with(FENCE) {
                        let lines = std::mem::take(lines);
                        let count = lines.len();
                        debug!(line = self.line_no, count, "closed preformatted block");
                        self.state = State::Scanning;
                        return Some(Fragment::Preformatted { lines });
                    }
                    lines.push(line.to_string());
                }
                State::Scanning if line.starts_with(FENCE) => {
                    self.state = State::InBlock {
                        opened_at: self.line_no,
                        lines: Vec::new(),
                    };
                }
                State::Scanning if line.is_empty() => {}
                State::Scanning => return Some(self.classify(line)),
            }
        }
    }
}

/// Number of leading `#` when the line is a level 1-3 heading.
fn heading_level(line: &str) -> Option<u8> {
    let level = line.bytes().take_while(|b| *b == b'#').count();
    if (1..=3).contains(&level) && line[level..].starts_with(' ') {
        u8::try_from(level).ok()
    } else {
        None
    }
}
