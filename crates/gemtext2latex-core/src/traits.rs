// SPDX-License-Identifier: AGPL-3.0-or-later
//! Parser and Renderer traits for format handlers

use crate::ast::Document;
use std::io::{self, Read, Write};

/// Default LaTeX document class
pub const DOC_CLASS: &str = "mk-plain";

/// Default preamble printed after the document class
pub const DOC_TOP: &str = "\n\\begin{document}\n";

/// Default endmatter printed after the content
pub const DOC_TAIL: &str = "\n\\end{document}\n";

/// Error type for parsing and rendering
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("URL {url:?} uses scheme {scheme:?}; only gemini:// base URLs are supported")]
    UnsupportedScheme { scheme: String, url: String },

    #[error("Invalid base URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: oxiri::IriParseError,
    },

    #[error("Invalid italics delimiter {delimiter:?}: {source}")]
    InvalidDelimiter {
        delimiter: char,
        #[source]
        source: regex::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type Result<T> = std::result::Result<T, ConversionError>;

/// Configuration for parsing
#[derive(Debug, Clone, Default)]
pub struct ParseConfig {
    /// Character marking italic spans in paragraphs, items and quotations
    pub italics_delimiter: Option<char>,
    /// Base address that relative link targets are resolved against
    pub base_url: Option<String>,
}

/// Configuration for rendering
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Argument of `\documentclass`
    pub document_class: String,
    /// Printed before the content; must open the document environment
    pub preamble: String,
    /// Printed after the content; must close the document environment
    pub postamble: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            document_class: DOC_CLASS.to_string(),
            preamble: DOC_TOP.to_string(),
            postamble: DOC_TAIL.to_string(),
        }
    }
}

/// Parser trait: convert source format to a fragment document
pub trait Parser: Send + Sync {
    /// Parse a string into a Document
    fn parse(&self, input: &str, config: &ParseConfig) -> Result<Document>;
}

/// Renderer trait: convert a fragment document to target format
pub trait Renderer: Send + Sync {
    /// Render a Document to a string
    fn render(&self, doc: &Document, config: &RenderConfig) -> Result<String>;
}

/// Extension trait for reader-based parsing (not dyn-compatible)
pub trait ParserExt: Parser {
    /// Parse from a reader; the whole input is read before classification
    fn parse_reader<R: Read>(&self, reader: R, config: &ParseConfig) -> Result<Document> {
        let input = io::read_to_string(reader)?;
        self.parse(&input, config)
    }
}

/// Extension trait for writer-based rendering (not dyn-compatible)
pub trait RendererExt: Renderer {
    /// Render to a writer
    fn render_writer<W: Write>(
        &self,
        doc: &Document,
        writer: &mut W,
        config: &RenderConfig,
    ) -> Result<()> {
        let output = self.render(doc, config)?;
        writer.write_all(output.as_bytes())?;
        Ok(())
    }
}

// Blanket implementations
impl<T: Parser> ParserExt for T {}
impl<T: Renderer> RendererExt for T {}
