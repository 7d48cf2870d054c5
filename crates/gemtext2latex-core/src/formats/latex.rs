// SPDX-License-Identifier: AGPL-3.0-or-later
//! LaTeX format handler
//!
//! Renders each fragment to its LaTeX text and wraps the sequence in the
//! configured document class, preamble and postamble.

use std::collections::HashMap;

use crate::ast::{Container, Document, Fragment};
use crate::escape::{Escaper, escape_reserved};
use crate::traits::{RenderConfig, Renderer, Result};

/// LaTeX format handler
pub struct LatexRenderer;

impl LatexRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render only the fragments, each followed by a newline.
    pub fn render_body(&self, doc: &Document) -> Result<String> {
        let mut escapers = Escapers::default();
        let mut output = String::new();
        for fragment in &doc.content {
            output.push_str(&render_fragment(fragment, &mut escapers)?);
            output.push('\n');
        }
        Ok(output)
    }
}

impl Default for LatexRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for LatexRenderer {
    fn render(&self, doc: &Document, config: &RenderConfig) -> Result<String> {
        let mut output = String::new();
        output.push_str(&format!("\\documentclass{{{}}}\n", config.document_class));
        output.push_str(&config.preamble);
        output.push('\n');
        output.push_str(&self.render_body(doc)?);
        output.push_str(&config.postamble);
        output.push('\n');
        Ok(output)
    }
}

/// Render a single fragment.
pub fn render(fragment: &Fragment) -> Result<String> {
    render_fragment(fragment, &mut Escapers::default())
}

/// Escapers compiled once per distinct italics delimiter
#[derive(Default)]
struct Escapers {
    compiled: HashMap<Option<char>, Escaper>,
}

impl Escapers {
    fn escape(&mut self, text: &str, delimiter: Option<char>) -> Result<String> {
        if !self.compiled.contains_key(&delimiter) {
            self.compiled.insert(delimiter, Escaper::new(delimiter)?);
        }
        Ok(self.compiled[&delimiter].escape(text))
    }
}

fn render_fragment(fragment: &Fragment, escapers: &mut Escapers) -> Result<String> {
    let rendered = match fragment {
        Fragment::Heading { level, text } => {
            let nesting = "sub".repeat(usize::from(level.saturating_sub(1)));
            format!("\\{nesting}section*{{{}}}\n", escape_reserved(text))
        }

        Fragment::Paragraph { text, italics } => {
            format!("{}\n", escapers.escape(text, *italics)?)
        }

        Fragment::Item { text, italics } => escapers.escape(text, *italics)?,

        Fragment::Quotation { text, italics } => {
            let quoted = escapers.escape(text, *italics)?;
            format!("\\begin{{quotation}}\n``{quoted}''\n\\end{{quotation}}\n\n")
        }

        // Address and caption are emitted as written.
        Fragment::Link { address, caption } => match caption {
            Some(caption) => format!("\\href{{{address}}}{{{caption}}}"),
            None => format!("\\url{{{address}}}"),
        },

        Fragment::Preformatted { lines } => {
            format!("\\begin{{verbatim}}\n{}\n\\end{{verbatim}}\n", lines.join("\n"))
        }

        Fragment::List(container) => render_list(container, escapers)?,
    };
    Ok(rendered)
}

fn render_list(container: &Container, escapers: &mut Escapers) -> Result<String> {
    let mut items = Vec::with_capacity(container.len());
    for item in container.items() {
        items.push(format!("\\item {}", render_fragment(item, escapers)?));
    }
    Ok(format!(
        "\\begin{{itemize}}\n{}\n\\end{{itemize}}\n",
        items.join("\n")
    ))
}
