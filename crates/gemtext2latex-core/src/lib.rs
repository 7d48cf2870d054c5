// SPDX-License-Identifier: AGPL-3.0-or-later
//! gemtext2latex Core - Gemini text to LaTeX conversion
//!
//! This crate provides:
//! - A fragment model for gemtext documents
//! - A lazy line classifier and list grouper
//! - A LaTeX renderer with reserved-character escaping and italics
//! - Resolution of relative gemini:// links against a base address

pub mod ast;
pub mod escape;
pub mod formats;
pub mod group;
pub mod resolve;
pub mod traits;

pub use ast::{Container, Document, Fragment, ListKind, Warning};
pub use formats::{GemtextParser, LatexRenderer};
pub use traits::{ConversionError, ParseConfig, Parser, RenderConfig, Renderer, Result};

use formats::gemtext::{Fragments, source_lines};
use group::group_lists;

/// Pull-driven pipeline: classify, group items, then group links.
///
/// Nothing is read from `input` until the returned iterator is polled.
pub fn fragments<'a>(
    input: &'a str,
    config: &ParseConfig,
) -> Result<impl Iterator<Item = Fragment> + 'a> {
    Ok(group_lists(Fragments::new(source_lines(input), config)?))
}

/// Convert a gemtext document into a complete LaTeX document.
pub fn convert(
    input: &str,
    parse_config: &ParseConfig,
    render_config: &RenderConfig,
) -> Result<String> {
    let doc = GemtextParser::new().parse(input, parse_config)?;
    LatexRenderer::new().render(&doc, render_config)
}
