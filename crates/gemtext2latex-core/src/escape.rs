// SPDX-License-Identifier: AGPL-3.0-or-later
//! LaTeX escaping and italics translation for single lines of text

use regex::{Captures, Regex};

use crate::traits::{ConversionError, Result};

/// Characters LaTeX treats specially that are prefixed with a backslash
pub const RESERVED: [char; 7] = ['%', '$', '}', '{', '_', '#', '&'];

/// Prefix every reserved character with `\`, in a single pass.
pub fn escape_reserved(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if RESERVED.contains(&ch) {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

/// Escape `text` and translate italics spans delimited by `delimiter`.
pub fn escape(text: &str, delimiter: Option<char>) -> Result<String> {
    Ok(Escaper::new(delimiter)?.escape(text))
}

/// Line escaper with an optional, precompiled italics pattern
#[derive(Debug, Clone)]
pub struct Escaper {
    italics: Option<Italics>,
}

impl Escaper {
    pub fn new(delimiter: Option<char>) -> Result<Self> {
        let italics = delimiter.map(Italics::new).transpose()?;
        Ok(Self { italics })
    }

    pub fn escape(&self, text: &str) -> String {
        let escaped = escape_reserved(text);
        match &self.italics {
            Some(italics) => italics.apply(&escaped),
            None => escaped,
        }
    }
}

#[derive(Debug, Clone)]
struct Italics {
    delimiter: char,
    span: Regex,
}

impl Italics {
    fn new(delimiter: char) -> Result<Self> {
        let quoted = regex::escape(delimiter.encode_utf8(&mut [0; 4]));
        let span = Regex::new(&format!("{quoted}([a-zA-Z0-9, '-]*?){quoted}"))
            .map_err(|source| ConversionError::InvalidDelimiter { delimiter, source })?;
        Ok(Self { delimiter, span })
    }

    /// Unbalanced delimiters leave the whole line literal.
    fn apply(&self, line: &str) -> String {
        let occurrences = line.matches(self.delimiter).count();
        if occurrences % 2 != 0 {
            return line.to_string();
        }

        self.span
            .replace_all(line, |caps: &Captures| format!("\\textit{{{}}}", &caps[1]))
            .into_owned()
    }
}
