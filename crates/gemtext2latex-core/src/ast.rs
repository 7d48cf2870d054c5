// SPDX-License-Identifier: AGPL-3.0-or-later
//! Fragment model for gemtext documents
//!
//! A gemtext document is a flat sequence of fragments, one per significant
//! source line, except preformatted blocks (many lines) and the list
//! containers built by the grouper (many fragments).

use serde::Serialize;
use std::fmt;

use crate::escape::escape_reserved;

/// The kinds of list a run of like fragments collapses into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    /// Consecutive `* ` items
    Bullet,
    /// Consecutive `=> ` links
    Links,
}

impl ListKind {
    /// Whether `fragment` is a member of this kind of list.
    ///
    /// Membership is kind-exact: a container is never a member of anything,
    /// so already-built lists are never merged.
    pub fn admits(&self, fragment: &Fragment) -> bool {
        matches!(
            (self, fragment),
            (ListKind::Bullet, Fragment::Item { .. }) | (ListKind::Links, Fragment::Link { .. })
        )
    }

    pub const fn name(&self) -> &'static str {
        match self {
            ListKind::Bullet => "BulletList",
            ListKind::Links => "Links",
        }
    }
}

/// An ordered, non-empty run of same-kind fragments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Container {
    kind: ListKind,
    items: Vec<Fragment>,
}

impl Container {
    /// Open a container holding exactly `first`.
    pub fn new(kind: ListKind, first: Fragment) -> Self {
        Self {
            kind,
            items: vec![first],
        }
    }

    pub fn push(&mut self, fragment: Fragment) {
        self.items.push(fragment);
    }

    pub fn kind(&self) -> ListKind {
        self.kind
    }

    pub fn items(&self) -> &[Fragment] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One classified structural unit of a gemtext document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Fragment {
    /// `#`, `##` or `###` heading
    Heading { level: u8, text: String },

    /// Any line that is not otherwise classified
    Paragraph {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        italics: Option<char>,
    },

    /// `* ` list item
    Item {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        italics: Option<char>,
    },

    /// `> ` quotation
    Quotation {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        italics: Option<char>,
    },

    /// `=> address [caption]`, address already resolved against the base
    Link {
        address: String,
        caption: Option<String>,
    },

    /// Verbatim lines between two fences
    Preformatted { lines: Vec<String> },

    /// Run of items or links
    List(Container),
}

impl Fragment {
    /// Name used in the generic debug form
    pub fn kind_name(&self) -> &'static str {
        match self {
            Fragment::Heading { .. } => "Heading",
            Fragment::Paragraph { .. } => "Paragraph",
            Fragment::Item { .. } => "Item",
            Fragment::Quotation { .. } => "Quotation",
            Fragment::Link { .. } => "Link",
            Fragment::Preformatted { .. } => "Preformatted",
            Fragment::List(container) => container.kind().name(),
        }
    }
}

/// Generic debug form: `Kind: text`, reserved characters escaped.
impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.kind_name();
        match self {
            Fragment::Heading { text, .. }
            | Fragment::Paragraph { text, .. }
            | Fragment::Item { text, .. }
            | Fragment::Quotation { text, .. } => {
                writeln!(f, "{name}: {}", escape_reserved(text))
            }
            Fragment::Link { address, caption } => match caption {
                Some(caption) => writeln!(f, "{name}: {address} {caption}"),
                None => writeln!(f, "{name}: {address}"),
            },
            Fragment::Preformatted { lines } => {
                writeln!(f, "{name}: {} line(s)", lines.len())
            }
            Fragment::List(container) => {
                writeln!(f, "{name}: {} item(s)", container.len())?;
                for item in container.items() {
                    write!(f, "  {item}")?;
                }
                Ok(())
            }
        }
    }
}

/// Non-fatal condition noticed while reading the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Warning {
    /// Input ended inside a preformatted block; its lines were dropped
    UnterminatedBlock { line: usize, dropped_lines: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnterminatedBlock {
                line,
                dropped_lines,
            } => write!(
                f,
                "preformatted block opened at line {line} is never closed; \
                 {dropped_lines} line(s) dropped"
            ),
        }
    }
}

/// The root document node
#[derive(Debug, Clone, Default, Serialize)]
pub struct Document {
    pub content: Vec<Fragment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the fragment tree as pretty JSON
    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| crate::ConversionError::SerializationError(e.to_string()))
    }
}
