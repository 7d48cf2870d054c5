// SPDX-License-Identifier: AGPL-3.0-or-later
//! Layered converter settings: config file, then command-line flags

use std::path::{Path, PathBuf};

use gemtext2latex_core::traits::{DOC_CLASS, DOC_TAIL, DOC_TOP};
use gemtext2latex_core::{ParseConfig, RenderConfig};
use serde::Deserialize;
use thiserror::Error;

const BEGIN_DOCUMENT: &str = "\\begin{document}";
const END_DOCUMENT: &str = "\\end{document}";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("the preamble must include the \\begin{{document}} line")]
    MissingBeginDocument,

    #[error("the endmatter must include the \\end{{document}} line")]
    MissingEndDocument,
}

/// One layer of optional settings, as found in a TOML file or on the
/// command line
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SettingsLayer {
    pub docclass: Option<String>,
    pub top: Option<String>,
    pub tail: Option<String>,
    pub italics_char: Option<char>,
    pub base: Option<String>,
}

impl SettingsLayer {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Values set in `over` win.
    pub fn merge(self, over: SettingsLayer) -> SettingsLayer {
        SettingsLayer {
            docclass: over.docclass.or(self.docclass),
            top: over.top.or(self.top),
            tail: over.tail.or(self.tail),
            italics_char: over.italics_char.or(self.italics_char),
            base: over.base.or(self.base),
        }
    }

    /// Fill in defaults and check the document template.
    pub fn into_settings(self) -> Result<Settings, ConfigError> {
        let preamble = self.top.unwrap_or_else(|| DOC_TOP.to_string());
        if !preamble.contains(BEGIN_DOCUMENT) {
            return Err(ConfigError::MissingBeginDocument);
        }
        let postamble = self.tail.unwrap_or_else(|| DOC_TAIL.to_string());
        if !postamble.contains(END_DOCUMENT) {
            return Err(ConfigError::MissingEndDocument);
        }

        Ok(Settings {
            parse: ParseConfig {
                italics_delimiter: self.italics_char,
                base_url: self.base,
            },
            render: RenderConfig {
                document_class: self.docclass.unwrap_or_else(|| DOC_CLASS.to_string()),
                preamble,
                postamble,
            },
        })
    }
}

/// Fully resolved settings handed to the core
#[derive(Debug, Clone)]
pub struct Settings {
    pub parse: ParseConfig,
    pub render: RenderConfig,
}
