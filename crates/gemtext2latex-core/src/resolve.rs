// SPDX-License-Identifier: AGPL-3.0-or-later
//! Relative link resolution for gemini:// addresses
//!
//! Resolution follows RFC 3986/3987 reference resolution without any
//! normalisation: hosts keep their case and non-ASCII text is not
//! percent-encoded.

use oxiri::Iri;
use tracing::debug;

use crate::traits::{ConversionError, Result};

/// The only scheme whose references are resolved against the base
pub const GEMINI_SCHEME: &str = "gemini";

/// Authority standing in for bases that are only a path, e.g. `/notes/index.gmi`
const PATH_ONLY_HOST: &str = "path-only.invalid";

/// Resolve `reference` against `base`, as a client viewing `base` would.
pub fn resolve(base: Option<&str>, reference: &str) -> Result<String> {
    Ok(Resolver::new(base)?.resolve(reference))
}

/// Lowercased URI scheme of `address`, if it has one.
pub fn scheme_of(address: &str) -> Option<String> {
    let (candidate, _) = address.split_once(':')?;
    let mut chars = candidate.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')) {
        Some(candidate.to_ascii_lowercase())
    } else {
        None
    }
}

/// Resolver bound to one base address, validated up front
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    base: Option<Base>,
}

#[derive(Debug, Clone)]
struct Base {
    iri: Iri<String>,
    path_only: bool,
}

impl Resolver {
    /// Fails when `base` has a scheme other than gemini or cannot be parsed.
    pub fn new(base: Option<&str>) -> Result<Self> {
        let Some(base) = base else {
            return Ok(Self::default());
        };

        let (absolute, path_only) = match scheme_of(base).as_deref() {
            Some(GEMINI_SCHEME) => (
                format!("{GEMINI_SCHEME}{}", &base[GEMINI_SCHEME.len()..]),
                false,
            ),
            Some(scheme) => {
                return Err(ConversionError::UnsupportedScheme {
                    scheme: scheme.to_string(),
                    url: base.to_string(),
                });
            }
            None if base.starts_with("//") => (format!("{GEMINI_SCHEME}:{base}"), false),
            None => {
                let slash = if base.starts_with('/') { "" } else { "/" };
                (format!("{GEMINI_SCHEME}://{PATH_ONLY_HOST}{slash}{base}"), true)
            }
        };

        let iri = Iri::parse(absolute).map_err(|source| ConversionError::InvalidUrl {
            url: base.to_string(),
            source,
        })?;

        Ok(Self {
            base: Some(Base { iri, path_only }),
        })
    }

    /// Absolute references, in gemini or any other scheme, and references
    /// that fail to resolve come back unchanged.
    pub fn resolve(&self, reference: &str) -> String {
        let Some(base) = &self.base else {
            return reference.to_string();
        };

        if scheme_of(reference).is_some() {
            return reference.to_string();
        }

        match base.iri.resolve(reference) {
            Ok(joined) => base.strip_placeholder(joined),
            Err(err) => {
                debug!(reference, error = %err, "could not resolve link; keeping it as written");
                reference.to_string()
            }
        }
    }
}

impl Base {
    fn strip_placeholder(&self, joined: Iri<String>) -> String {
        if self.path_only && joined.authority() == Some(PATH_ONLY_HOST) {
            let root = GEMINI_SCHEME.len() + "://".len() + PATH_ONLY_HOST.len();
            return joined.as_str()[root..].to_string();
        }
        joined.into_inner()
    }
}
