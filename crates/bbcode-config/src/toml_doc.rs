//! TOML configuration documents.
//!
//! ```toml
//! [[tags]]
//! name = "code"
//! type = "literal"
//! open = "<pre>"
//! close = "</pre>"
//!
//! [[replacements]]
//! old = '\r?\n'
//! new = "<br />"
//! ```

use serde::Deserialize;

use crate::ConfigError;
use crate::document::{ConfigDocument, Replacement, TagEntry, parse_kind};

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawDocument {
    tags: Vec<RawTag>,
    replacements: Vec<RawReplacement>,
    literal_replacements: Vec<RawReplacement>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTag {
    name: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    parameter: bool,
    #[serde(default)]
    open: String,
    #[serde(default)]
    close: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawReplacement {
    old: String,
    new: String,
}

impl From<RawReplacement> for Replacement {
    fn from(raw: RawReplacement) -> Self {
        Self {
            pattern: raw.old,
            replacement: raw.new,
        }
    }
}

impl ConfigDocument {
    /// Parse a TOML configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed TOML, unknown keys, a missing tag
    /// `name`, or an unknown `type`.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let raw: RawDocument = toml::from_str(content)?;

        let tags = raw
            .tags
            .into_iter()
            .map(|tag| {
                Ok(TagEntry {
                    kind: parse_kind(&tag.name, tag.kind.as_deref())?,
                    name: tag.name,
                    parameterized: tag.parameter,
                    open: tag.open,
                    close: tag.close,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self {
            tags,
            replacements: raw.replacements.into_iter().map(Into::into).collect(),
            literal_replacements: raw
                .literal_replacements
                .into_iter()
                .map(Into::into)
                .collect(),
        })
    }
}
