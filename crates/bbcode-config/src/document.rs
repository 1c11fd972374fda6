//! Format-neutral configuration document.

use bbcode_core::{
    ConfigurationError, Interpreter, SubstitutionTables, TagDefinition, TagKind, TagRegistry,
};

use crate::ConfigError;

/// Bundled default tag set.
const BUILTIN_XML: &str = include_str!("builtin.xml");

/// One configured tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    /// Tag name.
    pub name: String,
    /// Tag kind.
    pub kind: TagKind,
    /// Whether the tag takes a `=value` parameter.
    pub parameterized: bool,
    /// Open template.
    pub open: String,
    /// Close template.
    pub close: String,
}

/// One `pattern -> replacement` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    /// Regular expression.
    pub pattern: String,
    /// Replacement text, may reference capture groups.
    pub replacement: String,
}

/// Parsed configuration: tags plus normal and literal substitution rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    /// Tag definitions in document order.
    pub tags: Vec<TagEntry>,
    /// Rules applied to text outside literal tags.
    pub replacements: Vec<Replacement>,
    /// Rules applied to literal text and tag parameters.
    pub literal_replacements: Vec<Replacement>,
}

impl ConfigDocument {
    /// The bundled default tag set.
    ///
    /// Covers `b`, `i`, `u`, `s`, `url`, `img`, `quote`, `code`, `list`, `li`,
    /// `color` and `size`, and turns line breaks into `<br />`.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_xml(BUILTIN_XML).expect("invalid built-in configuration")
    }

    /// Build an interpreter from this document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Definition`] for an invalid tag or pattern.
    pub fn build(&self) -> Result<Interpreter, ConfigError> {
        let tags = self
            .tags
            .iter()
            .map(|tag| {
                TagDefinition::new(&tag.name, tag.parameterized, &tag.open, &tag.close, tag.kind)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut tables = SubstitutionTables::new();
        for rule in &self.replacements {
            tables.add_normal(&rule.pattern, &rule.replacement)?;
        }
        for rule in &self.literal_replacements {
            tables.add_literal(&rule.pattern, &rule.replacement)?;
        }

        Ok(Interpreter::new(TagRegistry::from_definitions(tags), tables))
    }
}

/// Parse an optional `type` value for the tag `name`.
pub(crate) fn parse_kind(name: &str, value: Option<&str>) -> Result<TagKind, ConfigError> {
    let Some(value) = value else {
        return Ok(TagKind::Normal);
    };

    let kind = value.parse::<TagKind>().map_err(|err| match err {
        ConfigurationError::ConflictingKind { .. } => ConfigurationError::ConflictingKind {
            name: name.to_owned(),
        },
        other => other,
    })?;
    Ok(kind)
}
