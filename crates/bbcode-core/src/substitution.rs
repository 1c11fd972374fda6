//! Regex substitution tables applied to rendered text runs.
//!
//! Text is escaped first, then every rule of the selected table is applied in
//! order. Each rule rescans the whole string, so later rules see the output of
//! earlier ones.

use regex::{Regex, RegexBuilder};

use crate::{ConfigurationError, escape_html};

/// Escaping function applied before substitutions.
pub type Escaper = fn(&str) -> String;

/// One `pattern -> replacement` rule.
#[derive(Debug, Clone)]
struct Substitution {
    pattern: String,
    regex: Regex,
    replacement: String,
}

/// Which table a rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    /// Text outside literal tags.
    Normal,
    /// Text inside literal tags, and tag parameters.
    Literal,
}

/// Ordered normal-mode and literal-mode substitution tables.
///
/// Normal-mode patterns are compiled multi-line, so `^` and `$` match at line
/// boundaries. Replacement strings may reference capture groups as `$1` or
/// `${name}`.
///
/// # Example
///
/// ```
/// use bbcode_core::SubstitutionTables;
///
/// let mut tables = SubstitutionTables::new();
/// tables.add_normal(r"\r?\n", "<br />").unwrap();
///
/// assert_eq!(tables.apply_normal("a<b\nc"), "a&lt;b<br />c");
/// assert_eq!(tables.apply_literal("a\nc"), "a\nc");
/// ```
#[derive(Debug, Clone)]
pub struct SubstitutionTables {
    normal: Vec<Substitution>,
    literal: Vec<Substitution>,
    escape: Escaper,
}

impl Default for SubstitutionTables {
    fn default() -> Self {
        Self::new()
    }
}

impl SubstitutionTables {
    /// Create empty tables escaping with [`escape_html`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_escaper(escape_html)
    }

    /// Create empty tables with a custom escaping function.
    #[must_use]
    pub fn with_escaper(escape: Escaper) -> Self {
        Self {
            normal: Vec::new(),
            literal: Vec::new(),
            escape,
        }
    }

    /// Add a normal-mode rule.
    ///
    /// Re-adding an existing pattern replaces its replacement and keeps its
    /// position.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Pattern`] if `pattern` is not a valid regex.
    pub fn add_normal(
        &mut self,
        pattern: &str,
        replacement: &str,
    ) -> Result<&mut Self, ConfigurationError> {
        self.add(TextMode::Normal, pattern, replacement)
    }

    /// Add a literal-mode rule.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Pattern`] if `pattern` is not a valid regex.
    pub fn add_literal(
        &mut self,
        pattern: &str,
        replacement: &str,
    ) -> Result<&mut Self, ConfigurationError> {
        self.add(TextMode::Literal, pattern, replacement)
    }

    /// Add a rule to the table for `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Pattern`] if `pattern` is not a valid regex.
    pub fn add(
        &mut self,
        mode: TextMode,
        pattern: &str,
        replacement: &str,
    ) -> Result<&mut Self, ConfigurationError> {
        let regex = RegexBuilder::new(pattern)
            .multi_line(mode == TextMode::Normal)
            .build()
            .map_err(|source| ConfigurationError::Pattern {
                pattern: pattern.to_owned(),
                source,
            })?;

        let table = match mode {
            TextMode::Normal => &mut self.normal,
            TextMode::Literal => &mut self.literal,
        };

        if let Some(existing) = table.iter_mut().find(|s| s.pattern == pattern) {
            replacement.clone_into(&mut existing.replacement);
        } else {
            table.push(Substitution {
                pattern: pattern.to_owned(),
                regex,
                replacement: replacement.to_owned(),
            });
        }

        Ok(self)
    }

    /// Escape and apply the normal-mode table.
    #[must_use]
    pub fn apply_normal(&self, text: &str) -> String {
        self.apply(TextMode::Normal, text)
    }

    /// Escape and apply the literal-mode table.
    #[must_use]
    pub fn apply_literal(&self, text: &str) -> String {
        self.apply(TextMode::Literal, text)
    }

    /// Escape and apply the table for `mode`.
    #[must_use]
    pub fn apply(&self, mode: TextMode, text: &str) -> String {
        let table = match mode {
            TextMode::Normal => &self.normal,
            TextMode::Literal => &self.literal,
        };

        let mut formatted = (self.escape)(text);
        for rule in table {
            if let std::borrow::Cow::Owned(replaced) =
                rule.regex.replace_all(&formatted, rule.replacement.as_str())
            {
                formatted = replaced;
            }
        }
        formatted
    }

    /// Number of normal-mode rules.
    #[must_use]
    pub fn normal_len(&self) -> usize {
        self.normal.len()
    }

    /// Number of literal-mode rules.
    #[must_use]
    pub fn literal_len(&self) -> usize {
        self.literal.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tables_only_escape() {
        let tables = SubstitutionTables::new();
        assert_eq!(tables.apply_normal("<i>"), "&lt;i&gt;");
        assert_eq!(tables.apply_literal("<i>"), "&lt;i&gt;");
    }

    #[test]
    fn test_modes_use_separate_tables() {
        let mut tables = SubstitutionTables::new();
        tables.add_normal(":\\)", "&#9786;").unwrap();
        tables.add_literal("\t", "    ").unwrap();

        assert_eq!(tables.apply_normal("hi :)\t"), "hi &#9786;\t");
        assert_eq!(tables.apply_literal("hi :)\t"), "hi :)    ");
    }

    #[test]
    fn test_rules_run_after_escaping() {
        let mut tables = SubstitutionTables::new();
        tables.add_normal("&amp;", "and").unwrap();
        assert_eq!(tables.apply_normal("a & b"), "a and b");
    }

    #[test]
    fn test_rule_order() {
        // Later rules see the output of earlier rules
        let mut tables = SubstitutionTables::new();
        tables.add_normal("a", "bb").unwrap();
        tables.add_normal("bb", "c").unwrap();
        assert_eq!(tables.apply_normal("aaa"), "ccc");
    }

    #[test]
    fn test_capture_groups() {
        let mut tables = SubstitutionTables::new();
        tables.add_normal(r"\*(\w+)\*", "<em>$1</em>").unwrap();
        assert_eq!(tables.apply_normal("an *important* word"), "an <em>important</em> word");
    }

    #[test]
    fn test_normal_mode_is_multi_line() {
        let mut tables = SubstitutionTables::new();
        tables.add_normal("^-", "&bull;").unwrap();
        tables.add_literal("^-", "&bull;").unwrap();
        assert_eq!(tables.apply_normal("-a\n-b"), "&bull;a\n&bull;b");
        assert_eq!(tables.apply_literal("-a\n-b"), "&bull;a\n-b");
    }

    #[test]
    fn test_readding_pattern_keeps_position() {
        let mut tables = SubstitutionTables::new();
        tables.add_normal("x", "y").unwrap();
        tables.add_normal("y", "z").unwrap();
        tables.add_normal("x", "w").unwrap();
        assert_eq!(tables.normal_len(), 2);
        assert_eq!(tables.apply_normal("xy"), "wz");
    }

    #[test]
    fn test_invalid_pattern() {
        let mut tables = SubstitutionTables::new();
        let err = tables.add_literal("(", "").unwrap_err();
        assert!(matches!(err, ConfigurationError::Pattern { ref pattern, .. } if pattern == "("));
        assert_eq!(tables.literal_len(), 0);
    }

    #[test]
    fn test_custom_escaper() {
        fn upper(s: &str) -> String {
            s.to_uppercase()
        }
        let tables = SubstitutionTables::with_escaper(upper);
        assert_eq!(tables.apply_normal("<b>"), "<B>");
    }
}
