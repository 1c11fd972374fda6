//! Error types for tag definition and substitution table construction.

/// Error raised while building a tag registry or substitution tables.
///
/// Interpretation itself never fails; every problem with a configuration is
/// reported here, at construction time.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// Tag definition without a name.
    #[error("the tag name of every tag definition must be a non-empty string")]
    EmptyTagName,

    /// Tag kind that is both literal and new-context.
    #[error("tag `{name}` may not be both literal and newcontext")]
    ConflictingKind {
        /// Offending tag name (empty when the kind is parsed on its own).
        name: String,
    },

    /// Unrecognised `type` value.
    #[error("unknown tag type `{0}`")]
    UnknownKind(String),

    /// Malformed open or close template.
    #[error("invalid template `{template}`: {message}")]
    Template {
        /// Template text as configured.
        template: String,
        /// What is wrong with it.
        message: String,
    },

    /// Substitution pattern that is not a valid regular expression.
    #[error("invalid substitution pattern `{pattern}`")]
    Pattern {
        /// Pattern text as configured.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },
}
