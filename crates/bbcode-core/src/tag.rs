//! Tag definitions.

use std::fmt;
use std::str::FromStr;

use crate::ConfigurationError;
use crate::template::{CLOSE_ARITY, OPEN_ARITY, Template};

/// How a tag affects interpretation of the text it encloses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TagKind {
    /// Ordinary formatting tag.
    #[default]
    Normal,
    /// Body is not interpreted: bracket syntax other than the tag's own
    /// closing tag is emitted as text.
    Literal,
    /// Opens a new scope. Closing it closes everything opened inside it.
    NewContext,
}

impl TagKind {
    /// Build a kind from independent literal / new-context flags.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::ConflictingKind`] when both flags are set.
    pub fn from_flags(literal: bool, new_context: bool) -> Result<Self, ConfigurationError> {
        match (literal, new_context) {
            (true, true) => Err(ConfigurationError::ConflictingKind {
                name: String::new(),
            }),
            (true, false) => Ok(Self::Literal),
            (false, true) => Ok(Self::NewContext),
            (false, false) => Ok(Self::Normal),
        }
    }

    /// Configuration keyword for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Literal => "literal",
            Self::NewContext => "newcontext",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a configuration `type` value.
///
/// Accepts `normal`, `literal` and `newcontext` in any case. Several values
/// separated by `,` or `|` are combined as flags.
impl FromStr for TagKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut literal = false;
        let mut new_context = false;

        for part in s.split([',', '|']).map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "normal" => {}
                "literal" => literal = true,
                "newcontext" => new_context = true,
                _ => return Err(ConfigurationError::UnknownKind(s.to_owned())),
            }
        }

        Self::from_flags(literal, new_context)
    }
}

/// Static rule describing how one tag is recognised and rendered.
///
/// The lookup key is `(name, parameterized)`; names compare case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagDefinition {
    name: String,
    key: String,
    parameterized: bool,
    open: Template,
    close: Template,
    kind: TagKind,
}

impl TagDefinition {
    /// Create a definition, parsing its templates.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EmptyTagName`] for an empty name and
    /// [`ConfigurationError::Template`] for a malformed template.
    pub fn new(
        name: impl Into<String>,
        parameterized: bool,
        open: &str,
        close: &str,
        kind: TagKind,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ConfigurationError::EmptyTagName);
        }

        Ok(Self {
            key: normalize_name(&name),
            name,
            parameterized,
            open: Template::parse(open, OPEN_ARITY)?,
            close: Template::parse(close, CLOSE_ARITY)?,
            kind,
        })
    }

    /// Tag name as configured.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the tag is opened as `[name=value]` rather than `[name]`.
    #[must_use]
    pub fn parameterized(&self) -> bool {
        self.parameterized
    }

    /// Tag kind.
    #[must_use]
    pub fn kind(&self) -> TagKind {
        self.kind
    }

    /// Whether the tag body is literal.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.kind == TagKind::Literal
    }

    /// Whether the tag opens a new scope.
    #[must_use]
    pub fn is_new_context(&self) -> bool {
        self.kind == TagKind::NewContext
    }

    /// Case-insensitive name comparison.
    #[must_use]
    pub fn matches_name(&self, name: &str) -> bool {
        self.key == normalize_name(name)
    }

    /// Render the open template with an already-escaped parameter.
    #[must_use]
    pub fn render_open(&self, parameter: &str) -> String {
        self.open.render(&[parameter])
    }

    /// Render the close template.
    #[must_use]
    pub fn render_close(&self, parameter: &str, literal_contents: &str) -> String {
        self.close.render(&[parameter, literal_contents])
    }

    pub(crate) fn key(&self) -> &str {
        &self.key
    }
}

/// Case-folded lookup key for a tag name.
pub(crate) fn normalize_name(name: &str) -> String {
    name.to_uppercase()
}
