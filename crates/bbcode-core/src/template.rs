//! Positional output templates.
//!
//! Templates use composite-format placeholders: `{0}`, `{1}`, with `{{` and
//! `}}` standing for literal braces. Open templates take one argument (the
//! escaped tag parameter), close templates take two (the tag parameter and the
//! accumulated literal contents).

use crate::ConfigurationError;

/// Number of arguments an open template receives.
pub(crate) const OPEN_ARITY: usize = 1;

/// Number of arguments a close template receives.
pub(crate) const CLOSE_ARITY: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Arg(usize),
}

/// A parsed template with a fixed number of positional slots.
///
/// Parsing validates every placeholder against the arity, so rendering
/// cannot fail.
///
/// # Example
///
/// ```
/// use bbcode_core::Template;
///
/// let template = Template::parse(r#"<a href="{0}">"#, 1).unwrap();
/// assert_eq!(template.render(&["https://example.com"]), r#"<a href="https://example.com">"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse `source`, allowing placeholders `{0}` through `{arity - 1}`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Template`] for an out-of-range index, an
    /// unterminated or non-numeric placeholder, or an unescaped `}`.
    pub fn parse(source: &str, arity: usize) -> Result<Self, ConfigurationError> {
        let invalid = |message: String| ConfigurationError::Template {
            template: source.to_owned(),
            message,
        };

        let mut segments = Vec::new();
        let mut text = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if chars.peek().is_some_and(|&(_, next)| next == '{') => {
                    chars.next();
                    text.push('{');
                }
                '}' if chars.peek().is_some_and(|&(_, next)| next == '}') => {
                    chars.next();
                    text.push('}');
                }
                '{' => {
                    let mut digits = String::new();
                    let mut closed = false;
                    for (_, d) in chars.by_ref() {
                        if d == '}' {
                            closed = true;
                            break;
                        }
                        digits.push(d);
                    }
                    if !closed {
                        return Err(invalid(format!("unterminated placeholder at {pos}")));
                    }
                    let index: usize = digits
                        .trim()
                        .parse()
                        .map_err(|_| invalid(format!("placeholder `{{{digits}}}` is not an index")))?;
                    if index >= arity {
                        return Err(invalid(format!(
                            "placeholder {{{index}}} exceeds the {arity} available argument(s)"
                        )));
                    }
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Arg(index));
                }
                '}' => return Err(invalid(format!("unescaped `}}` at {pos}"))),
                _ => text.push(c),
            }
        }

        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Ok(Self {
            source: source.to_owned(),
            segments,
        })
    }

    /// Substitute `args` into the template.
    ///
    /// Missing arguments render as empty strings.
    #[must_use]
    pub fn render(&self, args: &[&str]) -> String {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Arg(index) => out.push_str(args.get(*index).copied().unwrap_or_default()),
            }
        }
        out
    }

    /// Template text as configured.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }
}
