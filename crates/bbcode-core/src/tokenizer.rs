//! Tokenizer splitting input into text runs and bracket tags.
//!
//! A tag is `[`, an optional `/`, one or more word characters, an optional
//! `=` followed by any characters except CR, LF and `]`, then `]`. Anything
//! else, including a lone `[`, is text. Adjacent text pieces are merged.

use std::sync::LazyLock;

use regex::Regex;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\[]+|\[(/?)(\w+)(?:(=)([^\r\n\]]*))?\]|\[").expect("invalid token regex")
});

/// A single token of input, borrowing from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Run of plain text.
    Text(&'a str),
    /// Opening tag: `[name]` or `[name=parameter]`.
    Open {
        /// Raw token text, used when the tag degrades to text.
        raw: &'a str,
        /// Tag name as written.
        name: &'a str,
        /// Parameter value; `Some("")` for `[name=]`.
        parameter: Option<&'a str>,
    },
    /// Closing tag: `[/name]`.
    Close {
        /// Raw token text, used when the tag degrades to text.
        raw: &'a str,
        /// Tag name as written.
        name: &'a str,
    },
}

impl<'a> Token<'a> {
    /// Source text of the token.
    #[must_use]
    pub fn raw(&self) -> &'a str {
        match *self {
            Self::Text(raw) | Self::Open { raw, .. } | Self::Close { raw, .. } => raw,
        }
    }
}

/// Split `input` into tokens.
///
/// # Example
///
/// ```
/// use bbcode_core::{Token, tokenize};
///
/// let tokens = tokenize("[b]hi[/b]");
/// assert_eq!(tokens[1], Token::Text("hi"));
/// ```
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    // Byte range of the pending text run
    let mut text: Option<(usize, usize)> = None;

    for caps in TOKEN_RE.captures_iter(input) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.is_empty() {
            continue;
        }

        let Some(name) = caps.get(2) else {
            text = Some(match text {
                Some((start, _)) => (start, whole.end()),
                None => (whole.start(), whole.end()),
            });
            continue;
        };

        if let Some((start, end)) = text.take() {
            tokens.push(Token::Text(&input[start..end]));
        }

        let raw = whole.as_str();
        let closing = caps.get(1).is_some_and(|m| !m.is_empty());
        if closing {
            tokens.push(Token::Close {
                raw,
                name: name.as_str(),
            });
        } else {
            let parameter = caps
                .get(3)
                .map(|_| caps.get(4).map_or("", |m| m.as_str()));
            tokens.push(Token::Open {
                raw,
                name: name.as_str(),
                parameter,
            });
        }
    }

    if let Some((start, end)) = text {
        tokens.push(Token::Text(&input[start..end]));
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(tokenize("hello world"), [Token::Text("hello world")]);
    }

    #[test]
    fn test_open_and_close() {
        assert_eq!(
            tokenize("[b]x[/b]"),
            [
                Token::Open {
                    raw: "[b]",
                    name: "b",
                    parameter: None
                },
                Token::Text("x"),
                Token::Close {
                    raw: "[/b]",
                    name: "b"
                },
            ]
        );
    }

    #[test]
    fn test_parameter() {
        assert_eq!(
            tokenize("[url=http://a.b/?q=1]"),
            [Token::Open {
                raw: "[url=http://a.b/?q=1]",
                name: "url",
                parameter: Some("http://a.b/?q=1"),
            }]
        );
    }

    #[test]
    fn test_empty_parameter_is_still_parameterized() {
        assert_eq!(
            tokenize("[quote=]"),
            [Token::Open {
                raw: "[quote=]",
                name: "quote",
                parameter: Some(""),
            }]
        );
    }

    #[test]
    fn test_close_with_parameter_resolves_by_name() {
        assert_eq!(
            tokenize("[/url=x]"),
            [Token::Close {
                raw: "[/url=x]",
                name: "url"
            }]
        );
    }

    #[test]
    fn test_stray_bracket_merges_into_text() {
        assert_eq!(tokenize("a [ b"), [Token::Text("a [ b")]);
        assert_eq!(
            tokenize("[[b]"),
            [
                Token::Text("["),
                Token::Open {
                    raw: "[b]",
                    name: "b",
                    parameter: None
                }
            ]
        );
    }

    #[test]
    fn test_malformed_tags_are_text() {
        assert_eq!(tokenize("[]"), [Token::Text("[]")]);
        assert_eq!(tokenize("[/]"), [Token::Text("[/]")]);
        assert_eq!(tokenize("[b c]"), [Token::Text("[b c]")]);
        assert_eq!(tokenize("[=x]"), [Token::Text("[=x]")]);
        assert_eq!(tokenize("[b"), [Token::Text("[b")]);
    }

    #[test]
    fn test_parameter_cannot_span_lines() {
        assert_eq!(tokenize("[url=a\nb]"), [Token::Text("[url=a\nb]")]);
    }

    #[test]
    fn test_unicode_names() {
        assert_eq!(
            tokenize("[ü]"),
            [Token::Open {
                raw: "[ü]",
                name: "ü",
                parameter: None
            }]
        );
    }

    #[test]
    fn test_raw() {
        let tokens = tokenize("a[i=1][/i]");
        let raws: Vec<_> = tokens.iter().map(Token::raw).collect();
        assert_eq!(raws, ["a", "[i=1]", "[/i]"]);
    }
}
