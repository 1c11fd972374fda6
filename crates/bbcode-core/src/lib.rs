//! Stack-based BBCode interpreter.
//!
//! Converts bracketed markup (`[b]bold[/b]`, `[url=...]link[/url]`) into an
//! output markup, typically HTML, keeping the output well nested however
//! malformed the input is.
//!
//! # Architecture
//!
//! ```text
//! input ── tokenize ──> [Token] ── ContextEngine ──> output
//!                                    │        │
//!                              TagRegistry  SubstitutionTables
//! ```
//!
//! - [`TagRegistry`]: tag definitions, looked up by name and parameterization
//! - [`SubstitutionTables`]: escaping plus regex rules for text runs
//! - [`tokenize`]: splits input into text runs and bracket tags
//! - [`ContextEngine`]: scope stack, literal mode and recovery rules
//! - [`Interpreter`]: owns a registry and tables, runs one engine per call
//!
//! # Example
//!
//! ```
//! use bbcode_core::{Interpreter, SubstitutionTables, TagKind, TagRegistry};
//!
//! let mut registry = TagRegistry::new();
//! registry
//!     .define("b", false, "<b>", "</b>", TagKind::Normal)?
//!     .define("i", false, "<i>", "</i>", TagKind::Normal)?;
//!
//! let interpreter = Interpreter::new(registry, SubstitutionTables::new());
//!
//! // Out-of-order closes are repaired
//! assert_eq!(interpreter.interpret("[b][i]x[/b]y"), "<b><i>x</i></b><i>y</i>");
//! # Ok::<(), bbcode_core::ConfigurationError>(())
//! ```

mod engine;
mod error;
mod html;
mod interpreter;
mod registry;
mod substitution;
mod tag;
mod template;
mod tokenizer;
mod url;

pub use engine::ContextEngine;
pub use error::ConfigurationError;
pub use html::escape_html;
pub use interpreter::Interpreter;
pub use registry::TagRegistry;
pub use substitution::{Escaper, SubstitutionTables, TextMode};
pub use tag::{TagDefinition, TagKind};
pub use template::Template;
pub use tokenizer::{Token, tokenize};
pub use url::sanitize_url;
