//! Interpreter entry point.

use crate::{ContextEngine, SubstitutionTables, TagRegistry, tokenize};

/// A configured interpreter: tag registry plus substitution tables.
///
/// Interpretation borrows the interpreter immutably and keeps all of its
/// working state per call, so one interpreter can serve many threads.
///
/// # Example
///
/// ```
/// use bbcode_core::{Interpreter, SubstitutionTables, TagKind, TagRegistry};
///
/// let mut registry = TagRegistry::new();
/// registry.define("i", false, "<em>", "</em>", TagKind::Normal).unwrap();
///
/// let interpreter = Interpreter::new(registry, SubstitutionTables::new());
/// assert_eq!(interpreter.interpret("[i]a < b"), "<em>a &lt; b</em>");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    registry: TagRegistry,
    tables: SubstitutionTables,
}

impl Interpreter {
    /// Create an interpreter.
    #[must_use]
    pub fn new(registry: TagRegistry, tables: SubstitutionTables) -> Self {
        Self { registry, tables }
    }

    /// Interpret `input`, returning fully closed output.
    ///
    /// Never fails: unknown or unmatched tags are emitted as text.
    #[must_use]
    pub fn interpret(&self, input: &str) -> String {
        if input.is_empty() {
            return String::new();
        }

        let mut engine = ContextEngine::new(&self.registry, &self.tables);
        for token in tokenize(input) {
            engine.process(token);
        }
        engine.finish()
    }

    /// Interpret optional input; `None` yields an empty string.
    #[must_use]
    pub fn interpret_opt(&self, input: Option<&str>) -> String {
        input.map_or_else(String::new, |input| self.interpret(input))
    }

    /// Tag registry.
    #[must_use]
    pub fn registry(&self) -> &TagRegistry {
        &self.registry
    }

    /// Substitution tables.
    #[must_use]
    pub fn tables(&self) -> &SubstitutionTables {
        &self.tables
    }
}
