//! Context engine: the stack machine that turns tokens into output.
//!
//! # Scopes
//!
//! Open tags live in a stack of scopes. The root scope always exists; opening
//! a [`TagKind::NewContext`](crate::TagKind::NewContext) tag pushes a new
//! scope on top of the one the tag itself was pushed into, so the opener of
//! every nested scope sits at the top of its parent scope.
//!
//! ```text
//! [quote][b][list][i]x
//!
//! root:    quote
//! scope 1: b, list
//! scope 2: i
//! ```
//!
//! # Recovery
//!
//! - Closing a tag that opened a scope closes everything inside that scope
//!   first, cascading outward through any nested scopes in between.
//! - Closing a tag out of order within a scope closes the tags above it and
//!   reopens them afterwards.
//! - Closing tags with no reachable opener, and unknown tags, are emitted as
//!   text.
//! - Everything still open at end of input is closed, innermost first.
//!
//! # Literal contents
//!
//! Text rendered while a literal tag is innermost is also collected into a
//! single buffer. The buffer is handed to every close template as its second
//! argument and cleared after every close, whichever tag is closing.

use std::ptr;

use crate::{SubstitutionTables, TagDefinition, TagRegistry, Token};

/// An open tag.
#[derive(Debug, Clone, Copy)]
struct TagInstance<'a> {
    tag: &'a TagDefinition,
    parameter: &'a str,
}

type Scope<'a> = Vec<TagInstance<'a>>;

/// Stack of scopes with a root that is never popped.
#[derive(Debug, Default)]
struct ScopeStack<'a> {
    root: Scope<'a>,
    nested: Vec<Scope<'a>>,
}

impl<'a> ScopeStack<'a> {
    fn current(&self) -> &Scope<'a> {
        self.nested.last().unwrap_or(&self.root)
    }

    fn current_mut(&mut self) -> &mut Scope<'a> {
        self.nested.last_mut().unwrap_or(&mut self.root)
    }

    /// Number of scopes, root included.
    fn depth(&self) -> usize {
        self.nested.len() + 1
    }

    fn push_scope(&mut self) {
        self.nested.push(Scope::new());
    }

    /// Pop the current scope. Returns `None` at the root.
    fn pop_scope(&mut self) -> Option<Scope<'a>> {
        self.nested.pop()
    }

    /// Scopes from outermost to innermost.
    fn iter(&self) -> impl Iterator<Item = &Scope<'a>> {
        std::iter::once(&self.root).chain(&self.nested)
    }
}

/// Interprets a token stream against a tag registry.
///
/// One engine handles one input; create a fresh engine per call.
///
/// # Example
///
/// ```
/// use bbcode_core::{ContextEngine, SubstitutionTables, TagKind, TagRegistry, tokenize};
///
/// let mut registry = TagRegistry::new();
/// registry.define("b", false, "<b>", "</b>", TagKind::Normal).unwrap();
/// let tables = SubstitutionTables::new();
///
/// let mut engine = ContextEngine::new(&registry, &tables);
/// for token in tokenize("[b]bold") {
///     engine.process(token);
/// }
/// assert_eq!(engine.finish(), "<b>bold</b>");
/// ```
#[derive(Debug)]
pub struct ContextEngine<'a> {
    registry: &'a TagRegistry,
    tables: &'a SubstitutionTables,
    output: String,
    literal_contents: String,
    scopes: ScopeStack<'a>,
}

impl<'a> ContextEngine<'a> {
    /// Create an engine with an empty root scope.
    #[must_use]
    pub fn new(registry: &'a TagRegistry, tables: &'a SubstitutionTables) -> Self {
        Self {
            registry,
            tables,
            output: String::new(),
            literal_contents: String::new(),
            scopes: ScopeStack::default(),
        }
    }

    /// Consume one token.
    pub fn process(&mut self, token: Token<'a>) {
        if let Some(literal) = self.innermost_literal() {
            let terminates =
                matches!(token, Token::Close { name, .. } if literal.matches_name(name));
            if !terminates {
                self.push_literal(token.raw());
                return;
            }
        }

        match token {
            Token::Text(text) => self.push_normal(text),
            Token::Open {
                raw,
                name,
                parameter,
            } => self.open(raw, name, parameter),
            Token::Close { raw, name } => self.close(raw, name),
        }
    }

    /// Close everything still open and return the output.
    #[must_use]
    pub fn finish(mut self) -> String {
        loop {
            while let Some(instance) = self.scopes.current_mut().pop() {
                self.emit_close(instance);
            }
            if self.scopes.pop_scope().is_none() {
                break;
            }
        }
        self.output
    }

    fn innermost_literal(&self) -> Option<&'a TagDefinition> {
        self.scopes
            .current()
            .last()
            .map(|instance| instance.tag)
            .filter(|tag| tag.is_literal())
    }

    fn open(&mut self, raw: &'a str, name: &'a str, parameter: Option<&'a str>) {
        let registry = self.registry;
        let Some(tag) = registry.find_open(name, parameter.is_some()) else {
            tracing::trace!(tag = name, "Unknown opening tag emitted as text");
            self.push_normal(raw);
            return;
        };

        let instance = TagInstance {
            tag,
            parameter: parameter.unwrap_or_default(),
        };
        self.scopes.current_mut().push(instance);
        self.emit_open(instance);

        if tag.is_new_context() {
            self.scopes.push_scope();
        }
    }

    fn close(&mut self, raw: &'a str, name: &'a str) {
        let registry = self.registry;
        let candidates = registry.find_all_by_name(name);
        if candidates.is_empty() {
            tracing::trace!(tag = name, "Unknown closing tag emitted as text");
            self.push_normal(raw);
            return;
        }

        let is_candidate = |tag: &TagDefinition| candidates.iter().any(|c| ptr::eq(*c, tag));

        // Outermost scope whose top tag opened the scope above it
        let exit = self.scopes.iter().position(|scope| {
            scope
                .last()
                .is_some_and(|instance| instance.tag.is_new_context() && is_candidate(instance.tag))
        });

        match exit {
            Some(index) if index + 1 < self.scopes.depth() => self.exit_context(index, name),
            _ => self.close_in_scope(raw, name, is_candidate),
        }
    }

    /// Close scopes down to and including the opener at the top of scope `index`.
    fn exit_context(&mut self, index: usize, name: &str) {
        loop {
            while let Some(instance) = self.scopes.current_mut().pop() {
                self.emit_close(instance);
            }
            if self.scopes.pop_scope().is_none() {
                break;
            }
            let Some(opener) = self.scopes.current_mut().pop() else {
                break;
            };
            self.emit_close(opener);

            if self.scopes.depth() == index + 1 {
                break;
            }
            tracing::debug!(
                closed = opener.tag.name(),
                target = name,
                "Closed a sub-context"
            );
        }
    }

    /// Close the most recent matching tag of the current scope, reopening
    /// anything that was opened after it.
    fn close_in_scope(
        &mut self,
        raw: &'a str,
        name: &str,
        is_candidate: impl Fn(&TagDefinition) -> bool,
    ) {
        let Some(position) = self
            .scopes
            .current()
            .iter()
            .rposition(|instance| is_candidate(instance.tag))
        else {
            tracing::trace!(tag = name, "Closing tag without open tag emitted as text");
            self.push_normal(raw);
            return;
        };

        let held = self.scopes.current_mut().split_off(position + 1);
        for instance in held.iter().rev() {
            self.emit_close(*instance);
        }

        if let Some(matched) = self.scopes.current_mut().pop() {
            self.emit_close(matched);
        }

        for instance in held {
            self.scopes.current_mut().push(instance);
            self.emit_open(instance);
        }
    }

    fn emit_open(&mut self, instance: TagInstance<'a>) {
        let parameter = self.tables.apply_literal(instance.parameter);
        self.output.push_str(&instance.tag.render_open(&parameter));
    }

    fn emit_close(&mut self, instance: TagInstance<'a>) {
        self.output.push_str(
            &instance
                .tag
                .render_close(instance.parameter, &self.literal_contents),
        );
        self.literal_contents.clear();
    }

    fn push_literal(&mut self, text: &str) {
        let rendered = self.tables.apply_literal(text);
        self.output.push_str(&rendered);
        self.literal_contents.push_str(&rendered);
    }

    fn push_normal(&mut self, text: &str) {
        self.output.push_str(&self.tables.apply_normal(text));
    }
}
