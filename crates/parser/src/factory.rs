//! Interning reader turning KIF text into term trees.

use crate::symbol::Symbol;
use crate::term::Term;
use crate::{GdlParser, Lexeme, ParserError, Result, Rule};
use pest::Parser;
use std::collections::HashSet;
use std::sync::Arc;

/// Reads rulesets and interns every atom so equal spellings share storage.
#[derive(Debug, Default)]
pub struct SymbolFactory {
    interned: HashSet<Arc<str>>,
}

impl SymbolFactory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The shared term for `name`.
    pub fn intern(&mut self, name: &str) -> Term {
        if let Some(shared) = self.interned.get(name) {
            return Term::from_shared(Arc::clone(shared));
        }
        let shared: Arc<str> = Arc::from(name);
        self.interned.insert(Arc::clone(&shared));
        Term::from_shared(shared)
    }

    /// Number of distinct spellings seen so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interned.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interned.is_empty()
    }

    /// Parse every top-level form of `text`, in source order.
    pub fn to_symbols(&mut self, text: &str) -> Result<Vec<Symbol>> {
        let top = GdlParser::parse(Rule::main_grammar, text)
            .map_err(|e| ParserError::Syntax(e.to_string()))?
            .next()
            .ok_or(ParserError::EmptyParse)?;

        top.into_inner()
            .filter(|pair| pair.as_rule() != Rule::EOI)
            .map(|pair| Symbol::from_parsed_rule(pair, self))
            .collect()
    }
}

/// Parse `text` with a fresh factory.
pub fn parse_symbols(text: &str) -> Result<Vec<Symbol>> {
    SymbolFactory::new().to_symbols(text)
}
