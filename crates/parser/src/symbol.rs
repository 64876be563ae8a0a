//! Term trees: atomic terms and parenthesised compound terms.
//!
//! - [`Symbol`]: one node of a parsed ruleset, either a [`Term`] or a list
//! - [`CompoundTerm`]: an ordered list of symbols, e.g. `(cell 1 1 b)`
//!
//! # Example
//! ```rust
//! use parser::{CompoundTerm, Symbol, Term};
//! let cell = CompoundTerm::new(vec![
//!     Symbol::Term(Term::new("cell")),
//!     Symbol::Term(Term::new("1")),
//!     Symbol::Term(Term::new("?x")),
//! ]);
//! assert!(cell.is_function());
//! assert!(!cell.is_ground());
//! assert_eq!(cell.to_string(), "(cell 1 ?x)");
//! ```

use crate::error::ParserError;
use crate::factory::SymbolFactory;
use crate::term::Term;
use crate::{Lexeme, Result, Rule};
use pest::iterators::Pair;
use std::fmt;

/// A node of a parsed term tree.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Term(Term),
    List(CompoundTerm),
}

impl Symbol {
    /// The atomic term, if this node is one.
    #[must_use]
    pub fn as_term(&self) -> Option<&Term> {
        match self {
            Self::Term(t) => Some(t),
            Self::List(_) => None,
        }
    }

    /// The compound term, if this node is one.
    #[must_use]
    pub fn as_list(&self) -> Option<&CompoundTerm> {
        match self {
            Self::Term(_) => None,
            Self::List(l) => Some(l),
        }
    }

    /// Whether this node is the constant `name`.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        matches!(self, Self::Term(t) if t.is(name))
    }

    /// True iff no variable is reachable from this node.
    #[must_use]
    pub fn is_ground(&self) -> bool {
        match self {
            Self::Term(t) => t.is_constant(),
            Self::List(l) => l.is_ground(),
        }
    }
}

impl From<Term> for Symbol {
    fn from(t: Term) -> Self {
        Self::Term(t)
    }
}

impl From<CompoundTerm> for Symbol {
    fn from(l: CompoundTerm) -> Self {
        Self::List(l)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Term(t) => write!(f, "{t}"),
            Self::List(l) => write!(f, "{l}"),
        }
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Lexeme for Symbol {
    /// Parse `list | symbol`, interning every atom through `factory`.
    fn from_parsed_rule(parsed_rule: Pair<Rule>, factory: &mut SymbolFactory) -> Result<Self> {
        match parsed_rule.as_rule() {
            Rule::symbol => Ok(Self::Term(factory.intern(parsed_rule.as_str()))),
            Rule::list => {
                let elements = parsed_rule
                    .into_inner()
                    .map(|pair| Self::from_parsed_rule(pair, factory))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::List(CompoundTerm::new(elements)))
            }
            other => Err(ParserError::UnexpectedRule(
                "symbol".to_string(),
                format!("{other:?}"),
            )),
        }
    }
}

/// An ordered list of symbols, e.g. a function application `(cell 1 1 b)`.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompoundTerm {
    elements: Vec<Symbol>,
}

impl CompoundTerm {
    #[must_use]
    pub fn new(elements: Vec<Symbol>) -> Self {
        Self { elements }
    }

    #[must_use]
    #[inline]
    pub fn elements(&self) -> &[Symbol] {
        &self.elements
    }

    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Symbol> {
        self.elements.iter()
    }

    #[must_use]
    pub fn get(&self, i: usize) -> Option<&Symbol> {
        self.elements.get(i)
    }

    /// Leading term, if the first element is atomic.
    #[must_use]
    pub fn functor(&self) -> Option<&Term> {
        self.elements.first().and_then(Symbol::as_term)
    }

    /// Whether the list is headed by the constant `name`.
    #[must_use]
    pub fn is_headed_by(&self, name: &str) -> bool {
        self.functor().is_some_and(|t| t.is(name))
    }

    /// A function application: headed by a constant functor.
    #[must_use]
    pub fn is_function(&self) -> bool {
        self.functor().is_some_and(Term::is_constant)
    }

    /// True iff no variable is reachable.
    #[must_use]
    pub fn is_ground(&self) -> bool {
        self.elements.iter().all(Symbol::is_ground)
    }

    /// Everything after the first element.
    #[must_use]
    pub fn tail(&self) -> &[Symbol] {
        self.elements.get(1..).unwrap_or(&[])
    }
}

impl<'a> IntoIterator for &'a CompoundTerm {
    type Item = &'a Symbol;
    type IntoIter = std::slice::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl fmt::Display for CompoundTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, e) in self.elements.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{e}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for CompoundTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
