//! GDL Ruleset Reader
//!
//! Reads KIF-syntax game descriptions into term trees. The reader only
//! tokenizes s-expressions; it does not check that the result is valid GDL.
//! Callers classify the trees into facts and rules themselves.

pub mod error;
pub mod factory;
pub mod symbol;
pub mod term;


// Re-export core types for convenient access
pub use error::ParserError;
pub use factory::{parse_symbols, SymbolFactory};
pub use symbol::{CompoundTerm, Symbol};
pub use term::{Term, TermKind};

use pest::iterators::Pair;
use pest_derive::Parser;

pub type Result<T> = std::result::Result<T, ParserError>;

/// The reader is powered by Pest, a PEG parser framework.
#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct GdlParser;

/// Trait for converting Pest parse trees into term types.
pub trait Lexeme: Sized {
    /// Converts a Pest parse rule into a structured type, interning atoms
    /// through `factory`.
    fn from_parsed_rule(parsed_rule: Pair<Rule>, factory: &mut SymbolFactory) -> Result<Self>;
}
