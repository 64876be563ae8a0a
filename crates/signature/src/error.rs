//! Error types for statement construction and constant resolution.

use crate::encoding::SyntheticId;
use parser::Term;
use thiserror::Error;

/// A ruleset statement violates the shape the statement model requires.
///
/// These signal a bug in whatever produced the term tree and abort the
/// current operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("Construction error: fact keyword must be a single term, found {0}")]
    FactHeadNotTerm(String),
    #[error("Construction error: fact contains a non-constant term: {0}")]
    NonGroundFact(String),
    #[error("Construction error: expected a function application, found {0}")]
    NotAFunction(String),
    #[error("Construction error: a bare variable cannot be a literal: {0}")]
    VariableLiteral(String),
    #[error("Construction error: empty list cannot be a literal")]
    EmptyLiteral,
    #[error("Construction error: 'not' takes exactly one argument: {0}")]
    MalformedNot(String),
    #[error("Construction error: 'distinct' takes exactly two arguments: {0}")]
    MalformedDistinct(String),
    #[error("Construction error: 'role' fact must name exactly one constant: {0}")]
    MalformedRole(String),
    #[error("Construction error: malformed top-level statement: {0}")]
    MalformedStatement(String),
}

/// The resolver could not recover a complete constant mapping.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Resolve error: numbered and valued signatures differ in shape for {statement}")]
    ShapeMismatch { statement: String },
    #[error("Resolve error: bucket {hash:#018x} mixes rows of length {expected} and {found}")]
    RowLengthMismatch {
        hash: u64,
        expected: usize,
        found: usize,
    },
    #[error("Resolve error: id {id} is bound to {committed}, not {conflicting}")]
    Inconsistent {
        id: SyntheticId,
        committed: Term,
        conflicting: Term,
    },
    #[error("Resolve error: {pending} bucket(s) still ambiguous after {passes} pass(es)")]
    Unresolvable { pending: usize, passes: usize },
}
