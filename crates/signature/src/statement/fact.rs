//! Ground facts, e.g. `(init (cell 1 1 b))`.

use super::terms::{collect_terms, Node};
use crate::error::ConstructionError;
use parser::{Symbol, Term};
use std::fmt;

/// A keyword applied to ground arguments.
///
/// Arguments are either constants or one-level function applications such as
/// `(cell 1 1 b)`.
#[derive(Clone, PartialEq, Eq)]
pub struct Fact {
    head: Term,
    body: Vec<Symbol>,
    all_terms: Vec<Term>,
}

impl Fact {
    /// Build a fact; every reachable term must be a constant.
    pub fn new(head: &Symbol, body: Vec<Symbol>) -> Result<Self, ConstructionError> {
        let head = head
            .as_term()
            .cloned()
            .ok_or_else(|| ConstructionError::FactHeadNotTerm(head.to_string()))?;

        for e in &body {
            if let Symbol::List(list) = e {
                if !list.is_function() {
                    return Err(ConstructionError::NotAFunction(list.to_string()));
                }
            }
        }

        let head_symbol = Symbol::Term(head.clone());
        let all_terms = collect_terms(
            std::iter::once(Node::Symbol(&head_symbol)).chain(body.iter().map(Node::Symbol)),
        );
        let fact = Self {
            head,
            body,
            all_terms,
        };
        if fact.all_terms.iter().any(Term::is_variable) {
            return Err(ConstructionError::NonGroundFact(fact.to_string()));
        }
        Ok(fact)
    }

    /// Keyword of the fact.
    #[must_use]
    #[inline]
    pub fn head(&self) -> &Term {
        &self.head
    }

    #[must_use]
    #[inline]
    pub fn body(&self) -> &[Symbol] {
        &self.body
    }

    #[must_use]
    #[inline]
    pub fn arity(&self) -> usize {
        self.body.len()
    }

    /// Distinct terms in first-occurrence order.
    #[must_use]
    #[inline]
    pub fn all_terms(&self) -> &[Term] {
        &self.all_terms
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.head)?;
        for e in &self.body {
            write!(f, " {e}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parser::parse_symbols;

    fn fact(text: &str) -> Result<Fact, ConstructionError> {
        let form = parse_symbols(text).expect("parse").remove(0);
        let list = form.as_list().expect("list");
        Fact::new(&list.elements()[0], list.tail().to_vec())
    }

    #[test]
    fn builds_ground_fact() {
        let f = fact("(init (cell 1 1 b))").expect("fact");
        assert_eq!(f.head().name(), "init");
        assert_eq!(f.arity(), 1);
        let names: Vec<_> = f.all_terms().iter().map(Term::name).collect();
        assert_eq!(names, ["init", "cell", "1", "b"]);
        assert_eq!(f.to_string(), "(init (cell 1 1 b))");
    }

    #[test]
    fn rejects_variables() {
        assert!(matches!(
            fact("(init (cell ?x 1 b))"),
            Err(ConstructionError::NonGroundFact(_))
        ));
        assert!(matches!(
            fact("(succ ?x 2)"),
            Err(ConstructionError::NonGroundFact(_))
        ));
    }

    #[test]
    fn rejects_non_function_arguments() {
        assert!(matches!(
            fact("(init (?f 1))"),
            Err(ConstructionError::NotAFunction(_))
        ));
        assert!(matches!(
            fact("(init ())"),
            Err(ConstructionError::NotAFunction(_))
        ));
    }

    #[test]
    fn rejects_compound_head() {
        let form = parse_symbols("((f a) b)").expect("parse").remove(0);
        let list = form.as_list().expect("list");
        assert!(matches!(
            Fact::new(&list.elements()[0], list.tail().to_vec()),
            Err(ConstructionError::FactHeadNotTerm(_))
        ));
    }
}
