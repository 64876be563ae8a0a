//! Rules, e.g. `(<= (next p) (does robot a) (not (true p)))`.

use super::terms::{collect_terms, Node};
use super::Literal;
use crate::error::ConstructionError;
use parser::{Symbol, Term};
use std::fmt;

/// A head literal derived from a conjunction of body literals.
#[derive(Clone, PartialEq, Eq)]
pub struct Rule {
    head: Literal,
    body: Vec<Literal>,
    /// Distinct terms of head then body, first occurrence wins.
    all_terms: Vec<Term>,
}

impl Rule {
    /// Classify the head and each body element.
    pub fn new(head: &Symbol, body: &[Symbol]) -> Result<Self, ConstructionError> {
        let head = Literal::classify(head)?;
        let body = body
            .iter()
            .map(Literal::classify)
            .collect::<Result<Vec<_>, _>>()?;

        let all_terms =
            collect_terms(std::iter::once(&head).chain(body.iter()).map(Node::Literal));

        Ok(Self {
            head,
            body,
            all_terms,
        })
    }

    #[must_use]
    #[inline]
    pub fn head(&self) -> &Literal {
        &self.head
    }

    #[must_use]
    #[inline]
    pub fn body(&self) -> &[Literal] {
        &self.body
    }

    #[must_use]
    #[inline]
    pub fn arity(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    #[inline]
    pub fn all_terms(&self) -> &[Term] {
        &self.all_terms
    }

    /// Constants in first-occurrence order.
    #[must_use]
    pub fn constants(&self) -> Vec<&Term> {
        self.all_terms.iter().filter(|t| t.is_constant()).collect()
    }

    /// Variables in first-occurrence order.
    #[must_use]
    pub fn variables(&self) -> Vec<&Term> {
        self.all_terms.iter().filter(|t| t.is_variable()).collect()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(<= {}", self.head)?;
        for lit in &self.body {
            write!(f, " {lit}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parser::parse_symbols;

    fn rule(text: &str) -> Result<Rule, ConstructionError> {
        let form = parse_symbols(text).expect("parse").remove(0);
        let list = form.as_list().expect("list");
        Rule::new(&list.elements()[1], &list.elements()[2..])
    }

    #[test]
    fn splits_constants_and_variables() {
        let r = rule("(<= (next (step ?y)) (true (step ?x)) (succ ?x ?y))").expect("rule");
        assert_eq!(r.arity(), 2);
        let constants: Vec<_> = r.constants().into_iter().map(Term::name).collect();
        let variables: Vec<_> = r.variables().into_iter().map(Term::name).collect();
        assert_eq!(constants, ["next", "step", "true", "succ"]);
        assert_eq!(variables, ["?y", "?x"]);
    }

    #[test]
    fn bare_head_and_empty_body() {
        let r = rule("(<= terminal)").expect("rule");
        assert!(matches!(r.head(), Literal::Single(_)));
        assert_eq!(r.arity(), 0);
        assert_eq!(r.to_string(), "(<= terminal)");
    }

    #[test]
    fn display_round_trips() {
        let text = "(<= (next p) (does robot a) (not (true p)))";
        assert_eq!(rule(text).expect("rule").to_string(), text);
    }

    #[test]
    fn malformed_body_fails() {
        assert!(matches!(
            rule("(<= (goal ?p 0) ?p)"),
            Err(ConstructionError::VariableLiteral(_))
        ));
    }
}
