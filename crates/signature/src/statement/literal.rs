//! Literal types for rule heads and bodies.
//!
//! - Single: a bare constant, e.g. `terminal`
//! - Not: `(not (true p))`
//! - Distinct: `(distinct ?x ?y)`
//! - Or: `(or (true p) (true q))`
//! - Compound: any other list, e.g. `(legal robot a)`

use crate::error::ConstructionError;
use parser::{CompoundTerm, Symbol, Term};
use std::fmt;

/// A normalised rule head or body element.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Literal {
    /// Bare constant.
    Single(Term),
    /// Negation as failure.
    Not(Box<Literal>),
    /// Inequality of two terms.
    Distinct(Symbol, Symbol),
    /// Disjunction of literals.
    Or(Vec<Literal>),
    /// Relation application; the first element is the functor.
    Compound(CompoundTerm),
}

impl Literal {
    /// Classify a raw parsed node.
    pub fn classify(symbol: &Symbol) -> Result<Self, ConstructionError> {
        let list = match symbol {
            Symbol::Term(t) if t.is_constant() => return Ok(Self::Single(t.clone())),
            Symbol::Term(t) => return Err(ConstructionError::VariableLiteral(t.to_string())),
            Symbol::List(list) => list,
        };

        if list.is_empty() {
            return Err(ConstructionError::EmptyLiteral);
        }

        if list.is_headed_by("not") {
            return match list.elements() {
                [_, inner] => Ok(Self::Not(Box::new(Self::classify(inner)?))),
                _ => Err(ConstructionError::MalformedNot(list.to_string())),
            };
        }

        if list.is_headed_by("distinct") {
            return match list.elements() {
                [_, lhs, rhs] => Ok(Self::Distinct(lhs.clone(), rhs.clone())),
                _ => Err(ConstructionError::MalformedDistinct(list.to_string())),
            };
        }

        if list.is_headed_by("or") {
            let body = list
                .tail()
                .iter()
                .map(Self::classify)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Self::Or(body));
        }

        Ok(Self::Compound(list.clone()))
    }

    /// Relation name for single and compound literals.
    #[must_use]
    pub fn name(&self) -> Option<&Term> {
        match self {
            Self::Single(t) => Some(t),
            Self::Compound(c) => c.functor(),
            Self::Not(_) | Self::Distinct(..) | Self::Or(_) => None,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(t) => write!(f, "{t}"),
            Self::Not(inner) => write!(f, "(not {inner})"),
            Self::Distinct(lhs, rhs) => write!(f, "(distinct {lhs} {rhs})"),
            Self::Or(body) => {
                write!(f, "(or")?;
                for lit in body {
                    write!(f, " {lit}")?;
                }
                write!(f, ")")
            }
            Self::Compound(c) => write!(f, "{c}"),
        }
    }
}

impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Delegate Debug to Display
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parser::parse_symbols;

    fn one(text: &str) -> Symbol {
        parse_symbols(text)
            .expect("parse")
            .into_iter()
            .next()
            .expect("one form")
    }

    #[test]
    fn classifies_each_variant() {
        assert!(matches!(
            Literal::classify(&one("terminal")).unwrap(),
            Literal::Single(_)
        ));
        assert!(matches!(
            Literal::classify(&one("(not (true p))")).unwrap(),
            Literal::Not(_)
        ));
        assert!(matches!(
            Literal::classify(&one("(distinct ?x (f a))")).unwrap(),
            Literal::Distinct(..)
        ));
        assert!(matches!(
            Literal::classify(&one("(true (control ?p))")).unwrap(),
            Literal::Compound(_)
        ));

        match Literal::classify(&one("(or (true p) open)")).unwrap() {
            Literal::Or(body) => {
                assert_eq!(body.len(), 2);
                assert!(matches!(body[0], Literal::Compound(_)));
                assert!(matches!(body[1], Literal::Single(_)));
            }
            other => panic!("expected or literal, got {other}"),
        }
    }

    #[test]
    fn nested_not_is_classified_recursively() {
        match Literal::classify(&one("(not (or p q))")).unwrap() {
            Literal::Not(inner) => assert!(matches!(*inner, Literal::Or(_))),
            other => panic!("expected not literal, got {other}"),
        }
    }

    #[test]
    fn rejects_malformed_shapes() {
        assert!(matches!(
            Literal::classify(&one("?x")),
            Err(ConstructionError::VariableLiteral(_))
        ));
        assert_eq!(
            Literal::classify(&one("()")),
            Err(ConstructionError::EmptyLiteral)
        );
        assert!(matches!(
            Literal::classify(&one("(not a b)")),
            Err(ConstructionError::MalformedNot(_))
        ));
        assert!(matches!(
            Literal::classify(&one("(distinct a)")),
            Err(ConstructionError::MalformedDistinct(_))
        ));
    }

    #[test]
    fn display_and_name() {
        let lit = Literal::classify(&one("(not (distinct ?x b))")).unwrap();
        assert_eq!(lit.to_string(), "(not (distinct ?x b))");
        assert!(matches!(lit, Literal::Not(_)));
        assert_eq!(lit.name(), None);

        let lit = Literal::classify(&one("(legal robot a)")).unwrap();
        assert_eq!(lit.name().map(Term::name), Some("legal"));
    }
}
