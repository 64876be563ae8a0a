//! Ordered, deduplicated term extraction over term trees and literals.

use super::Literal;
use parser::{Symbol, Term};
use std::collections::HashSet;

/// A node visited during extraction.
#[derive(Clone, Copy)]
pub(crate) enum Node<'a> {
    Symbol(&'a Symbol),
    Literal(&'a Literal),
}

/// Every term reachable from `roots`, left to right, first occurrence wins.
///
/// Uses an explicit stack; children are pushed in reverse so they pop in
/// source order.
pub(crate) fn collect_terms<'a>(roots: impl IntoIterator<Item = Node<'a>>) -> Vec<Term> {
    let mut stack: Vec<Node<'a>> = roots.into_iter().collect();
    stack.reverse();

    let mut seen: HashSet<&'a Term> = HashSet::new();
    let mut out = Vec::new();
    let mut visit = |t: &'a Term, out: &mut Vec<Term>| {
        if seen.insert(t) {
            out.push(t.clone());
        }
    };

    while let Some(node) = stack.pop() {
        match node {
            Node::Symbol(Symbol::Term(t)) => visit(t, &mut out),
            Node::Symbol(Symbol::List(list)) => {
                stack.extend(list.iter().rev().map(Node::Symbol));
            }
            Node::Literal(Literal::Single(t)) => visit(t, &mut out),
            Node::Literal(Literal::Not(inner)) => stack.push(Node::Literal(inner)),
            Node::Literal(Literal::Distinct(lhs, rhs)) => {
                stack.push(Node::Symbol(rhs));
                stack.push(Node::Symbol(lhs));
            }
            Node::Literal(Literal::Or(body)) => {
                stack.extend(body.iter().rev().map(Node::Literal));
            }
            Node::Literal(Literal::Compound(c)) => {
                stack.extend(c.iter().rev().map(Node::Symbol));
            }
        }
    }

    out
}
