//! Ruleset fingerprints.
//!
//! Statements are grouped by root keyword and fed to one
//! [`SignatureFactory`] in a canonical order: the ten reserved keywords
//! first, then every other keyword in first-encounter order, facts before
//! rules. The fingerprint is the hash of the sorted per-statement zero hashes,
//! so it does not depend on statement order within the text.

use crate::error::CatalogError;
use common::compute_fp;
use itertools::Itertools;
use parser::{parse_symbols, Symbol, Term};
use signature::{ConstructionError, Fact, Rule, SignatureFactory, SignatureRun, ROOT_KEYWORDS};
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Fingerprint of a ruleset together with the signature run it came from.
#[derive(Debug, Clone)]
pub struct Index {
    fingerprint: u64,
    run: SignatureRun,
}

impl Index {
    #[must_use]
    #[inline]
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    #[must_use]
    #[inline]
    pub fn run(&self) -> &SignatureRun {
        &self.run
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:#018x} ({} statements, {} roles)",
            self.fingerprint,
            self.run.len(),
            self.run.roles().len()
        )
    }
}

/// Statements grouped by keyword, reserved keywords first.
struct Grouped<T> {
    order: Vec<Term>,
    groups: HashMap<Term, Vec<T>>,
}

impl<T: fmt::Display> Grouped<T> {
    fn new() -> Self {
        let order: Vec<Term> = ROOT_KEYWORDS.iter().map(|k| Term::new(k)).collect();
        let groups = order.iter().map(|k| (k.clone(), Vec::new())).collect();
        Self { order, groups }
    }

    fn push(&mut self, keyword: Term, item: T) {
        if !self.groups.contains_key(&keyword) {
            self.order.push(keyword.clone());
        }
        self.groups.entry(keyword).or_default().push(item);
    }

    fn iter(&self) -> impl Iterator<Item = (&Term, &[T])> {
        self.order.iter().map(|k| {
            let items = self.groups.get(k).map_or(&[][..], Vec::as_slice);
            (k, items)
        })
    }

    fn log(&self, kind: &str) {
        for (keyword, items) in self.iter().filter(|(_, items)| !items.is_empty()) {
            debug!("{} {}: {}", kind, keyword, items.iter().join(" "));
        }
    }
}

/// Parse `text` and compute its fingerprint.
pub fn fingerprint(text: &str) -> Result<Index, CatalogError> {
    let mut facts = Grouped::<Fact>::new();
    let mut rules = Grouped::<Rule>::new();

    for form in parse_symbols(text)? {
        let malformed = || ConstructionError::MalformedStatement(form.to_string());
        let list = form.as_list().ok_or_else(malformed)?;

        if list.is_headed_by("<=") {
            let head = list.get(1).ok_or_else(malformed)?;
            let rule = Rule::new(head, &list.elements()[2..])?;
            let keyword = rule.head().name().cloned().ok_or_else(malformed)?;
            rules.push(keyword, rule);
        } else {
            let head: &Symbol = list.get(0).ok_or_else(malformed)?;
            let fact = Fact::new(head, list.tail().to_vec())?;
            facts.push(fact.head().clone(), fact);
        }
    }

    facts.log("Facts");
    rules.log("Rules");

    let mut factory = SignatureFactory::new();
    for (_, group) in facts.iter() {
        for fact in group {
            factory.add_fact(fact)?;
        }
    }
    for (_, group) in rules.iter() {
        for rule in group {
            factory.add_rule(rule)?;
        }
    }
    let run = factory.finish();

    let mut hashes: Vec<u64> = run.signatures().iter().map(|s| s.zero_sig_hash()).collect();
    hashes.sort_unstable();
    let fingerprint = compute_fp(&hashes);

    debug!(
        "Fingerprint {:#018x} from {} statement(s)",
        fingerprint,
        hashes.len()
    );
    Ok(Index { fingerprint, run })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUTTONS: &str = "
        (role robot)
        (base p) (base q)
        (input robot a) (input robot b)
        (<= (legal robot a))
        (<= (next p) (does robot a) (not (true p)))
        (<= terminal (true p) (true q))
        (<= (goal robot 100) (true p))
    ";

    #[test]
    fn statement_order_does_not_matter() {
        let shuffled = "
            (<= (goal robot 100) (true p))
            (input robot b) (base q)
            (<= terminal (true p) (true q))
            (role robot) (input robot a)
            (<= (next p) (does robot a) (not (true p)))
            (base p)
            (<= (legal robot a))
        ";
        assert_eq!(
            fingerprint(BUTTONS).unwrap().fingerprint(),
            fingerprint(shuffled).unwrap().fingerprint()
        );
    }

    #[test]
    fn reserved_keywords_are_fed_first() {
        let index = fingerprint("(succ 1 2) (base p) (role robot)").unwrap();
        let statements: Vec<&str> = index
            .run()
            .signatures()
            .iter()
            .map(|s| s.statement())
            .collect();
        assert_eq!(statements, ["(role robot)", "(base p)", "(succ 1 2)"]);
    }

    #[test]
    fn facts_precede_rules() {
        let index = fingerprint("(<= (next p) (true q)) (init q)").unwrap();
        assert_eq!(index.run().signatures()[0].statement(), "(init q)");
        assert_eq!(index.run().signatures()[1].statement(), "(<= (next p) (true q))");
    }

    #[test]
    fn renaming_variables_and_constants_keeps_fingerprint() {
        let a = "(role x) (base (cell a)) (<= (next (cell ?v)) (true (cell ?v)))";
        let b = "(role y) (base (pos b)) (<= (next (pos ?w)) (true (pos ?w)))";
        let (a, b) = (fingerprint(a).unwrap(), fingerprint(b).unwrap());
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn structure_changes_fingerprint() {
        let a = fingerprint("(role x) (base p)").unwrap();
        let b = fingerprint("(role x) (base p) (base q)").unwrap();
        let c = fingerprint("(role x) (init p)").unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn malformed_statements_are_rejected() {
        assert!(matches!(
            fingerprint("robot"),
            Err(CatalogError::Construction(ConstructionError::MalformedStatement(_)))
        ));
        assert!(matches!(
            fingerprint("(<=)"),
            Err(CatalogError::Construction(ConstructionError::MalformedStatement(_)))
        ));
        assert!(matches!(
            fingerprint("(base ?x)"),
            Err(CatalogError::Construction(ConstructionError::NonGroundFact(_)))
        ));
        assert!(matches!(fingerprint("(base p"), Err(CatalogError::Parse(_))));
    }
}
