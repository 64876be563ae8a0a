//! Recovers which concrete constant each synthetic id stands for.
//!
//! Candidate `(id, constant)` pairs are read off each signature by walking
//! `num_sig` and `value_sig` side by side. Rows of pairs are bucketed by the
//! statement's zero hash, and buckets are narrowed pass by pass until every
//! id is pinned down or no pass makes progress.

use crate::encoding::{SigValue, Signature, SyntheticId};
use crate::error::ResolveError;
use itertools::Itertools;
use parser::Term;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::{debug, trace};

/// Upper bound on reduction passes.
pub const MAX_PASSES: usize = 100;

type Pair = (SyntheticId, Term);
type Row = Vec<Pair>;

/// Complete map from synthetic id to the constant it abstracts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstantMapping {
    bindings: BTreeMap<SyntheticId, Term>,
}

impl ConstantMapping {
    #[must_use]
    pub fn get(&self, id: SyntheticId) -> Option<&Term> {
        self.bindings.get(&id)
    }

    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bindings in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (SyntheticId, &Term)> {
        self.bindings.iter().map(|(id, t)| (*id, t))
    }
}

impl fmt::Display for ConstantMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (id, t)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{id}: {t}")?;
        }
        write!(f, "}}")
    }
}

/// Resolve the synthetic ids used by `signatures`.
///
/// Either every id that appears in a row is bound or the whole call fails;
/// bindings made before a failure are discarded.
pub fn resolve(signatures: &[Signature]) -> Result<ConstantMapping, ResolveError> {
    let buckets = group(signatures)?;
    debug!(
        "Resolving {} statement(s) across {} bucket(s)",
        signatures.len(),
        buckets.len()
    );
    Resolver {
        buckets,
        bindings: BTreeMap::new(),
    }
    .run()
}

/// Statements sharing a zero hash; all rows have the same width.
struct Bucket {
    hash: u64,
    rows: Vec<Row>,
}

fn candidate_pairs(sig: &Signature) -> Result<Row, ResolveError> {
    let mismatch = || ResolveError::ShapeMismatch {
        statement: sig.statement().to_string(),
    };

    let mut row = Vec::new();
    let mut stack = vec![(sig.num_sig(), sig.value_sig())];
    while let Some((num, value)) = stack.pop() {
        match (num, value) {
            (SigValue::Tuple(ns), SigValue::Tuple(vs)) => {
                if ns.len() != vs.len() {
                    return Err(mismatch());
                }
                // reversed so pairs come out left to right
                stack.extend(ns.iter().zip(vs.iter()).rev());
            }
            (SigValue::Synthetic(id), SigValue::Value(t)) => row.push((*id, t.clone())),
            (SigValue::Synthetic(_) | SigValue::Tuple(_), _) | (_, SigValue::Tuple(_)) => {
                return Err(mismatch())
            }
            (n, v) if n == v => {}
            _ => return Err(mismatch()),
        }
    }
    Ok(row)
}

fn group(signatures: &[Signature]) -> Result<Vec<Bucket>, ResolveError> {
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut position: HashMap<u64, usize> = HashMap::new();

    for sig in signatures {
        let row = candidate_pairs(sig)?;
        if row.is_empty() {
            continue;
        }

        let hash = sig.zero_sig_hash();
        match position.get(&hash) {
            Some(&i) => {
                let bucket = &mut buckets[i];
                let expected = bucket.rows.first().map_or(row.len(), Vec::len);
                if expected != row.len() {
                    return Err(ResolveError::RowLengthMismatch {
                        hash,
                        expected,
                        found: row.len(),
                    });
                }
                bucket.rows.push(row);
            }
            None => {
                position.insert(hash, buckets.len());
                buckets.push(Bucket {
                    hash,
                    rows: vec![row],
                });
            }
        }
    }
    Ok(buckets)
}

/// Whether `pair` is already bound; binding its id elsewhere is a conflict.
fn is_known(bindings: &BTreeMap<SyntheticId, Term>, (id, t): &Pair) -> Result<bool, ResolveError> {
    match bindings.get(id) {
        None => Ok(false),
        Some(committed) if committed == t => Ok(true),
        Some(committed) => Err(ResolveError::Inconsistent {
            id: *id,
            committed: committed.clone(),
            conflicting: t.clone(),
        }),
    }
}

/// Bind `pair`; returns whether the binding is new.
fn commit(bindings: &mut BTreeMap<SyntheticId, Term>, pair: &Pair) -> Result<bool, ResolveError> {
    if is_known(bindings, pair)? {
        return Ok(false);
    }
    trace!("Bound {} to {}", pair.0, pair.1);
    bindings.insert(pair.0, pair.1.clone());
    Ok(true)
}

struct Resolver {
    buckets: Vec<Bucket>,
    bindings: BTreeMap<SyntheticId, Term>,
}

impl Resolver {
    fn run(mut self) -> Result<ConstantMapping, ResolveError> {
        let mut passes = 0;
        while !self.buckets.is_empty() && passes < MAX_PASSES {
            passes += 1;
            let before = self.progress();
            self.pass()?;
            trace!(
                "Pass {}: {} bucket(s) left, {} binding(s)",
                passes,
                self.buckets.len(),
                self.bindings.len()
            );
            if self.progress() == before {
                break;
            }
        }

        if !self.buckets.is_empty() {
            for bucket in &self.buckets {
                debug!(
                    "Ambiguous bucket 0x{:016x} with {} row(s)",
                    bucket.hash,
                    bucket.rows.len()
                );
            }
            return Err(ResolveError::Unresolvable {
                pending: self.buckets.len(),
                passes,
            });
        }

        debug!("Resolved {} constant(s) in {} pass(es)", self.bindings.len(), passes);
        Ok(ConstantMapping {
            bindings: self.bindings,
        })
    }

    /// Bucket count, row count and binding count; a pass that leaves all
    /// three unchanged made no progress.
    fn progress(&self) -> (usize, usize, usize) {
        let rows = self.buckets.iter().map(|b| b.rows.len()).sum();
        (self.buckets.len(), rows, self.bindings.len())
    }

    fn pass(&mut self) -> Result<(), ResolveError> {
        self.drop_trivial();
        self.drop_known_rows()?;
        self.resolve_unit_buckets()?;
        self.resolve_columns()?;
        self.resolve_unique_unknowns()
    }

    fn drop_trivial(&mut self) {
        self.buckets
            .retain(|b| b.rows.iter().any(|row| !row.is_empty()));
    }

    fn drop_known_rows(&mut self) -> Result<(), ResolveError> {
        for bucket in &mut self.buckets {
            let mut kept = Vec::with_capacity(bucket.rows.len());
            for row in std::mem::take(&mut bucket.rows) {
                let mut all_known = true;
                for pair in &row {
                    all_known &= is_known(&self.bindings, pair)?;
                }
                if !all_known {
                    kept.push(row);
                }
            }
            bucket.rows = kept;
        }
        self.buckets.retain(|b| !b.rows.is_empty());
        Ok(())
    }

    fn resolve_unit_buckets(&mut self) -> Result<(), ResolveError> {
        let mut kept = Vec::with_capacity(self.buckets.len());
        for bucket in std::mem::take(&mut self.buckets) {
            if let [row] = bucket.rows.as_slice() {
                for pair in row {
                    commit(&mut self.bindings, pair)?;
                }
            } else {
                kept.push(bucket);
            }
        }
        self.buckets = kept;
        Ok(())
    }

    fn resolve_columns(&mut self) -> Result<(), ResolveError> {
        let mut kept = Vec::with_capacity(self.buckets.len());
        for bucket in std::mem::take(&mut self.buckets) {
            let width = bucket.rows.first().map_or(0, Vec::len);
            let mut columns: Vec<usize> = (0..width).collect();

            while columns.len() > 1 {
                let mut removable = None;
                for (slot, &col) in columns.iter().enumerate() {
                    if bucket.rows.iter().map(|row| &row[col]).all_equal() {
                        commit(&mut self.bindings, &bucket.rows[0][col])?;
                        removable = Some(slot);
                        break;
                    }
                    let mut all_known = true;
                    for row in &bucket.rows {
                        all_known &= is_known(&self.bindings, &row[col])?;
                    }
                    if all_known {
                        removable = Some(slot);
                        break;
                    }
                }
                match removable {
                    Some(slot) => {
                        columns.remove(slot);
                    }
                    None => break,
                }
            }

            match columns.as_slice() {
                [] => {}
                [col] => {
                    for row in &bucket.rows {
                        commit(&mut self.bindings, &row[*col])?;
                    }
                }
                _ => kept.push(bucket),
            }
        }
        self.buckets = kept;
        Ok(())
    }

    fn resolve_unique_unknowns(&mut self) -> Result<(), ResolveError> {
        loop {
            let mut committed = false;
            for bucket in &self.buckets {
                let mut patterns: BTreeMap<Vec<(usize, &Pair)>, Vec<&Pair>> = BTreeMap::new();
                for row in &bucket.rows {
                    let mut known = Vec::with_capacity(row.len());
                    let mut unknown = Vec::new();
                    for (i, pair) in row.iter().enumerate() {
                        if is_known(&self.bindings, pair)? {
                            known.push((i, pair));
                        } else {
                            unknown.push(pair);
                        }
                    }
                    if let [pair] = unknown.as_slice() {
                        patterns.entry(known).or_default().push(pair);
                    }
                }

                for matches in patterns.values() {
                    if let [pair] = matches.as_slice() {
                        committed |= commit(&mut self.bindings, pair)?;
                    }
                }
            }
            if !committed {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::SignatureFactory;
    use crate::statement::{Fact, Rule};
    use parser::parse_symbols;

    fn signatures(text: &str) -> Vec<Signature> {
        let mut factory = SignatureFactory::new();
        for form in parse_symbols(text).expect("parse") {
            let list = form.as_list().expect("list");
            if list.is_headed_by("<=") {
                let rule = Rule::new(&list.elements()[1], &list.elements()[2..]).expect("rule");
                factory.add_rule(&rule).expect("encode rule");
            } else {
                let fact = Fact::new(&list.elements()[0], list.tail().to_vec()).expect("fact");
                factory.add_fact(&fact).expect("encode fact");
            }
        }
        factory.finish().signatures().to_vec()
    }

    fn id(raw: u32) -> SyntheticId {
        SyntheticId::new(raw).expect("synthetic id")
    }

    fn rendered(mapping: &ConstantMapping) -> Vec<(u32, String)> {
        mapping
            .iter()
            .map(|(id, t)| (id.value(), t.to_string()))
            .collect()
    }

    #[test]
    fn unit_buckets_commit_directly() {
        let mapping = resolve(&signatures("(role robot) (init (step 1)) (succ 1 2)")).unwrap();
        assert_eq!(
            rendered(&mapping),
            vec![(100, "step".to_string()), (101, "succ".to_string())]
        );
    }

    #[test]
    fn single_column_bucket_commits_every_row() {
        let mapping = resolve(&signatures("(base p) (base q) (base r)")).unwrap();
        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.get(id(100)), Some(&Term::new("p")));
        assert_eq!(mapping.get(id(102)), Some(&Term::new("r")));
    }

    #[test]
    fn unique_unknown_breaks_ties() {
        let mapping = resolve(&signatures("(init f) (foo f a c) (foo g a d)")).unwrap();
        assert_eq!(
            rendered(&mapping),
            vec![
                (100, "f".to_string()),
                (101, "foo".to_string()),
                (102, "a".to_string()),
                (103, "c".to_string()),
                (104, "g".to_string()),
                (105, "d".to_string()),
            ]
        );
    }

    #[test]
    fn equal_zero_hash_is_not_enough() {
        let sigs = signatures("(role p) (foo a x) (foo b y)");
        assert_eq!(sigs[1].zero_sig_hash(), sigs[2].zero_sig_hash());
        assert_eq!(
            resolve(&sigs),
            Err(ResolveError::Unresolvable {
                pending: 1,
                passes: 2
            })
        );
    }

    #[test]
    fn resolution_is_deterministic() {
        let text = "(role robot) (base p) (base q) (input robot a) (input robot b)
                    (<= (legal robot a)) (<= (next p) (does robot a) (true q))";
        let first = resolve(&signatures(text)).unwrap();
        let second = resolve(&signatures(text)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn conflicting_commit_fails_without_mapping() {
        let fact = |keyword: &str, value: &str| {
            let head = SigValue::Reserved(Term::new(keyword));
            Signature::new(
                format!("({keyword} {value})"),
                SigValue::Tuple(vec![SigValue::Tag("fact"), head.clone(), SigValue::Unseen]),
                SigValue::Tuple(vec![
                    SigValue::Tag("fact"),
                    head.clone(),
                    SigValue::Synthetic(id(100)),
                ]),
                SigValue::Tuple(vec![
                    SigValue::Tag("fact"),
                    head,
                    SigValue::Value(Term::new(value)),
                ]),
            )
        };

        let result = resolve(&[fact("base", "a"), fact("init", "b")]);
        assert_eq!(
            result,
            Err(ResolveError::Inconsistent {
                id: id(100),
                committed: Term::new("a"),
                conflicting: Term::new("b"),
            })
        );
    }

    #[test]
    fn misaligned_signatures_are_rejected() {
        let sig = Signature::new(
            "(base a)".to_string(),
            SigValue::Tuple(vec![SigValue::Unseen]),
            SigValue::Tuple(vec![SigValue::Synthetic(id(100))]),
            SigValue::Tuple(vec![SigValue::Value(Term::new("a")), SigValue::Unseen]),
        );
        assert!(matches!(
            resolve(&[sig]),
            Err(ResolveError::ShapeMismatch { .. })
        ));
    }

    /// A fact-shaped signature whose synthetic positions carry `pairs`.
    fn hand_built(zero: SigValue, pairs: &[(u32, String)]) -> Signature {
        let num = pairs.iter().map(|(raw, _)| SigValue::Synthetic(id(*raw)));
        let value = pairs.iter().map(|(_, t)| SigValue::Value(Term::new(t)));
        Signature::new(
            format!("{zero}"),
            zero,
            SigValue::Tuple(std::iter::once(SigValue::Tag("fact")).chain(num).collect()),
            SigValue::Tuple(std::iter::once(SigValue::Tag("fact")).chain(value).collect()),
        )
    }

    /// Buckets where link `k` only becomes a unit bucket once link `k - 1`
    /// is bound, so each pass resolves exactly one link.
    fn chain(links: usize) -> Vec<Signature> {
        let a = |k: usize| (100 + 2 * k as u32, format!("a{k}"));
        let b = |k: usize| (101 + 2 * k as u32, format!("b{k}"));
        let key = |k: usize| SigValue::Tuple(vec![SigValue::Tag("link"), SigValue::Var(k)]);

        let mut sigs = vec![hand_built(key(0), &[a(0)])];
        for k in 1..=links {
            sigs.push(hand_built(key(k), &[a(k - 1), a(k - 1)]));
            sigs.push(hand_built(key(k), &[a(k), b(k)]));
        }
        sigs
    }

    #[test]
    fn long_chains_resolve_one_link_per_pass() {
        let mapping = resolve(&chain(50)).unwrap();
        assert_eq!(mapping.len(), 101);
        assert_eq!(mapping.get(id(200)), Some(&Term::new("a50")));
        assert_eq!(mapping.get(id(201)), Some(&Term::new("b50")));
    }

    #[test]
    fn pass_cap_bounds_reduction() {
        assert_eq!(
            resolve(&chain(150)),
            Err(ResolveError::Unresolvable {
                pending: 51,
                passes: MAX_PASSES
            })
        );
    }

    #[test]
    fn unequal_rows_in_one_bucket_are_rejected() {
        let zero = SigValue::Tuple(vec![SigValue::Tag("fact"), SigValue::Unseen]);
        let narrow = hand_built(zero.clone(), &[(100, "a".to_string())]);
        let wide = hand_built(zero, &[(101, "b".to_string()), (102, "c".to_string())]);
        assert_eq!(narrow.zero_sig_hash(), wide.zero_sig_hash());

        match resolve(&[narrow.clone(), wide]) {
            Err(ResolveError::RowLengthMismatch {
                hash,
                expected,
                found,
            }) => {
                assert_eq!(hash, narrow.zero_sig_hash());
                assert_eq!((expected, found), (1, 2));
            }
            other => panic!("expected a row length mismatch, got {other:?}"),
        }
    }

    #[test]
    fn nothing_to_resolve() {
        assert!(resolve(&[]).unwrap().is_empty());
        assert!(resolve(&signatures("(role robot) (succ 1 2)")).is_ok());
    }
}
