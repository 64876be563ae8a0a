//! Renaming from a looked-up ruleset's symbols to a catalogued ruleset's.

use parser::Term;
use signature::{ConstantMapping, SignatureRun};
use std::collections::BTreeMap;
use std::fmt;

/// How to rename the symbols of a looked-up ruleset so that it reads as the
/// catalogued one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remapping {
    /// The two rulesets already use the same symbols.
    Identity,
    /// Looked-up symbol to catalogued symbol; identity pairs are omitted.
    Rename(BTreeMap<Term, Term>),
}

impl Remapping {
    /// Pair roles by registration index and constants by synthetic id.
    pub fn compose(
        catalogued: (&SignatureRun, &ConstantMapping),
        unknown: (&SignatureRun, &ConstantMapping),
    ) -> Self {
        let (catalog_run, catalog_mapping) = catalogued;
        let (unknown_run, unknown_mapping) = unknown;

        let roles = unknown_run.roles().iter().zip(catalog_run.roles());
        let constants = catalog_mapping
            .iter()
            .filter_map(|(id, target)| unknown_mapping.get(id).map(|from| (from, target)));

        let renames: BTreeMap<Term, Term> = roles
            .chain(constants)
            .filter(|(from, to)| from != to)
            .map(|(from, to)| (from.clone(), to.clone()))
            .collect();

        if renames.is_empty() {
            Self::Identity
        } else {
            Self::Rename(renames)
        }
    }

    #[must_use]
    #[inline]
    pub fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }

    /// The catalogued name for `t`; unmapped terms map to themselves.
    #[must_use]
    pub fn apply<'a>(&'a self, t: &'a Term) -> &'a Term {
        match self {
            Self::Identity => t,
            Self::Rename(renames) => renames.get(t).unwrap_or(t),
        }
    }

    /// Number of renamed symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Identity => 0,
            Self::Rename(renames) => renames.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Remapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identity => write!(f, "identity"),
            Self::Rename(renames) => {
                write!(f, "{{")?;
                for (i, (from, to)) in renames.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{from} -> {to}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::fingerprint;
    use signature::resolve;

    fn remap(catalogued: &str, unknown: &str) -> Remapping {
        let a = fingerprint(catalogued).unwrap();
        let b = fingerprint(unknown).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        let ma = resolve(a.run().signatures()).unwrap();
        let mb = resolve(b.run().signatures()).unwrap();
        Remapping::compose((a.run(), &ma), (b.run(), &mb))
    }

    #[test]
    fn same_text_is_identity() {
        let text = "(role robot) (base p) (input robot a)";
        let r = remap(text, text);
        assert!(r.is_identity());
        assert_eq!(r.to_string(), "identity");
        assert_eq!(r.apply(&Term::new("p")), &Term::new("p"));
    }

    #[test]
    fn roles_and_constants_are_renamed() {
        let r = remap(
            "(role robot) (base p) (input robot a)",
            "(role bot) (base lamp) (input bot a)",
        );
        assert_eq!(r.len(), 2);
        assert_eq!(r.apply(&Term::new("bot")), &Term::new("robot"));
        assert_eq!(r.apply(&Term::new("lamp")), &Term::new("p"));
        assert_eq!(r.apply(&Term::new("a")), &Term::new("a"));
        assert_eq!(r.to_string(), "{bot -> robot, lamp -> p}");
    }
}
