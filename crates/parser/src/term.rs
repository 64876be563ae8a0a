//! Atomic symbols of a ruleset.
//!
//! A [`Term`] is either a constant (`cell`, `white`, `1`) or a variable
//! (`?x`). Terms compare, order and hash by their spelling.

use std::fmt;
use std::sync::Arc;

/// Whether a term is a constant or a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TermKind {
    Constant,
    Variable,
}

/// An atomic symbol.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Term {
    name: Arc<str>,
    kind: TermKind,
}

impl Term {
    /// Build a term from its spelling; a leading `?` marks a variable.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self::from_shared(Arc::from(name))
    }

    pub(crate) fn from_shared(name: Arc<str>) -> Self {
        let kind = if name.starts_with('?') {
            TermKind::Variable
        } else {
            TermKind::Constant
        };
        Self { name, kind }
    }

    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    #[inline]
    pub fn kind(&self) -> TermKind {
        self.kind
    }

    #[must_use]
    #[inline]
    pub fn is_constant(&self) -> bool {
        self.kind == TermKind::Constant
    }

    #[must_use]
    #[inline]
    pub fn is_variable(&self) -> bool {
        self.kind == TermKind::Variable
    }

    /// Whether this term is spelled exactly `name`.
    #[must_use]
    #[inline]
    pub fn is(&self, name: &str) -> bool {
        &*self.name == name
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl fmt::Debug for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Delegate Debug to Display
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_spelling() {
        assert!(Term::new("cell").is_constant());
        assert!(Term::new("?x").is_variable());
        assert!(Term::new("100").is_constant());
    }

    #[test]
    fn equality_by_value() {
        assert_eq!(Term::new("cell"), Term::new("cell"));
        assert_ne!(Term::new("cell"), Term::new("?cell"));
        assert!(Term::new("b").is("b"));
        assert_eq!(format!("{:?}", Term::new("?y")), "?y");
    }
}
