//! Ruleset fingerprint index and directory-backed game catalog.
//!
//! A ruleset's [`fingerprint`] identifies it up to consistent renaming of
//! its symbols. A [`Catalog`] maps fingerprints to known games so that an
//! incoming ruleset can be matched to a catalogued one together with the
//! [`Remapping`] that translates between the two.

pub mod catalog;
pub mod compiler;
pub mod entry;
pub mod error;
pub mod index;
pub mod model;
pub mod remap;

pub use catalog::{Catalog, LazyCatalog, Match, UNKNOWN_GAME};
pub use compiler::{CompiledGame, DeclaredCompiler, DeclaredGame, GameCompiler};
pub use entry::CatalogEntry;
pub use error::CatalogError;
pub use index::{fingerprint, Index};
pub use model::Model;
pub use remap::Remapping;
