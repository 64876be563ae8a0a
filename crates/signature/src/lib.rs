//! Statement model, canonical signatures and constant resolution for GDL
//! rulesets.
//!
//! A ruleset is read into [`Fact`]s and [`Rule`]s, each statement is encoded
//! by a [`SignatureFactory`] into a renaming-invariant [`Signature`], and
//! [`resolve`] recovers the [`ConstantMapping`] behind the synthetic ids.

pub mod encoding;
pub mod error;
pub mod resolver;
pub mod statement;

pub use encoding::{
    is_reserved, SigValue, Signature, SignatureFactory, SignatureRun, SyntheticId, ROOT_KEYWORDS,
};
pub use error::{ConstructionError, ResolveError};
pub use resolver::{resolve, ConstantMapping, MAX_PASSES};
pub use statement::{Fact, Literal, Rule};
