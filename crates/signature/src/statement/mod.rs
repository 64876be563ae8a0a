//! Statement model: typed facts, rules and literals over parsed term trees.
//!
//! - [`literal`]: the five literal shapes
//! - [`fact`]: ground facts
//! - [`rule`]: rules (head literal + body literals)

pub mod fact;
pub mod literal;
pub mod rule;
mod terms;

pub use fact::Fact;
pub use literal::Literal;
pub use rule::Rule;
