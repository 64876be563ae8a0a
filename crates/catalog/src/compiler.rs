//! Compiled-game interface and the declaration-only compiler.
//!
//! Catalog entries hand their text to a [`GameCompiler`] on first access and
//! cache the resulting [`CompiledGame`]. [`DeclaredCompiler`] reads the game's
//! `role`, `base` and `input` declarations directly, which is enough to
//! describe the game's shape without evaluating any rule.

use crate::error::CatalogError;
use parser::{parse_symbols, Symbol, Term};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// A game ready to be played or inspected.
pub trait CompiledGame: Send + Sync + fmt::Debug {
    /// Roles in declaration order.
    fn roles(&self) -> &[Term];

    /// Base propositions.
    fn bases(&self) -> &[Symbol];

    /// Every move `roles()[role_index]` can make; empty for an unknown index.
    fn legal_moves(&self, role_index: usize) -> &[Symbol];
}

/// Turns ruleset text into a [`CompiledGame`].
pub trait GameCompiler: Send + Sync {
    fn compile(&self, game: &str, gdl: &str) -> Result<Arc<dyn CompiledGame>, CatalogError>;
}

/// A game described by its `role`, `base` and `input` facts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredGame {
    roles: Vec<Term>,
    bases: Vec<Symbol>,
    inputs: Vec<Vec<Symbol>>,
}

impl DeclaredGame {
    /// Read the declarations out of `gdl`.
    pub fn from_text(game: &str, gdl: &str) -> Result<Self, CatalogError> {
        let forms = parse_symbols(gdl)?;
        let facts = || {
            forms
                .iter()
                .filter_map(Symbol::as_list)
                .filter(|list| list.is_function() && !list.is_headed_by("<="))
        };

        let roles: Vec<Term> = facts()
            .filter(|list| list.is_headed_by("role"))
            .filter_map(|list| match list.tail() {
                [Symbol::Term(role)] => Some(role.clone()),
                _ => None,
            })
            .collect();

        let bases: Vec<Symbol> = facts()
            .filter(|list| list.is_headed_by("base"))
            .filter_map(|list| match list.tail() {
                [base] => Some(base.clone()),
                _ => None,
            })
            .collect();

        let mut inputs = vec![Vec::new(); roles.len()];
        for list in facts().filter(|list| list.is_headed_by("input")) {
            let [Symbol::Term(role), action] = list.tail() else {
                continue;
            };
            let index = roles.iter().position(|r| r == role).ok_or_else(|| {
                CatalogError::Compile {
                    game: game.to_string(),
                    reason: format!("input {list} names undeclared role {role}"),
                }
            })?;
            inputs[index].push(action.clone());
        }

        Ok(Self {
            roles,
            bases,
            inputs,
        })
    }
}

impl CompiledGame for DeclaredGame {
    fn roles(&self) -> &[Term] {
        &self.roles
    }

    fn bases(&self) -> &[Symbol] {
        &self.bases
    }

    fn legal_moves(&self, role_index: usize) -> &[Symbol] {
        self.inputs.get(role_index).map_or(&[][..], Vec::as_slice)
    }
}

/// Compiles games into [`DeclaredGame`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredCompiler;

impl GameCompiler for DeclaredCompiler {
    fn compile(&self, game: &str, gdl: &str) -> Result<Arc<dyn CompiledGame>, CatalogError> {
        info!("Compiling game {}", game);
        let declared = DeclaredGame::from_text(game, gdl)?;
        info!(
            "Compiled {}: {} role(s), {} base(s)",
            game,
            declared.roles.len(),
            declared.bases.len()
        );
        Ok(Arc::new(declared))
    }
}
