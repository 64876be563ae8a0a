//! Diagnostic description of a compiled game.

use crate::compiler::CompiledGame;
use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Roles, base propositions and per-role actions, rendered as KIF text.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    pub roles: Vec<String>,
    pub bases: Vec<String>,
    pub actions: Vec<Vec<String>>,
}

impl Model {
    pub fn from_game(game: &dyn CompiledGame) -> Self {
        let roles: Vec<String> = game.roles().iter().map(ToString::to_string).collect();
        let bases = game.bases().iter().map(ToString::to_string).collect();
        let actions = (0..roles.len())
            .map(|i| game.legal_moves(i).iter().map(ToString::to_string).collect())
            .collect();
        Self {
            roles,
            bases,
            actions,
        }
    }

    /// Pretty JSON with fields in declaration order.
    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), CatalogError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?).map_err(|e| CatalogError::io(path, e))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
        Self::from_json(&json)
    }
}
