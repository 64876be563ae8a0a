//! Error type for indexing, cataloguing and compiling rulesets.

use parser::ParserError;
use signature::{ConstructionError, ResolveError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Catalog error: no catalogued game has fingerprint {fingerprint:#018x}")]
    GameNotFound { fingerprint: u64 },
    #[error("Catalog error: constants could not be resolved: {0}")]
    Unresolvable(#[from] ResolveError),
    #[error("Catalog error: games {games:?} share fingerprint {fingerprint:#018x}")]
    DuplicateCatalogEntry { fingerprint: u64, games: Vec<String> },
    #[error("Catalog error: unknown game '{0}'")]
    UnknownGame(String),
    #[error("Catalog error: cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Catalog error: {0}")]
    Parse(#[from] ParserError),
    #[error("Catalog error: {0}")]
    Construction(#[from] ConstructionError),
    #[error("Catalog error: cannot compile '{game}': {reason}")]
    Compile { game: String, reason: String },
    #[error("Catalog error: model serialization failed: {0}")]
    Model(#[from] serde_json::Error),
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
