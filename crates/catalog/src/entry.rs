//! One catalogued ruleset and its lazily compiled game.

use crate::compiler::{CompiledGame, GameCompiler};
use crate::error::CatalogError;
use crate::index::Index;
use crate::model::Model;
use signature::{ConstantMapping, SignatureRun};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

/// A ruleset admitted to the catalog.
///
/// The fingerprint, signature run and constant mapping are fixed at build
/// time. The compiled game starts out absent and is produced at most once,
/// under the entry's own lock, the first time a caller asks for it.
pub struct CatalogEntry {
    name: String,
    path: PathBuf,
    text: String,
    index: Index,
    mapping: ConstantMapping,
    compiled: Mutex<Option<Arc<dyn CompiledGame>>>,
}

impl CatalogEntry {
    pub(crate) fn new(
        name: String,
        path: PathBuf,
        text: String,
        index: Index,
        mapping: ConstantMapping,
    ) -> Self {
        Self {
            name,
            path,
            text,
            index,
            mapping,
            compiled: Mutex::new(None),
        }
    }

    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ruleset source text.
    #[must_use]
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    #[inline]
    pub fn fingerprint(&self) -> u64 {
        self.index.fingerprint()
    }

    #[must_use]
    #[inline]
    pub fn run(&self) -> &SignatureRun {
        self.index.run()
    }

    #[must_use]
    #[inline]
    pub fn mapping(&self) -> &ConstantMapping {
        &self.mapping
    }

    #[must_use]
    pub fn is_compiled(&self) -> bool {
        self.slot().is_some()
    }

    /// The compiled game, compiling it with `compiler` on first access.
    pub fn compiled(
        &self,
        compiler: &dyn GameCompiler,
    ) -> Result<Arc<dyn CompiledGame>, CatalogError> {
        let mut slot = self.slot();
        if let Some(game) = &*slot {
            return Ok(Arc::clone(game));
        }

        info!("Lazy loading compiled game for {}", self.name);
        let game = compiler.compile(&self.name, &self.text)?;
        debug!(
            "Model for {}:\n{}",
            self.name,
            Model::from_game(game.as_ref()).to_json()?
        );
        *slot = Some(Arc::clone(&game));
        Ok(game)
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Arc<dyn CompiledGame>>> {
        // a panicking compiler leaves the slot empty, so the data stays valid
        self.compiled.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("fingerprint", &format_args!("{:#018x}", self.fingerprint()))
            .field("constants", &self.mapping.len())
            .field("compiled", &self.is_compiled())
            .finish()
    }
}
