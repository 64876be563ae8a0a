//! Directory-backed catalog of known rulesets.

use crate::compiler::{CompiledGame, GameCompiler};
use crate::entry::CatalogEntry;
use crate::error::CatalogError;
use crate::index::fingerprint;
use crate::remap::Remapping;
use common::CatalogSource;
use signature::resolve;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use tracing::{error, info, warn};

/// Game name used when a ruleset is compiled without a catalog match.
pub const UNKNOWN_GAME: &str = "unknown";

/// The outcome of looking a ruleset up.
#[derive(Debug, Clone)]
pub struct Match {
    entry: Option<Arc<CatalogEntry>>,
    remapping: Remapping,
    compiled: Arc<dyn CompiledGame>,
}

impl Match {
    /// The catalogued entry; `None` when the ruleset was compiled on demand.
    #[must_use]
    pub fn entry(&self) -> Option<&Arc<CatalogEntry>> {
        self.entry.as_ref()
    }

    #[must_use]
    pub fn game(&self) -> &str {
        self.entry.as_ref().map_or(UNKNOWN_GAME, |e| e.name())
    }

    /// Renaming from the looked-up text's symbols to the entry's.
    #[must_use]
    #[inline]
    pub fn remapping(&self) -> &Remapping {
        &self.remapping
    }

    #[must_use]
    #[inline]
    pub fn compiled(&self) -> &Arc<dyn CompiledGame> {
        &self.compiled
    }
}

/// Known rulesets, by fingerprint and by game name.
pub struct Catalog {
    compiler: Arc<dyn GameCompiler>,
    by_fingerprint: HashMap<u64, Arc<CatalogEntry>>,
    by_name: BTreeMap<String, Arc<CatalogEntry>>,
}

impl Catalog {
    /// Index every eligible file of `source`.
    ///
    /// Files whose constants cannot be resolved are skipped with a warning.
    /// Unreadable or malformed files, and two files sharing a fingerprint,
    /// fail the whole build.
    pub fn build(
        source: &CatalogSource,
        compiler: Arc<dyn GameCompiler>,
    ) -> Result<Self, CatalogError> {
        let files = source
            .ruleset_files()
            .map_err(|e| CatalogError::io(source.directory(), e))?;
        info!(
            "Building catalog from {} ({} candidate file(s))",
            source.directory().display(),
            files.len()
        );

        let mut entries: Vec<CatalogEntry> = Vec::with_capacity(files.len());
        for path in files {
            let name = source.game_name(&path);
            let text = std::fs::read_to_string(&path).map_err(|e| CatalogError::io(&path, e))?;
            let index = fingerprint(&text)
                .inspect_err(|e| error!("Cannot index {}: {}", path.display(), e))?;

            let mapping = match resolve(index.run().signatures()) {
                Ok(mapping) => mapping,
                Err(e) => {
                    warn!("FAILED to add {}: {}", name, e);
                    continue;
                }
            };

            info!("Adding game {} ({:#018x})", name, index.fingerprint());
            entries.push(CatalogEntry::new(name, path, text, index, mapping));
        }

        let mut games_by_fingerprint: BTreeMap<u64, Vec<String>> = BTreeMap::new();
        for entry in &entries {
            games_by_fingerprint
                .entry(entry.fingerprint())
                .or_default()
                .push(entry.name().to_string());
        }
        let duplicate = games_by_fingerprint.iter().find(|(_, g)| g.len() > 1);
        if let Some((&fingerprint, games)) = duplicate {
            warn!("Duplicate games {:?} share {:#018x}", games, fingerprint);
            return Err(CatalogError::DuplicateCatalogEntry {
                fingerprint,
                games: games.clone(),
            });
        }

        let mut by_fingerprint = HashMap::with_capacity(entries.len());
        let mut by_name = BTreeMap::new();
        for entry in entries {
            let entry = Arc::new(entry);
            by_fingerprint.insert(entry.fingerprint(), Arc::clone(&entry));
            by_name.insert(entry.name().to_string(), entry);
        }

        info!("Catalog ready with {} game(s)", by_name.len());
        Ok(Self {
            compiler,
            by_fingerprint,
            by_name,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// Catalogued game names, sorted.
    #[must_use]
    pub fn all_games(&self) -> Vec<&str> {
        self.by_name.keys().map(String::as_str).collect()
    }

    /// Entry with the given fingerprint, if any; does not compile.
    #[must_use]
    pub fn entry(&self, fingerprint: u64) -> Option<&Arc<CatalogEntry>> {
        self.by_fingerprint.get(&fingerprint)
    }

    /// Entry by game name, compiled on access.
    pub fn by_name(&self, name: &str) -> Result<Arc<CatalogEntry>, CatalogError> {
        let entry = self
            .by_name
            .get(name)
            .ok_or_else(|| CatalogError::UnknownGame(name.to_string()))?;
        entry.compiled(self.compiler.as_ref())?;
        Ok(Arc::clone(entry))
    }

    /// Find the catalogued game `text` is a renaming of.
    pub fn lookup(&self, text: &str) -> Result<Match, CatalogError> {
        let index = fingerprint(text)?;
        let entry = self
            .by_fingerprint
            .get(&index.fingerprint())
            .ok_or(CatalogError::GameNotFound {
                fingerprint: index.fingerprint(),
            })?;

        let mapping = resolve(index.run().signatures())?;
        let remapping = Remapping::compose(
            (entry.run(), entry.mapping()),
            (index.run(), &mapping),
        );

        info!("Lookup found game {} in catalog", entry.name());
        let compiled = entry.compiled(self.compiler.as_ref())?;
        Ok(Match {
            entry: Some(Arc::clone(entry)),
            remapping,
            compiled,
        })
    }

    /// Look `text` up, compiling it as [`UNKNOWN_GAME`] when no entry matches.
    pub fn resolve_or_compile(&self, text: &str) -> Result<Match, CatalogError> {
        match self.lookup(text) {
            Ok(found) => Ok(found),
            Err(e @ (CatalogError::GameNotFound { .. } | CatalogError::Unresolvable(_))) => {
                error!("Lookup failed ({}), compiling on demand", e);
                let compiled = self.compiler.compile(UNKNOWN_GAME, text)?;
                Ok(Match {
                    entry: None,
                    remapping: Remapping::Identity,
                    compiled,
                })
            }
            Err(e) => Err(e),
        }
    }
}

/// A catalog built on first use and shared afterwards.
pub struct LazyCatalog {
    source: CatalogSource,
    compiler: Arc<dyn GameCompiler>,
    catalog: OnceLock<Catalog>,
    building: Mutex<()>,
}

impl LazyCatalog {
    #[must_use]
    pub fn new(source: CatalogSource, compiler: Arc<dyn GameCompiler>) -> Self {
        Self {
            source,
            compiler,
            catalog: OnceLock::new(),
            building: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn is_built(&self) -> bool {
        self.catalog.get().is_some()
    }

    /// The catalog, building it if this is the first call.
    ///
    /// A failed build leaves the handle unbuilt; the next call retries.
    pub fn get(&self) -> Result<&Catalog, CatalogError> {
        if let Some(catalog) = self.catalog.get() {
            return Ok(catalog);
        }

        let _guard = self.building.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(catalog) = self.catalog.get() {
            return Ok(catalog);
        }
        let catalog = Catalog::build(&self.source, Arc::clone(&self.compiler))?;
        Ok(self.catalog.get_or_init(|| catalog))
    }
}
