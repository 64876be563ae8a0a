//! Command line arguments and catalog source settings.

use clap::{ArgAction, Parser};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default extension of catalogued ruleset files.
pub const DEFAULT_EXTENSION: &str = "kif";

/// Files whose name starts with this prefix are scratch output, never catalogued.
pub const DEFAULT_TEMP_PREFIX: &str = "tmp";

/// Command line arguments for the lookup tool
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Path of the ruleset to look up, or "all" to index every catalogued ruleset
    #[arg(value_name = "RULESET")]
    pub ruleset: String,

    /// Directory holding the catalogued rulesets
    #[arg(short = 'C', long, value_name = "DIR", default_value = "rulesheets")]
    pub catalog_dir: String,

    /// File extension of catalogued rulesets (without the dot)
    #[arg(long, value_name = "EXT", default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// File name prefix of temporary files that are skipped
    #[arg(long, value_name = "PREFIX", default_value = DEFAULT_TEMP_PREFIX)]
    pub temp_prefix: String,

    /// Write the diagnostic model of the resolved game to this path
    #[arg(short = 'M', long, value_name = "PATH")]
    pub model_out: Option<String>,

    /// Log per-statement signatures and resolver passes
    #[arg(long, short = 'v', action = ArgAction::SetTrue)]
    pub verbose: bool,
}

impl Config {
    pub fn ruleset(&self) -> &str {
        &self.ruleset
    }

    pub fn should_process_all(&self) -> bool {
        self.ruleset == "all" || self.ruleset == "--all"
    }

    pub fn model_out(&self) -> Option<&str> {
        self.model_out.as_deref()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Tracing filter directive matching the verbosity flag.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Catalog source described by the directory/extension/prefix flags.
    pub fn catalog_source(&self) -> CatalogSource {
        CatalogSource::new(&self.catalog_dir)
            .with_extension(&self.extension)
            .with_temp_prefix(&self.temp_prefix)
    }
}

/// Where catalogued rulesets live and which files count as rulesets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSource {
    directory: PathBuf,
    extension: String,
    temp_prefix: String,
}

impl Default for CatalogSource {
    fn default() -> Self {
        Self::new("rulesheets")
    }
}

impl CatalogSource {
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            extension: DEFAULT_EXTENSION.to_string(),
            temp_prefix: DEFAULT_TEMP_PREFIX.to_string(),
        }
    }

    #[must_use]
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    #[must_use]
    pub fn with_temp_prefix(mut self, prefix: &str) -> Self {
        self.temp_prefix = prefix.to_string();
        self
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn temp_prefix(&self) -> &str {
        &self.temp_prefix
    }

    /// Whether a file name denotes a catalogued ruleset.
    pub fn is_eligible(&self, file_name: &str) -> bool {
        if !self.temp_prefix.is_empty() && file_name.starts_with(&self.temp_prefix) {
            return false;
        }
        Path::new(file_name).extension().and_then(|s| s.to_str()) == Some(self.extension.as_str())
    }

    /// Game name of a ruleset file: its file name without the extension.
    pub fn game_name(&self, path: &Path) -> String {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown_game".into())
    }

    /// All eligible ruleset files in the directory, sorted by file name.
    pub fn ruleset_files(&self) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.directory)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let eligible = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| self.is_eligible(name));
            if eligible {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}
