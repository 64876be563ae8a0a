use catalog::{fingerprint, Catalog, CatalogError, DeclaredCompiler, Model};
use clap::Parser;
use common::{BatchReport, CatalogSource, Config};
use signature::resolve;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level()))
        .init();

    let source = config.catalog_source();
    if config.should_process_all() {
        return run_all_rulesets(&source);
    }

    match lookup(&config, &source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn lookup(config: &Config, source: &CatalogSource) -> Result<(), CatalogError> {
    let catalog = Catalog::build(source, Arc::new(DeclaredCompiler))?;
    info!("Catalog games: {}", catalog.all_games().join(", "));

    let path = Path::new(config.ruleset());
    let text = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let found = catalog.resolve_or_compile(&text)?;
    info!("{}", "-".repeat(80));
    info!("Game: {}", found.game());
    info!("Remapping: {}", found.remapping());

    let model = Model::from_game(found.compiled().as_ref());
    info!(
        "Roles: {}, bases: {}",
        model.roles.join(" "),
        model.bases.len()
    );
    if let Some(out) = config.model_out() {
        model.save_to_file(out)?;
        info!("Model written to {}", out);
    }
    Ok(())
}

fn run_all_rulesets(source: &CatalogSource) -> ExitCode {
    let files = match source.ruleset_files() {
        Ok(files) => files,
        Err(e) => {
            error!("Cannot list {}: {}", source.directory().display(), e);
            return ExitCode::FAILURE;
        }
    };
    let mut report = BatchReport::new("gdl-lookup", files.len());

    for path in &files {
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("?");

        let outcome = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Io {
                path: path.clone(),
                source: e,
            })
            .and_then(|text| fingerprint(&text))
            .and_then(|index| {
                let mapping = resolve(index.run().signatures())?;
                Ok((index, mapping))
            });

        match outcome {
            Ok((index, mapping)) => {
                let stats = format!(
                    "statements={}, roles={}, constants={}",
                    index.run().len(),
                    index.run().roles().len(),
                    mapping.len()
                );
                report.report_success(file_name, index.fingerprint(), &stats);
            }
            Err(e) => report.report_failure(file_name, &e.to_string()),
        }
    }

    if report.finish() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
