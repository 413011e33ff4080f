//! `glyphset [CONFIG.toml]`
//!
//! Generates a dataset as configured (defaults when no file is given).
//! Log verbosity follows `RUST_LOG`, defaulting to `info`.

use std::path::PathBuf;
use std::process::ExitCode;

use glyphset::config::GeneratorConfig;
use glyphset::orchestrator::Orchestrator;
use glyphset::sink::DirectorySink;
use glyphset::{DatasetError, DatasetResult, targets};
use glyphset_render::text::DirectoryCatalog;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: glyphset [CONFIG.toml]";

fn run(config_path: Option<PathBuf>) -> DatasetResult<()> {
    let config = match &config_path {
        Some(path) => GeneratorConfig::load(path)?,
        None => {
            let config = GeneratorConfig::default();
            config.validate()?;
            config
        }
    };

    let catalog = DirectoryCatalog::scan(&config.catalog_config());
    if catalog.is_empty() {
        return Err(DatasetError::NoFonts);
    }
    let stats = catalog.stats();
    tracing::info!(
        target: targets::CATALOG,
        outline = stats.outline_loaded,
        bitmap = stats.bitmap_loaded,
        skipped = stats.skipped,
        "fonts discovered"
    );

    let sink = DirectorySink::create(&config.paths.output, config.image_format)?;
    let report = Orchestrator::new(config).run(&catalog, &sink)?;
    if report.failed > 0 {
        tracing::warn!(
            target: targets::ORCHESTRATOR,
            failed = report.failed,
            "some samples were not written"
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = std::env::args_os().skip(1);
    let first = args.next();
    let wants_help = first
        .as_deref()
        .is_some_and(|a| a == "-h" || a == "--help");
    if wants_help || args.next().is_some() {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    }

    match run(first.map(PathBuf::from)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
