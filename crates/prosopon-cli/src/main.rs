//! `prosopon` — batch importer from the relational factoid export into the
//! assertion graph.
//!
//! Reads `prosopon.toml` (or the path specified with `--config`), opens the
//! SQLite graph store, loads the catalog and the dataset, and runs a full
//! import. Safe to re-run: a second pass over the same input creates
//! nothing.
//!
//! # Usage
//!
//! ```
//! prosopon --dataset export.json --catalog catalog.json --store graph.db
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use prosopon_catalog::Catalog;
use prosopon_core::dataset::ImportSet;
use prosopon_import::ImportContext;
use prosopon_store_sqlite::SqliteGraph;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Import prosopographical factoids into the assertion graph")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "prosopon.toml")]
  config: PathBuf,

  /// SQLite graph store path (overrides the config file).
  #[arg(long)]
  store: Option<PathBuf>,

  /// JSON dataset (person records and boulloteria) to import.
  #[arg(long)]
  dataset: Option<PathBuf>,

  /// JSON catalog (vocabulary and bibliography).
  #[arg(long)]
  catalog: Option<PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file; flags override it.
#[derive(Debug, Clone, Default, Deserialize)]
struct Settings {
  #[serde(default)]
  store_path:   Option<PathBuf>,
  #[serde(default)]
  dataset_path: Option<PathBuf>,
  #[serde(default)]
  catalog_path: Option<PathBuf>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration; flags override file, file overrides environment.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("PROSOPON"))
    .build()
    .context("failed to read config file")?;
  let settings: Settings = settings
    .try_deserialize()
    .context("failed to deserialise settings")?;

  let store_path = cli
    .store
    .or(settings.store_path)
    .unwrap_or_else(|| PathBuf::from("prosopon.db"));
  let dataset_path = cli
    .dataset
    .or(settings.dataset_path)
    .context("no dataset given (use --dataset or dataset_path in the config)")?;
  let catalog_path = cli
    .catalog
    .or(settings.catalog_path)
    .context("no catalog given (use --catalog or catalog_path in the config)")?;

  let catalog = Catalog::from_path(&catalog_path)
    .with_context(|| format!("failed to load catalog {}", catalog_path.display()))?;
  let dataset = load_dataset(&dataset_path)
    .with_context(|| format!("failed to load dataset {}", dataset_path.display()))?;

  let store = SqliteGraph::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {}", store_path.display()))?;

  tracing::info!(
    persons = dataset.persons.len(),
    boulloteria = dataset.boulloteria.len(),
    store = %store_path.display(),
    "starting import"
  );

  let mut ctx = ImportContext::init(store, catalog)
    .await
    .context("failed to initialise import context")?;
  let report = prosopon_import::run(&mut ctx, &dataset)
    .await
    .context("import run failed")?;

  print!("{report}");
  Ok(())
}

/// Read and deserialise the JSON dataset.
fn load_dataset(path: &Path) -> anyhow::Result<ImportSet> {
  let raw = std::fs::read_to_string(path)?;
  Ok(serde_json::from_str(&raw)?)
}
