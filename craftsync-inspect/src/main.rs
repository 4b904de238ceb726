//! craftsync cache inspector
//!
//! Reads a crafting cache blob (as stored in the account settings, with the
//! passthrough compressor) and reports how each slot validates against an
//! item catalog.
//!
//! Usage:
//!   craftsync-inspect --catalog items.json cache.txt
//!   craftsync-inspect --catalog items.json --rewrite dialect_b cache.txt

use anyhow::{Context, Result};
use clap::Parser;
use craftsync_inspect::{inspect_blob, normalize_blob, parse_dialect, render_report};
use craftsync_model::{CatalogValidator, ItemCatalog};
use craftsync_sync::{AccountSettings, SyncConfig};
use craftsync_types::{Dialect, DialectFingerprint};
use std::{fs, path::PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "craftsync-inspect")]
#[command(about = "Inspect and normalize crafting cache blobs")]
struct Args {
    /// Cache blob file, or an account settings JSON file with --settings
    blob: PathBuf,

    /// Item catalog JSON file
    #[arg(short, long)]
    catalog: PathBuf,

    /// Treat the input as account settings JSON and read its CraftingCache
    #[arg(long)]
    settings: bool,

    /// Sync configuration JSON file (capacities, dialect fingerprints)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Re-encode the normalized tail in this dialect and print it
    #[arg(long, value_parser = parse_dialect)]
    rewrite: Option<Dialect>,

    /// Pick the rewrite dialect from a remote fingerprint instead
    #[arg(long, conflicts_with = "rewrite")]
    fingerprint: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let catalog = ItemCatalog::from_path(&args.catalog)
        .with_context(|| format!("Failed to load catalog {:?}", args.catalog))?;
    info!("Loaded {} catalog entries", catalog.len());
    let validator = CatalogValidator::new(catalog);

    let config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {:?}", path))?;
            SyncConfig::from_json(&json).context("Failed to parse config")?
        }
        None => SyncConfig::default(),
    };

    let raw = fs::read_to_string(&args.blob)
        .with_context(|| format!("Failed to read {:?}", args.blob))?;
    let blob = if args.settings {
        AccountSettings::from_json(&raw)
            .context("Failed to parse account settings")?
            .crafting_cache
    } else {
        raw.trim_end_matches(['\r', '\n']).to_string()
    };
    debug!("Blob is {} bytes", blob.len());

    let report = inspect_blob(&blob, &validator);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }

    let dialect = args.rewrite.or_else(|| {
        args.fingerprint
            .as_deref()
            .map(|fp| DialectFingerprint::new(fp).resolve(&config.dialect_fingerprints))
    });
    if let Some(dialect) = dialect {
        let capacity = config.capacity().context("Invalid capacity in config")?;
        let (text, merge_report) = normalize_blob(&blob, &validator, capacity, dialect);
        info!("Rewrote blob as {}: {:?}", dialect, merge_report);
        println!("{}", text);
    }

    Ok(())
}
