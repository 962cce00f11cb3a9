//! Boba Lab CLI - offline cache tooling and order quotes.
//!
//! # Usage
//!
//! ```bash
//! # Print the cache name for the current worker script
//! boba-cli cache-name --script service-worker.js
//!
//! # Install every manifest asset from a running dev server
//! boba-cli precache --origin http://127.0.0.1:8080/
//!
//! # Price an order and place it
//! boba-cli quote --order order.json --checkout
//! ```
//!
//! # Commands
//!
//! - `cache-name` - Derive the content-hashed cache name
//! - `precache` - Dry-run a worker install against a live origin
//! - `quote` - Price an order against the built-in menu

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use boba_lab_offline::{CacheName, WorkerConfig};
use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

mod commands;
mod config;

use config::{CliConfig, parse_origin};

#[derive(Parser)]
#[command(name = "boba-cli")]
#[command(author, version, about = "Boba Lab CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cache name derived from the worker script
    CacheName {
        /// Worker script path (defaults to `BOBA_WORKER_SCRIPT`)
        #[arg(short, long)]
        script: Option<PathBuf>,

        /// Scope URL used when the script is missing (defaults to `BOBA_ORIGIN`)
        #[arg(long, value_parser = parse_origin)]
        scope: Option<Url>,
    },
    /// Install the asset manifest from a live origin into memory
    Precache {
        /// Origin to fetch from (defaults to `BOBA_ORIGIN`)
        #[arg(short, long, value_parser = parse_origin)]
        origin: Option<Url>,

        /// JSON array of asset paths (defaults to `BOBA_MANIFEST` or the built-in list)
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },
    /// Price an order file against the built-in menu
    Quote {
        /// Order JSON file
        #[arg(short, long)]
        order: PathBuf,

        /// Place the order after printing the summary
        #[arg(long)]
        checkout: bool,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CliConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let config = CliConfig::from_env();

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "boba_lab_offline=info,boba_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: CliConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::CacheName { script, scope } => {
            let script = script.unwrap_or_else(|| config.worker_script.clone());
            let scope = scope.unwrap_or_else(|| config.origin.clone());
            commands::cache_name::run(&config.cache_prefix, &script, &scope)?;
        }
        Commands::Precache { origin, manifest } => {
            let origin = origin.unwrap_or_else(|| config.origin.clone());
            let manifest = commands::precache::load_manifest(
                manifest.as_deref().or(config.manifest.as_deref()),
            )?;
            let cache_name: CacheName =
                commands::cache_name::derive(&config.cache_prefix, &config.worker_script, &origin)?;
            let script_url = origin.join(&script_file_name(&config))?;

            let worker_config =
                WorkerConfig::for_script(&config.cache_prefix, origin, script_url, None)
                    .with_cache_name(cache_name)
                    .with_manifest(manifest);
            commands::precache::run(worker_config).await?;
        }
        Commands::Quote { order, checkout } => {
            commands::quote::run(&order, checkout)?;
        }
    }
    Ok(())
}

/// File name of the worker script as served from the scope root.
fn script_file_name(config: &CliConfig) -> String {
    config
        .worker_script
        .file_name()
        .map_or_else(|| "service-worker.js".to_string(), |n| n.to_string_lossy().into_owned())
}
