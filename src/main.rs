use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use weightmap::config::Config;
use weightmap::error::{Result, WeightmapError};
use weightmap::license::NON_COMMERCIAL_WEIGHTS;
use weightmap::manifest::ByoManifest;
use weightmap::weights::ExtensionRegistry;
use weightmap::Resolver;

#[derive(Parser)]
#[command(name = "weightmap")]
#[command(about = "Resolve model weights to download URLs and destinations", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.config/weightmap/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Do not fetch the updated manifest
    #[arg(long, global = true)]
    no_download: bool,

    /// Bring-your-own weights manifest (JSON: category -> filename -> url)
    #[arg(long, global = true)]
    byo: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the full weights map as JSON
    Map,
    /// Print the entry for one weight
    Lookup { filename: String },
    /// List weights in a manifest category
    List { category: String },
    /// List manifest categories
    Categories,
    /// Check whether a weight is restricted to non-commercial use
    License { filename: String },
    /// List all weights restricted to non-commercial use
    NonCommercial,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Map => print_json(build_resolver(&cli)?.weights_map())?,
        Commands::Lookup { filename } => {
            let resolver = build_resolver(&cli)?;
            let entry = resolver.lookup(filename).ok_or_else(|| {
                WeightmapError::NotFound(format!("Weight '{filename}' is not in the weights map"))
            })?;
            print_json(entry)?;
        }
        Commands::List { category } => {
            for name in build_resolver(&cli)?.get_weights_by_type(category) {
                println!("{name}");
            }
        }
        Commands::Categories => {
            for category in build_resolver(&cli)?.categories() {
                println!("{category}");
            }
        }
        Commands::License { filename } => {
            let restricted = weightmap::license::is_non_commercial_only(filename);
            println!(
                "{filename}: {}",
                if restricted {
                    "non-commercial only"
                } else {
                    "no known commercial restriction"
                }
            );
        }
        Commands::NonCommercial => {
            for name in NON_COMMERCIAL_WEIGHTS {
                println!("{name}");
            }
        }
    }

    Ok(())
}

fn build_resolver(cli: &Cli) -> Result<Resolver> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let byo = cli.byo.as_deref().map(ByoManifest::load).transpose()?;
    let extensions = ExtensionRegistry::from_config(&config.extensions);
    let download = config.manifest.download_latest && !cli.no_download;

    let resolver = Resolver::with_download(&config, download, byo.as_ref(), &extensions)?;
    if let Some(outcome) = resolver.fetch_outcome() {
        tracing::debug!("Updated manifest fetch: {outcome:?}");
    }
    Ok(resolver)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{json}");
    Ok(())
}
