use std::error::Error;
use std::path::PathBuf;

use cardresource_plugin::CardResourcePluginFactory;
use cardresource_spi::PoolPluginFactorySpi;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

mod commands;
mod pool;
mod utils;

#[derive(Parser)]
#[command(version, about = "Allocate readers from a card resource pool")]
struct Cli {
    /// Pool description file (TOML)
    #[arg(short, long)]
    config: PathBuf,

    /// Debug level output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the profiles readers can be allocated from
    Profiles,

    /// Allocate a reader, show it and release it
    Allocate {
        /// Card resource profile
        #[arg(required = true)]
        profile: String,
    },

    /// Allocate a reader, send one APDU and release it
    Transmit {
        /// Card resource profile
        #[arg(required = true)]
        profile: String,

        /// Command APDU, as a hex string
        #[arg(required = true)]
        apdu: String,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let pool = pool::PoolFile::from_file(&cli.config)?;
    let service = pool.start_service()?;
    debug!(readers = pool.readers.len(), "Simulated pool started");

    let factory = CardResourcePluginFactory::builder_from_config(&pool.plugin, service)?.build();
    let plugin = factory.pool_plugin();

    match &cli.command {
        Commands::Profiles => commands::profiles_command(&plugin),
        Commands::Allocate { profile } => commands::allocate_command(&plugin, profile)?,
        Commands::Transmit { profile, apdu } => commands::transmit_command(&plugin, profile, apdu)?,
    }

    Ok(())
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(level))
        .with_ansi(true)
        .init();
}

/// `RUST_LOG` directives on top of the level chosen on the command line
fn log_filter(level: tracing::Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy()
}
