use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};
use wards::{JsonFileStore, WardSession, WardsConfig};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "wardctl", version, about = "Ward admission queue and bed allocation")]
struct Cli {
    /// Directory holding patients.json and beds.json (default: WARDS_STATE_DIR or .wards)
    #[arg(long, global = true, value_name = "DIR")]
    state_dir: Option<PathBuf>,

    /// Beds to create when no roster has been saved yet (default: WARDS_BED_COUNT or 10)
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..))]
    bed_count: Option<u32>,

    /// Output machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Put a patient in the waiting queue
    Add(commands::patients::AddArgs),
    /// Move the most urgent waiting patient into the first free bed
    Allocate,
    /// Free an occupied bed; its patient record is dropped
    Discharge {
        /// Bed number
        #[arg(value_name = "BED")]
        bed: Option<String>,
    },
    /// Show the waiting queue in admission order
    Queue,
    /// Show the most urgent waiting patient
    Next,
    /// Show every bed
    Beds,
    /// List occupied beds that can be discharged
    Occupied,
    /// Print version and exit
    Version,
}

fn init_tracing() {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn resolve_config(cli: &Cli) -> WardsConfig {
    let mut config = wards::config::load_from_env();
    if let Some(dir) = &cli.state_dir {
        config.state_dir = dir.clone();
    }
    if let Some(count) = cli.bed_count {
        config.bed_count = count;
    }
    config
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Version = cli.cmd {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let config = resolve_config(&cli);
    tracing::debug!("Using state dir {}", config.state_dir.display());
    let mut ward = WardSession::open(&config, JsonFileStore::new(&config.state_dir))?;
    let json = cli.json;

    match cli.cmd {
        Commands::Add(args) => commands::patients::add(&mut ward, args, json),
        Commands::Allocate => commands::beds::allocate(&mut ward, json),
        Commands::Discharge { bed } => {
            commands::beds::discharge(&mut ward, bed.as_deref().unwrap_or_default(), json)
        }
        Commands::Queue => commands::patients::queue(&ward, json),
        Commands::Next => commands::patients::next(&ward, json),
        Commands::Beds => commands::beds::list(&ward, json),
        Commands::Occupied => commands::beds::occupied(&ward, json),
        Commands::Version => Ok(()),
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let json = cli.json;

    if let Err(e) = run(cli) {
        render::error(&e, json);
        std::process::exit(1);
    }
}
