//! CLI for thermowatch — a local temperature logbook with a live dashboard.

mod commands;
mod logging;
mod tui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thermowatch_core::{DEFAULT_DATA_DIR, DashboardConfig};

#[derive(Parser)]
#[command(name = "thermowatch")]
#[command(about = "thermowatch — record, simulate and watch temperatures")]
#[command(version = thermowatch_core::VERSION)]
struct Cli {
    /// Directory holding the persisted history
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record one manual temperature reading (°C)
    Add {
        /// Temperature in degrees Celsius, e.g. 21.5
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Print the recorded history, oldest first
    List {
        /// Only show the most recent N records
        #[arg(long)]
        limit: Option<usize>,

        /// Print the records as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show the latest reading, gauge position and auto-mode flag
    Status,

    /// Delete every recorded temperature
    Clear {
        /// Do not ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// Run the random-walk simulation in the foreground until Ctrl+C
    Simulate {
        /// Stop after this long (e.g. "30s", "5m", "1h")
        #[arg(long)]
        duration: Option<String>,

        /// Time between samples (e.g. "3s", "500ms")
        #[arg(long, default_value = "3s")]
        interval: String,

        /// Walk seed: latest (any reading) or simulated (simulated readings only)
        #[arg(long, default_value = "latest", value_parser = ["latest", "simulated"])]
        seed_policy: String,

        /// Fixed RNG seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Write the history to a CSV, JSON or TXT file
    Export {
        /// Output format
        #[arg(long, default_value = "csv", value_parser = ["csv", "json", "txt"])]
        format: String,

        /// Output path (default: temperatures.<format>)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Live interactive temperature dashboard (TUI)
    Monitor {
        /// Time between simulated samples (e.g. "3s")
        #[arg(long, default_value = "3s")]
        interval: String,

        /// Walk seed: latest (any reading) or simulated (simulated readings only)
        #[arg(long, default_value = "latest", value_parser = ["latest", "simulated"])]
        seed_policy: String,

        /// Fixed RNG seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() {
    let cli = Cli::parse();
    let config = DashboardConfig {
        data_dir: cli.data_dir,
        ..DashboardConfig::default()
    };

    match cli.command {
        Commands::Monitor { .. } => logging::init_file(&config.data_dir),
        _ => logging::init_stderr(),
    }

    match cli.command {
        Commands::Add { value } => commands::add::run(&config, &value),
        Commands::List { limit, json } => commands::list::run(&config, limit, json),
        Commands::Status => commands::status::run(&config),
        Commands::Clear { yes } => commands::clear::run(&config, yes),
        Commands::Simulate {
            duration,
            interval,
            seed_policy,
            seed,
        } => commands::simulate::run(
            config,
            duration.as_deref(),
            &interval,
            &seed_policy,
            seed,
        ),
        Commands::Export { format, output } => {
            commands::export::run(&config, &format, output.as_deref())
        }
        Commands::Monitor {
            interval,
            seed_policy,
            seed,
        } => commands::monitor::run(config, &interval, &seed_policy, seed),
    }
}
