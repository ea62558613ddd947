mod commands;
mod logging;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sluice",
    version,
    about = "Dependency-resolving data-pipeline runner"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every job in a directory in dependency order
    Run {
        /// Directory of JSON job files
        jobs_dir: PathBuf,
        /// Run-scoped date substituted into process queries (default: today)
        #[arg(long)]
        work_date: Option<NaiveDate>,
        /// Resolve and print the dispatch plan without executing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Validate every job file in a directory
    Check {
        /// Directory of JSON job files
        jobs_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level);

    match cli.command {
        Commands::Run {
            jobs_dir,
            work_date,
            dry_run,
        } => commands::run::execute(&jobs_dir, work_date, dry_run).await,
        Commands::Check { jobs_dir } => commands::check::execute(&jobs_dir),
    }
}
