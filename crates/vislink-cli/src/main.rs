//! Vislink CLI - exercise the visualiser hand-off from the command line.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "vislink")]
#[command(author, version, about = "Vislink visualiser hand-off CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Race an audio thread against editors opening and closing
    Stress(commands::stress::StressArgs),

    /// Show or create the scope configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Stress(args) => commands::stress::run(args),
        Commands::Config(args) => commands::config::run(args),
    }
}
