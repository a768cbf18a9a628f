//! `farasa` command-line entry point

use clap::Parser;
use farasa_cli::commands::Commands;

/// Run Farasa Arabic NLP tasks from the command line
#[derive(Debug, Parser)]
#[command(name = "farasa", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> anyhow::Result<()> {
    Cli::parse().command.execute()
}
