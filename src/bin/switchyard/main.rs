//! Switchyard CLI - bundle inspection and bridge call replay

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("switchyard=debug")
    } else {
        EnvFilter::new("switchyard=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let color = !cli.no_color;
    match cli.command {
        Commands::Detect(args) => commands::detect::execute(args, color),
        Commands::Config => commands::config::execute(),
        Commands::Replay(args) => commands::replay::execute(args, color),
    }
}
