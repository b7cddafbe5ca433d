//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Switchyard - inspect bundles and replay bridge calls against the dispatch runtime
#[derive(Parser)]
#[command(name = "switchyard")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the framework each bundle would bind to
    Detect(DetectArgs),

    /// Print the merged settings
    Config,

    /// Replay a script of bridge calls against loopback frameworks
    Replay(ReplayArgs),
}

#[derive(Args)]
pub struct DetectArgs {
    /// Bundle files to inspect
    #[arg(required = true)]
    pub bundles: Vec<PathBuf>,

    /// Framework names to treat as registered (the default framework always is)
    #[arg(long = "framework", value_name = "NAME")]
    pub frameworks: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ReplayArgs {
    /// JSON file holding an array of `{ "method": ..., "args": [...] }` calls
    pub script: PathBuf,

    /// Additional loopback frameworks to register (the default framework always is)
    #[arg(long = "framework", value_name = "NAME")]
    pub frameworks: Vec<String>,
}
