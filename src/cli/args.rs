// file: src/cli/args.rs
// version: 1.0.0
// guid: f8a9b0c1-d2e3-4567-8901-234567fabcde

//! Command line argument definitions

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vps-deploy-agent")]
#[command(about = "Deploy the webapp stack to a VPS over SSH")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a deployment against the configured target
    Deploy {
        #[arg(short, long, help = "Path to the deployment config YAML")]
        config: String,

        #[arg(short, long, help = "Prompt for each parameter before deploying")]
        interactive: bool,

        #[arg(long, help = "Show what would be done without touching the target")]
        dry_run: bool,

        #[arg(long, help = "Abort the run after this many seconds")]
        timeout: Option<u64>,
    },

    /// Validate the config and local files without connecting
    Check {
        #[arg(short, long, help = "Path to the deployment config YAML")]
        config: String,
    },
}
