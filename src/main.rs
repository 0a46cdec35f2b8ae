// file: src/main.rs
// version: 1.0.0
// guid: b0c1d2e3-f4a5-6789-0123-456789bcdefa

//! VPS Deploy Agent - Main entry point

use clap::Parser;
use tokio::signal;
use tracing::warn;
use vps_deploy_agent::{
    cli::{
        args::{Cli, Commands},
        commands::*,
    },
    deploy::report,
    logging::logger,
    network::CancelToken,
    Result,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init_logger(cli.verbose, cli.quiet) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    // First Ctrl+C asks the running stage to stop at its next checkpoint;
    // a second one gives up waiting.
    let cancel = CancelToken::new();
    {
        let token = cancel.clone();
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                warn!("Received Ctrl+C, cancelling the run...");
                token.cancel();
                if signal::ctrl_c().await.is_ok() {
                    std::process::exit(130);
                }
            }
        });
    }

    // The SSH stack is blocking, so the whole command runs off the async
    // runtime and cancellation is cooperative through the token.
    let worker = tokio::task::spawn_blocking(move || run_command(cli, cancel));

    let code = match worker.await {
        Ok(Ok(())) => 0,
        Ok(Err(e)) => {
            report::print_failure(&e);
            e.exit_code()
        }
        Err(e) => {
            eprintln!("Worker task failed: {}", e);
            1
        }
    };
    std::process::exit(code);
}

fn run_command(cli: Cli, cancel: CancelToken) -> Result<()> {
    match cli.command {
        Commands::Deploy {
            config,
            interactive,
            dry_run,
            timeout,
        } => deploy_command(&config, interactive, dry_run, timeout, cancel),
        Commands::Check { config } => check_command(&config),
    }
}
