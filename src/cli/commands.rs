// file: src/cli/commands.rs
// version: 1.0.0
// guid: a9b0c1d2-e3f4-5678-9012-345678abcdef

//! Command implementations for the CLI

use crate::{
    config::loader::ConfigLoader,
    deploy::{orchestrator, Deployer, DeploymentReport},
    network::{CancelToken, SshConnector},
    params::{ConfigDefaults, InteractivePrompts, ParameterSource},
    Result,
};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use tracing::info;

/// Run a deployment against the configured target
pub fn deploy_command(
    config_path: &str,
    interactive: bool,
    dry_run: bool,
    timeout: Option<u64>,
    cancel: CancelToken,
) -> Result<()> {
    let loader = ConfigLoader::new();
    let mut config = loader.load(config_path)?;

    // The flag wins over whatever the config file says
    if timeout.is_some() {
        config.target.run_timeout_secs = timeout;
    }

    let source: Box<dyn ParameterSource> = if interactive {
        Box::new(InteractivePrompts)
    } else {
        Box::new(ConfigDefaults)
    };
    let params = source.acquire(&config.params)?;

    if dry_run {
        orchestrator::preflight(&config)?;
        info!(
            "DRY RUN: would deploy to {}@{}:{}",
            config.target.username, config.target.host, config.target.port
        );
        info!(
            "DRY RUN: would upload {} -> {}",
            config.artifact.local_path.display(),
            config.artifact.remote_path
        );
        info!(
            "DRY RUN: would upload {} -> {}",
            config.install_script.local_path.display(),
            config.install_script.remote_path
        );
        info!(
            "DRY RUN: would run 'bash {}' configuring domain {}",
            config.install_script.remote_path, params.domain
        );
        return Ok(());
    }

    let bar = transfer_bar();
    let progress = |sent: u64, total: u64| {
        bar.set_length(total);
        bar.set_position(sent);
    };

    let deployer = Deployer::new(SshConnector::new(cancel.clone()), cancel);
    let result = deployer.run(&config, &params, Some(&progress), &mut |line| {
        println!("{}", line.dimmed())
    });
    bar.finish_and_clear();

    result.map(|_| DeploymentReport::new(&config, &params).print_success())
}

/// Validate the config and local files without connecting
pub fn check_command(config_path: &str) -> Result<()> {
    let loader = ConfigLoader::new();
    let config = loader.load(config_path)?;
    orchestrator::preflight(&config)?;

    let artifact_size = fs::metadata(&config.artifact.local_path)?.len();
    let script_size = fs::metadata(&config.install_script.local_path)?.len();

    println!("{}", "Configuration OK".green().bold());
    println!(
        "  Target:     {}@{}:{}",
        config.target.username, config.target.host, config.target.port
    );
    println!("  Auth:       {}", config.target.auth.method_name());
    println!(
        "  Artifact:   {} ({} bytes)",
        config.artifact.local_path.display(),
        artifact_size
    );
    println!(
        "  Script:     {} ({} bytes)",
        config.install_script.local_path.display(),
        script_size
    );
    println!("  Domain:     {}", config.params.domain);
    println!("  Wallet:     {}", config.params.wallet_address);
    println!("  Secret:     {}", config.params.masked_secret());

    Ok(())
}

fn transfer_bar() -> ProgressBar {
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})",
        )
        .expect("valid progress template")
        .progress_chars("#>-"),
    );
    bar
}
