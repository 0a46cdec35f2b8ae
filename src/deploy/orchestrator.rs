// file: src/deploy/orchestrator.rs
// version: 1.0.0
// guid: c5d6e7f8-a9b0-1234-5678-901234cdefab

//! Deployment orchestrator
//!
//! Owns the end-to-end sequence: preflight, connect, upload artifact, upload
//! install script, mark executable, run the script with the answers on its
//! stdin, and tear the session down on every exit path. Any stage failure
//! aborts the remaining stages; nothing is retried, and a partial run leaves
//! the target in an undefined state that a fresh run does not clean up.

use crate::config::{DeployConfig, DeployParams, FileSpec};
use crate::error::DeployError;
use crate::network::remote::ProgressFn;
use crate::network::{CancelToken, Connect, ExecutionResult, RemoteHost, TransferUnit};
use crate::Result;
use std::fs;
use tracing::{info, warn};

/// Drives one deployment run over a connector-produced session
pub struct Deployer<C: Connect> {
    connector: C,
    cancel: CancelToken,
}

impl<C: Connect> Deployer<C> {
    pub fn new(connector: C, cancel: CancelToken) -> Self {
        Self { connector, cancel }
    }

    /// Execute the full pipeline. On success the returned result has exit
    /// code 0; a non-zero remote exit surfaces as `RemoteExecution` after
    /// the output has already been streamed through `on_line`.
    pub fn run(
        &self,
        config: &DeployConfig,
        params: &DeployParams,
        transfer_progress: Option<ProgressFn<'_>>,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<ExecutionResult> {
        // Local checks happen before any network activity
        preflight(config)?;
        self.cancel.check()?;

        let mut host = self.connector.connect(&config.target)?;
        let result = self.run_connected(&mut host, config, params, transfer_progress, on_line);

        // Teardown runs on success, failure, and cancellation alike
        host.close();
        result
    }

    fn run_connected(
        &self,
        host: &mut C::Host,
        config: &DeployConfig,
        params: &DeployParams,
        transfer_progress: Option<ProgressFn<'_>>,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<ExecutionResult> {
        self.cancel.check()?;
        info!("Step 1: Upload artifact tarball");
        let artifact = match transfer_progress {
            Some(progress) => TransferUnit::with_progress(
                config.artifact.local_path.as_path(),
                config.artifact.remote_path.as_str(),
                progress,
            ),
            None => TransferUnit::new(
                config.artifact.local_path.as_path(),
                config.artifact.remote_path.as_str(),
            ),
        };
        host.upload(&artifact)?;

        self.cancel.check()?;
        info!("Step 2: Upload install script");
        host.upload(&TransferUnit::new(
            config.install_script.local_path.as_path(),
            config.install_script.remote_path.as_str(),
        ))?;

        self.cancel.check()?;
        // Best-effort: the script is invoked through bash explicitly, so a
        // failed chmod is not fatal.
        if let Err(e) = host.set_executable(&config.install_script.remote_path) {
            warn!(
                "Could not mark {} executable, continuing: {}",
                config.install_script.remote_path, e
            );
        }

        self.cancel.check()?;
        info!("Step 3: Run install script (this can take several minutes)");
        // Terminal echo or the script itself may repeat the stdin answers;
        // any line carrying the secret is masked before it reaches the
        // console or the captured output.
        let secret = params.wallet_secret.as_str();
        let masked = params.masked_secret();
        let mut guarded = |line: &str| {
            if line.contains(secret) {
                on_line(&line.replace(secret, &masked));
            } else {
                on_line(line);
            }
        };
        let mut result = host.run_script(
            &config.install_script.remote_path,
            &params.stdin_payload(),
            &mut guarded,
        )?;
        if result.output.contains(secret) {
            result.output = result.output.replace(secret, &masked);
        }

        if !result.success() {
            return Err(DeployError::RemoteExecution {
                exit_code: result.exit_code,
            });
        }

        Ok(result)
    }
}

/// Verify both local files exist and are non-empty
pub fn preflight(config: &DeployConfig) -> Result<()> {
    check_local_file("Artifact tarball", &config.artifact)?;
    check_local_file("Install script", &config.install_script)?;
    Ok(())
}

fn check_local_file(what: &str, spec: &FileSpec) -> Result<()> {
    let metadata = fs::metadata(&spec.local_path).map_err(|_| {
        DeployError::precondition(format!(
            "{} not found at {}",
            what,
            spec.local_path.display()
        ))
    })?;

    if !metadata.is_file() {
        return Err(DeployError::precondition(format!(
            "{} at {} is not a regular file",
            what,
            spec.local_path.display()
        )));
    }

    if metadata.len() == 0 {
        return Err(DeployError::precondition(format!(
            "{} at {} is empty",
            what,
            spec.local_path.display()
        )));
    }

    Ok(())
}
