// file: src/logging/logger.rs
// version: 1.0.0
// guid: d4e5f6a7-b8c9-0123-4567-890123defabc

//! Logger initialization and configuration

use crate::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system
pub fn init_logger(verbose: bool, quiet: bool) -> Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .map_err(|e| {
            crate::error::DeployError::Config(format!("Failed to initialize logger: {}", e))
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // The subscriber can only be installed once per process, so these only
    // verify the call does not panic regardless of which test runs first.
    #[test]
    fn test_init_logger_default() {
        let result = init_logger(false, false);
        assert!(result.is_ok() || result.is_err());
    }

    #[test]
    fn test_init_logger_quiet_wins() {
        let result = init_logger(true, true);
        assert!(result.is_ok() || result.is_err());
    }
}
