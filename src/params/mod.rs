// file: src/params/mod.rs
// version: 1.0.0
// guid: f2a3b4c5-d6e7-8901-2345-678901fabcde

//! Parameter acquisition strategies
//!
//! The same orchestrator serves fully automated and interactive runs; the
//! only difference is where the install script answers come from.

pub mod interactive;

pub use interactive::InteractivePrompts;

use crate::config::DeployParams;
use crate::Result;

/// Source of the install script answers
pub trait ParameterSource {
    /// Produce the final parameter set, starting from the config defaults
    fn acquire(&self, defaults: &DeployParams) -> Result<DeployParams>;
}

/// Takes the answers straight from the configuration file, for unattended
/// runs
pub struct ConfigDefaults;

impl ParameterSource for ConfigDefaults {
    fn acquire(&self, defaults: &DeployParams) -> Result<DeployParams> {
        let params = defaults.clone();
        params.validate()?;
        Ok(params)
    }
}
