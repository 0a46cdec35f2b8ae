// file: src/lib.rs
// version: 1.0.0
// guid: a1b2c3d4-e5f6-7890-1234-567890abcdef

//! # VPS Deploy Agent
//!
//! One-shot SSH deployment of a packaged web application to a single VPS:
//! upload the build tarball and the install script, run the script with a
//! fixed sequence of answers on its stdin, stream its output back, and
//! report the result.

pub mod cli;
pub mod config;
pub mod deploy;
pub mod error;
pub mod logging;
pub mod network;
pub mod params;

pub use error::{DeployError, Result};

/// Version information for the agent
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
