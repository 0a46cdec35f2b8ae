// file: src/config/mod.rs
// version: 1.0.0
// guid: e5f6a7b8-c9d0-1234-5678-901234efabcd

//! Configuration structures and loading

pub mod loader;
pub mod params;
pub mod target;

pub use loader::ConfigLoader;
pub use params::DeployParams;
pub use target::{AuthConfig, DeployConfig, FileSpec, TargetHost};
