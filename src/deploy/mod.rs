// file: src/deploy/mod.rs
// version: 1.0.0
// guid: b4c5d6e7-f8a9-0123-4567-890123bcdefa

//! Deployment pipeline

pub mod orchestrator;
pub mod report;

pub use orchestrator::Deployer;
pub use report::DeploymentReport;
