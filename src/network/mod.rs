// file: src/network/mod.rs
// version: 1.0.0
// guid: c9d0e1f2-a3b4-5678-9012-345678cdefab

//! Network operations module

pub mod remote;
pub mod ssh;

pub use remote::{CancelToken, Connect, ExecutionResult, ProgressFn, RemoteHost, TransferUnit};
pub use ssh::{SshClient, SshConnector};
