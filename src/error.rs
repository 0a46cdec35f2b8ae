// file: src/error.rs
// version: 1.0.0
// guid: b2c3d4e5-f6a7-8901-2345-678901bcdefa

//! Error types for the deployment agent

use thiserror::Error;

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, DeployError>;

/// Error types for deployment operations
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Connection failed: {0}")]
    Connectivity(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Transfer of {file} failed: {reason}")]
    Transfer { file: String, reason: String },

    #[error("Remote install script exited with code {exit_code}")]
    RemoteExecution { exit_code: i32 },

    #[error("Deployment cancelled by operator")]
    Cancelled,

    #[error("Deployment timed out: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl DeployError {
    /// Create a new precondition error
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Create a new connectivity error
    pub fn connectivity(msg: impl Into<String>) -> Self {
        Self::Connectivity(msg.into())
    }

    /// Create a new authentication error
    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a new transfer error for a given file
    pub fn transfer(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Transfer {
            file: file.into(),
            reason: reason.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Name of the pipeline stage this error belongs to, for operator-facing
    /// failure summaries.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Precondition(_) => "preflight",
            Self::Connectivity(_) | Self::Authentication(_) => "connect",
            Self::Transfer { .. } => "transfer",
            Self::RemoteExecution { .. } | Self::Timeout(_) => "execute",
            Self::Cancelled => "cancelled",
            Self::Config(_) => "config",
            Self::Io(_) | Self::Yaml(_) => "internal",
        }
    }

    /// Process exit code for this failure (130 for operator cancellation,
    /// matching the shell convention for SIGINT).
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Cancelled => 130,
            _ => 1,
        }
    }
}
