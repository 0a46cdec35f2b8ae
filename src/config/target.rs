// file: src/config/target.rs
// version: 1.0.0
// guid: f6a7b8c9-d0e1-2345-6789-012345fabcde

//! Target host and deployment plan configuration structures

use super::params::DeployParams;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_port() -> u16 {
    22
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_service_name() -> String {
    "webapp-server-ws".to_string()
}

/// Top-level deployment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Target VPS to deploy to
    pub target: TargetHost,
    /// Build artifact tarball (local path and remote destination)
    pub artifact: FileSpec,
    /// Install script executed on the target
    pub install_script: FileSpec,
    /// Process-manager service name, used in the post-deploy command hints
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Default answers for the install script prompts
    pub params: DeployParams,
}

/// One remote host plus the credential used to reach it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetHost {
    /// Host address (IP or DNS name)
    pub host: String,
    /// SSH port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Account name on the target
    pub username: String,
    /// Authentication method
    pub auth: AuthConfig,
    /// TCP connect / handshake timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Optional overall cap on the remote install run, in seconds.
    /// Distinct from the connect timeout; unset means no cap.
    #[serde(default)]
    pub run_timeout_secs: Option<u64>,
}

/// Authentication credential, resolved from the environment at load time
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum AuthConfig {
    /// Password authentication (supports ${ENV_VAR} substitution)
    Password { password: String },
    /// Private-key file authentication
    Key {
        key_file: PathBuf,
        #[serde(default)]
        passphrase: Option<String>,
    },
}

impl AuthConfig {
    /// Display label; never includes the credential itself
    pub fn method_name(&self) -> &'static str {
        match self {
            AuthConfig::Password { .. } => "password",
            AuthConfig::Key { .. } => "key file",
        }
    }
}

// Credentials stay out of debug output
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthConfig::Password { .. } => f
                .debug_struct("Password")
                .field("password", &"<redacted>")
                .finish(),
            AuthConfig::Key {
                key_file,
                passphrase,
            } => f
                .debug_struct("Key")
                .field("key_file", key_file)
                .field("passphrase", &passphrase.as_ref().map(|_| "<redacted>"))
                .finish(),
        }
    }
}

/// A local file and the remote path it is copied to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSpec {
    /// Local source path
    pub local_path: PathBuf,
    /// Absolute destination path on the target
    pub remote_path: String,
}

impl DeployConfig {
    /// Validate the deployment configuration
    pub fn validate(&self) -> crate::Result<()> {
        self.target.validate()?;
        self.artifact.validate("artifact")?;
        self.install_script.validate("install_script")?;
        self.params.validate()?;
        Ok(())
    }
}

impl TargetHost {
    /// Validate the target host configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.host.is_empty() {
            return Err(crate::error::DeployError::Config(
                "Target host cannot be empty".to_string(),
            ));
        }

        if self.username.is_empty() {
            return Err(crate::error::DeployError::Config(
                "Username cannot be empty".to_string(),
            ));
        }

        match &self.auth {
            AuthConfig::Password { password } => {
                if password.is_empty() {
                    return Err(crate::error::DeployError::Config(
                        "Password cannot be empty".to_string(),
                    ));
                }
            }
            AuthConfig::Key { key_file, .. } => {
                if key_file.as_os_str().is_empty() {
                    return Err(crate::error::DeployError::Config(
                        "Key file path cannot be empty".to_string(),
                    ));
                }
            }
        }

        Ok(())
    }
}

impl FileSpec {
    /// Validate a file spec; `what` names the entry in error messages
    pub fn validate(&self, what: &str) -> crate::Result<()> {
        if self.local_path.as_os_str().is_empty() {
            return Err(crate::error::DeployError::Config(format!(
                "{}: local path cannot be empty",
                what
            )));
        }

        if !self.remote_path.starts_with('/') {
            return Err(crate::error::DeployError::Config(format!(
                "{}: remote path must be absolute, got {}",
                what, self.remote_path
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> DeployConfig {
        DeployConfig {
            target: TargetHost {
                host: "203.0.113.10".to_string(),
                port: 22,
                username: "root".to_string(),
                auth: AuthConfig::Password {
                    password: "secret".to_string(),
                },
                connect_timeout_secs: 30,
                run_timeout_secs: None,
            },
            artifact: FileSpec {
                local_path: PathBuf::from("build/app-deploy.tar.gz"),
                remote_path: "/tmp/app-deploy.tar.gz".to_string(),
            },
            install_script: FileSpec {
                local_path: PathBuf::from("scripts/deploy-from-root.sh"),
                remote_path: "/tmp/deploy-from-root.sh".to_string(),
            },
            service_name: "webapp-server-ws".to_string(),
            params: DeployParams::sample(),
        }
    }

    #[test]
    fn test_validate_ok() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_host() {
        let mut c = valid_config();
        c.target.host.clear();
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_validate_empty_password() {
        let mut c = valid_config();
        c.target.auth = AuthConfig::Password {
            password: String::new(),
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_validate_relative_remote_path() {
        let mut c = valid_config();
        c.artifact.remote_path = "tmp/app.tar.gz".to_string();
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_auth_debug_redacts_password() {
        let auth = AuthConfig::Password {
            password: "hunter2".to_string(),
        };
        let rendered = format!("{:?}", auth);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
        assert_eq!(auth.method_name(), "password");
    }

    #[test]
    fn test_defaults_applied() {
        let yaml = r#"
target:
  host: 203.0.113.10
  username: root
  auth:
    method: password
    password: secret
artifact:
  local_path: build/app.tar.gz
  remote_path: /tmp/app.tar.gz
install_script:
  local_path: scripts/install.sh
  remote_path: /tmp/install.sh
params:
  domain: example.io
  email: admin@example.io
  wallet_address: "11111111111111111111111111111111"
  wallet_secret: dummy
"#;
        let config: DeployConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.target.port, 22);
        assert_eq!(config.target.connect_timeout_secs, 30);
        assert!(config.target.run_timeout_secs.is_none());
        assert_eq!(config.service_name, "webapp-server-ws");
    }
}
