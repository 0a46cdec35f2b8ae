// file: src/config/params.rs
// version: 1.0.0
// guid: a7b8c9d0-e1f2-3456-7890-123456abcdef

//! Deployment parameters fed to the remote install script
//!
//! The install script reads its answers from stdin, one per line, in a fixed
//! order. The order here is a positional contract with the script: changing
//! it silently feeds the wrong value to the wrong prompt.

use serde::{Deserialize, Serialize};
use std::fmt;

fn default_rpc_url() -> String {
    "https://api.mainnet-beta.solana.com".to_string()
}

/// Ordered answers for the install script prompts
#[derive(Clone, Serialize, Deserialize)]
pub struct DeployParams {
    /// Domain the site is served from
    pub domain: String,
    /// Contact email for certificate issuance
    pub email: String,
    /// RPC endpoint the server talks to
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Prize pool wallet public address
    pub wallet_address: String,
    /// Prize pool wallet secret key. Never logged or echoed.
    pub wallet_secret: String,
    /// Additional allowed frontend origin, blank permitted
    #[serde(default)]
    pub extra_origin: String,
}

impl DeployParams {
    /// Render the answers as the exact byte sequence written to the remote
    /// script's stdin: newline-joined, order preserved, with the reserved
    /// blank third line retained and a trailing newline.
    pub fn stdin_payload(&self) -> String {
        let lines = [
            self.domain.as_str(),
            self.email.as_str(),
            "", // reserved line, the script skips it
            self.rpc_url.as_str(),
            self.wallet_address.as_str(),
            self.wallet_secret.as_str(),
            self.extra_origin.as_str(),
        ];
        let mut payload = lines.join("\n");
        payload.push('\n');
        payload
    }

    /// Validate that the required answers are present
    pub fn validate(&self) -> crate::Result<()> {
        if self.domain.is_empty() {
            return Err(crate::error::DeployError::Config(
                "Domain is required".to_string(),
            ));
        }
        if self.email.is_empty() {
            return Err(crate::error::DeployError::Config(
                "Email is required".to_string(),
            ));
        }
        if self.rpc_url.is_empty() {
            return Err(crate::error::DeployError::Config(
                "RPC endpoint is required".to_string(),
            ));
        }
        if self.wallet_address.is_empty() {
            return Err(crate::error::DeployError::Config(
                "Wallet address is required".to_string(),
            ));
        }
        if self.wallet_secret.is_empty() {
            return Err(crate::error::DeployError::Config(
                "Wallet secret is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Secret masked for display, same length as the real value
    pub fn masked_secret(&self) -> String {
        "*".repeat(self.wallet_secret.len())
    }
}

// Manual Debug so the wallet secret cannot leak through `{:?}` in logs.
impl fmt::Debug for DeployParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployParams")
            .field("domain", &self.domain)
            .field("email", &self.email)
            .field("rpc_url", &self.rpc_url)
            .field("wallet_address", &self.wallet_address)
            .field("wallet_secret", &"<redacted>")
            .field("extra_origin", &self.extra_origin)
            .finish()
    }
}

#[cfg(test)]
impl DeployParams {
    /// Fixture used across unit tests
    pub fn sample() -> Self {
        Self {
            domain: "example.io".to_string(),
            email: "admin@example.io".to_string(),
            rpc_url: "https://api.devnet.solana.com".to_string(),
            wallet_address: "11111111111111111111111111111111".to_string(),
            wallet_secret: "dummy-secret".to_string(),
            extra_origin: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdin_payload_order_and_blank_line() {
        let params = DeployParams {
            domain: "domain".to_string(),
            email: "email".to_string(),
            rpc_url: "endpoint".to_string(),
            wallet_address: "wallet".to_string(),
            wallet_secret: "secret".to_string(),
            extra_origin: "origin".to_string(),
        };
        assert_eq!(
            params.stdin_payload(),
            "domain\nemail\n\nendpoint\nwallet\nsecret\norigin\n"
        );
    }

    #[test]
    fn test_stdin_payload_blank_origin_keeps_line() {
        let mut params = DeployParams::sample();
        params.extra_origin.clear();
        assert!(params.stdin_payload().ends_with("dummy-secret\n\n"));
    }

    #[test]
    fn test_validate_requires_core_fields() {
        let mut params = DeployParams::sample();
        assert!(params.validate().is_ok());

        params.domain.clear();
        assert!(params.validate().is_err());

        let mut params = DeployParams::sample();
        params.wallet_secret.clear();
        assert!(params.validate().is_err());

        // Blank origin is allowed
        let mut params = DeployParams::sample();
        params.extra_origin.clear();
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let params = DeployParams::sample();
        let rendered = format!("{:?}", params);
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("dummy-secret"));
    }

    #[test]
    fn test_masked_secret_length() {
        let params = DeployParams::sample();
        assert_eq!(params.masked_secret().len(), "dummy-secret".len());
        assert!(params.masked_secret().chars().all(|c| c == '*'));
    }

    #[test]
    fn test_rpc_url_default() {
        let yaml = r#"
domain: example.io
email: admin@example.io
wallet_address: "11111111111111111111111111111111"
wallet_secret: dummy
"#;
        let params: DeployParams = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(params.rpc_url, "https://api.mainnet-beta.solana.com");
        assert!(params.extra_origin.is_empty());
    }
}
