// file: src/params/interactive.rs
// version: 1.0.0
// guid: a3b4c5d6-e7f8-9012-3456-789012abcdef

//! Interactive parameter acquisition
//!
//! Prompts the operator for each answer with the config value as default.
//! The wallet secret is read without echo and is shown masked in the
//! confirmation summary.

use super::ParameterSource;
use crate::config::DeployParams;
use crate::error::DeployError;
use crate::Result;
use dialoguer::{Confirm, Input, Password};

/// Prompt-driven parameter source
pub struct InteractivePrompts;

impl InteractivePrompts {
    fn text_prompt(&self, label: &str, default: &str) -> Result<String> {
        let mut input = Input::<String>::new().with_prompt(label).allow_empty(true);
        if !default.is_empty() {
            input = input.default(default.to_string());
        }
        input
            .interact_text()
            .map_err(|e| DeployError::Config(format!("Prompt failed: {}", e)))
    }
}

impl ParameterSource for InteractivePrompts {
    fn acquire(&self, defaults: &DeployParams) -> Result<DeployParams> {
        println!("Deployment configuration (press Enter for defaults):");

        let domain = self.text_prompt("Domain name", &defaults.domain)?;
        let email = self.text_prompt("Email for Let's Encrypt", &defaults.email)?;
        let rpc_url = self.text_prompt("RPC endpoint", &defaults.rpc_url)?;
        let wallet_address = self.text_prompt("Prize wallet address", &defaults.wallet_address)?;

        let wallet_secret = {
            let entered = Password::new()
                .with_prompt("Prize wallet secret (hidden, Enter keeps configured value)")
                .allow_empty_password(true)
                .interact()
                .map_err(|e| DeployError::Config(format!("Prompt failed: {}", e)))?;
            if entered.is_empty() {
                defaults.wallet_secret.clone()
            } else {
                entered
            }
        };

        let extra_origin =
            self.text_prompt("Additional frontend origin (optional)", &defaults.extra_origin)?;

        let params = DeployParams {
            domain,
            email,
            rpc_url,
            wallet_address,
            wallet_secret,
            extra_origin,
        };
        params.validate()?;

        println!();
        println!("  Domain:         {}", params.domain);
        println!("  Email:          {}", params.email);
        println!("  RPC endpoint:   {}", params.rpc_url);
        println!("  Wallet address: {}", params.wallet_address);
        println!("  Wallet secret:  {}", params.masked_secret());
        println!(
            "  Extra origin:   {}",
            if params.extra_origin.is_empty() {
                "(none)"
            } else {
                &params.extra_origin
            }
        );
        println!();

        let proceed = Confirm::new()
            .with_prompt("Continue with deployment?")
            .default(false)
            .interact()
            .map_err(|e| DeployError::Config(format!("Prompt failed: {}", e)))?;

        if !proceed {
            return Err(DeployError::Cancelled);
        }

        Ok(params)
    }
}
