// file: src/deploy/report.rs
// version: 1.0.0
// guid: d6e7f8a9-b0c1-2345-6789-012345defabc

//! Operator-facing run summary
//!
//! Printed after the pipeline finishes. The summary never contains the
//! wallet secret or the SSH password.

use crate::config::{DeployConfig, DeployParams};
use crate::error::DeployError;
use colored::Colorize;

/// Everything the success banner needs, captured before printing
pub struct DeploymentReport {
    domain: String,
    username: String,
    host: String,
    service_name: String,
}

impl DeploymentReport {
    pub fn new(config: &DeployConfig, params: &DeployParams) -> Self {
        Self {
            domain: params.domain.clone(),
            username: config.target.username.clone(),
            host: config.target.host.clone(),
            service_name: config.service_name.clone(),
        }
    }

    pub fn web_url(&self) -> String {
        format!("https://{}", self.domain)
    }

    pub fn websocket_url(&self) -> String {
        format!("wss://{}/ws", self.domain)
    }

    pub fn health_url(&self) -> String {
        format!("https://{}/api/healthz", self.domain)
    }

    /// Commands the operator can paste to inspect the deployed service
    pub fn management_hints(&self) -> Vec<String> {
        vec![
            format!("ssh {}@{}", self.username, self.host),
            format!("pm2 status {}", self.service_name),
            format!("pm2 logs {} --lines 100", self.service_name),
        ]
    }

    pub fn print_success(&self) {
        println!();
        println!("{}", "=".repeat(70).green());
        println!("{}", "  Deployment complete".green().bold());
        println!("{}", "=".repeat(70).green());
        println!();
        println!("  Web app:      {}", self.web_url().cyan());
        println!("  WebSocket:    {}", self.websocket_url().cyan());
        println!("  Health check: {}", self.health_url().cyan());
        println!();
        println!("  Manage the service:");
        for hint in self.management_hints() {
            println!("    {}", hint.yellow());
        }
        println!();
        println!(
            "  Certificates renew automatically; re-run this tool to ship a new build."
        );
        println!();
    }
}

/// Print the failure banner with the stage the error belongs to
pub fn print_failure(error: &DeployError) {
    eprintln!();
    eprintln!("{}", "=".repeat(70).red());
    match error {
        DeployError::Cancelled => {
            eprintln!("{}", "  Deployment cancelled".yellow().bold());
        }
        _ => {
            eprintln!("{}", "  Deployment failed".red().bold());
        }
    }
    eprintln!("{}", "=".repeat(70).red());
    eprintln!();
    eprintln!("  Stage: {}", error.stage());
    eprintln!("  Error: {}", error);
    if !matches!(error, DeployError::Cancelled) {
        eprintln!();
        eprintln!("  The target may hold a partial deployment; SSH in to inspect it.");
    }
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, DeployConfig, FileSpec, TargetHost};
    use std::path::PathBuf;

    fn report() -> DeploymentReport {
        let config = DeployConfig {
            target: TargetHost {
                host: "203.0.113.10".to_string(),
                port: 22,
                username: "root".to_string(),
                auth: AuthConfig::Password {
                    password: "hunter2".to_string(),
                },
                connect_timeout_secs: 30,
                run_timeout_secs: None,
            },
            artifact: FileSpec {
                local_path: PathBuf::from("app.tar.gz"),
                remote_path: "/tmp/app.tar.gz".to_string(),
            },
            install_script: FileSpec {
                local_path: PathBuf::from("deploy.sh"),
                remote_path: "/tmp/deploy.sh".to_string(),
            },
            service_name: "webapp-server-ws".to_string(),
            params: DeployParams::sample(),
        };
        DeploymentReport::new(&config, &config.params)
    }

    #[test]
    fn test_urls_derive_from_domain() {
        let r = report();
        let domain = &DeployParams::sample().domain;
        assert_eq!(r.web_url(), format!("https://{}", domain));
        assert_eq!(r.websocket_url(), format!("wss://{}/ws", domain));
        assert_eq!(r.health_url(), format!("https://{}/api/healthz", domain));
    }

    #[test]
    fn test_management_hints_name_the_service() {
        let r = report();
        let hints = r.management_hints();
        assert!(hints[0].starts_with("ssh root@"));
        assert!(hints[1].contains("webapp-server-ws"));
        assert!(hints[2].contains("--lines 100"));
    }

    #[test]
    fn test_report_carries_no_secrets() {
        let r = report();
        let secret = DeployParams::sample().wallet_secret;
        for hint in r.management_hints() {
            assert!(!hint.contains(&secret));
        }
    }
}
