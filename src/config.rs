use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::gateway::types::ErrorFormat;

/// Environment variable overriding `auth.jwt_secret`
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    #[serde(default = "default_log_file")]
    pub log_file: String,
    #[serde(default)]
    pub use_json: bool,
    #[serde(default = "default_rotation")]
    pub rotation: String,
    pub gateway: GatewayConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    pub upstream: UpstreamConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> String {
    "./logs".to_string()
}

fn default_log_file() -> String {
    "gateway.log".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Failure body policy for the edit endpoints
    #[serde(default)]
    pub error_format: ErrorFormat,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthConfig {
    /// HS256 secret shared with the identity provider
    pub jwt_secret: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CorsConfig {
    /// `["*"]` allows any origin
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

/// Subscription edit service the gateway forwards to
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl AppConfig {
    /// Load `config/{env}.yaml`, then apply environment overrides.
    pub fn load(env: &str) -> Result<Self> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path))?;
        let mut config = Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path))?;
        if let Ok(secret) = std::env::var(JWT_SECRET_ENV) {
            config.apply_jwt_secret_override(secret);
        }
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config)
    }

    fn apply_jwt_secret_override(&mut self, secret: String) {
        if !secret.is_empty() {
            self.auth.jwt_secret = secret;
        }
    }
}

/// Pick the environment name from `--env <name>` / `-e <name>`, default `dev`.
pub fn env_from_args<I, S>(args: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let arg = arg.as_ref();
        if arg == "--env" || arg == "-e" {
            if let Some(value) = iter.next() {
                return value.as_ref().to_string();
            }
        } else if let Some(value) = arg.strip_prefix("--env=") {
            return value.to_string();
        }
    }
    "dev".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
gateway:
  host: 0.0.0.0
  port: 8080
auth:
  jwt_secret: s3cret
upstream:
  base_url: http://localhost:9090/internal/subscriptions/edit
"#;

    #[test]
    fn test_minimal_config_defaults() {
        let config = AppConfig::from_yaml(MINIMAL).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.rotation, "daily");
        assert!(!config.use_json);
        assert_eq!(config.gateway.port, 8080);
        assert_eq!(config.gateway.error_format, ErrorFormat::Legacy);
        assert_eq!(config.cors.allowed_origins, vec!["*"]);
        assert_eq!(config.upstream.timeout_ms, 10_000);
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
log_level: debug
log_dir: /tmp/logs
log_file: edit.log
use_json: true
rotation: hourly
gateway:
  host: 127.0.0.1
  port: 9000
  error_format: envelope
auth:
  jwt_secret: abc
cors:
  allowed_origins: ["http://localhost:3000"]
upstream:
  base_url: http://svc
  timeout_ms: 2500
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.gateway.error_format, ErrorFormat::Envelope);
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.upstream.timeout_ms, 2500);
        assert!(config.use_json);
    }

    #[test]
    fn test_missing_required_section_fails() {
        let yaml = "gateway:\n  host: a\n  port: 1\n";
        assert!(AppConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_jwt_secret_override() {
        let mut config = AppConfig::from_yaml(MINIMAL).unwrap();
        config.apply_jwt_secret_override(String::new());
        assert_eq!(config.auth.jwt_secret, "s3cret");
        config.apply_jwt_secret_override("from-env".to_string());
        assert_eq!(config.auth.jwt_secret, "from-env");
    }

    #[test]
    fn test_env_from_args() {
        assert_eq!(env_from_args(["bin"]), "dev");
        assert_eq!(env_from_args(["bin", "--env", "prod"]), "prod");
        assert_eq!(env_from_args(["bin", "-e", "staging"]), "staging");
        assert_eq!(env_from_args(["bin", "--env=ci"]), "ci");
        assert_eq!(env_from_args(["bin", "--env"]), "dev");
    }

    #[test]
    fn test_load_missing_file_has_path_context() {
        let err = AppConfig::load("does-not-exist").unwrap_err();
        assert!(err.to_string().contains("config/does-not-exist.yaml"));
    }
}
