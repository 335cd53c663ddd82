use serde::{Deserialize, Serialize};
use std::fs;

/// Immutable application configuration, loaded once at startup and handed to
/// each component at construction.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub log: LogConfig,
    pub gateway: GatewayConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    /// Origins allowed by the CORS layer (browser frontends).
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub use_json: bool,
    pub rotation: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "./logs".to_string(),
            file: "roster.log".to_string(),
            use_json: false,
            rotation: "daily".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthConfig {
    /// Process-wide token signing secret. Rotating it invalidates every
    /// previously issued token.
    pub secret: String,
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,
    #[serde(default)]
    pub hash: HashConfig,
}

fn default_token_ttl_minutes() -> i64 {
    60 * 24
}

/// Argon2id work factor. The defaults match the argon2 crate's own.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HashConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            memory_kib: 19456,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl AppConfig {
    pub fn load(env: &str) -> Self {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path)
            .unwrap_or_else(|_| panic!("Failed to read config file: {}", config_path));
        serde_yaml::from_str(&content).expect("Failed to parse config yaml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_yaml_fills_defaults() {
        let yaml = r#"
gateway:
  host: 127.0.0.1
  port: 9000
database:
  url: postgresql://localhost/roster
auth:
  secret: test-secret
"#;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.gateway.port, 9000);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.auth.token_ttl_minutes, 60 * 24);
        assert_eq!(config.auth.hash.memory_kib, 19456);
        assert_eq!(config.log.level, "info");
        assert!(config.cors_origins.is_empty());
    }
}
