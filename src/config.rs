//! Configuration module
//!
//! Settings come from a TOML file (default
//! `~/.config/catalog-service/config.toml`), then environment variables
//! (`PORT`, `FRONTEND_URL`, `DATABASE_URL`, `APP_ENV`), then CLI flags.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::DatabaseConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// Runtime mode. Anything but `Production` exposes debug detail in error
/// responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    Development,
    Test,
    #[default]
    Production,
}

impl RuntimeMode {
    pub fn exposes_debug_detail(self) -> bool {
        self != Self::Production
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuntimeMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(ConfigError::InvalidValue {
                key: "mode",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
    pub body_limit_bytes: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            shutdown_timeout: 30,
            body_limit_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsSection {
    /// Origins allowed to make credentialed cross-origin requests
    pub allowed_origins: Vec<String>,
}

impl Default for CorsSection {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        let db = DatabaseConfig::default();
        Self {
            url: db.url,
            max_connections: db.max_connections,
            connect_timeout_secs: db.connect_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UsersSection {
    /// Insert the three demo users at startup
    pub seed_demo_data: bool,
}

impl Default for UsersSection {
    fn default() -> Self {
        Self {
            seed_demo_data: true,
        }
    }
}

/// Full application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mode: RuntimeMode,
    pub server: ServerSection,
    pub cors: CorsSection,
    pub database: DatabaseSection,
    pub logging: LoggingSection,
    pub users: UsersSection,
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Apply `PORT`, `FRONTEND_URL`, `DATABASE_URL` and `APP_ENV`.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT",
                value: port.clone(),
            })?;
        }
        if let Some(origins) = lookup("FRONTEND_URL") {
            self.cors.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(mode) = lookup("APP_ENV") {
            self.mode = mode.parse()?;
        }
        Ok(())
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            connect_timeout_secs: self.database.connect_timeout_secs,
        }
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// `~/.config/catalog-service/config.toml`, or `./config.toml` when no
/// config directory is known.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("catalog-service").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_are_production_on_port_3000() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.mode, RuntimeMode::Production);
        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.cors.allowed_origins, vec!["http://localhost:3000"]);
        assert!(cfg.users.seed_demo_data);
        assert!(!cfg.mode.exposes_debug_detail());
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            mode = "development"

            [server]
            port = 8080

            [logging]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.mode, RuntimeMode::Development);
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn env_overrides_apply() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("PORT", "4000"),
            ("FRONTEND_URL", "http://a.test, http://b.test"),
            ("APP_ENV", "test"),
        ]);
        let mut cfg = AppConfig::default();
        cfg.apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(cfg.server.port, 4000);
        assert_eq!(cfg.cors.allowed_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(cfg.mode, RuntimeMode::Test);
        assert!(cfg.mode.exposes_debug_detail());
    }

    #[test]
    fn bad_port_is_rejected() {
        let mut cfg = AppConfig::default();
        let err = cfg
            .apply_overrides(|k| (k == "PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "PORT", .. }));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let cfg = AppConfig::load(Path::new("/definitely/not/here.toml")).unwrap();
        assert_eq!(cfg.server.port, 3000);
    }
}
