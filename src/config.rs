//! Server Configuration

use crate::PhishError;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Default config file location
pub const DEFAULT_CONFIG_PATH: &str = "/etc/opensase/phishguard.json";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: SocketAddr,
    /// Model artifact (JSON)
    pub model_path: PathBuf,
    /// Allow any origin
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            model_path: PathBuf::from("models/phishing_tree.json"),
            cors_permissive: true,
        }
    }
}

impl ServerConfig {
    /// Load from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PhishError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| PhishError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load from file, falling back to defaults when it is absent
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, PhishError> {
        match Self::load(path.as_ref()) {
            Err(PhishError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.as_ref().display(), "Config not found, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Save to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PhishError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| PhishError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply command-line/environment overrides
    pub fn with_overrides(mut self, bind_addr: Option<SocketAddr>, model_path: Option<PathBuf>) -> Self {
        if let Some(addr) = bind_addr {
            self.bind_addr = addr;
        }
        if let Some(path) = model_path {
            self.model_path = path;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8000);
        assert!(config.cors_permissive);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phishguard.json");
        std::fs::write(&path, r#"{"bind_addr": "127.0.0.1:9090"}"#).unwrap();

        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9090".parse::<SocketAddr>().unwrap());
        assert_eq!(config.model_path, ServerConfig::default().model_path);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phishguard.json");
        let config = ServerConfig {
            cors_permissive: false,
            ..ServerConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(ServerConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = ServerConfig::load_or_default("/nonexistent/phishguard.json").unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phishguard.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(ServerConfig::load_or_default(&path), Err(PhishError::Config(_))));
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::default()
            .with_overrides(Some("127.0.0.1:1".parse().unwrap()), None);
        assert_eq!(config.bind_addr.port(), 1);
        assert_eq!(config.model_path, PathBuf::from("models/phishing_tree.json"));
    }
}
