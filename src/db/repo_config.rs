//! Repository configuration file support.
//!
//! This module provides utilities for reading repository configuration from
//! TOML configuration files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::RepositoryError;
use crate::db::HostedConfig;

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub hosted: HostedSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// Hosted API connection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostedSettings {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,
}

fn default_timeout_sec() -> u64 {
    30
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if successful
    /// * `Err(RepositoryError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: RepositoryConfig = toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Load repository configuration from the default location.
    ///
    /// Searches for `repository.toml` in:
    /// 1. Current directory
    /// 2. `config/` directory
    /// 3. Parent directory
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if found and parsed successfully
    /// * `Err(RepositoryError)` if no config file found or parse error
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = vec![
            PathBuf::from("repository.toml"),
            PathBuf::from("config/repository.toml"),
            PathBuf::from("../repository.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::configuration(
            "No repository.toml found in standard locations",
        ))
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// Convert to HostedConfig if this is a hosted configuration.
    #[cfg(feature = "hosted-repo")]
    pub fn to_hosted_config(&self) -> Result<Option<HostedConfig>, RepositoryError> {
        let repo_type = self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        if repo_type != RepositoryType::Hosted {
            return Ok(None);
        }

        if self.hosted.base_url.is_empty() {
            return Err(RepositoryError::configuration(
                "Hosted repository requires 'hosted.base_url' setting",
            ));
        }

        Ok(Some(HostedConfig {
            base_url: self.hosted.base_url.clone(),
            api_key: self.hosted.api_key.clone(),
            timeout_sec: self.hosted.timeout_sec,
        }))
    }

    /// Convert to HostedConfig when the feature is disabled.
    #[cfg(not(feature = "hosted-repo"))]
    pub fn to_hosted_config(&self) -> Result<Option<HostedConfig>, RepositoryError> {
        let repo_type = self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        if repo_type == RepositoryType::Hosted {
            return Err(RepositoryError::configuration(
                "Hosted repository feature not enabled",
            ));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_config() {
        let toml = r#"
[repository]
type = "local"
"#;

        let config: RepositoryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.repository.repo_type, "local");
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
    }

    #[cfg(feature = "hosted-repo")]
    #[test]
    fn test_parse_hosted_config() {
        let toml = r#"
[repository]
type = "hosted"

[hosted]
base_url = "https://api.example.test"
api_key = "secret"
timeout_sec = 15
"#;

        let config: RepositoryConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.repository.repo_type, "hosted");
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Hosted);

        let hosted_config = config.to_hosted_config().unwrap().unwrap();
        assert_eq!(hosted_config.base_url, "https://api.example.test");
        assert_eq!(hosted_config.api_key.as_deref(), Some("secret"));
        assert_eq!(hosted_config.timeout_sec, 15);
    }

    #[cfg(feature = "hosted-repo")]
    #[test]
    fn test_hosted_timeout_defaults() {
        let toml = r#"
[repository]
type = "hosted"

[hosted]
base_url = "https://api.example.test"
"#;

        let config: RepositoryConfig = toml::from_str(toml).unwrap();
        let hosted_config = config.to_hosted_config().unwrap().unwrap();
        assert_eq!(hosted_config.timeout_sec, 30);
        assert!(hosted_config.api_key.is_none());
    }

    #[cfg(feature = "hosted-repo")]
    #[test]
    fn test_hosted_requires_base_url() {
        let toml = r#"
[repository]
type = "hosted"

[hosted]
base_url = ""
"#;

        let config: RepositoryConfig = toml::from_str(toml).unwrap();
        let result = config.to_hosted_config();
        assert!(result.is_err());
    }

    #[test]
    fn test_local_config_maps_to_no_hosted_config() {
        let toml = r#"
[repository]
type = "local"
"#;

        let config: RepositoryConfig = toml::from_str(toml).unwrap();
        assert!(config.to_hosted_config().unwrap().is_none());
    }
}
