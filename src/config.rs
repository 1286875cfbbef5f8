//! Configuration management for Cinedex
//!
//! Handles config file loading/saving and API key resolution.
//! Config is stored at ~/.config/cinedex/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default base URL of the Cinedex service (local development server)
const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Bundled OMDB API key (free-tier public key)
const DEFAULT_OMDB_KEY: &str = "b6003b9d";

/// Bundled TMDB API key
const DEFAULT_TMDB_KEY: &str = "885ef92a497cb93aeec3b89cdda09697";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the Cinedex service
    pub api_url: Option<String>,
    /// OMDB API key
    pub omdb_api_key: Option<String>,
    /// TMDB API key
    pub tmdb_api_key: Option<String>,
}

impl Config {
    /// Get config file path (~/.config/cinedex/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cinedex").join("config.toml"))
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path =
            Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Get the service base URL with fallback chain:
    /// 1. Environment variable CINEDEX_API_URL
    /// 2. Config file
    /// 3. Local development default
    pub fn get_api_url(&self) -> String {
        if let Ok(url) = std::env::var("CINEDEX_API_URL") {
            return url;
        }
        self.api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Get the OMDB API key (OMDB_API_KEY env, config file, bundled default)
    pub fn get_omdb_api_key(&self) -> String {
        if let Ok(key) = std::env::var("OMDB_API_KEY") {
            return key;
        }
        self.omdb_api_key
            .clone()
            .unwrap_or_else(|| DEFAULT_OMDB_KEY.to_string())
    }

    /// Get the TMDB API key (TMDB_API_KEY env, config file, bundled default)
    pub fn get_tmdb_api_key(&self) -> String {
        if let Ok(key) = std::env::var("TMDB_API_KEY") {
            return key;
        }
        self.tmdb_api_key
            .clone()
            .unwrap_or_else(|| DEFAULT_TMDB_KEY.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.api_url.is_none());
        assert!(config.omdb_api_key.is_none());
        assert!(config.tmdb_api_key.is_none());
    }

    #[test]
    fn test_config_file_overrides_default() {
        let config = Config {
            api_url: Some("https://api.cinedex.example".to_string()),
            ..Config::default()
        };
        // Env wins over both, but is absent in tests
        if std::env::var("CINEDEX_API_URL").is_err() {
            assert_eq!(config.get_api_url(), "https://api.cinedex.example");
        }
    }

    #[test]
    fn test_bundled_keys_present() {
        let config = Config::default();
        if std::env::var("OMDB_API_KEY").is_err() {
            assert!(!config.get_omdb_api_key().is_empty());
        }
        if std::env::var("TMDB_API_KEY").is_err() {
            assert_eq!(config.get_tmdb_api_key().len(), 32); // TMDB keys are 32 chars
        }
    }
}
