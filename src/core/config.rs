//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Engine configuration with layered hierarchy
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub cache: CacheConfig,
    pub export: ExportConfig,
}

/// Cache behavior
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Seconds before a cached snapshot expires. Unset means entries live
    /// until explicitly invalidated.
    pub ttl_seconds: Option<u64>,
}

/// Export serializer settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Field separator for delimited-text export
    pub delimiter: char,

    /// Rows per page in the print document
    pub rows_per_page: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            rows_per_page: 40,
        }
    }
}

impl EngineConfig {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = EngineConfig::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/atrium/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Ok(contents) = std::fs::read_to_string(&global_path) {
                    if let Ok(global) = serde_yml::from_str::<EngineConfig>(&contents) {
                        config = global;
                    }
                }
            }
        }

        // 3. Environment variables
        if let Ok(ttl) = std::env::var("ATRIUM_CACHE_TTL_SECONDS") {
            if let Ok(ttl) = ttl.parse() {
                config.cache.ttl_seconds = Some(ttl);
            }
        }
        if let Ok(delim) = std::env::var("ATRIUM_EXPORT_DELIMITER") {
            if let Some(c) = delim.chars().next() {
                config.export.delimiter = c;
            }
        }

        config
    }

    /// Load configuration from an explicit YAML file
    pub fn load_from(path: &Path) -> Result<Self, serde_yml::Error> {
        let contents = std::fs::read_to_string(path).unwrap_or_default();
        serde_yml::from_str(&contents)
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "atrium")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Cache TTL as a duration, when configured
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache.ttl_seconds.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(config.cache.ttl_seconds.is_none());
        assert!(config.cache_ttl().is_none());
        assert_eq!(config.export.delimiter, ',');
        assert_eq!(config.export.rows_per_page, 40);
    }

    #[test]
    fn test_parse_partial_yaml() {
        let config: EngineConfig = serde_yml::from_str("cache:\n  ttl_seconds: 30\n").unwrap();
        assert_eq!(config.cache.ttl_seconds, Some(30));
        assert_eq!(config.cache_ttl(), Some(Duration::from_secs(30)));
        // Unspecified sections keep their defaults
        assert_eq!(config.export.delimiter, ',');
    }

    #[test]
    fn test_parse_export_overrides() {
        let yaml = "export:\n  delimiter: ';'\n  rows_per_page: 25\n";
        let config: EngineConfig = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.export.delimiter, ';');
        assert_eq!(config.export.rows_per_page, 25);
    }
}
