use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.privatbank.ua";
pub const DEFAULT_OUTPUT_PATH: &str = "exchange_rates.json";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProviderConfig {
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub output_path: String,
    /// Day requests allowed in flight at once.
    pub concurrency: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            provider: ProviderConfig::default(),
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            concurrency: 1,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, or falls back to defaults
    /// when no file has been created there.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("ua", "pbfx", "pbfx")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
provider:
  base_url: "http://localhost:8080"
output_path: "/tmp/rates.json"
concurrency: 4
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(config.provider.base_url, "http://localhost:8080");
        assert_eq!(config.output_path, "/tmp/rates.json");
        assert_eq!(config.concurrency(), 4);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: AppConfig =
            serde_yaml::from_str("concurrency: 0\n").expect("Failed to deserialize");
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.output_path, DEFAULT_OUTPUT_PATH);
        assert_eq!(config.concurrency(), 1);
    }

    #[test]
    fn test_load_from_path() -> Result<()> {
        let file = tempfile::NamedTempFile::new()?;
        fs::write(file.path(), "output_path: out.json\n")?;

        let config = AppConfig::load_from_path(file.path())?;
        assert_eq!(config.output_path, "out.json");
        assert_eq!(config.provider, ProviderConfig::default());
        Ok(())
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let err = AppConfig::load_from_path("/nonexistent/pbfx/config.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
