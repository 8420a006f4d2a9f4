use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::loader::TextEncoding;

/// Optional deployment config, read from the working directory.
pub const CONFIG_FILE: &str = "dashboard.json";

pub const DEFAULT_CSV_PATH: &str = "calibrate-power-stock/gem_cleaned_2025.csv";

/// Where the plant table lives and how it is encoded.
///
/// ```json
/// { "csv_path": "data/gem.csv", "encoding": "utf8" }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub csv_path: PathBuf,
    pub encoding: TextEncoding,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            encoding: TextEncoding::default(),
        }
    }
}

impl DashboardConfig {
    /// Read [`CONFIG_FILE`] if it exists, otherwise use the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No {} found, using default config", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config: DashboardConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        log::info!("Config loaded from {}: {config:?}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig::load_from(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.encoding, TextEncoding::Latin1);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "encoding": "utf-8" }"#).unwrap();

        let config = DashboardConfig::load_from(&path).unwrap();
        assert_eq!(config.encoding, TextEncoding::Utf8);
        assert_eq!(config.csv_path, PathBuf::from(DEFAULT_CSV_PATH));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, r#"{ "encoding": "ebcdic" }"#).unwrap();

        let err = DashboardConfig::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }
}
