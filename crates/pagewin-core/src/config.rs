use crate::error::PagewinError;
use crate::pagination::IndexPolicy;
use crate::result::PagewinResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const DEFAULT_LOAD_LOG_CAPACITY: usize = 64;

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_load_log_capacity() -> usize {
    DEFAULT_LOAD_LOG_CAPACITY
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Persisted page-size preference.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Keep the page index inside `[0, page_count - 1]`. Off by default.
    #[serde(default)]
    pub clamp_page_index: bool,

    #[serde(default = "default_load_log_capacity")]
    pub load_log_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            clamp_page_index: false,
            load_log_capacity: DEFAULT_LOAD_LOG_CAPACITY,
        }
    }
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/pagewin/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("pagewin/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("pagewin\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    /// Load from the platform config path, falling back to defaults when the
    /// file is missing or does not parse.
    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                match Self::load_from(&config_path) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!(
                            "Ignoring config at {}: {}",
                            config_path.display(),
                            e
                        );
                    }
                }
            }
        }
        Self::default()
    }

    /// Load and validate an explicit config file.
    pub fn load_from(path: &Path) -> PagewinResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> PagewinResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PagewinResult<()> {
        if self.page_size == 0 {
            return Err(PagewinError::Validation(
                "page_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn index_policy(&self) -> IndexPolicy {
        IndexPolicy::from_clamp(self.clamp_page_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.page_size, 10);
        assert!(!config.clamp_page_index);
        assert_eq!(config.index_policy(), IndexPolicy::Unclamped);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = AppConfig::from_toml_str("page_size = 25\n").unwrap();
        assert_eq!(config.page_size, 25);
        assert!(!config.clamp_page_index);
        assert_eq!(config.load_log_capacity, DEFAULT_LOAD_LOG_CAPACITY);
    }

    #[test]
    fn test_clamp_flag_selects_policy() {
        let config = AppConfig::from_toml_str("clamp_page_index = true\n").unwrap();
        assert_eq!(config.index_policy(), IndexPolicy::Clamped);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = AppConfig::from_toml_str("page_size = 0\n").unwrap_err();
        assert!(matches!(err, PagewinError::Validation(_)));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = AppConfig::from_toml_str("page_size = \"ten\"\n").unwrap_err();
        assert!(matches!(err, PagewinError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "page_size = 5").unwrap();
        writeln!(file, "load_log_capacity = 3").unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.page_size, 5);
        assert_eq!(config.load_log_capacity, 3);
    }

    #[test]
    fn test_load_from_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, PagewinError::Io(_)));
    }
}
