//! `.build-size.toml` configuration file

use crate::error::BuildSizeError;
use crate::snapshot::{is_key_safe, DEFAULT_KEY_PREFIX, DEFAULT_SNAPSHOT_FILE};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = ".build-size.toml";

/// Default directory of the local snapshot cache
pub const DEFAULT_CACHE_DIR: &str = ".build-size-cache";

/// Default report heading
pub const DEFAULT_REPORT_TITLE: &str = "Build Size Report";

/// Optional project configuration
///
/// Every field has a default, so an absent file and an empty file behave
/// the same.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Prefix of every snapshot cache key
    pub key_prefix: String,
    /// Snapshot payload path, relative to the working directory
    pub snapshot_file: String,
    /// Local cache directory, relative to the working directory
    pub cache_dir: PathBuf,
    /// Heading of the posted report
    pub report_title: String,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            snapshot_file: DEFAULT_SNAPSHOT_FILE.to_string(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            report_title: DEFAULT_REPORT_TITLE.to_string(),
        }
    }
}

impl ConfigFile {
    /// Check field constraints
    ///
    /// # Examples
    ///
    /// ```
    /// use build_size::config::ConfigFile;
    ///
    /// let mut config = ConfigFile::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.key_prefix = "my cache".to_string();
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), BuildSizeError> {
        if self.key_prefix.is_empty() {
            return Err(invalid("key_prefix", "must not be empty"));
        }
        if let Some(c) = self
            .key_prefix
            .chars()
            .find(|&c| !(c == '-' || (c.is_ascii() && is_key_safe(c as u8))))
        {
            return Err(invalid(
                "key_prefix",
                format!("character '{}' is not allowed in cache keys", c),
            ));
        }

        if self.snapshot_file.trim().is_empty() {
            return Err(invalid("snapshot_file", "must not be empty"));
        }
        if Path::new(&self.snapshot_file).is_absolute() {
            return Err(invalid(
                "snapshot_file",
                "must be relative to the working directory",
            ));
        }

        if self.cache_dir.as_os_str().is_empty() {
            return Err(invalid("cache_dir", "must not be empty"));
        }

        if self.report_title.trim().is_empty() {
            return Err(invalid("report_title", "must not be empty"));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, message: impl Into<String>) -> BuildSizeError {
    BuildSizeError::InvalidConfig {
        field,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ConfigFile::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.key_prefix, "build-size");
        assert_eq!(config.snapshot_file, "build-size.json");
    }

    #[test]
    fn test_key_prefix_allows_dashes_but_not_spaces() {
        let mut config = ConfigFile {
            key_prefix: "web-bundle".to_string(),
            ..ConfigFile::default()
        };
        assert!(config.validate().is_ok());

        config.key_prefix = "web bundle".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("key_prefix"));
    }

    #[test]
    fn test_absolute_snapshot_file_is_rejected() {
        let config = ConfigFile {
            snapshot_file: if cfg!(windows) {
                "C:\\sizes.json".to_string()
            } else {
                "/tmp/sizes.json".to_string()
            },
            ..ConfigFile::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_report_title_is_rejected() {
        let config = ConfigFile {
            report_title: "   ".to_string(),
            ..ConfigFile::default()
        };
        assert!(config.validate().is_err());
    }
}
