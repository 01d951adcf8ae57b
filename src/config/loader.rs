//! Configuration file loading

use super::file::{ConfigFile, CONFIG_FILE_NAME};
use crate::error::BuildSizeError;
use crate::infra::{FileSystem, RealFileSystem};
use log::debug;
use std::path::Path;

/// Handles loading configuration files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from .build-size.toml in the given directory
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use build_size::config::ConfigLoader;
    /// use std::path::Path;
    ///
    /// let config = ConfigLoader::load(Path::new("."))?;
    /// println!("Snapshots are cached in {}", config.cache_dir.display());
    /// # Ok::<(), build_size::error::BuildSizeError>(())
    /// ```
    pub fn load(project_root: &Path) -> Result<ConfigFile, BuildSizeError> {
        Self::load_with_fs(project_root, &RealFileSystem)
    }

    /// Load config with a custom filesystem implementation
    pub fn load_with_fs<FS: FileSystem>(
        project_root: &Path,
        fs: &FS,
    ) -> Result<ConfigFile, BuildSizeError> {
        let config_path = project_root.join(CONFIG_FILE_NAME);

        let contents = match fs.read_to_string(&config_path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                return Ok(ConfigFile::default());
            }
            Err(e) => {
                return Err(BuildSizeError::Io {
                    context: format!("reading {}", config_path.display()),
                    source: e,
                });
            }
        };

        let config: ConfigFile =
            toml_edit::de::from_str(&contents).map_err(|source| BuildSizeError::ConfigParse {
                path: config_path.clone(),
                source,
            })?;

        config.validate()?;
        debug!("Loaded {}", config_path.display());
        Ok(config)
    }

    /// Check if config file exists in project
    pub fn exists(project_root: &Path) -> bool {
        project_root.join(CONFIG_FILE_NAME).exists()
    }
}
