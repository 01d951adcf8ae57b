//! Recursive size scan of a build directory

use super::sizes::BuildSizes;
use log::debug;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Scan failures. Any failure aborts the whole scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The build directory does not exist
    #[error("Build directory not found: {}", path.display())]
    NotFound {
        /// Requested root
        path: PathBuf,
    },

    /// The build directory path is not a directory
    #[error("Build path is not a directory: {}", path.display())]
    NotADirectory {
        /// Requested root
        path: PathBuf,
    },

    /// A directory entry or file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Unreadable {
        /// Offending path (root when unknown)
        path: PathBuf,
        #[source]
        /// Underlying traversal error
        source: walkdir::Error,
    },

    /// A file path is not valid UTF-8 and cannot become a snapshot key
    #[error("Non UTF-8 path in build output: {}", path.display())]
    NonUtf8Path {
        /// Offending path
        path: PathBuf,
    },
}

/// Compute the size of every regular file below `root`.
///
/// Paths are relative to `root` and always use `/` separators. Symlinks are
/// followed; the build directory is assumed to be free of link cycles and a
/// loop is reported as [`ScanError::Unreadable`].
///
/// # Examples
///
/// ```no_run
/// use build_size::snapshot::scan;
/// use std::path::Path;
///
/// let sizes = scan(Path::new("dist"))?;
/// println!("{} files, {} bytes", sizes.len(), sizes.total());
/// # Ok::<(), build_size::snapshot::ScanError>(())
/// ```
pub fn scan(root: &Path) -> Result<BuildSizes, ScanError> {
    if !root.exists() {
        return Err(ScanError::NotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut sizes = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).min_depth(1) {
        let entry = entry.map_err(|source| ScanError::Unreadable {
            path: source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            source,
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        let size = entry
            .metadata()
            .map_err(|source| ScanError::Unreadable {
                path: entry.path().to_path_buf(),
                source,
            })?
            .len();

        let relative = relative_key(root, entry.path())?;
        debug!("{} -> {} bytes", relative, size);
        sizes.push((relative, size));
    }

    Ok(sizes.into_iter().collect())
}

/// Build the `/`-separated key for `path` below `root`
fn relative_key(root: &Path, path: &Path) -> Result<String, ScanError> {
    let relative = path.strip_prefix(root).unwrap_or(path);

    let mut parts = Vec::new();
    for component in relative.components() {
        let part = component
            .as_os_str()
            .to_str()
            .ok_or_else(|| ScanError::NonUtf8Path {
                path: path.to_path_buf(),
            })?;
        parts.push(part);
    }
    Ok(parts.join("/"))
}
