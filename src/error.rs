//! Error types with contextual suggestions
//!
//! Each layer owns its error enum ([`ScanError`], [`CacheError`],
//! [`ReportError`]); [`BuildSizeError`] covers configuration problems caught
//! before the pipelines start. [`ErrorFormatter`] walks an `anyhow` chain,
//! finds whichever of these it carries, and maps it to a suggestion and a
//! sysexits-style exit code.
//!
//! # Examples
//!
//! ```
//! use build_size::error::BuildSizeError;
//!
//! let error = BuildSizeError::MissingInput {
//!     name: "label",
//!     flag: "--label",
//!     env: "BUILD_SIZE_LABEL",
//! };
//!
//! assert_eq!(error.exit_code(), 78);
//! assert!(error.suggestion().unwrap().contains("BUILD_SIZE_LABEL"));
//! ```

use crate::cache::CacheError;
use crate::sink::ReportError;
use crate::snapshot::ScanError;
use std::error::Error as StdError;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors, raised before any pipeline work starts
#[derive(Error, Debug)]
pub enum BuildSizeError {
    /// A required input is missing or empty
    #[error("Missing required input: {name}")]
    MissingInput {
        /// Input name
        name: &'static str,
        /// CLI flag providing it
        flag: &'static str,
        /// Environment variable providing it
        env: &'static str,
    },

    /// Configuration file could not be parsed
    #[error("Failed to parse {}", path.display())]
    ConfigParse {
        /// Config file path
        path: PathBuf,
        #[source]
        /// Parse error source
        source: toml_edit::de::Error,
    },

    /// Configuration value is invalid
    #[error("Invalid configuration value for '{field}': {message}")]
    InvalidConfig {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        message: String,
    },

    /// Generic I/O error with context
    #[error("I/O error: {context}")]
    Io {
        /// Context about where the error occurred
        context: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },
}

impl BuildSizeError {
    /// Get actionable suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::MissingInput { flag, env, .. } => {
                Some(format!("Pass {} or set the {} environment variable", flag, env))
            }
            Self::ConfigParse { .. } => {
                Some("Check .build-size.toml for TOML syntax errors and unknown keys".to_string())
            }
            Self::InvalidConfig { field, .. } => Some(format!(
                "Fix or remove '{}' in .build-size.toml to use the default",
                field
            )),
            Self::Io { context, .. } => Some(format!(
                "Check file permissions and that {} is accessible",
                context
            )),
        }
    }

    /// Get appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingInput { .. } => 78, // EX_CONFIG
            Self::ConfigParse { .. } => 78,  // EX_CONFIG
            Self::InvalidConfig { .. } => 78, // EX_CONFIG
            Self::Io { .. } => 74,           // EX_IOERR
        }
    }
}

/// Suggestion for a pipeline-layer error
fn layer_suggestion(error: &(dyn StdError + 'static)) -> Option<String> {
    if let Some(e) = error.downcast_ref::<BuildSizeError>() {
        return e.suggestion();
    }
    if let Some(e) = error.downcast_ref::<ScanError>() {
        return Some(match e {
            ScanError::NotFound { .. } | ScanError::NotADirectory { .. } => {
                "Run the build before measuring it, and point --dir at its output directory"
                    .to_string()
            }
            ScanError::Unreadable { .. } => {
                "Check permissions and dangling symlinks in the build directory".to_string()
            }
            ScanError::NonUtf8Path { .. } => {
                "Rename build outputs to UTF-8 file names".to_string()
            }
        });
    }
    if let Some(e) = error.downcast_ref::<CacheError>() {
        return match e {
            CacheError::Corrupt { path, .. } => Some(format!(
                "Remove the damaged entry at {}",
                path.parent().unwrap_or(path).display()
            )),
            CacheError::Io { .. } => Some("Check that --cache-dir is writable".to_string()),
            _ => None,
        };
    }
    if let Some(e) = error.downcast_ref::<ReportError>() {
        return Some(match e {
            ReportError::Spawn { .. } => {
                "Install the GitHub CLI (https://cli.github.com) or use --dry-run".to_string()
            }
            ReportError::CommandFailed { .. } => {
                "Check that --token can comment on the pull request given by --pr".to_string()
            }
        });
    }
    None
}

/// Exit code for a pipeline-layer error
fn layer_exit_code(error: &(dyn StdError + 'static)) -> Option<i32> {
    if let Some(e) = error.downcast_ref::<BuildSizeError>() {
        return Some(e.exit_code());
    }
    if let Some(e) = error.downcast_ref::<ScanError>() {
        return Some(match e {
            ScanError::NotFound { .. } | ScanError::NotADirectory { .. } => 66, // EX_NOINPUT
            _ => 74, // EX_IOERR
        });
    }
    if let Some(e) = error.downcast_ref::<CacheError>() {
        return Some(match e {
            CacheError::InvalidRequest(_) => 70, // EX_SOFTWARE
            CacheError::Corrupt { .. } => 65,    // EX_DATAERR
            _ => 74,                             // EX_IOERR
        });
    }
    if error.downcast_ref::<ReportError>().is_some() {
        return Some(69); // EX_UNAVAILABLE
    }
    None
}

/// Error formatter with colors and structured output
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format error with its cause chain and a suggestion when one applies
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = String::new();

        output.push_str(&format!("{} {}\n", style("error:").red().bold(), error));

        let mut source = error.source();
        let mut indent = 1;
        while let Some(err) = source {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                style("caused by:").yellow(),
                err
            ));
            source = err.source();
            indent += 1;
        }

        if let Some(suggestion) = error.chain().find_map(layer_suggestion) {
            output.push_str(&format!(
                "\n{} {}\n",
                style("help:").cyan().bold(),
                suggestion
            ));
        }

        output
    }

    /// Get exit code from error
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        error.chain().find_map(layer_exit_code).unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_missing_input_names_flag_and_env() {
        let err = BuildSizeError::MissingInput {
            name: "commit",
            flag: "--sha",
            env: "GITHUB_SHA",
        };

        let suggestion = err.suggestion().expect("MissingInput should have suggestion");
        assert!(suggestion.contains("--sha"));
        assert!(suggestion.contains("GITHUB_SHA"));
        assert_eq!(err.exit_code(), 78);
    }

    #[test]
    fn test_exit_code_found_through_context() {
        let scan_failure: Result<(), ScanError> = Err(ScanError::NotFound {
            path: PathBuf::from("dist"),
        });
        let err = scan_failure
            .context("Failed to compute build size")
            .unwrap_err();

        assert_eq!(ErrorFormatter::exit_code(&err), 66);
        let formatted = ErrorFormatter::format(&err);
        assert!(formatted.contains("Failed to compute build size"));
        assert!(formatted.contains("Build directory not found: dist"));
        assert!(formatted.contains("--dir"));
    }

    #[test]
    fn test_report_failures_map_to_unavailable() {
        let err = anyhow::Error::new(ReportError::CommandFailed {
            program: "gh".to_string(),
            code: Some(1),
            stderr: "HTTP 401".to_string(),
        });

        assert_eq!(ErrorFormatter::exit_code(&err), 69);
        assert!(ErrorFormatter::format(&err).contains("--token"));
    }

    #[test]
    fn test_cache_save_failure_is_io_error() {
        let err = anyhow::Error::new(CacheError::io(
            "Failed to create cache directory",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        ));
        assert_eq!(ErrorFormatter::exit_code(&err), 74);
    }

    #[test]
    fn test_unknown_errors_exit_with_one() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(ErrorFormatter::exit_code(&err), 1);
        assert!(!ErrorFormatter::format(&err).contains("help:"));
    }

    #[test]
    fn test_all_error_variants_have_suggestions() {
        let errors = vec![
            BuildSizeError::MissingInput {
                name: "pr",
                flag: "--pr",
                env: "BUILD_SIZE_PR",
            },
            BuildSizeError::InvalidConfig {
                field: "key_prefix",
                message: "must not be empty".to_string(),
            },
            BuildSizeError::Io {
                context: "cache directory".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "boom"),
            },
        ];

        for err in errors {
            assert!(err.suggestion().is_some(), "{} lacks a suggestion", err);
        }
    }
}
