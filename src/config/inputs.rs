//! Caller-supplied pipeline inputs

use crate::error::BuildSizeError;
use std::path::PathBuf;

/// Inputs shared by both pipelines
#[derive(Debug, Clone)]
pub struct BuildInputs {
    /// Build output directory to measure
    pub dir: PathBuf,
    /// Commit being built
    pub sha: String,
    /// Build label, e.g. the bundle or target name
    pub label: String,
}

impl BuildInputs {
    /// Reject missing or blank inputs
    pub fn validate(&self) -> Result<(), BuildSizeError> {
        if self.dir.as_os_str().is_empty() {
            return Err(missing("build directory", "--dir", "BUILD_SIZE_DIR"));
        }
        require(&self.sha, "commit", "--sha", "GITHUB_SHA")?;
        require(&self.label, "label", "--label", "BUILD_SIZE_LABEL")
    }
}

/// Extra inputs of the reporting pipeline
#[derive(Debug, Clone)]
pub struct ReportInputs {
    /// Pull request the report is posted to
    pub pr: String,
    /// Token authorized to comment on `pr`
    pub token: String,
}

impl ReportInputs {
    /// Reject missing or blank inputs
    pub fn validate(&self) -> Result<(), BuildSizeError> {
        require(&self.pr, "pull request", "--pr", "BUILD_SIZE_PR")?;
        require(&self.token, "token", "--token", "GITHUB_TOKEN")
    }
}

fn require(
    value: &str,
    name: &'static str,
    flag: &'static str,
    env: &'static str,
) -> Result<(), BuildSizeError> {
    if value.trim().is_empty() {
        return Err(missing(name, flag, env));
    }
    Ok(())
}

fn missing(name: &'static str, flag: &'static str, env: &'static str) -> BuildSizeError {
    BuildSizeError::MissingInput { name, flag, env }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> BuildInputs {
        BuildInputs {
            dir: PathBuf::from("dist"),
            sha: "abc123".to_string(),
            label: "web".to_string(),
        }
    }

    #[test]
    fn test_complete_inputs_are_valid() {
        assert!(inputs().validate().is_ok());
    }

    #[test]
    fn test_blank_label_is_missing_input() {
        let build = BuildInputs {
            label: "  ".to_string(),
            ..inputs()
        };

        let err = build.validate().unwrap_err();
        assert!(matches!(err, BuildSizeError::MissingInput { name: "label", .. }));
    }

    #[test]
    fn test_empty_sha_is_reported_first_after_dir() {
        let build = BuildInputs {
            sha: String::new(),
            label: String::new(),
            ..inputs()
        };

        let err = build.validate().unwrap_err();
        assert!(matches!(err, BuildSizeError::MissingInput { flag: "--sha", .. }));
    }

    #[test]
    fn test_report_inputs_require_token() {
        let report = ReportInputs {
            pr: "12".to_string(),
            token: String::new(),
        };

        let err = report.validate().unwrap_err();
        assert!(matches!(err, BuildSizeError::MissingInput { env: "GITHUB_TOKEN", .. }));
    }
}
