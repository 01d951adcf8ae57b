//! Pull request comments through the GitHub CLI

use super::{compose_comment, ReportError, ReportSink};
use crate::infra::{CommandExecutor, RealCommandExecutor};
use log::info;

const GH: &str = "gh";

/// Posts reports with `gh pr comment`, authenticating through `GH_TOKEN`
pub struct GhCliSink<CE: CommandExecutor = RealCommandExecutor> {
    cmd_executor: CE,
    repo: Option<String>,
}

impl GhCliSink<RealCommandExecutor> {
    /// Create a sink running the real `gh` binary
    pub fn new() -> Self {
        Self::with_executor(RealCommandExecutor)
    }
}

impl Default for GhCliSink<RealCommandExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<CE: CommandExecutor> GhCliSink<CE> {
    /// Create a sink with a custom command executor (for testing)
    pub fn with_executor(cmd_executor: CE) -> Self {
        Self {
            cmd_executor,
            repo: None,
        }
    }

    /// Target an explicit `owner/name` repository instead of the checkout's
    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self
    }
}

impl<CE: CommandExecutor> ReportSink for GhCliSink<CE> {
    fn post(&self, target: &str, token: &str, title: &str, body: &str) -> Result<(), ReportError> {
        let comment = compose_comment(title, body);
        info!("Posting \"{}\" to pull request #{}", title, target);

        let output = self
            .cmd_executor
            .execute(
                |cmd| {
                    cmd.args(["pr", "comment", target, "--body", comment.as_str()])
                        .env("GH_TOKEN", token);
                    if let Some(repo) = &self.repo {
                        cmd.args(["--repo", repo.as_str()]);
                    }
                    cmd
                },
                GH,
            )
            .map_err(|source| ReportError::Spawn {
                program: GH.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(ReportError::CommandFailed {
                program: GH.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
