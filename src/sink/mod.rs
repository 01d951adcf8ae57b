//! Report publishing
//!
//! A [`ReportSink`] delivers the rendered report to where reviewers see it.
//! Failures propagate to the caller; retries are up to the transport.

mod gh;

pub use gh::GhCliSink;

use thiserror::Error;

/// Report publishing failures
#[derive(Debug, Error)]
pub enum ReportError {
    /// The publishing program could not be started
    #[error("Failed to run {program}: {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },

    /// The publishing program ran and reported failure
    #[error("{program} exited with {}: {stderr}", exit_code_label(*code))]
    CommandFailed {
        /// Program that failed
        program: String,
        /// Exit code, when the process exited normally
        code: Option<i32>,
        /// Captured stderr
        stderr: String,
    },
}

fn exit_code_label(code: Option<i32>) -> String {
    code.map(|c| format!("status {}", c))
        .unwrap_or_else(|| "a signal".to_string())
}

/// Destination for rendered reports
pub trait ReportSink {
    /// Publish `body` under `title` on `target` (a pull request number)
    fn post(&self, target: &str, token: &str, title: &str, body: &str) -> Result<(), ReportError>;
}

/// Full comment text: a heading with `title` followed by `body`
pub fn compose_comment(title: &str, body: &str) -> String {
    format!("## {}\n\n{}", title, body)
}

/// Prints the comment to stdout instead of publishing it
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl ReportSink for StdoutSink {
    fn post(&self, target: &str, _token: &str, title: &str, body: &str) -> Result<(), ReportError> {
        log::info!("Dry run: printing report for {} instead of posting", target);
        println!("{}", compose_comment(title, body));
        Ok(())
    }
}
