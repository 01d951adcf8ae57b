//! Command handlers for the build-size CLI
//!
//! Each submodule handles one CLI command. The `snapshot` and `report`
//! modules also expose their pipelines (`produce`, `report`) generic over
//! the cache and sink so they can run against test doubles.

pub mod completions;
pub mod report;
pub mod snapshot;

pub use completions::cmd_completions;
pub use report::{cmd_report, report, ReportOptions, ReportSummary, ReportTarget};
pub use snapshot::{cmd_snapshot, produce, ProduceOutcome};
