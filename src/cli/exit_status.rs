use std::process::ExitCode;

use crate::plugins::RunReport;

/// Exit status for CLI commands.
///
/// - `Success` (0): every plugin that ran succeeded
/// - `Failure` (1): the command ran but at least one plugin failed
/// - `Error` (2): the command could not run (bad config, unknown plugin, I/O error)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl ExitStatus {
    pub fn from_report(report: &RunReport) -> Self {
        if report.is_success() {
            ExitStatus::Success
        } else {
            ExitStatus::Failure
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
