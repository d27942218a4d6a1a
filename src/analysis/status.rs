use crate::core::{Error, ParseStatus};

/// Lifecycle of one analysis run: `NotStarted -> Running -> Finished`.
/// A finished run is never restarted; a new analysis uses a new run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisRun {
    #[default]
    NotStarted,
    Running,
    Finished(ParseStatus),
}

impl AnalysisRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) -> Result<(), Error> {
        match self {
            AnalysisRun::NotStarted => {
                *self = AnalysisRun::Running;
                Ok(())
            }
            other => Err(Error::InvalidState(format!(
                "cannot start a run that is {}",
                other.describe()
            ))),
        }
    }

    /// Close the run with the status implied by its outcome.
    pub fn finish(
        &mut self,
        aborted: bool,
        has_groups: bool,
        has_errors: bool,
    ) -> Result<ParseStatus, Error> {
        if *self != AnalysisRun::Running {
            return Err(Error::InvalidState(format!(
                "cannot finish a run that is {}",
                self.describe()
            )));
        }
        let status = resolve_status(aborted, has_groups, has_errors);
        *self = AnalysisRun::Finished(status);
        Ok(status)
    }

    pub fn status(&self) -> Option<ParseStatus> {
        match self {
            AnalysisRun::Finished(status) => Some(*status),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        match self {
            AnalysisRun::NotStarted => "not started".to_string(),
            AnalysisRun::Running => "running".to_string(),
            AnalysisRun::Finished(status) => format!("finished ({status})"),
        }
    }
}

/// `Failed` when aborted or nothing was grouped, `Partial` when services
/// were found alongside errors, `Success` otherwise.
pub fn resolve_status(aborted: bool, has_groups: bool, has_errors: bool) -> ParseStatus {
    match (aborted, has_groups, has_errors) {
        (true, _, _) | (false, false, _) => ParseStatus::Failed,
        (false, true, true) => ParseStatus::Partial,
        (false, true, false) => ParseStatus::Success,
    }
}
