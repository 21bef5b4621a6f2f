//! Job lifecycle state machine.

use std::fmt;

use crate::models::{ExtractionJob, JobStatus, ParsingRun};

/// Observed state of a backend job.
///
/// Moves forward only: `Pending -> Running -> Completed | Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    Pending,
    Running { processed: u64, total: u64 },
    Completed,
    Failed(String),
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed(_))
    }

    fn rank(&self) -> u8 {
        match self {
            JobState::Pending => 0,
            JobState::Running { .. } => 1,
            JobState::Completed | JobState::Failed(_) => 2,
        }
    }

    /// Applies an observed state, ignoring regressions.
    ///
    /// Progress updates within `Running` are accepted; a terminal state
    /// never changes. Returns true when the state changed.
    pub fn advance(&mut self, observed: JobState) -> bool {
        if self.is_terminal() || observed.rank() < self.rank() || *self == observed {
            return false;
        }
        *self = observed;
        true
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Pending => write!(f, "pending"),
            JobState::Running { processed, total } if *total > 0 => {
                write!(f, "running ({processed}/{total})")
            }
            JobState::Running { .. } => write!(f, "running"),
            JobState::Completed => write!(f, "completed"),
            JobState::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// A status report that maps onto [`JobState`].
pub trait JobReport {
    fn job_state(&self) -> JobState;
}

impl JobReport for ExtractionJob {
    fn job_state(&self) -> JobState {
        match self.status {
            JobStatus::Pending => JobState::Pending,
            JobStatus::Running | JobStatus::Unknown => JobState::Running {
                processed: self.processed,
                total: self.total,
            },
            JobStatus::Completed => JobState::Completed,
            JobStatus::Failed => JobState::Failed(
                self.error
                    .clone()
                    .unwrap_or_else(|| format!("extraction job {} failed", self.job_id)),
            ),
        }
    }
}

impl JobReport for ParsingRun {
    fn job_state(&self) -> JobState {
        match self.status {
            JobStatus::Pending => JobState::Pending,
            JobStatus::Running | JobStatus::Unknown => JobState::Running {
                processed: self.results_count.unwrap_or(0),
                total: 0,
            },
            JobStatus::Completed => JobState::Completed,
            JobStatus::Failed => JobState::Failed(format!("parsing run {} failed", self.run_id)),
        }
    }
}
