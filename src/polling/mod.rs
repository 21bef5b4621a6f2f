//! Observation of long-running backend jobs.
//!
//! Parsing runs and batch extraction jobs are polled at a fixed interval
//! and folded into a forward-only [`JobState`].

mod poller;
mod state;

pub use poller::{JobPoller, PollHandle, PollUpdate};
pub use state::{JobReport, JobState};
