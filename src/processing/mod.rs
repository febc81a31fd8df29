mod progress_provider;
mod background_worker;
mod recompute_job;

pub use progress_provider::{HaltMessage, Halted, ProgressProvider};
pub use background_worker::RecomputeWorker;
pub use recompute_job::{RecomputeDone, RecomputeJob};

/// Messages sent from the recompute thread to whoever owns the subwindows.
#[derive(Debug)]
pub enum WorkerMsg {
    Progress { subwindow_id: usize, percents: usize },
    Completed(RecomputeDone),
}
