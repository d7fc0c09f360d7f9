use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("job queue is full ({capacity} pending)")]
    QueueFull { capacity: usize },

    #[error("job worker has stopped")]
    WorkerStopped,

    #[error("job worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("appraisal task did not complete: {0}")]
    AppraisalAborted(String),

    #[error("jobs still running after {grace:?}")]
    DrainTimeout { grace: Duration },
}
