//! Background appraisal jobs.
//!
//! The async endpoint hands an [`AppraisalJob`] to the [`JobDispatcher`], which forwards it
//! over a bounded channel to a single worker. The worker runs every job as its own task:
//! score, then post the message to the job's callback exactly once. Delivery failures are
//! logged and the job is dropped; nothing is retried or reported back to the submitter.
//!
//! At most `capacity` jobs run at once and at most `capacity` more wait in the channel.
//! Beyond that, [`JobDispatcher::submit`] fails with [`JobError::QueueFull`].

pub mod error;


pub use error::JobError;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::callback::CallbackClient;
use crate::constants::JOB_ID_LEN;
use crate::logging::RequestLogger;
use crate::message::Message;
use crate::scoring::Appraiser;

/// Short random id shared by a request, its logs and its job.
pub fn new_job_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(JOB_ID_LEN);
    id
}

/// Work item for one async appraisal.
#[derive(Debug)]
pub struct AppraisalJob {
    pub message: Message,
    pub callback: String,
    pub logger: RequestLogger,
}

impl AppraisalJob {
    pub fn job_id(&self) -> &str {
        self.logger.job_id()
    }
}

/// How a job ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// Callback answered with a success status.
    Delivered(StatusCode),
    /// Callback answered with a non-success status.
    Refused(StatusCode),
    /// The post never got a response.
    Undeliverable,
}

/// Submission side of the job queue. Cheap to clone.
#[derive(Debug, Clone)]
pub struct JobDispatcher {
    tx: mpsc::Sender<AppraisalJob>,
    capacity: usize,
}

/// Owns the worker task. Dropping every [`JobDispatcher`] lets it wind down.
#[derive(Debug)]
pub struct JobWorker {
    handle: JoinHandle<()>,
}

impl JobDispatcher {
    /// Starts the worker and returns the dispatcher feeding it.
    pub fn spawn(
        appraiser: Arc<Appraiser>,
        callback_client: Arc<dyn CallbackClient>,
        capacity: usize,
    ) -> (Self, JobWorker) {
        let capacity = capacity.max(1);
        let (tx, rx) = mpsc::channel(capacity);
        let handle = tokio::spawn(worker_loop(rx, appraiser, callback_client, capacity));
        (Self { tx, capacity }, JobWorker { handle })
    }

    /// Queues a job without waiting. Fails when the queue is full or the worker has stopped.
    pub fn submit(&self, job: AppraisalJob) -> Result<(), JobError> {
        self.tx.try_send(job).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => JobError::QueueFull {
                capacity: self.capacity,
            },
            mpsc::error::TrySendError::Closed(_) => JobError::WorkerStopped,
        })
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl JobWorker {
    /// Waits for queued and in-flight jobs to finish, up to `grace`.
    ///
    /// Only returns early once every dispatcher has been dropped and the queue is empty.
    pub async fn drain(self, grace: Duration) -> Result<(), JobError> {
        let mut handle = self.handle;
        match tokio::time::timeout(grace, &mut handle).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(JobError::WorkerPanicked(e.to_string())),
            Err(_) => {
                handle.abort();
                let _ = handle.await;
                Err(JobError::DrainTimeout { grace })
            }
        }
    }
}

async fn worker_loop(
    mut rx: mpsc::Receiver<AppraisalJob>,
    appraiser: Arc<Appraiser>,
    callback_client: Arc<dyn CallbackClient>,
    max_in_flight: usize,
) {
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            // Saturated: leave jobs in the channel.
            job = rx.recv(), if in_flight.len() < max_in_flight => match job {
                Some(job) => {
                    debug!(job_id = job.job_id(), "Starting appraisal job");
                    in_flight.spawn(run_job(appraiser.clone(), callback_client.clone(), job));
                }
                None => break,
            },
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(e) = joined {
                    warn!(error = %e, "Appraisal job task failed");
                }
            }
        }
    }

    info!(pending = in_flight.len(), "Job queue closed, finishing in-flight jobs");
    while let Some(joined) = in_flight.join_next().await {
        if let Err(e) = joined {
            warn!(error = %e, "Appraisal job task failed");
        }
    }
}

/// Scores `message` on the blocking pool.
///
/// A panic inside scoring is logged and the message comes back as far as it got, so the
/// caller can still answer or deliver it. Fails only if the blocking task never returns.
pub async fn run_appraisal(
    appraiser: Arc<Appraiser>,
    message: Message,
    logger: RequestLogger,
) -> Result<Message, JobError> {
    tokio::task::spawn_blocking(move || {
        let mut message = message;
        let scored = panic::catch_unwind(AssertUnwindSafe(|| {
            appraiser.annotate_results(&mut message, &logger);
        }));
        if let Err(payload) = scored {
            logger.error(format!(
                "Something went wrong while appraising: {}",
                panic_message(&*payload)
            ));
        }
        message
    })
    .await
    .map_err(|e| JobError::AppraisalAborted(e.to_string()))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

/// Scores the job's message and posts it to the callback. Never retries.
pub async fn run_job(
    appraiser: Arc<Appraiser>,
    callback_client: Arc<dyn CallbackClient>,
    job: AppraisalJob,
) -> JobOutcome {
    let AppraisalJob {
        message,
        callback,
        logger,
    } = job;

    let message = match run_appraisal(appraiser, message, logger.clone()).await {
        Ok(message) => message,
        Err(e) => {
            logger.error(format!("Abandoning job for {}: {}", callback, e));
            return JobOutcome::Undeliverable;
        }
    };

    logger.info(format!("Posting to callback {}", callback));
    match callback_client.post_message(&callback, &message).await {
        Ok(status) if status.is_success() => {
            logger.info(format!("Posted to {} with code {}", callback, status.as_u16()));
            JobOutcome::Delivered(status)
        }
        Ok(status) => {
            logger.error(format!(
                "Callback {} responded with code {}",
                callback,
                status.as_u16()
            ));
            JobOutcome::Refused(status)
        }
        Err(e) => {
            logger.error(format!("Unable to post to callback {}: {}", callback, e));
            JobOutcome::Undeliverable
        }
    }
}
