use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;
use tokio::sync::Notify;

use super::{CallbackClient, CallbackError};
use crate::message::Message;

/// A post captured by [`MockCallbackClient`].
#[derive(Debug, Clone)]
pub struct RecordedPost {
    pub url: String,
    pub message: Message,
}

#[derive(Debug)]
enum MockOutcome {
    Status(StatusCode),
    TimedOut(Duration),
    Stalled,
}

/// In-memory [`CallbackClient`] that records every post.
#[derive(Debug, Clone)]
pub struct MockCallbackClient {
    posts: Arc<Mutex<Vec<RecordedPost>>>,
    outcome: Arc<MockOutcome>,
    notify: Arc<Notify>,
}

impl Default for MockCallbackClient {
    fn default() -> Self {
        Self::with_outcome(MockOutcome::Status(StatusCode::OK))
    }
}

impl MockCallbackClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records posts and answers each with `status`.
    pub fn responding_with(status: StatusCode) -> Self {
        Self::with_outcome(MockOutcome::Status(status))
    }

    /// Records posts and fails each as a timeout after `timeout`.
    pub fn timing_out(timeout: Duration) -> Self {
        Self::with_outcome(MockOutcome::TimedOut(timeout))
    }

    /// Records posts and never answers them.
    pub fn stalled() -> Self {
        Self::with_outcome(MockOutcome::Stalled)
    }

    fn with_outcome(outcome: MockOutcome) -> Self {
        Self {
            posts: Arc::new(Mutex::new(Vec::new())),
            outcome: Arc::new(outcome),
            notify: Arc::new(Notify::new()),
        }
    }

    pub fn posts(&self) -> Vec<RecordedPost> {
        self.posts.lock().clone()
    }

    pub fn post_count(&self) -> usize {
        self.posts.lock().len()
    }

    /// Waits until at least `count` posts have been recorded.
    pub async fn wait_for_posts(&self, count: usize) -> Vec<RecordedPost> {
        loop {
            let notified = self.notify.notified();
            if self.post_count() >= count {
                return self.posts();
            }
            notified.await;
        }
    }
}

#[async_trait]
impl CallbackClient for MockCallbackClient {
    async fn post_message(&self, url: &str, message: &Message) -> Result<StatusCode, CallbackError> {
        self.posts.lock().push(RecordedPost {
            url: url.to_string(),
            message: message.clone(),
        });
        self.notify.notify_waiters();

        match self.outcome.as_ref() {
            MockOutcome::Status(status) => Ok(*status),
            MockOutcome::TimedOut(timeout) => Err(CallbackError::Timeout {
                url: url.to_string(),
                timeout: *timeout,
            }),
            MockOutcome::Stalled => std::future::pending().await,
        }
    }
}
