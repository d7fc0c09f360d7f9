//! Outbound delivery of enriched messages to caller-supplied callback URLs.
//!
//! [`HttpCallbackClient`] posts with `reqwest`. A [`MockCallbackClient`] that records posts
//! instead of sending them is available in tests and behind the `mock` feature.

pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;


pub use error::CallbackError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockCallbackClient, RecordedPost};

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::message::Message;

/// POSTs a message as JSON to a URL.
#[async_trait]
pub trait CallbackClient: Send + Sync {
    /// Returns the response status, whatever it is. Only transport failures are errors.
    async fn post_message(&self, url: &str, message: &Message) -> Result<StatusCode, CallbackError>;
}

/// `reqwest`-backed client. Each call builds its own connection pool, used once and dropped.
#[derive(Debug, Clone)]
pub struct HttpCallbackClient {
    timeout: Duration,
}

impl HttpCallbackClient {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl CallbackClient for HttpCallbackClient {
    async fn post_message(&self, url: &str, message: &Message) -> Result<StatusCode, CallbackError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(CallbackError::ClientBuild)?;

        let response = client
            .post(url)
            .json(message)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CallbackError::Timeout {
                        url: url.to_string(),
                        timeout: self.timeout,
                    }
                } else {
                    CallbackError::Transport {
                        url: url.to_string(),
                        source: e,
                    }
                }
            })?;

        Ok(response.status())
    }
}
