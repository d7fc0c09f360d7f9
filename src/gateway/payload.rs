//! Request and response bodies.

use serde::{Deserialize, Serialize};

use crate::logging::{LogEntry, LogLevel};
use crate::message::Message;

/// Body of `POST /get_appraisal`.
#[derive(Debug, Clone, Deserialize)]
pub struct Query {
    pub message: Message,
    #[serde(default)]
    pub log_level: Option<LogLevel>,
}

/// Body of `POST /async_get_appraisal`.
#[derive(Debug, Clone, Deserialize)]
pub struct AsyncQuery {
    pub message: Message,
    pub callback: String,
    #[serde(default)]
    pub log_level: Option<LogLevel>,
}

/// Synchronous answer: the enriched message plus the request's log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppraisalResponse {
    pub message: Message,
    pub logs: Vec<LogEntry>,
}

/// Acknowledgement of an accepted async request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsyncQueryResponse {
    pub status: String,
    pub description: String,
    pub job_id: String,
}
