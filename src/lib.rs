//! Answer appraiser library crate (used by the server and integration tests).
//!
//! Attaches `ordering_components` to every result of a query-answer message so
//! downstream aggregators can rank answers.
//!
//! # Public API Surface
//!
//! ## Scoring
//! - [`Appraiser`], [`AnnotationSummary`] - Annotates every result of a [`Message`]
//! - [`ConfidenceStrategy`], [`ClampedSum`], [`ArithmeticMean`], [`StrategyKind`] - Confidence folds
//! - [`drug_approval_status`] - Clinical-phase lookup in node annotations
//!
//! ## Message Model
//! - [`Message`], [`KnowledgeGraph`], [`QueryResult`], [`Analysis`], [`OrderingComponents`]
//!
//! ## Service
//! - [`Config`], [`ConfigError`] - Environment configuration
//! - [`HandlerState`], [`create_router_with_state`] - HTTP gateway
//! - [`JobDispatcher`], [`JobWorker`] - Background appraisal with callback delivery
//! - [`CallbackClient`], [`HttpCallbackClient`] - Callback transport
//! - [`RequestLogger`], [`LogLevel`], [`LogEntry`] - Per-request logging
//!
//! ## Test/Mock Support
//! [`MockCallbackClient`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod callback;
pub mod config;
pub mod constants;
pub mod gateway;
pub mod jobs;
pub mod logging;
pub mod message;
pub mod scoring;

pub use callback::{CallbackClient, CallbackError, HttpCallbackClient};
#[cfg(any(test, feature = "mock"))]
pub use callback::{MockCallbackClient, RecordedPost};
pub use config::{Config, ConfigError};
pub use gateway::{GatewayError, HandlerState, create_router_with_state};
pub use jobs::{AppraisalJob, JobDispatcher, JobError, JobOutcome, JobWorker, new_job_id};
pub use logging::{LogEntry, LogLevel, RequestLogger};
pub use message::{
    Analysis, Attribute, KnowledgeGraph, Message, Node, NodeBinding, OrderingComponents,
    QueryResult,
};
pub use scoring::{
    AnnotationSummary, Appraiser, ArithmeticMean, ClampedSum, ConfidenceStrategy, ScoringError,
    StrategyKind, drug_approval_status,
};
