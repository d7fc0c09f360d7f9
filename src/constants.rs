//! Cross-cutting, shared constants.
//!
//! Service defaults live here so the config layer, the gateway and the tests agree on them.

/// Gap kept below 1.0 for results backed by a single positive source.
pub const CONFIDENCE_EPSILON: f64 = 0.001;

/// Upper bound for multi-source confidence.
pub const CONFIDENCE_CEILING: f64 = 1.0;

/// Knowledge-graph attribute type that carries BioThings annotations.
pub const BIOTHINGS_ATTRIBUTE_TYPE: &str = "biothings_annotations";

/// Highest ChEMBL clinical phase (approved drug).
pub const MAX_CLINICAL_PHASE: f64 = 4.0;

pub const DEFAULT_PORT: u16 = 9096;

pub const DEFAULT_CALLBACK_TIMEOUT_SECS: u64 = 600;

pub const DEFAULT_JOB_QUEUE_CAPACITY: usize = 1024;

/// Knowledge graphs routinely run to tens of megabytes.
pub const DEFAULT_MAX_BODY_BYTES: usize = 512 * 1024 * 1024;

/// Grace period for in-flight callback jobs at shutdown.
pub const SHUTDOWN_DRAIN_SECS: u64 = 30;

/// Number of UUID characters kept for a job id.
pub const JOB_ID_LEN: usize = 8;

/// Response header carrying the request's job id.
pub const JOB_ID_HEADER: &str = "x-appraiser-job-id";

pub const STATUS_ACCEPTED: &str = "Accepted";
pub const STATUS_REJECTED: &str = "Rejected";
pub const NO_RESULTS_DESCRIPTION: &str = "No Results.";
