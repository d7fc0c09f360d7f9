use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::constants::{JOB_ID_HEADER, STATUS_ACCEPTED};
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{AppraisalResponse, AsyncQuery, AsyncQueryResponse, Query};
use crate::gateway::state::HandlerState;
use crate::jobs::{AppraisalJob, new_job_id, run_appraisal};
use crate::logging::{LogLevel, RequestLogger};

/// `POST /get_appraisal`: scores in-line and returns the enriched message.
#[instrument(skip(state, request), fields(job_id = tracing::field::Empty))]
pub async fn sync_appraisal_handler(
    State(state): State<HandlerState>,
    Json(request): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let query: Query = parse_request(request)?;

    let job_id = new_job_id();
    tracing::Span::current().record("job_id", tracing::field::display(&job_id));
    let logger = request_logger(&job_id, query.log_level, state.default_log_level);

    if !query.message.has_results() {
        logger.warning("No results given.");
        return Err(GatewayError::NoResults { job_id });
    }

    debug!(results = query.message.result_count(), "Appraising synchronously");
    let message = run_appraisal(state.appraiser.clone(), query.message, logger.clone())
        .await
        .map_err(|source| GatewayError::AppraisalFailed {
            job_id: job_id.clone(),
            source,
        })?;

    let body = AppraisalResponse {
        message,
        logs: logger.entries(),
    };
    Ok((StatusCode::OK, job_id_headers(&job_id), Json(body)).into_response())
}

/// `POST /async_get_appraisal`: queues the job and acknowledges immediately.
#[instrument(skip(state, request), fields(job_id = tracing::field::Empty))]
pub async fn async_appraisal_handler(
    State(state): State<HandlerState>,
    Json(request): Json<serde_json::Value>,
) -> Result<Response, GatewayError> {
    let query: AsyncQuery = parse_request(request)?;

    let job_id = new_job_id();
    tracing::Span::current().record("job_id", tracing::field::display(&job_id));
    let logger = request_logger(&job_id, query.log_level, state.default_log_level);

    if !query.message.has_results() {
        logger.warning("No results given.");
        return Err(GatewayError::NoResults { job_id });
    }

    validate_callback(&query.callback)?;

    let description = format!(
        "Appraising answers. Will send response to {}",
        query.callback
    );

    state
        .dispatcher
        .submit(AppraisalJob {
            message: query.message,
            callback: query.callback,
            logger,
        })
        .map_err(|source| GatewayError::JobRejected {
            job_id: job_id.clone(),
            source,
        })?;

    debug!("Appraisal job queued");

    let body = AsyncQueryResponse {
        status: STATUS_ACCEPTED.to_string(),
        description,
        job_id: job_id.clone(),
    };
    Ok((StatusCode::OK, job_id_headers(&job_id), Json(body)).into_response())
}

pub(crate) fn parse_request<T: DeserializeOwned>(
    request: serde_json::Value,
) -> Result<T, GatewayError> {
    serde_json::from_value(request)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))
}

/// Callbacks must be absolute `http` or `https` URLs.
pub(crate) fn validate_callback(callback: &str) -> Result<(), GatewayError> {
    let url = Url::parse(callback).map_err(|e| {
        GatewayError::InvalidRequest(format!("Invalid callback URL '{}': {}", callback, e))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(GatewayError::InvalidRequest(format!(
            "Unsupported callback scheme '{}'; expected http or https",
            scheme
        ))),
    }
}

fn request_logger(job_id: &str, requested: Option<LogLevel>, default: LogLevel) -> RequestLogger {
    RequestLogger::new(job_id, requested.unwrap_or(default))
}

fn job_id_headers(job_id: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(job_id) {
        headers.insert(JOB_ID_HEADER, value);
    }
    headers
}
