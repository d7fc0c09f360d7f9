use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::constants::{JOB_ID_HEADER, NO_RESULTS_DESCRIPTION, STATUS_REJECTED};
use crate::jobs::JobError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("{}", NO_RESULTS_DESCRIPTION)]
    NoResults { job_id: String },

    #[error("appraisal failed: {source}")]
    AppraisalFailed {
        job_id: String,
        #[source]
        source: JobError,
    },

    #[error("job not accepted: {source}")]
    JobRejected {
        job_id: String,
        #[source]
        source: JobError,
    },
}

impl GatewayError {
    pub fn job_id(&self) -> Option<&str> {
        match self {
            GatewayError::InvalidRequest(_) => None,
            GatewayError::NoResults { job_id }
            | GatewayError::AppraisalFailed { job_id, .. }
            | GatewayError::JobRejected { job_id, .. } => Some(job_id),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GatewayError::NoResults { .. } => StatusCode::BAD_REQUEST,
            GatewayError::AppraisalFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::JobRejected { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Body of every rejected request.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: &'static str,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let job_id = self.job_id().map(str::to_string);

        let description = self.to_string();

        let mut headers = HeaderMap::new();
        if let Some(value) = job_id.as_deref().and_then(|id| HeaderValue::from_str(id).ok()) {
            headers.insert(JOB_ID_HEADER, value);
        }

        let body = Json(ErrorResponse {
            status: STATUS_REJECTED,
            description,
            job_id,
        });

        (status, headers, body).into_response()
    }
}
