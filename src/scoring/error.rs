use thiserror::Error;

/// Failure while scoring a single result.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("confidence is not finite: {value}")]
    NonFiniteConfidence { value: f64 },

    #[error("invalid chembl max_phase on node {node_id}: {value}")]
    InvalidMaxPhase { node_id: String, value: String },
}
