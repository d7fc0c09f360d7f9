//! Components that have no model behind them yet.

use crate::message::{KnowledgeGraph, QueryResult};

/// Clinical-trial evidence strength. Always `0` until a clinical evidence source is wired in.
pub fn clinical_evidence(_result: &QueryResult, _knowledge_graph: Option<&KnowledgeGraph>) -> f64 {
    0.0
}

/// Novelty against a literature co-occurrence index. Always `0` until such an index exists.
pub fn novelty(_result: &QueryResult, _knowledge_graph: Option<&KnowledgeGraph>) -> f64 {
    0.0
}
