//! Drug-approval component from ChEMBL clinical phase.

use serde_json::{Map, Value};

use crate::constants::{BIOTHINGS_ATTRIBUTE_TYPE, MAX_CLINICAL_PHASE};
use crate::message::{KnowledgeGraph, QueryResult};

use super::error::ScoringError;

/// Returns `max_phase / 4` for the first bound node carrying BioThings annotations.
///
/// Bound nodes are visited in query-node id order, then binding order, so the answer is
/// stable when several nodes are annotated. `None` when no bound node is annotated.
pub fn drug_approval_status(
    result: &QueryResult,
    knowledge_graph: Option<&KnowledgeGraph>,
) -> Result<Option<f64>, ScoringError> {
    let Some(kg) = knowledge_graph else {
        return Ok(None);
    };

    for node_id in result.bound_node_ids() {
        let Some(node) = kg.node(node_id) else {
            continue;
        };

        if let Some(attribute) = node.attributes_of_type(BIOTHINGS_ATTRIBUTE_TYPE).next() {
            let phase = max_phase(node_id, &attribute.value)?;
            return Ok(Some(phase / MAX_CLINICAL_PHASE));
        }
    }

    Ok(None)
}

/// Reads `chembl.max_phase` as a whole phase in `0..=4`.
///
/// Missing reads as 0, as does ChEMBL's negative "unknown" marker. Fractional phases
/// (0.5 is "early phase 1") round down.
fn max_phase(node_id: &str, value: &Value) -> Result<f64, ScoringError> {
    let raw = chembl_annotation(value).and_then(|chembl| chembl.get("max_phase"));

    let invalid = |v: &Value| ScoringError::InvalidMaxPhase {
        node_id: node_id.to_string(),
        value: v.to_string(),
    };

    let phase = match raw {
        None | Some(Value::Null) => return Ok(0.0),
        Some(v @ Value::Number(n)) => n.as_f64().ok_or_else(|| invalid(v))?,
        Some(v @ Value::String(s)) => s.trim().parse::<f64>().map_err(|_| invalid(v))?,
        Some(v) => return Err(invalid(v)),
    };

    if !phase.is_finite() || phase > MAX_CLINICAL_PHASE {
        return Err(ScoringError::InvalidMaxPhase {
            node_id: node_id.to_string(),
            value: phase.to_string(),
        });
    }

    Ok(phase.max(0.0).floor())
}

/// `value.chembl`, or the first `chembl` object when `value` is a list of hits.
fn chembl_annotation(value: &Value) -> Option<&Map<String, Value>> {
    match value {
        Value::Object(map) => map.get("chembl").and_then(Value::as_object),
        Value::Array(items) => items
            .iter()
            .find_map(|item| item.get("chembl").and_then(Value::as_object)),
        _ => None,
    }
}
