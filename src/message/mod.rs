//! Query-answer message model.
//!
//! Only the members the appraiser reads or writes are typed. Everything else is kept in the
//! flattened `extra` maps so a message posted back to a caller carries every field it arrived
//! with, plus `ordering_components`.


use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Untyped JSON members preserved across a round trip.
pub type Extra = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_graph: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge_graph: Option<KnowledgeGraph>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<QueryResult>>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl Message {
    /// `true` when `results` is present and non-empty.
    pub fn has_results(&self) -> bool {
        self.results.as_ref().is_some_and(|r| !r.is_empty())
    }

    pub fn result_count(&self) -> usize {
        self.results.as_ref().map_or(0, Vec::len)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeGraph {
    #[serde(default)]
    pub nodes: HashMap<String, Node>,

    #[serde(default)]
    pub edges: Map<String, Value>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl KnowledgeGraph {
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<Attribute>>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl Node {
    /// Attributes whose `attribute_type_id` equals `type_id`.
    pub fn attributes_of_type<'a>(
        &'a self,
        type_id: &'a str,
    ) -> impl Iterator<Item = &'a Attribute> + 'a {
        self.attributes
            .iter()
            .flatten()
            .filter(move |attr| attr.attribute_type_id == type_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub attribute_type_id: String,

    #[serde(default)]
    pub value: Value,

    #[serde(flatten)]
    pub extra: Extra,
}

/// One candidate answer. Named to avoid shadowing [`std::result::Result`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Query-graph node id to bound knowledge-graph nodes, in id order.
    #[serde(default)]
    pub node_bindings: BTreeMap<String, Vec<NodeBinding>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyses: Option<Vec<Analysis>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordering_components: Option<OrderingComponents>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl QueryResult {
    pub fn analyses(&self) -> &[Analysis] {
        self.analyses.as_deref().unwrap_or_default()
    }

    /// Bound knowledge-graph node ids, by query-node id then binding order.
    pub fn bound_node_ids(&self) -> impl Iterator<Item = &str> {
        self.node_bindings
            .values()
            .flatten()
            .map(|binding| binding.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeBinding {
    pub id: String,

    #[serde(flatten)]
    pub extra: Extra,
}

impl NodeBinding {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            extra: Extra::new(),
        }
    }
}

/// One source's evidence for a result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,

    /// Absent and `null` both deserialize to `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_bindings: Option<Value>,

    #[serde(flatten)]
    pub extra: Extra,
}

impl Analysis {
    pub fn scored(resource_id: impl Into<String>, score: Option<f64>) -> Self {
        Self {
            resource_id: Some(resource_id.into()),
            score,
            ..Default::default()
        }
    }
}

/// Scores attached to a result for ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderingComponents {
    pub confidence: f64,
    pub clinical_evidence: f64,
    pub novelty: f64,

    /// One of `0`, `0.25`, `0.5`, `0.75`, `1`; omitted when no bound node is annotated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drug_approval: Option<f64>,
}
