use std::sync::Arc;

use crate::config::Config;
use crate::logging::RequestLogger;
use crate::message::{KnowledgeGraph, Message, OrderingComponents, QueryResult};

use super::approval::drug_approval_status;
use super::components::{clinical_evidence, novelty};
use super::confidence::{ClampedSum, ConfidenceStrategy};
use super::error::ScoringError;

/// Outcome of one [`Appraiser::annotate_results`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationSummary {
    /// Results that received fresh `ordering_components`.
    pub scored: usize,
    /// Results skipped because scoring failed.
    pub failed: usize,
}

impl AnnotationSummary {
    pub fn total(&self) -> usize {
        self.scored + self.failed
    }
}

/// Computes [`OrderingComponents`] for every result of a message.
///
/// Each result is scored from its own analyses and the read-only knowledge graph; results never
/// influence each other.
#[derive(Debug, Clone)]
pub struct Appraiser {
    strategy: Arc<dyn ConfidenceStrategy>,
    drug_approval: bool,
}

impl Default for Appraiser {
    fn default() -> Self {
        Self::new(Arc::new(ClampedSum::default()))
    }
}

impl Appraiser {
    /// Creates an appraiser with drug approval enabled.
    pub fn new(strategy: Arc<dyn ConfidenceStrategy>) -> Self {
        Self {
            strategy,
            drug_approval: true,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.confidence_strategy.build()).with_drug_approval(config.drug_approval)
    }

    pub fn with_drug_approval(mut self, enabled: bool) -> Self {
        self.drug_approval = enabled;
        self
    }

    pub fn strategy(&self) -> &dyn ConfidenceStrategy {
        self.strategy.as_ref()
    }

    pub fn drug_approval_enabled(&self) -> bool {
        self.drug_approval
    }

    pub fn confidence(&self, result: &QueryResult) -> Result<f64, ScoringError> {
        let value = self.strategy.confidence(result.analyses());
        if !value.is_finite() {
            return Err(ScoringError::NonFiniteConfidence { value });
        }
        Ok(value)
    }

    /// Scores one result without modifying it.
    ///
    /// Only a non-finite confidence fails the result. An unreadable drug-approval annotation
    /// is logged as a warning and leaves `drug_approval` absent.
    pub fn score_result(
        &self,
        result: &QueryResult,
        knowledge_graph: Option<&KnowledgeGraph>,
        logger: &RequestLogger,
    ) -> Result<OrderingComponents, ScoringError> {
        Ok(OrderingComponents {
            confidence: self.confidence(result)?,
            clinical_evidence: clinical_evidence(result, knowledge_graph),
            novelty: novelty(result, knowledge_graph),
            drug_approval: self.drug_approval(result, knowledge_graph, logger),
        })
    }

    fn drug_approval(
        &self,
        result: &QueryResult,
        knowledge_graph: Option<&KnowledgeGraph>,
        logger: &RequestLogger,
    ) -> Option<f64> {
        if !self.drug_approval {
            return None;
        }

        match drug_approval_status(result, knowledge_graph) {
            Ok(status) => status,
            Err(e) => {
                logger.warning(format!("Omitting drug_approval: {}", e));
                None
            }
        }
    }

    /// Replaces `ordering_components` on every result of `message`.
    ///
    /// A result that fails to score is logged and left as it was; the rest are still scored.
    /// Absent or empty `results` is a no-op.
    pub fn annotate_results(
        &self,
        message: &mut Message,
        logger: &RequestLogger,
    ) -> AnnotationSummary {
        let Message {
            knowledge_graph,
            results,
            ..
        } = message;

        logger.debug(format!(
            "Computing scores for {} results",
            results.as_ref().map_or(0, Vec::len)
        ));

        let mut summary = AnnotationSummary::default();
        let Some(results) = results.as_mut() else {
            return summary;
        };
        let knowledge_graph = knowledge_graph.as_ref();

        for (index, result) in results.iter_mut().enumerate() {
            match self.score_result(result, knowledge_graph, logger) {
                Ok(components) => {
                    result.ordering_components = Some(components);
                    summary.scored += 1;
                }
                Err(e) => {
                    logger.error(format!("Skipping result {}: {}", index, e));
                    summary.failed += 1;
                }
            }
        }

        if summary.failed > 0 {
            logger.warning(format!(
                "Scored {} of {} results",
                summary.scored,
                summary.total()
            ));
        }

        summary
    }
}
