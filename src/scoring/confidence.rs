//! Confidence aggregation rules.
//!
//! The rule is pluggable so alternate formulas can be swapped in through configuration
//! without changing [`Appraiser`](super::Appraiser).

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::constants::{CONFIDENCE_CEILING, CONFIDENCE_EPSILON};
use crate::message::Analysis;

/// Folds the per-source analysis scores of one result into a confidence value.
pub trait ConfidenceStrategy: Send + Sync + fmt::Debug {
    /// Short identifier used in logs and configuration.
    fn name(&self) -> &'static str;

    /// Analyses with no score must be ignored entirely.
    fn confidence(&self, analyses: &[Analysis]) -> f64;
}

/// Sum of scores, clamped by how many sources contributed a positive score.
///
/// A single positive source is capped at `1 - epsilon`; two or more are capped at `1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampedSum {
    pub epsilon: f64,
}

impl Default for ClampedSum {
    fn default() -> Self {
        Self {
            epsilon: CONFIDENCE_EPSILON,
        }
    }
}

impl ConfidenceStrategy for ClampedSum {
    fn name(&self) -> &'static str {
        "clamped_sum"
    }

    fn confidence(&self, analyses: &[Analysis]) -> f64 {
        let mut sum = 0.0;
        let mut positive = 0usize;

        for score in analyses.iter().filter_map(|a| a.score) {
            sum += score;
            if score > 0.0 {
                positive += 1;
            }
        }

        let single_source_cap = CONFIDENCE_CEILING - self.epsilon;
        if positive == 1 && sum > single_source_cap {
            single_source_cap
        } else if positive > 1 && sum > CONFIDENCE_CEILING {
            CONFIDENCE_CEILING
        } else {
            sum
        }
    }
}

/// Plain mean of the present scores; `0` when none are present.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ArithmeticMean;

impl ConfidenceStrategy for ArithmeticMean {
    fn name(&self) -> &'static str {
        "mean"
    }

    fn confidence(&self, analyses: &[Analysis]) -> f64 {
        let (sum, count) = analyses
            .iter()
            .filter_map(|a| a.score)
            .fold((0.0, 0usize), |(sum, count), score| (sum + score, count + 1));

        if count == 0 { 0.0 } else { sum / count as f64 }
    }
}

/// Configuration-level selector for a [`ConfidenceStrategy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrategyKind {
    #[default]
    ClampedSum,
    ArithmeticMean,
}

impl StrategyKind {
    pub fn build(self) -> Arc<dyn ConfidenceStrategy> {
        match self {
            StrategyKind::ClampedSum => Arc::new(ClampedSum::default()),
            StrategyKind::ArithmeticMean => Arc::new(ArithmeticMean),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clamped_sum" | "sum" => Ok(Self::ClampedSum),
            "mean" | "arithmetic_mean" => Ok(Self::ArithmeticMean),
            _ => Err(format!("Unknown confidence strategy: {}", s)),
        }
    }
}
