//! Ordering-component scoring.
//!
//! [`Appraiser::annotate_results`] attaches an [`OrderingComponents`](crate::message::OrderingComponents)
//! bundle to every result of a message:
//!
//! - **confidence**: aggregated analysis scores, via a pluggable [`ConfidenceStrategy`]
//!   ([`ClampedSum`] by default)
//! - **clinical_evidence**, **novelty**: fixed at `0` for now
//! - **drug_approval**: ChEMBL `max_phase / 4` of the first annotated bound node
//!
//! Scoring is synchronous and pure. The only side effect is logging through the
//! request's [`RequestLogger`](crate::logging::RequestLogger).

pub mod appraiser;
pub mod approval;
pub mod components;
pub mod confidence;
pub mod error;


pub use appraiser::{AnnotationSummary, Appraiser};
pub use approval::drug_approval_status;
pub use components::{clinical_evidence, novelty};
pub use confidence::{ArithmeticMean, ClampedSum, ConfidenceStrategy, StrategyKind};
pub use error::ScoringError;
