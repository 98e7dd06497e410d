//! Artifact generation: orchestration of the generative providers.
//!
//! `MultiViewEditor` runs the staged edit pipeline (vision analysis,
//! prompt enhancement, parallel per-slot synthesis) and commits results
//! through the revision store. `CostEstimator` produces deterministic,
//! cached manufacturing cost estimates.

pub mod complexity;
pub mod error;
pub mod estimator;
pub mod fingerprint;
pub mod multiview;
pub mod prompt;

pub use complexity::ComplexityLevel;
pub use error::GeneratorError;
pub use estimator::{CostEstimate, CostEstimator, EstimateOutcome, EstimateRequest};
pub use multiview::{
    EditorOptions, MultiViewEditOutcome, MultiViewEditRequest, MultiViewEditor, SlotOutcome,
};
