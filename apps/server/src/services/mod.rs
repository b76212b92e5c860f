//! Business logic services.

pub mod evaluator;
pub mod inspection;
pub mod production;
pub mod qc_analytics;

pub use evaluator::{evaluate, Evaluation, EvaluationError};
