//! QC inspection scoring.
//!
//! Pure function of the counted and rejected quantities. Persistence and
//! task status handling live in [`super::inspection`].

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{InspectionResult, MAX_QUANTITY};

/// Maximum tolerated defect rate, in parts per thousand (2.5%).
///
/// An inspection passes only when its defect rate is strictly below this
/// value; exactly 2.5% fails.
pub const DEFECT_RATE_TOLERANCE_PER_MILLE: i64 = 25;

/// Rejected inspection input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationError {
    #[error("qty_checked must not be negative (got {0})")]
    NegativeChecked(i64),

    #[error("qty_ng must not be negative (got {0})")]
    NegativeNg(i64),

    #[error("qty_checked must be greater than zero")]
    NothingChecked,

    #[error("{field} must not exceed {max} (got {value})", max = MAX_QUANTITY)]
    TooLarge { field: &'static str, value: i64 },

    #[error("qty_ng ({ng}) cannot exceed qty_checked ({checked})")]
    NgExceedsChecked { checked: i64, ng: i64 },
}

/// Outcome of scoring one inspection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct Evaluation {
    pub qty_checked: i64,
    pub qty_ng: i64,
    /// Fraction of checked units that were acceptable, in `[0, 1]`.
    pub pass_rate: f64,
    /// Fraction of checked units that were rejected, in `[0, 1]`.
    pub defect_rate: f64,
    pub result: InspectionResult,
    /// Rejected units must be described by at least one defect log.
    pub defect_log_required: bool,
}

impl Evaluation {
    /// Pass rate as a percentage rounded to two decimals.
    pub fn pass_rate_percent(&self) -> f64 {
        round_percent(self.pass_rate)
    }

    /// Defect rate as a percentage rounded to two decimals.
    pub fn defect_rate_percent(&self) -> f64 {
        round_percent(self.defect_rate)
    }

    pub fn is_pass(&self) -> bool {
        self.result == InspectionResult::Pass
    }
}

/// Score an inspection of `qty_checked` units of which `qty_ng` were rejected.
pub fn evaluate(qty_checked: i64, qty_ng: i64) -> Result<Evaluation, EvaluationError> {
    if qty_checked < 0 {
        return Err(EvaluationError::NegativeChecked(qty_checked));
    }
    if qty_ng < 0 {
        return Err(EvaluationError::NegativeNg(qty_ng));
    }
    if qty_checked == 0 {
        return Err(EvaluationError::NothingChecked);
    }
    if qty_checked > MAX_QUANTITY {
        return Err(EvaluationError::TooLarge {
            field: "qty_checked",
            value: qty_checked,
        });
    }
    if qty_ng > qty_checked {
        return Err(EvaluationError::NgExceedsChecked {
            checked: qty_checked,
            ng: qty_ng,
        });
    }

    let result = if within_tolerance(qty_checked, qty_ng) {
        InspectionResult::Pass
    } else {
        InspectionResult::Fail
    };

    let checked = qty_checked as f64;

    Ok(Evaluation {
        qty_checked,
        qty_ng,
        pass_rate: (qty_checked - qty_ng) as f64 / checked,
        defect_rate: qty_ng as f64 / checked,
        result,
        defect_log_required: qty_ng > 0,
    })
}

/// `qty_ng / qty_checked < 25 / 1000`, compared without division.
fn within_tolerance(qty_checked: i64, qty_ng: i64) -> bool {
    (qty_ng as i128) * 1000 < (qty_checked as i128) * DEFECT_RATE_TOLERANCE_PER_MILLE as i128
}

/// Convert a fraction to a percentage with two decimals.
pub fn round_percent(fraction: f64) -> f64 {
    (fraction * 10_000.0).round() / 100.0
}
