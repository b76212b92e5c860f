//! QC inspection (QC sheet) models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::defect::{DefectInput, DefectLogResponse};
use super::Pagination;
use crate::entity::qc_sheet;
use crate::services::evaluator::Evaluation;

/// Prefix of generated inspection codes.
pub const INSPECTION_CODE_PREFIX: &str = "QC";

/// Inspection outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InspectionResult {
    Pass,
    Fail,
}

impl InspectionResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pass" => Some(Self::Pass),
            "fail" => Some(Self::Fail),
            _ => None,
        }
    }
}

impl std::fmt::Display for InspectionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Code prefix for inspections recorded on `date`, e.g. `QC-20260301`.
pub fn inspection_code_prefix(date: NaiveDate) -> String {
    format!("{}-{}", INSPECTION_CODE_PREFIX, date.format("%Y%m%d"))
}

/// Inspection code for the `seq`-th inspection of `date`, e.g. `QC-20260301-0007`.
pub fn format_inspection_code(date: NaiveDate, seq: u32) -> String {
    format!("{}-{:04}", inspection_code_prefix(date), seq)
}

/// Body of `POST /tasks/{id}/inspections`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubmitInspectionRequest {
    pub qty_checked: i64,
    pub qty_ng: i64,
    /// Identifier of the inspecting employee.
    pub inspector_id: Option<String>,
    pub notes: Option<String>,
    /// Required when `qty_ng > 0`.
    #[serde(default)]
    pub defects: Vec<DefectInput>,
}

/// Persisted QC sheet.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QcSheetResponse {
    pub id: Uuid,
    pub inspection_code: String,
    pub production_task_id: Uuid,
    pub order_id: Uuid,
    pub qty_checked: i64,
    pub qty_ng: i64,
    pub pass_rate: f64,
    pub defect_rate: f64,
    pub result: String,
    pub inspector_id: Option<String>,
    pub notes: Option<String>,
    pub inspected_at: DateTime<Utc>,
}

impl QcSheetResponse {
    pub fn from_entity(m: qc_sheet::Model) -> Self {
        QcSheetResponse {
            id: m.id,
            inspection_code: m.inspection_code,
            production_task_id: m.production_task_id,
            order_id: m.order_id,
            qty_checked: m.qty_checked,
            qty_ng: m.qty_ng,
            pass_rate: m.pass_rate,
            defect_rate: m.defect_rate,
            result: m.result,
            inspector_id: m.inspector_id,
            notes: m.notes,
            inspected_at: m.inspected_at,
        }
    }
}

/// Response to an inspection submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct InspectionResponse {
    pub sheet: QcSheetResponse,
    pub defects: Vec<DefectLogResponse>,
    pub evaluation: Evaluation,
    /// Task status after the inspection.
    pub task_status: String,
    /// Non-blocking findings (e.g. more units checked than targeted).
    pub warnings: Vec<String>,
}

/// QC sheet with its defect logs.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InspectionDetailResponse {
    pub sheet: QcSheetResponse,
    pub defects: Vec<DefectLogResponse>,
    /// At least one defect is critical.
    pub has_critical_defect: bool,
}

/// Paginated inspection list.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InspectionListResponse {
    pub inspections: Vec<QcSheetResponse>,
    pub pagination: Pagination,
}

/// Query parameters for listing inspections.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ListInspectionsQuery {
    pub task_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    pub result: Option<InspectionResult>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}
