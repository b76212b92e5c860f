//! Defect log models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Pagination, MAX_QUANTITY};
use crate::entity::defect_log;

/// Defect severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DefectSeverity {
    Minor,
    Major,
    Critical,
}

impl DefectSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Critical => "critical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "minor" => Some(Self::Minor),
            "major" => Some(Self::Major),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for DefectSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_qty_defect() -> i64 {
    1
}

/// One defect category found during an inspection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DefectInput {
    /// e.g. "skipped stitch", "stain".
    pub defect_type: String,
    /// e.g. "stitching", "fabric", "accessories".
    pub defect_category: Option<String>,
    pub severity: DefectSeverity,
    /// Units showing this defect (default: 1).
    #[serde(default = "default_qty_defect")]
    pub qty_defect: i64,
    pub description: Option<String>,
    /// Station where the defect was found.
    pub station: Option<String>,
}

impl DefectInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.defect_type.trim().is_empty() {
            return Err("defect_type is required".to_string());
        }
        if !(1..=MAX_QUANTITY).contains(&self.qty_defect) {
            return Err(format!(
                "qty_defect for '{}' must be between 1 and {}",
                self.defect_type, MAX_QUANTITY
            ));
        }
        Ok(())
    }
}

/// Defect log as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DefectLogResponse {
    pub id: Uuid,
    pub qc_sheet_id: Uuid,
    pub defect_type: String,
    pub defect_category: Option<String>,
    pub severity: String,
    pub qty_defect: i64,
    pub description: Option<String>,
    pub station: Option<String>,
    pub action_taken: Option<String>,
    pub is_resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl DefectLogResponse {
    pub fn from_entity(m: defect_log::Model) -> Self {
        DefectLogResponse {
            id: m.id,
            qc_sheet_id: m.qc_sheet_id,
            defect_type: m.defect_type,
            defect_category: m.defect_category,
            severity: m.severity,
            qty_defect: m.qty_defect,
            description: m.description,
            station: m.station,
            action_taken: m.action_taken,
            is_resolved: m.is_resolved,
            resolved_at: m.resolved_at,
            created_at: m.created_at,
        }
    }
}

/// Paginated defect list.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DefectListResponse {
    pub defects: Vec<DefectLogResponse>,
    pub pagination: Pagination,
}

/// Query parameters for listing defects.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ListDefectsQuery {
    pub severity: Option<DefectSeverity>,
    pub resolved: Option<bool>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Body of `POST /defects/{id}/resolve`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ResolveDefectRequest {
    /// Corrective action taken.
    pub action_taken: String,
}
