//! Production task domain models, status machine and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::inspection::{InspectionResult, QcSheetResponse};
use super::Pagination;
use crate::entity::production_task;

/// Production process a task covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProcessType {
    Cutting,
    Sewing,
    /// Screen printing.
    Sablon,
    Finishing,
    Packing,
}

impl ProcessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cutting => "cutting",
            Self::Sewing => "sewing",
            Self::Sablon => "sablon",
            Self::Finishing => "finishing",
            Self::Packing => "packing",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "cutting" => Some(Self::Cutting),
            "sewing" => Some(Self::Sewing),
            "sablon" => Some(Self::Sablon),
            "finishing" => Some(Self::Finishing),
            "packing" => Some(Self::Packing),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProcessType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Task lifecycle status.
///
/// ```text
/// pending -> in_progress -> completed -> inspected_pass
///                                     -> inspected_fail -> rework -> completed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created, production not started.
    Pending,
    /// Production running.
    InProgress,
    /// Production finished, awaiting inspection.
    Completed,
    /// Last inspection passed.
    InspectedPass,
    /// Last inspection failed; eligible for rework.
    InspectedFail,
    /// Being reworked after a failed inspection.
    Rework,
}

/// Action requested on a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction {
    Start,
    Complete,
    Inspect,
    Rework,
}

impl std::fmt::Display for TaskAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Start => "start",
            Self::Complete => "complete",
            Self::Inspect => "inspect",
            Self::Rework => "rework",
        };
        write!(f, "{}", s)
    }
}

/// A status change the task's current state does not permit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action} a task that is {from}")]
pub struct TransitionError {
    pub action: TaskAction,
    pub from: TaskStatus,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::InspectedPass => "inspected_pass",
            Self::InspectedFail => "inspected_fail",
            Self::Rework => "rework",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "inspected_pass" => Some(Self::InspectedPass),
            "inspected_fail" => Some(Self::InspectedFail),
            "rework" => Some(Self::Rework),
            _ => None,
        }
    }

    fn reject(self, action: TaskAction) -> TransitionError {
        TransitionError { action, from: self }
    }

    /// Begin (or resume) production.
    pub fn start(self) -> Result<Self, TransitionError> {
        match self {
            Self::Pending | Self::Rework => Ok(Self::InProgress),
            other => Err(other.reject(TaskAction::Start)),
        }
    }

    /// Finish production; the task becomes inspectable.
    pub fn complete(self) -> Result<Self, TransitionError> {
        match self {
            Self::InProgress | Self::Rework => Ok(Self::Completed),
            other => Err(other.reject(TaskAction::Complete)),
        }
    }

    /// Record an inspection outcome. Only completed tasks can be inspected.
    pub fn inspect(self, result: InspectionResult) -> Result<Self, TransitionError> {
        match (self, result) {
            (Self::Completed, InspectionResult::Pass) => Ok(Self::InspectedPass),
            (Self::Completed, InspectionResult::Fail) => Ok(Self::InspectedFail),
            (other, _) => Err(other.reject(TaskAction::Inspect)),
        }
    }

    /// Send a failed task back for rework.
    pub fn rework(self) -> Result<Self, TransitionError> {
        match self {
            Self::InspectedFail => Ok(Self::Rework),
            other => Err(other.reject(TaskAction::Rework)),
        }
    }

    /// Production output exists (inspected or awaiting inspection).
    pub fn is_produced(&self) -> bool {
        matches!(
            self,
            Self::Completed | Self::InspectedPass | Self::InspectedFail
        )
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Production task as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub process: String,
    pub sequence: i32,
    pub status: String,
    pub qty_target: i64,
    pub qty_completed: i64,
    pub qty_defect: i64,
    /// Completed quantity as a whole percentage of the target.
    pub progress: i64,
    pub actual_start: Option<DateTime<Utc>>,
    pub actual_end: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskResponse {
    pub fn from_entity(m: production_task::Model) -> Self {
        let progress = if m.qty_target > 0 {
            let percent = i128::from(m.qty_completed) * 100 / i128::from(m.qty_target);
            i64::try_from(percent).unwrap_or(i64::MAX)
        } else {
            0
        };

        TaskResponse {
            id: m.id,
            order_id: m.order_id,
            process: m.process,
            sequence: m.sequence,
            status: m.status,
            qty_target: m.qty_target,
            qty_completed: m.qty_completed,
            qty_defect: m.qty_defect,
            progress,
            actual_start: m.actual_start,
            actual_end: m.actual_end,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Task with its inspection history (oldest first).
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskDetailResponse {
    pub task: TaskResponse,
    pub inspections: Vec<QcSheetResponse>,
}

/// Paginated task list.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskResponse>,
    pub pagination: Pagination,
}

/// Query parameters for listing tasks.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ListTasksQuery {
    pub order_id: Option<Uuid>,
    pub status: Option<TaskStatus>,
    pub process: Option<ProcessType>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Body of `POST /tasks/{id}/complete`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CompleteTaskRequest {
    /// Units produced (default: the task target).
    pub qty_completed: Option<i64>,
    /// Units scrapped during production (default: 0).
    pub qty_defect: Option<i64>,
}
