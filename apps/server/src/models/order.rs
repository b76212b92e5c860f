//! Order domain models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::production_task::{ProcessType, TaskResponse, TaskStatus};
use super::{Pagination, MAX_QUANTITY};
use crate::entity::order;

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Registered, no task started.
    Draft,
    /// At least one task started.
    InProduction,
    /// Every task produced; inspections outstanding or failed.
    QcPending,
    /// Every task passed inspection.
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::InProduction => "in_production",
            Self::QcPending => "qc_pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "in_production" => Some(Self::InProduction),
            "qc_pending" => Some(Self::QcPending),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Order status implied by the statuses of its tasks.
    ///
    /// Cancelled orders never change. Otherwise the order is completed once
    /// every task passed inspection, waits on QC once every task has
    /// output, and is in production as soon as any task has moved.
    pub fn derive(self, tasks: &[TaskStatus]) -> Self {
        if self == Self::Cancelled || tasks.is_empty() {
            return self;
        }

        if tasks.iter().all(|t| *t == TaskStatus::InspectedPass) {
            Self::Completed
        } else if tasks.iter().all(TaskStatus::is_produced) {
            Self::QcPending
        } else if tasks.iter().any(|t| *t != TaskStatus::Pending) {
            Self::InProduction
        } else {
            Self::Draft
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One task to create with a new order.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewTaskSpec {
    pub process: ProcessType,
    /// Target quantity (default: the order quantity).
    pub qty_target: Option<i64>,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub customer_id: String,
    /// Product model name.
    pub model: String,
    pub qty_total: i64,
    pub deadline: Option<NaiveDate>,
    pub notes: Option<String>,
    /// Production tasks in execution order.
    pub tasks: Vec<NewTaskSpec>,
}

impl CreateOrderRequest {
    /// Check request invariants before touching the database.
    pub fn validate(&self) -> Result<(), String> {
        if self.customer_id.trim().is_empty() {
            return Err("customer_id is required".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("model is required".to_string());
        }
        if !(1..=MAX_QUANTITY).contains(&self.qty_total) {
            return Err(format!("qty_total must be between 1 and {}", MAX_QUANTITY));
        }
        if self.tasks.is_empty() {
            return Err("at least one production task is required".to_string());
        }
        for (i, task) in self.tasks.iter().enumerate() {
            if self.tasks[..i].iter().any(|t| t.process == task.process) {
                return Err(format!("process '{}' listed more than once", task.process));
            }
            if let Some(target) = task.qty_target
                && !(1..=MAX_QUANTITY).contains(&target)
            {
                return Err(format!(
                    "qty_target for '{}' must be between 1 and {}",
                    task.process, MAX_QUANTITY
                ));
            }
        }
        Ok(())
    }
}

/// Order as returned in lists.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderSummary {
    pub id: Uuid,
    pub order_code: String,
    pub customer_id: String,
    pub model: String,
    pub qty_total: i64,
    pub status: String,
    pub deadline: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderSummary {
    pub fn from_entity(m: order::Model) -> Self {
        OrderSummary {
            id: m.id,
            order_code: m.order_code,
            customer_id: m.customer_id,
            model: m.product_model,
            qty_total: m.qty_total,
            status: m.status,
            deadline: m.deadline,
            notes: m.notes,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Order with its tasks.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderDetailResponse {
    pub order: OrderSummary,
    pub tasks: Vec<TaskResponse>,
    /// Every task passed inspection; reports may be generated.
    pub report_ready: bool,
}

/// Paginated order list.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderListResponse {
    pub orders: Vec<OrderSummary>,
    pub pagination: Pagination,
}

/// Query parameters for listing orders.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ListOrdersQuery {
    /// Case-insensitive substring of the order code or model.
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}
