//! Domain models and DTOs for orders, production tasks and QC inspections.

use utoipa::ToSchema;

pub mod defect;
pub mod inspection;
pub mod order;
pub mod production_task;
pub mod qc_report;

// Re-export commonly used types
pub use defect::{
    DefectInput, DefectListResponse, DefectLogResponse, DefectSeverity, ListDefectsQuery,
    ResolveDefectRequest,
};
pub use inspection::{
    InspectionDetailResponse, InspectionListResponse, InspectionResponse, InspectionResult,
    ListInspectionsQuery, QcSheetResponse, SubmitInspectionRequest,
};
pub use order::{
    CreateOrderRequest, ListOrdersQuery, NewTaskSpec, OrderDetailResponse, OrderListResponse,
    OrderStatus, OrderSummary,
};
pub use production_task::{
    CompleteTaskRequest, ListTasksQuery, ProcessType, TaskDetailResponse, TaskListResponse,
    TaskResponse, TaskStatus, TransitionError,
};
pub use qc_report::{
    DefectCounts, DefectRateBucket, DefectRateTrendReport, FpyReport, InspectionCounts,
    ParetoEntry, ParetoReport, ProcessComparison, ProcessComparisonReport, QcStatsResponse,
    QcSummaryReport, QualityGrade, QualityScoreComponents, QualityScoreReport, SummaryPeriod,
    SummaryQuery, Trend, TrendPeriod, TrendQuery, WindowQuery,
};

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_LIMIT: u64 = 20;

/// Largest page size a client may request.
pub const MAX_PAGE_LIMIT: u64 = 100;

/// Largest unit quantity accepted on any input.
///
/// Keeps every stored quantity, and any report total over them, well
/// inside `i64`.
pub const MAX_QUANTITY: i64 = i32::MAX as i64;

/// Normalise 1-based `page` and `limit` query values.
///
/// Returns `(page, limit)` with page ≥ 1 and limit clamped to `1..=MAX_PAGE_LIMIT`.
pub fn page_window(page: Option<u64>, limit: Option<u64>) -> (u64, u64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
    (page, limit)
}

/// Pagination metadata for responses.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, ToSchema)]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    /// Create pagination metadata.
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let total_pages = if total == 0 { 0 } else { total.div_ceil(limit) };

        Pagination {
            page,
            limit,
            total,
            total_pages,
        }
    }
}
