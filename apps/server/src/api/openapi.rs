//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models, services};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Atelier QC Server",
        version = "0.1.0",
        description = "Garment production tracking with QC inspection, defect logging and quality reports"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Order endpoints
        api::orders::create_order,
        api::orders::list_orders,
        api::orders::get_order,
        api::orders::cancel_order,
        // Task endpoints
        api::production_tasks::list_tasks,
        api::production_tasks::get_task,
        api::production_tasks::start_task,
        api::production_tasks::complete_task,
        api::production_tasks::rework_task,
        // Inspection endpoints
        api::production_tasks::submit_inspection,
        api::production_tasks::list_task_inspections,
        api::inspections::list_inspections,
        api::inspections::get_inspection,
        // Defect endpoints
        api::inspections::add_defect,
        api::defects::list_defects,
        api::defects::resolve_defect,
        // Reports
        api::qc_reports::qc_stats,
        api::qc_reports::first_pass_yield,
        api::qc_reports::defect_pareto,
        api::qc_reports::process_comparison,
        api::qc_reports::quality_score,
        api::qc_reports::defect_rate_trends,
        api::qc_reports::summary,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            models::Pagination,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Orders
            models::OrderStatus,
            models::NewTaskSpec,
            models::CreateOrderRequest,
            models::OrderSummary,
            models::OrderDetailResponse,
            models::OrderListResponse,
            // Tasks
            models::ProcessType,
            models::TaskStatus,
            models::TaskResponse,
            models::TaskDetailResponse,
            models::TaskListResponse,
            models::CompleteTaskRequest,
            // Inspections
            models::InspectionResult,
            models::SubmitInspectionRequest,
            models::QcSheetResponse,
            models::InspectionResponse,
            models::InspectionDetailResponse,
            models::InspectionListResponse,
            services::Evaluation,
            // Defects
            models::DefectSeverity,
            models::DefectInput,
            models::DefectLogResponse,
            models::DefectListResponse,
            models::ResolveDefectRequest,
            // Reports
            models::InspectionCounts,
            models::DefectCounts,
            models::QcStatsResponse,
            models::FpyReport,
            models::ParetoEntry,
            models::ParetoReport,
            models::ProcessComparison,
            models::ProcessComparisonReport,
            models::QualityGrade,
            models::QualityScoreComponents,
            models::QualityScoreReport,
            models::TrendPeriod,
            models::DefectRateBucket,
            models::DefectRateTrendReport,
            models::SummaryPeriod,
            models::Trend,
            models::QcSummaryReport,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Orders", description = "Production orders"),
        (name = "Tasks", description = "Production task lifecycle"),
        (name = "Inspections", description = "QC inspection submission and history"),
        (name = "Defects", description = "Defect logging and resolution"),
        (name = "QC Reports", description = "Yield, Pareto, process comparison, quality score, trends and summaries")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add API key security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Header(
                        utoipa::openapi::security::ApiKeyValue::new(
                            crate::config::API_KEY_HEADER,
                        ),
                    ),
                ),
            );
        }
    }
}
