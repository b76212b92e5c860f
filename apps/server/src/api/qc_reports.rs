//! QC reporting endpoints.

use actix_web::{web, HttpResponse};

use crate::db::DbPool;
use crate::error::{AppResult, ErrorResponse};
use crate::models::{
    DefectRateTrendReport, FpyReport, ParetoReport, ProcessComparisonReport, QcStatsResponse,
    QcSummaryReport, QualityScoreReport, SummaryQuery, TrendQuery, WindowQuery,
};
use crate::services::qc_analytics;

/// Inspection and defect counters.
#[utoipa::path(
    get,
    path = "/api/v1/qc/stats",
    tag = "QC Reports",
    responses(
        (status = 200, description = "QC dashboard counters", body = QcStatsResponse),
    )
)]
pub async fn qc_stats(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let stats = qc_analytics::qc_stats(pool.connection()).await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// First pass yield over the last `days` days.
#[utoipa::path(
    get,
    path = "/api/v1/qc/fpy",
    tag = "QC Reports",
    params(
        ("days" = Option<i64>, Query, description = "Window in days (default 30, max 365)")
    ),
    responses(
        (status = 200, description = "First pass yield", body = FpyReport),
    )
)]
pub async fn first_pass_yield(
    pool: web::Data<DbPool>,
    query: web::Query<WindowQuery>,
) -> AppResult<HttpResponse> {
    let report = qc_analytics::fpy_report(pool.connection(), query.days()).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Most frequent defect types over the last `days` days.
#[utoipa::path(
    get,
    path = "/api/v1/qc/pareto",
    tag = "QC Reports",
    params(
        ("days" = Option<i64>, Query, description = "Window in days (default 30, max 365)")
    ),
    responses(
        (status = 200, description = "Defect Pareto", body = ParetoReport),
    )
)]
pub async fn defect_pareto(
    pool: web::Data<DbPool>,
    query: web::Query<WindowQuery>,
) -> AppResult<HttpResponse> {
    let report = qc_analytics::pareto_report(pool.connection(), query.days()).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Inspection outcomes per production process over the last `days` days.
#[utoipa::path(
    get,
    path = "/api/v1/qc/processes",
    tag = "QC Reports",
    params(
        ("days" = Option<i64>, Query, description = "Window in days (default 30, max 365)")
    ),
    responses(
        (status = 200, description = "Process comparison", body = ProcessComparisonReport),
    )
)]
pub async fn process_comparison(
    pool: web::Data<DbPool>,
    query: web::Query<WindowQuery>,
) -> AppResult<HttpResponse> {
    let report = qc_analytics::process_report(pool.connection(), query.days()).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Weighted quality score and grade over the last `days` days.
#[utoipa::path(
    get,
    path = "/api/v1/qc/quality-score",
    tag = "QC Reports",
    params(
        ("days" = Option<i64>, Query, description = "Window in days (default 30, max 365)")
    ),
    responses(
        (status = 200, description = "Quality score", body = QualityScoreReport),
    )
)]
pub async fn quality_score(
    pool: web::Data<DbPool>,
    query: web::Query<WindowQuery>,
) -> AppResult<HttpResponse> {
    let report = qc_analytics::quality_score_report(pool.connection(), query.days()).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Defect rate per week or month, oldest bucket first.
#[utoipa::path(
    get,
    path = "/api/v1/qc/trends",
    tag = "QC Reports",
    params(
        ("period" = Option<String>, Query, description = "weekly (default) or monthly"),
        ("count" = Option<u32>, Query, description = "Number of buckets (default 12, max 52)")
    ),
    responses(
        (status = 200, description = "Defect rate trend", body = DefectRateTrendReport),
        (status = 400, description = "Unknown period", body = ErrorResponse),
    )
)]
pub async fn defect_rate_trends(
    pool: web::Data<DbPool>,
    query: web::Query<TrendQuery>,
) -> AppResult<HttpResponse> {
    let report =
        qc_analytics::trend_report(pool.connection(), query.period(), query.count()).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Week or month summary compared with the previous period.
#[utoipa::path(
    get,
    path = "/api/v1/qc/summary",
    tag = "QC Reports",
    params(
        ("period" = Option<String>, Query, description = "week (default) or month")
    ),
    responses(
        (status = 200, description = "Period summary", body = QcSummaryReport),
        (status = 400, description = "Unknown period", body = ErrorResponse),
    )
)]
pub async fn summary(
    pool: web::Data<DbPool>,
    query: web::Query<SummaryQuery>,
) -> AppResult<HttpResponse> {
    let period = query.period.unwrap_or_default();
    let report = qc_analytics::summary_report(pool.connection(), period).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Configure QC report routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/qc/stats").route(web::get().to(qc_stats)))
        .service(web::resource("/qc/fpy").route(web::get().to(first_pass_yield)))
        .service(web::resource("/qc/pareto").route(web::get().to(defect_pareto)))
        .service(web::resource("/qc/processes").route(web::get().to(process_comparison)))
        .service(web::resource("/qc/quality-score").route(web::get().to(quality_score)))
        .service(web::resource("/qc/trends").route(web::get().to(defect_rate_trends)))
        .service(web::resource("/qc/summary").route(web::get().to(summary)));
}
