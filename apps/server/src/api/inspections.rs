//! Inspection (QC sheet) API handlers.

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::auth::WriteAccess;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    DefectInput, DefectLogResponse, InspectionDetailResponse, InspectionListResponse,
    ListInspectionsQuery,
};
use crate::services::inspection;

/// List inspections, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/inspections",
    tag = "Inspections",
    params(
        ("task_id" = Option<Uuid>, Query, description = "Filter by task"),
        ("order_id" = Option<Uuid>, Query, description = "Filter by order"),
        ("result" = Option<String>, Query, description = "Filter by result (pass, fail)"),
        ("page" = Option<u64>, Query, description = "Page number (default 1)"),
        ("limit" = Option<u64>, Query, description = "Results per page (default 20, max 100)")
    ),
    responses(
        (status = 200, description = "List of inspections", body = InspectionListResponse),
    )
)]
pub async fn list_inspections(
    pool: web::Data<DbPool>,
    query: web::Query<ListInspectionsQuery>,
) -> AppResult<HttpResponse> {
    let sheets = inspection::list_inspections(pool.connection(), &query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(sheets))
}

/// Get an inspection with its defects.
#[utoipa::path(
    get,
    path = "/api/v1/inspections/{inspection_id}",
    tag = "Inspections",
    params(
        ("inspection_id" = Uuid, Path, description = "QC sheet UUID")
    ),
    responses(
        (status = 200, description = "Inspection details", body = InspectionDetailResponse),
        (status = 404, description = "Inspection not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_inspection(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let detail = inspection::get_inspection(pool.connection(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// Log an additional defect against an inspection with rejected units.
#[utoipa::path(
    post,
    path = "/api/v1/inspections/{inspection_id}/defects",
    tag = "Defects",
    params(
        ("inspection_id" = Uuid, Path, description = "QC sheet UUID")
    ),
    request_body = DefectInput,
    responses(
        (status = 201, description = "Defect logged", body = DefectLogResponse),
        (status = 400, description = "Invalid defect or no rejected units", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Inspection not found", body = crate::error::ErrorResponse),
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn add_defect(
    _auth: WriteAccess,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<DefectInput>,
) -> AppResult<HttpResponse> {
    let defect =
        inspection::add_defect(pool.connection(), path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(defect))
}

/// Configure inspection routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/inspections").route(web::get().to(list_inspections)))
        .service(
            web::resource("/inspections/{inspection_id}").route(web::get().to(get_inspection)),
        )
        .service(
            web::resource("/inspections/{inspection_id}/defects")
                .route(web::post().to(add_defect)),
        );
}
