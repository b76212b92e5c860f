//! Defect log API handlers.

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::auth::WriteAccess;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{DefectListResponse, DefectLogResponse, ListDefectsQuery, ResolveDefectRequest};
use crate::services::inspection;

/// List defects, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/defects",
    tag = "Defects",
    params(
        ("severity" = Option<String>, Query, description = "Filter by severity (minor, major, critical)"),
        ("resolved" = Option<bool>, Query, description = "Filter by resolution state"),
        ("page" = Option<u64>, Query, description = "Page number (default 1)"),
        ("limit" = Option<u64>, Query, description = "Results per page (default 20, max 100)")
    ),
    responses(
        (status = 200, description = "List of defects", body = DefectListResponse),
    )
)]
pub async fn list_defects(
    pool: web::Data<DbPool>,
    query: web::Query<ListDefectsQuery>,
) -> AppResult<HttpResponse> {
    let defects = inspection::list_defects(pool.connection(), &query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(defects))
}

/// Close a defect with the corrective action taken.
#[utoipa::path(
    post,
    path = "/api/v1/defects/{defect_id}/resolve",
    tag = "Defects",
    params(
        ("defect_id" = Uuid, Path, description = "Defect UUID")
    ),
    request_body = ResolveDefectRequest,
    responses(
        (status = 200, description = "Defect resolved", body = DefectLogResponse),
        (status = 400, description = "Missing corrective action", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Defect not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Defect already resolved", body = crate::error::ErrorResponse),
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn resolve_defect(
    _auth: WriteAccess,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<ResolveDefectRequest>,
) -> AppResult<HttpResponse> {
    let defect = inspection::resolve_defect(
        pool.connection(),
        path.into_inner(),
        body.into_inner().action_taken,
    )
    .await?;
    Ok(HttpResponse::Ok().json(defect))
}

/// Configure defect routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/defects").route(web::get().to(list_defects)))
        .service(
            web::resource("/defects/{defect_id}/resolve").route(web::post().to(resolve_defect)),
        );
}
