//! Production task API handlers, including inspection submission.

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::auth::WriteAccess;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    CompleteTaskRequest, InspectionResponse, ListTasksQuery, QcSheetResponse,
    SubmitInspectionRequest, TaskDetailResponse, TaskListResponse, TaskResponse,
};
use crate::services::{inspection, production};

/// List production tasks.
#[utoipa::path(
    get,
    path = "/api/v1/tasks",
    tag = "Tasks",
    params(
        ("order_id" = Option<Uuid>, Query, description = "Filter by order"),
        ("status" = Option<String>, Query, description = "Filter by task status"),
        ("process" = Option<String>, Query, description = "Filter by process"),
        ("page" = Option<u64>, Query, description = "Page number (default 1)"),
        ("limit" = Option<u64>, Query, description = "Results per page (default 20, max 100)")
    ),
    responses(
        (status = 200, description = "List of tasks", body = TaskListResponse),
    )
)]
pub async fn list_tasks(
    pool: web::Data<DbPool>,
    query: web::Query<ListTasksQuery>,
) -> AppResult<HttpResponse> {
    let tasks = production::list_tasks(pool.connection(), &query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Get a task with its inspection history.
#[utoipa::path(
    get,
    path = "/api/v1/tasks/{task_id}",
    tag = "Tasks",
    params(
        ("task_id" = Uuid, Path, description = "Task UUID")
    ),
    responses(
        (status = 200, description = "Task details", body = TaskDetailResponse),
        (status = 404, description = "Task not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_task(pool: web::Data<DbPool>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let task = production::get_task(pool.connection(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Start a pending task or restart one in rework.
#[utoipa::path(
    post,
    path = "/api/v1/tasks/{task_id}/start",
    tag = "Tasks",
    params(
        ("task_id" = Uuid, Path, description = "Task UUID")
    ),
    responses(
        (status = 200, description = "Task started", body = TaskResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Task not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Task cannot be started", body = crate::error::ErrorResponse),
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn start_task(
    _auth: WriteAccess,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let task = production::start_task(pool.connection(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Mark production finished. An empty body completes the full target.
#[utoipa::path(
    post,
    path = "/api/v1/tasks/{task_id}/complete",
    tag = "Tasks",
    params(
        ("task_id" = Uuid, Path, description = "Task UUID")
    ),
    request_body(content = CompleteTaskRequest, description = "Optional; omitted quantities default to the full target and zero defects"),
    responses(
        (status = 200, description = "Task completed", body = TaskResponse),
        (status = 400, description = "Invalid quantities", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Task not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Task cannot be completed", body = crate::error::ErrorResponse),
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn complete_task(
    _auth: WriteAccess,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: Option<web::Json<CompleteTaskRequest>>,
) -> AppResult<HttpResponse> {
    let req = body.map(web::Json::into_inner).unwrap_or_default();
    let task = production::complete_task(pool.connection(), path.into_inner(), req).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Send a failed task back for rework.
#[utoipa::path(
    post,
    path = "/api/v1/tasks/{task_id}/rework",
    tag = "Tasks",
    params(
        ("task_id" = Uuid, Path, description = "Task UUID")
    ),
    responses(
        (status = 200, description = "Task in rework", body = TaskResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Task not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Task did not fail inspection", body = crate::error::ErrorResponse),
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn rework_task(
    _auth: WriteAccess,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let task = production::rework_task(pool.connection(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// Submit a QC inspection for a completed task.
///
/// The task moves to `inspected_pass` when fewer than 2.5% of checked units
/// are rejected and to `inspected_fail` otherwise.
#[utoipa::path(
    post,
    path = "/api/v1/tasks/{task_id}/inspections",
    tag = "Inspections",
    params(
        ("task_id" = Uuid, Path, description = "Task UUID")
    ),
    request_body = SubmitInspectionRequest,
    responses(
        (status = 201, description = "Inspection recorded", body = InspectionResponse),
        (status = 400, description = "Invalid quantities or defects", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Task not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Task not ready for inspection", body = crate::error::ErrorResponse),
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn submit_inspection(
    _auth: WriteAccess,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<SubmitInspectionRequest>,
) -> AppResult<HttpResponse> {
    let response =
        inspection::submit_inspection(pool.connection(), path.into_inner(), body.into_inner())
            .await?;
    Ok(HttpResponse::Created().json(response))
}

/// Inspection history of a task, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/tasks/{task_id}/inspections",
    tag = "Inspections",
    params(
        ("task_id" = Uuid, Path, description = "Task UUID")
    ),
    responses(
        (status = 200, description = "Inspection history", body = Vec<QcSheetResponse>),
        (status = 404, description = "Task not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn list_task_inspections(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let sheets = inspection::list_task_inspections(pool.connection(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(sheets))
}

/// Configure task routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/tasks").route(web::get().to(list_tasks)))
        .service(web::resource("/tasks/{task_id}").route(web::get().to(get_task)))
        .service(web::resource("/tasks/{task_id}/start").route(web::post().to(start_task)))
        .service(web::resource("/tasks/{task_id}/complete").route(web::post().to(complete_task)))
        .service(web::resource("/tasks/{task_id}/rework").route(web::post().to(rework_task)))
        .service(
            web::resource("/tasks/{task_id}/inspections")
                .route(web::get().to(list_task_inspections))
                .route(web::post().to(submit_inspection)),
        );
}
