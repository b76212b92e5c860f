//! Order API handlers.

use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::auth::WriteAccess;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    CreateOrderRequest, ListOrdersQuery, OrderDetailResponse, OrderListResponse, OrderSummary,
};
use crate::services::production;

/// Create an order with its production tasks.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    tag = "Orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderDetailResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn create_order(
    _auth: WriteAccess,
    pool: web::Data<DbPool>,
    body: web::Json<CreateOrderRequest>,
) -> AppResult<HttpResponse> {
    let detail = production::create_order(pool.connection(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(detail))
}

/// List orders, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    tag = "Orders",
    params(
        ("search" = Option<String>, Query, description = "Substring of order code or model"),
        ("status" = Option<String>, Query, description = "Filter by order status"),
        ("page" = Option<u64>, Query, description = "Page number (default 1)"),
        ("limit" = Option<u64>, Query, description = "Results per page (default 20, max 100)")
    ),
    responses(
        (status = 200, description = "List of orders", body = OrderListResponse),
    )
)]
pub async fn list_orders(
    pool: web::Data<DbPool>,
    query: web::Query<ListOrdersQuery>,
) -> AppResult<HttpResponse> {
    let orders = production::list_orders(pool.connection(), &query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(orders))
}

/// Get an order with its tasks.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{order_id}",
    tag = "Orders",
    params(
        ("order_id" = Uuid, Path, description = "Order UUID")
    ),
    responses(
        (status = 200, description = "Order details", body = OrderDetailResponse),
        (status = 404, description = "Order not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_order(pool: web::Data<DbPool>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let detail = production::get_order(pool.connection(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(detail))
}

/// Cancel an unfinished order.
#[utoipa::path(
    post,
    path = "/api/v1/orders/{order_id}/cancel",
    tag = "Orders",
    params(
        ("order_id" = Uuid, Path, description = "Order UUID")
    ),
    responses(
        (status = 200, description = "Order cancelled", body = OrderSummary),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Order already completed or cancelled", body = crate::error::ErrorResponse),
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn cancel_order(
    _auth: WriteAccess,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let order = production::cancel_order(pool.connection(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}

/// Configure order routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/orders")
            .route(web::get().to(list_orders))
            .route(web::post().to(create_order)),
    )
    .service(web::resource("/orders/{order_id}").route(web::get().to(get_order)))
    .service(web::resource("/orders/{order_id}/cancel").route(web::post().to(cancel_order)));
}
