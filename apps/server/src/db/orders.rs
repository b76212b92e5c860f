//! Database queries for orders.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::order::{self, ActiveModel, Entity as Order};
use crate::error::{AppError, AppResult};
use crate::models::{ListOrdersQuery, OrderStatus};

use super::{next_sequence, page_index};

/// Prefix of generated order codes.
pub const ORDER_CODE_PREFIX: &str = "ORD";

/// Insert a new order.
pub async fn insert<C: ConnectionTrait>(db: &C, model: ActiveModel) -> AppResult<order::Model> {
    model
        .insert(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert order: {}", e)))
}

/// Get an order by ID.
pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<order::Model>> {
    Order::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get order: {}", e)))
}

/// Next free order code for `date`, e.g. `ORD-20260301-0003`.
pub async fn next_order_code<C: ConnectionTrait>(db: &C, date: NaiveDate) -> AppResult<String> {
    let prefix = format!("{}-{}", ORDER_CODE_PREFIX, date.format("%Y%m%d"));

    let codes: Vec<String> = Order::find()
        .select_only()
        .column(order::Column::OrderCode)
        .filter(order::Column::OrderCode.starts_with(format!("{}-", prefix)))
        .into_tuple()
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to read order codes: {}", e)))?;

    let seq = next_sequence(codes.iter().map(String::as_str));
    Ok(format!("{}-{:04}", prefix, seq))
}

/// List orders, newest first. Returns the page and the total match count.
pub async fn list<C: ConnectionTrait>(
    db: &C,
    query: &ListOrdersQuery,
    page: u64,
    limit: u64,
) -> AppResult<(Vec<order::Model>, u64)> {
    let mut select = Order::find();

    if let Some(status) = query.status {
        select = select.filter(order::Column::Status.eq(status.as_str()));
    }

    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        // Codes are stored upper-case, so upper-casing the needle makes code
        // matching case-insensitive on every backend.
        select = select.filter(
            Condition::any()
                .add(order::Column::OrderCode.contains(search.to_uppercase()))
                .add(order::Column::ProductModel.contains(search)),
        );
    }

    let paginator = select
        .order_by_desc(order::Column::CreatedAt)
        .order_by_desc(order::Column::Id)
        .paginate(db, limit);

    let total = paginator
        .num_items()
        .await
        .map_err(|e| AppError::Database(format!("Failed to count orders: {}", e)))?;
    let orders = paginator
        .fetch_page(page_index(page))
        .await
        .map_err(|e| AppError::Database(format!("Failed to list orders: {}", e)))?;

    Ok((orders, total))
}

/// Set order status.
pub async fn update_status<C: ConnectionTrait>(
    db: &C,
    order: order::Model,
    status: OrderStatus,
) -> AppResult<order::Model> {
    let mut active: ActiveModel = order.into();
    active.status = Set(status.as_str().to_string());
    active.updated_at = Set(Utc::now());

    active
        .update(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to update order status: {}", e)))
}
