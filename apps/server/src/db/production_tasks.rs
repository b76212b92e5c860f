//! Database queries for production tasks.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::production_task::{self as task, ActiveModel, Entity as ProductionTask};
use crate::error::{AppError, AppResult};
use crate::models::{ListTasksQuery, TaskStatus};

use super::page_index;

/// Insert a new task.
pub async fn insert<C: ConnectionTrait>(db: &C, model: ActiveModel) -> AppResult<task::Model> {
    model
        .insert(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert production task: {}", e)))
}

/// Get a task by ID.
pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<Option<task::Model>> {
    ProductionTask::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get production task: {}", e)))
}

/// All tasks of an order in production sequence.
pub async fn find_by_order<C: ConnectionTrait>(
    db: &C,
    order_id: Uuid,
) -> AppResult<Vec<task::Model>> {
    ProductionTask::find()
        .filter(task::Column::OrderId.eq(order_id))
        .order_by_asc(task::Column::Sequence)
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get tasks for order: {}", e)))
}

/// List tasks grouped by order, in sequence. Returns the page and the total match count.
pub async fn list<C: ConnectionTrait>(
    db: &C,
    query: &ListTasksQuery,
    page: u64,
    limit: u64,
) -> AppResult<(Vec<task::Model>, u64)> {
    let mut select = ProductionTask::find();

    if let Some(order_id) = query.order_id {
        select = select.filter(task::Column::OrderId.eq(order_id));
    }
    if let Some(status) = query.status {
        select = select.filter(task::Column::Status.eq(status.as_str()));
    }
    if let Some(process) = query.process {
        select = select.filter(task::Column::Process.eq(process.as_str()));
    }

    let paginator = select
        .order_by_asc(task::Column::OrderId)
        .order_by_asc(task::Column::Sequence)
        .paginate(db, limit);

    let total = paginator
        .num_items()
        .await
        .map_err(|e| AppError::Database(format!("Failed to count production tasks: {}", e)))?;
    let tasks = paginator
        .fetch_page(page_index(page))
        .await
        .map_err(|e| AppError::Database(format!("Failed to list production tasks: {}", e)))?;

    Ok((tasks, total))
}

/// Move a task from `from` to `to`, only if it is still in `from`.
///
/// Returns false when another request changed the status first.
pub async fn transition<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    from: TaskStatus,
    to: TaskStatus,
) -> AppResult<bool> {
    let result = ProductionTask::update_many()
        .col_expr(task::Column::Status, Expr::value(to.as_str()))
        .col_expr(task::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(task::Column::Id.eq(id))
        .filter(task::Column::Status.eq(from.as_str()))
        .exec(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to update task status: {}", e)))?;

    Ok(result.rows_affected == 1)
}

/// Record the first production start time.
pub async fn set_actual_start<C: ConnectionTrait>(
    db: &C,
    task: task::Model,
    at: DateTime<Utc>,
) -> AppResult<task::Model> {
    let mut active: ActiveModel = task.into();
    active.actual_start = Set(Some(at));
    active.updated_at = Set(Utc::now());

    active
        .update(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to update task start: {}", e)))
}

/// Record production output and end time.
pub async fn set_completion<C: ConnectionTrait>(
    db: &C,
    task: task::Model,
    qty_completed: i64,
    qty_defect: i64,
    at: DateTime<Utc>,
) -> AppResult<task::Model> {
    let mut active: ActiveModel = task.into();
    active.qty_completed = Set(qty_completed);
    active.qty_defect = Set(qty_defect);
    active.actual_end = Set(Some(at));
    active.updated_at = Set(Utc::now());

    active
        .update(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to update task completion: {}", e)))
}
