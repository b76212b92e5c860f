//! Orders and production task lifecycle.
//!
//! Every status change runs in a transaction that also re-derives the owning
//! order's status, so orders never disagree with their tasks.

use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection, Set, TransactionTrait};
use tracing::info;
use uuid::Uuid;

use crate::db;
use crate::entity::{order, production_task};
use crate::error::{AppError, AppResult};
use crate::models::{
    page_window, CompleteTaskRequest, CreateOrderRequest, ListOrdersQuery, ListTasksQuery,
    OrderDetailResponse, OrderListResponse, OrderStatus, OrderSummary, Pagination,
    QcSheetResponse, TaskDetailResponse, TaskListResponse, TaskResponse, TaskStatus,
    MAX_QUANTITY,
};

/// Parse a stored task status.
pub(crate) fn task_status(task: &production_task::Model) -> AppResult<TaskStatus> {
    TaskStatus::parse(&task.status).ok_or_else(|| {
        AppError::Database(format!(
            "Task {} has unknown status '{}'",
            task.id, task.status
        ))
    })
}

/// Parse a stored order status.
pub(crate) fn order_status(order: &order::Model) -> AppResult<OrderStatus> {
    OrderStatus::parse(&order.status).ok_or_else(|| {
        AppError::Database(format!(
            "Order {} has unknown status '{}'",
            order.id, order.status
        ))
    })
}

pub(crate) async fn load_task<C: ConnectionTrait>(
    db: &C,
    task_id: Uuid,
) -> AppResult<production_task::Model> {
    db::production_tasks::find_by_id(db, task_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Task {}", task_id)))
}

pub(crate) async fn load_order<C: ConnectionTrait>(
    db: &C,
    order_id: Uuid,
) -> AppResult<order::Model> {
    db::orders::find_by_id(db, order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {}", order_id)))
}

/// Load the order owning `task` and refuse work on cancelled orders.
pub(crate) async fn load_active_order<C: ConnectionTrait>(
    db: &C,
    task: &production_task::Model,
) -> AppResult<order::Model> {
    let order = load_order(db, task.order_id).await?;
    if order_status(&order)? == OrderStatus::Cancelled {
        return Err(AppError::InvalidTransition(format!(
            "order {} is cancelled",
            order.order_code
        )));
    }
    Ok(order)
}

/// Apply a task status change guarded on the status it was read with.
pub(crate) async fn apply_transition<C: ConnectionTrait>(
    db: &C,
    task: &production_task::Model,
    from: TaskStatus,
    to: TaskStatus,
) -> AppResult<()> {
    if !db::production_tasks::transition(db, task.id, from, to).await? {
        return Err(AppError::InvalidTransition(format!(
            "task {} was modified by another request",
            task.id
        )));
    }
    info!(task_id = %task.id, process = %task.process, %from, %to, "Task status changed");
    Ok(())
}

/// Re-derive an order's status from its tasks and persist it when it changed.
pub(crate) async fn sync_order_status<C: ConnectionTrait>(
    db: &C,
    order: order::Model,
) -> AppResult<order::Model> {
    let current = order_status(&order)?;
    let statuses = db::production_tasks::find_by_order(db, order.id)
        .await?
        .iter()
        .map(task_status)
        .collect::<AppResult<Vec<_>>>()?;

    let derived = current.derive(&statuses);
    if derived == current {
        return Ok(order);
    }

    info!(order_code = %order.order_code, from = %current, to = %derived, "Order status changed");
    db::orders::update_status(db, order, derived).await
}

async fn order_detail<C: ConnectionTrait>(
    db: &C,
    order: order::Model,
) -> AppResult<OrderDetailResponse> {
    let tasks = db::production_tasks::find_by_order(db, order.id).await?;
    let report_ready = order_status(&order)? == OrderStatus::Completed;

    Ok(OrderDetailResponse {
        order: OrderSummary::from_entity(order),
        tasks: tasks.into_iter().map(TaskResponse::from_entity).collect(),
        report_ready,
    })
}

/// Create an order together with its production tasks.
pub async fn create_order(
    db: &DatabaseConnection,
    req: CreateOrderRequest,
) -> AppResult<OrderDetailResponse> {
    req.validate().map_err(AppError::InvalidInput)?;

    let now = Utc::now();
    let txn = db.begin().await?;

    let order_code = db::orders::next_order_code(&txn, now.date_naive()).await?;
    let order = db::orders::insert(
        &txn,
        order::ActiveModel {
            id: Set(Uuid::now_v7()),
            order_code: Set(order_code),
            customer_id: Set(req.customer_id.trim().to_string()),
            product_model: Set(req.model.trim().to_string()),
            qty_total: Set(req.qty_total),
            status: Set(OrderStatus::Draft.as_str().to_string()),
            deadline: Set(req.deadline),
            notes: Set(req.notes),
            created_at: Set(now),
            updated_at: Set(now),
        },
    )
    .await?;

    for (sequence, new_task) in (1..).zip(req.tasks.iter()) {
        db::production_tasks::insert(
            &txn,
            production_task::ActiveModel {
                id: Set(Uuid::now_v7()),
                order_id: Set(order.id),
                process: Set(new_task.process.as_str().to_string()),
                sequence: Set(sequence),
                status: Set(TaskStatus::Pending.as_str().to_string()),
                qty_target: Set(new_task.qty_target.unwrap_or(req.qty_total)),
                qty_completed: Set(0),
                qty_defect: Set(0),
                actual_start: Set(None),
                actual_end: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            },
        )
        .await?;
    }

    let detail = order_detail(&txn, order).await?;
    txn.commit().await?;

    info!(
        order_code = %detail.order.order_code,
        tasks = detail.tasks.len(),
        "Order created"
    );
    Ok(detail)
}

/// Order with its tasks.
pub async fn get_order(db: &DatabaseConnection, order_id: Uuid) -> AppResult<OrderDetailResponse> {
    let order = load_order(db, order_id).await?;
    order_detail(db, order).await
}

pub async fn list_orders(
    db: &DatabaseConnection,
    query: &ListOrdersQuery,
) -> AppResult<OrderListResponse> {
    let (page, limit) = page_window(query.page, query.limit);
    let (orders, total) = db::orders::list(db, query, page, limit).await?;

    Ok(OrderListResponse {
        orders: orders.into_iter().map(OrderSummary::from_entity).collect(),
        pagination: Pagination::new(page, limit, total),
    })
}

/// Cancel an order that has not finished.
pub async fn cancel_order(db: &DatabaseConnection, order_id: Uuid) -> AppResult<OrderSummary> {
    let txn = db.begin().await?;
    let order = load_order(&txn, order_id).await?;

    let status = order_status(&order)?;
    if matches!(status, OrderStatus::Completed | OrderStatus::Cancelled) {
        return Err(AppError::InvalidTransition(format!(
            "cannot cancel an order that is {}",
            status
        )));
    }

    let order = db::orders::update_status(&txn, order, OrderStatus::Cancelled).await?;
    txn.commit().await?;

    info!(order_code = %order.order_code, from = %status, "Order cancelled");
    Ok(OrderSummary::from_entity(order))
}

/// Task with its inspection history.
pub async fn get_task(db: &DatabaseConnection, task_id: Uuid) -> AppResult<TaskDetailResponse> {
    let task = load_task(db, task_id).await?;
    let sheets = db::qc_sheets::find_by_task(db, task_id).await?;

    Ok(TaskDetailResponse {
        task: TaskResponse::from_entity(task),
        inspections: sheets.into_iter().map(QcSheetResponse::from_entity).collect(),
    })
}

pub async fn list_tasks(
    db: &DatabaseConnection,
    query: &ListTasksQuery,
) -> AppResult<TaskListResponse> {
    let (page, limit) = page_window(query.page, query.limit);
    let (tasks, total) = db::production_tasks::list(db, query, page, limit).await?;

    Ok(TaskListResponse {
        tasks: tasks.into_iter().map(TaskResponse::from_entity).collect(),
        pagination: Pagination::new(page, limit, total),
    })
}

/// Start (or restart after rework) a task.
pub async fn start_task(db: &DatabaseConnection, task_id: Uuid) -> AppResult<TaskResponse> {
    let txn = db.begin().await?;
    let task = load_task(&txn, task_id).await?;
    let order = load_active_order(&txn, &task).await?;

    let from = task_status(&task)?;
    let to = from.start()?;
    apply_transition(&txn, &task, from, to).await?;

    if task.actual_start.is_none() {
        db::production_tasks::set_actual_start(&txn, task, Utc::now()).await?;
    }

    sync_order_status(&txn, order).await?;
    let task = load_task(&txn, task_id).await?;
    txn.commit().await?;

    Ok(TaskResponse::from_entity(task))
}

/// Finish production on a task, recording its output.
pub async fn complete_task(
    db: &DatabaseConnection,
    task_id: Uuid,
    req: CompleteTaskRequest,
) -> AppResult<TaskResponse> {
    let txn = db.begin().await?;
    let task = load_task(&txn, task_id).await?;
    let order = load_active_order(&txn, &task).await?;

    let qty_completed = req.qty_completed.unwrap_or(task.qty_target);
    let qty_defect = req.qty_defect.unwrap_or(0);
    for (field, value) in [("qty_completed", qty_completed), ("qty_defect", qty_defect)] {
        if !(0..=MAX_QUANTITY).contains(&value) {
            return Err(AppError::InvalidInput(format!(
                "{} must be between 0 and {} (got {})",
                field, MAX_QUANTITY, value
            )));
        }
    }
    if qty_defect > qty_completed {
        return Err(AppError::InvalidInput(format!(
            "qty_defect ({}) cannot exceed qty_completed ({})",
            qty_defect, qty_completed
        )));
    }

    let from = task_status(&task)?;
    let to = from.complete()?;
    apply_transition(&txn, &task, from, to).await?;
    db::production_tasks::set_completion(&txn, task, qty_completed, qty_defect, Utc::now())
        .await?;

    sync_order_status(&txn, order).await?;
    let task = load_task(&txn, task_id).await?;
    txn.commit().await?;

    Ok(TaskResponse::from_entity(task))
}

/// Send a failed task back for rework.
pub async fn rework_task(db: &DatabaseConnection, task_id: Uuid) -> AppResult<TaskResponse> {
    let txn = db.begin().await?;
    let task = load_task(&txn, task_id).await?;
    let order = load_active_order(&txn, &task).await?;

    let from = task_status(&task)?;
    let to = from.rework()?;
    apply_transition(&txn, &task, from, to).await?;

    sync_order_status(&txn, order).await?;
    let task = load_task(&txn, task_id).await?;
    txn.commit().await?;

    Ok(TaskResponse::from_entity(task))
}
