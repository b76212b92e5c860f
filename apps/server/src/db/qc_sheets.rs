//! Database queries for QC sheets (inspections).

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use crate::entity::production_task;
use crate::entity::qc_sheet::{self, ActiveModel, Entity as QcSheet};
use crate::error::{AppError, AppResult};
use crate::models::inspection::{format_inspection_code, inspection_code_prefix};
use crate::models::{InspectionCounts, InspectionResult, ListInspectionsQuery};

use super::{next_sequence, page_index};

/// Insert a new QC sheet.
pub async fn insert<C: ConnectionTrait>(db: &C, model: ActiveModel) -> AppResult<qc_sheet::Model> {
    model
        .insert(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert QC sheet: {}", e)))
}

/// Get a QC sheet by ID.
pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> AppResult<Option<qc_sheet::Model>> {
    QcSheet::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get QC sheet: {}", e)))
}

/// Inspection history of a task, oldest first.
pub async fn find_by_task<C: ConnectionTrait>(
    db: &C,
    task_id: Uuid,
) -> AppResult<Vec<qc_sheet::Model>> {
    QcSheet::find()
        .filter(qc_sheet::Column::ProductionTaskId.eq(task_id))
        .order_by_asc(qc_sheet::Column::InspectedAt)
        .order_by_asc(qc_sheet::Column::Id)
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get inspections for task: {}", e)))
}

/// Next free inspection code for `date`, e.g. `QC-20260301-0012`.
pub async fn next_inspection_code<C: ConnectionTrait>(
    db: &C,
    date: NaiveDate,
) -> AppResult<String> {
    let prefix = inspection_code_prefix(date);

    let codes: Vec<String> = QcSheet::find()
        .select_only()
        .column(qc_sheet::Column::InspectionCode)
        .filter(qc_sheet::Column::InspectionCode.starts_with(format!("{}-", prefix)))
        .into_tuple()
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to read inspection codes: {}", e)))?;

    let seq = next_sequence(codes.iter().map(String::as_str));
    Ok(format_inspection_code(date, seq))
}

/// List QC sheets, newest first. Returns the page and the total match count.
pub async fn list<C: ConnectionTrait>(
    db: &C,
    query: &ListInspectionsQuery,
    page: u64,
    limit: u64,
) -> AppResult<(Vec<qc_sheet::Model>, u64)> {
    let mut select = QcSheet::find();

    if let Some(task_id) = query.task_id {
        select = select.filter(qc_sheet::Column::ProductionTaskId.eq(task_id));
    }
    if let Some(order_id) = query.order_id {
        select = select.filter(qc_sheet::Column::OrderId.eq(order_id));
    }
    if let Some(result) = query.result {
        select = select.filter(qc_sheet::Column::Result.eq(result.as_str()));
    }

    let paginator = select
        .order_by_desc(qc_sheet::Column::InspectedAt)
        .order_by_desc(qc_sheet::Column::Id)
        .paginate(db, limit);

    let total = paginator
        .num_items()
        .await
        .map_err(|e| AppError::Database(format!("Failed to count QC sheets: {}", e)))?;
    let sheets = paginator
        .fetch_page(page_index(page))
        .await
        .map_err(|e| AppError::Database(format!("Failed to list QC sheets: {}", e)))?;

    Ok((sheets, total))
}

/// Sheets inspected at or after `since`.
pub async fn find_since<C: ConnectionTrait>(
    db: &C,
    since: DateTime<Utc>,
) -> AppResult<Vec<qc_sheet::Model>> {
    QcSheet::find()
        .filter(qc_sheet::Column::InspectedAt.gte(since))
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to load QC sheets: {}", e)))
}

/// Sheets inspected at or after `since`, with their production task.
pub async fn find_since_with_task<C: ConnectionTrait>(
    db: &C,
    since: DateTime<Utc>,
) -> AppResult<Vec<(qc_sheet::Model, Option<production_task::Model>)>> {
    QcSheet::find()
        .filter(qc_sheet::Column::InspectedAt.gte(since))
        .find_also_related(production_task::Entity)
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to load QC sheets: {}", e)))
}

/// Inspection totals by result.
pub async fn count_by_result<C: ConnectionTrait>(db: &C) -> AppResult<InspectionCounts> {
    Ok(InspectionCounts {
        total: count_with_result(db, None).await?,
        passed: count_with_result(db, Some(InspectionResult::Pass)).await?,
        failed: count_with_result(db, Some(InspectionResult::Fail)).await?,
    })
}

async fn count_with_result<C: ConnectionTrait>(
    db: &C,
    result: Option<InspectionResult>,
) -> AppResult<u64> {
    let mut select = QcSheet::find();
    if let Some(result) = result {
        select = select.filter(qc_sheet::Column::Result.eq(result.as_str()));
    }

    select
        .count(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to count QC sheets: {}", e)))
}
