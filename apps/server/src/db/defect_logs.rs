//! Database queries for defect logs.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::defect_log::{self, ActiveModel, Entity as DefectLog};
use crate::error::{AppError, AppResult};
use crate::models::{DefectCounts, DefectSeverity, ListDefectsQuery};

use super::page_index;

/// Insert a new defect log.
pub async fn insert<C: ConnectionTrait>(
    db: &C,
    model: ActiveModel,
) -> AppResult<defect_log::Model> {
    model
        .insert(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to insert defect log: {}", e)))
}

/// Get a defect log by ID.
pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> AppResult<Option<defect_log::Model>> {
    DefectLog::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get defect log: {}", e)))
}

/// Defects recorded on one QC sheet, in entry order.
pub async fn find_by_sheet<C: ConnectionTrait>(
    db: &C,
    qc_sheet_id: Uuid,
) -> AppResult<Vec<defect_log::Model>> {
    DefectLog::find()
        .filter(defect_log::Column::QcSheetId.eq(qc_sheet_id))
        .order_by_asc(defect_log::Column::CreatedAt)
        .order_by_asc(defect_log::Column::Id)
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to get defects for sheet: {}", e)))
}

/// List defects, newest first. Returns the page and the total match count.
pub async fn list<C: ConnectionTrait>(
    db: &C,
    query: &ListDefectsQuery,
    page: u64,
    limit: u64,
) -> AppResult<(Vec<defect_log::Model>, u64)> {
    let mut select = DefectLog::find();

    if let Some(severity) = query.severity {
        select = select.filter(defect_log::Column::Severity.eq(severity.as_str()));
    }
    if let Some(resolved) = query.resolved {
        select = select.filter(defect_log::Column::IsResolved.eq(resolved));
    }

    let paginator = select
        .order_by_desc(defect_log::Column::CreatedAt)
        .order_by_desc(defect_log::Column::Id)
        .paginate(db, limit);

    let total = paginator
        .num_items()
        .await
        .map_err(|e| AppError::Database(format!("Failed to count defect logs: {}", e)))?;
    let defects = paginator
        .fetch_page(page_index(page))
        .await
        .map_err(|e| AppError::Database(format!("Failed to list defect logs: {}", e)))?;

    Ok((defects, total))
}

/// Defects recorded at or after `since`.
pub async fn find_since<C: ConnectionTrait>(
    db: &C,
    since: DateTime<Utc>,
) -> AppResult<Vec<defect_log::Model>> {
    DefectLog::find()
        .filter(defect_log::Column::CreatedAt.gte(since))
        .all(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to load defect logs: {}", e)))
}

/// Mark a defect resolved.
pub async fn mark_resolved<C: ConnectionTrait>(
    db: &C,
    defect: defect_log::Model,
    action_taken: String,
    at: DateTime<Utc>,
) -> AppResult<defect_log::Model> {
    let mut active: ActiveModel = defect.into();
    active.action_taken = Set(Some(action_taken));
    active.is_resolved = Set(true);
    active.resolved_at = Set(Some(at));

    active
        .update(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to resolve defect: {}", e)))
}

/// Defect totals by severity plus the unresolved backlog.
pub async fn count_by_severity<C: ConnectionTrait>(db: &C) -> AppResult<DefectCounts> {
    Ok(DefectCounts {
        minor: count_severity(db, DefectSeverity::Minor).await?,
        major: count_severity(db, DefectSeverity::Major).await?,
        critical: count_severity(db, DefectSeverity::Critical).await?,
        unresolved: DefectLog::find()
            .filter(defect_log::Column::IsResolved.eq(false))
            .count(db)
            .await
            .map_err(|e| AppError::Database(format!("Failed to count defect logs: {}", e)))?,
    })
}

async fn count_severity<C: ConnectionTrait>(db: &C, severity: DefectSeverity) -> AppResult<u64> {
    DefectLog::find()
        .filter(defect_log::Column::Severity.eq(severity.as_str()))
        .count(db)
        .await
        .map_err(|e| AppError::Database(format!("Failed to count defect logs: {}", e)))
}
