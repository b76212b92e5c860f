//! QC inspection recording and defect tracking.

use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection, Set, TransactionTrait};
use tracing::{info, warn};
use uuid::Uuid;

use super::evaluator::{evaluate, Evaluation};
use super::production::{
    apply_transition, load_active_order, load_task, sync_order_status, task_status,
};
use crate::db;
use crate::entity::{defect_log, qc_sheet};
use crate::error::{AppError, AppResult};
use crate::models::{
    page_window, DefectInput, DefectListResponse, DefectLogResponse, DefectSeverity,
    InspectionDetailResponse, InspectionListResponse, InspectionResponse, ListDefectsQuery,
    ListInspectionsQuery, Pagination, QcSheetResponse, SubmitInspectionRequest,
};

/// Check the defect entries against the evaluated quantities.
///
/// Returns non-blocking warnings.
fn check_defects(evaluation: &Evaluation, defects: &[DefectInput]) -> AppResult<Vec<String>> {
    for defect in defects {
        defect.validate().map_err(AppError::InvalidInput)?;
    }

    if evaluation.defect_log_required && defects.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "{} rejected units must be described by at least one defect entry",
            evaluation.qty_ng
        )));
    }
    if !evaluation.defect_log_required && !defects.is_empty() {
        return Err(AppError::InvalidInput(
            "defect entries require qty_ng greater than zero".to_string(),
        ));
    }

    let mut warnings = Vec::new();
    let logged: i128 = defects.iter().map(|d| i128::from(d.qty_defect)).sum();
    if logged > i128::from(evaluation.qty_ng) {
        warnings.push(format!(
            "defect quantities ({}) exceed qty_ng ({})",
            logged, evaluation.qty_ng
        ));
    }
    Ok(warnings)
}

fn new_defect(qc_sheet_id: Uuid, input: DefectInput, at: DateTime<Utc>) -> defect_log::ActiveModel {
    defect_log::ActiveModel {
        id: Set(Uuid::now_v7()),
        qc_sheet_id: Set(qc_sheet_id),
        defect_type: Set(input.defect_type.trim().to_string()),
        defect_category: Set(input.defect_category),
        severity: Set(input.severity.as_str().to_string()),
        qty_defect: Set(input.qty_defect),
        description: Set(input.description),
        station: Set(input.station),
        action_taken: Set(None),
        is_resolved: Set(false),
        resolved_at: Set(None),
        created_at: Set(at),
    }
}

async fn load_sheet<C: ConnectionTrait>(db: &C, sheet_id: Uuid) -> AppResult<qc_sheet::Model> {
    db::qc_sheets::find_by_id(db, sheet_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Inspection {}", sheet_id)))
}

/// Record an inspection of a completed task.
///
/// The sheet, its defect logs, the task transition and the order status
/// update commit together or not at all.
pub async fn submit_inspection(
    db: &DatabaseConnection,
    task_id: Uuid,
    req: SubmitInspectionRequest,
) -> AppResult<InspectionResponse> {
    let evaluation = evaluate(req.qty_checked, req.qty_ng)?;
    let mut warnings = check_defects(&evaluation, &req.defects)?;

    let now = Utc::now();
    let txn = db.begin().await?;

    let task = load_task(&txn, task_id).await?;
    let order = load_active_order(&txn, &task).await?;

    let from = task_status(&task)?;
    let to = from.inspect(evaluation.result).map_err(|_| {
        AppError::InvalidTransition(format!(
            "task not ready for inspection (status: {})",
            from
        ))
    })?;

    if req.qty_checked > task.qty_target {
        warnings.push(format!(
            "qty_checked ({}) exceeds task qty_target ({})",
            req.qty_checked, task.qty_target
        ));
    }

    let inspection_code = db::qc_sheets::next_inspection_code(&txn, now.date_naive()).await?;
    let sheet = db::qc_sheets::insert(
        &txn,
        qc_sheet::ActiveModel {
            id: Set(Uuid::now_v7()),
            inspection_code: Set(inspection_code),
            production_task_id: Set(task.id),
            order_id: Set(order.id),
            qty_checked: Set(evaluation.qty_checked),
            qty_ng: Set(evaluation.qty_ng),
            pass_rate: Set(evaluation.pass_rate),
            defect_rate: Set(evaluation.defect_rate),
            result: Set(evaluation.result.as_str().to_string()),
            inspector_id: Set(req.inspector_id),
            notes: Set(req.notes),
            inspected_at: Set(now),
            created_at: Set(now),
        },
    )
    .await?;

    let mut defects = Vec::with_capacity(req.defects.len());
    for input in req.defects {
        let defect = db::defect_logs::insert(&txn, new_defect(sheet.id, input, now)).await?;
        defects.push(DefectLogResponse::from_entity(defect));
    }

    apply_transition(&txn, &task, from, to).await?;
    sync_order_status(&txn, order).await?;

    txn.commit().await?;

    for warning in &warnings {
        warn!(inspection_code = %sheet.inspection_code, "{}", warning);
    }
    info!(
        inspection_code = %sheet.inspection_code,
        task_id = %task.id,
        result = %evaluation.result,
        qty_checked = evaluation.qty_checked,
        qty_ng = evaluation.qty_ng,
        "Inspection recorded"
    );

    Ok(InspectionResponse {
        sheet: QcSheetResponse::from_entity(sheet),
        defects,
        evaluation,
        task_status: to.as_str().to_string(),
        warnings,
    })
}

/// QC sheet with its defects.
pub async fn get_inspection(
    db: &DatabaseConnection,
    sheet_id: Uuid,
) -> AppResult<InspectionDetailResponse> {
    let sheet = load_sheet(db, sheet_id).await?;
    let defects = db::defect_logs::find_by_sheet(db, sheet.id).await?;

    let has_critical_defect = defects
        .iter()
        .any(|d| DefectSeverity::parse(&d.severity) == Some(DefectSeverity::Critical));

    Ok(InspectionDetailResponse {
        sheet: QcSheetResponse::from_entity(sheet),
        defects: defects.into_iter().map(DefectLogResponse::from_entity).collect(),
        has_critical_defect,
    })
}

pub async fn list_inspections(
    db: &DatabaseConnection,
    query: &ListInspectionsQuery,
) -> AppResult<InspectionListResponse> {
    let (page, limit) = page_window(query.page, query.limit);
    let (sheets, total) = db::qc_sheets::list(db, query, page, limit).await?;

    Ok(InspectionListResponse {
        inspections: sheets.into_iter().map(QcSheetResponse::from_entity).collect(),
        pagination: Pagination::new(page, limit, total),
    })
}

/// Inspection history of a task, oldest first.
pub async fn list_task_inspections(
    db: &DatabaseConnection,
    task_id: Uuid,
) -> AppResult<Vec<QcSheetResponse>> {
    load_task(db, task_id).await?;
    let sheets = db::qc_sheets::find_by_task(db, task_id).await?;
    Ok(sheets.into_iter().map(QcSheetResponse::from_entity).collect())
}

/// Append a defect to an existing sheet with rejected units.
pub async fn add_defect(
    db: &DatabaseConnection,
    sheet_id: Uuid,
    input: DefectInput,
) -> AppResult<DefectLogResponse> {
    input.validate().map_err(AppError::InvalidInput)?;

    let sheet = load_sheet(db, sheet_id).await?;
    if sheet.qty_ng == 0 {
        return Err(AppError::InvalidInput(format!(
            "inspection {} has no rejected units",
            sheet.inspection_code
        )));
    }

    let defect = db::defect_logs::insert(db, new_defect(sheet.id, input, Utc::now())).await?;
    info!(
        inspection_code = %sheet.inspection_code,
        defect_type = %defect.defect_type,
        severity = %defect.severity,
        "Defect logged"
    );
    Ok(DefectLogResponse::from_entity(defect))
}

pub async fn list_defects(
    db: &DatabaseConnection,
    query: &ListDefectsQuery,
) -> AppResult<DefectListResponse> {
    let (page, limit) = page_window(query.page, query.limit);
    let (defects, total) = db::defect_logs::list(db, query, page, limit).await?;

    Ok(DefectListResponse {
        defects: defects.into_iter().map(DefectLogResponse::from_entity).collect(),
        pagination: Pagination::new(page, limit, total),
    })
}

/// Close a defect with the corrective action taken.
pub async fn resolve_defect(
    db: &DatabaseConnection,
    defect_id: Uuid,
    action_taken: String,
) -> AppResult<DefectLogResponse> {
    let action_taken = action_taken.trim().to_string();
    if action_taken.is_empty() {
        return Err(AppError::InvalidInput("action_taken is required".to_string()));
    }

    let defect = db::defect_logs::find_by_id(db, defect_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Defect {}", defect_id)))?;
    if defect.is_resolved {
        return Err(AppError::InvalidTransition(format!(
            "defect {} is already resolved",
            defect_id
        )));
    }

    let defect = db::defect_logs::mark_resolved(db, defect, action_taken, Utc::now()).await?;
    info!(defect_id = %defect.id, "Defect resolved");
    Ok(DefectLogResponse::from_entity(defect))
}
