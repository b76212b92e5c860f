//! QC reporting: first pass yield, defect Pareto, process comparison,
//! quality score, defect rate trends and period summaries.
//!
//! The aggregations are pure functions over loaded rows; the async wrappers
//! only load the reporting window. Unit totals use checked arithmetic so
//! corrupt rows surface as an error instead of a wrapped total.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use sea_orm::DatabaseConnection;

use super::evaluator::round_percent;
use crate::db;
use crate::entity::{defect_log, production_task, qc_sheet};
use crate::error::{AppError, AppResult};
use crate::models::{
    DefectRateBucket, DefectRateTrendReport, FpyReport, InspectionResult, ParetoEntry,
    ParetoReport, ProcessComparison, ProcessComparisonReport, QcStatsResponse, QcSummaryReport,
    QualityGrade, QualityScoreComponents, QualityScoreReport, SummaryPeriod, Trend, TrendPeriod,
};

/// Number of defect types kept in a Pareto report.
pub const PARETO_TOP_N: usize = 10;

/// Defect types listed in a period summary.
pub const SUMMARY_TOP_DEFECTS: usize = 5;

// Quality score weights, summing to 1.
const FPY_WEIGHT: f64 = 0.4;
const NG_WEIGHT: f64 = 0.3;
const RESOLUTION_WEIGHT: f64 = 0.2;
const CONSISTENCY_WEIGHT: f64 = 0.1;

/// Fixed consistency component of the quality score.
pub const CONSISTENCY_BASELINE: f64 = 85.0;

/// NG score points lost per NG percent.
const NG_PENALTY_PER_PERCENT: f64 = 10.0;

fn overflow(what: &str) -> AppError {
    AppError::Internal(format!("{} exceeds the supported range", what))
}

fn add_units(total: i64, qty: i64) -> AppResult<i64> {
    total.checked_add(qty).ok_or_else(|| overflow("unit total"))
}

fn round_one(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn round_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Inspection count and unit totals over a set of sheets.
#[derive(Debug, Default)]
struct UnitTotals {
    inspections: u64,
    checked: i64,
    ng: i64,
}

impl UnitTotals {
    fn add(&mut self, sheet: &qc_sheet::Model) -> AppResult<()> {
        self.inspections += 1;
        self.checked = add_units(self.checked, sheet.qty_checked)?;
        self.ng = add_units(self.ng, sheet.qty_ng)?;
        Ok(())
    }

    fn of(sheets: &[qc_sheet::Model]) -> AppResult<Self> {
        let mut totals = Self::default();
        for sheet in sheets {
            totals.add(sheet)?;
        }
        Ok(totals)
    }

    fn defect_rate_percent(&self) -> f64 {
        if self.checked > 0 {
            round_percent(self.ng as f64 / self.checked as f64)
        } else {
            0.0
        }
    }
}

/// First pass yield over `sheets`. An empty window yields 100%.
pub fn first_pass_yield(
    sheets: &[qc_sheet::Model],
    period_start: DateTime<Utc>,
    period_end: DateTime<Utc>,
) -> AppResult<FpyReport> {
    let totals = UnitTotals::of(sheets)?;
    let total_passed = totals
        .checked
        .checked_sub(totals.ng)
        .ok_or_else(|| overflow("passed unit total"))?;

    let fpy_percentage = if totals.checked == 0 {
        100.0
    } else {
        round_percent(total_passed as f64 / totals.checked as f64)
    };

    Ok(FpyReport {
        fpy_percentage,
        total_checked: totals.checked,
        total_passed,
        total_failed: totals.ng,
        period_start,
        period_end,
    })
}

/// Defect quantity per type, largest first, with running share.
///
/// Keeps the top [`PARETO_TOP_N`] types; the share is relative to those.
pub fn defect_pareto(defects: &[defect_log::Model], period_days: i64) -> AppResult<ParetoReport> {
    let mut by_type: HashMap<&str, i64> = HashMap::new();
    for defect in defects {
        let total = by_type.entry(defect.defect_type.as_str()).or_default();
        *total = add_units(*total, defect.qty_defect)?;
    }

    let mut ranked: Vec<(&str, i64)> = by_type.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(PARETO_TOP_N);

    let total_defects = ranked
        .iter()
        .try_fold(0, |acc, (_, qty)| add_units(acc, *qty))?;

    let mut cumulative = 0;
    let mut entries = Vec::with_capacity(ranked.len());
    for (defect_type, count) in ranked {
        cumulative = add_units(cumulative, count)?;
        let cumulative_percentage = if total_defects > 0 {
            round_one(cumulative as f64 * 100.0 / total_defects as f64)
        } else {
            0.0
        };
        entries.push(ParetoEntry {
            defect_type: defect_type.to_string(),
            count,
            cumulative_percentage,
        });
    }

    Ok(ParetoReport {
        total_defects,
        entries,
        period_days,
    })
}

/// Inspection outcomes grouped by the process of the inspected task.
///
/// Sheets whose task no longer exists are skipped.
pub fn process_comparison(
    rows: &[(qc_sheet::Model, Option<production_task::Model>)],
    period_days: i64,
) -> AppResult<ProcessComparisonReport> {
    let mut by_process: HashMap<&str, (UnitTotals, u64)> = HashMap::new();

    for (sheet, task) in rows {
        let Some(task) = task else { continue };

        let (totals, passed) = by_process.entry(task.process.as_str()).or_default();
        totals.add(sheet)?;
        if InspectionResult::parse(&sheet.result) == Some(InspectionResult::Pass) {
            *passed += 1;
        }
    }

    let mut processes: Vec<ProcessComparison> = by_process
        .into_iter()
        .map(|(process, (totals, passed))| ProcessComparison {
            process: process.to_string(),
            inspections: totals.inspections,
            passed,
            total_checked: totals.checked,
            total_ng: totals.ng,
            defect_rate_percent: totals.defect_rate_percent(),
        })
        .collect();
    processes.sort_by(|a, b| {
        b.inspections
            .cmp(&a.inspections)
            .then_with(|| a.process.cmp(&b.process))
    });

    let best_process = processes
        .iter()
        .min_by(|a, b| a.defect_rate_percent.total_cmp(&b.defect_rate_percent))
        .map(|p| p.process.clone());
    let worst_process = processes
        .iter()
        .max_by(|a, b| a.defect_rate_percent.total_cmp(&b.defect_rate_percent))
        .map(|p| p.process.clone());

    Ok(ProcessComparisonReport {
        processes,
        best_process,
        worst_process,
        period_days,
    })
}

/// Weighted 0-100 quality score from yield, NG rate and defect resolution.
pub fn quality_score(
    sheets: &[qc_sheet::Model],
    defects: &[defect_log::Model],
    period_start: DateTime<Utc>,
    period_end: DateTime<Utc>,
) -> AppResult<QualityScoreReport> {
    let fpy = first_pass_yield(sheets, period_start, period_end)?;

    let ng_rate_percent = if fpy.total_checked > 0 {
        fpy.total_failed as f64 * 100.0 / fpy.total_checked as f64
    } else {
        0.0
    };
    let ng_score = (100.0 - ng_rate_percent * NG_PENALTY_PER_PERCENT).max(0.0);

    let resolution_score = if defects.is_empty() {
        100.0
    } else {
        let resolved = defects.iter().filter(|d| d.is_resolved).count();
        resolved as f64 * 100.0 / defects.len() as f64
    };

    let score = round_one(
        fpy.fpy_percentage * FPY_WEIGHT
            + ng_score * NG_WEIGHT
            + resolution_score * RESOLUTION_WEIGHT
            + CONSISTENCY_BASELINE * CONSISTENCY_WEIGHT,
    );
    let grade = QualityGrade::from_score(score);

    Ok(QualityScoreReport {
        quality_score: score,
        grade,
        status: grade.label().to_string(),
        components: QualityScoreComponents {
            fpy_score: round_one(fpy.fpy_percentage),
            ng_score: round_one(ng_score),
            resolution_score: round_one(resolution_score),
            consistency_score: CONSISTENCY_BASELINE,
        },
        period_start,
        period_end,
    })
}

/// Defect rate in `count` consecutive buckets ending at `end`, oldest first.
///
/// Sheets before the first bucket are ignored; sheets after `end` fall into
/// the last bucket.
pub fn defect_rate_trends(
    sheets: &[qc_sheet::Model],
    period: TrendPeriod,
    count: u32,
    end: DateTime<Utc>,
) -> AppResult<DefectRateTrendReport> {
    let count = count.max(1);
    let bucket = Duration::days(period.days());
    let start = end - bucket * count as i32;

    let mut totals: Vec<UnitTotals> = (0..count).map(|_| UnitTotals::default()).collect();
    let last = totals.len() - 1;
    for sheet in sheets {
        let offset = (sheet.inspected_at - start).num_seconds();
        if offset < 0 {
            continue;
        }
        let index = usize::try_from(offset / bucket.num_seconds()).map_or(last, |i| i.min(last));
        totals[index].add(sheet)?;
    }

    let buckets = totals
        .into_iter()
        .enumerate()
        .map(|(i, totals)| {
            let period_start = start + bucket * i as i32;
            DefectRateBucket {
                period_start,
                period_end: period_start + bucket,
                inspections: totals.inspections,
                total_checked: totals.checked,
                total_ng: totals.ng,
                defect_rate_percent: totals.defect_rate_percent(),
            }
        })
        .collect();

    Ok(DefectRateTrendReport { period, buckets })
}

/// Summary of the period ending at `end` against the period before it.
///
/// `rows` and `defects` must cover both periods.
pub fn period_summary(
    period: SummaryPeriod,
    rows: &[(qc_sheet::Model, Option<production_task::Model>)],
    defects: &[defect_log::Model],
    end: DateTime<Utc>,
) -> AppResult<QcSummaryReport> {
    let length = Duration::days(period.days());
    let start = end - length;
    let previous_start = start - length;

    let mut current_rows = Vec::new();
    let mut previous_sheets = Vec::new();
    for row in rows {
        if row.0.inspected_at >= start {
            current_rows.push(row.clone());
        } else if row.0.inspected_at >= previous_start {
            previous_sheets.push(row.0.clone());
        }
    }
    let current_sheets: Vec<qc_sheet::Model> =
        current_rows.iter().map(|(sheet, _)| sheet.clone()).collect();

    let (current_defects, previous_defects): (Vec<_>, Vec<_>) = defects
        .iter()
        .filter(|d| d.created_at >= previous_start)
        .cloned()
        .partition(|d| d.created_at >= start);

    let fpy = first_pass_yield(&current_sheets, start, end)?;
    let previous_fpy = first_pass_yield(&previous_sheets, previous_start, start)?;
    let score = quality_score(&current_sheets, &current_defects, start, end)?;
    let previous_score = quality_score(&previous_sheets, &previous_defects, previous_start, start)?;

    let fpy_change = round_two(fpy.fpy_percentage - previous_fpy.fpy_percentage);
    let score_change = round_one(score.quality_score - previous_score.quality_score);

    let processes = process_comparison(&current_rows, period.days())?.processes;
    let mut top_defects = defect_pareto(&current_defects, period.days())?.entries;
    top_defects.truncate(SUMMARY_TOP_DEFECTS);

    Ok(QcSummaryReport {
        period,
        period_start: start,
        period_end: end,
        fpy: fpy.fpy_percentage,
        fpy_change,
        fpy_trend: Trend::of_change(fpy_change),
        quality_score: score.quality_score,
        quality_grade: score.grade,
        score_change,
        score_trend: Trend::of_change(score_change),
        total_checked: fpy.total_checked,
        total_passed: fpy.total_passed,
        total_failed: fpy.total_failed,
        total_defects: current_defects.len() as u64,
        open_defects: current_defects.iter().filter(|d| !d.is_resolved).count() as u64,
        processes,
        top_defects,
    })
}

fn window_start(days: i64) -> (DateTime<Utc>, DateTime<Utc>) {
    let end = Utc::now();
    (end - Duration::days(days), end)
}

/// Dashboard counters over all recorded inspections.
pub async fn qc_stats(db: &DatabaseConnection) -> AppResult<QcStatsResponse> {
    Ok(QcStatsResponse {
        inspections: db::qc_sheets::count_by_result(db).await?,
        defects: db::defect_logs::count_by_severity(db).await?,
    })
}

pub async fn fpy_report(db: &DatabaseConnection, days: i64) -> AppResult<FpyReport> {
    let (start, end) = window_start(days);
    let sheets = db::qc_sheets::find_since(db, start).await?;
    first_pass_yield(&sheets, start, end)
}

pub async fn pareto_report(db: &DatabaseConnection, days: i64) -> AppResult<ParetoReport> {
    let (start, _) = window_start(days);
    let defects = db::defect_logs::find_since(db, start).await?;
    defect_pareto(&defects, days)
}

pub async fn process_report(
    db: &DatabaseConnection,
    days: i64,
) -> AppResult<ProcessComparisonReport> {
    let (start, _) = window_start(days);
    let rows = db::qc_sheets::find_since_with_task(db, start).await?;
    process_comparison(&rows, days)
}

pub async fn quality_score_report(
    db: &DatabaseConnection,
    days: i64,
) -> AppResult<QualityScoreReport> {
    let (start, end) = window_start(days);
    let sheets = db::qc_sheets::find_since(db, start).await?;
    let defects = db::defect_logs::find_since(db, start).await?;
    quality_score(&sheets, &defects, start, end)
}

pub async fn trend_report(
    db: &DatabaseConnection,
    period: TrendPeriod,
    count: u32,
) -> AppResult<DefectRateTrendReport> {
    let (start, end) = window_start(period.days() * i64::from(count));
    let sheets = db::qc_sheets::find_since(db, start).await?;
    defect_rate_trends(&sheets, period, count, end)
}

pub async fn summary_report(
    db: &DatabaseConnection,
    period: SummaryPeriod,
) -> AppResult<QcSummaryReport> {
    let (since, end) = window_start(period.days() * 2);
    let rows = db::qc_sheets::find_since_with_task(db, since).await?;
    let defects = db::defect_logs::find_since(db, since).await?;
    period_summary(period, &rows, &defects, end)
}
