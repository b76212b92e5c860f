//! QC reporting DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Default reporting window in days.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Longest reporting window accepted.
pub const MAX_WINDOW_DAYS: i64 = 365;

/// Query parameters for windowed reports.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct WindowQuery {
    /// Days back from now (default 30, max 365).
    pub days: Option<i64>,
}

impl WindowQuery {
    pub fn days(&self) -> i64 {
        self.days
            .unwrap_or(DEFAULT_WINDOW_DAYS)
            .clamp(1, MAX_WINDOW_DAYS)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InspectionCounts {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DefectCounts {
    pub minor: u64,
    pub major: u64,
    pub critical: u64,
    pub unresolved: u64,
}

/// Dashboard counters.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct QcStatsResponse {
    pub inspections: InspectionCounts,
    pub defects: DefectCounts,
}

/// First pass yield over a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FpyReport {
    /// Passed units over checked units, percent with two decimals.
    pub fpy_percentage: f64,
    pub total_checked: i64,
    pub total_passed: i64,
    pub total_failed: i64,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ParetoEntry {
    pub defect_type: String,
    pub count: i64,
    /// Running share of all counted defects, percent with one decimal.
    pub cumulative_percentage: f64,
}

/// Most frequent defect types, largest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ParetoReport {
    pub total_defects: i64,
    pub entries: Vec<ParetoEntry>,
    pub period_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProcessComparison {
    pub process: String,
    pub inspections: u64,
    pub passed: u64,
    pub total_checked: i64,
    pub total_ng: i64,
    /// Percent with two decimals.
    pub defect_rate_percent: f64,
}

/// Inspection outcomes grouped by production process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProcessComparisonReport {
    /// Most inspected first.
    pub processes: Vec<ProcessComparison>,
    /// Process with the lowest defect rate.
    pub best_process: Option<String>,
    /// Process with the highest defect rate.
    pub worst_process: Option<String>,
    pub period_days: i64,
}

/// Letter grade of a quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum QualityGrade {
    A,
    B,
    C,
    D,
    F,
}

impl QualityGrade {
    /// Grade for a 0-100 score: A from 90, B from 80, C from 70, D from 60.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 90.0 => Self::A,
            s if s >= 80.0 => Self::B,
            s if s >= 70.0 => Self::C,
            s if s >= 60.0 => Self::D,
            _ => Self::F,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::A => "Excellent",
            Self::B => "Good",
            Self::C => "Average",
            Self::D => "Below Average",
            Self::F => "Critical",
        }
    }
}

/// Component scores, each 0-100, before weighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QualityScoreComponents {
    /// First pass yield percentage.
    pub fpy_score: f64,
    /// 100 at 0% NG, falling to 0 at 10% NG.
    pub ng_score: f64,
    /// Share of logged defects already resolved (100 when none were logged).
    pub resolution_score: f64,
    pub consistency_score: f64,
}

/// Weighted quality score over a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QualityScoreReport {
    /// 0-100, one decimal.
    pub quality_score: f64,
    pub grade: QualityGrade,
    pub status: String,
    pub components: QualityScoreComponents,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
}

/// Bucket length of a defect rate trend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrendPeriod {
    #[default]
    Weekly,
    Monthly,
}

impl TrendPeriod {
    pub fn days(&self) -> i64 {
        match self {
            Self::Weekly => 7,
            Self::Monthly => 30,
        }
    }
}

/// Default number of trend buckets.
pub const DEFAULT_TREND_BUCKETS: u32 = 12;

/// Most trend buckets a client may request.
pub const MAX_TREND_BUCKETS: u32 = 52;

/// Query parameters for `GET /qc/trends`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TrendQuery {
    pub period: Option<TrendPeriod>,
    /// Number of buckets (default 12, max 52).
    pub count: Option<u32>,
}

impl TrendQuery {
    pub fn period(&self) -> TrendPeriod {
        self.period.unwrap_or_default()
    }

    pub fn count(&self) -> u32 {
        self.count
            .unwrap_or(DEFAULT_TREND_BUCKETS)
            .clamp(1, MAX_TREND_BUCKETS)
    }
}

/// Inspection totals of one trend bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DefectRateBucket {
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub inspections: u64,
    pub total_checked: i64,
    pub total_ng: i64,
    /// Percent with two decimals; 0 for an empty bucket.
    pub defect_rate_percent: f64,
}

/// Defect rate per bucket, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DefectRateTrendReport {
    pub period: TrendPeriod,
    pub buckets: Vec<DefectRateBucket>,
}

/// Length of a summary period, compared against the one before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SummaryPeriod {
    #[default]
    Week,
    Month,
}

impl SummaryPeriod {
    pub fn days(&self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
        }
    }
}

/// Query parameters for `GET /qc/summary`.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SummaryQuery {
    pub period: Option<SummaryPeriod>,
}

/// Direction of a metric against the previous period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl Trend {
    pub fn of_change(change: f64) -> Self {
        if change > 0.0 {
            Self::Up
        } else if change < 0.0 {
            Self::Down
        } else {
            Self::Stable
        }
    }
}

/// Period summary with change against the previous period of equal length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QcSummaryReport {
    pub period: SummaryPeriod,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub fpy: f64,
    /// Percentage points, two decimals.
    pub fpy_change: f64,
    pub fpy_trend: Trend,
    pub quality_score: f64,
    pub quality_grade: QualityGrade,
    /// Points, one decimal.
    pub score_change: f64,
    pub score_trend: Trend,
    pub total_checked: i64,
    pub total_passed: i64,
    pub total_failed: i64,
    /// Defect logs created in the period.
    pub total_defects: u64,
    /// Of those, not yet resolved.
    pub open_defects: u64,
    pub processes: Vec<ProcessComparison>,
    /// Up to five most frequent defect types.
    pub top_defects: Vec<ParetoEntry>,
}
