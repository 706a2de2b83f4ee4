use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{
    analysis::mean,
    config::TrendThresholds,
    diagnostics::{
        analyze_seasonality, analyze_trends, detect_anomalies, Analysis, Anomaly,
        SeasonalityAnalysis, TrendAnalysis,
    },
    domain::{MonthlyRecord, RecordField, RecordSeries},
};

use super::{ForecastContext, ServiceResult};

pub const MIN_TREND_MONTHS: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAverages {
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
    pub savings_rate: f64,
}

impl MonthlyAverages {
    pub fn of(history: &[MonthlyRecord]) -> Self {
        let avg = |field| mean(&history.column(field));
        Self {
            income: avg(RecordField::Income),
            expenses: avg(RecordField::Expenses),
            savings: avg(RecordField::Savings),
            savings_rate: avg(RecordField::SavingsRate),
        }
    }
}

/// Look back over the user's recent months without projecting forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalTrends {
    pub months: Vec<MonthlyRecord>,
    pub averages: MonthlyAverages,
    pub trend_analysis: TrendAnalysis,
    /// Month with the highest savings.
    pub best_month: Option<MonthlyRecord>,
    pub worst_month: Option<MonthlyRecord>,
    pub anomalies: Vec<Anomaly>,
    pub seasonality: Analysis<SeasonalityAnalysis>,
}

impl HistoricalTrends {
    pub fn from_history(history: &[MonthlyRecord], thresholds: &TrendThresholds) -> Self {
        let by_savings = |a: &&MonthlyRecord, b: &&MonthlyRecord| a.savings.total_cmp(&b.savings);
        Self {
            months: history.to_vec(),
            averages: MonthlyAverages::of(history),
            trend_analysis: analyze_trends(history, thresholds),
            best_month: history.iter().max_by(by_savings).cloned(),
            worst_month: history.iter().min_by(by_savings).cloned(),
            anomalies: detect_anomalies(history),
            seasonality: analyze_seasonality(history),
        }
    }
}

pub struct TrendsService;

impl TrendsService {
    pub fn historical_trends(
        ctx: &ForecastContext<'_>,
        user_id: Uuid,
    ) -> ServiceResult<Analysis<HistoricalTrends>> {
        let history = ctx.history(user_id, ctx.config.lookback.trends_months)?;
        debug!(user = %user_id, months = history.len(), "building historical trends");
        Ok(Analysis::require(MIN_TREND_MONTHS, history.len(), || {
            HistoricalTrends::from_history(&history, &ctx.config.trend)
        }))
    }
}
