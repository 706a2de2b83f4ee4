use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    analysis::mean,
    config::{ForecastConfig, MAX_WINDOW_MONTHS},
    diagnostics::{
        analyze_risk, analyze_seasonality, analyze_trends, confidence_metrics, detect_anomalies,
        forecast_accuracy, seasonality::is_detected, Analysis, Anomaly, ConfidenceMetrics,
        ForecastAccuracy, RiskAnalysis, SeasonalityAnalysis, TrendAnalysis,
    },
    domain::{EnrichedForecastPoint, MonthlyRecord, YearMonth},
    errors::ForecastError,
    forecast::{add_confidence_intervals, basic_projections, combine, run_methods, standard_methods},
};

use super::{ForecastContext, ServiceResult};

/// Below this many months of effective history the ensemble is skipped.
pub const MIN_ENSEMBLE_MONTHS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionMode {
    Ensemble,
    Basic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub lower: f64,
    pub upper: f64,
}

/// Totals over the whole horizon, with the bands of every month summed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySummary {
    pub months: usize,
    pub total_income: f64,
    pub total_expenses: f64,
    pub total_savings: f64,
    pub average_monthly_income: f64,
    pub average_monthly_expenses: f64,
    pub average_monthly_savings: f64,
    pub income_range: ValueRange,
    pub expenses_range: ValueRange,
    /// Worst case pairs low income with high expenses.
    pub savings_range: ValueRange,
    pub average_confidence: f64,
}

impl YearlySummary {
    pub fn from_projections(projections: &[EnrichedForecastPoint]) -> Self {
        let sum = |read: fn(&EnrichedForecastPoint) -> f64| -> f64 {
            projections.iter().map(read).sum()
        };
        let months = projections.len();
        let per_month = |total: f64| if months == 0 { 0.0 } else { total / months as f64 };

        let total_income = sum(|p| p.income());
        let total_expenses = sum(|p| p.expenses());
        let total_savings = sum(|p| p.savings());
        let income_range = ValueRange {
            lower: sum(|p| p.income_lower),
            upper: sum(|p| p.income_upper),
        };
        let expenses_range = ValueRange {
            lower: sum(|p| p.expenses_lower),
            upper: sum(|p| p.expenses_upper),
        };
        let confidences: Vec<f64> = projections.iter().map(|p| p.confidence_level).collect();

        Self {
            months,
            total_income,
            total_expenses,
            total_savings,
            average_monthly_income: per_month(total_income),
            average_monthly_expenses: per_month(total_expenses),
            average_monthly_savings: per_month(total_savings),
            savings_range: ValueRange {
                lower: income_range.lower - expenses_range.upper,
                upper: income_range.upper - expenses_range.lower,
            },
            income_range,
            expenses_range,
            average_confidence: mean(&confidences),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub month: YearMonth,
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBand {
    pub month: YearMonth,
    pub income_lower: f64,
    pub income_upper: f64,
    pub expenses_lower: f64,
    pub expenses_upper: f64,
}

/// Plot-ready series: the history, the projection and its uncertainty band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub historical: Vec<ChartPoint>,
    pub projected: Vec<ChartPoint>,
    pub bands: Vec<ChartBand>,
}

impl ChartData {
    pub fn build(history: &[MonthlyRecord], projections: &[EnrichedForecastPoint]) -> Self {
        Self {
            historical: history
                .iter()
                .map(|record| ChartPoint {
                    month: record.month,
                    income: record.income,
                    expenses: record.expenses,
                    savings: record.savings,
                })
                .collect(),
            projected: projections
                .iter()
                .map(|p| ChartPoint {
                    month: p.month(),
                    income: p.income(),
                    expenses: p.expenses(),
                    savings: p.savings(),
                })
                .collect(),
            bands: projections
                .iter()
                .map(|p| ChartBand {
                    month: p.month(),
                    income_lower: p.income_lower,
                    income_upper: p.income_upper,
                    expenses_lower: p.expenses_lower,
                    expenses_upper: p.expenses_upper,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionReport {
    pub user_id: Uuid,
    pub reference_month: YearMonth,
    pub projection_mode: ProjectionMode,
    pub horizon_months: usize,
    pub history_months: usize,
    pub monthly_projections: Vec<EnrichedForecastPoint>,
    pub yearly_summary: YearlySummary,
    pub chart_data: ChartData,
    pub forecast_accuracy: Analysis<ForecastAccuracy>,
    pub trend_analysis: Analysis<TrendAnalysis>,
    pub seasonality_analysis: Analysis<SeasonalityAnalysis>,
    pub confidence_metrics: ConfidenceMetrics,
    pub risk_analysis: RiskAnalysis,
    pub anomalies: Vec<Anomaly>,
}

pub struct ProjectionService;

impl ProjectionService {
    /// Forecasts the next `months` months (the configured default when `None`) from
    /// the user's recent history.
    pub fn generate(
        ctx: &ForecastContext<'_>,
        user_id: Uuid,
        months: Option<usize>,
    ) -> ServiceResult<ProjectionReport> {
        let horizon = months.unwrap_or(ctx.config.default_horizon);
        if horizon == 0 || horizon > MAX_WINDOW_MONTHS as usize {
            return Err(ForecastError::InvalidInput(format!(
                "projection horizon must be within 1..={MAX_WINDOW_MONTHS} months, got {horizon}"
            ))
            .into());
        }
        let history = ctx.history(user_id, ctx.config.lookback.projection_months)?;
        Ok(Self::from_history(
            user_id,
            &history,
            ctx.reference_month(),
            horizon,
            ctx.config,
        ))
    }

    /// Runs the pipeline over an already aggregated history. Projections start after
    /// the last historical month, or after `reference` when the history is empty.
    pub fn from_history(
        user_id: Uuid,
        history: &[MonthlyRecord],
        reference: YearMonth,
        horizon: usize,
        config: &ForecastConfig,
    ) -> ProjectionReport {
        let (projection_mode, monthly_projections) = if history.len() < MIN_ENSEMBLE_MONTHS {
            info!(
                user = %user_id,
                months = history.len(),
                "history too short for the ensemble, using basic projections"
            );
            let after = history.last().map(|record| record.month).unwrap_or(reference);
            (
                ProjectionMode::Basic,
                basic_projections(history, after, horizon),
            )
        } else {
            let methods = standard_methods(&config.smoothing);
            let outputs = run_methods(&methods, history, horizon);
            let combined = combine(&outputs, &config.ensemble, horizon);
            (
                ProjectionMode::Ensemble,
                add_confidence_intervals(&combined, history),
            )
        };
        let seasonality_analysis = analyze_seasonality(history);
        debug!(
            user = %user_id,
            mode = ?projection_mode,
            horizon,
            seasonal = is_detected(&seasonality_analysis),
            "projection assembled"
        );

        ProjectionReport {
            user_id,
            reference_month: reference,
            projection_mode,
            horizon_months: horizon,
            history_months: history.len(),
            yearly_summary: YearlySummary::from_projections(&monthly_projections),
            chart_data: ChartData::build(history, &monthly_projections),
            forecast_accuracy: forecast_accuracy(history),
            trend_analysis: Analysis::require(MIN_ENSEMBLE_MONTHS, history.len(), || {
                analyze_trends(history, &config.trend)
            }),
            seasonality_analysis,
            confidence_metrics: confidence_metrics(history),
            risk_analysis: analyze_risk(&monthly_projections, history, &config.risk),
            anomalies: detect_anomalies(history),
            monthly_projections,
        }
    }
}
