//! Diagnostics computed alongside a projection: backtest accuracy, trend and
//! seasonality analysis, data confidence, risk and anomalies.
//!
//! Analyses that need a minimum amount of history return [`Analysis::InsufficientData`]
//! rather than an error.

pub mod accuracy;
pub mod anomaly;
pub mod confidence;
pub mod risk;
pub mod seasonality;
pub mod trend;

use serde::{Deserialize, Serialize};

pub use accuracy::{forecast_accuracy, ForecastAccuracy, MIN_BACKTEST_MONTHS};
pub use anomaly::{detect_anomalies, Anomaly, Severity};
pub use confidence::{confidence_metrics, ConfidenceMetrics};
pub use risk::{analyze_risk, Mitigation, Priority, RiskAnalysis, StressScenario};
pub use seasonality::{
    analyze_seasonality, MonthFactor, SeasonalityAnalysis, MIN_SEASONALITY_MONTHS,
};
pub use trend::{
    analyze_trends, classify_trend, SeriesTrend, TrendAnalysis, TrendClassification,
    TrendDirection, TrendStrength,
};

/// Result of an analysis that may lack enough history to run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Analysis<T> {
    Available(T),
    InsufficientData {
        required_months: usize,
        available_months: usize,
    },
}

impl<T> Analysis<T> {
    /// Runs `analysis` only when `available_months >= required_months`.
    pub fn require(
        required_months: usize,
        available_months: usize,
        analysis: impl FnOnce() -> T,
    ) -> Self {
        if available_months < required_months {
            Analysis::InsufficientData {
                required_months,
                available_months,
            }
        } else {
            Analysis::Available(analysis())
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Analysis::Available(_))
    }

    pub fn available(&self) -> Option<&T> {
        match self {
            Analysis::Available(value) => Some(value),
            Analysis::InsufficientData { .. } => None,
        }
    }
}

/// Three-step qualitative rating shared by several diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    High,
    Medium,
    Low,
}
