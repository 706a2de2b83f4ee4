use serde::{Deserialize, Serialize};

use crate::{
    analysis::{coefficient_of_variation, compound_growth_rate, linear_slope},
    config::TrendThresholds,
    domain::{MonthlyRecord, RecordField, RecordSeries},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendStrength {
    Strong,
    Moderate,
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendClassification {
    pub direction: TrendDirection,
    pub strength: TrendStrength,
    /// Change per month.
    pub slope: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesTrend {
    #[serde(flatten)]
    pub trend: TrendClassification,
    /// Compound monthly growth between the first and last month, in percent.
    pub growth_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub income: SeriesTrend,
    pub expenses: SeriesTrend,
    pub savings: SeriesTrend,
    pub savings_rate: SeriesTrend,
    /// 0-100, higher means steadier monthly cash flow.
    pub stability_score: f64,
}

/// Direction follows the sign of `slope` (stable within `stable_epsilon`); strength
/// compares its magnitude against the strong/moderate bands.
pub fn classify_trend(slope: f64, thresholds: &TrendThresholds) -> TrendClassification {
    let magnitude = slope.abs();
    let direction = if magnitude <= thresholds.stable_epsilon {
        TrendDirection::Stable
    } else if slope > 0.0 {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    };
    let strength = if magnitude > thresholds.strong_slope {
        TrendStrength::Strong
    } else if magnitude > thresholds.moderate_slope {
        TrendStrength::Moderate
    } else {
        TrendStrength::Weak
    };
    TrendClassification {
        direction,
        strength,
        slope,
    }
}

fn series_trend(values: &[f64], thresholds: &TrendThresholds) -> SeriesTrend {
    SeriesTrend {
        trend: classify_trend(linear_slope(values), thresholds),
        growth_rate: compound_growth_rate(values) * 100.0,
    }
}

/// `100 - mean(CV(income), CV(expenses), CV(savings)) * 100`, clamped to 0..=100.
pub fn stability_score(history: &[MonthlyRecord]) -> f64 {
    let cvs = [
        coefficient_of_variation(&history.column(RecordField::Income)),
        coefficient_of_variation(&history.column(RecordField::Expenses)),
        coefficient_of_variation(&history.column(RecordField::Savings)),
    ];
    let avg = cvs.iter().sum::<f64>() / cvs.len() as f64;
    (100.0 - avg * 100.0).clamp(0.0, 100.0)
}

pub fn analyze_trends(history: &[MonthlyRecord], thresholds: &TrendThresholds) -> TrendAnalysis {
    let trend_of = |field: RecordField| series_trend(&history.column(field), thresholds);
    TrendAnalysis {
        income: trend_of(RecordField::Income),
        expenses: trend_of(RecordField::Expenses),
        savings: trend_of(RecordField::Savings),
        savings_rate: trend_of(RecordField::SavingsRate),
        stability_score: stability_score(history),
    }
}
