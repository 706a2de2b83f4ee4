//! Weighted blending of method outputs and horizon-dependent uncertainty bands.

use crate::{
    analysis::volatility,
    config::EnsembleWeights,
    domain::{
        EnrichedForecastPoint, ForecastMethod, ForecastPoint, MonthlyRecord, RecordField,
        RecordSeries,
    },
};

/// z-value of a two-sided 95% band.
const Z_95: f64 = 1.96;
const DECAY_PER_STEP: f64 = 0.1;
const BASE_CONFIDENCE: f64 = 0.95;
const CONFIDENCE_LOSS_PER_STEP: f64 = 0.05;
const MIN_CONFIDENCE: f64 = 0.5;

/// Output of one method, tagged with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodForecast {
    pub method: ForecastMethod,
    pub points: Vec<ForecastPoint>,
}

/// Blends method outputs step by step.
///
/// At each step the weighted mean covers only the methods that produced a point for
/// that step, renormalized by their total weight. The month comes from the linear
/// output when present, otherwise from the first method that has the step.
pub fn combine(
    outputs: &[MethodForecast],
    weights: &EnsembleWeights,
    horizon: usize,
) -> Vec<ForecastPoint> {
    let mut combined = Vec::with_capacity(horizon);
    for idx in 0..horizon {
        let mut income = 0.0;
        let mut expenses = 0.0;
        let mut total_weight = 0.0;
        let mut month = None;

        for output in outputs {
            let Some(point) = output.points.get(idx) else {
                continue;
            };
            if output.method == ForecastMethod::Linear || month.is_none() {
                month = Some(point.month);
            }
            let weight = weights.weight_for(output.method);
            income += point.income * weight;
            expenses += point.expenses * weight;
            total_weight += weight;
        }

        let Some(month) = month else {
            continue;
        };
        if total_weight <= 0.0 {
            continue;
        }
        combined.push(ForecastPoint::new(
            month,
            income / total_weight,
            expenses / total_weight,
            ForecastMethod::Ensemble,
        ));
    }
    combined
}

/// Attaches bands that widen with the horizon. The spread is the historical sample
/// volatility scaled by `1 + 0.1 * idx` and the 95% z-value.
pub fn add_confidence_intervals(
    projections: &[ForecastPoint],
    history: &[MonthlyRecord],
) -> Vec<EnrichedForecastPoint> {
    let income_volatility = volatility(&history.column(RecordField::Income));
    let expense_volatility = volatility(&history.column(RecordField::Expenses));

    projections
        .iter()
        .enumerate()
        .map(|(idx, point)| {
            let time_decay = 1.0 + idx as f64 * DECAY_PER_STEP;
            let income_error = income_volatility * time_decay * Z_95;
            let expense_error = expense_volatility * time_decay * Z_95;
            EnrichedForecastPoint {
                point: point.clone(),
                income_lower: (point.income - income_error).max(0.0),
                income_upper: point.income + income_error,
                expenses_lower: (point.expenses - expense_error).max(0.0),
                expenses_upper: point.expenses + expense_error,
                confidence_level: confidence_at(idx),
                volatility_factor: time_decay,
            }
        })
        .collect()
}

/// Confidence for the 0-based horizon index, never below 0.5.
pub fn confidence_at(idx: usize) -> f64 {
    (BASE_CONFIDENCE - idx as f64 * CONFIDENCE_LOSS_PER_STEP).max(MIN_CONFIDENCE)
}
