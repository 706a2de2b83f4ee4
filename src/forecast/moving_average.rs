use crate::{
    analysis::linear_slope,
    domain::{ForecastMethod, ForecastPoint, MonthlyRecord, RecordField, RecordSeries},
};

use super::{future_months, Forecaster};

/// Weights for the most recent month first.
pub const DEFAULT_WEIGHTS: [f64; 3] = [0.5, 0.3, 0.2];

/// Weighted average of the latest months, drifted by the full-history slope.
#[derive(Debug, Clone)]
pub struct MovingAverageProjection {
    weights: Vec<f64>,
}

impl Default for MovingAverageProjection {
    fn default() -> Self {
        Self {
            weights: DEFAULT_WEIGHTS.to_vec(),
        }
    }
}

impl MovingAverageProjection {
    /// Weighted mean of the newest values, normalized by the weights actually used.
    fn weighted_recent(&self, values: &[f64]) -> f64 {
        let (sum, total_weight) = values
            .iter()
            .rev()
            .zip(&self.weights)
            .fold((0.0, 0.0), |(sum, total), (value, weight)| {
                (sum + value * weight, total + weight)
            });
        if total_weight > 0.0 {
            sum / total_weight
        } else {
            0.0
        }
    }
}

impl Forecaster for MovingAverageProjection {
    fn method(&self) -> ForecastMethod {
        ForecastMethod::MovingAverage
    }

    fn forecast(&self, history: &[MonthlyRecord], horizon: usize) -> Vec<ForecastPoint> {
        let income = history.column(RecordField::Income);
        let expenses = history.column(RecordField::Expenses);
        let (income_base, income_slope) = (self.weighted_recent(&income), linear_slope(&income));
        let (expense_base, expense_slope) =
            (self.weighted_recent(&expenses), linear_slope(&expenses));

        future_months(history, horizon)
            .map(|(step, month)| {
                let step = step as f64;
                ForecastPoint::new(
                    month,
                    income_base + income_slope * step,
                    expense_base + expense_slope * step,
                    self.method(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::test_support::*;

    #[test]
    fn weights_favour_recent_months() {
        let projection = MovingAverageProjection::default();
        let value = projection.weighted_recent(&[999.0, 100.0, 200.0, 300.0]);
        assert!((value - (300.0 * 0.5 + 200.0 * 0.3 + 100.0 * 0.2)).abs() < 1e-9);
    }

    #[test]
    fn renormalizes_when_history_is_short() {
        let projection = MovingAverageProjection::default();
        let value = projection.weighted_recent(&[100.0, 200.0]);
        assert!((value - (200.0 * 0.5 + 100.0 * 0.3) / 0.8).abs() < 1e-9);
        assert_eq!(projection.weighted_recent(&[]), 0.0);
    }

    #[test]
    fn adds_slope_per_step() {
        let records = history(&[(1000.0, 500.0), (1100.0, 500.0), (1200.0, 500.0)]);
        let points = MovingAverageProjection::default().forecast(&records, 2);
        let base = 1200.0 * 0.5 + 1100.0 * 0.3 + 1000.0 * 0.2;
        assert!((points[0].income - (base + 100.0)).abs() < 1e-9);
        assert!((points[1].income - (base + 200.0)).abs() < 1e-9);
        assert!((points[1].expenses - 500.0).abs() < 1e-9);
    }
}
