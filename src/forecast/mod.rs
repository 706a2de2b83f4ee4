//! Forward projections of monthly income and expenses.
//!
//! Four independent methods implement [`Forecaster`]; [`ensemble`] blends their output
//! and attaches uncertainty bands, [`basic`] covers histories too short for the blend.

pub mod basic;
pub mod ensemble;
pub mod holt_winters;
pub mod linear;
pub mod moving_average;
pub mod seasonal;

use crate::{
    config::SmoothingParams,
    domain::{ForecastMethod, ForecastPoint, MonthlyRecord, YearMonth},
};

pub use basic::basic_projections;
pub use ensemble::{add_confidence_intervals, combine, MethodForecast};
pub use holt_winters::{HoltWintersProjection, HoltWintersState};
pub use linear::LinearProjection;
pub use moving_average::MovingAverageProjection;
pub use seasonal::SeasonalProjection;

/// A forecasting method over a monthly history.
///
/// Implementations return exactly `horizon` points for a non-empty history, one per
/// month following the last historical month, with income and expenses floored at
/// zero. An empty history yields no points.
pub trait Forecaster {
    fn method(&self) -> ForecastMethod;

    fn forecast(&self, history: &[MonthlyRecord], horizon: usize) -> Vec<ForecastPoint>;
}

pub type BoxedForecaster = Box<dyn Forecaster>;

/// The four methods blended by the ensemble, in reporting order.
pub fn standard_methods(smoothing: &SmoothingParams) -> Vec<BoxedForecaster> {
    vec![
        Box::new(LinearProjection),
        Box::new(SeasonalProjection),
        Box::new(HoltWintersProjection::new(smoothing.clone())),
        Box::new(MovingAverageProjection::default()),
    ]
}

/// Runs every method over the same history and horizon.
pub fn run_methods(
    methods: &[BoxedForecaster],
    history: &[MonthlyRecord],
    horizon: usize,
) -> Vec<MethodForecast> {
    methods
        .iter()
        .map(|method| MethodForecast {
            method: method.method(),
            points: method.forecast(history, horizon),
        })
        .collect()
}

/// `(step, month)` pairs for steps `1..=horizon` after the last historical month.
pub(crate) fn future_months(
    history: &[MonthlyRecord],
    horizon: usize,
) -> impl Iterator<Item = (usize, YearMonth)> {
    let last = history.last().map(|record| record.month);
    last.into_iter()
        .flat_map(move |month| {
            (1..=horizon).map_while(move |step| {
                let offset = i32::try_from(step).ok()?;
                Some((step, month.add_months(offset)))
            })
        })
}

/// Mean of the last `count` values (fewer when the series is shorter).
pub(crate) fn trailing_mean(values: &[f64], count: usize) -> f64 {
    let start = values.len().saturating_sub(count);
    crate::analysis::mean(&values[start..])
}
