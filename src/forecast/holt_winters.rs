//! Triple exponential smoothing with multiplicative seasonality and fixed constants.

use serde::Serialize;

use crate::{
    analysis::mean,
    config::SmoothingParams,
    domain::{ForecastMethod, ForecastPoint, MonthlyRecord, RecordField, RecordSeries},
};

use super::{future_months, Forecaster};

/// Points averaged for the initial level; trend compares the next block against it.
const INIT_BLOCK: usize = 4;

/// Fitted smoothing state. Forecasts are a pure function of this value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoltWintersState {
    pub level: f64,
    pub trend: f64,
    pub seasonal: Vec<f64>,
}

impl HoltWintersState {
    /// Level-only state that forecasts `value` for every step.
    pub fn flat(value: f64, season_length: usize) -> Self {
        Self {
            level: value,
            trend: 0.0,
            seasonal: vec![1.0; season_length.max(1)],
        }
    }

    /// Fits the state to `values`. Fewer than four points degrade to a flat state at
    /// the series mean. The level starts at the mean of the first four points and the
    /// trend is seeded by [`initial_trend`], which stays at zero until a second full
    /// block of four exists (a partial block is not extrapolated).
    pub fn fit(values: &[f64], params: &SmoothingParams) -> Self {
        let season_length = params.season_length.max(1);
        if values.len() < INIT_BLOCK {
            return Self::flat(mean(values), season_length);
        }

        let mut level = mean(&values[..INIT_BLOCK]);
        let mut trend = initial_trend(values);
        let mut seasonal = vec![1.0; season_length];
        if level != 0.0 {
            for (idx, value) in values.iter().take(season_length).enumerate() {
                seasonal[idx] = value / level;
            }
        }

        let SmoothingParams {
            alpha, beta, gamma, ..
        } = *params;
        for (idx, &value) in values.iter().enumerate() {
            let season = idx % season_length;
            let previous_level = level;
            let index = seasonal[season];
            let deseasonalized = if index > 0.0 { value / index } else { value };
            level = alpha * deseasonalized + (1.0 - alpha) * (previous_level + trend);
            trend = beta * (level - previous_level) + (1.0 - beta) * trend;
            if level != 0.0 {
                seasonal[season] = gamma * (value / level) + (1.0 - gamma) * index;
            }
        }

        Self {
            level,
            trend,
            seasonal,
        }
    }

    /// `(level + trend * steps) * seasonal[steps mod season_length]`.
    pub fn forecast_at(&self, steps_ahead: usize) -> f64 {
        let index = self
            .seasonal
            .get(steps_ahead % self.seasonal.len().max(1))
            .copied()
            .unwrap_or(1.0);
        (self.level + self.trend * steps_ahead as f64) * index
    }
}

/// `(sum of points 5-8 - sum of points 1-4) / 16`, or zero with fewer than eight points.
pub fn initial_trend(values: &[f64]) -> f64 {
    if values.len() < INIT_BLOCK * 2 {
        return 0.0;
    }
    let first: f64 = values[..INIT_BLOCK].iter().sum();
    let second: f64 = values[INIT_BLOCK..INIT_BLOCK * 2].iter().sum();
    (second - first) / (INIT_BLOCK * INIT_BLOCK) as f64
}

/// Applies [`HoltWintersState`] independently to income and expenses.
#[derive(Debug, Clone, Default)]
pub struct HoltWintersProjection {
    params: SmoothingParams,
}

impl HoltWintersProjection {
    pub fn new(params: SmoothingParams) -> Self {
        Self { params }
    }
}

impl Forecaster for HoltWintersProjection {
    fn method(&self) -> ForecastMethod {
        ForecastMethod::Exponential
    }

    fn forecast(&self, history: &[MonthlyRecord], horizon: usize) -> Vec<ForecastPoint> {
        let income = HoltWintersState::fit(&history.column(RecordField::Income), &self.params);
        let expenses = HoltWintersState::fit(&history.column(RecordField::Expenses), &self.params);

        future_months(history, horizon)
            .map(|(step, month)| {
                ForecastPoint::new(
                    month,
                    income.forecast_at(step),
                    expenses.forecast_at(step),
                    self.method(),
                )
            })
            .collect()
    }
}
