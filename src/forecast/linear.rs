use crate::{
    analysis::linear_slope,
    domain::{ForecastMethod, ForecastPoint, MonthlyRecord, RecordField, RecordSeries},
};

use super::{future_months, trailing_mean, Forecaster};

/// Months averaged to anchor the trend line.
const BASELINE_MONTHS: usize = 3;

/// Extends the least-squares trend of each series from a recent-months baseline.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearProjection;

/// Baseline and slope of one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TrendLine {
    pub baseline: f64,
    pub slope: f64,
}

impl TrendLine {
    pub fn fit(history: &[MonthlyRecord], field: RecordField) -> Self {
        let values = history.column(field);
        Self {
            baseline: trailing_mean(&values, BASELINE_MONTHS),
            slope: linear_slope(&values),
        }
    }

    pub fn at(&self, step: usize) -> f64 {
        (self.baseline + self.slope * step as f64).max(0.0)
    }
}

impl Forecaster for LinearProjection {
    fn method(&self) -> ForecastMethod {
        ForecastMethod::Linear
    }

    fn forecast(&self, history: &[MonthlyRecord], horizon: usize) -> Vec<ForecastPoint> {
        let income = TrendLine::fit(history, RecordField::Income);
        let expenses = TrendLine::fit(history, RecordField::Expenses);
        let recurring_income = TrendLine::fit(history, RecordField::RecurringIncome);
        let recurring_expenses = TrendLine::fit(history, RecordField::RecurringExpenses);

        future_months(history, horizon)
            .map(|(step, month)| {
                ForecastPoint::new(month, income.at(step), expenses.at(step), self.method())
                    .with_recurring(recurring_income.at(step), recurring_expenses.at(step))
            })
            .collect()
    }
}
