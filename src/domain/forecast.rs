use std::fmt;

use serde::{Deserialize, Serialize};

use super::month::YearMonth;

/// Origin of a projected month.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    Linear,
    Seasonal,
    Exponential,
    MovingAverage,
    Ensemble,
    /// Flat average used when the history is too short for the ensemble.
    Basic,
}

impl ForecastMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastMethod::Linear => "linear",
            ForecastMethod::Seasonal => "seasonal",
            ForecastMethod::Exponential => "exponential",
            ForecastMethod::MovingAverage => "moving_average",
            ForecastMethod::Ensemble => "ensemble",
            ForecastMethod::Basic => "basic",
        }
    }
}

impl fmt::Display for ForecastMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One projected future month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastPoint {
    pub month: YearMonth,
    pub income: f64,
    pub expenses: f64,
    /// `income - expenses`; may be negative.
    pub savings: f64,
    pub method: ForecastMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_income: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring_expenses: Option<f64>,
}

impl ForecastPoint {
    /// Builds a point with income and expenses floored at zero.
    pub fn new(month: YearMonth, income: f64, expenses: f64, method: ForecastMethod) -> Self {
        let income = income.max(0.0);
        let expenses = expenses.max(0.0);
        Self {
            month,
            income,
            expenses,
            savings: income - expenses,
            method,
            recurring_income: None,
            recurring_expenses: None,
        }
    }

    pub fn with_recurring(mut self, income: f64, expenses: f64) -> Self {
        self.recurring_income = Some(income.max(0.0));
        self.recurring_expenses = Some(expenses.max(0.0));
        self
    }
}

/// A projected month together with its uncertainty band.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedForecastPoint {
    #[serde(flatten)]
    pub point: ForecastPoint,
    pub income_lower: f64,
    pub income_upper: f64,
    pub expenses_lower: f64,
    pub expenses_upper: f64,
    pub confidence_level: f64,
    pub volatility_factor: f64,
}

impl EnrichedForecastPoint {
    pub fn month(&self) -> YearMonth {
        self.point.month
    }

    pub fn income(&self) -> f64 {
        self.point.income
    }

    pub fn expenses(&self) -> f64 {
        self.point.expenses
    }

    pub fn savings(&self) -> f64 {
        self.point.savings
    }
}
