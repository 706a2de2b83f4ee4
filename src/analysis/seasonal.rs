//! Multiplicative seasonal indices per calendar month.

use serde::{Deserialize, Serialize};

use crate::domain::{MonthlyRecord, RecordField, TransactionKind, YearMonth};

use super::stats::{mean, population_std_dev};

pub const MONTHS_PER_YEAR: usize = 12;

/// Seasonal strength above which a series is considered seasonal.
pub const DETECTION_THRESHOLD: f64 = 0.15;

/// Twelve factors per series, index 0 = January. A factor of `1.0` is neutral.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeasonalFactors {
    pub income: [f64; MONTHS_PER_YEAR],
    pub expenses: [f64; MONTHS_PER_YEAR],
}

impl SeasonalFactors {
    /// Computes factors for income and expenses over every year present in `history`.
    pub fn from_history(history: &[MonthlyRecord]) -> Self {
        Self {
            income: calendar_factors(history, RecordField::Income),
            expenses: calendar_factors(history, RecordField::Expenses),
        }
    }

    pub fn series(&self, kind: TransactionKind) -> &[f64; MONTHS_PER_YEAR] {
        match kind {
            TransactionKind::Income => &self.income,
            TransactionKind::Expense => &self.expenses,
        }
    }

    pub fn factor(&self, kind: TransactionKind, month: YearMonth) -> f64 {
        self.series(kind)
            .get(month.calendar_index())
            .copied()
            .unwrap_or(1.0)
    }

    pub fn strength(&self, kind: TransactionKind) -> f64 {
        seasonal_strength(self.series(kind))
    }

    /// True when either series varies enough across the year.
    pub fn is_seasonal(&self) -> bool {
        self.strength(TransactionKind::Income) > DETECTION_THRESHOLD
            || self.strength(TransactionKind::Expense) > DETECTION_THRESHOLD
    }
}

/// Average per calendar month divided by the overall average. Months without
/// observations, and series whose overall average is zero, stay neutral.
pub fn calendar_factors(history: &[MonthlyRecord], field: RecordField) -> [f64; MONTHS_PER_YEAR] {
    let mut factors = [1.0; MONTHS_PER_YEAR];
    let values: Vec<f64> = history.iter().map(|record| field.read(record)).collect();
    let overall = mean(&values);
    if overall == 0.0 {
        return factors;
    }

    let mut sums = [0.0; MONTHS_PER_YEAR];
    let mut counts = [0usize; MONTHS_PER_YEAR];
    for record in history {
        let idx = record.month.calendar_index();
        sums[idx] += field.read(record);
        counts[idx] += 1;
    }
    for idx in 0..MONTHS_PER_YEAR {
        if counts[idx] > 0 {
            factors[idx] = (sums[idx] / counts[idx] as f64) / overall;
        }
    }
    factors
}

/// Divides each value by its calendar month's factor. Non-positive factors pass the
/// raw value through.
pub fn remove_seasonality(
    history: &[MonthlyRecord],
    field: RecordField,
    factors: &[f64; MONTHS_PER_YEAR],
) -> Vec<f64> {
    history
        .iter()
        .map(|record| {
            let value = field.read(record);
            let factor = factors[record.month.calendar_index()];
            if factor > 0.0 {
                value / factor
            } else {
                value
            }
        })
        .collect()
}

/// Spread of the factors around their mean (population standard deviation).
pub fn seasonal_strength(factors: &[f64; MONTHS_PER_YEAR]) -> f64 {
    population_std_dev(factors)
}
