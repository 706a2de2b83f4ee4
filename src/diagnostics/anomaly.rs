use serde::{Deserialize, Serialize};

use crate::{
    analysis::{mean, volatility, z_score},
    domain::{MonthlyRecord, RecordField, RecordSeries, YearMonth},
};

/// Absolute z-score above which a month is flagged.
pub const ANOMALY_Z_THRESHOLD: f64 = 2.0;
/// Absolute z-score above which a flagged month is rated [`Severity::High`].
pub const HIGH_SEVERITY_Z: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Moderate,
    High,
}

/// A historical month whose income or expenses sit far from the usual level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub month: YearMonth,
    pub income: f64,
    pub expenses: f64,
    pub income_z_score: f64,
    pub expense_z_score: f64,
    pub severity: Severity,
}

pub fn detect_anomalies(history: &[MonthlyRecord]) -> Vec<Anomaly> {
    let incomes = history.column(RecordField::Income);
    let expenses = history.column(RecordField::Expenses);
    let (income_mean, income_std) = (mean(&incomes), volatility(&incomes));
    let (expense_mean, expense_std) = (mean(&expenses), volatility(&expenses));

    history
        .iter()
        .filter_map(|record| {
            let income_z_score = z_score(record.income, income_mean, income_std);
            let expense_z_score = z_score(record.expenses, expense_mean, expense_std);
            let peak = income_z_score.abs().max(expense_z_score.abs());
            if peak <= ANOMALY_Z_THRESHOLD {
                return None;
            }
            Some(Anomaly {
                month: record.month,
                income: record.income,
                expenses: record.expenses,
                income_z_score,
                expense_z_score,
                severity: if peak > HIGH_SEVERITY_Z {
                    Severity::High
                } else {
                    Severity::Moderate
                },
            })
        })
        .collect()
}
