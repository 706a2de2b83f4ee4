use serde::{Deserialize, Serialize};

use super::{month::YearMonth, transaction::TransactionKind};

/// Aggregated cash flow for one calendar month of history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyRecord {
    pub month: YearMonth,
    pub income: f64,
    pub expenses: f64,
    pub savings: f64,
    /// Percentage of income kept as savings; zero when there was no income.
    pub savings_rate: f64,
    pub recurring_income: f64,
    pub recurring_expenses: f64,
    pub non_recurring_income: f64,
    pub non_recurring_expenses: f64,
}

impl MonthlyRecord {
    pub fn new(
        month: YearMonth,
        income: f64,
        expenses: f64,
        recurring_income: f64,
        recurring_expenses: f64,
    ) -> Self {
        let savings = income - expenses;
        let savings_rate = if income > 0.0 {
            savings / income * 100.0
        } else {
            0.0
        };
        Self {
            month,
            income,
            expenses,
            savings,
            savings_rate,
            recurring_income,
            recurring_expenses,
            non_recurring_income: income - recurring_income,
            non_recurring_expenses: expenses - recurring_expenses,
        }
    }

    /// Convenience constructor for histories without a recurring split.
    pub fn totals(month: YearMonth, income: f64, expenses: f64) -> Self {
        Self::new(month, income, expenses, 0.0, 0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.income == 0.0 && self.expenses == 0.0
    }
}

/// Column accessors over a month series, used by every analysis that works on
/// plain numeric vectors.
pub trait RecordSeries {
    fn column(&self, field: RecordField) -> Vec<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Income,
    Expenses,
    Savings,
    SavingsRate,
    RecurringIncome,
    RecurringExpenses,
}

impl RecordField {
    pub fn read(self, record: &MonthlyRecord) -> f64 {
        match self {
            RecordField::Income => record.income,
            RecordField::Expenses => record.expenses,
            RecordField::Savings => record.savings,
            RecordField::SavingsRate => record.savings_rate,
            RecordField::RecurringIncome => record.recurring_income,
            RecordField::RecurringExpenses => record.recurring_expenses,
        }
    }
}

impl From<TransactionKind> for RecordField {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Income => RecordField::Income,
            TransactionKind::Expense => RecordField::Expenses,
        }
    }
}

impl RecordSeries for [MonthlyRecord] {
    fn column(&self, field: RecordField) -> Vec<f64> {
        self.iter().map(|record| field.read(record)).collect()
    }
}

/// Drops months before the first one with any activity. The remaining records are the
/// user's effective history.
pub fn trim_leading_inactive(records: &[MonthlyRecord]) -> &[MonthlyRecord] {
    match records.iter().position(|record| !record.is_empty()) {
        Some(first) => &records[first..],
        None => &[],
    }
}
