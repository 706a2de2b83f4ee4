use serde::{Deserialize, Serialize};

use crate::{
    domain::{MonthlyRecord, RecordField, RecordSeries},
    forecast::{Forecaster, LinearProjection},
};

use super::{Analysis, Rating};

pub const MIN_BACKTEST_MONTHS: usize = 8;
const TRAIN_SHARE: f64 = 0.75;

/// Out-of-sample accuracy of the linear method on the latest quarter of the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastAccuracy {
    pub income_accuracy: f64,
    pub expense_accuracy: f64,
    pub overall_accuracy: f64,
    pub reliability: Rating,
    pub train_months: usize,
    pub test_months: usize,
}

/// Trains on the first 75% of `history` and scores the projection of the rest.
pub fn forecast_accuracy(history: &[MonthlyRecord]) -> Analysis<ForecastAccuracy> {
    Analysis::require(MIN_BACKTEST_MONTHS, history.len(), || backtest(history))
}

fn backtest(history: &[MonthlyRecord]) -> ForecastAccuracy {
    let train_months = (history.len() as f64 * TRAIN_SHARE).floor() as usize;
    let (train, test) = history.split_at(train_months);
    let predicted = LinearProjection.forecast(train, test.len());

    let predicted_income: Vec<f64> = predicted.iter().map(|p| p.income).collect();
    let predicted_expenses: Vec<f64> = predicted.iter().map(|p| p.expenses).collect();
    let income_accuracy = accuracy_from_error(mean_absolute_percentage_error(
        &predicted_income,
        &test.column(RecordField::Income),
    ));
    let expense_accuracy = accuracy_from_error(mean_absolute_percentage_error(
        &predicted_expenses,
        &test.column(RecordField::Expenses),
    ));
    let overall_accuracy = (income_accuracy + expense_accuracy) / 2.0;

    ForecastAccuracy {
        income_accuracy,
        expense_accuracy,
        overall_accuracy,
        reliability: reliability(overall_accuracy),
        train_months,
        test_months: test.len(),
    }
}

/// Mean of `|predicted - actual| / actual`; months with a zero actual contribute 0.
pub fn mean_absolute_percentage_error(predicted: &[f64], actual: &[f64]) -> f64 {
    let errors: Vec<f64> = predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| if *a == 0.0 { 0.0 } else { ((p - a) / a).abs() })
        .collect();
    crate::analysis::mean(&errors)
}

fn accuracy_from_error(error: f64) -> f64 {
    ((1.0 - error) * 100.0).clamp(0.0, 100.0)
}

fn reliability(accuracy: f64) -> Rating {
    if accuracy > 70.0 {
        Rating::High
    } else if accuracy > 50.0 {
        Rating::Medium
    } else {
        Rating::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::test_support::*;

    #[test]
    fn short_history_is_insufficient() {
        let result = forecast_accuracy(&flat(7, 1000.0, 800.0));
        assert_eq!(
            result,
            Analysis::InsufficientData {
                required_months: 8,
                available_months: 7
            }
        );
    }

    #[test]
    fn perfect_linear_history_scores_full_marks() {
        let records = history(
            &(0..12)
                .map(|i| (2000.0 + 100.0 * i as f64, 1000.0))
                .collect::<Vec<_>>(),
        );
        let accuracy = forecast_accuracy(&records);
        let result = accuracy.available().unwrap();
        assert_eq!(result.train_months, 9);
        assert_eq!(result.test_months, 3);
        // Baseline of the last three train months trails the line by one slope.
        assert!(result.income_accuracy > 90.0, "{}", result.income_accuracy);
        assert!((result.expense_accuracy - 100.0).abs() < 1e-9);
        assert_eq!(result.reliability, Rating::High);
    }

    #[test]
    fn accuracy_stays_within_bounds_for_erratic_history() {
        let values: Vec<(f64, f64)> = (0..16)
            .map(|i| if i % 2 == 0 { (100.0, 50.0) } else { (9000.0, 7000.0) })
            .collect();
        let accuracy = forecast_accuracy(&history(&values));
        let result = accuracy.available().unwrap();
        assert!((0.0..=100.0).contains(&result.overall_accuracy));
    }

    #[test]
    fn zero_actuals_do_not_penalize() {
        assert_eq!(mean_absolute_percentage_error(&[50.0, 110.0], &[0.0, 100.0]), 0.05);
    }
}
