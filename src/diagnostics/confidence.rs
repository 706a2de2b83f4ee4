use serde::{Deserialize, Serialize};

use crate::{
    analysis::{coefficient_of_variation, mean, volatility},
    domain::{MonthlyRecord, RecordField, RecordSeries},
};

use super::Rating;

/// Months of history that earn a full quantity score.
const FULL_HISTORY_MONTHS: f64 = 24.0;
const OUTLIER_SIGMAS: f64 = 3.0;

/// How far the underlying history can be trusted, each score on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceMetrics {
    pub months_of_history: usize,
    pub quantity_score: f64,
    pub quality_score: f64,
    pub consistency_score: f64,
    pub overall_score: f64,
    pub level: Rating,
}

pub fn confidence_metrics(history: &[MonthlyRecord]) -> ConfidenceMetrics {
    let months = history.len();
    let income = history.column(RecordField::Income);
    let expenses = history.column(RecordField::Expenses);

    let quantity_score = (months as f64 / FULL_HISTORY_MONTHS * 100.0).min(100.0);

    let (zero_share, outlier_share) = if months == 0 {
        (0.0, 0.0)
    } else {
        let zero_months = history.iter().filter(|r| r.is_empty()).count();
        let income_outlier = outlier_test(&income);
        let expense_outlier = outlier_test(&expenses);
        let outlier_months = history
            .iter()
            .filter(|r| income_outlier(r.income) || expense_outlier(r.expenses))
            .count();
        (
            zero_months as f64 / months as f64,
            outlier_months as f64 / months as f64,
        )
    };
    let quality_score = (100.0 - zero_share * 50.0 - outlier_share * 30.0).max(0.0);

    let average_cv =
        (coefficient_of_variation(&income) + coefficient_of_variation(&expenses)) / 2.0;
    let consistency_score = (100.0 - average_cv * 200.0).max(0.0);

    let overall_score = (quantity_score + quality_score + consistency_score) / 3.0;
    let level = if overall_score >= 80.0 {
        Rating::High
    } else if overall_score >= 60.0 {
        Rating::Medium
    } else {
        Rating::Low
    };

    ConfidenceMetrics {
        months_of_history: months,
        quantity_score,
        quality_score,
        consistency_score,
        overall_score,
        level,
    }
}

/// Predicate flagging values more than three sample deviations from the mean.
fn outlier_test(values: &[f64]) -> impl Fn(f64) -> bool {
    let avg = mean(values);
    let limit = volatility(values) * OUTLIER_SIGMAS;
    move |value| limit > 0.0 && (value - avg).abs() > limit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::test_support::*;

    #[test]
    fn long_steady_history_is_high_confidence() {
        let metrics = confidence_metrics(&flat(24, 3000.0, 2000.0));
        assert_eq!(metrics.quantity_score, 100.0);
        assert_eq!(metrics.quality_score, 100.0);
        assert_eq!(metrics.consistency_score, 100.0);
        assert_eq!(metrics.level, Rating::High);
    }

    #[test]
    fn quantity_scales_with_months() {
        let metrics = confidence_metrics(&flat(6, 3000.0, 2000.0));
        assert!((metrics.quantity_score - 25.0).abs() < 1e-9);
        assert!((metrics.overall_score - 75.0).abs() < 1e-9);
        assert_eq!(metrics.level, Rating::Medium);
    }

    #[test]
    fn empty_months_reduce_quality() {
        let mut values = vec![(1000.0, 800.0); 8];
        values[2] = (0.0, 0.0);
        values[5] = (0.0, 0.0);
        let metrics = confidence_metrics(&history(&values));
        assert!((metrics.quality_score - (100.0 - 0.25 * 50.0)).abs() < 1e-9);
    }

    #[test]
    fn extreme_month_counts_as_outlier() {
        let mut values = vec![(1000.0, 800.0); 20];
        values[10] = (1000.0, 20000.0);
        let metrics = confidence_metrics(&history(&values));
        assert!((metrics.quality_score - (100.0 - 30.0 / 20.0)).abs() < 1e-9);
    }

    #[test]
    fn empty_history_scores_no_quantity() {
        let metrics = confidence_metrics(&[]);
        assert_eq!(metrics.months_of_history, 0);
        assert_eq!(metrics.quantity_score, 0.0);
        assert_ne!(metrics.level, Rating::High);
    }
}
