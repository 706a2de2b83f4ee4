use serde::{Deserialize, Serialize};

use crate::{
    analysis::{SeasonalFactors, MONTHS_PER_YEAR},
    domain::{MonthlyRecord, TransactionKind, MONTH_NAMES},
};

use super::Analysis;

pub const MIN_SEASONALITY_MONTHS: usize = 12;
const RANKED_MONTHS: usize = 3;
const PEAK_FACTOR: f64 = 1.2;
const TROUGH_FACTOR: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthFactor {
    /// Calendar month, 1 = January.
    pub month: u32,
    pub name: String,
    pub factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalityAnalysis {
    pub detected: bool,
    pub income_strength: f64,
    pub expense_strength: f64,
    pub factors: SeasonalFactors,
    pub income_peaks: Vec<MonthFactor>,
    pub income_troughs: Vec<MonthFactor>,
    pub expense_peaks: Vec<MonthFactor>,
    pub expense_troughs: Vec<MonthFactor>,
    pub recommendations: Vec<String>,
}

/// Needs a full year of history.
pub fn analyze_seasonality(history: &[MonthlyRecord]) -> Analysis<SeasonalityAnalysis> {
    Analysis::require(MIN_SEASONALITY_MONTHS, history.len(), || {
        let factors = SeasonalFactors::from_history(history);
        let (income_peaks, income_troughs) = ranked(factors.series(TransactionKind::Income));
        let (expense_peaks, expense_troughs) = ranked(factors.series(TransactionKind::Expense));
        let recommendations =
            recommendations(&income_peaks, &income_troughs, &expense_peaks, &expense_troughs);
        SeasonalityAnalysis {
            detected: factors.is_seasonal(),
            income_strength: factors.strength(TransactionKind::Income),
            expense_strength: factors.strength(TransactionKind::Expense),
            factors,
            income_peaks,
            income_troughs,
            expense_peaks,
            expense_troughs,
            recommendations,
        }
    })
}

/// Top and bottom months by factor, highest and lowest first respectively.
fn ranked(factors: &[f64; MONTHS_PER_YEAR]) -> (Vec<MonthFactor>, Vec<MonthFactor>) {
    let mut order: Vec<usize> = (0..MONTHS_PER_YEAR).collect();
    order.sort_by(|a, b| factors[*b].total_cmp(&factors[*a]));
    let describe = |idx: usize| MonthFactor {
        month: idx as u32 + 1,
        name: MONTH_NAMES[idx].to_string(),
        factor: factors[idx],
    };
    let peaks = order.iter().take(RANKED_MONTHS).map(|&idx| describe(idx)).collect();
    let troughs = order
        .iter()
        .rev()
        .take(RANKED_MONTHS)
        .map(|&idx| describe(idx))
        .collect();
    (peaks, troughs)
}

fn recommendations(
    income_peaks: &[MonthFactor],
    income_troughs: &[MonthFactor],
    expense_peaks: &[MonthFactor],
    expense_troughs: &[MonthFactor],
) -> Vec<String> {
    let mut advice = Vec::new();
    if let Some(peak) = expense_peaks.first().filter(|m| m.factor > PEAK_FACTOR) {
        advice.push(format!(
            "Expenses peak in {} at {:.0}% of a typical month; set money aside in the months before.",
            peak.name,
            peak.factor * 100.0
        ));
    }
    if let Some(trough) = income_troughs.first().filter(|m| m.factor < TROUGH_FACTOR) {
        advice.push(format!(
            "Income drops to {:.0}% of a typical month in {}; keep a buffer to cover the gap.",
            trough.factor * 100.0,
            trough.name
        ));
    }
    if let Some(peak) = income_peaks.first().filter(|m| m.factor > PEAK_FACTOR) {
        advice.push(format!(
            "Income is highest in {}; route the surplus into savings.",
            peak.name
        ));
    }
    if let Some(trough) = expense_troughs.first().filter(|m| m.factor < TROUGH_FACTOR) {
        advice.push(format!(
            "Spending is lowest in {}; a good month to raise savings contributions.",
            trough.name
        ));
    }
    if advice.is_empty() {
        advice.push("No strong seasonal swings; a level monthly budget fits this history.".into());
    }
    advice
}

/// False when the analysis could not run.
pub fn is_detected(analysis: &Analysis<SeasonalityAnalysis>) -> bool {
    analysis.available().map_or(false, |a| a.detected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::test_support::*;

    #[test]
    fn requires_a_full_year() {
        assert!(!analyze_seasonality(&flat(11, 100.0, 100.0)).is_available());
    }

    #[test]
    fn uniform_history_is_not_seasonal() {
        let analysis = analyze_seasonality(&flat(18, 3000.0, 2000.0));
        let result = analysis.available().unwrap();
        assert!(!result.detected);
        assert_eq!(result.income_strength, 0.0);
        assert_eq!(result.recommendations.len(), 1);
        assert!(!is_detected(&analysis));
    }

    #[test]
    fn holiday_spending_is_detected_and_ranked() {
        let values: Vec<(f64, f64)> = (0..24)
            .map(|i| match i % 12 {
                11 => (3000.0, 3000.0),
                10 => (3000.0, 2000.0),
                6 => (1500.0, 1000.0),
                _ => (3000.0, 1000.0),
            })
            .collect();
        let analysis = analyze_seasonality(&history(&values));
        let result = analysis.available().unwrap();
        assert!(result.detected);
        assert_eq!(result.expense_peaks[0].month, 12);
        assert_eq!(result.expense_peaks[0].name, "December");
        assert_eq!(result.expense_peaks[1].month, 11);
        assert_eq!(result.income_troughs[0].month, 7);
        assert_eq!(result.expense_peaks.len(), 3);
        assert!(result
            .recommendations
            .iter()
            .any(|r| r.contains("December")));
        assert!(result.recommendations.iter().any(|r| r.contains("July")));
    }
}
