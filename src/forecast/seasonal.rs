use crate::{
    analysis::{compound_growth_rate, mean, remove_seasonality, SeasonalFactors},
    domain::{
        ForecastMethod, ForecastPoint, MonthlyRecord, RecordField, RecordSeries, TransactionKind,
    },
};

use super::{future_months, Forecaster};

/// Deseasonalized mean grown at the historical compound rate, then re-seasonalized
/// for each target month.
#[derive(Debug, Clone, Copy, Default)]
pub struct SeasonalProjection;

struct SeasonalSeries {
    baseline: f64,
    growth_rate: f64,
}

impl SeasonalSeries {
    fn fit(history: &[MonthlyRecord], kind: TransactionKind, factors: &SeasonalFactors) -> Self {
        let field = RecordField::from(kind);
        let adjusted = remove_seasonality(history, field, factors.series(kind));
        Self {
            baseline: mean(&adjusted),
            growth_rate: compound_growth_rate(&history.column(field)),
        }
    }

    fn trended(&self, step: usize) -> f64 {
        self.baseline * (1.0 + self.growth_rate).powi(step as i32)
    }
}

impl Forecaster for SeasonalProjection {
    fn method(&self) -> ForecastMethod {
        ForecastMethod::Seasonal
    }

    fn forecast(&self, history: &[MonthlyRecord], horizon: usize) -> Vec<ForecastPoint> {
        let factors = SeasonalFactors::from_history(history);
        let income = SeasonalSeries::fit(history, TransactionKind::Income, &factors);
        let expenses = SeasonalSeries::fit(history, TransactionKind::Expense, &factors);

        future_months(history, horizon)
            .map(|(step, month)| {
                ForecastPoint::new(
                    month,
                    income.trended(step) * factors.factor(TransactionKind::Income, month),
                    expenses.trended(step) * factors.factor(TransactionKind::Expense, month),
                    self.method(),
                )
            })
            .collect()
    }
}
