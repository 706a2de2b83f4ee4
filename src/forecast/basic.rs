use crate::{
    analysis::mean,
    domain::{
        EnrichedForecastPoint, ForecastMethod, ForecastPoint, MonthlyRecord, RecordField,
        RecordSeries, YearMonth,
    },
};

/// Relative width of the fixed band around a basic projection.
const BASIC_BAND: f64 = 0.2;
pub const BASIC_CONFIDENCE: f64 = 0.3;

/// Flat projection at the historical averages, used when the history is too short for
/// the ensemble. Months follow `after`, which lets a user with no history at all still
/// receive a (zero) forecast.
pub fn basic_projections(
    history: &[MonthlyRecord],
    after: YearMonth,
    horizon: usize,
) -> Vec<EnrichedForecastPoint> {
    let income = mean(&history.column(RecordField::Income));
    let expenses = mean(&history.column(RecordField::Expenses));

    (1..=horizon)
        .map(|step| {
            let point = ForecastPoint::new(
                after.add_months(step as i32),
                income,
                expenses,
                ForecastMethod::Basic,
            );
            EnrichedForecastPoint {
                income_lower: point.income * (1.0 - BASIC_BAND),
                income_upper: point.income * (1.0 + BASIC_BAND),
                expenses_lower: point.expenses * (1.0 - BASIC_BAND),
                expenses_upper: point.expenses * (1.0 + BASIC_BAND),
                confidence_level: BASIC_CONFIDENCE,
                volatility_factor: 1.0,
                point,
            }
        })
        .collect()
}
