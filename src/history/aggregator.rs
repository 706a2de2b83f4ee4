use tracing::debug;
use uuid::Uuid;

use crate::{
    domain::{MonthlyRecord, TransactionKind, YearMonth},
    errors::{ForecastError, Result},
};

use super::{MonthlyTotals, TransactionHistoryProvider};

/// Turns provider aggregates into a gap-free monthly series.
pub struct MonthlyAggregator<'a> {
    provider: &'a dyn TransactionHistoryProvider,
}

impl<'a> MonthlyAggregator<'a> {
    pub fn new(provider: &'a dyn TransactionHistoryProvider) -> Self {
        Self { provider }
    }

    /// One record per month in `[start, end]`, zero-filled where nothing was booked.
    /// Provider failures propagate unchanged.
    pub fn build(
        &self,
        user_id: Uuid,
        start: YearMonth,
        end: YearMonth,
    ) -> Result<Vec<MonthlyRecord>> {
        let window_error =
            || ForecastError::InvalidInput(format!("cannot resolve dates for {start}..{end}"));
        let start_date = start.first_day().ok_or_else(window_error)?;
        let end_date = end.last_day().ok_or_else(window_error)?;

        let fetch = |kind: TransactionKind, only_recurring: bool| -> Result<MonthlyTotals> {
            self.provider
                .sum_by_month(user_id, kind, start_date, end_date, only_recurring)
        };
        let income = fetch(TransactionKind::Income, false)?;
        let expenses = fetch(TransactionKind::Expense, false)?;
        let recurring_income = fetch(TransactionKind::Income, true)?;
        let recurring_expenses = fetch(TransactionKind::Expense, true)?;

        let lookup =
            |totals: &MonthlyTotals, month: &YearMonth| totals.get(month).copied().unwrap_or(0.0);
        let records: Vec<MonthlyRecord> = YearMonth::range_inclusive(start, end)
            .map(|month| {
                MonthlyRecord::new(
                    month,
                    lookup(&income, &month),
                    lookup(&expenses, &month),
                    lookup(&recurring_income, &month),
                    lookup(&recurring_expenses, &month),
                )
            })
            .collect();

        debug!(
            user = %user_id,
            %start,
            %end,
            months = records.len(),
            "aggregated monthly history"
        );
        Ok(records)
    }

    /// The `months` most recent months ending with `reference`, inclusive.
    pub fn lookback(
        &self,
        user_id: Uuid,
        reference: YearMonth,
        months: u32,
    ) -> Result<Vec<MonthlyRecord>> {
        if months == 0 {
            return Ok(Vec::new());
        }
        let span = i32::try_from(months - 1).map_err(|_| {
            ForecastError::InvalidInput(format!("lookback of {months} months is out of range"))
        })?;
        let start = reference.add_months(-span);
        self.build(user_id, start, reference)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::Transaction;
    use crate::history::InMemoryHistory;

    struct OfflineStore;

    impl TransactionHistoryProvider for OfflineStore {
        fn sum_by_month(
            &self,
            _user_id: Uuid,
            _kind: TransactionKind,
            _start: NaiveDate,
            _end: NaiveDate,
            _only_recurring: bool,
        ) -> Result<MonthlyTotals> {
            Err(ForecastError::DataFetch("store offline".into()))
        }
    }

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn empty_store_yields_zeroed_months() {
        let store = InMemoryHistory::default();
        let records = MonthlyAggregator::new(&store)
            .build(Uuid::new_v4(), ym(2023, 11), ym(2024, 4))
            .unwrap();
        assert_eq!(records.len(), 6);
        assert!(records.iter().all(MonthlyRecord::is_empty));
        for pair in records.windows(2) {
            assert_eq!(pair[0].month.succ(), pair[1].month);
        }
    }

    #[test]
    fn fills_gaps_and_splits_recurring() {
        let user = Uuid::new_v4();
        let store = InMemoryHistory::new(vec![
            Transaction::income(user, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 3000.0)
                .recurring(),
            Transaction::income(user, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), 500.0),
            Transaction::expense(user, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(), 800.0)
                .recurring(),
        ]);
        let records = MonthlyAggregator::new(&store)
            .build(user, ym(2024, 1), ym(2024, 3))
            .unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].income, 3500.0);
        assert_eq!(records[0].recurring_income, 3000.0);
        assert_eq!(records[0].non_recurring_income, 500.0);
        assert!(records[1].is_empty());
        assert_eq!(records[2].recurring_expenses, 800.0);
        assert_eq!(records[2].savings, -800.0);
    }

    #[test]
    fn lookback_ends_at_reference_month() {
        let store = InMemoryHistory::default();
        let records = MonthlyAggregator::new(&store)
            .lookback(Uuid::new_v4(), ym(2024, 6), 18)
            .unwrap();
        assert_eq!(records.len(), 18);
        assert_eq!(records[0].month, ym(2023, 1));
        assert_eq!(records[17].month, ym(2024, 6));
    }

    #[test]
    fn oversized_lookback_is_rejected() {
        let store = InMemoryHistory::default();
        let err = MonthlyAggregator::new(&store)
            .lookback(Uuid::new_v4(), ym(2024, 6), u32::MAX)
            .unwrap_err();
        assert!(matches!(err, ForecastError::InvalidInput(_)));
    }

    #[test]
    fn provider_failures_propagate() {
        let err = MonthlyAggregator::new(&OfflineStore)
            .build(Uuid::new_v4(), ym(2024, 1), ym(2024, 2))
            .unwrap_err();
        assert!(matches!(err, ForecastError::DataFetch(_)));
    }
}
