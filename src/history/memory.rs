use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    domain::{Transaction, TransactionKind, YearMonth},
    errors::Result,
};

use super::{MonthlyTotals, TransactionHistoryProvider};

/// Keeps transactions in memory. Used by tests, benchmarks and the JSON store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistory {
    transactions: Vec<Transaction>,
}

impl InMemoryHistory {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    pub fn push(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }
}

impl Extend<Transaction> for InMemoryHistory {
    fn extend<I: IntoIterator<Item = Transaction>>(&mut self, iter: I) {
        self.transactions.extend(iter);
    }
}

impl TransactionHistoryProvider for InMemoryHistory {
    fn sum_by_month(
        &self,
        user_id: Uuid,
        kind: TransactionKind,
        start: NaiveDate,
        end: NaiveDate,
        only_recurring: bool,
    ) -> Result<MonthlyTotals> {
        let mut totals = MonthlyTotals::new();
        for txn in self.transactions.iter().filter(|txn| {
            txn.user_id == user_id
                && txn.kind == kind
                && txn.date >= start
                && txn.date <= end
                && (!only_recurring || txn.recurring)
        }) {
            *totals.entry(YearMonth::from_date(txn.date)).or_insert(0.0) += txn.amount;
        }
        Ok(totals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sums_are_scoped_to_user_kind_and_window() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let history = InMemoryHistory::new(vec![
            Transaction::income(alice, date(2024, 1, 5), 1000.0).recurring(),
            Transaction::income(alice, date(2024, 1, 20), 250.0),
            Transaction::expense(alice, date(2024, 1, 9), 400.0),
            Transaction::income(bob, date(2024, 1, 5), 9999.0),
            Transaction::income(alice, date(2024, 3, 1), 700.0),
        ]);

        let all = history
            .sum_by_month(
                alice,
                TransactionKind::Income,
                date(2024, 1, 1),
                date(2024, 2, 29),
                false,
            )
            .unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[&YearMonth::new(2024, 1).unwrap()], 1250.0);

        let recurring = history
            .sum_by_month(
                alice,
                TransactionKind::Income,
                date(2024, 1, 1),
                date(2024, 3, 31),
                true,
            )
            .unwrap();
        assert_eq!(recurring.values().sum::<f64>(), 1000.0);
    }
}
