#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use forecast_core::{
    core::FixedClock,
    domain::{Transaction, YearMonth},
    history::InMemoryHistory,
    storage::{JsonTransactionStore, TransactionStore},
};
use once_cell::sync::Lazy;
use tempfile::TempDir;
use uuid::Uuid;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Shared by fixtures that only need some user other than the one under test.
pub static OTHER_USER: Lazy<Uuid> = Lazy::new(Uuid::new_v4);

pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn ym(year: i32, month: u32) -> YearMonth {
    YearMonth::new(year, month).expect("valid month")
}

pub fn day(month: YearMonth, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(month.year(), month.month(), day).expect("valid date")
}

/// Clock pinned to the end of the given month.
pub fn clock_at(year: i32, month: u32) -> FixedClock {
    FixedClock::at_month_end(ym(year, month)).expect("valid clock month")
}

/// One recurring salary on the 1st and a one-off expense on the 15th per month,
/// starting at `start`. Zero amounts are skipped.
pub fn monthly_transactions(
    user: Uuid,
    start: YearMonth,
    values: &[(f64, f64)],
) -> Vec<Transaction> {
    let mut transactions = Vec::new();
    for (offset, &(income, expenses)) in values.iter().enumerate() {
        let month = start.add_months(offset as i32);
        if income > 0.0 {
            transactions.push(Transaction::income(user, day(month, 1), income).recurring());
        }
        if expenses > 0.0 {
            transactions.push(
                Transaction::expense(user, day(month, 15), expenses).with_category("living"),
            );
        }
    }
    transactions
}

pub fn history_for(user: Uuid, start: YearMonth, values: &[(f64, f64)]) -> InMemoryHistory {
    InMemoryHistory::new(monthly_transactions(user, start, values))
}

/// Writes `transactions` to a fresh snapshot file and returns its path.
pub fn write_store(transactions: &[Transaction]) -> PathBuf {
    let path = temp_base().join("transactions.json");
    JsonTransactionStore::open(&path)
        .and_then(|store| store.save(transactions))
        .expect("write transaction snapshot");
    path
}
