use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    core::utils::write_atomic,
    domain::{Transaction, TransactionKind},
    errors::{ForecastError, Result},
    history::{InMemoryHistory, MonthlyTotals, TransactionHistoryProvider},
};

use super::TransactionStore;

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// On-disk layout of a transaction file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionSnapshot {
    pub schema_version: u32,
    pub saved_at: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
}

/// Files may also hold a bare array of transactions.
#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Snapshot(TransactionSnapshot),
    Bare(Vec<Transaction>),
}

/// Transactions stored in a single JSON file, served from memory once loaded.
pub struct JsonTransactionStore {
    path: PathBuf,
    history: InMemoryHistory,
}

impl JsonTransactionStore {
    /// Opens the file at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let transactions = if path.exists() {
            load_snapshot_from_path(&path)?
        } else {
            Vec::new()
        };
        debug!(path = %path.display(), count = transactions.len(), "opened transaction store");
        Ok(Self {
            path,
            history: InMemoryHistory::new(transactions),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn transactions(&self) -> &[Transaction] {
        self.history.transactions()
    }

    pub fn record(&mut self, transaction: Transaction) {
        self.history.push(transaction);
    }

    /// Writes the in-memory transactions back to the store's file.
    pub fn flush(&self) -> Result<()> {
        self.save(self.history.transactions())
    }
}

impl TransactionStore for JsonTransactionStore {
    fn load(&self) -> Result<Vec<Transaction>> {
        load_snapshot_from_path(&self.path)
    }

    fn save(&self, transactions: &[Transaction]) -> Result<()> {
        save_snapshot_to_path(transactions, &self.path)
    }
}

impl TransactionHistoryProvider for JsonTransactionStore {
    fn sum_by_month(
        &self,
        user_id: Uuid,
        kind: TransactionKind,
        start: NaiveDate,
        end: NaiveDate,
        only_recurring: bool,
    ) -> Result<MonthlyTotals> {
        self.history
            .sum_by_month(user_id, kind, start, end, only_recurring)
    }
}

pub fn load_snapshot_from_path(path: &Path) -> Result<Vec<Transaction>> {
    let data = fs::read_to_string(path).map_err(|err| {
        ForecastError::DataFetch(format!("cannot read `{}`: {err}", path.display()))
    })?;
    match serde_json::from_str::<SnapshotFile>(&data) {
        Ok(SnapshotFile::Snapshot(snapshot)) => {
            if snapshot.schema_version > SNAPSHOT_SCHEMA_VERSION {
                return Err(ForecastError::Storage(format!(
                    "transaction file `{}` is from a newer schema version",
                    path.display()
                )));
            }
            Ok(snapshot.transactions)
        }
        Ok(SnapshotFile::Bare(transactions)) => Ok(transactions),
        Err(err) => Err(ForecastError::DataFetch(format!(
            "`{}` is not a transaction file: {err}",
            path.display()
        ))),
    }
}

pub fn save_snapshot_to_path(transactions: &[Transaction], path: &Path) -> Result<()> {
    let snapshot = TransactionSnapshot {
        schema_version: SNAPSHOT_SCHEMA_VERSION,
        saved_at: Utc::now(),
        transactions: transactions.to_vec(),
    };
    let json = serde_json::to_string_pretty(&snapshot)?;
    write_atomic(path, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    #[test]
    fn flush_then_reopen_serves_same_totals() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("transactions.json");
        let user = Uuid::new_v4();

        let mut store = JsonTransactionStore::open(&path).unwrap();
        assert!(store.transactions().is_empty());
        store.record(Transaction::income(user, date(1, 1), 3000.0).recurring());
        store.record(Transaction::expense(user, date(1, 9), 120.5).with_category("food"));
        store.flush().unwrap();

        let reopened = JsonTransactionStore::open(&path).unwrap();
        assert_eq!(reopened.transactions(), store.transactions());
        let totals = reopened
            .sum_by_month(user, TransactionKind::Expense, date(1, 1), date(1, 31), false)
            .unwrap();
        assert_eq!(totals.values().copied().collect::<Vec<_>>(), vec![120.5]);
    }

    #[test]
    fn accepts_bare_transaction_arrays() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bare.json");
        let user = Uuid::new_v4();
        let rows = vec![Transaction::income(user, date(2, 3), 10.0)];
        fs::write(&path, serde_json::to_string(&rows).unwrap()).unwrap();
        assert_eq!(JsonTransactionStore::open(&path).unwrap().load().unwrap(), rows);
    }

    #[test]
    fn rejects_newer_schema_and_garbage() {
        let temp = TempDir::new().unwrap();
        let newer = temp.path().join("newer.json");
        fs::write(
            &newer,
            r#"{ "schema_version": 99, "saved_at": "2024-01-01T00:00:00Z", "transactions": [] }"#,
        )
        .unwrap();
        assert!(matches!(
            JsonTransactionStore::open(&newer),
            Err(ForecastError::Storage(_))
        ));

        let garbage = temp.path().join("garbage.json");
        fs::write(&garbage, "not json").unwrap();
        assert!(matches!(
            JsonTransactionStore::open(&garbage),
            Err(ForecastError::DataFetch(_))
        ));
    }
}
