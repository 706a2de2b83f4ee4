pub mod json_backend;

use crate::{domain::Transaction, errors::Result};

/// Persistence for a set of booked transactions.
pub trait TransactionStore: Send + Sync {
    fn load(&self) -> Result<Vec<Transaction>>;
    fn save(&self, transactions: &[Transaction]) -> Result<()>;
}

pub use json_backend::{JsonTransactionStore, TransactionSnapshot, SNAPSHOT_SCHEMA_VERSION};
