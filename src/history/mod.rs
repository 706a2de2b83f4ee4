//! Access to a user's booked transactions, reduced to monthly aggregates.

pub mod aggregator;
pub mod memory;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    domain::{TransactionKind, YearMonth},
    errors::Result,
};

pub use aggregator::MonthlyAggregator;
pub use memory::InMemoryHistory;

/// Per-month sums keyed chronologically. Months without activity may be absent.
pub type MonthlyTotals = BTreeMap<YearMonth, f64>;

/// Source of historical cash flow. Implementations must scope every query to
/// `user_id` and treat `start`/`end` as inclusive dates.
pub trait TransactionHistoryProvider: Send + Sync {
    fn sum_by_month(
        &self,
        user_id: Uuid,
        kind: TransactionKind,
        start: NaiveDate,
        end: NaiveDate,
        only_recurring: bool,
    ) -> Result<MonthlyTotals>;
}
