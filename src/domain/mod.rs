//! Request-scoped data model shared by the aggregator, the forecasting methods and
//! the diagnostics.

pub mod forecast;
pub mod month;
pub mod record;
pub mod transaction;

pub use forecast::{EnrichedForecastPoint, ForecastMethod, ForecastPoint};
pub use month::{YearMonth, MONTH_NAMES};
pub use record::{trim_leading_inactive, MonthlyRecord, RecordField, RecordSeries};
pub use transaction::{Transaction, TransactionKind};
