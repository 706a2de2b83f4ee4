//! Report-level operations over a user's history. Each service fetches its own
//! lookback window through [`ForecastContext`] and returns a serializable report.

pub mod projection_service;
pub mod savings_service;
pub mod trends_service;

pub use projection_service::{
    ChartBand, ChartData, ChartPoint, ProjectionMode, ProjectionReport, ProjectionService,
    ValueRange, YearlySummary, MIN_ENSEMBLE_MONTHS,
};
pub use savings_service::{
    EmergencyFundPlan, SavingsMilestone, SavingsPredictions, SavingsProjection, SavingsService,
    MIN_SAVINGS_MONTHS,
};
pub use trends_service::{HistoricalTrends, MonthlyAverages, TrendsService, MIN_TREND_MONTHS};

use tracing::warn;
use uuid::Uuid;

use crate::{
    config::ForecastConfig,
    domain::{trim_leading_inactive, MonthlyRecord, YearMonth},
    errors::ForecastError,
    history::{MonthlyAggregator, TransactionHistoryProvider},
};

use super::time::Clock;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Forecast(#[from] ForecastError),
}

/// Collaborators shared by every report: the history source, tuning values and the
/// clock that anchors lookback windows.
pub struct ForecastContext<'a> {
    pub provider: &'a dyn TransactionHistoryProvider,
    pub config: &'a ForecastConfig,
    pub clock: &'a dyn Clock,
}

impl<'a> ForecastContext<'a> {
    pub fn new(
        provider: &'a dyn TransactionHistoryProvider,
        config: &'a ForecastConfig,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            provider,
            config,
            clock,
        }
    }

    pub fn reference_month(&self) -> YearMonth {
        self.clock.current_month()
    }

    /// The user's effective history over the last `months` months: gap-filled, with
    /// leading inactive months dropped.
    pub(crate) fn history(&self, user_id: Uuid, months: u32) -> ServiceResult<Vec<MonthlyRecord>> {
        let window = MonthlyAggregator::new(self.provider)
            .lookback(user_id, self.reference_month(), months)
            .map_err(|err| {
                warn!(user = %user_id, error = %err, "history fetch failed");
                err
            })?;
        Ok(trim_leading_inactive(&window).to_vec())
    }
}
