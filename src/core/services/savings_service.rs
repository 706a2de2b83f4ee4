use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{
    analysis::{linear_slope, mean},
    config::{SavingsTargets, MAX_WINDOW_MONTHS},
    diagnostics::Analysis,
    domain::{MonthlyRecord, RecordField, RecordSeries, YearMonth},
};

use super::{ForecastContext, ServiceResult};

pub const MIN_SAVINGS_MONTHS: usize = 3;
const PROJECTION_CHECKPOINTS: [u32; 3] = [3, 6, 12];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsProjection {
    pub months_ahead: u32,
    pub monthly_savings: f64,
    pub cumulative_savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsMilestone {
    pub target: f64,
    pub reached: bool,
    /// `None` when the current pace never gets there.
    pub months_to_reach: Option<u32>,
    pub eta: Option<YearMonth>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyFundPlan {
    pub target: f64,
    pub current: f64,
    pub progress_percent: f64,
    pub months_to_target: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsPredictions {
    pub average_monthly_savings: f64,
    pub average_savings_rate: f64,
    /// Change in monthly savings per month over the window.
    pub savings_trend: f64,
    /// Net savings accumulated over the window, floored at zero.
    pub current_savings: f64,
    pub projections: Vec<SavingsProjection>,
    pub milestones: Vec<SavingsMilestone>,
    pub emergency_fund: EmergencyFundPlan,
}

impl SavingsPredictions {
    /// `reference` anchors milestone ETAs.
    pub fn from_history(
        history: &[MonthlyRecord],
        reference: YearMonth,
        targets: &SavingsTargets,
    ) -> Self {
        let savings = history.column(RecordField::Savings);
        let average = mean(&savings);
        let slope = linear_slope(&savings);
        let current = savings.iter().sum::<f64>().max(0.0);

        let projections = PROJECTION_CHECKPOINTS
            .iter()
            .map(|&months| {
                let k = f64::from(months);
                SavingsProjection {
                    months_ahead: months,
                    monthly_savings: average + slope * k,
                    cumulative_savings: average * k + slope * k * (k + 1.0) / 2.0,
                }
            })
            .collect();

        let milestones = targets
            .milestones
            .iter()
            .map(|&target| {
                let months_to_reach = months_to_reach(target, current, average);
                SavingsMilestone {
                    target,
                    reached: current >= target,
                    months_to_reach,
                    eta: months_to_reach
                        .and_then(|months| i32::try_from(months).ok())
                        .map(|months| reference.add_months(months)),
                }
            })
            .collect();

        let fund_target =
            mean(&history.column(RecordField::Expenses)) * f64::from(targets.emergency_fund_months);
        let emergency_fund = EmergencyFundPlan {
            target: fund_target,
            current,
            progress_percent: if fund_target > 0.0 {
                (current / fund_target * 100.0).min(100.0)
            } else {
                100.0
            },
            months_to_target: months_to_reach(fund_target, current, average),
        };

        Self {
            average_monthly_savings: average,
            average_savings_rate: mean(&history.column(RecordField::SavingsRate)),
            savings_trend: slope,
            current_savings: current,
            projections,
            milestones,
            emergency_fund,
        }
    }
}

/// Whole months needed to grow `current` to `target` at `pace` per month. `None` when
/// the pace never gets there within [`MAX_WINDOW_MONTHS`].
fn months_to_reach(target: f64, current: f64, pace: f64) -> Option<u32> {
    if current >= target {
        return Some(0);
    }
    if pace <= 0.0 {
        return None;
    }
    let months = ((target - current) / pace).ceil();
    if !months.is_finite() || months > f64::from(MAX_WINDOW_MONTHS) {
        return None;
    }
    Some(months as u32)
}

pub struct SavingsService;

impl SavingsService {
    pub fn predictions(
        ctx: &ForecastContext<'_>,
        user_id: Uuid,
    ) -> ServiceResult<Analysis<SavingsPredictions>> {
        let history = ctx.history(user_id, ctx.config.lookback.savings_months)?;
        debug!(user = %user_id, months = history.len(), "building savings predictions");
        let reference = ctx.reference_month();
        Ok(Analysis::require(MIN_SAVINGS_MONTHS, history.len(), || {
            SavingsPredictions::from_history(&history, reference, &ctx.config.savings)
        }))
    }
}
