mod common;

use chrono::NaiveDate;
use forecast_core::{
    analysis::linear_slope,
    config::ForecastConfig,
    core::services::{ForecastContext, ProjectionMode, ProjectionService, ServiceError},
    diagnostics::TrendDirection,
    domain::{ForecastMethod, RecordField, RecordSeries, TransactionKind},
    errors::{ForecastError, Result},
    forecast::{Forecaster, LinearProjection},
    history::{MonthlyAggregator, MonthlyTotals, TransactionHistoryProvider},
};
use uuid::Uuid;

use common::*;

#[test]
fn flat_history_projects_flat_savings() {
    let user = Uuid::new_v4();
    let store = history_for(user, ym(2023, 1), &[(3000.0, 2000.0); 18]);
    let config = ForecastConfig::default();
    let clock = clock_at(2024, 6);
    let ctx = ForecastContext::new(&store, &config, &clock);

    let report = ProjectionService::generate(&ctx, user, None).unwrap();
    assert_eq!(report.projection_mode, ProjectionMode::Ensemble);
    assert_eq!(report.history_months, 18);
    assert_eq!(report.monthly_projections.len(), 12);
    assert_eq!(report.monthly_projections[0].month(), ym(2024, 7));
    for point in &report.monthly_projections {
        assert!((point.income() - 3000.0).abs() < 1e-6);
        assert!((point.expenses() - 2000.0).abs() < 1e-6);
        assert!((point.savings() - 1000.0).abs() < 1e-6);
        assert!(point.income_lower <= point.income() && point.income() <= point.income_upper);
    }
    assert!(!report.seasonality_analysis.available().unwrap().detected);
    assert!(report.anomalies.is_empty());
    assert!(report.risk_analysis.mitigations.is_empty());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["projection_mode"], "ensemble");
    assert_eq!(json["forecast_accuracy"]["status"], "available");
    assert_eq!(json["monthly_projections"][0]["month"], "2024-07");
}

#[test]
fn ramping_income_follows_linear_trend() {
    let user = Uuid::new_v4();
    let values: Vec<(f64, f64)> = (0..18).map(|i| (1000.0 + 100.0 * i as f64, 500.0)).collect();
    let store = history_for(user, ym(2023, 1), &values);

    let history = MonthlyAggregator::new(&store)
        .build(user, ym(2023, 1), ym(2024, 6))
        .unwrap();
    let incomes = history.column(RecordField::Income);
    assert!((linear_slope(&incomes) - 100.0).abs() < 1e-6);

    let next = &LinearProjection.forecast(&history, 1)[0];
    // mean of 2500, 2600, 2700 plus one month of slope
    assert!((next.income - 2700.0).abs() < 1e-6);
    assert_eq!(next.recurring_income.map(|v| v.round()), Some(2700.0));

    let config = ForecastConfig::default();
    let clock = clock_at(2024, 6);
    let ctx = ForecastContext::new(&store, &config, &clock);
    let report = ProjectionService::generate(&ctx, user, Some(6)).unwrap();
    let trends = report.trend_analysis.available().unwrap();
    assert_eq!(trends.income.trend.direction, TrendDirection::Increasing);
    assert_eq!(trends.expenses.trend.direction, TrendDirection::Stable);
    let accuracy = report.forecast_accuracy.available().unwrap();
    assert!((0.0..=100.0).contains(&accuracy.overall_accuracy));
}

#[test]
fn new_user_gets_basic_projection() {
    let user = Uuid::new_v4();
    // two active months at the end of the window; earlier months are empty
    let store = history_for(user, ym(2024, 5), &[(2000.0, 1500.0), (2200.0, 1700.0)]);
    let config = ForecastConfig::default();
    let clock = clock_at(2024, 6);
    let ctx = ForecastContext::new(&store, &config, &clock);

    let report = ProjectionService::generate(&ctx, user, Some(3)).unwrap();
    assert_eq!(report.projection_mode, ProjectionMode::Basic);
    assert_eq!(report.history_months, 2);
    for point in &report.monthly_projections {
        assert_eq!(point.point.method, ForecastMethod::Basic);
        assert_eq!(point.confidence_level, 0.3);
        assert!((point.income() - 2100.0).abs() < 1e-9);
        assert!((point.income_upper - 2520.0).abs() < 1e-9);
    }
}

#[test]
fn other_users_are_not_counted() {
    let user = Uuid::new_v4();
    let mut store = history_for(user, ym(2023, 1), &[(3000.0, 2000.0); 18]);
    store.extend(monthly_transactions(*OTHER_USER, ym(2023, 1), &[(90_000.0, 10.0); 18]));
    let config = ForecastConfig::default();
    let clock = clock_at(2024, 6);
    let ctx = ForecastContext::new(&store, &config, &clock);

    let report = ProjectionService::generate(&ctx, user, Some(1)).unwrap();
    assert!((report.monthly_projections[0].income() - 3000.0).abs() < 1e-6);
}

#[test]
fn out_of_range_horizons_are_rejected() {
    let user = Uuid::new_v4();
    let store = history_for(user, ym(2024, 1), &[(1.0, 1.0)]);
    let config = ForecastConfig::default();
    let clock = clock_at(2024, 6);
    let ctx = ForecastContext::new(&store, &config, &clock);
    for months in [0, 1201, 4_000_000_000] {
        assert!(matches!(
            ProjectionService::generate(&ctx, user, Some(months)),
            Err(ServiceError::Forecast(ForecastError::InvalidInput(_)))
        ));
    }
    let report = ProjectionService::generate(&ctx, user, Some(1200)).unwrap();
    assert_eq!(report.monthly_projections.len(), 1200);
}

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
        Err(ForecastError::DataFetch("connection refused".into()))
    }
}

#[test]
fn provider_failures_reach_the_caller() {
    let config = ForecastConfig::default();
    let clock = clock_at(2024, 6);
    let ctx = ForecastContext::new(&OfflineStore, &config, &clock);
    let err = ProjectionService::generate(&ctx, Uuid::new_v4(), None).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Forecast(ForecastError::DataFetch(_))
    ));
    assert!(err.to_string().contains("connection refused"));
}
