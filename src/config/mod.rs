//! Tunable constants of the forecasting pipeline and their on-disk home.

use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{app_data_dir, config_file_in, ensure_dir, write_atomic},
    domain::ForecastMethod,
    errors::{ForecastError, Result},
};

/// Upper bound for projection horizons and lookback windows (100 years).
pub const MAX_WINDOW_MONTHS: u32 = 1200;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ForecastConfig {
    /// Months projected when the caller does not ask for a specific horizon.
    pub default_horizon: usize,
    pub ensemble: EnsembleWeights,
    pub smoothing: SmoothingParams,
    pub lookback: LookbackWindows,
    pub trend: TrendThresholds,
    pub risk: RiskThresholds,
    pub savings: SavingsTargets,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            default_horizon: 12,
            ensemble: EnsembleWeights::default(),
            smoothing: SmoothingParams::default(),
            lookback: LookbackWindows::default(),
            trend: TrendThresholds::default(),
            risk: RiskThresholds::default(),
            savings: SavingsTargets::default(),
        }
    }
}

impl ForecastConfig {
    /// Rejects values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(ForecastError::Config(message));

        if self.default_horizon == 0 || self.default_horizon > MAX_WINDOW_MONTHS as usize {
            return invalid(format!(
                "default_horizon must be within 1..={MAX_WINDOW_MONTHS}, got {}",
                self.default_horizon
            ));
        }
        for (name, months) in [
            ("projection_months", self.lookback.projection_months),
            ("trends_months", self.lookback.trends_months),
            ("savings_months", self.lookback.savings_months),
        ] {
            if months > MAX_WINDOW_MONTHS {
                return invalid(format!(
                    "lookback {name} cannot exceed {MAX_WINDOW_MONTHS} months, got {months}"
                ));
            }
        }
        let weights = self.ensemble.as_slice();
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return invalid("ensemble weights must be non-negative".into());
        }
        if weights.iter().sum::<f64>() <= 0.0 {
            return invalid("at least one ensemble weight must be positive".into());
        }
        for (name, value) in [
            ("alpha", self.smoothing.alpha),
            ("beta", self.smoothing.beta),
            ("gamma", self.smoothing.gamma),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return invalid(format!("smoothing {name} must be within (0, 1), got {value}"));
            }
        }
        if self.smoothing.season_length == 0 {
            return invalid("season_length must be at least 1".into());
        }
        if self.trend.moderate_slope > self.trend.strong_slope {
            return invalid("moderate_slope cannot exceed strong_slope".into());
        }
        if self.risk.low_volatility > self.risk.high_volatility {
            return invalid("low_volatility cannot exceed high_volatility".into());
        }
        Ok(())
    }
}

/// Relative influence of each method in the ensemble blend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnsembleWeights {
    pub linear: f64,
    pub seasonal: f64,
    pub exponential: f64,
    pub moving_average: f64,
}

impl Default for EnsembleWeights {
    fn default() -> Self {
        Self {
            linear: 0.25,
            seasonal: 0.35,
            exponential: 0.25,
            moving_average: 0.15,
        }
    }
}

impl EnsembleWeights {
    pub fn weight_for(&self, method: ForecastMethod) -> f64 {
        match method {
            ForecastMethod::Linear => self.linear,
            ForecastMethod::Seasonal => self.seasonal,
            ForecastMethod::Exponential => self.exponential,
            ForecastMethod::MovingAverage => self.moving_average,
            ForecastMethod::Ensemble | ForecastMethod::Basic => 0.0,
        }
    }

    fn as_slice(&self) -> [f64; 4] {
        [self.linear, self.seasonal, self.exponential, self.moving_average]
    }
}

/// Holt-Winters smoothing constants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SmoothingParams {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub season_length: usize,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            beta: 0.1,
            gamma: 0.1,
            season_length: 12,
        }
    }
}

/// How many months of history each report pulls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LookbackWindows {
    pub projection_months: u32,
    pub trends_months: u32,
    pub savings_months: u32,
}

impl Default for LookbackWindows {
    fn default() -> Self {
        Self {
            projection_months: 18,
            trends_months: 24,
            savings_months: 12,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrendThresholds {
    pub strong_slope: f64,
    pub moderate_slope: f64,
    /// Slopes with a smaller magnitude are reported as stable.
    pub stable_epsilon: f64,
}

impl Default for TrendThresholds {
    fn default() -> Self {
        Self {
            strong_slope: 100.0,
            moderate_slope: 20.0,
            stable_epsilon: 1e-6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiskThresholds {
    pub low_volatility: f64,
    pub high_volatility: f64,
    /// Average projected monthly savings below this trigger a mitigation.
    pub savings_floor: f64,
    pub income_volatility_limit: f64,
    pub expense_volatility_limit: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low_volatility: 500.0,
            high_volatility: 1000.0,
            savings_floor: 500.0,
            income_volatility_limit: 800.0,
            expense_volatility_limit: 600.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SavingsTargets {
    pub milestones: Vec<f64>,
    pub emergency_fund_months: u32,
}

impl Default for SavingsTargets {
    fn default() -> Self {
        Self {
            milestones: vec![1_000.0, 5_000.0, 10_000.0, 25_000.0, 50_000.0],
            emergency_fund_months: 6,
        }
    }
}

/// Loads and persists [`ForecastConfig`] as JSON under the application directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    /// Reads the stored configuration, falling back to defaults when none exists.
    pub fn load(&self) -> Result<ForecastConfig> {
        if !self.path.exists() {
            return Ok(ForecastConfig::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: ForecastConfig = serde_json::from_str(&data)
            .map_err(|err| ForecastError::Config(format!("{}: {err}", self.path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &ForecastConfig) -> Result<()> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
