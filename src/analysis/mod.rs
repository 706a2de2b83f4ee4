pub mod seasonal;
pub mod stats;

pub use seasonal::{
    calendar_factors, remove_seasonality, seasonal_strength, SeasonalFactors,
    DETECTION_THRESHOLD, MONTHS_PER_YEAR,
};
pub use stats::{
    coefficient_of_variation, compound_growth_rate, linear_slope, mean, population_std_dev,
    volatility, z_score,
};
