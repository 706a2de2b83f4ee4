use serde::{Deserialize, Serialize};

use crate::{
    analysis::{mean, volatility},
    config::RiskThresholds,
    domain::{EnrichedForecastPoint, MonthlyRecord, RecordField, RecordSeries},
};

use super::Rating;

struct Shock {
    name: &'static str,
    description: &'static str,
    income_multiplier: f64,
    expense_multiplier: f64,
}

const SCENARIOS: [Shock; 4] = [
    Shock {
        name: "income_drop_10",
        description: "Income falls by 10%",
        income_multiplier: 0.9,
        expense_multiplier: 1.0,
    },
    Shock {
        name: "income_drop_20",
        description: "Income falls by 20%",
        income_multiplier: 0.8,
        expense_multiplier: 1.0,
    },
    Shock {
        name: "expense_spike_15",
        description: "Expenses rise by 15%",
        income_multiplier: 1.0,
        expense_multiplier: 1.15,
    },
    Shock {
        name: "combined_shock",
        description: "Income falls by 15% while expenses rise by 10%",
        income_multiplier: 0.85,
        expense_multiplier: 1.1,
    },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressScenario {
    pub name: String,
    pub description: String,
    pub income_multiplier: f64,
    pub expense_multiplier: f64,
    /// Savings summed over the whole projection under the scenario.
    pub total_savings: f64,
    pub negative_months: usize,
    /// Share of projected months that still end with non-negative savings, in percent.
    pub survival_probability: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mitigation {
    pub priority: Priority,
    pub category: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAnalysis {
    pub volatility_level: Rating,
    pub income_volatility: f64,
    pub expense_volatility: f64,
    /// Percentage of projected months with negative savings.
    pub shortfall_probability: f64,
    pub stress_tests: Vec<StressScenario>,
    pub mitigations: Vec<Mitigation>,
}

pub fn analyze_risk(
    projections: &[EnrichedForecastPoint],
    history: &[MonthlyRecord],
    thresholds: &RiskThresholds,
) -> RiskAnalysis {
    let income_volatility = volatility(&history.column(RecordField::Income));
    let expense_volatility = volatility(&history.column(RecordField::Expenses));
    let average_volatility = (income_volatility + expense_volatility) / 2.0;
    let volatility_level = if average_volatility < thresholds.low_volatility {
        Rating::Low
    } else if average_volatility < thresholds.high_volatility {
        Rating::Medium
    } else {
        Rating::High
    };

    let shortfall_probability = percentage(
        projections.iter().filter(|p| p.savings() < 0.0).count(),
        projections.len(),
    );
    let stress_tests = SCENARIOS
        .iter()
        .map(|shock| stress_test(projections, shock))
        .collect();

    let average_savings = mean(&projections.iter().map(|p| p.savings()).collect::<Vec<_>>());
    let mut mitigations = Vec::new();
    if average_savings < thresholds.savings_floor {
        mitigations.push(Mitigation {
            priority: Priority::High,
            category: "savings".into(),
            message: format!(
                "Projected monthly savings average {average_savings:.2}; trim discretionary \
                 spending to reach at least {:.2}.",
                thresholds.savings_floor
            ),
        });
    }
    if shortfall_probability > 0.0 {
        mitigations.push(Mitigation {
            priority: Priority::High,
            category: "emergency_fund".into(),
            message: format!(
                "{shortfall_probability:.0}% of projected months run a deficit; build an \
                 emergency fund before they arrive."
            ),
        });
    }
    if income_volatility > thresholds.income_volatility_limit {
        mitigations.push(Mitigation {
            priority: Priority::Medium,
            category: "income_stability".into(),
            message: format!(
                "Income varies by {income_volatility:.2} a month; budget against the lower \
                 months or add a steadier income source."
            ),
        });
    }
    if expense_volatility > thresholds.expense_volatility_limit {
        mitigations.push(Mitigation {
            priority: Priority::Medium,
            category: "expense_control".into(),
            message: format!(
                "Expenses vary by {expense_volatility:.2} a month; smooth large purchases \
                 with a sinking fund."
            ),
        });
    }
    mitigations.sort_by_key(|m| m.priority);

    RiskAnalysis {
        volatility_level,
        income_volatility,
        expense_volatility,
        shortfall_probability,
        stress_tests,
        mitigations,
    }
}

fn stress_test(projections: &[EnrichedForecastPoint], shock: &Shock) -> StressScenario {
    let savings: Vec<f64> = projections
        .iter()
        .map(|p| p.income() * shock.income_multiplier - p.expenses() * shock.expense_multiplier)
        .collect();
    let negative_months = savings.iter().filter(|s| **s < 0.0).count();
    StressScenario {
        name: shock.name.to_string(),
        description: shock.description.to_string(),
        income_multiplier: shock.income_multiplier,
        expense_multiplier: shock.expense_multiplier,
        total_savings: savings.iter().sum(),
        negative_months,
        survival_probability: 100.0 - percentage(negative_months, savings.len()),
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ForecastMethod, ForecastPoint};
    use crate::forecast::test_support::*;

    fn projections(values: &[(f64, f64)]) -> Vec<EnrichedForecastPoint> {
        values
            .iter()
            .enumerate()
            .map(|(idx, &(income, expenses))| EnrichedForecastPoint {
                point: ForecastPoint::new(
                    ym(2025, 1).add_months(idx as i32),
                    income,
                    expenses,
                    ForecastMethod::Ensemble,
                ),
                income_lower: income,
                income_upper: income,
                expenses_lower: expenses,
                expenses_upper: expenses,
                confidence_level: 0.9,
                volatility_factor: 1.0,
            })
            .collect()
    }

    #[test]
    fn comfortable_plan_has_no_mitigations() {
        let history = flat(12, 3000.0, 2000.0);
        let risk = analyze_risk(
            &projections(&[(3000.0, 2000.0); 12]),
            &history,
            &RiskThresholds::default(),
        );
        assert_eq!(risk.volatility_level, Rating::Low);
        assert_eq!(risk.shortfall_probability, 0.0);
        assert!(risk.mitigations.is_empty());
        assert_eq!(risk.stress_tests.len(), 4);

        let drop_20 = &risk.stress_tests[1];
        assert_eq!(drop_20.name, "income_drop_20");
        assert!((drop_20.total_savings - 12.0 * 400.0).abs() < 1e-6);
        assert_eq!(drop_20.survival_probability, 100.0);

        let combined = &risk.stress_tests[3];
        // 3000 * 0.85 - 2000 * 1.1 = 350
        assert!((combined.total_savings - 12.0 * 350.0).abs() < 1e-6);
    }

    #[test]
    fn tight_plan_fails_stress_tests() {
        let history = flat(12, 2000.0, 1900.0);
        let risk = analyze_risk(
            &projections(&[(2000.0, 1900.0), (2000.0, 2100.0)]),
            &history,
            &RiskThresholds::default(),
        );
        assert_eq!(risk.shortfall_probability, 50.0);
        let spike = &risk.stress_tests[2];
        assert_eq!(spike.negative_months, 2);
        assert_eq!(spike.survival_probability, 0.0);
        assert_eq!(risk.mitigations[0].priority, Priority::High);
        assert!(risk.mitigations.iter().any(|m| m.category == "savings"));
        assert!(risk.mitigations.iter().any(|m| m.category == "emergency_fund"));
    }

    #[test]
    fn moderate_volatility_is_rated_medium() {
        // Sample deviations of roughly 731 and 522 average to about 627.
        let values: Vec<(f64, f64)> = (0..12)
            .map(|i| if i % 2 == 0 { (2500.0, 1000.0) } else { (3900.0, 2000.0) })
            .collect();
        let risk = analyze_risk(
            &projections(&[(3000.0, 1000.0); 3]),
            &history(&values),
            &RiskThresholds::default(),
        );
        let average = (risk.income_volatility + risk.expense_volatility) / 2.0;
        assert!((500.0..1000.0).contains(&average), "average volatility {average}");
        assert_eq!(risk.volatility_level, Rating::Medium);
        assert!(risk.mitigations.is_empty());
    }

    #[test]
    fn volatile_history_raises_level_and_suggestions() {
        let values: Vec<(f64, f64)> = (0..12)
            .map(|i| if i % 2 == 0 { (1000.0, 500.0) } else { (5000.0, 3000.0) })
            .collect();
        let risk = analyze_risk(
            &projections(&[(3000.0, 1000.0); 3]),
            &history(&values),
            &RiskThresholds::default(),
        );
        assert_eq!(risk.volatility_level, Rating::High);
        let categories: Vec<_> = risk.mitigations.iter().map(|m| m.category.as_str()).collect();
        assert_eq!(categories, vec!["income_stability", "expense_control"]);
    }
}
