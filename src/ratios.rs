//! Ratio calculator.
//!
//! Each ratio is an independent rule with a guard over the raw statement
//! fields. A ratio whose guard fails is omitted entirely; no placeholder or
//! zero-valued metric is ever emitted for missing data.

use crate::schema::FinancialRecord;
use crate::utils::{format_multiple, format_percent};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Positive,
    Neutral,
    Warning,
    Negative,
}

/// Display grouping for ratios. Declaration order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RatioCategory {
    Profitability,
    Liquidity,
    Solvency,
    Efficiency,
    #[serde(rename = "Cash Flow")]
    CashFlow,
}

impl RatioCategory {
    pub const ALL: [RatioCategory; 5] = [
        RatioCategory::Profitability,
        RatioCategory::Liquidity,
        RatioCategory::Solvency,
        RatioCategory::Efficiency,
        RatioCategory::CashFlow,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RatioCategory::Profitability => "Profitability",
            RatioCategory::Liquidity => "Liquidity",
            RatioCategory::Solvency => "Solvency",
            RatioCategory::Efficiency => "Efficiency",
            RatioCategory::CashFlow => "Cash Flow",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RatioCategory::Profitability => "Measure how effectively the company converts revenue into profit. Higher margins indicate stronger profitability.",
            RatioCategory::Liquidity => "Assess ability to meet short-term obligations. A current ratio above 1.5 indicates good short-term financial health.",
            RatioCategory::Solvency => "Evaluate long-term financial stability and leverage. Lower debt ratios indicate less financial risk.",
            RatioCategory::Efficiency => "Show how well assets and equity generate returns. Higher ROA and ROE are desirable.",
            RatioCategory::CashFlow => "Measure cash generation ability. Strong cash flow indicates operational sustainability.",
        }
    }
}

impl fmt::Display for RatioCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatioMetric {
    pub name: String,
    /// Display value, e.g. `60.0%` or `3.00`.
    pub value: String,
    /// Unformatted value on the scale used for classification.
    pub raw_value: f64,
    pub interpretation: String,
    pub signal: Signal,
    pub category: RatioCategory,
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    /// Bands match on `value > bound`.
    HigherIsBetter,
    /// Bands match on `value < bound`.
    LowerIsBetter,
}

impl Direction {
    fn passes(self, value: f64, bound: f64) -> bool {
        match self {
            Direction::HigherIsBetter => value > bound,
            Direction::LowerIsBetter => value < bound,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ValueFormat {
    /// Value is already a percentage.
    Percent,
    /// Value is a fraction shown as a percentage.
    FractionAsPercent,
    Multiple,
}

impl ValueFormat {
    fn render(self, value: f64) -> String {
        match self {
            ValueFormat::Percent => format_percent(value),
            ValueFormat::FractionAsPercent => format_percent(value * 100.0),
            ValueFormat::Multiple => format_multiple(value),
        }
    }
}

/// Raw inputs, already coalesced to zero.
struct RatioInputs {
    revenue: f64,
    net_income: f64,
    cost_of_goods: f64,
    operating_expenses: f64,
    assets: f64,
    liabilities: f64,
    equity: f64,
    current_assets: f64,
    current_liabilities: f64,
    operating_cash_flow: f64,
}

impl RatioInputs {
    fn from_record(record: &FinancialRecord) -> Self {
        Self {
            revenue: record.revenue(),
            net_income: record.net_income(),
            cost_of_goods: record.cost_of_goods_sold(),
            operating_expenses: record.operating_expenses(),
            assets: record.assets(),
            liabilities: record.liabilities(),
            equity: record.equity(),
            current_assets: record.current_assets(),
            current_liabilities: record.current_liabilities(),
            operating_cash_flow: record.operating_cash_flow(),
        }
    }
}

struct RatioDefinition {
    name: &'static str,
    category: RatioCategory,
    format: ValueFormat,
    direction: Direction,
    /// Bounds for `Positive` then `Neutral`.
    signal_bounds: [f64; 2],
    fallback_signal: Signal,
    interpretations: &'static [(f64, &'static str)],
    fallback_interpretation: &'static str,
    /// Returns `None` when the guard fails.
    compute: fn(&RatioInputs) -> Option<f64>,
}

impl RatioDefinition {
    fn signal(&self, value: f64) -> Signal {
        let [positive, neutral] = self.signal_bounds;
        if self.direction.passes(value, positive) {
            Signal::Positive
        } else if self.direction.passes(value, neutral) {
            Signal::Neutral
        } else {
            self.fallback_signal
        }
    }

    fn interpretation(&self, value: f64) -> &'static str {
        self.interpretations
            .iter()
            .find(|(bound, _)| self.direction.passes(value, *bound))
            .map(|(_, text)| *text)
            .unwrap_or(self.fallback_interpretation)
    }

    fn evaluate(&self, inputs: &RatioInputs) -> Option<RatioMetric> {
        let value = (self.compute)(inputs)?;
        Some(RatioMetric {
            name: self.name.to_string(),
            value: self.format.render(value),
            raw_value: value,
            interpretation: self.interpretation(value).to_string(),
            signal: self.signal(value),
            category: self.category,
        })
    }
}

// Grouped by category in display order.
const RATIO_DEFINITIONS: &[RatioDefinition] = &[
    RatioDefinition {
        name: "Gross Profit Margin",
        category: RatioCategory::Profitability,
        format: ValueFormat::Percent,
        direction: Direction::HigherIsBetter,
        signal_bounds: [40.0, 25.0],
        fallback_signal: Signal::Warning,
        interpretations: &[(50.0, "Excellent cost control"), (30.0, "Healthy margin")],
        fallback_interpretation: "Below industry average",
        compute: |i| {
            (i.revenue > 0.0 && i.cost_of_goods > 0.0)
                .then(|| (i.revenue - i.cost_of_goods) / i.revenue * 100.0)
        },
    },
    RatioDefinition {
        name: "Net Profit Margin",
        category: RatioCategory::Profitability,
        format: ValueFormat::Percent,
        direction: Direction::HigherIsBetter,
        signal_bounds: [15.0, 5.0],
        fallback_signal: Signal::Warning,
        interpretations: &[
            (20.0, "Exceptional profitability"),
            (10.0, "Healthy profitability"),
        ],
        fallback_interpretation: "Moderate profitability",
        compute: |i| {
            (i.revenue > 0.0 && i.net_income > 0.0).then(|| i.net_income / i.revenue * 100.0)
        },
    },
    RatioDefinition {
        name: "Operating Margin",
        category: RatioCategory::Profitability,
        format: ValueFormat::Percent,
        direction: Direction::HigherIsBetter,
        signal_bounds: [12.0, 3.0],
        fallback_signal: Signal::Warning,
        interpretations: &[
            (15.0, "Strong operational efficiency"),
            (5.0, "Acceptable efficiency"),
        ],
        fallback_interpretation: "Room for improvement",
        compute: |i| {
            (i.revenue > 0.0 && i.operating_expenses > 0.0)
                .then(|| (i.revenue - i.operating_expenses) / i.revenue * 100.0)
        },
    },
    RatioDefinition {
        name: "Current Ratio",
        category: RatioCategory::Liquidity,
        format: ValueFormat::Multiple,
        direction: Direction::HigherIsBetter,
        signal_bounds: [1.5, 1.0],
        fallback_signal: Signal::Warning,
        interpretations: &[
            (2.0, "Strong liquidity position"),
            (1.5, "Healthy liquidity"),
            (1.0, "Adequate liquidity"),
        ],
        fallback_interpretation: "Potential liquidity concerns",
        compute: |i| {
            (i.current_assets > 0.0 && i.current_liabilities > 0.0)
                .then(|| i.current_assets / i.current_liabilities)
        },
    },
    RatioDefinition {
        name: "Debt-to-Equity Ratio",
        category: RatioCategory::Solvency,
        format: ValueFormat::Multiple,
        direction: Direction::LowerIsBetter,
        signal_bounds: [1.0, 2.0],
        fallback_signal: Signal::Negative,
        interpretations: &[
            (1.0, "Conservative capital structure"),
            (2.0, "Moderate leverage"),
        ],
        fallback_interpretation: "High leverage risk",
        compute: |i| (i.liabilities > 0.0 && i.equity > 0.0).then(|| i.liabilities / i.equity),
    },
    RatioDefinition {
        name: "Debt-to-Assets Ratio",
        category: RatioCategory::Solvency,
        format: ValueFormat::FractionAsPercent,
        direction: Direction::LowerIsBetter,
        signal_bounds: [0.4, 0.6],
        fallback_signal: Signal::Negative,
        interpretations: &[
            (0.3, "Low financial risk"),
            (0.6, "Moderate financial risk"),
        ],
        fallback_interpretation: "High financial risk",
        compute: |i| (i.liabilities > 0.0 && i.assets > 0.0).then(|| i.liabilities / i.assets),
    },
    RatioDefinition {
        name: "Return on Assets (ROA)",
        category: RatioCategory::Efficiency,
        format: ValueFormat::Percent,
        direction: Direction::HigherIsBetter,
        signal_bounds: [8.0, 3.0],
        fallback_signal: Signal::Warning,
        interpretations: &[
            (10.0, "Excellent asset efficiency"),
            (5.0, "Good asset efficiency"),
        ],
        fallback_interpretation: "Moderate asset efficiency",
        compute: |i| {
            (i.net_income > 0.0 && i.assets > 0.0).then(|| i.net_income / i.assets * 100.0)
        },
    },
    RatioDefinition {
        name: "Return on Equity (ROE)",
        category: RatioCategory::Efficiency,
        format: ValueFormat::Percent,
        direction: Direction::HigherIsBetter,
        signal_bounds: [15.0, 8.0],
        fallback_signal: Signal::Warning,
        interpretations: &[
            (15.0, "Exceptional shareholder returns"),
            (10.0, "Strong shareholder returns"),
        ],
        fallback_interpretation: "Moderate shareholder returns",
        compute: |i| {
            (i.net_income > 0.0 && i.equity > 0.0).then(|| i.net_income / i.equity * 100.0)
        },
    },
    RatioDefinition {
        name: "Operating Cash Flow Ratio",
        category: RatioCategory::CashFlow,
        format: ValueFormat::Multiple,
        direction: Direction::HigherIsBetter,
        signal_bounds: [0.8, 0.3],
        fallback_signal: Signal::Warning,
        interpretations: &[
            (1.0, "Strong cash generation"),
            (0.5, "Adequate cash flow"),
        ],
        fallback_interpretation: "Weak cash generation",
        compute: |i| {
            (i.operating_cash_flow > 0.0 && i.current_liabilities > 0.0)
                .then(|| i.operating_cash_flow / i.current_liabilities)
        },
    },
];

/// Computes every ratio whose inputs are available, in display order.
pub fn compute_ratios(record: &FinancialRecord) -> Vec<RatioMetric> {
    let inputs = RatioInputs::from_record(record);
    let ratios: Vec<RatioMetric> = RATIO_DEFINITIONS
        .iter()
        .filter_map(|definition| definition.evaluate(&inputs))
        .collect();

    debug!(
        "Computed {} of {} ratios",
        ratios.len(),
        RATIO_DEFINITIONS.len()
    );

    ratios
}

/// Groups ratios by category, skipping categories with no ratios.
pub fn group_by_category(ratios: &[RatioMetric]) -> Vec<(RatioCategory, Vec<&RatioMetric>)> {
    RatioCategory::ALL
        .iter()
        .filter_map(|category| {
            let members: Vec<&RatioMetric> =
                ratios.iter().filter(|r| r.category == *category).collect();
            (!members.is_empty()).then_some((*category, members))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find<'a>(ratios: &'a [RatioMetric], name: &str) -> &'a RatioMetric {
        ratios
            .iter()
            .find(|r| r.name == name)
            .unwrap_or_else(|| panic!("ratio '{}' missing", name))
    }

    #[test]
    fn test_empty_record_yields_no_ratios() {
        assert!(compute_ratios(&FinancialRecord::default()).is_empty());
    }

    #[test]
    fn test_profitability_margins() {
        let record = FinancialRecord {
            revenue: Some(1_500_000.0),
            cost_of_goods_sold: Some(600_000.0),
            operating_expenses: Some(400_000.0),
            net_income: Some(337_500.0),
            ..Default::default()
        };

        let ratios = compute_ratios(&record);
        assert_eq!(ratios.len(), 3);

        let gross = find(&ratios, "Gross Profit Margin");
        assert_eq!(gross.value, "60.0%");
        assert_eq!(gross.signal, Signal::Positive);
        assert_eq!(gross.interpretation, "Excellent cost control");

        let net = find(&ratios, "Net Profit Margin");
        assert_eq!(net.value, "22.5%");
        assert_eq!(net.signal, Signal::Positive);
        assert_eq!(net.interpretation, "Exceptional profitability");

        let operating = find(&ratios, "Operating Margin");
        assert_eq!(operating.value, "73.3%");
        assert_eq!(operating.signal, Signal::Positive);
    }

    #[test]
    fn test_zero_revenue_emits_no_profitability_ratios() {
        let record = FinancialRecord {
            revenue: Some(0.0),
            cost_of_goods_sold: Some(600_000.0),
            operating_expenses: Some(400_000.0),
            net_income: Some(337_500.0),
            assets: Some(2_000_000.0),
            ..Default::default()
        };

        let ratios = compute_ratios(&record);
        assert!(ratios
            .iter()
            .all(|r| r.category != RatioCategory::Profitability));
        assert_eq!(ratios.len(), 1);
        assert_eq!(ratios[0].name, "Return on Assets (ROA)");
    }

    #[test]
    fn test_current_ratio_boundaries_are_strict() {
        let at = |assets: f64| {
            let record = FinancialRecord {
                current_assets: Some(assets),
                current_liabilities: Some(100.0),
                ..Default::default()
            };
            compute_ratios(&record).remove(0)
        };

        let ratio = at(150.0);
        assert_eq!(ratio.value, "1.50");
        assert_eq!(ratio.signal, Signal::Neutral);
        assert_eq!(ratio.interpretation, "Adequate liquidity");

        let ratio = at(100.0);
        assert_eq!(ratio.signal, Signal::Warning);
        assert_eq!(ratio.interpretation, "Potential liquidity concerns");

        let ratio = at(300.0);
        assert_eq!(ratio.value, "3.00");
        assert_eq!(ratio.signal, Signal::Positive);
        assert_eq!(ratio.interpretation, "Strong liquidity position");
    }

    #[test]
    fn test_solvency_signals_turn_negative() {
        let record = FinancialRecord {
            assets: Some(1_000.0),
            liabilities: Some(800.0),
            equity: Some(200.0),
            ..Default::default()
        };

        let ratios = compute_ratios(&record);
        let de = find(&ratios, "Debt-to-Equity Ratio");
        assert_eq!(de.value, "4.00");
        assert_eq!(de.signal, Signal::Negative);
        assert_eq!(de.interpretation, "High leverage risk");

        let da = find(&ratios, "Debt-to-Assets Ratio");
        assert_eq!(da.value, "80.0%");
        assert_eq!(da.signal, Signal::Negative);
        assert_eq!(da.interpretation, "High financial risk");
    }

    #[test]
    fn test_debt_to_assets_boundary_is_neutral() {
        let record = FinancialRecord {
            assets: Some(2_000_000.0),
            liabilities: Some(800_000.0),
            ..Default::default()
        };

        let ratios = compute_ratios(&record);
        assert_eq!(ratios.len(), 1);
        assert_eq!(ratios[0].value, "40.0%");
        assert_eq!(ratios[0].signal, Signal::Neutral);
        assert_eq!(ratios[0].interpretation, "Moderate financial risk");
    }

    #[test]
    fn test_negative_net_income_is_omitted() {
        let record = FinancialRecord {
            revenue: Some(1_000.0),
            net_income: Some(-100.0),
            assets: Some(500.0),
            equity: Some(500.0),
            ..Default::default()
        };

        let ratios = compute_ratios(&record);
        assert!(ratios.iter().all(|r| !r.name.starts_with("Net Profit")));
        assert!(ratios.iter().all(|r| r.category != RatioCategory::Efficiency));
    }

    #[test]
    fn test_output_follows_category_order() {
        let record = FinancialRecord {
            revenue: Some(1_000.0),
            net_income: Some(100.0),
            assets: Some(2_000.0),
            liabilities: Some(500.0),
            equity: Some(1_500.0),
            current_assets: Some(600.0),
            current_liabilities: Some(300.0),
            operating_cash_flow: Some(200.0),
            ..Default::default()
        };

        let ratios = compute_ratios(&record);
        let categories: Vec<RatioCategory> = ratios.iter().map(|r| r.category).collect();
        let mut sorted = categories.clone();
        sorted.sort();
        assert_eq!(categories, sorted);

        let ocf = find(&ratios, "Operating Cash Flow Ratio");
        assert_eq!(ocf.value, "0.67");
        assert_eq!(ocf.signal, Signal::Neutral);
        assert_eq!(ocf.interpretation, "Adequate cash flow");

        let groups = group_by_category(&ratios);
        assert_eq!(groups.len(), 5);
        assert_eq!(groups[0].0, RatioCategory::Profitability);
        assert_eq!(groups[4].0, RatioCategory::CashFlow);
    }

    #[test]
    fn test_signal_serialization() {
        assert_eq!(serde_json::to_string(&Signal::Warning).unwrap(), "\"warning\"");
        assert_eq!(
            serde_json::to_string(&RatioCategory::CashFlow).unwrap(),
            "\"Cash Flow\""
        );
    }
}
