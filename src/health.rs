use crate::schema::FinancialRecord;
use crate::utils::percent_of;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_SCORE: u8 = 10;

/// Neutral score used when a category lacks the data to be assessed.
const INSUFFICIENT_DATA_SCORE: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthCategory {
    Profitability,
    Liquidity,
    Solvency,
    #[serde(rename = "Cash Flow")]
    CashFlow,
}

impl HealthCategory {
    pub const ALL: [HealthCategory; 4] = [
        HealthCategory::Profitability,
        HealthCategory::Liquidity,
        HealthCategory::Solvency,
        HealthCategory::CashFlow,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            HealthCategory::Profitability => "Profitability",
            HealthCategory::Liquidity => "Liquidity",
            HealthCategory::Solvency => "Solvency",
            HealthCategory::CashFlow => "Cash Flow",
        }
    }
}

impl fmt::Display for HealthCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthStatus {
    Healthy,
    Moderate,
    Risky,
}

impl HealthStatus {
    /// Healthy above 7, Moderate above 4, Risky otherwise.
    pub fn from_score(score: f64) -> Self {
        if score > 7.0 {
            HealthStatus::Healthy
        } else if score > 4.0 {
            HealthStatus::Moderate
        } else {
            HealthStatus::Risky
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Your company demonstrates strong financial fundamentals with solid profitability, healthy liquidity, and conservative leverage. Continue monitoring key metrics for sustained performance.",
            HealthStatus::Moderate => "Your company shows acceptable financial performance but with some areas requiring attention. Consider strengthening profitability, liquidity, or reducing leverage to improve overall health.",
            HealthStatus::Risky => "Your company faces financial challenges that require immediate attention. Focus on improving profitability, strengthening liquidity position, and managing debt levels to reduce financial risk.",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::Moderate => "Moderate",
            HealthStatus::Risky => "Risky",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScore {
    pub category: HealthCategory,
    pub score: u8,
    pub max_score: u8,
    pub status: HealthStatus,
    /// First entry is the primary justification.
    pub details: Vec<String>,
}

impl HealthScore {
    fn new(category: HealthCategory, score: u8, details: Vec<String>) -> Self {
        let score = score.min(MAX_SCORE);
        Self {
            category,
            score,
            max_score: MAX_SCORE,
            status: HealthStatus::from_score(score as f64),
            details,
        }
    }

    pub fn primary_detail(&self) -> &str {
        self.details.first().map(String::as_str).unwrap_or_default()
    }
}

/// Scores the four health categories, always in the order
/// Profitability, Liquidity, Solvency, Cash Flow.
pub fn compute_health_scores(record: &FinancialRecord) -> Vec<HealthScore> {
    vec![
        score_profitability(record),
        score_liquidity(record),
        score_solvency(record),
        score_cash_flow(record),
    ]
}

/// Mean of the category scores, zero for an empty slice.
pub fn overall_score(scores: &[HealthScore]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    let total: f64 = scores.iter().map(|s| s.score as f64).sum();
    total / scores.len() as f64
}

fn score_profitability(record: &FinancialRecord) -> HealthScore {
    let revenue = record.revenue();
    let net_margin = if revenue > 0.0 {
        percent_of(record.net_income(), revenue)
    } else {
        0.0
    };

    let (mut score, detail) = if net_margin > 15.0 {
        (9, "Excellent profit margins (>15%)")
    } else if net_margin > 8.0 {
        (6, "Healthy profit margins (8-15%)")
    } else if net_margin > 0.0 {
        (3, "Moderate profit margins (0-8%)")
    } else {
        (0, "Operating at a loss")
    };
    let mut details = vec![detail.to_string()];

    if profit_trending_upward(record) {
        score += 1;
        details.push("Profit trending upward".to_string());
    }

    HealthScore::new(HealthCategory::Profitability, score, details)
}

/// True when the last month's profit exceeds the first month's. Needs at
/// least two months, both carrying a profit figure.
fn profit_trending_upward(record: &FinancialRecord) -> bool {
    let months = record.months();
    if months.len() < 2 {
        return false;
    }
    match (
        months.first().and_then(|m| m.profit()),
        months.last().and_then(|m| m.profit()),
    ) {
        (Some(first), Some(last)) => last - first > 0.0,
        _ => false,
    }
}

fn score_liquidity(record: &FinancialRecord) -> HealthScore {
    let current_assets = record.current_assets();
    let current_liabilities = record.current_liabilities();

    if !(current_assets > 0.0 && current_liabilities > 0.0) {
        return HealthScore::new(
            HealthCategory::Liquidity,
            INSUFFICIENT_DATA_SCORE,
            vec!["Insufficient data for liquidity assessment".to_string()],
        );
    }

    let current_ratio = current_assets / current_liabilities;
    let (score, detail) = if current_ratio > 2.0 {
        (9, "Strong liquidity position (ratio >2)")
    } else if current_ratio > 1.5 {
        (7, "Healthy liquidity (ratio 1.5-2)")
    } else if current_ratio > 1.0 {
        (4, "Adequate liquidity (ratio 1-1.5)")
    } else {
        (1, "Liquidity concerns (ratio <1)")
    };

    HealthScore::new(HealthCategory::Liquidity, score, vec![detail.to_string()])
}

fn score_solvency(record: &FinancialRecord) -> HealthScore {
    let assets = record.assets();
    let liabilities = record.liabilities();
    let equity = record.equity();

    let (score, detail) = if liabilities > 0.0 && equity > 0.0 {
        let debt_to_equity = liabilities / equity;
        if debt_to_equity < 0.5 {
            (9, "Low leverage, conservative capital structure")
        } else if debt_to_equity < 1.0 {
            (7, "Moderate leverage, balanced capital structure")
        } else if debt_to_equity < 2.0 {
            (4, "Higher leverage, elevated risk")
        } else {
            (1, "Very high leverage, significant solvency risk")
        }
    } else {
        (
            INSUFFICIENT_DATA_SCORE,
            "Insufficient data for solvency assessment",
        )
    };
    let mut details = vec![detail.to_string()];

    let equity_ratio = if assets > 0.0 && equity > 0.0 {
        percent_of(equity, assets)
    } else {
        0.0
    };
    if equity_ratio > 60.0 {
        details.push("Strong equity base (>60% of assets)".to_string());
    }

    HealthScore::new(HealthCategory::Solvency, score, details)
}

fn score_cash_flow(record: &FinancialRecord) -> HealthScore {
    let operating_cash_flow = record.operating_cash_flow();
    let profit = record.net_income();

    let (score, detail) = if operating_cash_flow > profit && profit > 0.0 {
        (9, "Strong cash generation exceeding profit")
    } else if operating_cash_flow > 0.0 && profit > 0.0 {
        (6, "Positive operating cash flow")
    } else if operating_cash_flow > 0.0 {
        (4, "Positive cash flow despite losses")
    } else {
        (1, "Negative cash flow - liquidity pressure")
    };

    HealthScore::new(HealthCategory::CashFlow, score, vec![detail.to_string()])
}

/// Category scores plus the derived overall verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub scores: Vec<HealthScore>,
    pub overall_score: f64,
    pub overall_status: HealthStatus,
    pub summary: String,
    pub key_risks: Vec<String>,
    pub opportunities: Vec<String>,
}

impl HealthReport {
    pub fn from_record(record: &FinancialRecord) -> Self {
        let scores = compute_health_scores(record);
        let overall_score = overall_score(&scores);
        let overall_status = HealthStatus::from_score(overall_score);

        let mut key_risks: Vec<String> = scores
            .iter()
            .filter(|s| s.status == HealthStatus::Risky)
            .map(|s| format!("{}: {}", s.category, s.primary_detail()))
            .collect();
        if key_risks.is_empty() {
            key_risks.push("No critical risks identified".to_string());
        }

        let mut opportunities: Vec<String> = scores
            .iter()
            .filter(|s| s.status != HealthStatus::Healthy)
            .map(|s| {
                format!(
                    "Strengthen {} performance",
                    s.category.label().to_lowercase()
                )
            })
            .collect();
        if opportunities.is_empty() {
            opportunities.push("Continue maintaining strong financial performance".to_string());
        }

        debug!(
            "Health assessment: overall {:.2} ({}) across {} categories",
            overall_score,
            overall_status,
            scores.len()
        );

        Self {
            scores,
            overall_score,
            overall_status,
            summary: overall_status.summary().to_string(),
            key_risks,
            opportunities,
        }
    }

    pub fn score_for(&self, category: HealthCategory) -> Option<&HealthScore> {
        self.scores.iter().find(|s| s.category == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CashFlowMonth, MonthlyPeriod, OperatingMonth};

    fn operating(month: &str, profit: f64) -> MonthlyPeriod {
        MonthlyPeriod::Operating(OperatingMonth {
            month: month.to_string(),
            revenue: Some(100_000.0),
            expenses: Some(100_000.0 - profit),
            profit: Some(profit),
        })
    }

    #[test]
    fn test_empty_record_defaults() {
        let report = HealthReport::from_record(&FinancialRecord::default());
        let scores: Vec<(HealthCategory, u8, HealthStatus)> = report
            .scores
            .iter()
            .map(|s| (s.category, s.score, s.status))
            .collect();

        assert_eq!(
            scores,
            vec![
                (HealthCategory::Profitability, 0, HealthStatus::Risky),
                (HealthCategory::Liquidity, 5, HealthStatus::Moderate),
                (HealthCategory::Solvency, 5, HealthStatus::Moderate),
                (HealthCategory::CashFlow, 1, HealthStatus::Risky),
            ]
        );
        assert_eq!(report.overall_score, 2.75);
        assert_eq!(report.overall_status, HealthStatus::Risky);
        assert_eq!(
            report.key_risks,
            vec![
                "Profitability: Operating at a loss".to_string(),
                "Cash Flow: Negative cash flow - liquidity pressure".to_string(),
            ]
        );
        assert_eq!(report.opportunities.len(), 4);
        assert_eq!(report.opportunities[3], "Strengthen cash flow performance");
    }

    #[test]
    fn test_liquidity_bands_use_strict_bounds() {
        let liquidity = |assets: f64| {
            let record = FinancialRecord {
                current_assets: Some(assets),
                current_liabilities: Some(100.0),
                ..Default::default()
            };
            score_liquidity(&record)
        };

        assert_eq!(liquidity(300.0).score, 9);
        assert_eq!(liquidity(300.0).status, HealthStatus::Healthy);
        assert_eq!(liquidity(200.0).score, 7);
        assert_eq!(liquidity(200.0).status, HealthStatus::Moderate);
        assert_eq!(liquidity(150.0).score, 4);
        assert_eq!(liquidity(150.0).status, HealthStatus::Risky);
        assert_eq!(liquidity(100.0).score, 1);
    }

    #[test]
    fn test_profit_trend_bonus() {
        let record = FinancialRecord {
            revenue: Some(1_500_000.0),
            net_income: Some(337_500.0),
            months: Some(vec![operating("Jan", 40_000.0), operating("Jun", 65_000.0)]),
            ..Default::default()
        };

        let score = score_profitability(&record);
        assert_eq!(score.score, 10);
        assert_eq!(score.status, HealthStatus::Healthy);
        assert_eq!(
            score.details,
            vec![
                "Excellent profit margins (>15%)".to_string(),
                "Profit trending upward".to_string()
            ]
        );
    }

    #[test]
    fn test_profit_trend_ignores_single_month_and_cash_flow_months() {
        let single = FinancialRecord {
            revenue: Some(1_000.0),
            net_income: Some(50.0),
            months: Some(vec![operating("Jan", 10.0)]),
            ..Default::default()
        };
        assert_eq!(score_profitability(&single).score, 3);

        let cash_month = |ending: f64| {
            MonthlyPeriod::CashFlow(CashFlowMonth {
                month: "Jan".to_string(),
                operating: 50_000.0,
                investing: Some(-30_000.0),
                financing: Some(0.0),
                ending: Some(ending),
            })
        };
        let cash_flow = FinancialRecord {
            revenue: Some(1_000.0),
            net_income: Some(50.0),
            months: Some(vec![cash_month(100.0), cash_month(200.0)]),
            ..Default::default()
        };
        let score = score_profitability(&cash_flow);
        assert_eq!(score.score, 3);
        assert_eq!(score.details.len(), 1);
    }

    #[test]
    fn test_months_without_expenses_still_earn_trend_bonus() {
        let record: FinancialRecord = serde_json::from_str(
            r#"{
                "revenue": 1000,
                "netIncome": 200,
                "months": [
                    {"month": "Jan", "revenue": 100, "profit": 10},
                    {"month": "Feb", "revenue": 120, "profit": 30}
                ]
            }"#,
        )
        .unwrap();

        let score = score_profitability(&record);
        assert_eq!(score.score, 10);
        assert_eq!(score.details[1], "Profit trending upward");
    }

    #[test]
    fn test_solvency_equity_note() {
        let record = FinancialRecord {
            assets: Some(1_000.0),
            liabilities: Some(300.0),
            equity: Some(700.0),
            ..Default::default()
        };

        let score = score_solvency(&record);
        assert_eq!(score.score, 9);
        assert_eq!(score.details.len(), 2);
        assert_eq!(score.details[1], "Strong equity base (>60% of assets)");

        let record = FinancialRecord {
            assets: Some(1_000.0),
            equity: Some(900.0),
            ..Default::default()
        };
        let score = score_solvency(&record);
        assert_eq!(score.score, 5);
        assert_eq!(score.primary_detail(), "Insufficient data for solvency assessment");
        assert_eq!(score.details.len(), 2);
    }

    #[test]
    fn test_cash_flow_bands() {
        let cash_flow = |ocf: Option<f64>, profit: Option<f64>| {
            let record = FinancialRecord {
                operating_cash_flow: ocf,
                net_income: profit,
                ..Default::default()
            };
            score_cash_flow(&record).score
        };

        assert_eq!(cash_flow(Some(375_000.0), Some(337_500.0)), 9);
        assert_eq!(cash_flow(Some(300_000.0), Some(337_500.0)), 6);
        assert_eq!(cash_flow(Some(300_000.0), Some(-10.0)), 4);
        assert_eq!(cash_flow(Some(-1.0), Some(337_500.0)), 1);
        assert_eq!(cash_flow(None, None), 1);
    }

    #[test]
    fn test_scores_always_within_bounds() {
        let records = vec![
            FinancialRecord::default(),
            FinancialRecord {
                revenue: Some(10.0),
                net_income: Some(1_000.0),
                months: Some(vec![operating("Jan", 1.0), operating("Feb", 2.0)]),
                ..Default::default()
            },
            FinancialRecord {
                liabilities: Some(-5.0),
                equity: Some(-5.0),
                current_assets: Some(f64::NAN),
                ..Default::default()
            },
        ];

        for record in &records {
            let scores = compute_health_scores(record);
            assert_eq!(scores.len(), 4);
            for (score, category) in scores.iter().zip(HealthCategory::ALL) {
                assert_eq!(score.category, category);
                assert!(score.score <= MAX_SCORE);
                assert_eq!(score.max_score, MAX_SCORE);
            }
        }
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(HealthStatus::from_score(7.0), HealthStatus::Moderate);
        assert_eq!(HealthStatus::from_score(7.01), HealthStatus::Healthy);
        assert_eq!(HealthStatus::from_score(4.0), HealthStatus::Risky);
        assert_eq!(HealthStatus::from_score(4.5), HealthStatus::Moderate);
    }
}
