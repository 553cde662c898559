//! Rule-based narrative insights.
//!
//! Insights are selected from a fixed rule table: every rule pairs a
//! condition over [`KeyMetrics`] with a text template and a signal. Nothing
//! here is generated by a model.

use crate::schema::{ExpenseCategory, FinancialRecord};
use crate::utils::{format_millions, percent_of, round_to, to_fixed};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightSignal {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub content: String,
    pub signal: InsightSignal,
}

/// Headline figures shown above the analysis tabs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyMetrics {
    pub revenue: f64,
    pub profit: f64,
    /// Cost of goods sold plus operating expenses.
    pub expenses: f64,
    /// Percent, rounded to one decimal.
    pub profit_margin: f64,
    pub current_ratio: Option<f64>,
}

impl KeyMetrics {
    pub fn from_record(record: &FinancialRecord) -> Self {
        let revenue = record.revenue();
        let profit = record.headline_profit();
        let current_assets = record.current_assets();
        let current_liabilities = record.current_liabilities();

        Self {
            revenue,
            profit,
            expenses: record.total_expenses(),
            profit_margin: round_to(percent_of(profit, revenue), 1),
            current_ratio: (current_assets != 0.0 && current_liabilities != 0.0)
                .then(|| round_to(current_assets / current_liabilities, 2)),
        }
    }

    /// Expenses as a percent of revenue, zero without revenue.
    pub fn expense_ratio(&self) -> f64 {
        percent_of(self.expenses, self.revenue)
    }
}

struct InsightRule {
    title: &'static str,
    applies: fn(&KeyMetrics) -> bool,
    render: fn(&KeyMetrics, &FinancialRecord) -> String,
    signal: fn(&KeyMetrics) -> InsightSignal,
}

const INSIGHT_RULES: &[InsightRule] = &[
    InsightRule {
        title: "Revenue vs Profit Insight",
        applies: |m| m.revenue > 0.0,
        render: render_revenue_vs_profit,
        signal: |m| {
            if m.profit_margin > 15.0 {
                InsightSignal::Positive
            } else if m.profit_margin > 5.0 {
                InsightSignal::Neutral
            } else {
                InsightSignal::Negative
            }
        },
    },
    InsightRule {
        title: "Profit Margin Trend",
        applies: |_| true,
        render: render_margin_trend,
        signal: positive_above_fifteen,
    },
    InsightRule {
        title: "Expense Breakdown",
        applies: |m| m.revenue > 0.0 && m.expenses > 0.0,
        render: render_expense_breakdown,
        signal: |m| {
            if m.expenses / m.revenue < 0.75 {
                InsightSignal::Positive
            } else {
                InsightSignal::Neutral
            }
        },
    },
    InsightRule {
        title: "Overall Financial Interpretation",
        applies: |_| true,
        render: render_overall,
        signal: positive_above_fifteen,
    },
];

fn positive_above_fifteen(metrics: &KeyMetrics) -> InsightSignal {
    if metrics.profit_margin > 15.0 {
        InsightSignal::Positive
    } else {
        InsightSignal::Neutral
    }
}

fn render_revenue_vs_profit(metrics: &KeyMetrics, _record: &FinancialRecord) -> String {
    let expense_ratio = metrics.expense_ratio();
    let profitability = if metrics.profit_margin > 20.0 {
        "strong"
    } else if metrics.profit_margin > 10.0 {
        "healthy"
    } else {
        "moderate"
    };
    let cost_note = if expense_ratio < 70.0 {
        "efficient cost management"
    } else {
        "an opportunity to optimize expenses"
    };

    format!(
        "Your company generated {} in revenue with a net profit of {}. This represents a {}% profit margin, indicating {} profitability. Operating expenses account for {}% of revenue, suggesting {}.",
        format_millions(metrics.revenue),
        format_millions(metrics.profit),
        to_fixed(metrics.profit_margin, 1),
        profitability,
        to_fixed(expense_ratio, 1),
        cost_note
    )
}

fn render_margin_trend(metrics: &KeyMetrics, _record: &FinancialRecord) -> String {
    let assessment = if metrics.profit_margin > 25.0 {
        "exceptional, indicating superior operational efficiency and strong market positioning"
    } else if metrics.profit_margin > 15.0 {
        "strong, showing healthy business fundamentals and effective cost control"
    } else if metrics.profit_margin > 8.0 {
        "moderate, with room for improvement through either revenue growth or expense optimization"
    } else {
        "below industry averages, suggesting the need to review operational efficiency and pricing strategies"
    };

    format!(
        "At {}%, your profit margin is {}. Monitor this metric monthly to identify trends and opportunities.",
        to_fixed(metrics.profit_margin, 1),
        assessment
    )
}

fn render_expense_breakdown(metrics: &KeyMetrics, record: &FinancialRecord) -> String {
    let mut content = format!(
        "Your expense structure shows operating costs consuming {}% of revenue.",
        to_fixed(metrics.expense_ratio(), 1)
    );

    if let [largest, runner_up, ..] = largest_expenses(record.expense_breakdown()).as_slice() {
        content.push_str(&format!(
            " {} represent the largest category at approximately {}% of operating expenses, followed by {} at {}%.",
            largest.category,
            to_fixed(largest.percentage, 0),
            runner_up.category.to_lowercase(),
            to_fixed(runner_up.percentage, 0)
        ));
    }

    content.push_str(" Consider benchmarking against industry standards to identify optimization opportunities. High-performing companies typically maintain operating expense ratios between 60-70% of revenue.");
    content
}

fn largest_expenses(breakdown: &[ExpenseCategory]) -> Vec<&ExpenseCategory> {
    let mut sorted: Vec<&ExpenseCategory> = breakdown.iter().collect();
    // Stable sort keeps the original order among equal amounts.
    sorted.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    sorted
}

fn render_overall(metrics: &KeyMetrics, _record: &FinancialRecord) -> String {
    let verdict = if metrics.profit_margin > 20.0 && metrics.revenue > 1_000_000.0 {
        "✓ POSITIVE: Strong financial position with healthy margins and significant revenue generation. Continue monitoring cash flow and reinvestment opportunities."
    } else if metrics.profit_margin > 10.0 && metrics.revenue > 500_000.0 {
        "✓ POSITIVE: Solid fundamentals with acceptable profitability. Focus on scaling operations while maintaining expense discipline."
    } else {
        "! NEUTRAL: Business is operationally sound but shows opportunities for improvement. Consider strategic initiatives to enhance margins or accelerate growth."
    };

    format!(
        "{} Monitor quarterly trends to ensure sustained performance.",
        verdict
    )
}

/// Applies every matching rule in table order.
pub fn generate_insights(record: &FinancialRecord) -> Vec<Insight> {
    let metrics = KeyMetrics::from_record(record);
    INSIGHT_RULES
        .iter()
        .filter(|rule| (rule.applies)(&metrics))
        .map(|rule| Insight {
            title: rule.title.to_string(),
            content: (rule.render)(&metrics, record),
            signal: (rule.signal)(&metrics),
        })
        .collect()
}

pub fn key_recommendations() -> Vec<String> {
    [
        "Review expense categories monthly to identify cost optimization opportunities",
        "Track profit margin trends alongside revenue growth to ensure profitability scales",
        "Compare your metrics against industry benchmarks quarterly for competitive positioning",
        "Monitor cash flow health alongside profitability to ensure operational sustainability",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
