use crate::schema::{FinancialRecord, MonthlyPeriod, StatementType};
use crate::utils::{coalesce, format_thousands, to_fixed};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueTrendPoint {
    pub label: String,
    pub revenue: f64,
    pub expenses: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSlice {
    pub label: String,
    pub amount: f64,
    pub percentage: f64,
    /// Slice caption, e.g. `Salaries (33%)`.
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowPoint {
    pub label: String,
    pub operating: f64,
    pub investing: f64,
    pub financing: f64,
    pub ending: f64,
}

/// Series handed to the chart-rendering layer. A `None` series is not drawn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSet {
    pub revenue_trend: Option<Vec<RevenueTrendPoint>>,
    pub expense_breakdown: Option<Vec<ExpenseSlice>>,
    pub cash_flow: Option<Vec<CashFlowPoint>>,
}

impl ChartSet {
    pub fn from_record(record: &FinancialRecord, statement_type: StatementType) -> Self {
        let revenue_trend = revenue_trend(record);
        let cash_flow = if statement_type == StatementType::Cashflow {
            cash_flow_activity(record)
        } else {
            None
        };

        Self {
            revenue_trend,
            expense_breakdown: expense_slices(record),
            cash_flow,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.revenue_trend.is_none() && self.expense_breakdown.is_none() && self.cash_flow.is_none()
    }
}

fn revenue_trend(record: &FinancialRecord) -> Option<Vec<RevenueTrendPoint>> {
    let points: Vec<RevenueTrendPoint> = record
        .months()
        .iter()
        .filter_map(|period| match period {
            MonthlyPeriod::Operating(m) => Some(RevenueTrendPoint {
                label: m.month.clone(),
                revenue: m.revenue(),
                expenses: m.expenses(),
                profit: coalesce(&[m.profit]),
            }),
            MonthlyPeriod::CashFlow(_) => None,
        })
        .collect();

    (!points.is_empty()).then_some(points)
}

fn expense_slices(record: &FinancialRecord) -> Option<Vec<ExpenseSlice>> {
    let breakdown = record.expense_breakdown.as_ref()?;
    Some(
        breakdown
            .iter()
            .map(|e| ExpenseSlice {
                label: e.category.clone(),
                amount: e.amount,
                percentage: e.percentage,
                caption: format!("{} ({}%)", e.category, to_fixed(e.percentage, 0)),
            })
            .collect(),
    )
}

fn cash_flow_activity(record: &FinancialRecord) -> Option<Vec<CashFlowPoint>> {
    let points: Vec<CashFlowPoint> = record
        .months()
        .iter()
        .filter_map(|period| match period {
            MonthlyPeriod::CashFlow(m) => Some(CashFlowPoint {
                label: m.month.clone(),
                operating: m.operating,
                investing: m.investing(),
                financing: m.financing(),
                ending: m.ending(),
            }),
            MonthlyPeriod::Operating(_) => None,
        })
        .collect();

    (!points.is_empty()).then_some(points)
}

/// Tooltip text for a chart value, e.g. `$40K`.
pub fn tooltip_label(value: f64) -> String {
    format_thousands(value)
}
