use crate::utils::coalesce;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatementType {
    #[schemars(description = "Income Statement (P&L): revenue, cost of sales, expenses, profit")]
    Income,

    #[schemars(description = "Balance Sheet: assets, liabilities and equity at a point in time")]
    Balance,

    #[schemars(description = "Cash Flow Statement: operating, investing and financing activities")]
    Cashflow,

    #[default]
    #[schemars(description = "Any other financial document")]
    Other,
}

impl StatementType {
    pub const ALL: [StatementType; 4] = [
        StatementType::Income,
        StatementType::Balance,
        StatementType::Cashflow,
        StatementType::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StatementType::Income => "Income Statement",
            StatementType::Balance => "Balance Sheet",
            StatementType::Cashflow => "Cash Flow",
            StatementType::Other => "Other",
        }
    }
}

impl fmt::Display for StatementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One month of income-statement style activity. Missing figures read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OperatingMonth {
    #[serde(default)]
    #[schemars(description = "Display label for the month (e.g. 'Jan')")]
    pub month: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expenses: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profit: Option<f64>,
}

impl OperatingMonth {
    pub fn revenue(&self) -> f64 {
        coalesce(&[self.revenue])
    }

    pub fn expenses(&self) -> f64 {
        coalesce(&[self.expenses])
    }
}

/// One month of cash-flow activity, split by section.
///
/// `operating` is what marks an entry as a cash-flow month; the other
/// sections read as zero when missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CashFlowMonth {
    #[serde(default)]
    #[schemars(description = "Display label for the month (e.g. 'Jan')")]
    pub month: String,
    pub operating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Closing cash balance for the month")]
    pub ending: Option<f64>,
}

impl CashFlowMonth {
    pub fn investing(&self) -> f64 {
        coalesce(&[self.investing])
    }

    pub fn financing(&self) -> f64 {
        coalesce(&[self.financing])
    }

    pub fn ending(&self) -> f64 {
        coalesce(&[self.ending])
    }
}

// Cash-flow months are tried first: every operating field is optional, so
// the operating shape would otherwise swallow them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum MonthlyPeriod {
    CashFlow(CashFlowMonth),
    Operating(OperatingMonth),
}

impl MonthlyPeriod {
    pub fn label(&self) -> &str {
        match self {
            MonthlyPeriod::Operating(m) => &m.month,
            MonthlyPeriod::CashFlow(m) => &m.month,
        }
    }

    /// `None` for cash-flow months and for operating months without a profit.
    pub fn profit(&self) -> Option<f64> {
        match self {
            MonthlyPeriod::Operating(m) => m.profit,
            MonthlyPeriod::CashFlow(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExpenseCategory {
    pub category: String,
    pub amount: f64,
    #[schemars(description = "Share of total operating expenses, in whole percent")]
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AssetItem {
    pub name: String,
    pub value: f64,
}

/// Raw statement fields as produced by the upload workflow.
///
/// Every field is optional. Absent, zero and NaN values are all read as zero
/// by the accessor methods, which is what the metrics engine consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_of_goods_sold: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gross_profit: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_expenses: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_income: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_expense: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_expense: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_income: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Alias of netIncome, used when netIncome is absent or zero")]
    pub profit: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liabilities: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_assets: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_liabilities: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_debt: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operating_cash_flow: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investing_cash_flow: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_cash_flow: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Ordered monthly figures, either operating or cash-flow shaped")]
    pub months: Option<Vec<MonthlyPeriod>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_breakdown: Option<Vec<ExpenseCategory>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_breakdown: Option<Vec<AssetItem>>,
}

impl FinancialRecord {
    pub fn revenue(&self) -> f64 {
        coalesce(&[self.revenue])
    }

    pub fn cost_of_goods_sold(&self) -> f64 {
        coalesce(&[self.cost_of_goods_sold])
    }

    pub fn operating_expenses(&self) -> f64 {
        coalesce(&[self.operating_expenses])
    }

    /// Net income, falling back to `profit`.
    pub fn net_income(&self) -> f64 {
        coalesce(&[self.net_income, self.profit])
    }

    /// Headline profit, falling back to `net_income`.
    pub fn headline_profit(&self) -> f64 {
        coalesce(&[self.profit, self.net_income])
    }

    pub fn assets(&self) -> f64 {
        coalesce(&[self.assets])
    }

    pub fn liabilities(&self) -> f64 {
        coalesce(&[self.liabilities])
    }

    pub fn equity(&self) -> f64 {
        coalesce(&[self.equity])
    }

    pub fn current_assets(&self) -> f64 {
        coalesce(&[self.current_assets])
    }

    pub fn current_liabilities(&self) -> f64 {
        coalesce(&[self.current_liabilities])
    }

    pub fn operating_cash_flow(&self) -> f64 {
        coalesce(&[self.operating_cash_flow])
    }

    pub fn total_expenses(&self) -> f64 {
        self.cost_of_goods_sold() + self.operating_expenses()
    }

    pub fn months(&self) -> &[MonthlyPeriod] {
        self.months.as_deref().unwrap_or(&[])
    }

    pub fn expense_breakdown(&self) -> &[ExpenseCategory] {
        self.expense_breakdown.as_deref().unwrap_or(&[])
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(FinancialRecord)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}
