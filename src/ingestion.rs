use crate::config::UploadPolicy;
use crate::error::{FinancialAnalysisError, Result};
use crate::schema::{
    AssetItem, CashFlowMonth, ExpenseCategory, FinancialRecord, MonthlyPeriod, OperatingMonth,
    StatementType,
};
use crate::utils::timestamped_id;
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// A file submitted through the upload form.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file_name: String,
    /// Declared MIME type. Guessed from the file extension when absent.
    pub content_type: Option<String>,
    pub size_bytes: u64,
    pub statement_type: StatementType,
}

impl UploadRequest {
    pub fn new(file_name: impl Into<String>, size_bytes: u64, statement_type: StatementType) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            size_bytes,
            statement_type,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    fn detected_mime_type(&self) -> String {
        match &self.content_type {
            Some(declared) => declared.trim().to_ascii_lowercase(),
            None => mime_guess::from_path(&self.file_name)
                .first()
                .map(|mime| mime.essence_str().to_string())
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

/// An uploaded statement together with the record extracted from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialDocument {
    pub id: String,
    pub name: String,
    pub uploaded_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub statement_type: StatementType,
    pub record: FinancialRecord,
}

pub fn validate_upload(request: &UploadRequest, policy: &UploadPolicy) -> Result<()> {
    if request.file_name.trim().is_empty() {
        return Err(FinancialAnalysisError::MissingFile);
    }

    let detected = request.detected_mime_type();
    if detected != policy.accepted_mime_type {
        return Err(FinancialAnalysisError::InvalidFileType {
            file_name: request.file_name.clone(),
            detected,
        });
    }

    if request.size_bytes > policy.max_size_bytes {
        return Err(FinancialAnalysisError::FileTooLarge {
            file_name: request.file_name.clone(),
            size: request.size_bytes,
            limit: policy.max_size_bytes,
        });
    }

    Ok(())
}

/// Validates the upload and extracts its record.
pub fn ingest(
    request: &UploadRequest,
    policy: &UploadPolicy,
    uploaded_at: DateTime<Utc>,
) -> Result<FinancialDocument> {
    if let Err(e) = validate_upload(request, policy) {
        warn!("Rejected upload '{}': {}", request.file_name, e);
        return Err(e);
    }

    let record = sample_record(request.statement_type);
    info!(
        "Extracted {} data from '{}'",
        request.statement_type, request.file_name
    );

    Ok(FinancialDocument {
        id: timestamped_id("doc", uploaded_at),
        name: request.file_name.clone(),
        uploaded_at,
        statement_type: request.statement_type,
        record,
    })
}

/// Canned record for a statement type. Stands in for real PDF extraction.
pub fn sample_record(statement_type: StatementType) -> FinancialRecord {
    match statement_type {
        StatementType::Income => FinancialRecord {
            revenue: Some(1_500_000.0),
            cost_of_goods_sold: Some(600_000.0),
            gross_profit: Some(900_000.0),
            operating_expenses: Some(400_000.0),
            operating_income: Some(500_000.0),
            interest_expense: Some(50_000.0),
            tax_expense: Some(112_500.0),
            net_income: Some(337_500.0),
            profit: Some(337_500.0),
            months: Some(sample_operating_months()),
            expense_breakdown: Some(sample_expense_breakdown()),
            ..Default::default()
        },
        StatementType::Balance => FinancialRecord {
            revenue: Some(1_500_000.0),
            assets: Some(2_000_000.0),
            liabilities: Some(800_000.0),
            equity: Some(1_200_000.0),
            current_assets: Some(1_200_000.0),
            current_liabilities: Some(400_000.0),
            cost_of_goods_sold: Some(600_000.0),
            operating_expenses: Some(400_000.0),
            net_income: Some(150_000.0),
            profit: Some(150_000.0),
            months: Some(sample_operating_months()),
            expense_breakdown: Some(sample_expense_breakdown()),
            asset_breakdown: Some(vec![
                asset("Cash", 400_000.0),
                asset("Accounts Receivable", 500_000.0),
                asset("Inventory", 300_000.0),
                asset("Property & Equipment", 800_000.0),
            ]),
            ..Default::default()
        },
        StatementType::Cashflow => FinancialRecord {
            revenue: Some(1_500_000.0),
            cost_of_goods_sold: Some(600_000.0),
            operating_expenses: Some(400_000.0),
            net_income: Some(337_500.0),
            profit: Some(337_500.0),
            months: Some(vec![
                cash_month("Jan", 50_000.0, -30_000.0, 0.0, 100_000.0),
                cash_month("Feb", 55_000.0, -25_000.0, 20_000.0, 150_000.0),
                cash_month("Mar", 60_000.0, -35_000.0, 0.0, 175_000.0),
                cash_month("Apr", 65_000.0, -40_000.0, -15_000.0, 185_000.0),
                cash_month("May", 70_000.0, -20_000.0, 0.0, 235_000.0),
                cash_month("Jun", 75_000.0, -30_000.0, 0.0, 280_000.0),
            ]),
            free_cash_flow: Some(185_000.0),
            operating_cash_flow: Some(375_000.0),
            investing_cash_flow: Some(-180_000.0),
            ..Default::default()
        },
        StatementType::Other => FinancialRecord::default(),
    }
}

fn sample_operating_months() -> Vec<MonthlyPeriod> {
    [
        ("Jan", 100_000.0, 60_000.0, 40_000.0),
        ("Feb", 110_000.0, 62_000.0, 48_000.0),
        ("Mar", 120_000.0, 65_000.0, 55_000.0),
        ("Apr", 125_000.0, 68_000.0, 57_000.0),
        ("May", 130_000.0, 70_000.0, 60_000.0),
        ("Jun", 140_000.0, 75_000.0, 65_000.0),
    ]
    .iter()
    .map(|(month, revenue, expenses, profit)| {
        MonthlyPeriod::Operating(OperatingMonth {
            month: month.to_string(),
            revenue: Some(*revenue),
            expenses: Some(*expenses),
            profit: Some(*profit),
        })
    })
    .collect()
}

fn sample_expense_breakdown() -> Vec<ExpenseCategory> {
    [
        ("Salaries", 200_000.0, 33.0),
        ("Marketing", 120_000.0, 20.0),
        ("Operations", 100_000.0, 17.0),
        ("Technology", 80_000.0, 13.0),
        ("Other", 100_000.0, 17.0),
    ]
    .iter()
    .map(|(category, amount, percentage)| ExpenseCategory {
        category: category.to_string(),
        amount: *amount,
        percentage: *percentage,
    })
    .collect()
}

fn asset(name: &str, value: f64) -> AssetItem {
    AssetItem {
        name: name.to_string(),
        value,
    }
}

fn cash_month(month: &str, operating: f64, investing: f64, financing: f64, ending: f64) -> MonthlyPeriod {
    MonthlyPeriod::CashFlow(CashFlowMonth {
        month: month.to_string(),
        operating,
        investing: Some(investing),
        financing: Some(financing),
        ending: Some(ending),
    })
}
