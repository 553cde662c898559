//! # Financial Statement Analyzer
//!
//! A library for turning an uploaded financial statement into the figures a
//! dashboard needs: computed ratios, category health scores and rule-based
//! narrative insights.
//!
//! ## Core Concepts
//!
//! - **Financial Record**: Loosely-typed statement fields where absent and zero are the same thing
//! - **Ratios**: Up to nine named ratios, each emitted only when its inputs are present
//! - **Health Scores**: Four fixed categories scored 0-10, with a neutral default when data is missing
//! - **Insights**: Narrative text chosen from a threshold rule table
//!
//! The metrics engine is pure: every function here derives its output from the
//! record alone and never fails.
//!
//! ## Example
//!
//! ```rust
//! use financial_statement_analyzer::*;
//!
//! let record = FinancialRecord {
//!     current_assets: Some(1_200_000.0),
//!     current_liabilities: Some(400_000.0),
//!     ..Default::default()
//! };
//!
//! let ratios = compute_ratios(&record);
//! assert_eq!(ratios[0].value, "3.00");
//!
//! let health = HealthReport::from_record(&record);
//! assert_eq!(health.scores[1].score, 9);
//! ```

pub mod auth;
pub mod charts;
pub mod config;
pub mod error;
pub mod health;
pub mod ingestion;
pub mod insights;
pub mod ratios;
pub mod report;
pub mod schema;
pub mod store;
pub mod utils;

pub use auth::{authenticate, Credentials, User};
pub use charts::{tooltip_label, CashFlowPoint, ChartSet, ExpenseSlice, RevenueTrendPoint};
pub use config::{AnalyzerConfig, UploadPolicy};
pub use error::{FinancialAnalysisError, Result};
pub use health::{
    compute_health_scores, overall_score, HealthCategory, HealthReport, HealthScore, HealthStatus,
};
pub use ingestion::{ingest, sample_record, validate_upload, FinancialDocument, UploadRequest};
pub use insights::{generate_insights, key_recommendations, Insight, InsightSignal, KeyMetrics};
pub use ratios::{compute_ratios, group_by_category, RatioCategory, RatioMetric, Signal};
pub use schema::*;
pub use store::{DocumentStore, Session};

use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Everything shown for one document on the analysis view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialAnalysis {
    pub document_id: String,
    pub document_name: String,
    pub statement_type: StatementType,
    pub key_metrics: KeyMetrics,
    pub ratios: Vec<RatioMetric>,
    pub health: HealthReport,
    pub insights: Vec<Insight>,
    pub recommendations: Vec<String>,
    pub charts: ChartSet,
}

impl FinancialAnalysis {
    pub fn has_ratios(&self) -> bool {
        !self.ratios.is_empty()
    }
}

pub struct FinancialAnalyzer {
    config: AnalyzerConfig,
}

impl Default for FinancialAnalyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl FinancialAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn analyze(&self, document: &FinancialDocument) -> FinancialAnalysis {
        info!(
            "Analyzing document {} ({}) as {}",
            document.id, document.name, document.statement_type
        );

        let record = &document.record;
        let ratios = compute_ratios(record);
        let health = HealthReport::from_record(record);
        let (insights, recommendations) = if self.config.include_insights {
            (generate_insights(record), key_recommendations())
        } else {
            (Vec::new(), Vec::new())
        };

        debug!(
            "Analysis produced {} ratios, {} insights, overall health {:.1}",
            ratios.len(),
            insights.len(),
            health.overall_score
        );

        FinancialAnalysis {
            document_id: document.id.clone(),
            document_name: document.name.clone(),
            statement_type: document.statement_type,
            key_metrics: KeyMetrics::from_record(record),
            ratios,
            health,
            insights,
            recommendations,
            charts: ChartSet::from_record(record, document.statement_type),
        }
    }
}

pub fn analyze_document(document: &FinancialDocument) -> FinancialAnalysis {
    FinancialAnalyzer::default().analyze(document)
}
