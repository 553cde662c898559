use crate::health::HealthStatus;
use crate::ratios::group_by_category;
use crate::utils::{format_millions, format_multiple, to_fixed};
use crate::FinancialAnalysis;

pub const NOT_ENOUGH_DATA: &str = "Not enough data to calculate ratios. Upload more financial documents to get comprehensive analysis.";

impl FinancialAnalysis {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Ratio table as CSV, one row per emitted ratio.
    pub fn ratios_to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str("Category,Ratio,Value,Signal,Interpretation\n");

        for ratio in &self.ratios {
            output.push_str(&format!(
                "{},{},{},{:?},{}\n",
                csv_field(ratio.category.label()),
                csv_field(&ratio.name),
                csv_field(&ratio.value),
                ratio.signal,
                csv_field(&ratio.interpretation)
            ));
        }

        output
    }

    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# Financial Analysis - {}\n\n", self.document_name));
        output.push_str(&format!("**Statement Type:** {}\n\n", self.statement_type));

        let metrics = &self.key_metrics;
        output.push_str("## Key Metrics\n\n");
        output.push_str(&format!("- Total Revenue: {}\n", format_millions(metrics.revenue)));
        output.push_str(&format!(
            "- Net Profit: {} ({}% margin)\n",
            format_millions(metrics.profit),
            to_fixed(metrics.profit_margin, 1)
        ));
        output.push_str(&format!(
            "- Total Expenses: {}\n",
            format_millions(metrics.expenses)
        ));
        let current_ratio = metrics
            .current_ratio
            .map(format_multiple)
            .unwrap_or_else(|| "N/A".to_string());
        output.push_str(&format!("- Current Ratio: {}\n\n", current_ratio));

        output.push_str("## Financial Ratios\n\n");
        if self.ratios.is_empty() {
            output.push_str(NOT_ENOUGH_DATA);
            output.push_str("\n\n");
        } else {
            for (category, ratios) in group_by_category(&self.ratios) {
                output.push_str(&format!("### {}\n\n", category));
                output.push_str("| Ratio | Value | Signal | Interpretation |\n");
                output.push_str("|-------|-------|--------|----------------|\n");
                for ratio in ratios {
                    output.push_str(&format!(
                        "| {} | {} | {:?} | {} |\n",
                        ratio.name, ratio.value, ratio.signal, ratio.interpretation
                    ));
                }
                output.push('\n');
            }
        }

        let health = &self.health;
        output.push_str("## Financial Health\n\n");
        output.push_str(&format!(
            "**Overall:** {}/10 ({})\n\n{}\n\n",
            to_fixed(health.overall_score, 1),
            health.overall_status,
            health.summary
        ));
        for score in &health.scores {
            let marker = match score.status {
                HealthStatus::Healthy => "",
                HealthStatus::Moderate => " [MODERATE]",
                HealthStatus::Risky => " [RISKY]",
            };
            output.push_str(&format!(
                "- **{}**: {}/{}{}\n",
                score.category, score.score, score.max_score, marker
            ));
            for detail in &score.details {
                output.push_str(&format!("  - {}\n", detail));
            }
        }
        output.push('\n');

        output.push_str("### Key Risks\n\n");
        for risk in &health.key_risks {
            output.push_str(&format!("- {}\n", risk));
        }
        output.push_str("\n### Opportunities for Improvement\n\n");
        for opportunity in &health.opportunities {
            output.push_str(&format!("- {}\n", opportunity));
        }

        if !self.insights.is_empty() {
            output.push_str("\n## Insights\n\n");
            for insight in &self.insights {
                output.push_str(&format!("### {} ({:?})\n\n{}\n\n", insight.title, insight.signal, insight.content));
            }
        }

        if !self.recommendations.is_empty() {
            output.push_str("## Key Recommendations\n\n");
            for recommendation in &self.recommendations {
                output.push_str(&format!("- {}\n", recommendation));
            }
        }

        output
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::{sample_record, FinancialDocument};
    use crate::schema::StatementType;
    use crate::analyze_document;
    use chrono::Utc;

    fn analysis(statement_type: StatementType) -> FinancialAnalysis {
        analyze_document(&FinancialDocument {
            id: "doc-1".to_string(),
            name: "Test Corp.pdf".to_string(),
            uploaded_at: Utc::now(),
            statement_type,
            record: sample_record(statement_type),
        })
    }

    #[test]
    fn test_markdown_for_balance_sheet() {
        let markdown = analysis(StatementType::Balance).to_markdown();

        assert!(markdown.contains("# Financial Analysis - Test Corp.pdf"));
        assert!(markdown.contains("**Statement Type:** Balance Sheet"));
        assert!(markdown.contains("- Current Ratio: 3.00"));
        assert!(markdown.contains("### Solvency"));
        assert!(markdown.contains("| Current Ratio | 3.00 | Positive | Strong liquidity position |"));
        assert!(markdown.contains("**Overall:** 6.0/10 (Moderate)"));
        assert!(markdown.contains("- **Cash Flow**: 1/10 [RISKY]"));
    }

    #[test]
    fn test_markdown_without_ratios() {
        let markdown = analysis(StatementType::Other).to_markdown();
        assert!(markdown.contains(NOT_ENOUGH_DATA));
        assert!(markdown.contains("- Current Ratio: N/A"));
        assert!(!markdown.contains("### Profitability"));
    }

    #[test]
    fn test_csv_quotes_fields() {
        assert_eq!(csv_field("Cash Flow"), "Cash Flow");
        assert_eq!(csv_field("a,b"), "\"a,b\"");

        let csv = analysis(StatementType::Income).ratios_to_csv();
        assert!(csv.starts_with("Category,Ratio,Value,Signal,Interpretation\n"));
        assert!(csv.contains("Profitability,Gross Profit Margin,60.0%,Positive,Excellent cost control"));
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn test_json_round_trip() {
        let original = analysis(StatementType::Cashflow);
        let json = original.to_json().unwrap();
        assert!(json.contains("\"statementType\": \"cashflow\""));
        let parsed: FinancialAnalysis = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.health.overall_score, original.health.overall_score);
    }
}
