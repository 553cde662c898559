use crate::error::{FinancialAnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadPolicy {
    pub max_size_bytes: u64,
    pub accepted_mime_type: String,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            accepted_mime_type: "application/pdf".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub upload: UploadPolicy,
    pub min_password_length: usize,
    /// When false, analyses skip the narrative insight rules.
    pub include_insights: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            upload: UploadPolicy::default(),
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
            include_insights: true,
        }
    }
}

impl AnalyzerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AnalyzerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.upload.max_size_bytes == 0 {
            return Err(FinancialAnalysisError::InvalidConfig(
                "upload.max_size_bytes must be greater than zero".to_string(),
            ));
        }
        if self.upload.accepted_mime_type.trim().is_empty() {
            return Err(FinancialAnalysisError::InvalidConfig(
                "upload.accepted_mime_type must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
