//! Mock sign-in. Credentials are only checked for shape; no identity
//! provider or password store is involved.

use crate::config::AnalyzerConfig;
use crate::error::{FinancialAnalysisError, Result};
use crate::utils::timestamped_id;
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
}

/// Passwords shorter than `config.min_password_length` characters are refused.
pub fn authenticate(
    credentials: &Credentials,
    config: &AnalyzerConfig,
    now: DateTime<Utc>,
) -> Result<User> {
    let min_password_length = config.min_password_length;
    if credentials.email.trim().is_empty() || credentials.password.is_empty() {
        return Err(FinancialAnalysisError::MissingCredentials);
    }
    if credentials.password.chars().count() < min_password_length {
        return Err(FinancialAnalysisError::PasswordTooShort(min_password_length));
    }

    let user = User {
        id: timestamped_id("user", now),
        email: credentials.email.trim().to_string(),
    };
    info!("Signed in {}", user.email);
    Ok(user)
}
