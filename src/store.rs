use crate::auth::{authenticate, Credentials, User};
use crate::config::AnalyzerConfig;
use crate::error::{FinancialAnalysisError, Result};
use crate::ingestion::{ingest, FinancialDocument, UploadRequest};
use crate::utils::timestamped_id;
use crate::{FinancialAnalysis, FinancialAnalyzer};
use chrono::{DateTime, Duration, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// In-memory list of uploaded documents plus the current selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentStore {
    documents: Vec<FinancialDocument>,
    selected: Option<String>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a document and selects it. A clashing id is made unique by
    /// advancing its timestamp suffix.
    pub fn add(&mut self, mut document: FinancialDocument) -> &FinancialDocument {
        let mut stamp = document.uploaded_at;
        while self.contains(&document.id) {
            stamp += Duration::milliseconds(1);
            document.id = timestamped_id("doc", stamp);
        }

        debug!("Storing document {} ({})", document.id, document.name);
        self.selected = Some(document.id.clone());
        self.documents.push(document);
        &self.documents[self.documents.len() - 1]
    }

    pub fn contains(&self, id: &str) -> bool {
        self.documents.iter().any(|d| d.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&FinancialDocument> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn select(&mut self, id: &str) -> Result<&FinancialDocument> {
        let index = self
            .documents
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| FinancialAnalysisError::DocumentNotFound(id.to_string()))?;
        self.selected = Some(id.to_string());
        Ok(&self.documents[index])
    }

    pub fn selected(&self) -> Option<&FinancialDocument> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    pub fn remove(&mut self, id: &str) -> Result<FinancialDocument> {
        let index = self
            .documents
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| FinancialAnalysisError::DocumentNotFound(id.to_string()))?;
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        Ok(self.documents.remove(index))
    }

    pub fn documents(&self) -> &[FinancialDocument] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Application state for one signed-in user.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub config: AnalyzerConfig,
    pub store: DocumentStore,
}

impl Session {
    pub fn new(user: User, config: AnalyzerConfig) -> Self {
        Self {
            user,
            config,
            store: DocumentStore::new(),
        }
    }

    /// Signs in against the session config's password policy.
    pub fn sign_in(
        credentials: &Credentials,
        config: AnalyzerConfig,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let user = authenticate(credentials, &config, now)?;
        Ok(Self::new(user, config))
    }

    /// Ingests an upload, stores it and selects it.
    pub fn upload(
        &mut self,
        request: &UploadRequest,
        uploaded_at: DateTime<Utc>,
    ) -> Result<&FinancialDocument> {
        let document = ingest(request, &self.config.upload, uploaded_at)?;
        info!(
            "User {} uploaded '{}' as {}",
            self.user.email, document.name, document.statement_type
        );
        Ok(self.store.add(document))
    }

    /// Analysis of the selected document, if any.
    pub fn analyze_selected(&self) -> Option<FinancialAnalysis> {
        let analyzer = FinancialAnalyzer::new(self.config.clone());
        self.store.selected().map(|doc| analyzer.analyze(doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::sample_record;
    use crate::schema::StatementType;
    use chrono::TimeZone;

    fn document(millis: i64, statement_type: StatementType) -> FinancialDocument {
        let uploaded_at = Utc.timestamp_millis_opt(millis).unwrap();
        FinancialDocument {
            id: format!("doc-{}", millis),
            name: format!("{}.pdf", millis),
            uploaded_at,
            statement_type,
            record: sample_record(statement_type),
        }
    }

    #[test]
    fn test_add_selects_newest() {
        let mut store = DocumentStore::new();
        assert!(store.selected().is_none());

        store.add(document(1_000, StatementType::Income));
        store.add(document(2_000, StatementType::Balance));

        assert_eq!(store.len(), 2);
        assert_eq!(store.selected().unwrap().id, "doc-2000");

        store.select("doc-1000").unwrap();
        assert_eq!(store.selected().unwrap().statement_type, StatementType::Income);
    }

    #[test]
    fn test_duplicate_ids_are_made_unique() {
        let mut store = DocumentStore::new();
        store.add(document(1_000, StatementType::Income));
        let second = store.add(document(1_000, StatementType::Income)).id.clone();
        assert_eq!(second, "doc-1001");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_select_and_remove_unknown() {
        let mut store = DocumentStore::new();
        assert!(matches!(
            store.select("doc-1"),
            Err(FinancialAnalysisError::DocumentNotFound(_))
        ));
        assert!(store.remove("doc-1").is_err());
    }

    #[test]
    fn test_remove_clears_selection() {
        let mut store = DocumentStore::new();
        store.add(document(1_000, StatementType::Income));
        store.add(document(2_000, StatementType::Balance));

        let removed = store.remove("doc-2000").unwrap();
        assert_eq!(removed.statement_type, StatementType::Balance);
        assert!(store.selected().is_none());
        assert_eq!(store.documents()[0].id, "doc-1000");
    }

    #[test]
    fn test_session_upload_and_analyze() {
        let user = User {
            id: "user-1".to_string(),
            email: "owner@example.com".to_string(),
        };
        let mut session = Session::new(user, AnalyzerConfig::default());
        assert!(session.analyze_selected().is_none());

        let request = UploadRequest::new("balance.pdf", 2_048, StatementType::Balance);
        let at = Utc.timestamp_millis_opt(5_000).unwrap();
        session.upload(&request, at).unwrap();

        let analysis = session.analyze_selected().unwrap();
        assert_eq!(analysis.document_id, "doc-5000");
        assert_eq!(analysis.statement_type, StatementType::Balance);
        assert!(!analysis.ratios.is_empty());

        let rejected = UploadRequest::new("balance.xlsx", 2_048, StatementType::Balance);
        assert!(session.upload(&rejected, at).is_err());
        assert_eq!(session.store.len(), 1);
    }

    #[test]
    fn test_sign_in_uses_session_password_policy() {
        let credentials = Credentials {
            email: "owner@example.com".to_string(),
            password: "seven77".to_string(),
        };
        let now = Utc.timestamp_millis_opt(9_000).unwrap();

        let strict = AnalyzerConfig {
            min_password_length: 8,
            ..Default::default()
        };
        assert!(matches!(
            Session::sign_in(&credentials, strict, now),
            Err(FinancialAnalysisError::PasswordTooShort(8))
        ));

        let session = Session::sign_in(&credentials, AnalyzerConfig::default(), now).unwrap();
        assert_eq!(session.user.id, "user-9000");
        assert!(session.store.is_empty());
    }
}
