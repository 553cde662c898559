use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinancialAnalysisError {
    #[error("No file selected for upload")]
    MissingFile,

    #[error("Invalid file type for '{file_name}': expected application/pdf, got {detected}")]
    InvalidFileType { file_name: String, detected: String },

    #[error("File '{file_name}' is {size} bytes: must be at most {limit} bytes")]
    FileTooLarge {
        file_name: String,
        size: u64,
        limit: u64,
    },

    #[error("Email and password are both required")]
    MissingCredentials,

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FinancialAnalysisError>;
