use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Duplicate identifier: login id '{login_id}' is already taken")]
    DuplicateIdentifier { login_id: String },

    /// Covers both an unknown login id and a wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn duplicate_identifier(login_id: impl Into<String>) -> Self {
        Self::DuplicateIdentifier {
            login_id: login_id.into(),
        }
    }

    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Short, stable name of the error kind for metrics labels and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateIdentifier { .. } => "duplicate_identifier",
            Self::InvalidCredentials => "invalid_credentials",
            Self::NotFound { .. } => "not_found",
            Self::InvalidInput { .. } => "invalid_input",
            Self::Storage { .. } => "storage_failure",
            Self::Internal { .. } => "internal",
        }
    }
}
