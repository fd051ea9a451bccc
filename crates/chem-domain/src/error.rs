use thiserror::Error;

/// Error del dominio químico.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid structure: {0}")]
    InvalidStructure(String),

    #[error("unknown calculator: {0}")]
    UnknownCalculator(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Serialization(e.to_string())
    }
}
