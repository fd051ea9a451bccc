use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// Backend no alcanzado o sin respuesta dentro del timeout.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    /// Backend alcanzado pero reportó un fallo (o respondió algo ilegible).
    #[error("backend error: {0}")]
    Backend(String),
    /// La petición no puede construirse para este backend.
    #[error("invalid backend request: {0}")]
    InvalidRequest(String),
}

impl AdapterError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, AdapterError::Unavailable(_))
    }
}
