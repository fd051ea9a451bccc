use chem_adapters::AdapterError;
use chem_domain::DomainError;
use thiserror::Error;

/// Taxonomía de fallos de una petición.
///
/// `InvalidStructure` y `UnknownCalculator` son terminales y se detectan antes
/// de contactar ningún backend. El resto se convierte en un `CanonicalResult`
/// con `status=error` dentro del dispatcher.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("invalid structure: {0}")]
    InvalidStructure(String),
    #[error("unknown calculator: {0}")]
    UnknownCalculator(String),
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("backend error: {0}")]
    BackendError(String),
    #[error("property not found: {0}")]
    PropertyNotFound(String),
}

impl DispatchError {
    /// Código estable para clientes.
    pub fn code(&self) -> &'static str {
        match self {
            DispatchError::InvalidStructure(_) => "InvalidStructure",
            DispatchError::UnknownCalculator(_) => "UnknownCalculator",
            DispatchError::BackendUnavailable(_) => "BackendUnavailable",
            DispatchError::BackendError(_) => "BackendError",
            DispatchError::PropertyNotFound(_) => "PropertyNotFound",
        }
    }
}

impl From<DomainError> for DispatchError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidStructure(s) => DispatchError::InvalidStructure(s),
            DomainError::UnknownCalculator(s) => DispatchError::UnknownCalculator(s),
            DomainError::Serialization(s) => DispatchError::BackendError(s),
        }
    }
}

impl From<AdapterError> for DispatchError {
    fn from(err: AdapterError) -> Self {
        match err {
            AdapterError::Unavailable(s) => DispatchError::BackendUnavailable(s),
            AdapterError::Backend(s) | AdapterError::InvalidRequest(s) => DispatchError::BackendError(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_errors_keep_their_category() {
        let unavailable: DispatchError = AdapterError::Unavailable("timeout".into()).into();
        assert_eq!(unavailable.code(), "BackendUnavailable");
        let invalid: DispatchError = AdapterError::InvalidRequest("mass missing".into()).into();
        assert_eq!(invalid, DispatchError::BackendError("mass missing".into()));
    }

    #[test]
    fn domain_errors_map_to_terminal_variants() {
        let e: DispatchError = DomainError::InvalidStructure("C1CC".into()).into();
        assert_eq!(e.to_string(), "invalid structure: C1CC");
        let e: DispatchError = DomainError::UnknownCalculator("cts".into()).into();
        assert_eq!(e.code(), "UnknownCalculator");
    }
}
