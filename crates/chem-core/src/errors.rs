//! Errores específicos del core (simples por ahora).

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CacheError {
    #[error("cache backend error: {0}")] Backend(String),
    #[error("cache serialization error: {0}")] Serialization(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(e: serde_json::Error) -> Self {
        CacheError::Serialization(e.to_string())
    }
}
