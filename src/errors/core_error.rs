use thiserror::Error;

/// Fallos a nivel de proceso (configuración, E/S del binario). Nunca se
/// producen por el contenido de una petición.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Error interno: {0}")]
    Internal(String),
    #[error("Error en IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error de configuración: {0}")]
    Config(String),
    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),
}
