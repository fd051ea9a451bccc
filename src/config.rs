//! Configuración central de la aplicación.
//!
//! Se lee una vez desde el entorno (`.env` incluido) y se pasa explícitamente
//! al registry y al dispatcher; no hay configuración global.
use chem_persistence::{init_dotenv, DbConfig};
use std::env;
use std::time::Duration;

use crate::errors::CoreError;

pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_REST_BASE_URL: &str = "http://localhost:8000/cts/rest";

/// URL base de cada servidor de cálculo. Un servidor ausente deja sus
/// calculadoras sin registrar.
#[derive(Debug, Clone, Default)]
pub struct BackendServers {
    /// JChem: `chemaxon` y `cheminfo`.
    pub chemaxon: Option<String>,
    /// EPI Suite: `epi` y `measured`.
    pub epi: Option<String>,
    pub test: Option<String>,
    pub sparc: Option<String>,
    pub opera: Option<String>,
    pub metabolizer: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub servers: BackendServers,
    pub backend_timeout: Duration,
    /// Base de los enlaces publicados en `metaInfo`.
    pub rest_base_url: String,
    /// `None` => caché en memoria.
    pub database: Option<DbConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { servers: BackendServers::default(),
               backend_timeout: Duration::from_secs(DEFAULT_BACKEND_TIMEOUT_SECS),
               rest_base_url: DEFAULT_REST_BASE_URL.to_string(),
               database: None }
    }
}

fn server(var: &str) -> Option<String> {
    env::var(var).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl AppConfig {
    pub fn from_env() -> Result<Self, CoreError> {
        init_dotenv();
        let servers = BackendServers { chemaxon: server("CTS_CHEMAXON_SERVER"),
                                       epi: server("CTS_EPI_SERVER"),
                                       test: server("CTS_TEST_SERVER"),
                                       sparc: server("CTS_SPARC_SERVER"),
                                       opera: server("CTS_OPERA_SERVER"),
                                       metabolizer: server("CTS_METABOLIZER_SERVER") };
        let backend_timeout = match env::var("CTS_BACKEND_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.trim()
                                   .parse()
                                   .map_err(|_| CoreError::Config(format!("CTS_BACKEND_TIMEOUT_SECS inválido: {raw}")))?;
                if secs == 0 {
                    return Err(CoreError::Config("CTS_BACKEND_TIMEOUT_SECS debe ser > 0".into()));
                }
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_BACKEND_TIMEOUT_SECS),
        };
        let rest_base_url = server("CTS_REST_BASE_URL").unwrap_or_else(|| DEFAULT_REST_BASE_URL.to_string());
        Ok(Self { servers,
                  backend_timeout,
                  rest_base_url,
                  database: DbConfig::from_env() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_bounded_timeout_and_no_backends() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.backend_timeout, Duration::from_secs(30));
        assert!(cfg.servers.chemaxon.is_none());
        assert!(cfg.database.is_none());
        assert_eq!(cfg.rest_base_url, DEFAULT_REST_BASE_URL);
    }
}
