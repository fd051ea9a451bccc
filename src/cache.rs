//! Selección de la caché de resultados según configuración.
use chem_core::{InMemoryResultCache, ResultCache};
use chem_persistence::{build_pool, PgResultCache, PoolProvider};
use log::info;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::CoreError;

/// Postgres si hay `DATABASE_URL`; si no, memoria del proceso.
pub fn result_cache_from_config(config: &AppConfig) -> Result<Arc<dyn ResultCache>, CoreError> {
    match &config.database {
        Some(db) => {
            let pool = build_pool(&db.url, db.min_connections, db.max_connections).map_err(|e| CoreError::Config(e.to_string()))?;
            info!("result cache: postgres (pool {}..{})", db.min_connections, db.max_connections);
            Ok(Arc::new(PgResultCache::new(PoolProvider { pool })))
        }
        None => {
            info!("result cache: in-memory");
            Ok(Arc::new(InMemoryResultCache::new()))
        }
    }
}
