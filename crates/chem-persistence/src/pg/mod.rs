//! Caché de resultados sobre Postgres.
//!
//! - Una fila por `CacheKey::digest` (PK); el payload es JSONB opaco.
//! - `insert` usa `ON CONFLICT DO NOTHING`: la primera escritura gana, igual
//!   que la caché en memoria.
//! - Errores transitorios de conexión se reintentan con backoff corto.

use chem_core::{CacheEntry, CacheError, CacheKey, ResultCache};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use log::{debug, warn};
use serde_json::Value;

use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;
use crate::schema::pchem_results;

/// Alias de tipo para el pool r2d2 de conexiones Postgres.
pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;

/// Proveedor abstracto de conexiones.
///
/// Permite inyectar un pool real o uno de test sin acoplar la caché a r2d2.
pub trait ConnectionProvider: Send + Sync + 'static {
    fn connection(&self) -> Result<r2d2::PooledConnection<ConnectionManager<PgConnection>>, PersistenceError>;
}

/// Implementación concreta de `ConnectionProvider` respaldada por un `PgPool`.
pub struct PoolProvider {
    pub pool: PgPool,
}

impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<r2d2::PooledConnection<ConnectionManager<PgConnection>>, PersistenceError> {
        self.pool
            .get()
            .map_err(|e| PersistenceError::TransientIo(format!("pool error: {e}")))
    }
}

#[derive(Queryable, Debug)]
pub struct ResultRow {
    pub cache_key: String,
    pub structure: String,
    pub calculator: String,
    pub property: Option<String>,
    pub conditions_hash: String,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

impl ResultRow {
    fn into_entry(self) -> CacheEntry {
        CacheEntry { key: CacheKey { structure: self.structure,
                                     calculator: self.calculator,
                                     property: self.property,
                                     conditions_hash: self.conditions_hash,
                                     digest: self.cache_key },
                     payload: self.payload,
                     created_at: self.created_at }
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = pchem_results)]
pub struct NewResultRow<'a> {
    pub cache_key: &'a str,
    pub structure: &'a str,
    pub calculator: &'a str,
    pub property: Option<&'a str>,
    pub conditions_hash: &'a str,
    pub payload: &'a Value,
}

/// Determina si un error es transitorio (recomendado reintentar con backoff).
fn is_retryable(e: &PersistenceError) -> bool {
    match e {
        PersistenceError::SerializationConflict => true,
        PersistenceError::TransientIo(_) => true,
        PersistenceError::Unknown(msg) => {
            let m = msg.to_lowercase();
            m.contains("deadlock detected")
            || m.contains("terminating connection due to administrator command")
            || m.contains("connection closed")
            || m.contains("connection refused")
            || m.contains("timeout")
        }
        _ => false,
    }
}

/// Retry simple con backoff lineal (hasta 3 reintentos: 15ms, 30ms, 45ms).
fn with_retry<F, T>(mut f: F) -> Result<T, PersistenceError>
    where F: FnMut() -> Result<T, PersistenceError>
{
    let mut attempts = 0;
    loop {
        match f() {
            Err(e) if is_retryable(&e) && attempts < 3 => {
                let delay_ms = 15 * ((attempts + 1) as u64);
                warn!("retryable error (attempt {}): {:?} -> sleeping {}ms",
                      attempts + 1,
                      e,
                      delay_ms);
                std::thread::sleep(std::time::Duration::from_millis(delay_ms));
                attempts += 1;
            }
            r => return r,
        }
    }
}

pub struct PgResultCache<P: ConnectionProvider> {
    provider: P,
}

impl<P: ConnectionProvider> PgResultCache<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Número de filas almacenadas (diagnóstico).
    pub fn count(&self) -> Result<i64, PersistenceError> {
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            pchem_results::table.count().get_result(&mut conn).map_err(PersistenceError::from)
        })
    }
}

impl<P: ConnectionProvider> ResultCache for PgResultCache<P> {
    fn find(&self, key: &CacheKey) -> Result<Option<CacheEntry>, CacheError> {
        let row: Option<ResultRow> = with_retry(|| {
            let mut conn = self.provider.connection()?;
            pchem_results::table.find(key.digest.as_str())
                                .first::<ResultRow>(&mut conn)
                                .optional()
                                .map_err(PersistenceError::from)
        })?;
        debug!("pg cache find key={} hit={}", key.digest, row.is_some());
        Ok(row.map(ResultRow::into_entry))
    }

    fn insert(&self, key: &CacheKey, payload: Value) -> Result<(), CacheError> {
        let row = NewResultRow { cache_key: &key.digest,
                                 structure: &key.structure,
                                 calculator: &key.calculator,
                                 property: key.property.as_deref(),
                                 conditions_hash: &key.conditions_hash,
                                 payload: &payload };
        let inserted = with_retry(|| {
            let mut conn = self.provider.connection()?;
            diesel::insert_into(pchem_results::table).values(&row)
                                                     .on_conflict_do_nothing()
                                                     .execute(&mut conn)
                                                     .map_err(PersistenceError::from)
        })?;
        if inserted == 0 {
            debug!("pg cache insert skipped, key={} already present", key.digest);
        }
        Ok(())
    }

    fn invalidate(&self, key: &CacheKey) -> Result<bool, CacheError> {
        let deleted = with_retry(|| {
            let mut conn = self.provider.connection()?;
            diesel::delete(pchem_results::table.find(key.digest.as_str())).execute(&mut conn)
                                                                          .map_err(PersistenceError::from)
        })?;
        Ok(deleted > 0)
    }
}

/// Construye el pool y corre las migraciones pendientes una sola vez.
pub fn build_pool(database_url: &str, min_size: u32, max_size: u32) -> Result<PgPool, PersistenceError> {
    let validated_min = if min_size == 0 { 1 } else { min_size };
    let validated_max = if max_size == 0 { 1 } else { max_size };
    if validated_min > validated_max {
        warn!("min_size > max_size ({} > {}), ajustando min=max", validated_min, validated_max);
    }
    let final_min = validated_min.min(validated_max);
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder().min_idle(Some(final_min))
                                    .max_size(validated_max)
                                    .build(manager)
                                    .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))?;
    {
        let mut conn = pool.get()
                           .map_err(|e| PersistenceError::TransientIo(format!("pool get for migrations: {e}")))?;
        run_pending_migrations(&mut conn)?;
    }
    Ok(pool)
}

/// Carga `.env`, lee `DbConfig` y construye un pool ya migrado. `None` si no
/// hay `DATABASE_URL`.
pub fn build_dev_pool_from_env() -> Option<Result<PgPool, PersistenceError>> {
    crate::config::init_dotenv();
    crate::config::DbConfig::from_env().map(|cfg| build_pool(&cfg.url, cfg.min_connections, cfg.max_connections))
}
