//! chem-persistence
//!
//! Caché de resultados durable sobre Postgres (Diesel + r2d2). Implementa el
//! mismo contrato `ResultCache` que la caché en memoria del core, por lo que
//! el dispatcher no distingue entre ambas.
//!
//! Módulos:
//! - `pg`: pool, reintentos y `PgResultCache`.
//! - `migrations`: runner embebido de migraciones Diesel.
//! - `config`: carga de configuración desde .env.
//! - `schema`: tablas Diesel.

pub mod config;
pub mod error;
pub mod migrations;
pub mod pg;
pub mod schema;

pub use config::{init_dotenv, DbConfig};
pub use error::PersistenceError;
pub use pg::{build_dev_pool_from_env, build_pool, ConnectionProvider, PgPool, PgResultCache, PoolProvider};
