//! Constantes del core.
//!
//! `CACHE_SCHEMA_VERSION` forma parte del input hasheado de cada `CacheKey`:
//! cambiarla invalida de forma determinista todas las entradas previas (las
//! claves nuevas ya no coinciden) sin necesidad de borrar filas.

/// Versión lógica del formato de entradas de caché.
pub const CACHE_SCHEMA_VERSION: &str = "C1";
