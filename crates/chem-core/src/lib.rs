//! chem-core: hashing determinista y contrato de caché de resultados.
//!
//! - `hashing`: JSON canónico + blake3, base de toda clave de caché.
//! - `cache`: `CacheKey`, `CacheEntry`, el trait `ResultCache` y una
//!   implementación en memoria.
pub mod cache;
pub mod constants;
pub mod errors;
pub mod hashing;

pub use cache::{CacheEntry, CacheKey, InMemoryResultCache, ResultCache};
pub use errors::CacheError;
