//! Contrato de la caché de resultados calculados.
//!
//! Una entrada se identifica por (estructura normalizada, calculadora,
//! propiedad, condiciones). Las condiciones se hashean en forma canónica, por
//! lo que `{"ph": 7.4, "method": "KLOP"}` y `{"method": "KLOP", "ph": 7.4}`
//! producen la misma clave. El payload es JSON opaco para el core: quien
//! escribe decide su forma (el dispatcher guarda un `CanonicalResult`).
//!
//! Ciclo de vida: se crea en el primer cálculo exitoso y es de sólo lectura a
//! partir de ahí (el primer `insert` gana) salvo `invalidate` explícito. No hay
//! expiración automática.

mod key;
mod memory;

pub use key::CacheKey;
pub use memory::InMemoryResultCache;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CacheError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
}

/// Almacenamiento clave-valor de resultados. Compartido entre requests, por
/// eso `&self` en todas las operaciones.
pub trait ResultCache: Send + Sync {
    /// Busca una entrada por su digest.
    fn find(&self, key: &CacheKey) -> Result<Option<CacheEntry>, CacheError>;
    /// Inserta si no existe; una entrada existente no se sobrescribe.
    fn insert(&self, key: &CacheKey, payload: Value) -> Result<(), CacheError>;
    /// Elimina la entrada; devuelve `true` si existía.
    fn invalidate(&self, key: &CacheKey) -> Result<bool, CacheError>;
}
