use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::constants::CACHE_SCHEMA_VERSION;
use crate::hashing::hash_value;

/// Clave determinista de caché.
///
/// `digest` es lo único que se compara; `structure`, `calculator` y
/// `conditions_hash` se conservan para consultas y diagnóstico.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub structure: String,
    pub calculator: String,
    pub property: Option<String>,
    pub conditions_hash: String,
    pub digest: String,
}

impl CacheKey {
    /// `structure` debe llegar ya normalizada; la caché no normaliza.
    pub fn derive(structure: &str, calculator: &str, property: Option<&str>, conditions: &Value) -> Self {
        let conditions_hash = hash_value(conditions);
        let digest = hash_value(&json!({
            "schema": CACHE_SCHEMA_VERSION,
            "structure": structure,
            "calculator": calculator,
            "property": property,
            "conditions": conditions_hash,
        }));
        Self { structure: structure.to_string(),
               calculator: calculator.to_string(),
               property: property.map(str::to_string),
               conditions_hash,
               digest }
    }
}
