use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::{Calculator, CanonicalStructure};

/// Modo de ejecución de la petición.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Petición REST individual: el payload del backend se conserva en `raw`.
    #[default]
    Interactive,
    /// Lotes: se descarta `raw` para mantener los resultados compactos.
    Batch,
}

impl RunMode {
    /// Traduce el `run_type` histórico (`rest`, `batch`, ...).
    pub fn from_run_type(run_type: Option<&str>) -> Self {
        match run_type.map(str::to_ascii_lowercase).as_deref() {
            Some("batch") => RunMode::Batch,
            _ => RunMode::Interactive,
        }
    }
}

/// Condiciones de ejecución (pH, método, masa...). Ordenadas por clave para
/// que la serialización sea estable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conditions(BTreeMap<String, Value>);

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Números o strings numéricos ("7.4" llega así desde formularios).
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn ph(&self) -> Option<f64> {
        self.get_f64("ph").or_else(|| self.get_f64("pH"))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}

impl From<BTreeMap<String, Value>> for Conditions {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self(map)
    }
}

/// Petición ya decodificada y con la estructura normalizada.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRequest {
    pub structure: CanonicalStructure,
    pub calculator: Calculator,
    pub property: Option<String>,
    pub conditions: Conditions,
    pub run_mode: RunMode,
}

impl CanonicalRequest {
    pub fn new(structure: CanonicalStructure, calculator: Calculator) -> Self {
        Self { structure,
               calculator,
               property: None,
               conditions: Conditions::new(),
               run_mode: RunMode::default() }
    }

    pub fn property(mut self, property: &str) -> Self {
        self.property = Some(property.to_string());
        self
    }

    pub fn conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn run_mode(mut self, run_mode: RunMode) -> Self {
        self.run_mode = run_mode;
        self
    }
}
