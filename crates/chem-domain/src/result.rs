//! Envoltorio canónico de resultados.
//!
//! Invariante: `status == Error` implica `value == None` y `error == Some(..)`.
//! Los constructores son la única vía para crear resultados y la garantizan.
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::Calculator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Ok,
    Error,
}

/// Una variante de método para una misma propiedad.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodValue {
    pub method: String,
    pub value: Value,
}

/// Se serializa sin etiqueta. La lectura pasa por [`ResultValue::from_json`],
/// de modo que lo escrito en caché se relee como la misma variante: un
/// arreglo no vacío de objetos `{method, value}` es siempre `Methods`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultValue {
    Number(f64),
    Text(String),
    /// Todas las variantes por método, en el orden devuelto por el backend.
    Methods(Vec<MethodValue>),
    Structured(Value),
}

impl ResultValue {
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(f) => ResultValue::Number(f),
                None => ResultValue::Structured(Value::Number(n)),
            },
            Value::String(s) => ResultValue::Text(s),
            Value::Array(items) if is_method_list(&items) => {
                ResultValue::Methods(items.into_iter()
                                          .filter_map(|item| serde_json::from_value(item).ok())
                                          .collect())
            }
            other => ResultValue::Structured(other),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ResultValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn methods(&self) -> Option<&[MethodValue]> {
        match self {
            ResultValue::Methods(m) => Some(m),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for ResultValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(ResultValue::from_json)
    }
}

fn is_method_list(items: &[Value]) -> bool {
    !items.is_empty()
    && items.iter().all(|item| {
                        item.as_object()
                            .is_some_and(|o| o.len() == 2 && o.get("method").is_some_and(Value::is_string) && o.contains_key("value"))
                    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalResult {
    pub status: ResultStatus,
    pub calculator: Calculator,
    pub property: String,
    pub value: Option<ResultValue>,
    pub units: Option<String>,
    pub method: Option<String>,
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

impl CanonicalResult {
    pub fn ok(calculator: Calculator, property: &str, value: ResultValue) -> Self {
        Self { status: ResultStatus::Ok,
               calculator,
               property: property.to_string(),
               value: Some(value),
               units: None,
               method: None,
               error: None,
               raw: None }
    }

    pub fn error(calculator: Calculator, property: &str, message: impl Into<String>) -> Self {
        Self { status: ResultStatus::Error,
               calculator,
               property: property.to_string(),
               value: None,
               units: None,
               method: None,
               error: Some(message.into()),
               raw: None }
    }

    pub fn with_units(mut self, units: Option<String>) -> Self {
        self.units = units;
        self
    }

    pub fn with_method(mut self, method: Option<String>) -> Self {
        self.method = method;
        self
    }

    pub fn with_raw(mut self, raw: Option<Value>) -> Self {
        self.raw = raw;
        self
    }

    pub fn is_ok(&self) -> bool {
        self.status == ResultStatus::Ok
    }
}
