use chem_domain::{CanonicalResult, Conditions};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::DispatchError;

/// Petición tal como llega del exterior: estructura sin normalizar y
/// calculadora por nombre.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundRequest {
    pub structure: String,
    pub calculator: String,
    #[serde(default)]
    pub property: Option<String>,
    #[serde(default)]
    pub conditions: Conditions,
    /// `rest` (por defecto) o `batch`.
    #[serde(default)]
    pub run_type: Option<String>,
}

impl InboundRequest {
    pub fn new(structure: &str, calculator: &str, property: Option<&str>) -> Self {
        Self { structure: structure.to_string(),
               calculator: calculator.to_string(),
               property: property.map(str::to_string),
               conditions: Conditions::new(),
               run_type: None }
    }

    pub fn conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = conditions;
        self
    }

    pub fn run_type(mut self, run_type: &str) -> Self {
        self.run_type = Some(run_type.to_string());
        self
    }
}

/// Resultado de salida con la misma forma que un `CanonicalResult` de error,
/// para fallos que no llegan a producir uno (calculadora desconocida,
/// estructura inválida).
pub fn error_envelope(request: &InboundRequest, err: &DispatchError) -> Value {
    json!({
        "status": "error",
        "calculator": request.calculator,
        "property": request.property.clone().unwrap_or_default(),
        "value": null,
        "units": null,
        "method": null,
        "error": err.to_string(),
        "code": err.code(),
    })
}

pub(crate) fn to_outbound(result: &CanonicalResult) -> Value {
    serde_json::to_value(result).unwrap_or_else(|e| json!({ "status": "error", "error": format!("serialization: {e}") }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_defaults_optional_fields() {
        let req: InboundRequest = serde_json::from_value(json!({"structure": "CCO", "calculator": "epi"})).unwrap();
        assert_eq!(req.property, None);
        assert!(req.conditions.is_empty());
        assert_eq!(req.run_type, None);
    }

    #[test]
    fn error_envelope_has_outbound_shape() {
        let req = InboundRequest::new("CCO", "cts", Some("koc"));
        let out = error_envelope(&req, &DispatchError::UnknownCalculator("cts".into()));
        assert_eq!(out["status"], "error");
        assert_eq!(out["calculator"], "cts");
        assert_eq!(out["value"], Value::Null);
        assert_eq!(out["code"], "UnknownCalculator");
    }
}
