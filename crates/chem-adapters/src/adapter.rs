//! Contrato común de los adaptadores de backend.
use async_trait::async_trait;
use chem_domain::{Calculator, CalculatorDescriptor, CanonicalRequest, PropertySpec};
use log::debug;
use serde_json::Value;

use crate::transport::{BackendRequest, Transport};
use crate::AdapterError;

/// Una entrada normalizada de la respuesta: clave interna del backend,
/// código de método opcional y valor.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendEntry {
    pub prop: String,
    pub method: Option<String>,
    pub value: Value,
}

impl BackendEntry {
    pub fn new(prop: &str, value: Value) -> Self {
        Self { prop: prop.to_string(), method: None, value }
    }

    pub fn with_method(mut self, method: Option<String>) -> Self {
        self.method = method;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BackendResponse {
    /// Sólo entradas cuya clave está declarada en el descriptor.
    pub entries: Vec<BackendEntry>,
    /// Payload original, opaco.
    pub raw: Value,
}

#[async_trait]
pub trait BackendAdapter: Send + Sync {
    fn descriptor(&self) -> &CalculatorDescriptor;

    /// Traduce la petición canónica al formato nativo del backend.
    fn build_request(&self, request: &CanonicalRequest) -> Result<BackendRequest, AdapterError>;

    /// Traduce la respuesta nativa a entradas normalizadas.
    fn parse_response(&self, request: &CanonicalRequest, body: &Value) -> Result<Vec<BackendEntry>, AdapterError>;

    fn calculator(&self) -> Calculator {
        self.descriptor().calculator
    }

    async fn call(&self, transport: &dyn Transport, request: &CanonicalRequest) -> Result<BackendResponse, AdapterError> {
        let backend_request = self.build_request(request)?;
        let body = transport.post_json(&backend_request).await?;
        let mut entries = self.parse_response(request, &body)?;
        let before = entries.len();
        let descriptor = self.descriptor();
        entries.retain(|e| descriptor.property_for_result_key(&e.prop).is_some());
        if entries.len() != before {
            debug!("{}: dropped {} unmapped backend entries", self.calculator(), before - entries.len());
        }
        Ok(BackendResponse { entries, raw: body })
    }
}

/// Propiedad solicitada, ya resuelta contra el descriptor.
pub(crate) fn requested_spec<'a>(descriptor: &'a CalculatorDescriptor, request: &CanonicalRequest) -> Result<&'a PropertySpec, AdapterError> {
    let name = request.property
                      .as_deref()
                      .ok_or_else(|| AdapterError::InvalidRequest("no property requested".into()))?;
    descriptor.property(name)
              .ok_or_else(|| AdapterError::InvalidRequest(format!("{} does not offer {name}", descriptor.calculator)))
}

/// Backends que devuelven `{"error": "..."}` con status 200.
pub(crate) fn reported_error(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn join_url_handles_slashes() {
        assert_eq!(join_url("http://a/", "/b"), "http://a/b");
        assert_eq!(join_url("http://a", "b/c"), "http://a/b/c");
    }

    #[test]
    fn reported_error_ignores_null() {
        assert_eq!(reported_error(&json!({"error": null})), None);
        assert_eq!(reported_error(&json!({"error": "bad smiles"})), Some("bad smiles".into()));
        assert_eq!(reported_error(&json!({"data": []})), None);
    }
}
