//! EPI Suite: valores estimados (`epi`) y medidos (`measured`).
//!
//! Ambos comparten envoltorio: `{"valid": bool, "data": [...]}`. Con
//! `valid=false`, `data` contiene el mensaje de error del backend. EPI
//! calcula todas sus propiedades en una sola llamada; la selección de la
//! propiedad pedida ocurre después, fuera del adaptador.
use chem_domain::{Calculator, CalculatorDescriptor, CanonicalRequest, PropertySpec};
use serde_json::{json, Value};

use crate::adapter::{join_url, requested_spec, BackendAdapter, BackendEntry};
use crate::transport::BackendRequest;
use crate::AdapterError;

pub fn epi_descriptor() -> CalculatorDescriptor {
    CalculatorDescriptor::new(Calculator::Epi,
                              "4.11",
                              "EPI Suite is a Windows-based suite of physical/chemical property and environmental fate estimation programs developed by EPA and Syracuse Research Corp. (SRC).")
        .with_property(PropertySpec::new("melting_point", "melting_point", "melting point").units("degC"))
        .with_property(PropertySpec::new("boiling_point", "boiling_point", "boiling point").units("degC"))
        .with_property(PropertySpec::new("water_sol", "water_solubility", "water solubility").units("mg/L")
                                                                                            .method("wskownt", "WSKOW")
                                                                                            .method("waternt", "WATERNT"))
        .with_property(PropertySpec::new("vapor_press", "vapor_pressure", "vapor pressure").units("mmHg"))
        .with_property(PropertySpec::new("henrys_law_con", "henrys_law_constant", "henry's law constant").units("(atm*m^3)/mol"))
        .with_property(PropertySpec::new("kow_no_ph", "log_kow", "Octanol/water partition coefficient").units("log"))
        .with_property(PropertySpec::new("koc", "log_koc", "organic carbon partition coefficient").units("log"))
}

pub fn measured_descriptor() -> CalculatorDescriptor {
    CalculatorDescriptor::new(Calculator::Measured, "EPI Suite 4.11", "Measured data from EPI Suite 4.11.")
        .with_property(PropertySpec::new("melting_point", "melting_point", "melting point").units("degC"))
        .with_property(PropertySpec::new("boiling_point", "boiling_point", "boiling point").units("degC"))
        .with_property(PropertySpec::new("water_sol", "water_solubility", "water solubility").units("mg/L"))
        .with_property(PropertySpec::new("vapor_press", "vapor_pressure", "vapor pressure").units("mmHg"))
        .with_property(PropertySpec::new("henrys_law_con", "henrys_law_constant", "henry's law constant").units("(atm*m^3)/mol"))
        .with_property(PropertySpec::new("kow_no_ph", "log_kow", "octanol/water partition coefficient").units("log"))
        .with_property(PropertySpec::new("koc", "koc", "organic carbon partition coefficient").units("L/kg"))
}

fn parse_envelope(body: &Value) -> Result<Vec<BackendEntry>, AdapterError> {
    if body.get("valid").and_then(Value::as_bool) == Some(false) {
        let msg = match body.get("data") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "request rejected by EPI Suite".to_string(),
        };
        return Err(AdapterError::Backend(msg));
    }
    let data = body.get("data")
                   .and_then(Value::as_array)
                   .ok_or_else(|| AdapterError::Backend("EPI Suite response without data array".into()))?;
    Ok(data.iter()
           .filter_map(|item| {
               let prop = item.get("prop")?.as_str()?;
               let method = item.get("method").and_then(Value::as_str).map(str::to_string);
               let value = item.get("data").cloned().unwrap_or(Value::Null);
               Some(BackendEntry::new(prop, value).with_method(method))
           })
           .collect())
}

fn build(base_url: &str, path: &str, descriptor: &CalculatorDescriptor, request: &CanonicalRequest) -> Result<BackendRequest, AdapterError> {
    requested_spec(descriptor, request)?;
    Ok(BackendRequest::post(join_url(base_url, path), json!({ "structure": request.structure.as_str() })))
}

pub struct EpiAdapter {
    base_url: String,
    descriptor: CalculatorDescriptor,
}

impl EpiAdapter {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.to_string(),
               descriptor: epi_descriptor() }
    }
}

impl BackendAdapter for EpiAdapter {
    fn descriptor(&self) -> &CalculatorDescriptor {
        &self.descriptor
    }

    fn build_request(&self, request: &CanonicalRequest) -> Result<BackendRequest, AdapterError> {
        build(&self.base_url, "rest/episuite/estimated", &self.descriptor, request)
    }

    fn parse_response(&self, _request: &CanonicalRequest, body: &Value) -> Result<Vec<BackendEntry>, AdapterError> {
        parse_envelope(body)
    }
}

pub struct MeasuredAdapter {
    base_url: String,
    descriptor: CalculatorDescriptor,
}

impl MeasuredAdapter {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.to_string(),
               descriptor: measured_descriptor() }
    }
}

impl BackendAdapter for MeasuredAdapter {
    fn descriptor(&self) -> &CalculatorDescriptor {
        &self.descriptor
    }

    fn build_request(&self, request: &CanonicalRequest) -> Result<BackendRequest, AdapterError> {
        build(&self.base_url, "rest/episuite/measured", &self.descriptor, request)
    }

    fn parse_response(&self, _request: &CanonicalRequest, body: &Value) -> Result<Vec<BackendEntry>, AdapterError> {
        parse_envelope(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chem_domain::normalize;

    #[test]
    fn invalid_envelope_is_a_backend_error() {
        let err = parse_envelope(&json!({"valid": false, "data": "Cannot process metals"})).unwrap_err();
        assert_eq!(err, AdapterError::Backend("Cannot process metals".into()));
    }

    #[test]
    fn envelope_entries_keep_method_codes() {
        let entries = parse_envelope(&json!({"valid": true, "data": [
            {"prop": "water_solubility", "method": "wskownt", "data": 1.1e5},
            {"prop": "water_solubility", "method": "waternt", "data": 9.9e4},
            {"prop": "log_kow", "data": -0.31},
            {"data": 1}
        ]})).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].method.as_deref(), Some("wskownt"));
        assert_eq!(entries[2].method, None);
    }

    #[test]
    fn measured_uses_its_own_endpoint() {
        let adapter = MeasuredAdapter::new("http://epi:8080");
        let req = CanonicalRequest::new(normalize("CCO").unwrap(), Calculator::Measured).property("koc");
        let built = adapter.build_request(&req).unwrap();
        assert_eq!(built.url, "http://epi:8080/rest/episuite/measured");
        assert_eq!(built.body, json!({"structure": "CCO"}));
    }
}
