//! OPERA (OPEn structure-activity/property Relationship App).
use chem_domain::{Calculator, CalculatorDescriptor, CanonicalRequest, PropertySpec};
use serde_json::{json, Value};

use crate::adapter::{join_url, reported_error, requested_spec, BackendAdapter, BackendEntry};
use crate::transport::BackendRequest;
use crate::AdapterError;

/// Claves que OPERA devuelve en log10 y que se publican en escala lineal.
const LOG10_KEYS: [&str; 2] = ["LogHL_pred", "LogKoc_pred"];

fn from_log10(prop: &str, value: Value) -> Result<Value, AdapterError> {
    if !LOG10_KEYS.contains(&prop) || value.is_null() {
        return Ok(value);
    }
    let log = value.as_f64()
                   .ok_or_else(|| AdapterError::Backend(format!("non numeric {prop}: {value}")))?;
    let linear = 10f64.powf(log);
    if !linear.is_finite() {
        return Err(AdapterError::Backend(format!("{prop} out of range: 10^{log}")));
    }
    Ok(json!(linear))
}

pub fn opera_descriptor() -> CalculatorDescriptor {
    CalculatorDescriptor::new(Calculator::Opera,
                              "2.6",
                              "OPERA is a free and open-source/open-data suite of QSAR models providing predictions for physicochemical properties and environmental fate endpoints.")
        .with_property(PropertySpec::new("melting_point", "MP_pred", "melting point").units("degC"))
        .with_property(PropertySpec::new("boiling_point", "BP_pred", "boiling point").units("degC"))
        .with_property(PropertySpec::new("water_sol", "WS_pred", "water solubility").units("mg/L"))
        .with_property(PropertySpec::new("vapor_press", "VP_pred", "vapor pressure").units("mmHg"))
        .with_property(PropertySpec::new("henrys_law_con", "LogHL_pred", "henry's law constant").units("(atm*m^3)/mol"))
        .with_property(PropertySpec::new("kow_no_ph", "LogP_pred", "octanol/water partition coefficient").units("log"))
        .with_property(PropertySpec::new("koc", "LogKoc_pred", "organic carbon partition coefficient").units("L/kg"))
}

pub struct OperaAdapter {
    base_url: String,
    descriptor: CalculatorDescriptor,
}

impl OperaAdapter {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.to_string(),
               descriptor: opera_descriptor() }
    }
}

impl BackendAdapter for OperaAdapter {
    fn descriptor(&self) -> &CalculatorDescriptor {
        &self.descriptor
    }

    fn build_request(&self, request: &CanonicalRequest) -> Result<BackendRequest, AdapterError> {
        let spec = requested_spec(&self.descriptor, request)?;
        Ok(BackendRequest::post(join_url(&self.base_url, "opera/rest/run"),
                                json!({ "smiles": [request.structure.as_str()], "props": [spec.result_key] })))
    }

    fn parse_response(&self, _request: &CanonicalRequest, body: &Value) -> Result<Vec<BackendEntry>, AdapterError> {
        if let Some(msg) = reported_error(body) {
            return Err(AdapterError::Backend(msg));
        }
        let data = body.get("data")
                       .and_then(Value::as_array)
                       .ok_or_else(|| AdapterError::Backend("OPERA response without data array".into()))?;
        data.iter()
            .filter_map(|item| {
                let prop = item.get("prop")?.as_str()?;
                let value = item.get("data").cloned().unwrap_or(Value::Null);
                Some(from_log10(prop, value).map(|v| BackendEntry::new(prop, v)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chem_domain::normalize;

    #[test]
    fn request_lists_one_structure_and_one_prop() {
        let adapter = OperaAdapter::new("http://opera/");
        let req = CanonicalRequest::new(normalize("c1ccccc1").unwrap(), Calculator::Opera).property("koc");
        let built = adapter.build_request(&req).unwrap();
        assert_eq!(built.url, "http://opera/opera/rest/run");
        assert_eq!(built.body, json!({"smiles": ["c1ccccc1"], "props": ["LogKoc_pred"]}));
    }

    #[test]
    fn missing_data_is_backend_error() {
        let adapter = OperaAdapter::new("http://opera");
        let req = CanonicalRequest::new(normalize("CCO").unwrap(), Calculator::Opera).property("koc");
        let err = adapter.parse_response(&req, &json!({"status": "queued"})).unwrap_err();
        assert!(matches!(err, AdapterError::Backend(_)));
    }

    #[test]
    fn log_koc_and_log_hl_are_published_in_linear_units() {
        let adapter = OperaAdapter::new("http://opera");
        let descriptor = adapter.descriptor();
        assert_eq!(descriptor.property("koc").and_then(|p| p.units.as_deref()), Some("L/kg"));
        assert_eq!(descriptor.property("henrys_law_con").and_then(|p| p.units.as_deref()), Some("(atm*m^3)/mol"));

        let req = CanonicalRequest::new(normalize("CCO").unwrap(), Calculator::Opera).property("koc");
        let body = json!({"data": [{"prop": "LogKoc_pred", "data": 2.0},
                                   {"prop": "LogHL_pred", "data": -5.0},
                                   {"prop": "LogP_pred", "data": -0.31}]});
        let entries = adapter.parse_response(&req, &body).unwrap();
        assert!((entries[0].value.as_f64().unwrap() - 100.0).abs() < 1e-9);
        assert!((entries[1].value.as_f64().unwrap() - 1e-5).abs() < 1e-15);
        assert_eq!(entries[2].value, json!(-0.31));
    }

    #[test]
    fn non_numeric_log_value_is_backend_error() {
        let adapter = OperaAdapter::new("http://opera");
        let req = CanonicalRequest::new(normalize("CCO").unwrap(), Calculator::Opera).property("koc");
        let err = adapter.parse_response(&req, &json!({"data": [{"prop": "LogKoc_pred", "data": "n/a"}]})).unwrap_err();
        assert!(matches!(err, AdapterError::Backend(_)));
    }
}
