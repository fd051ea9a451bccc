//! ChemAxon JChem web services.
//!
//! Una petición por propiedad (plugin). Las propiedades con variantes por
//! método (`kow_no_ph`, `kow_wph`) piden todos los métodos publicados salvo que
//! la condición `method` restrinja a uno.
use chem_domain::{Calculator, CalculatorDescriptor, CanonicalRequest, PropertySpec};
use serde_json::{json, Value};

use super::DEFAULT_PH;
use crate::adapter::{join_url, reported_error, requested_spec, BackendAdapter, BackendEntry};
use crate::transport::BackendRequest;
use crate::AdapterError;

const PH_DEPENDENT: &[&str] = &["kow_wph", "speciation"];

pub fn chemaxon_descriptor() -> CalculatorDescriptor {
    let kow = |name: &str, key: &str, description: &str| {
        PropertySpec::new(name, key, description).units("log")
                                                 .method("klop", "KLOP")
                                                 .method("phys", "PHYS")
                                                 .method("vg", "VG")
    };
    CalculatorDescriptor::new(Calculator::Chemaxon,
                              "Jchem Web Services 15.3.23.0",
                              "Cheminformatics software platforms, applications, and services to optimize the value of chemistry information in life science and other R&D.")
        .with_property(PropertySpec::new("water_sol", "solubility", "water solubility").units("mg/L"))
        .with_property(PropertySpec::new("ion_con", "pKa", "pKa and pKb values"))
        .with_property(kow("kow_no_ph", "logP", "Octanol/water partition coefficient"))
        .with_property(kow("kow_wph", "logD", "pH-dependent octanol/water partition coefficient"))
        .with_property(PropertySpec::new("speciation", "speciation", "microspecies distribution at a given pH"))
}

pub struct ChemaxonAdapter {
    base_url: String,
    descriptor: CalculatorDescriptor,
}

impl ChemaxonAdapter {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.to_string(),
               descriptor: chemaxon_descriptor() }
    }
}

impl BackendAdapter for ChemaxonAdapter {
    fn descriptor(&self) -> &CalculatorDescriptor {
        &self.descriptor
    }

    fn build_request(&self, request: &CanonicalRequest) -> Result<BackendRequest, AdapterError> {
        let spec = requested_spec(&self.descriptor, request)?;
        let mut body = json!({
            "structure": request.structure.as_str(),
            "plugin": spec.result_key,
        });
        if spec.has_methods() {
            let methods: Vec<&str> = match request.conditions.get_str("method") {
                Some(wanted) => vec![spec.backend_method(wanted)
                                         .ok_or_else(|| AdapterError::InvalidRequest(format!("unknown method {wanted} for {}", spec.name)))?],
                None => spec.methods.keys().map(String::as_str).collect(),
            };
            body["methods"] = json!(methods);
        }
        if PH_DEPENDENT.contains(&spec.name.as_str()) {
            body["ph"] = json!(request.conditions.ph().unwrap_or(DEFAULT_PH));
        }
        Ok(BackendRequest::post(join_url(&self.base_url, "jchem/calculate"), body))
    }

    fn parse_response(&self, _request: &CanonicalRequest, body: &Value) -> Result<Vec<BackendEntry>, AdapterError> {
        if let Some(msg) = reported_error(body) {
            return Err(AdapterError::Backend(msg));
        }
        let data = body.get("data")
                       .and_then(Value::as_array)
                       .ok_or_else(|| AdapterError::Backend("chemaxon response without data array".into()))?;
        data.iter()
            .map(|item| {
                let plugin = item.get("plugin")
                                 .and_then(Value::as_str)
                                 .ok_or_else(|| AdapterError::Backend("chemaxon entry without plugin".into()))?;
                let method = item.get("method").and_then(Value::as_str).map(str::to_string);
                let value = item.get("value").cloned().unwrap_or(Value::Null);
                Ok(BackendEntry::new(plugin, value).with_method(method))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chem_domain::{normalize, Conditions};

    fn request(prop: &str, conditions: Conditions) -> CanonicalRequest {
        CanonicalRequest::new(normalize("CCO").unwrap(), Calculator::Chemaxon).property(prop).conditions(conditions)
    }

    #[test]
    fn kow_requests_every_method_by_default() {
        let adapter = ChemaxonAdapter::new("http://jchem/");
        let req = adapter.build_request(&request("kow_no_ph", Conditions::new())).unwrap();
        assert_eq!(req.url, "http://jchem/jchem/calculate");
        assert_eq!(req.body, json!({"structure": "CCO", "plugin": "logP", "methods": ["klop", "phys", "vg"]}));
    }

    #[test]
    fn method_condition_restricts_to_backend_code() {
        let adapter = ChemaxonAdapter::new("http://jchem");
        let req = adapter.build_request(&request("kow_wph", Conditions::new().with("method", "PHYS").with("ph", 5.5)))
                         .unwrap();
        assert_eq!(req.body["methods"], json!(["phys"]));
        assert_eq!(req.body["ph"], json!(5.5));
    }

    #[test]
    fn ph_defaults_for_ph_dependent_properties_only() {
        let adapter = ChemaxonAdapter::new("http://jchem");
        let wph = adapter.build_request(&request("kow_wph", Conditions::new())).unwrap();
        assert_eq!(wph.body["ph"], json!(DEFAULT_PH));
        let sol = adapter.build_request(&request("water_sol", Conditions::new())).unwrap();
        assert!(sol.body.get("ph").is_none());
        assert!(sol.body.get("methods").is_none());
    }

    #[test]
    fn unknown_method_is_rejected() {
        let adapter = ChemaxonAdapter::new("http://jchem");
        let err = adapter.build_request(&request("kow_no_ph", Conditions::new().with("method", "XLOGP3")))
                         .unwrap_err();
        assert!(matches!(err, AdapterError::InvalidRequest(_)));
    }

    #[test]
    fn parses_method_entries_and_reported_errors() {
        let adapter = ChemaxonAdapter::new("http://jchem");
        let req = request("kow_no_ph", Conditions::new());
        let body = json!({"data": [{"plugin": "logP", "method": "klop", "value": -0.1},
                                   {"plugin": "logP", "method": "vg", "value": -0.3}]});
        let entries = adapter.parse_response(&req, &body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].method.as_deref(), Some("vg"));
        let err = adapter.parse_response(&req, &json!({"error": "structure not supported"})).unwrap_err();
        assert_eq!(err, AdapterError::Backend("structure not supported".into()));
    }
}
