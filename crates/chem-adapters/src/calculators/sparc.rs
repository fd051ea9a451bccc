//! SPARC multi-property calculator.
use chem_domain::{Calculator, CalculatorDescriptor, CanonicalRequest, PropertySpec};
use serde_json::{json, Value};

use super::DEFAULT_PH;
use crate::adapter::{join_url, reported_error, requested_spec, BackendAdapter, BackendEntry};
use crate::transport::BackendRequest;
use crate::AdapterError;

pub fn sparc_descriptor() -> CalculatorDescriptor {
    CalculatorDescriptor::new(Calculator::Sparc,
                              "SPARC Performs Automated Reasoning in Chemistry",
                              "SPARC computes physical/chemical properties from molecular structure and basic information about the environment.")
        .with_property(PropertySpec::new("boiling_point", "BOILING_POINT", "boiling point").units("degC"))
        .with_property(PropertySpec::new("water_sol", "SOLUBILITY", "water solubility").units("mg/L"))
        .with_property(PropertySpec::new("vapor_press", "VAPOR_PRESSURE", "vapor pressure").units("mmHg"))
        .with_property(PropertySpec::new("mol_diss", "DIFFUSION", "molecular diffusivity").units("cm^2/s"))
        .with_property(PropertySpec::new("ion_con", "PKA", "pKa values"))
        .with_property(PropertySpec::new("henrys_law_con", "HENRYS_CONSTANT", "henry's law constant").units("(atm*m^3)/mol"))
        .with_property(PropertySpec::new("kow_no_ph", "LOGP", "octanol/water partition coefficient").units("log"))
        .with_property(PropertySpec::new("kow_wph", "LOGD", "pH-dependent octanol/water partition coefficient").units("log"))
}

pub struct SparcAdapter {
    base_url: String,
    descriptor: CalculatorDescriptor,
}

impl SparcAdapter {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.to_string(),
               descriptor: sparc_descriptor() }
    }
}

impl BackendAdapter for SparcAdapter {
    fn descriptor(&self) -> &CalculatorDescriptor {
        &self.descriptor
    }

    fn build_request(&self, request: &CanonicalRequest) -> Result<BackendRequest, AdapterError> {
        let spec = requested_spec(&self.descriptor, request)?;
        let mut body = json!({
            "smiles": request.structure.as_str(),
            "calculations": [{ "type": spec.result_key }],
        });
        if spec.name == "kow_wph" {
            body["pH"] = json!(request.conditions.ph().unwrap_or(DEFAULT_PH));
        }
        Ok(BackendRequest::post(join_url(&self.base_url, "sparc-integration/rest/calc/multiProperty"), body))
    }

    fn parse_response(&self, _request: &CanonicalRequest, body: &Value) -> Result<Vec<BackendEntry>, AdapterError> {
        if let Some(msg) = reported_error(body) {
            return Err(AdapterError::Backend(msg));
        }
        let results = body.get("calculationResults")
                          .and_then(Value::as_array)
                          .ok_or_else(|| AdapterError::Backend("SPARC response without calculationResults".into()))?;
        Ok(results.iter()
                  .filter_map(|r| {
                      let kind = r.get("type")?.as_str()?;
                      Some(BackendEntry::new(kind, r.get("result").cloned().unwrap_or(Value::Null)))
                  })
                  .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chem_domain::{normalize, Conditions};

    #[test]
    fn logd_carries_ph() {
        let adapter = SparcAdapter::new("http://sparc");
        let req = CanonicalRequest::new(normalize("CCO").unwrap(), Calculator::Sparc).property("kow_wph")
                                                                                      .conditions(Conditions::new().with("pH", 5.0));
        let built = adapter.build_request(&req).unwrap();
        assert_eq!(built.url, "http://sparc/sparc-integration/rest/calc/multiProperty");
        assert_eq!(built.body["pH"], json!(5.0));
        assert_eq!(built.body["calculations"][0]["type"], "LOGD");
    }

    #[test]
    fn parses_calculation_results() {
        let adapter = SparcAdapter::new("http://sparc");
        let req = CanonicalRequest::new(normalize("CCO").unwrap(), Calculator::Sparc).property("mol_diss");
        let entries = adapter.parse_response(&req, &json!({"calculationResults": [{"type": "DIFFUSION", "result": 0.12}]}))
                             .unwrap();
        assert_eq!(entries, vec![BackendEntry::new("DIFFUSION", json!(0.12))]);
    }
}
