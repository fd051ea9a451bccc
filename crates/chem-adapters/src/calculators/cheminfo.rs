//! Información química básica (fórmula, masa, nombre IUPAC), servida por
//! el mismo servidor JChem que `chemaxon`.
use chem_domain::{Calculator, CalculatorDescriptor, CanonicalRequest, PropertySpec};
use serde_json::{json, Value};

use crate::adapter::{join_url, reported_error, requested_spec, BackendAdapter, BackendEntry};
use crate::transport::BackendRequest;
use crate::AdapterError;

pub fn cheminfo_descriptor() -> CalculatorDescriptor {
    CalculatorDescriptor::new(Calculator::ChemInfo, "Jchem Web Services 15.3.23.0", "Chemical identifiers and basic molecular data.")
        .with_property(PropertySpec::new("formula", "formula", "molecular formula"))
        .with_property(PropertySpec::new("mass", "mass", "average molecular mass").units("g/mol"))
        .with_property(PropertySpec::new("exact_mass", "exactMass", "monoisotopic mass").units("g/mol"))
        .with_property(PropertySpec::new("iupac", "iupac", "IUPAC name"))
        .with_property(PropertySpec::new("smiles", "smiles", "SMILES as reported by JChem"))
}

pub struct ChemInfoAdapter {
    base_url: String,
    descriptor: CalculatorDescriptor,
}

impl ChemInfoAdapter {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.to_string(),
               descriptor: cheminfo_descriptor() }
    }
}

impl BackendAdapter for ChemInfoAdapter {
    fn descriptor(&self) -> &CalculatorDescriptor {
        &self.descriptor
    }

    fn build_request(&self, request: &CanonicalRequest) -> Result<BackendRequest, AdapterError> {
        requested_spec(&self.descriptor, request)?;
        Ok(BackendRequest::post(join_url(&self.base_url, "jchem/detailsBySmiles"), json!({ "chemical": request.structure.as_str() })))
    }

    fn parse_response(&self, _request: &CanonicalRequest, body: &Value) -> Result<Vec<BackendEntry>, AdapterError> {
        if let Some(msg) = reported_error(body) {
            return Err(AdapterError::Backend(msg));
        }
        let data = body.get("data")
                       .and_then(Value::as_object)
                       .ok_or_else(|| AdapterError::Backend("JChem details response without data".into()))?;
        Ok(data.iter().map(|(k, v)| BackendEntry::new(k, v.clone())).collect())
    }
}
