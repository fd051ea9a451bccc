//! Adaptador del metabolizador (EFS web services).
//!
//! Cada llamada expande una sola generación: el árbol completo lo construye
//! el expansor llamando una vez por nodo.
use chem_domain::{Calculator, CalculatorDescriptor, PropertySpec};
use log::debug;
use serde_json::{json, Value};

use crate::adapter::{join_url, reported_error};
use crate::transport::{BackendRequest, Transport};
use crate::AdapterError;

/// Librería que el backend no acepta como filtro explícito.
pub const HUMAN_BIOTRANSFORMATION: &str = "human_biotransformation";

pub const DEFAULT_LIBRARIES: &[&str] = &["hydrolysis", "abiotic_reduction", HUMAN_BIOTRANSFORMATION];

const LIKELY_LIMIT: f64 = 0.1;

pub fn metabolizer_descriptor() -> CalculatorDescriptor {
    CalculatorDescriptor::new(Calculator::Metabolizer,
                              "EFS Metabolizer",
                              "Predicts transformation products using reaction libraries for abiotic hydrolysis, abiotic reduction and human phase I metabolism.")
        .with_property(PropertySpec::new("transformation_products", "results", "one generation of transformation products"))
}

pub struct MetabolizerAdapter {
    base_url: String,
    descriptor: CalculatorDescriptor,
}

impl MetabolizerAdapter {
    pub fn new(base_url: &str) -> Self {
        Self { base_url: base_url.to_string(),
               descriptor: metabolizer_descriptor() }
    }

    pub fn descriptor(&self) -> &CalculatorDescriptor {
        &self.descriptor
    }

    /// Petición de una generación. El filtro de librerías se omite por
    /// completo si está vacío o incluye `human_biotransformation`.
    pub fn build_request(&self, structure: &str, libraries: &[String]) -> BackendRequest {
        let mut body = json!({
            "structure": structure,
            "generationLimit": 1,
            "populationLimit": 0,
            "likelyLimit": LIKELY_LIMIT,
            "excludeCondition": "",
        });
        if !libraries.is_empty() && !libraries.iter().any(|l| l == HUMAN_BIOTRANSFORMATION) {
            body["transformationLibraries"] = json!(libraries);
        }
        BackendRequest::post(join_url(&self.base_url, "efsws/rest/metabolizer"), body)
    }

    /// Hijos directos de `parent`, en el orden devuelto por el backend.
    pub fn parse_response(&self, parent: &str, body: &Value) -> Result<Vec<String>, AdapterError> {
        if let Some(msg) = reported_error(body) {
            return Err(AdapterError::Backend(msg));
        }
        let results = body.get("results")
                          .ok_or_else(|| AdapterError::Backend("metabolizer response without results".into()))?;
        let children = match results {
            Value::Object(map) => map.get(parent).or_else(|| map.values().next()),
            Value::Null => None,
            _ => return Err(AdapterError::Backend("metabolizer results is not an object".into())),
        };
        let products = match children {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Object(map)) => map.keys().cloned().collect(),
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).map(str::to_string).collect(),
            Some(other) => return Err(AdapterError::Backend(format!("unexpected metabolizer children: {other}"))),
        };
        Ok(products)
    }

    pub async fn transform(&self, transport: &dyn Transport, structure: &str, libraries: &[String]) -> Result<Vec<String>, AdapterError> {
        let request = self.build_request(structure, libraries);
        let body = transport.post_json(&request).await?;
        let children = self.parse_response(structure, &body)?;
        debug!("metabolizer: {structure} -> {} products", children.len());
        Ok(children)
    }
}
