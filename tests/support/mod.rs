#![allow(dead_code)]

use chem_adapters::calculators::{ChemaxonAdapter, EpiAdapter};
use chem_adapters::{BackendRequest, MetabolizerAdapter, ScriptedTransport};
use chem_core::InMemoryResultCache;
use ctsflow_rust::{Dispatcher, Registry};
use serde_json::{json, Value};
use std::sync::Arc;

pub struct Harness {
    pub dispatcher: Dispatcher,
    pub transport: Arc<ScriptedTransport>,
    pub cache: Arc<InMemoryResultCache>,
}

pub fn harness(transport: ScriptedTransport) -> Harness {
    let transport = Arc::new(transport);
    let mut registry = Registry::new(transport.clone());
    registry.register(Box::new(ChemaxonAdapter::new("http://jchem")));
    registry.register(Box::new(EpiAdapter::new("http://epi")));
    registry.register_metabolizer(MetabolizerAdapter::new("http://efs"));
    let cache = Arc::new(InMemoryResultCache::new());
    let dispatcher = Dispatcher::new(Arc::new(registry), cache.clone());
    Harness { dispatcher, transport, cache }
}

/// Respuesta EPI con varias propiedades, como la real.
pub fn epi_body() -> Value {
    json!({"valid": true, "data": [
        {"prop": "melting_point", "data": -114.1},
        {"prop": "log_kow", "data": -0.31},
        {"prop": "water_solubility", "method": "wskownt", "data": 792800.0},
        {"prop": "water_solubility", "method": "waternt", "data": 1000000.0}
    ]})
}

/// Metabolizer que devuelve siempre dos hijos: `<padre>C` y `<padre>O`.
pub fn two_children(req: &BackendRequest) -> Result<Value, chem_adapters::AdapterError> {
    let parent = req.body["structure"].as_str().unwrap_or_default().to_string();
    let mut children = serde_json::Map::new();
    children.insert(format!("{parent}C"), json!({}));
    children.insert(format!("{parent}O"), json!({}));
    let mut results = serde_json::Map::new();
    results.insert(parent, Value::Object(children));
    Ok(json!({ "results": results }))
}
