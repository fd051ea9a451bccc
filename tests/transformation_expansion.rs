mod support;

use chem_adapters::calculators::EpiAdapter;
use chem_adapters::{ScriptedTransport, Transport};
use chem_core::InMemoryResultCache;
use ctsflow_rust::{Dispatcher, ExpansionRequest, Registry};
use serde_json::json;
use std::sync::Arc;
use support::{harness, two_children};

fn expansion(structure: &str, generation_limit: u32, libraries: &[&str]) -> ExpansionRequest {
    ExpansionRequest { structure: structure.to_string(),
                       generation_limit,
                       transformation_libraries: libraries.iter().map(|s| s.to_string()).collect() }
}

#[tokio::test]
async fn generation_limit_zero_yields_only_the_root() {
    let h = harness(ScriptedTransport::new(two_children));
    let records = h.dispatcher.expand_transformations(&expansion("CCO", 0, &[])).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].parent_id, None);
    assert_eq!(records[0].generation, 0);
    assert_eq!(h.transport.calls(), 0);
}

#[tokio::test]
async fn two_generations_of_two_children_make_seven_nodes() {
    let h = harness(ScriptedTransport::new(two_children));
    let records = h.dispatcher.expand_transformations(&expansion("CCO", 2, &["hydrolysis"])).await.unwrap();
    assert_eq!(records.len(), 7);
    assert_eq!(records.iter().filter(|r| r.generation == 2).count(), 4);
    // una llamada por nodo no hoja
    assert_eq!(h.transport.calls(), 3);
    for r in records.iter().skip(1) {
        let parent = records.iter().find(|p| Some(p.id) == r.parent_id).unwrap();
        assert_eq!(parent.generation + 1, r.generation);
        assert!(r.structure.starts_with(&parent.structure));
    }
}

#[tokio::test]
async fn human_biotransformation_omits_the_library_filter() {
    let h = harness(ScriptedTransport::new(two_children));
    h.dispatcher
     .expand_transformations(&expansion("CCOC(C)=O", 1, &["hydrolysis", "human_biotransformation"]))
     .await
     .unwrap();
    h.dispatcher.expand_transformations(&expansion("CCOC(C)=O", 1, &["hydrolysis", "abiotic_reduction"])).await.unwrap();
    let sent = h.transport.requests();
    assert!(sent[0].body.get("transformationLibraries").is_none());
    assert_eq!(sent[1].body["transformationLibraries"], json!(["hydrolysis", "abiotic_reduction"]));
}

#[tokio::test]
async fn identical_structures_are_not_suppressed() {
    // el backend devuelve al propio padre como hijo
    let h = harness(ScriptedTransport::new(|req| {
        let parent = req.body["structure"].as_str().unwrap_or_default().to_string();
        let mut children = serde_json::Map::new();
        children.insert(parent.clone(), json!({}));
        let mut results = serde_json::Map::new();
        results.insert(parent, serde_json::Value::Object(children));
        Ok(json!({ "results": results }))
    }));
    let records = h.dispatcher.expand_transformations(&expansion("CCO", 3, &[])).await.unwrap();
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r.structure == "CCO"));
}

#[tokio::test]
async fn expansion_requires_a_configured_metabolizer() {
    let transport: Arc<dyn Transport> = Arc::new(ScriptedTransport::new(two_children));
    let mut registry = Registry::new(transport);
    registry.register(Box::new(EpiAdapter::new("http://epi")));
    let dispatcher = Dispatcher::new(Arc::new(registry), Arc::new(InMemoryResultCache::new()));
    let err = dispatcher.expand_transformations(&expansion("CCO", 1, &[])).await.unwrap_err();
    assert_eq!(err.code(), "UnknownCalculator");
}

#[tokio::test]
async fn expansion_request_reads_wire_names() {
    let req: ExpansionRequest = serde_json::from_value(json!({
        "structure": "CCO", "generationLimit": 2, "transformationLibraries": ["hydrolysis"]
    })).unwrap();
    assert_eq!(req, expansion("CCO", 2, &["hydrolysis"]));
    let bare: ExpansionRequest = serde_json::from_value(json!({"structure": "CCO", "generationLimit": 1})).unwrap();
    assert!(bare.transformation_libraries.is_empty());
}
