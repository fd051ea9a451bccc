use chem_domain::{normalize, CalculatorDescriptor, Calculator, CanonicalRequest, Conditions, DomainError, PropertySpec, RunMode};

#[test]
fn test_normalize_is_idempotent_over_notation_variants() {
    // Same molecule written with stereo, salts and titles
    let inputs = ["OC(=O)[C@@H](N)Cc1ccccc1",
                  "OC(=O)[C@H](N)Cc1ccccc1 L-phenylalanine",
                  "Cl.OC(=O)[C@H](N)Cc1ccccc1",
                  "[Na+].[O-]C(=O)/C=C/C(=O)[O-]"];
    for raw in inputs {
        let once = normalize(raw).unwrap();
        let twice = normalize(once.as_str()).unwrap();
        assert_eq!(once, twice, "normalize must be idempotent for {raw}");
    }
}

#[test]
fn test_enantiomers_share_canonical_structure() {
    let l = normalize("N[C@@H](C)C(=O)O").unwrap();
    let d = normalize("N[C@H](C)C(=O)O").unwrap();
    assert_eq!(l, d);
}

#[test]
fn test_invalid_structure_is_reported() {
    let err = normalize("not a smiles").unwrap_err();
    assert!(matches!(err, DomainError::InvalidStructure(_)));
    assert!(err.to_string().starts_with("invalid structure"));
}

#[test]
fn test_request_builder_carries_normalized_structure() {
    let structure = normalize("CCO.Cl").unwrap();
    let req = CanonicalRequest::new(structure, Calculator::Chemaxon).property("kow_wph")
                                                                     .conditions(Conditions::new().with("ph", 5.0))
                                                                     .run_mode(RunMode::Batch);
    assert_eq!(req.structure.as_str(), "CCO");
    assert_eq!(req.conditions.ph(), Some(5.0));
    assert_eq!(req.property.as_deref(), Some("kow_wph"));
}

#[test]
fn test_descriptor_serializes_published_metadata_only() {
    let desc = CalculatorDescriptor::new(Calculator::Epi, "4.11", "EPI Suite")
        .with_property(PropertySpec::new("water_sol", "water_solubility", "water solubility").units("mg/L")
                                                                                            .method("wskownt", "WSKOW"));
    let v = serde_json::to_value(&desc).unwrap();
    let prop = &v["properties"]["water_sol"];
    assert_eq!(prop["units"], "mg/L");
    assert!(prop.get("result_key").is_none());
    assert!(prop.get("methods").is_none());
}
