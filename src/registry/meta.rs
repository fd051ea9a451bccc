//! `metaInfo` e inputs publicados por cada calculadora.
use chem_adapters::DEFAULT_LIBRARIES;
use chem_domain::{Calculator, CalculatorDescriptor};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use super::Registry;
use crate::errors::DispatchError;

const SERVICE_DESCRIPTION: &str = "The Chemical Transformation System (CTS) provides access to a collection of physicochemical properties and reaction transformation pathways.";

/// Identificador de trabajo: `YYYYMMDDHHMMSSffffff`.
pub fn job_id(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d%H%M%S%6f").to_string()
}

fn available_props(descriptor: &CalculatorDescriptor) -> Vec<Value> {
    descriptor.properties
              .values()
              .map(|spec| {
                  let mut prop = json!({ "prop": spec.name, "description": spec.description });
                  if let Some(units) = &spec.units {
                      prop["units"] = json!(units);
                  }
                  if spec.has_methods() {
                      prop["methods"] = json!(spec.published_methods());
                  }
                  prop
              })
              .collect()
}

impl Registry {
    fn unknown(calculator: Calculator) -> DispatchError {
        DispatchError::UnknownCalculator(calculator.to_string())
    }

    /// `{metaInfo, links}` de una calculadora registrada.
    pub fn meta_info(&self, calculator: Calculator) -> Result<Value, DispatchError> {
        let descriptor = self.descriptor(calculator).ok_or_else(|| Self::unknown(calculator))?;
        let base = self.rest_base_url();
        let link = |rel: &str, description: &str| {
            json!({
                "rel": rel,
                "type": "application/json",
                "href": format!("{base}/{calculator}/{rel}"),
                "description": description,
                "method": "POST",
            })
        };
        Ok(json!({
            "metaInfo": {
                "model": calculator.as_str(),
                "collection": "qed",
                "modelVersion": descriptor.model_version,
                "description": descriptor.description,
                "status": "",
                "timestamp": job_id(Utc::now()),
                "url": { "type": "application/json", "href": format!("{base}/{calculator}") },
                "availableProps": available_props(descriptor),
            },
            "links": [
                link("inputs", &format!("{calculator} input schema")),
                link("outputs", &format!("{calculator} output schema")),
                link("run", &format!("{calculator} estimated values")),
            ],
        }))
    }

    /// Metadata del servicio agregado con un enlace por calculadora.
    pub fn root_meta_info(&self) -> Value {
        let base = self.rest_base_url();
        let links: Vec<Value> = self.calculators()
                                    .into_iter()
                                    .map(|c| json!({ "rel": c.as_str(), "type": "application/json", "href": format!("{base}/{c}") }))
                                    .collect();
        json!({
            "metaInfo": {
                "model": "cts",
                "collection": "qed",
                "modelVersion": env!("CARGO_PKG_VERSION"),
                "description": SERVICE_DESCRIPTION,
                "status": "",
                "timestamp": job_id(Utc::now()),
                "url": { "type": "application/json", "href": base },
            },
            "links": links,
        })
    }

    /// Esquema de entrada de una calculadora.
    pub fn inputs(&self, calculator: Calculator, chemical: &str, prop: Option<&str>) -> Result<Value, DispatchError> {
        let meta = self.meta_info(calculator)?;
        let inputs = if calculator.is_property_calculator() {
            json!({ "chemical": chemical, "prop": prop, "calc": calculator.as_str(), "run_type": "rest" })
        } else {
            json!({ "structure": "", "generationLimit": 1, "transformationLibraries": DEFAULT_LIBRARIES })
        };
        Ok(json!({ "metaInfo": meta["metaInfo"], "inputs": inputs }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chem_adapters::calculators::EpiAdapter;
    use chem_adapters::{MetabolizerAdapter, ScriptedTransport};
    use chrono::TimeZone;
    use std::sync::Arc;

    fn registry() -> Registry {
        let mut registry = Registry::new(Arc::new(ScriptedTransport::fixed(json!({})))).with_rest_base_url("http://cts/rest/");
        registry.register(Box::new(EpiAdapter::new("http://epi")));
        registry.register_metabolizer(MetabolizerAdapter::new("http://efs"));
        registry
    }

    #[test]
    fn job_id_has_microsecond_precision() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap() + chrono::Duration::microseconds(42);
        assert_eq!(job_id(at), "20240309140507000042");
    }

    #[test]
    fn meta_info_lists_props_units_and_methods() {
        let meta = registry().meta_info(Calculator::Epi).unwrap();
        assert_eq!(meta["metaInfo"]["model"], "epi");
        assert_eq!(meta["metaInfo"]["modelVersion"], "4.11");
        assert_eq!(meta["metaInfo"]["url"]["href"], "http://cts/rest/epi");
        let props = meta["metaInfo"]["availableProps"].as_array().unwrap();
        let water = props.iter().find(|p| p["prop"] == "water_sol").unwrap();
        assert_eq!(water["units"], "mg/L");
        assert_eq!(water["methods"], json!(["WSKOW", "WATERNT"]));
        assert_eq!(meta["links"][2]["href"], "http://cts/rest/epi/run");
    }

    #[test]
    fn inputs_depend_on_calculator_kind() {
        let reg = registry();
        let epi = reg.inputs(Calculator::Epi, "CCO", Some("koc")).unwrap();
        assert_eq!(epi["inputs"], json!({"chemical": "CCO", "prop": "koc", "calc": "epi", "run_type": "rest"}));
        let met = reg.inputs(Calculator::Metabolizer, "", None).unwrap();
        assert_eq!(met["inputs"]["generationLimit"], 1);
        assert_eq!(met["inputs"]["transformationLibraries"][2], "human_biotransformation");
        assert!(reg.inputs(Calculator::Sparc, "CCO", None).is_err());
    }

    #[test]
    fn root_meta_links_registered_calculators() {
        let root = registry().root_meta_info();
        let rels: Vec<&str> = root["links"].as_array().unwrap().iter().filter_map(|l| l["rel"].as_str()).collect();
        assert_eq!(rels, vec!["epi", "metabolizer"]);
    }
}
