//! Metadata estática por calculadora.
//!
//! Un `CalculatorDescriptor` declara qué propiedades expone un backend, en
//! qué unidades, con qué métodos publicados y bajo qué clave interna las
//! devuelve (`result_key`). Es inmutable una vez registrado: el registry lo
//! construye al arrancar y sólo lo presta por referencia.
use indexmap::IndexMap;
use serde::Serialize;

use crate::Calculator;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySpec {
    /// Nombre canónico (ej. `kow_no_ph`).
    pub name: String,
    pub description: String,
    pub units: Option<String>,
    /// Nombre con el que el backend identifica la propiedad en su respuesta.
    #[serde(skip)]
    pub result_key: String,
    /// Código interno del backend -> nombre publicado del método.
    #[serde(skip)]
    pub methods: IndexMap<String, String>,
    /// Método implícito cuando el backend calcula con un único método.
    pub default_method: Option<String>,
}

impl PropertySpec {
    pub fn new(name: &str, result_key: &str, description: &str) -> Self {
        Self { name: name.to_string(),
               description: description.to_string(),
               units: None,
               result_key: result_key.to_string(),
               methods: IndexMap::new(),
               default_method: None }
    }

    pub fn units(mut self, units: &str) -> Self {
        self.units = Some(units.to_string());
        self
    }

    pub fn method(mut self, backend_code: &str, published: &str) -> Self {
        self.methods.insert(backend_code.to_string(), published.to_string());
        self
    }

    pub fn default_method(mut self, method: &str) -> Self {
        self.default_method = Some(method.to_string());
        self
    }

    pub fn has_methods(&self) -> bool {
        !self.methods.is_empty()
    }

    /// Traduce un código interno a su nombre publicado.
    pub fn published_method(&self, backend_code: &str) -> Option<&str> {
        self.methods.get(backend_code).map(String::as_str)
    }

    /// Inversa de `published_method` (acepta también el código interno tal cual).
    pub fn backend_method(&self, method: &str) -> Option<&str> {
        self.methods
            .iter()
            .find(|(code, published)| published.eq_ignore_ascii_case(method) || code.as_str() == method)
            .map(|(code, _)| code.as_str())
    }

    pub fn published_methods(&self) -> Vec<&str> {
        self.methods.values().map(String::as_str).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculatorDescriptor {
    pub calculator: Calculator,
    pub model_version: String,
    pub description: String,
    pub properties: IndexMap<String, PropertySpec>,
}

impl CalculatorDescriptor {
    pub fn new(calculator: Calculator, model_version: &str, description: &str) -> Self {
        Self { calculator,
               model_version: model_version.to_string(),
               description: description.to_string(),
               properties: IndexMap::new() }
    }

    pub fn with_property(mut self, spec: PropertySpec) -> Self {
        self.properties.insert(spec.name.clone(), spec);
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertySpec> {
        self.properties.get(name)
    }

    pub fn property_names(&self) -> Vec<&str> {
        self.properties.keys().map(String::as_str).collect()
    }

    /// Resuelve la clave interna del backend a la propiedad canónica.
    pub fn property_for_result_key(&self, result_key: &str) -> Option<&PropertySpec> {
        self.properties.values().find(|p| p.result_key == result_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kow() -> PropertySpec {
        PropertySpec::new("kow_no_ph", "logP", "octanol/water partition coefficient").units("log")
                                                                                      .method("klop", "KLOP")
                                                                                      .method("phys", "PHYS")
                                                                                      .method("vg", "VG")
    }

    #[test]
    fn method_maps_both_ways() {
        let spec = kow();
        assert_eq!(spec.published_method("phys"), Some("PHYS"));
        assert_eq!(spec.published_method("PHYS"), None);
        assert_eq!(spec.backend_method("VG"), Some("vg"));
        assert_eq!(spec.backend_method("vg"), Some("vg"));
        assert_eq!(spec.published_methods(), vec!["KLOP", "PHYS", "VG"]);
    }

    #[test]
    fn descriptor_keeps_declared_order_and_resolves_keys() {
        let desc = CalculatorDescriptor::new(Calculator::Chemaxon, "15.3", "d")
            .with_property(PropertySpec::new("water_sol", "solubility", "water solubility"))
            .with_property(kow());
        assert_eq!(desc.property_names(), vec!["water_sol", "kow_no_ph"]);
        assert_eq!(desc.property_for_result_key("logP").map(|p| p.name.as_str()), Some("kow_no_ph"));
        assert!(desc.property("koc").is_none());
    }
}
