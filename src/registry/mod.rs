//! Registro de calculadoras.
//!
//! Mapea cada `Calculator` a su adaptador (y con él a su descriptor). Se
//! llena una vez al arrancar; después sólo se consulta. Añadir una
//! calculadora es registrar su adaptador, sin tocar el dispatcher.
mod meta;

pub use meta::job_id;

use chem_adapters::calculators::{ChemInfoAdapter, ChemaxonAdapter, EpiAdapter, MeasuredAdapter, OperaAdapter, SparcAdapter,
                                 TestAdapter};
use chem_adapters::{BackendAdapter, HttpTransport, MetabolizerAdapter, Transport};
use chem_domain::{Calculator, CalculatorDescriptor};
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{AppConfig, DEFAULT_REST_BASE_URL};
use crate::errors::CoreError;

pub struct Registry {
    transport: Arc<dyn Transport>,
    adapters: HashMap<Calculator, Box<dyn BackendAdapter>>,
    metabolizer: Option<MetabolizerAdapter>,
    rest_base_url: String,
}

impl Registry {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport,
               adapters: HashMap::new(),
               metabolizer: None,
               rest_base_url: DEFAULT_REST_BASE_URL.to_string() }
    }

    pub fn with_rest_base_url(mut self, url: &str) -> Self {
        self.rest_base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Registra un adaptador bajo la calculadora que declara su descriptor.
    pub fn register(&mut self, adapter: Box<dyn BackendAdapter>) {
        let calculator = adapter.calculator();
        if self.adapters.insert(calculator, adapter).is_some() {
            warn!("registry: {calculator} registered twice, keeping the last adapter");
        }
    }

    pub fn register_metabolizer(&mut self, adapter: MetabolizerAdapter) {
        self.metabolizer = Some(adapter);
    }

    /// Registry con transporte HTTP real.
    pub fn from_config(config: &AppConfig) -> Result<Self, CoreError> {
        let transport = HttpTransport::new(config.backend_timeout).map_err(|e| CoreError::Config(e.to_string()))?;
        Ok(Self::from_config_with_transport(config, Arc::new(transport)))
    }

    /// Registra cada calculadora cuyo servidor está configurado.
    pub fn from_config_with_transport(config: &AppConfig, transport: Arc<dyn Transport>) -> Self {
        let mut registry = Self::new(transport).with_rest_base_url(&config.rest_base_url);
        let servers = &config.servers;
        if let Some(url) = &servers.chemaxon {
            registry.register(Box::new(ChemaxonAdapter::new(url)));
            registry.register(Box::new(ChemInfoAdapter::new(url)));
        }
        if let Some(url) = &servers.epi {
            registry.register(Box::new(EpiAdapter::new(url)));
            registry.register(Box::new(MeasuredAdapter::new(url)));
        }
        if let Some(url) = &servers.test {
            registry.register(Box::new(TestAdapter::new(url)));
        }
        if let Some(url) = &servers.sparc {
            registry.register(Box::new(SparcAdapter::new(url)));
        }
        if let Some(url) = &servers.opera {
            registry.register(Box::new(OperaAdapter::new(url)));
        }
        if let Some(url) = &servers.metabolizer {
            registry.register_metabolizer(MetabolizerAdapter::new(url));
        }
        info!("registry: calculators={:?}",
              registry.calculators().iter().map(Calculator::as_str).collect::<Vec<_>>());
        registry
    }

    pub fn lookup(&self, calculator: Calculator) -> Option<&dyn BackendAdapter> {
        self.adapters.get(&calculator).map(|a| a.as_ref())
    }

    /// Descriptor de cualquier calculadora registrada, metabolizer incluido.
    pub fn descriptor(&self, calculator: Calculator) -> Option<&CalculatorDescriptor> {
        match calculator {
            Calculator::Metabolizer => self.metabolizer.as_ref().map(MetabolizerAdapter::descriptor),
            other => self.lookup(other).map(|a| a.descriptor()),
        }
    }

    pub fn metabolizer(&self) -> Option<&MetabolizerAdapter> {
        self.metabolizer.as_ref()
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// Calculadoras registradas, en orden de catálogo.
    pub fn calculators(&self) -> Vec<Calculator> {
        Calculator::ALL.iter().copied().filter(|c| self.descriptor(*c).is_some()).collect()
    }

    pub fn rest_base_url(&self) -> &str {
        &self.rest_base_url
    }
}
