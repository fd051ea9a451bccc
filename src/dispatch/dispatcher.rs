use chem_adapters::BackendAdapter;
use chem_core::{CacheKey, ResultCache};
use chem_domain::{normalize, Calculator, CanonicalRequest, CanonicalResult, RunMode};
use log::{debug, info, warn};
use serde_json::Value;
use std::sync::Arc;
use tokio::task;
use uuid::Uuid;

use super::disambiguator;
use super::inbound::{error_envelope, to_outbound, InboundRequest};
use crate::errors::DispatchError;
use crate::metabolizer::{ExpansionRequest, Expander, TransformationRecord};
use crate::registry::Registry;

/// Conduce cada petición por el pipeline completo.
///
/// Registry y caché se inyectan al construir; el dispatcher no guarda más
/// estado. La caché sólo recibe resultados `ok` y se escribe una vez por
/// fallo de caché. No hay de-duplicación de peticiones concurrentes.
pub struct Dispatcher {
    registry: Arc<Registry>,
    cache: Arc<dyn ResultCache>,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>, cache: Arc<dyn ResultCache>) -> Self {
        Self { registry, cache }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Petición externa: calculadora por nombre, estructura sin normalizar.
    ///
    /// `Err` sólo para fallos terminales (calculadora desconocida o
    /// estructura inválida); los fallos de backend vuelven como resultado
    /// con `status=error`.
    pub async fn dispatch(&self, inbound: &InboundRequest) -> Result<CanonicalResult, DispatchError> {
        let calculator: Calculator = inbound.calculator.parse()?;
        self.adapter(calculator)?;
        let structure = normalize(&inbound.structure)?;
        let mut request = CanonicalRequest::new(structure, calculator).conditions(inbound.conditions.clone())
                                                                      .run_mode(RunMode::from_run_type(inbound.run_type.as_deref()));
        if let Some(property) = &inbound.property {
            request = request.property(property);
        }
        self.dispatch_request(&request).await
    }

    /// Petición ya canónica.
    pub async fn dispatch_request(&self, request: &CanonicalRequest) -> Result<CanonicalResult, DispatchError> {
        let adapter = self.adapter(request.calculator)?;
        let request_id = Uuid::new_v4();
        debug!("dispatch:start id={request_id} calc={} prop={:?} structure={}",
               request.calculator,
               request.property,
               request.structure);
        let result = self.run(adapter, request, request_id).await;
        debug!("dispatch:done id={request_id} status={:?}", result.status);
        Ok(result)
    }

    /// Frontera de salida: siempre devuelve el JSON de resultado.
    pub async fn handle(&self, inbound: &InboundRequest) -> Value {
        match self.dispatch(inbound).await {
            Ok(result) => to_outbound(&result),
            Err(err) => {
                info!("dispatch rejected calc={} err={err}", inbound.calculator);
                error_envelope(inbound, &err)
            }
        }
    }

    /// Árbol de productos de transformación, aplanado.
    pub async fn expand_transformations(&self, request: &ExpansionRequest) -> Result<Vec<TransformationRecord>, DispatchError> {
        let adapter = self.registry
                          .metabolizer()
                          .ok_or_else(|| DispatchError::UnknownCalculator(Calculator::Metabolizer.to_string()))?;
        let root = normalize(&request.structure)?;
        let tree = Expander::new(adapter, self.registry.transport()).expand(&root,
                                                                            request.generation_limit,
                                                                            &request.transformation_libraries)
                                                                    .await;
        Ok(tree.flatten())
    }

    fn adapter(&self, calculator: Calculator) -> Result<&dyn BackendAdapter, DispatchError> {
        self.registry
            .lookup(calculator)
            .ok_or_else(|| DispatchError::UnknownCalculator(calculator.to_string()))
    }

    async fn run(&self, adapter: &dyn BackendAdapter, request: &CanonicalRequest, request_id: Uuid) -> CanonicalResult {
        let calculator = request.calculator;
        let descriptor = adapter.descriptor();
        let property = match request.property.as_deref() {
            Some(p) if descriptor.property(p).is_some() => p,
            other => {
                let err = DispatchError::PropertyNotFound(format!("{calculator} does not offer {}", other.unwrap_or("<none>")));
                return CanonicalResult::error(calculator, other.unwrap_or_default(), err.to_string());
            }
        };

        let key = CacheKey::derive(request.structure.as_str(),
                                   calculator.as_str(),
                                   Some(property),
                                   &request.conditions.to_value());
        if let Some(hit) = self.cached(&key, request_id).await {
            return hit;
        }

        let response = match adapter.call(self.registry.transport(), request).await {
            Ok(r) => r,
            Err(e) => {
                let err = DispatchError::from(e);
                warn!("dispatch id={request_id} calc={calculator} prop={property} failed: {err}");
                return CanonicalResult::error(calculator, property, err.to_string());
            }
        };

        let result = match disambiguator::select(&response, property, descriptor) {
            Ok(r) => r,
            Err(err) => {
                warn!("dispatch id={request_id} calc={calculator}: {err}");
                return CanonicalResult::error(calculator, property, err.to_string());
            }
        };

        match serde_json::to_value(&result) {
            Ok(payload) => {
                let cache = Arc::clone(&self.cache);
                let digest = key.digest.clone();
                match task::spawn_blocking(move || cache.insert(&key, payload)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => warn!("dispatch id={request_id} cache insert failed key={digest}: {e}"),
                    Err(e) => warn!("dispatch id={request_id} cache insert task failed key={digest}: {e}"),
                }
            }
            Err(e) => warn!("dispatch id={request_id} result not serializable, not cached: {e}"),
        }

        match request.run_mode {
            RunMode::Interactive => result.with_raw(Some(response.raw)),
            RunMode::Batch => result,
        }
    }

    /// Un fallo de lectura o un payload ilegible cuentan como fallo de caché.
    ///
    /// La caché puede hacer I/O bloqueante (Postgres con reintentos), por eso
    /// se consulta fuera de los workers del runtime.
    async fn cached(&self, key: &CacheKey, request_id: Uuid) -> Option<CanonicalResult> {
        let cache = Arc::clone(&self.cache);
        let lookup = key.clone();
        let entry = match task::spawn_blocking(move || cache.find(&lookup)).await {
            Ok(Ok(entry)) => entry?,
            Ok(Err(e)) => {
                warn!("dispatch id={request_id} cache find failed key={}: {e}", key.digest);
                return None;
            }
            Err(e) => {
                warn!("dispatch id={request_id} cache find task failed key={}: {e}", key.digest);
                return None;
            }
        };
        match serde_json::from_value::<CanonicalResult>(entry.payload) {
            Ok(result) if result.is_ok() && result.value.is_none() => {
                warn!("dispatch id={request_id} cached ok entry without value key={}, ignoring", key.digest);
                None
            }
            Ok(result) => {
                debug!("dispatch id={request_id} cache hit key={}", key.digest);
                Some(result)
            }
            Err(e) => {
                warn!("dispatch id={request_id} unreadable cache entry key={}: {e}", key.digest);
                None
            }
        }
    }
}
