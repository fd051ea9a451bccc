//! `ctsflow`: lee una petición JSON por stdin y escribe el resultado.
//!
//! - `ctsflow < req.json` con `{"structure", "calculator", "property", "conditions"}`
//!   o `{"structure", "generationLimit", "transformationLibraries"}`.
//! - `ctsflow meta [calculator]` imprime la metadata.
use chem_domain::Calculator;
use ctsflow_rust::cache::result_cache_from_config;
use ctsflow_rust::{AppConfig, CoreError, Dispatcher, ExpansionRequest, InboundRequest, Registry};
use serde_json::{json, Value};
use std::io::Read;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), CoreError> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ctsflow_rust=info,warn")))
                             .with_writer(std::io::stderr)
                             .init();

    let config = AppConfig::from_env()?;
    let registry = Arc::new(Registry::from_config(&config)?);
    let args: Vec<String> = std::env::args().skip(1).collect();

    let output = if args.first().map(String::as_str) == Some("meta") {
        meta(&registry, args.get(1).map(String::as_str))?
    } else {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        let body: Value = serde_json::from_str(&input)?;
        let dispatcher = Dispatcher::new(registry, result_cache_from_config(&config)?);
        run(&dispatcher, body).await?
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn meta(registry: &Registry, calculator: Option<&str>) -> Result<Value, CoreError> {
    let Some(name) = calculator else {
        return Ok(registry.root_meta_info());
    };
    let calculator: Calculator = name.parse().map_err(|e: chem_domain::DomainError| CoreError::Config(e.to_string()))?;
    registry.meta_info(calculator).map_err(|e| CoreError::Config(e.to_string()))
}

async fn run(dispatcher: &Dispatcher, body: Value) -> Result<Value, CoreError> {
    if body.get("generationLimit").is_some() {
        let request: ExpansionRequest = serde_json::from_value(body)?;
        info!("expanding {} to generation {}", request.structure, request.generation_limit);
        return Ok(match dispatcher.expand_transformations(&request).await {
            Ok(records) => json!({ "status": "ok", "data": records }),
            Err(e) => json!({ "status": "error", "error": e.to_string(), "code": e.code() }),
        });
    }
    let request: InboundRequest = serde_json::from_value(body)?;
    Ok(dispatcher.handle(&request).await)
}
