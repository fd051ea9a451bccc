//! Transporte hacia los backends.
//!
//! `HttpTransport` usa un único `reqwest::Client` con timeout acotado; no hay
//! reintentos automáticos. `ScriptedTransport` responde con una función y
//! registra cada petición (tests y demos sin red).
use async_trait::async_trait;
use log::{debug, warn};
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

use crate::AdapterError;

/// Petición nativa de un backend: URL completa + cuerpo JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendRequest {
    pub url: String,
    pub body: Value,
}

impl BackendRequest {
    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self { url: url.into(), body }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(&self, request: &BackendRequest) -> Result<Value, AdapterError>;
}

pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, AdapterError> {
        let client = reqwest::Client::builder().timeout(timeout)
                                               .build()
                                               .map_err(|e| AdapterError::Unavailable(format!("http client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, request: &BackendRequest) -> Result<Value, AdapterError> {
        debug!("post_json:start url={}", request.url);
        let resp = self.client
                       .post(&request.url)
                       .json(&request.body)
                       .send()
                       .await
                       .map_err(|e| {
                           warn!("backend unreachable url={} timeout={} err={e}", request.url, e.is_timeout());
                           AdapterError::Unavailable(format!("{}: {e}", request.url))
                       })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AdapterError::Backend(format!("{} returned {status}: {body}", request.url)));
        }

        let body = resp.json::<Value>().await.map_err(|e| {
                                                  if e.is_timeout() {
                                                      AdapterError::Unavailable(format!("{}: {e}", request.url))
                                                  } else {
                                                      AdapterError::Backend(format!("unparseable response from {}: {e}", request.url))
                                                  }
                                              })?;
        debug!("post_json:done url={} status={status}", request.url);
        Ok(body)
    }
}

type Responder = Box<dyn Fn(&BackendRequest) -> Result<Value, AdapterError> + Send + Sync>;

/// Transporte en memoria: responde con `responder` y guarda las peticiones.
pub struct ScriptedTransport {
    responder: Responder,
    requests: Mutex<Vec<BackendRequest>>,
}

impl ScriptedTransport {
    pub fn new<F>(responder: F) -> Self
        where F: Fn(&BackendRequest) -> Result<Value, AdapterError> + Send + Sync + 'static
    {
        Self { responder: Box::new(responder),
               requests: Mutex::new(Vec::new()) }
    }

    /// Responde siempre el mismo JSON.
    pub fn fixed(body: Value) -> Self {
        Self::new(move |_| Ok(body.clone()))
    }

    /// Simula un timeout en cada llamada.
    pub fn unavailable() -> Self {
        Self::new(|req| Err(AdapterError::Unavailable(format!("{}: operation timed out", req.url))))
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn requests(&self) -> Vec<BackendRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post_json(&self, request: &BackendRequest) -> Result<Value, AdapterError> {
        if let Ok(mut log) = self.requests.lock() {
            log.push(request.clone());
        }
        (self.responder)(request)
    }
}
