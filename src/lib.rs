//! ctsflow: capa de enrutado y agregación sobre servicios de cálculo
//! físico-químico.
//!
//! - `registry`: calculadoras registradas, descriptores y `metaInfo`.
//! - `dispatch`: pipeline normalizar → caché → backend → selección → caché.
//! - `metabolizer`: árbol de productos de transformación.
//! - `config`, `cache`, `errors`: configuración del proceso.

pub mod cache;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod metabolizer;
pub mod registry;

pub use config::AppConfig;
pub use dispatch::{Dispatcher, InboundRequest};
pub use errors::{CoreError, DispatchError};
pub use metabolizer::{ExpansionRequest, TransformationRecord};
pub use registry::Registry;
