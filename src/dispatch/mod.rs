//! Pipeline de una petición: normalizar, consultar caché, llamar al
//! backend, seleccionar la propiedad y escribir en caché.
pub mod disambiguator;
mod dispatcher;
mod inbound;

pub use dispatcher::Dispatcher;
pub use inbound::{error_envelope, InboundRequest};
