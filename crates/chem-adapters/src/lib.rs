//! chem-adapters: un adaptador por backend de cálculo.
//!
//! Cada adaptador es independiente: conoce el formato de petición de su
//! backend, cómo leer su respuesta y su `CalculatorDescriptor`. El transporte
//! (HTTP real o guionado en tests) se inyecta vía el trait `Transport`.
pub mod adapter;
pub mod calculators;
pub mod error;
pub mod metabolizer;
pub mod transport;

pub use adapter::{BackendAdapter, BackendEntry, BackendResponse};
pub use error::AdapterError;
pub use metabolizer::{metabolizer_descriptor, MetabolizerAdapter, DEFAULT_LIBRARIES, HUMAN_BIOTRANSFORMATION};
pub use transport::{BackendRequest, HttpTransport, ScriptedTransport, Transport};
