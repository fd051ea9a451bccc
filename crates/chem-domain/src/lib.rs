// chem-domain library entry point
pub mod calculator;
pub mod descriptor;
pub mod error;
pub mod request;
pub mod result;
pub mod structure;

pub use calculator::Calculator;
pub use descriptor::{CalculatorDescriptor, PropertySpec};
pub use error::DomainError;
pub use request::{CanonicalRequest, Conditions, RunMode};
pub use result::{CanonicalResult, MethodValue, ResultStatus, ResultValue};
pub use structure::{normalize, CanonicalStructure};
