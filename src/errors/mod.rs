pub mod core_error;
pub mod dispatch_error;

pub use core_error::CoreError;
pub use dispatch_error::DispatchError;
