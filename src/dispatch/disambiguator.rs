//! Selección de la propiedad pedida dentro de una respuesta de backend.
//!
//! - Una entrada sin método: se devuelve tal cual (con el método por
//!   defecto del descriptor, si lo hay).
//! - Varias entradas con método para la misma propiedad: se conservan todas,
//!   en orden, con el nombre publicado del método.
//! - Ninguna entrada de la propiedad: `PropertyNotFound`. Un valor `null`
//!   cuenta como ausente, así nunca llega a la caché un `ok` vacío.
use chem_adapters::BackendResponse;
use chem_domain::{CalculatorDescriptor, CanonicalResult, MethodValue, ResultValue};
use log::debug;

use crate::errors::DispatchError;

pub fn select(response: &BackendResponse, requested_property: &str, descriptor: &CalculatorDescriptor) -> Result<CanonicalResult, DispatchError> {
    let not_found = || DispatchError::PropertyNotFound(format!("{} has no {requested_property}", descriptor.calculator));
    let spec = descriptor.property(requested_property).ok_or_else(not_found)?;
    let matching: Vec<_> = response.entries
                                   .iter()
                                   .filter(|e| e.prop == spec.result_key && !e.value.is_null())
                                   .collect();

    let with_method: Vec<MethodValue> =
        matching.iter()
                .filter_map(|e| {
                    let code = e.method.as_deref()?;
                    let published = spec.published_method(code).unwrap_or(code);
                    Some(MethodValue { method: published.to_string(),
                                       value: e.value.clone() })
                })
                .collect();

    let result = if !with_method.is_empty() {
        CanonicalResult::ok(descriptor.calculator, requested_property, ResultValue::Methods(with_method))
    } else {
        let entry = matching.first().ok_or_else(not_found)?;
        if matching.len() > 1 {
            debug!("{}: {} entries for {requested_property}, keeping the first", descriptor.calculator, matching.len());
        }
        CanonicalResult::ok(descriptor.calculator, requested_property, ResultValue::from_json(entry.value.clone()))
            .with_method(spec.default_method.clone())
    };
    Ok(result.with_units(spec.units.clone()))
}
