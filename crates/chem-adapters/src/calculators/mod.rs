//! Adaptadores de propiedades físico-químicas.
mod chemaxon;
mod cheminfo;
mod epi;
mod opera;
mod sparc;

pub use chemaxon::{chemaxon_descriptor, ChemaxonAdapter};
pub use cheminfo::{cheminfo_descriptor, ChemInfoAdapter};
pub use epi::{epi_descriptor, measured_descriptor, EpiAdapter, MeasuredAdapter};
pub use opera::{opera_descriptor, OperaAdapter};
pub use sparc::{sparc_descriptor, SparcAdapter};
pub use test::{test_descriptor, TestAdapter};

/// pH usado cuando una propiedad dependiente de pH no lo recibe.
pub const DEFAULT_PH: f64 = 7.4;
