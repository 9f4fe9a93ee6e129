//! The exported surface of the fixture and the types it is described with.

pub mod catalog;
pub mod domain;
pub mod ffi;

pub use catalog::{catalog, full_catalog, Convention, ExportKind, ExportSpec};
pub use domain::{FunctionId, Guid};
