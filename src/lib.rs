//! Native interop fixture: probe exports plus a host-side verifier.
pub mod api;
pub mod common;
pub mod loader;
pub mod verify;

pub use api::domain::{FunctionId, Guid};
pub use common::{ProbeCode, ProbeError, ProbeResult};
