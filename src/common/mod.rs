//! Shared utilities for the host side of the crate.
pub mod config;
pub mod error;
pub mod log;

pub use error::{ProbeCode, ProbeError, ProbeResult};
