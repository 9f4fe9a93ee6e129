//! Contract checks run against a compiled fixture.

pub mod domain;
pub mod service;

pub use domain::{Lookup, Outcome, Report};
pub use service::{
    first_failure, verify_exports, verify_library, verify_library_with, verify_strict,
    EXPECTED_GUID_BYTES,
};
