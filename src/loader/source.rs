//! Anything exports can be resolved from.

use std::ffi::c_void;

use crate::common::error::{ProbeError, ProbeResult};

/// Name and ordinal lookup over a set of exports.
///
/// [`NativeLibrary`](super::NativeLibrary) is the real implementation; the
/// verifier only depends on this trait, so it can also be pointed at an
/// in-process export table.
pub trait ExportSource {
    /// Human readable origin, used in reports.
    fn label(&self) -> String;

    fn get_export(&self, name: &str) -> ProbeResult<*const c_void>;

    fn try_get_export(&self, name: &str) -> Option<*const c_void> {
        self.get_export(name).ok()
    }

    /// Sources without an ordinal table report every ordinal as missing.
    fn get_ordinal(&self, ordinal: u16) -> ProbeResult<*const c_void> {
        Err(ProbeError::MissingOrdinal { ordinal })
    }
}
