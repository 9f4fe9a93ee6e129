//! Error handling primitives shared by the loader, the verifier and the CLI.
//!
//! The exported probes never fail; everything here belongs to the host side.

use std::path::PathBuf;

use thiserror::Error;

/// Stable codes, also used as the process exit status of `verify-fixture`.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ProbeCode {
    /// Success code used as a sentinel.
    Ok = 0,
    /// The library could not be loaded.
    LoadFailed = 1,
    /// A named export was not found.
    MissingExport = 2,
    /// An ordinal export was not found.
    MissingOrdinal = 3,
    /// A probe returned a tag other than its own.
    TagMismatch = 4,
    /// A symbol that must stay unnamed resolved by name.
    UnexpectedExport = 5,
    /// The exported GUID did not match the literal.
    GuidMismatch = 6,
    /// A GUID string could not be parsed.
    InvalidGuid = 7,
    /// Catch-all for bugs and unsupported paths.
    Internal = 8,
}

/// Canonical error type for the host side of the crate.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to load {path}: {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    #[error("export `{name}` not found")]
    MissingExport {
        name: String,
        #[source]
        source: Option<libloading::Error>,
    },

    #[error("ordinal @{ordinal} not found")]
    MissingOrdinal { ordinal: u16 },

    #[error("`{export}` returned tag {observed}, expected {expected}")]
    TagMismatch {
        export: String,
        expected: i32,
        observed: i32,
    },

    #[error("`{name}` must not be exported by name")]
    UnexpectedExport { name: String },

    #[error("GlobalGuid mismatch: read {observed}, expected {expected}")]
    GuidMismatch { expected: String, observed: String },

    #[error("invalid guid `{0}`")]
    InvalidGuid(String),

    #[error("internal error: {0}")]
    Internal(&'static str),
}

/// Result alias used throughout the crate.
pub type ProbeResult<T> = Result<T, ProbeError>;

impl ProbeError {
    /// A named export that is absent, without a loader error to attach.
    pub fn missing_export(name: impl Into<String>) -> Self {
        ProbeError::MissingExport {
            name: name.into(),
            source: None,
        }
    }

    /// Machine parsable code for this error.
    pub fn code(&self) -> ProbeCode {
        match self {
            ProbeError::LoadFailed { .. } => ProbeCode::LoadFailed,
            ProbeError::MissingExport { .. } => ProbeCode::MissingExport,
            ProbeError::MissingOrdinal { .. } => ProbeCode::MissingOrdinal,
            ProbeError::TagMismatch { .. } => ProbeCode::TagMismatch,
            ProbeError::UnexpectedExport { .. } => ProbeCode::UnexpectedExport,
            ProbeError::GuidMismatch { .. } => ProbeCode::GuidMismatch,
            ProbeError::InvalidGuid(_) => ProbeCode::InvalidGuid,
            ProbeError::Internal(_) => ProbeCode::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(ProbeCode::Ok as u32, 0);
        assert_eq!(ProbeCode::LoadFailed as u32, 1);
        assert_eq!(ProbeCode::MissingExport as u32, 2);
        assert_eq!(ProbeCode::MissingOrdinal as u32, 3);
        assert_eq!(ProbeCode::TagMismatch as u32, 4);
        assert_eq!(ProbeCode::UnexpectedExport as u32, 5);
        assert_eq!(ProbeCode::GuidMismatch as u32, 6);
        assert_eq!(ProbeCode::InvalidGuid as u32, 7);
        assert_eq!(ProbeCode::Internal as u32, 8);
    }

    #[test]
    fn errors_map_to_codes() {
        let err = ProbeError::TagMismatch {
            export: "FunctionCdecl".into(),
            expected: 1,
            observed: 0,
        };
        assert_eq!(err.code(), ProbeCode::TagMismatch);
        assert_eq!(
            err.to_string(),
            "`FunctionCdecl` returned tag 0, expected 1"
        );
        assert_eq!(
            ProbeError::InvalidGuid("x".into()).code(),
            ProbeCode::InvalidGuid
        );

        let missing = ProbeError::missing_export("GlobalGuid");
        assert_eq!(missing.code(), ProbeCode::MissingExport);
        assert!(std::error::Error::source(&missing).is_none());
    }
}
