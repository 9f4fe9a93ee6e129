//! Runtime configuration for the host-side verifier, loaded from the environment.

use std::env;
use std::path::PathBuf;

/// Library name used when nothing else is configured.
pub const DEFAULT_LIBRARY: &str = "native_library_fixture";

/// Snapshot of configuration values consumed by the verifier.
#[derive(Clone, Debug)]
pub struct FixtureCfg {
    /// Bare library name or a path to the compiled fixture.
    pub library: String,
    pub search_dir: Option<PathBuf>,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
}

impl FixtureCfg {
    /// Create a configuration snapshot from the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a snapshot from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            library: non_empty("FIXTURE_LIBRARY").unwrap_or_else(|| DEFAULT_LIBRARY.to_string()),
            search_dir: non_empty("FIXTURE_SEARCH_DIR").map(PathBuf::from),
            log_filter: non_empty("FIXTURE_LOG").unwrap_or_else(|| "info".to_string()),
        }
    }
}

impl Default for FixtureCfg {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
