//! Handle over a loaded native library.

use std::ffi::c_void;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::common::error::{ProbeError, ProbeResult};

use super::path::resolve_library_path;
use super::source::ExportSource;

#[cfg(windows)]
type RawLibrary = libloading::os::windows::Library;
#[cfg(unix)]
type RawLibrary = libloading::os::unix::Library;

/// A loaded library. Addresses handed out by this type are valid for as long
/// as it is alive.
pub struct NativeLibrary {
    inner: RawLibrary,
    path: PathBuf,
}

impl std::fmt::Debug for NativeLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeLibrary").field("path", &self.path).finish()
    }
}

impl NativeLibrary {
    /// Resolve `name` and load it.
    pub fn load(name: &str, search_dir: Option<&Path>) -> ProbeResult<Self> {
        let path = resolve_library_path(name, search_dir);
        Self::load_path(path)
    }

    /// Load an already resolved path.
    pub fn load_path(path: impl Into<PathBuf>) -> ProbeResult<Self> {
        let path = path.into();
        // SAFETY: loading runs the library's initialisers; callers only point
        // this at fixtures, which have none beyond the Rust runtime's own.
        let inner = unsafe { RawLibrary::new(&path) }.map_err(|source| ProbeError::LoadFailed {
            path: path.clone(),
            source,
        })?;
        debug!(ev = "library_loaded", path = %path.display());
        Ok(Self { inner, path })
    }

    /// Like [`NativeLibrary::load`], but reports failure as `None`.
    pub fn try_load(name: &str, search_dir: Option<&Path>) -> Option<Self> {
        Self::load(name, search_dir).ok()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Address of the export called `name`.
    pub fn get_export(&self, name: &str) -> ProbeResult<*const c_void> {
        // SAFETY: the symbol is read as an opaque address and never
        // dereferenced here.
        let symbol = unsafe { self.inner.get::<*const c_void>(name.as_bytes()) }.map_err(
            |source| ProbeError::MissingExport {
                name: name.to_string(),
                source: Some(source),
            },
        )?;
        Ok(*symbol)
    }

    pub fn try_get_export(&self, name: &str) -> Option<*const c_void> {
        self.get_export(name).ok()
    }

    /// Address of the export with the given ordinal.
    #[cfg(windows)]
    pub fn get_ordinal(&self, ordinal: u16) -> ProbeResult<*const c_void> {
        // SAFETY: as for `get_export`.
        let symbol = unsafe { self.inner.get_ordinal::<*const c_void>(ordinal) }
            .map_err(|_| ProbeError::MissingOrdinal { ordinal })?;
        Ok(*symbol)
    }
}

impl ExportSource for NativeLibrary {
    fn label(&self) -> String {
        self.path.display().to_string()
    }

    fn get_export(&self, name: &str) -> ProbeResult<*const c_void> {
        NativeLibrary::get_export(self, name)
    }

    #[cfg(windows)]
    fn get_ordinal(&self, ordinal: u16) -> ProbeResult<*const c_void> {
        NativeLibrary::get_ordinal(self, ordinal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_library_fails_to_load() {
        let err = NativeLibrary::load("nlf_no_such_library_anywhere", None).unwrap_err();
        assert_eq!(err.code(), crate::common::ProbeCode::LoadFailed);
        assert!(NativeLibrary::try_load("nlf_no_such_library_anywhere", None).is_none());
    }
}
