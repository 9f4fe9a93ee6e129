//! Library path resolution.

use std::path::{Path, PathBuf};

/// File names the platform loader would accept for a bare library `name`.
pub fn platform_candidates(name: &str) -> Vec<String> {
    if cfg!(target_os = "windows") {
        vec![format!("{name}.dll"), format!("lib{name}.dll")]
    } else if cfg!(target_os = "macos") {
        vec![format!("lib{name}.dylib"), format!("{name}.dylib")]
    } else {
        vec![format!("lib{name}.so"), format!("{name}.so")]
    }
}

/// Resolve `name` to something the OS loader can open.
///
/// Names with an extension or a directory component are used as given: found
/// directly, found below `search_dir`, or otherwise passed through unchanged
/// for the OS search path. Only bare names are expanded with the platform
/// prefix/suffix and looked up in the current directory, then in
/// `search_dir`; when nothing is found on disk the first candidate is
/// returned.
pub fn resolve_library_path(name: &str, search_dir: Option<&Path>) -> PathBuf {
    let path = Path::new(name);

    if path.extension().is_some() || path.components().count() > 1 || path.is_absolute() {
        if path.exists() {
            return path.to_path_buf();
        }
        if let Some(dir) = search_dir {
            let full = dir.join(path);
            if full.exists() {
                return full;
            }
        }
        return path.to_path_buf();
    }

    let candidates = platform_candidates(name);

    for candidate in &candidates {
        let p = Path::new(candidate);
        if p.exists() {
            return p.to_path_buf();
        }
    }

    if let Some(dir) = search_dir {
        for candidate in &candidates {
            let full = dir.join(candidate);
            if full.exists() {
                return full;
            }
        }
    }

    PathBuf::from(&candidates[0])
}
