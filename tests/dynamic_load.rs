//! Loads the compiled cdylib the way the interop harness does.

use std::path::PathBuf;

use native_library_fixture::loader::path::platform_candidates;
use native_library_fixture::loader::NativeLibrary;
use native_library_fixture::verify::{self, Lookup};
use native_library_fixture::{FunctionId, Guid, ProbeCode};

/// The cdylib sits next to the test binary (`target/<profile>/deps`) and is
/// uplifted one level up.
fn built_fixture() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    let deps = exe.parent()?;
    let dirs = [deps.to_path_buf(), deps.parent()?.to_path_buf()];
    dirs.iter()
        .flat_map(|dir| {
            platform_candidates("native_library_fixture")
                .into_iter()
                .map(move |name| dir.join(name))
        })
        .find(|p| p.exists())
}

macro_rules! fixture_or_skip {
    () => {
        match built_fixture().map(|p| NativeLibrary::load_path(p)) {
            Some(Ok(lib)) => lib,
            Some(Err(err)) => panic!("fixture present but failed to load: {err}"),
            None => {
                eprintln!("skipping: native_library_fixture cdylib not built");
                return;
            }
        }
    };
}

#[test]
fn built_fixture_passes_verification() {
    let lib = fixture_or_skip!();
    let report = verify::verify_library(&lib);

    let failures: Vec<_> = report.failures().collect();
    assert!(failures.is_empty(), "failures: {failures:?}");
    assert!(report.guid_ok);
    assert_eq!(report.guid.as_deref(), Some("336202d6-53fc-4ec1-bac3-da0ffbcdaaa7"));
    assert!(report.passed());

    let by_name = report
        .outcomes
        .iter()
        .filter(|o| o.lookup == Lookup::Name)
        .count();
    assert_eq!(by_name, if cfg!(windows) { 11 } else { 10 });
}

#[test]
fn guid_argument_does_not_change_tags() {
    let lib = fixture_or_skip!();
    let report = verify::verify_strict(&lib, Guid::new(0, 0, 0, [0; 8])).unwrap();
    let stdcall = report
        .outcomes
        .iter()
        .find(|o| o.export == "FunctionStdcall")
        .unwrap();
    assert_eq!(stdcall.observed, Some(FunctionId::FunctionStdcall as i32));
}

#[test]
fn unknown_symbols_are_missing() {
    let lib = fixture_or_skip!();
    assert!(lib.try_get_export("FunctionFastcall").is_none());
    let err = lib.get_export("FunctionFastcall").unwrap_err();
    assert_eq!(err.code(), ProbeCode::MissingExport);
}

#[cfg(not(windows))]
#[test]
fn ordinal_exports_are_windows_only() {
    let lib = fixture_or_skip!();
    assert!(lib.try_get_export("ExportedByNameAndOrdinal").is_none());
    assert!(lib.try_get_export("ExportedByOrdinalOnly").is_none());
}

#[cfg(windows)]
#[test]
fn ordinal_only_export_has_no_name() {
    let lib = fixture_or_skip!();
    assert!(lib.try_get_export("ExportedByOrdinalOnly").is_none());
    assert!(lib.get_ordinal(200).is_ok());
    assert!(lib.get_ordinal(100).is_ok());
    assert!(lib.try_get_export("ExportedByNameAndOrdinal").is_some());
}
