//! Calls every export of a loaded fixture and checks the results.

use std::ffi::c_void;
use std::time::Instant;

use tracing::{info, warn};

use crate::api::catalog::{catalog, full_catalog, Convention, ExportSpec, GLOBAL_GUID_SYMBOL};
use crate::api::domain::Guid;
use crate::common::error::{ProbeCode, ProbeError, ProbeResult};
use crate::loader::ExportSource;

use super::domain::{Lookup, Outcome, Report};

/// Byte image of `{336202D6-53FC-4EC1-BAC3-DA0FFBCDAAA7}` as laid out in memory.
pub const EXPECTED_GUID_BYTES: [u8; 16] = [
    0xd6, 0x02, 0x62, 0x33, 0xfc, 0x53, 0xc1, 0x4e, 0xba, 0xc3, 0xda, 0x0f, 0xfb, 0xcd, 0xaa, 0xa7,
];

type GuidProbeC = extern "C" fn(Guid) -> i32;
type GuidProbeSystem = extern "system" fn(Guid) -> i32;
type NullaryProbe = extern "system" fn() -> i32;

/// Verify `src`, passing `GlobalGuid`'s value to the probes that take a GUID.
pub fn verify_library<S: ExportSource + ?Sized>(src: &S) -> Report {
    verify_library_with(src, Guid::from_bytes(EXPECTED_GUID_BYTES))
}

/// Verify `src` against the exports of the current target, passing `arg` to
/// the probes that take a GUID.
pub fn verify_library_with<S: ExportSource + ?Sized>(src: &S, arg: Guid) -> Report {
    verify_exports(src, &catalog(), arg)
}

/// Verify `src` against `specs`. Missing or mis-tagged exports, and a missing
/// or wrong `GlobalGuid`, are recorded in the report rather than returned.
pub fn verify_exports<S: ExportSource + ?Sized>(
    src: &S,
    specs: &[ExportSpec],
    arg: Guid,
) -> Report {
    let mut outcomes = Vec::with_capacity(specs.len());

    for spec in specs {
        if spec.export.has_name() {
            outcomes.push(check_by_name(src, spec, arg));
        } else {
            outcomes.push(check_absent(src, spec));
        }
        outcomes.extend(check_ordinal(src, spec));
    }

    let (guid, guid_ok) = match read_global_guid(src) {
        Ok(bytes) => (Some(Guid::from_bytes(bytes).to_string()), bytes == EXPECTED_GUID_BYTES),
        Err(err) => {
            warn!(ev = "guid_unreadable", code = err.code() as u32, error = %err);
            (None, false)
        }
    };
    if !guid_ok {
        warn!(ev = "guid_mismatch", code = ProbeCode::GuidMismatch as u32);
    }

    Report {
        library: src.label(),
        outcomes,
        guid,
        guid_ok,
    }
}

/// Like [`verify_library_with`], but the first failure becomes an error.
pub fn verify_strict<S: ExportSource + ?Sized>(src: &S, arg: Guid) -> ProbeResult<Report> {
    let report = verify_library_with(src, arg);
    match first_failure(src, &report) {
        Some(err) => Err(err),
        None => Ok(report),
    }
}

/// The error matching the first failed check of `report`, if any.
pub fn first_failure<S: ExportSource + ?Sized>(src: &S, report: &Report) -> Option<ProbeError> {
    if let Some(failed) = report.failures().next() {
        return Some(match (failed.lookup, failed.observed) {
            (Lookup::Absent, _) => ProbeError::UnexpectedExport {
                name: failed.export.clone(),
            },
            (Lookup::Ordinal, None) => ProbeError::MissingOrdinal {
                ordinal: failed.ordinal.unwrap_or_default(),
            },
            (Lookup::Name, None) => {
                let name = full_catalog()
                    .iter()
                    .find(|s| s.symbol == failed.export)
                    .map(|s| s.export_name())
                    .unwrap_or_else(|| failed.export.clone());
                match src.get_export(&name) {
                    Err(err) => err,
                    Ok(_) => ProbeError::Internal("export resolved to a null address"),
                }
            }
            (_, Some(observed)) => ProbeError::TagMismatch {
                export: failed.export.clone(),
                expected: failed.expected,
                observed,
            },
        });
    }

    if report.guid_ok {
        return None;
    }
    Some(match read_global_guid(src) {
        Err(err) => err,
        Ok(bytes) => ProbeError::GuidMismatch {
            expected: Guid::from_bytes(EXPECTED_GUID_BYTES).to_string(),
            observed: Guid::from_bytes(bytes).to_string(),
        },
    })
}

fn check_by_name<S: ExportSource + ?Sized>(src: &S, spec: &ExportSpec, arg: Guid) -> Outcome {
    let addr = src.try_get_export(&spec.export_name()).filter(|p| !p.is_null());
    let started = Instant::now();
    // SAFETY: the address was exported under a name the catalog describes,
    // so it has the signature and convention recorded there.
    let observed = addr.map(|addr| unsafe { call(addr, spec, arg) });
    record(spec, Lookup::Name, None, observed, observed == Some(spec.id as i32), started)
}

#[cfg(windows)]
fn check_ordinal<S: ExportSource + ?Sized>(src: &S, spec: &ExportSpec) -> Option<Outcome> {
    let ordinal = spec.export.ordinal()?;
    let addr = src.get_ordinal(ordinal).ok().filter(|p| !p.is_null());
    let started = Instant::now();
    // SAFETY: as in `check_by_name`; ordinal exports take no arguments.
    let observed = addr.map(|addr| unsafe { call(addr, spec, Guid::default()) });
    Some(record(
        spec,
        Lookup::Ordinal,
        Some(ordinal),
        observed,
        observed == Some(spec.id as i32),
        started,
    ))
}

/// Ordinals are a PE export-table concept; other platforms only export by name.
#[cfg(not(windows))]
fn check_ordinal<S: ExportSource + ?Sized>(_src: &S, _spec: &ExportSpec) -> Option<Outcome> {
    None
}

fn check_absent<S: ExportSource + ?Sized>(src: &S, spec: &ExportSpec) -> Outcome {
    let started = Instant::now();
    let absent = src.try_get_export(spec.symbol).is_none();
    record(spec, Lookup::Absent, spec.export.ordinal(), None, absent, started)
}

/// Calls `addr` as the probe described by `spec`.
///
/// # Safety
/// `addr` must point at a function with the signature implied by `spec`.
unsafe fn call(addr: *const c_void, spec: &ExportSpec, arg: Guid) -> i32 {
    match (spec.takes_guid, spec.convention) {
        (true, Convention::Cdecl) => {
            let f = std::mem::transmute::<*const c_void, GuidProbeC>(addr);
            f(arg)
        }
        (true, _) => {
            let f = std::mem::transmute::<*const c_void, GuidProbeSystem>(addr);
            f(arg)
        }
        (false, _) => {
            let f = std::mem::transmute::<*const c_void, NullaryProbe>(addr);
            f()
        }
    }
}

fn record(
    spec: &ExportSpec,
    lookup: Lookup,
    ordinal: Option<u16>,
    observed: Option<i32>,
    passed: bool,
    started: Instant,
) -> Outcome {
    let dur_us = started.elapsed().as_micros() as u64;
    let code = match (passed, lookup, observed) {
        (true, _, _) => ProbeCode::Ok,
        (false, Lookup::Absent, _) => ProbeCode::UnexpectedExport,
        (false, Lookup::Ordinal, None) => ProbeCode::MissingOrdinal,
        (false, Lookup::Name, None) => ProbeCode::MissingExport,
        (false, _, Some(_)) => ProbeCode::TagMismatch,
    };

    if passed {
        info!(ev = "probe_checked", export = spec.symbol, code = code as u32, dur_us);
    } else {
        warn!(
            ev = "probe_failed",
            export = spec.symbol,
            expected = spec.id as i32,
            observed = ?observed,
            code = code as u32,
            dur_us
        );
    }

    Outcome {
        export: spec.symbol.to_string(),
        lookup,
        ordinal,
        expected: spec.id as i32,
        observed,
        passed,
        dur_us,
    }
}

/// Reads the 16 bytes behind `GlobalGuid` twice and checks that they agree.
fn read_global_guid<S: ExportSource + ?Sized>(src: &S) -> ProbeResult<[u8; 16]> {
    let addr = src.get_export(GLOBAL_GUID_SYMBOL)? as *const [u8; 16];
    if addr.is_null() {
        return Err(ProbeError::Internal("GlobalGuid resolved to a null address"));
    }
    // SAFETY: `GlobalGuid` is a 16-byte immutable static that lives as long as `src`.
    let (first, second) = unsafe { (addr.read_unaligned(), addr.read_unaligned()) };
    if first != second {
        return Err(ProbeError::GuidMismatch {
            expected: Guid::from_bytes(first).to_string(),
            observed: Guid::from_bytes(second).to_string(),
        });
    }
    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ffi::GlobalGuid;

    #[test]
    fn expected_bytes_match_the_exported_static() {
        assert_eq!(GlobalGuid.to_bytes(), EXPECTED_GUID_BYTES);
        assert_eq!(Guid::from_bytes(EXPECTED_GUID_BYTES), GlobalGuid);
    }

    #[test]
    fn calls_dispatch_on_convention() {
        let specs = crate::api::catalog::catalog();
        let cdecl = specs.iter().find(|s| s.symbol == "FunctionCdecl").unwrap();
        let stdcall = specs.iter().find(|s| s.symbol == "FunctionStdcall").unwrap();
        let winapi = specs.iter().find(|s| s.symbol == "WinapiWithBaseOnly").unwrap();

        let cdecl_fn: extern "C" fn(Guid) -> crate::api::FunctionId = crate::api::ffi::FunctionCdecl;
        let stdcall_fn: extern "system" fn(Guid) -> crate::api::FunctionId =
            crate::api::ffi::FunctionStdcall;
        let winapi_fn: extern "system" fn() -> crate::api::FunctionId =
            crate::api::ffi::WinapiWithBaseOnly;

        unsafe {
            assert_eq!(call(cdecl_fn as *const c_void, cdecl, GlobalGuid), 1);
            assert_eq!(call(stdcall_fn as *const c_void, stdcall, GlobalGuid), 0);
            assert_eq!(call(winapi_fn as *const c_void, winapi, GlobalGuid), 2);
        }
    }
}
