//! Exported probe symbols.
//!
//! Every probe ignores its arguments and returns the tag named after itself.
//! Names, calling conventions and (on Windows) ordinals are consumed by the
//! interop harness and must not change.

#![allow(non_snake_case, non_upper_case_globals)]

use super::domain::{FunctionId, Guid};

/// {336202D6-53FC-4EC1-BAC3-DA0FFBCDAAA7}
#[no_mangle]
pub static GlobalGuid: Guid = Guid::new(
    0x336202d6,
    0x53fc,
    0x4ec1,
    [0xba, 0xc3, 0xda, 0x0f, 0xfb, 0xcd, 0xaa, 0xa7],
);

/// `extern "system"` is stdcall on 32-bit Windows and the C convention elsewhere.
///
/// On 32-bit Windows only the decorated `_FunctionStdcall@16` is public; build.rs
/// re-exports it from the internal symbol.
#[cfg_attr(not(all(windows, target_arch = "x86")), no_mangle)]
#[cfg_attr(all(windows, target_arch = "x86"), export_name = "nlf_function_stdcall")]
pub extern "system" fn FunctionStdcall(guid: Guid) -> FunctionId {
    let _ = guid;
    FunctionId::FunctionStdcall
}

#[no_mangle]
pub extern "C" fn FunctionCdecl(guid: Guid) -> FunctionId {
    let _ = guid;
    FunctionId::FunctionCdecl
}

macro_rules! winapi_probes {
    ($($name:ident),+ $(,)?) => {
        $(
            #[no_mangle]
            pub extern "system" fn $name() -> FunctionId {
                FunctionId::$name
            }
        )+
    };
}

winapi_probes!(
    WinapiWithBaseOnly,
    WinapiWithBaseAndAnsiAndUnicode,
    WinapiWithBaseAndAnsiAndUnicodeA,
    WinapiWithBaseAndAnsiAndUnicodeW,
    WinapiWithAnsiAndUnicodeA,
    WinapiWithAnsiAndUnicodeW,
    WinapiWithBaseAndUnicode,
    WinapiWithBaseAndUnicodeW,
);

// The two probes below are linked under internal names. build.rs re-exports
// them as `ExportedByNameAndOrdinal` @100 and as NONAME @200.

#[cfg(windows)]
#[no_mangle]
pub extern "system" fn nlf_exported_by_name_and_ordinal() -> FunctionId {
    FunctionId::ExportedByNameAndOrdinal
}

#[cfg(windows)]
#[no_mangle]
pub extern "system" fn nlf_exported_by_ordinal_only() -> FunctionId {
    FunctionId::ExportedByOrdinalOnly
}
