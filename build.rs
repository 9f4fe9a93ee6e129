//! Linker directives for the Windows-only ordinal exports.
//!
//! `ExportedByNameAndOrdinal` is exported by name at @100, and
//! `ExportedByOrdinalOnly` at @200 with no name. Both resolve to the internal
//! `nlf_*` symbols in `src/api/ffi.rs`. On 32-bit x86 `FunctionStdcall` is
//! exported only under its decorated stdcall name, as MSVC does for a
//! `__declspec(dllexport) __stdcall` function.

use std::env;

/// MSVC stdcall decoration: `_name@argbytes` on x86, undecorated elsewhere.
fn stdcall_symbol(name: &str, arg_bytes: u32, x86: bool) -> String {
    if x86 {
        format!("_{name}@{arg_bytes}")
    } else {
        name.to_string()
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    let target_env = env::var("CARGO_CFG_TARGET_ENV").unwrap_or_default();
    let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();

    if os != "windows" {
        return;
    }
    if target_env != "msvc" {
        println!(
            "cargo:warning=ordinal exports are only emitted for MSVC targets; {target_env} builds export by name only"
        );
        return;
    }

    let x86 = arch == "x86";
    let exports = [
        format!(
            "/EXPORT:ExportedByNameAndOrdinal={},@100",
            stdcall_symbol("nlf_exported_by_name_and_ordinal", 0, x86)
        ),
        format!(
            "/EXPORT:ExportedByOrdinalOnly={},@200,NONAME",
            stdcall_symbol("nlf_exported_by_ordinal_only", 0, x86)
        ),
    ];
    for directive in exports {
        println!("cargo:rustc-cdylib-link-arg={directive}");
    }

    if x86 {
        println!(
            "cargo:rustc-cdylib-link-arg=/EXPORT:{}={}",
            stdcall_symbol("FunctionStdcall", 16, true),
            stdcall_symbol("nlf_function_stdcall", 16, true)
        );
    }
}
