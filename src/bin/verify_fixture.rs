//! Loads a compiled fixture, calls every export and prints a JSON report.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use native_library_fixture::api::ffi::GlobalGuid;
use native_library_fixture::common::config::FixtureCfg;
use native_library_fixture::common::log;
use native_library_fixture::loader::NativeLibrary;
use native_library_fixture::verify;
use native_library_fixture::{Guid, ProbeCode, ProbeError, ProbeResult};

#[derive(Debug, Parser)]
#[command(
    name = "verify-fixture",
    about = "Check the exports of a native interop fixture",
    after_help = "Exit status: 0 when every check passes, 1 when the report has failures, \
                  64 + code when verification could not complete (65 load failed, \
                  66 missing export, 67 missing ordinal, 68 tag mismatch, \
                  69 unexpected export, 70 GUID mismatch, 71 invalid GUID, 72 internal)."
)]
struct Args {
    /// Library name or path (default: $FIXTURE_LIBRARY or native_library_fixture).
    #[arg(long)]
    library: Option<String>,

    /// Extra directory to search (default: $FIXTURE_SEARCH_DIR).
    #[arg(long)]
    search_dir: Option<PathBuf>,

    /// GUID passed to the probes that take one; they ignore it.
    #[arg(long)]
    guid: Option<Guid>,

    /// Fail with the error code of the first mismatch instead of reporting.
    #[arg(long)]
    strict: bool,
}

fn run(args: Args, cfg: FixtureCfg) -> ProbeResult<bool> {
    let library = args.library.unwrap_or(cfg.library);
    let search_dir = args.search_dir.or(cfg.search_dir);
    let guid = args.guid.unwrap_or(GlobalGuid);

    let lib = NativeLibrary::load(&library, search_dir.as_deref())?;
    let report = if args.strict {
        verify::verify_strict(&lib, guid)?
    } else {
        verify::verify_library_with(&lib, guid)
    };

    let json = serde_json::to_string_pretty(&report)
        .map_err(|_| ProbeError::Internal("report serialisation"))?;
    println!("{json}");
    Ok(report.passed())
}

/// Error statuses start here so they never collide with a failed report (1).
const ERROR_EXIT_BASE: u8 = 64;

fn error_status(code: ProbeCode) -> u8 {
    ERROR_EXIT_BASE + code as u8
}

fn main() -> ExitCode {
    let args = Args::parse();
    let cfg = FixtureCfg::load();
    log::init(&cfg.log_filter);

    match run(args, cfg) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            let code = err.code();
            error!(ev = "verify_failed", code = code as u32, error = %err);
            ExitCode::from(error_status(code))
        }
    }
}
