//! Static description of every exported probe.

use super::domain::{FunctionId, Guid};

/// Name of the exported GUID static.
pub const GLOBAL_GUID_SYMBOL: &str = "GlobalGuid";

/// Ordinal of `ExportedByNameAndOrdinal`.
pub const NAME_AND_ORDINAL: u16 = 100;
/// Ordinal of the unnamed `ExportedByOrdinalOnly` export.
pub const ORDINAL_ONLY: u16 = 200;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Convention {
    /// stdcall on 32-bit Windows, platform default elsewhere.
    Stdcall,
    Cdecl,
    /// `WINAPI`, i.e. `extern "system"`.
    Winapi,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ExportKind {
    Name,
    NameAndOrdinal(u16),
    OrdinalOnly(u16),
}

impl ExportKind {
    pub fn ordinal(&self) -> Option<u16> {
        match self {
            ExportKind::Name => None,
            ExportKind::NameAndOrdinal(o) | ExportKind::OrdinalOnly(o) => Some(*o),
        }
    }

    pub fn has_name(&self) -> bool {
        !matches!(self, ExportKind::OrdinalOnly(_))
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ExportSpec {
    pub symbol: &'static str,
    pub id: FunctionId,
    pub convention: Convention,
    pub export: ExportKind,
    /// The probe takes a single `Guid` by value.
    pub takes_guid: bool,
}

impl ExportSpec {
    const fn named(id: FunctionId, symbol: &'static str, convention: Convention, takes_guid: bool) -> Self {
        Self {
            symbol,
            id,
            convention,
            export: ExportKind::Name,
            takes_guid,
        }
    }

    /// Name the export is published under on the current target.
    ///
    /// 32-bit Windows publishes the GUID-taking stdcall probe only under its
    /// decorated name; every other export keeps its plain symbol.
    pub fn export_name(&self) -> String {
        if cfg!(all(windows, target_arch = "x86"))
            && self.convention == Convention::Stdcall
            && self.takes_guid
        {
            format!("_{}@{}", self.symbol, std::mem::size_of::<Guid>())
        } else {
            self.symbol.to_string()
        }
    }

    const fn winapi(id: FunctionId, symbol: &'static str) -> Self {
        Self::named(id, symbol, Convention::Winapi, false)
    }
}

const PORTABLE: [ExportSpec; 10] = [
    ExportSpec::named(FunctionId::FunctionStdcall, "FunctionStdcall", Convention::Stdcall, true),
    ExportSpec::named(FunctionId::FunctionCdecl, "FunctionCdecl", Convention::Cdecl, true),
    ExportSpec::winapi(FunctionId::WinapiWithBaseOnly, "WinapiWithBaseOnly"),
    ExportSpec::winapi(
        FunctionId::WinapiWithBaseAndAnsiAndUnicode,
        "WinapiWithBaseAndAnsiAndUnicode",
    ),
    ExportSpec::winapi(
        FunctionId::WinapiWithBaseAndAnsiAndUnicodeA,
        "WinapiWithBaseAndAnsiAndUnicodeA",
    ),
    ExportSpec::winapi(
        FunctionId::WinapiWithBaseAndAnsiAndUnicodeW,
        "WinapiWithBaseAndAnsiAndUnicodeW",
    ),
    ExportSpec::winapi(FunctionId::WinapiWithAnsiAndUnicodeA, "WinapiWithAnsiAndUnicodeA"),
    ExportSpec::winapi(FunctionId::WinapiWithAnsiAndUnicodeW, "WinapiWithAnsiAndUnicodeW"),
    ExportSpec::winapi(FunctionId::WinapiWithBaseAndUnicode, "WinapiWithBaseAndUnicode"),
    ExportSpec::winapi(FunctionId::WinapiWithBaseAndUnicodeW, "WinapiWithBaseAndUnicodeW"),
];

const ORDINAL: [ExportSpec; 2] = [
    ExportSpec {
        symbol: "ExportedByNameAndOrdinal",
        id: FunctionId::ExportedByNameAndOrdinal,
        convention: Convention::Stdcall,
        export: ExportKind::NameAndOrdinal(NAME_AND_ORDINAL),
        takes_guid: false,
    },
    ExportSpec {
        symbol: "ExportedByOrdinalOnly",
        id: FunctionId::ExportedByOrdinalOnly,
        convention: Convention::Stdcall,
        export: ExportKind::OrdinalOnly(ORDINAL_ONLY),
        takes_guid: false,
    },
];

/// Every probe exported on the current target.
pub fn catalog() -> Vec<ExportSpec> {
    let mut out = PORTABLE.to_vec();
    if cfg!(windows) {
        out.extend_from_slice(&ORDINAL);
    }
    out
}

/// Every probe across all targets, including Windows-only ordinal exports.
pub fn full_catalog() -> Vec<ExportSpec> {
    PORTABLE.iter().chain(ORDINAL.iter()).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_match_tag_names() {
        for spec in full_catalog() {
            assert_eq!(spec.symbol, spec.id.name());
        }
    }

    #[test]
    fn full_catalog_covers_every_tag_once() {
        let ids: Vec<FunctionId> = full_catalog().iter().map(|s| s.id).collect();
        assert_eq!(ids, FunctionId::ALL.to_vec());
    }

    #[test]
    fn ordinals_are_fixed() {
        let all = full_catalog();
        let by_ordinal: Vec<(FunctionId, u16, bool)> = all
            .iter()
            .filter_map(|s| s.export.ordinal().map(|o| (s.id, o, s.export.has_name())))
            .collect();
        assert_eq!(
            by_ordinal,
            vec![
                (FunctionId::ExportedByNameAndOrdinal, 100, true),
                (FunctionId::ExportedByOrdinalOnly, 200, false),
            ]
        );
    }

    #[test]
    fn only_guid_probes_take_arguments() {
        let takers: Vec<&str> = full_catalog()
            .iter()
            .filter(|s| s.takes_guid)
            .map(|s| s.symbol)
            .collect();
        assert_eq!(takers, vec!["FunctionStdcall", "FunctionCdecl"]);
    }

    #[test]
    fn export_names_follow_target_decoration() {
        let all = full_catalog();
        let stdcall = all.iter().find(|s| s.id == FunctionId::FunctionStdcall).unwrap();
        let expected = if cfg!(all(windows, target_arch = "x86")) {
            "_FunctionStdcall@16"
        } else {
            "FunctionStdcall"
        };
        assert_eq!(stdcall.export_name(), expected);

        for spec in all.iter().filter(|s| s.id != FunctionId::FunctionStdcall) {
            assert_eq!(spec.export_name(), spec.symbol);
        }
    }

    #[test]
    fn ordinal_exports_are_windows_only() {
        let has_ordinals = catalog().iter().any(|s| s.export.ordinal().is_some());
        assert_eq!(has_ordinals, cfg!(windows));
    }
}
