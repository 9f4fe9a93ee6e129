//! Types that cross the FFI boundary.

use std::fmt;
use std::str::FromStr;

use crate::common::error::ProbeError;

/// Tag returned by each probe, identifying which export was invoked.
///
/// `#[repr(C)]` keeps this the size of a C `int`; the discriminants are part
/// of the contract with the harness and must never be reordered.
#[repr(C)]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FunctionId {
    FunctionStdcall = 0,
    FunctionCdecl = 1,
    WinapiWithBaseOnly = 2,
    WinapiWithBaseAndAnsiAndUnicode = 3,
    WinapiWithBaseAndAnsiAndUnicodeA = 4,
    WinapiWithBaseAndAnsiAndUnicodeW = 5,
    WinapiWithAnsiAndUnicodeA = 6,
    WinapiWithAnsiAndUnicodeW = 7,
    WinapiWithBaseAndUnicode = 8,
    WinapiWithBaseAndUnicodeW = 9,
    ExportedByNameAndOrdinal = 10,
    ExportedByOrdinalOnly = 11,
}

impl FunctionId {
    pub const ALL: [FunctionId; 12] = [
        FunctionId::FunctionStdcall,
        FunctionId::FunctionCdecl,
        FunctionId::WinapiWithBaseOnly,
        FunctionId::WinapiWithBaseAndAnsiAndUnicode,
        FunctionId::WinapiWithBaseAndAnsiAndUnicodeA,
        FunctionId::WinapiWithBaseAndAnsiAndUnicodeW,
        FunctionId::WinapiWithAnsiAndUnicodeA,
        FunctionId::WinapiWithAnsiAndUnicodeW,
        FunctionId::WinapiWithBaseAndUnicode,
        FunctionId::WinapiWithBaseAndUnicodeW,
        FunctionId::ExportedByNameAndOrdinal,
        FunctionId::ExportedByOrdinalOnly,
    ];

    /// Public export name of the probe returning this tag.
    pub fn name(&self) -> &'static str {
        match self {
            FunctionId::FunctionStdcall => "FunctionStdcall",
            FunctionId::FunctionCdecl => "FunctionCdecl",
            FunctionId::WinapiWithBaseOnly => "WinapiWithBaseOnly",
            FunctionId::WinapiWithBaseAndAnsiAndUnicode => "WinapiWithBaseAndAnsiAndUnicode",
            FunctionId::WinapiWithBaseAndAnsiAndUnicodeA => "WinapiWithBaseAndAnsiAndUnicodeA",
            FunctionId::WinapiWithBaseAndAnsiAndUnicodeW => "WinapiWithBaseAndAnsiAndUnicodeW",
            FunctionId::WinapiWithAnsiAndUnicodeA => "WinapiWithAnsiAndUnicodeA",
            FunctionId::WinapiWithAnsiAndUnicodeW => "WinapiWithAnsiAndUnicodeW",
            FunctionId::WinapiWithBaseAndUnicode => "WinapiWithBaseAndUnicode",
            FunctionId::WinapiWithBaseAndUnicodeW => "WinapiWithBaseAndUnicodeW",
            FunctionId::ExportedByNameAndOrdinal => "ExportedByNameAndOrdinal",
            FunctionId::ExportedByOrdinalOnly => "ExportedByOrdinalOnly",
        }
    }

    pub fn from_raw(raw: i32) -> Option<FunctionId> {
        FunctionId::ALL.iter().copied().find(|id| *id as i32 == raw)
    }
}

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Windows-layout GUID, 16 bytes with no padding.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Guid {
    pub data1: u32,
    pub data2: u16,
    pub data3: u16,
    pub data4: [u8; 8],
}

impl Guid {
    pub const fn new(data1: u32, data2: u16, data3: u16, data4: [u8; 8]) -> Self {
        Self {
            data1,
            data2,
            data3,
            data4,
        }
    }

    /// In-memory byte layout (little-endian integer fields).
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[0..4].copy_from_slice(&self.data1.to_le_bytes());
        out[4..6].copy_from_slice(&self.data2.to_le_bytes());
        out[6..8].copy_from_slice(&self.data3.to_le_bytes());
        out[8..16].copy_from_slice(&self.data4);
        out
    }

    /// Inverse of [`Guid::to_bytes`].
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        let mut data4 = [0u8; 8];
        data4.copy_from_slice(&bytes[8..]);
        Self::new(
            u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
            u16::from_le_bytes([bytes[4], bytes[5]]),
            u16::from_le_bytes([bytes[6], bytes[7]]),
            data4,
        )
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.data4;
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            self.data1, self.data2, self.data3, d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7]
        )
    }
}

impl FromStr for Guid {
    type Err = ProbeError;

    /// Accepts `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`, optionally wrapped in braces.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ProbeError::InvalidGuid(s.to_string());

        let trimmed = s.trim();
        let body = match (trimmed.strip_prefix('{'), trimmed.strip_suffix('}')) {
            (Some(_), Some(_)) => &trimmed[1..trimmed.len() - 1],
            (None, None) => trimmed,
            _ => return Err(invalid()),
        };

        let groups: Vec<&str> = body.split('-').collect();
        let widths = [8, 4, 4, 4, 12];
        if groups.len() != widths.len()
            || groups
                .iter()
                .zip(widths)
                .any(|(g, w)| g.len() != w || !g.bytes().all(|b| b.is_ascii_hexdigit()))
        {
            return Err(invalid());
        }

        let data1 = u32::from_str_radix(groups[0], 16).map_err(|_| invalid())?;
        let data2 = u16::from_str_radix(groups[1], 16).map_err(|_| invalid())?;
        let data3 = u16::from_str_radix(groups[2], 16).map_err(|_| invalid())?;

        let tail = format!("{}{}", groups[3], groups[4]);
        let mut data4 = [0u8; 8];
        for (idx, byte) in data4.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&tail[idx * 2..idx * 2 + 2], 16).map_err(|_| invalid())?;
        }

        Ok(Guid::new(data1, data2, data3, data4))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_stable() {
        for (idx, id) in FunctionId::ALL.iter().enumerate() {
            assert_eq!(*id as i32, idx as i32);
            assert_eq!(FunctionId::from_raw(idx as i32), Some(*id));
        }
        assert_eq!(FunctionId::from_raw(12), None);
        assert_eq!(FunctionId::from_raw(-1), None);
        assert_eq!(std::mem::size_of::<FunctionId>(), std::mem::size_of::<i32>());
    }

    #[test]
    fn guid_is_sixteen_bytes() {
        assert_eq!(std::mem::size_of::<Guid>(), 16);
        assert_eq!(std::mem::align_of::<Guid>(), 4);
    }

    #[test]
    fn guid_parses_braced_and_bare() {
        let bare: Guid = "336202d6-53fc-4ec1-bac3-da0ffbcdaaa7".parse().unwrap();
        let braced: Guid = "{336202D6-53FC-4EC1-BAC3-DA0FFBCDAAA7}".parse().unwrap();
        assert_eq!(bare, braced);
        assert_eq!(bare.data1, 0x336202d6);
        assert_eq!(bare.data4, [0xba, 0xc3, 0xda, 0x0f, 0xfb, 0xcd, 0xaa, 0xa7]);
        assert_eq!(bare.to_string(), "336202d6-53fc-4ec1-bac3-da0ffbcdaaa7");
    }

    #[test]
    fn guid_rejects_malformed_input() {
        for input in [
            "",
            "{336202d6-53fc-4ec1-bac3-da0ffbcdaaa7",
            "336202d6-53fc-4ec1-bac3",
            "336202d6-53fc-4ec1-bac3-da0ffbcdaaa",
            "336202g6-53fc-4ec1-bac3-da0ffbcdaaa7",
            "+36202d6-53fc-4ec1-bac3-da0ffbcdaaa7",
        ] {
            assert!(matches!(
                input.parse::<Guid>(),
                Err(ProbeError::InvalidGuid(_))
            ));
        }
    }
}
