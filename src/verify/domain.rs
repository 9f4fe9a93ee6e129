//! Verification results.

use serde::Serialize;

/// How an export was looked up.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lookup {
    Name,
    Ordinal,
    /// The export must not resolve by name; passing means it did not.
    Absent,
}

/// Result of checking one export through one lookup path.
#[derive(Clone, Debug, Serialize)]
pub struct Outcome {
    pub export: String,
    pub lookup: Lookup,
    pub ordinal: Option<u16>,
    pub expected: i32,
    /// Tag returned by the call, `None` when nothing was called.
    pub observed: Option<i32>,
    pub passed: bool,
    pub dur_us: u64,
}

/// Full verification report for one library.
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub library: String,
    pub outcomes: Vec<Outcome>,
    /// Registry form of the `GlobalGuid` bytes, `None` when unreadable.
    pub guid: Option<String>,
    pub guid_ok: bool,
}

impl Report {
    pub fn passed(&self) -> bool {
        self.guid_ok && self.outcomes.iter().all(|o| o.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }
}
