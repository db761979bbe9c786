use std::str::FromStr;

use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// Kickstart syntax versions, oldest first
///
/// Ordering follows release order, so `Version::F8 < Version::F12`.
#[allow(clippy::upper_case_acronyms)]
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Display,
    EnumIter,
    IntoStaticStr,
)]
pub enum Version {
    FC3,
    FC6,
    F8,
    F12,
    F18,
    F20,
    F23,
    F29,
    F34,
}

/// Token accepted as an alias for the newest version
pub const DEVEL: &str = "DEVEL";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unsupported version: {0}")]
pub struct UnknownVersionError(pub String);

impl Version {
    pub fn latest() -> Self {
        Self::F34
    }

    /// Sections must be closed with an explicit `%end`
    pub fn requires_section_end(self) -> bool {
        self >= Self::F8
    }

    /// All versions, oldest first
    pub fn all() -> impl Iterator<Item = Version> {
        Self::iter()
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::latest()
    }
}

impl FromStr for Version {
    type Err = UnknownVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.eq_ignore_ascii_case(DEVEL) {
            return Ok(Self::latest());
        }

        Self::iter()
            .find(|v| {
                let name: &'static str = (*v).into();
                name.eq_ignore_ascii_case(token)
            })
            .ok_or_else(|| UnknownVersionError(token.to_string()))
    }
}
