//! Vowel labels attached to snapshots

use serde::{Deserialize, Serialize};

/// Japanese vowel classes, plus a catch-all for anything else
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vowel {
    A,
    I,
    U,
    E,
    O,
    Unknown,
}

impl Vowel {
    pub fn all() -> [Self; 6] {
        [Self::A, Self::I, Self::U, Self::E, Self::O, Self::Unknown]
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            Self::A => "a",
            Self::I => "i",
            Self::U => "u",
            Self::E => "e",
            Self::O => "o",
            Self::Unknown => "unknown",
        }
    }

    pub fn from_identifier(identifier: &str) -> Option<Self> {
        Self::all()
            .into_iter()
            .find(|v| v.identifier().eq_ignore_ascii_case(identifier))
    }
}

impl std::fmt::Display for Vowel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.identifier())
    }
}

impl std::str::FromStr for Vowel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_identifier(s).ok_or_else(|| {
            format!("Unknown vowel '{}', expected one of a, i, u, e, o, unknown", s)
        })
    }
}
