use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A kind of grain held in a granary container.
///
/// Each kind occupies at most one container at a time. The set of kinds is
/// fixed; stores never discover new ones.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Cereal {
    Buckwheat,
    Rice,
    Millet,
    Peas,
    Bulgur,
}

impl Cereal {
    /// Every kind, in declaration order.
    pub const ALL: [Cereal; 5] = [
        Self::Buckwheat,
        Self::Rice,
        Self::Millet,
        Self::Peas,
        Self::Bulgur,
    ];

    /// Lowercase name used in config and script files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buckwheat => "buckwheat",
            Self::Rice => "rice",
            Self::Millet => "millet",
            Self::Peas => "peas",
            Self::Bulgur => "bulgur",
        }
    }
}

impl fmt::Display for Cereal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buckwheat => write!(f, "Buckwheat"),
            Self::Rice => write!(f, "Rice"),
            Self::Millet => write!(f, "Millet"),
            Self::Peas => write!(f, "Peas"),
            Self::Bulgur => write!(f, "Bulgur"),
        }
    }
}

impl FromStr for Cereal {
    type Err = TypeError;

    /// Parse a kind name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| TypeError::UnknownKind(s.to_string()))
    }
}
