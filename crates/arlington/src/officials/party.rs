//! Political party affiliation of the disclosing official.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Party affiliation attached to a disclosed transaction.
///
/// Disclosure feeds spell affiliations inconsistently ("R", "Republican",
/// "democratic", ...). Parsing normalizes the common spellings; anything
/// unrecognized is preserved verbatim in [`Party::Other`] so no row is lost
/// to vocabulary drift.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Party {
    /// Democratic Party
    Democrat,

    /// Republican Party
    Republican,

    /// Independent
    Independent,

    /// Unrecognized affiliation, preserved as reported.
    Other(String),
}

impl Party {
    /// Returns the recognized party affiliations.
    pub fn all() -> Vec<Self> {
        vec![Self::Democrat, Self::Republican, Self::Independent]
    }

    /// Returns the canonical affiliation name.
    pub fn name(&self) -> &str {
        match self {
            Self::Democrat => "Democrat",
            Self::Republican => "Republican",
            Self::Independent => "Independent",
            Self::Other(raw) => raw.as_str(),
        }
    }

    /// Parse an affiliation from a raw disclosure string.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "d" | "dem" | "democrat" | "democratic" => Self::Democrat,
            "r" | "rep" | "republican" | "gop" => Self::Republican,
            "i" | "ind" | "independent" => Self::Independent,
            _ => Self::Other(trimmed.to_string()),
        }
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
