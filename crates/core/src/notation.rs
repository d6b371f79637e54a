use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of coordinate notations understood by the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Notation {
    /// Decimal degrees
    Dd,
    /// Degrees and decimal minutes
    Ddm,
    /// Degrees, minutes and seconds
    Dms,
    /// Military Grid Reference System
    Mgrs,
    /// U.S. National Grid
    Usng,
    /// Universal Transverse Mercator
    Utm,
    /// Global Area Reference System
    Gars,
}

impl Notation {
    pub const ALL: [Notation; 7] = [
        Notation::Dd,
        Notation::Ddm,
        Notation::Dms,
        Notation::Mgrs,
        Notation::Usng,
        Notation::Utm,
        Notation::Gars,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Notation::Dd => "DD",
            Notation::Ddm => "DDM",
            Notation::Dms => "DMS",
            Notation::Mgrs => "MGRS",
            Notation::Usng => "USNG",
            Notation::Utm => "UTM",
            Notation::Gars => "GARS",
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Notation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Notation::ALL
            .into_iter()
            .find(|notation| notation.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown notation: {s}"))
    }
}
