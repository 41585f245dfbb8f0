//! Culture/segment variation modes.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How a data type's values may differ per culture and/or segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variation {
    /// Values never vary. Also the answer for unknown data types.
    #[default]
    Nothing,
    /// Values vary by culture.
    Culture,
    /// Values vary by segment.
    Segment,
    /// Values vary by culture and segment.
    CultureAndSegment,
}

impl Variation {
    /// Returns the name used in plan documents and exports.
    pub fn name(&self) -> &'static str {
        match self {
            Variation::Nothing => "Nothing",
            Variation::Culture => "Culture",
            Variation::Segment => "Segment",
            Variation::CultureAndSegment => "CultureAndSegment",
        }
    }

    /// Check if values vary by culture.
    pub fn varies_by_culture(&self) -> bool {
        matches!(self, Variation::Culture | Variation::CultureAndSegment)
    }

    /// Check if values vary by segment.
    pub fn varies_by_segment(&self) -> bool {
        matches!(self, Variation::Segment | Variation::CultureAndSegment)
    }

    /// The smallest variation covering both `self` and `other`.
    pub fn union(self, other: Variation) -> Variation {
        match (
            self.varies_by_culture() || other.varies_by_culture(),
            self.varies_by_segment() || other.varies_by_segment(),
        ) {
            (false, false) => Variation::Nothing,
            (true, false) => Variation::Culture,
            (false, true) => Variation::Segment,
            (true, true) => Variation::CultureAndSegment,
        }
    }
}

impl std::fmt::Display for Variation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a variation name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variation: {0}")]
pub struct ParseVariationError(pub String);

impl FromStr for Variation {
    type Err = ParseVariationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nothing" | "none" => Ok(Variation::Nothing),
            "culture" => Ok(Variation::Culture),
            "segment" => Ok(Variation::Segment),
            "cultureandsegment" => Ok(Variation::CultureAndSegment),
            _ => Err(ParseVariationError(s.to_string())),
        }
    }
}
