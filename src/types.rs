//! Type-safe keys for the bonsai engine
//!
//! Style, season and age keys are closed sets represented as enums. Their
//! numeric parameters and glyphs live in the [`Catalog`](crate::catalog::Catalog)
//! lookup table, so nothing here decides how a tree is drawn.

use chrono::Month;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Bonsai growth style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Style {
    /// Upright, straight trunk
    #[default]
    Formal,
    /// Upright with gentle curves
    Informal,
    /// Trunk leaning to one side
    Slanting,
    /// Trunk sweeping down and away
    Cascade,
}

impl Style {
    /// Styles visited by [`TreeGenerator::age`](crate::generator::TreeGenerator::age), in order.
    pub const AGING_CYCLE: [Style; 3] = [Style::Formal, Style::Informal, Style::Slanting];

    /// The style that follows this one in the aging cycle.
    ///
    /// Cascade is not part of the cycle and re-enters it at the start.
    pub fn next_in_aging_cycle(self) -> Self {
        match Self::AGING_CYCLE.iter().position(|s| *s == self) {
            Some(i) => Self::AGING_CYCLE[(i + 1) % Self::AGING_CYCLE.len()],
            None => Self::AGING_CYCLE[0],
        }
    }
}

/// Season, selecting the leaf palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    /// Season for a calendar month.
    ///
    /// Northern mapping: Mar-May spring, Jun-Aug summer, Sep-Nov fall,
    /// Dec-Feb winter. The southern hemisphere gets the opposite season.
    pub fn from_month(month: Month, hemisphere: Hemisphere) -> Self {
        let northern = match month {
            Month::March | Month::April | Month::May => Season::Spring,
            Month::June | Month::July | Month::August => Season::Summer,
            Month::September | Month::October | Month::November => Season::Fall,
            Month::December | Month::January | Month::February => Season::Winter,
        };
        match hemisphere {
            Hemisphere::Northern => northern,
            Hemisphere::Southern => northern.opposite(),
        }
    }

    /// The season half a year away
    pub fn opposite(self) -> Self {
        match self {
            Season::Spring => Season::Fall,
            Season::Summer => Season::Winter,
            Season::Fall => Season::Spring,
            Season::Winter => Season::Summer,
        }
    }
}

/// Hemisphere used when deriving the default season from the date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Hemisphere {
    #[default]
    Northern,
    Southern,
}

/// Canvas size for one age stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope {
    pub width: usize,
    pub height: usize,
}

/// Coarse growth stage.
///
/// Stages are ordered: every property below grows monotonically from
/// `Young` to `Ancient`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AgeStage {
    #[default]
    Young,
    Mature,
    Ancient,
}

impl AgeStage {
    /// Fixed canvas dimensions for this stage
    pub const fn envelope(self) -> Envelope {
        match self {
            Self::Young => Envelope { width: 24, height: 12 },
            Self::Mature => Envelope { width: 40, height: 18 },
            Self::Ancient => Envelope { width: 56, height: 24 },
        }
    }

    /// Recursion depth before the style's complexity factor is applied
    pub const fn base_depth(self) -> u32 {
        match self {
            Self::Young => 2,
            Self::Mature => 3,
            Self::Ancient => 4,
        }
    }

    /// Probability that a cell near a branch terminus receives a leaf
    pub const fn leaf_density(self) -> f64 {
        match self {
            Self::Young => 0.45,
            Self::Mature => 0.6,
            Self::Ancient => 0.75,
        }
    }

    /// Radius of the leaf cluster drawn at each terminus
    pub const fn canopy_radius(self) -> i32 {
        match self {
            Self::Young => 1,
            Self::Mature => 2,
            Self::Ancient => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_aging_cycle_wraps() {
        assert_eq!(Style::Formal.next_in_aging_cycle(), Style::Informal);
        assert_eq!(Style::Informal.next_in_aging_cycle(), Style::Slanting);
        assert_eq!(Style::Slanting.next_in_aging_cycle(), Style::Formal);
    }

    #[test]
    fn test_cascade_reenters_cycle() {
        assert_eq!(Style::Cascade.next_in_aging_cycle(), Style::Formal);
    }

    #[test]
    fn test_keys_parse_case_insensitively() {
        assert_eq!(Style::from_str("Cascade").unwrap(), Style::Cascade);
        assert_eq!(Season::from_str("WINTER").unwrap(), Season::Winter);
        assert_eq!(AgeStage::from_str("ancient").unwrap(), AgeStage::Ancient);
        assert!(Style::from_str("bunjin").is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_keys() {
        assert_eq!(serde_json::to_string(&Style::Slanting).unwrap(), "\"slanting\"");
        assert_eq!(serde_json::to_string(&Season::Fall).unwrap(), "\"fall\"");
        assert_eq!(serde_json::to_string(&AgeStage::Mature).unwrap(), "\"mature\"");
    }

    #[test]
    fn test_month_mapping_northern() {
        assert_eq!(Season::from_month(Month::April, Hemisphere::Northern), Season::Spring);
        assert_eq!(Season::from_month(Month::July, Hemisphere::Northern), Season::Summer);
        assert_eq!(Season::from_month(Month::October, Hemisphere::Northern), Season::Fall);
        assert_eq!(Season::from_month(Month::January, Hemisphere::Northern), Season::Winter);
        assert_eq!(Season::from_month(Month::December, Hemisphere::Northern), Season::Winter);
    }

    #[test]
    fn test_month_mapping_southern_is_inverted() {
        for month in 1..=12u8 {
            let month = Month::try_from(month).unwrap();
            let north = Season::from_month(month, Hemisphere::Northern);
            let south = Season::from_month(month, Hemisphere::Southern);
            assert_eq!(south, north.opposite());
        }
    }

    #[test]
    fn test_envelope_grows_with_age() {
        let stages: Vec<AgeStage> = AgeStage::iter().collect();
        for pair in stages.windows(2) {
            let (a, b) = (pair[0].envelope(), pair[1].envelope());
            assert!(b.width > a.width && b.height > a.height);
            assert!(pair[1].base_depth() > pair[0].base_depth());
            assert!(pair[1].leaf_density() > pair[0].leaf_density());
        }
    }
}
