//! Style profiles, season palettes and trunk glyphs as data.
//!
//! The grower never matches on a [`Style`] or [`Season`]; it asks the catalog
//! for the parameters behind a key. The built-in table below can be replaced
//! wholesale from the engine configuration file.
//!
//! | Style    | Curve bias | Complexity |
//! |----------|-----------:|-----------:|
//! | formal   |        0.0 |        1.0 |
//! | informal |       0.15 |        1.2 |
//! | slanting |        0.3 |        1.1 |
//! | cascade  |       -0.5 |        1.4 |

use crate::error::{BonsaiError, Result};
use crate::types::{Season, Style};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

/// Shape parameters for one style
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleProfile {
    /// Skews branch direction: positive leans right, negative leans left
    pub curve_bias: f64,
    /// Scales fan-out and recursion depth
    pub complexity: f64,
}

/// Leaf glyphs for one season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonPalette {
    pub leaves: [char; 3],
}

/// Number of glyphs in the trunk set
pub const TRUNK_GLYPH_COUNT: usize = 11;

/// The shared box-drawing set used for trunk and branches.
///
/// Order is significant: vertical, horizontal, the four corners
/// (`┌ ┐ └ ┘`), the four tees (`├ ┤ ┬ ┴`) and the cross.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrunkGlyphs(pub [char; TRUNK_GLYPH_COUNT]);

impl TrunkGlyphs {
    pub fn glyphs(&self) -> &[char] {
        &self.0
    }

    pub fn get(&self, index: usize) -> char {
        self.0[index]
    }

    pub fn contains(&self, glyph: char) -> bool {
        self.0.contains(&glyph)
    }
}

impl Default for TrunkGlyphs {
    fn default() -> Self {
        Self(['│', '─', '┌', '┐', '└', '┘', '├', '┤', '┬', '┴', '┼'])
    }
}

/// Unvalidated catalog shape as it appears in configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogTable {
    styles: BTreeMap<Style, StyleProfile>,
    palettes: BTreeMap<Season, SeasonPalette>,
    #[serde(default)]
    trunk: TrunkGlyphs,
}

/// Complete lookup table from keys to growth parameters.
///
/// A `Catalog` always has an entry for every style and season, so lookups
/// are total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CatalogTable", into = "CatalogTable")]
pub struct Catalog {
    styles: BTreeMap<Style, StyleProfile>,
    palettes: BTreeMap<Season, SeasonPalette>,
    trunk: TrunkGlyphs,
}

impl Catalog {
    /// Build a catalog, checking it covers every key with sane values.
    pub fn new(
        styles: BTreeMap<Style, StyleProfile>,
        palettes: BTreeMap<Season, SeasonPalette>,
        trunk: TrunkGlyphs,
    ) -> Result<Self> {
        for style in Style::iter() {
            let profile = styles
                .get(&style)
                .ok_or_else(|| BonsaiError::config(format!("catalog is missing style '{}'", style)))?;
            if !(-1.0..=1.0).contains(&profile.curve_bias) {
                return Err(BonsaiError::config(format!(
                    "style '{}' curve bias {} is outside [-1, 1]",
                    style, profile.curve_bias
                )));
            }
            if !(profile.complexity > 0.0 && profile.complexity <= 3.0) {
                return Err(BonsaiError::config(format!(
                    "style '{}' complexity {} is outside (0, 3]",
                    style, profile.complexity
                )));
            }
        }

        let mut seen_trunk = trunk.0.to_vec();
        seen_trunk.sort_unstable();
        seen_trunk.dedup();
        if seen_trunk.len() != TRUNK_GLYPH_COUNT || trunk.contains(' ') {
            return Err(BonsaiError::config(
                "trunk glyphs must be 11 distinct non-blank characters",
            ));
        }

        for season in Season::iter() {
            let palette = palettes
                .get(&season)
                .ok_or_else(|| BonsaiError::config(format!("catalog is missing season '{}'", season)))?;
            for leaf in palette.leaves {
                if leaf.is_whitespace() || trunk.contains(leaf) {
                    return Err(BonsaiError::config(format!(
                        "season '{}' leaf {:?} must be visible and distinct from trunk glyphs",
                        season, leaf
                    )));
                }
            }
        }

        Ok(Self {
            styles,
            palettes,
            trunk,
        })
    }

    pub fn style(&self, style: Style) -> &StyleProfile {
        &self.styles[&style]
    }

    pub fn palette(&self, season: Season) -> &SeasonPalette {
        &self.palettes[&season]
    }

    pub fn trunk(&self) -> &TrunkGlyphs {
        &self.trunk
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let styles = BTreeMap::from([
            (Style::Formal, StyleProfile { curve_bias: 0.0, complexity: 1.0 }),
            (Style::Informal, StyleProfile { curve_bias: 0.15, complexity: 1.2 }),
            (Style::Slanting, StyleProfile { curve_bias: 0.3, complexity: 1.1 }),
            (Style::Cascade, StyleProfile { curve_bias: -0.5, complexity: 1.4 }),
        ]);
        let palettes = BTreeMap::from([
            (Season::Spring, SeasonPalette { leaves: ['&', '*', 'o'] }),
            (Season::Summer, SeasonPalette { leaves: ['@', '&', '%'] }),
            (Season::Fall, SeasonPalette { leaves: ['*', '~', ','] }),
            (Season::Winter, SeasonPalette { leaves: ['.', '+', '\''] }),
        ]);
        Self {
            styles,
            palettes,
            trunk: TrunkGlyphs::default(),
        }
    }
}

impl TryFrom<CatalogTable> for Catalog {
    type Error = BonsaiError;

    fn try_from(table: CatalogTable) -> Result<Self> {
        Catalog::new(table.styles, table.palettes, table.trunk)
    }
}

impl From<Catalog> for CatalogTable {
    fn from(catalog: Catalog) -> Self {
        Self {
            styles: catalog.styles,
            palettes: catalog.palettes,
            trunk: catalog.trunk,
        }
    }
}
