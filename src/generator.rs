//! Tree generation and the aging transition.
//!
//! [`TreeGenerator`] resolves caller options (filling in defaults and
//! replacing unknown keys), grows the canvas and wraps it in a
//! [`BonsaiTree`].
//!
//! # Option defaults
//!
//! | Option | Default |
//! |--------|---------|
//! | style  | formal |
//! | season | from today's local calendar month, inverted in the southern hemisphere |
//! | age    | young |
//! | seed   | none (not replayable) |
//!
//! Unknown keys never fail generation: they are replaced by the default and
//! reported in [`ResolvedOptions::fallbacks`].

use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::error::{BonsaiError, Result};
use crate::grower::TreeGrower;
use crate::tree::BonsaiTree;
use crate::types::{AgeStage, Hemisphere, Season, Style};
use chrono::{DateTime, Datelike, Local, Month, Utc};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// Caller-supplied generation options; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    pub style: Option<String>,
    pub season: Option<String>,
    pub age: Option<String>,
    pub seed: Option<u64>,
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(mut self, style: impl fmt::Display) -> Self {
        self.style = Some(style.to_string());
        self
    }

    pub fn with_season(mut self, season: impl fmt::Display) -> Self {
        self.season = Some(season.to_string());
        self
    }

    pub fn with_age(mut self, age: impl fmt::Display) -> Self {
        self.age = Some(age.to_string());
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// An option key that was not recognised and the value used instead
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    pub option: &'static str,
    pub rejected: String,
    pub substituted: String,
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown {} '{}', using '{}'",
            self.option, self.rejected, self.substituted
        )
    }
}

/// Fully resolved generation parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOptions {
    pub style: Style,
    pub season: Season,
    pub age: AgeStage,
    pub seed: Option<u64>,
    pub fallbacks: Vec<Fallback>,
}

impl ResolvedOptions {
    /// Reject the resolution if any key had to be replaced.
    pub fn strict(self) -> Result<Self> {
        match self.fallbacks.first() {
            Some(fallback) => Err(BonsaiError::unknown_key(fallback.option, fallback.rejected.clone())),
            None => Ok(self),
        }
    }
}

/// Generates and ages bonsai trees.
#[derive(Debug, Clone, Default)]
pub struct TreeGenerator {
    catalog: Catalog,
    hemisphere: Hemisphere,
    debug: bool,
}

impl TreeGenerator {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            catalog: config.catalog.clone(),
            hemisphere: config.hemisphere,
            debug: config.debug,
        }
    }

    pub fn with_hemisphere(mut self, hemisphere: Hemisphere) -> Self {
        self.hemisphere = hemisphere;
        self
    }

    /// Emit the resolved options of every `generate` call as a trace event.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Default season for a given moment, read off the local calendar
    pub fn season_for(&self, now: DateTime<Utc>) -> Season {
        // month() is always 1..=12
        let local = now.with_timezone(&Local);
        let month = Month::try_from(local.month() as u8).unwrap_or(Month::January);
        Season::from_month(month, self.hemisphere)
    }

    /// Resolve options against the defaults as of now
    pub fn resolve(&self, options: &GenerateOptions) -> ResolvedOptions {
        self.resolve_at(options, Utc::now())
    }

    pub fn resolve_at(&self, options: &GenerateOptions, now: DateTime<Utc>) -> ResolvedOptions {
        let mut fallbacks = Vec::new();
        let style = lenient("style", options.style.as_deref(), Style::Formal, &mut fallbacks);
        let season = lenient(
            "season",
            options.season.as_deref(),
            self.season_for(now),
            &mut fallbacks,
        );
        let age = lenient("age", options.age.as_deref(), AgeStage::Young, &mut fallbacks);
        ResolvedOptions {
            style,
            season,
            age,
            seed: options.seed,
            fallbacks,
        }
    }

    pub fn generate(&self, options: &GenerateOptions) -> BonsaiTree {
        self.generate_at(options, Utc::now())
    }

    /// Generate with an explicit clock; `now` picks the default season and
    /// stamps both timestamps.
    pub fn generate_at(&self, options: &GenerateOptions, now: DateTime<Utc>) -> BonsaiTree {
        let resolved = self.resolve_at(options, now);
        if self.debug {
            info!(
                target: "bonsai::generate",
                style = %resolved.style,
                season = %resolved.season,
                age = %resolved.age,
                seed = ?resolved.seed,
                "resolved generation options"
            );
        }
        let canvas = TreeGrower::new(&self.catalog).grow(
            resolved.style,
            resolved.season,
            resolved.age,
            resolved.seed,
        );
        BonsaiTree::new(
            canvas,
            resolved.style,
            resolved.season,
            resolved.age,
            resolved.seed,
            now,
        )
    }

    /// Rotate the tree's style one step through formal → informal → slanting.
    ///
    /// The canvas, age stage, season and seed are left as they are; only
    /// `style` and `updated_at` change. Use [`regenerate`](Self::regenerate)
    /// to redraw the canvas for the new style.
    pub fn age<'t>(&self, tree: &'t mut BonsaiTree) -> &'t mut BonsaiTree {
        self.age_at(tree, Utc::now())
    }

    pub fn age_at<'t>(&self, tree: &'t mut BonsaiTree, now: DateTime<Utc>) -> &'t mut BonsaiTree {
        tree.style = tree.style.next_in_aging_cycle();
        tree.touch(now);
        tree
    }

    /// Regrow the canvas from the tree's own parameters.
    pub fn regenerate<'t>(&self, tree: &'t mut BonsaiTree) -> &'t mut BonsaiTree {
        self.regenerate_at(tree, Utc::now())
    }

    pub fn regenerate_at<'t>(&self, tree: &'t mut BonsaiTree, now: DateTime<Utc>) -> &'t mut BonsaiTree {
        tree.canvas = TreeGrower::new(&self.catalog).grow(tree.style, tree.season, tree.age, tree.seed);
        tree.touch(now);
        tree
    }
}

/// Parse an option key, substituting `default` for missing or unknown keys.
fn lenient<T>(option: &'static str, key: Option<&str>, default: T, fallbacks: &mut Vec<Fallback>) -> T
where
    T: FromStr + fmt::Display + Copy,
{
    let Some(key) = key else {
        return default;
    };
    match key.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            let fallback = Fallback {
                option,
                rejected: key.to_string(),
                substituted: default.to_string(),
            };
            warn!(%fallback, "falling back to default");
            fallbacks.push(fallback);
            default
        }
    }
}
