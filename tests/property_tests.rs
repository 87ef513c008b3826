//! Property-Based Tests for bonsai
//!
//! These tests verify:
//! - Key string round-trips (to_string → parse)
//! - Seeded growth is deterministic
//! - Every canvas is rectangular, sized to its age stage and drawn only
//!   from permitted glyphs

use proptest::prelude::*;

use bonsai::canvas::BLANK;
use bonsai::{AgeStage, Catalog, Season, Style, TreeGrower};

fn style_strategy() -> impl Strategy<Value = Style> {
    prop_oneof![
        Just(Style::Formal),
        Just(Style::Informal),
        Just(Style::Slanting),
        Just(Style::Cascade),
    ]
}

fn season_strategy() -> impl Strategy<Value = Season> {
    prop_oneof![
        Just(Season::Spring),
        Just(Season::Summer),
        Just(Season::Fall),
        Just(Season::Winter),
    ]
}

fn age_strategy() -> impl Strategy<Value = AgeStage> {
    prop_oneof![
        Just(AgeStage::Young),
        Just(AgeStage::Mature),
        Just(AgeStage::Ancient),
    ]
}

// =============================================================================
// Key Property Tests
// =============================================================================

proptest! {
    /// Style: to_string → parse round-trip is identity
    #[test]
    fn style_roundtrip(style in style_strategy()) {
        let parsed: Style = style.to_string().parse().expect("Should parse");
        prop_assert_eq!(style, parsed);
    }

    /// Season: Display output is lowercase
    #[test]
    fn season_display_is_lowercase(season in season_strategy()) {
        let s = season.to_string();
        prop_assert_eq!(s.clone(), s.to_lowercase());
    }

    /// Aging three times returns to the start of the cycle
    #[test]
    fn aging_cycle_has_period_three(style in style_strategy()) {
        let once = style.next_in_aging_cycle();
        let four = once.next_in_aging_cycle().next_in_aging_cycle().next_in_aging_cycle();
        prop_assert_eq!(once, four);
        prop_assert!(Style::AGING_CYCLE.contains(&once));
    }
}

// =============================================================================
// Growth Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Same inputs and seed always give the same canvas
    #[test]
    fn seeded_growth_is_deterministic(
        style in style_strategy(),
        season in season_strategy(),
        age in age_strategy(),
        seed in any::<u64>(),
    ) {
        let catalog = Catalog::default();
        let grower = TreeGrower::new(&catalog);
        let a = grower.grow(style, season, age, Some(seed));
        let b = grower.grow(style, season, age, Some(seed));
        prop_assert_eq!(a.render(), b.render());
    }

    /// Canvases are rectangular and sized to the age stage
    #[test]
    fn canvas_is_well_formed(
        style in style_strategy(),
        season in season_strategy(),
        age in age_strategy(),
        seed in proptest::option::of(any::<u64>()),
    ) {
        let catalog = Catalog::default();
        let canvas = TreeGrower::new(&catalog).grow(style, season, age, seed);
        let envelope = age.envelope();
        prop_assert_eq!(canvas.height(), envelope.height);
        for row in canvas.rows() {
            prop_assert_eq!(row.len(), envelope.width);
        }
    }

    /// Only blank, trunk and this season's leaf glyphs appear
    #[test]
    fn canvas_uses_permitted_glyphs(
        style in style_strategy(),
        season in season_strategy(),
        age in age_strategy(),
        seed in proptest::option::of(any::<u64>()),
    ) {
        let catalog = Catalog::default();
        let canvas = TreeGrower::new(&catalog).grow(style, season, age, seed);
        let leaves = catalog.palette(season).leaves;
        for glyph in canvas.glyphs() {
            prop_assert!(
                glyph == BLANK || catalog.trunk().contains(glyph) || leaves.contains(&glyph),
                "unexpected glyph {:?}", glyph
            );
        }
    }

    /// The tree always stands on a trunk at the bottom centre
    #[test]
    fn trunk_base_is_present(
        style in style_strategy(),
        age in age_strategy(),
        seed in any::<u64>(),
    ) {
        let catalog = Catalog::default();
        let canvas = TreeGrower::new(&catalog).grow(style, Season::Summer, age, Some(seed));
        let envelope = age.envelope();
        let base = canvas.get(envelope.width / 2, envelope.height - 1).unwrap();
        prop_assert!(catalog.trunk().contains(base));
    }
}
