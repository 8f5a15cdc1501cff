use super::common::*;
use crate::workflows::viability::brands::{BrandTier, BrandTierTable};
use crate::workflows::viability::domain::CategoryDefaults;
use crate::workflows::viability::presentation::{display_level, ScoreBand};
use crate::workflows::viability::scoring::{
    age_points, brand_points, financial_points, installation_points, suggest_outcome,
    AmortizationEngine, ScoreFactor, ScoringSnapshot, ViabilitySuggestion,
};
use crate::workflows::viability::verdict::QuickVerdictStatus;

fn engine() -> AmortizationEngine {
    AmortizationEngine::new(scoring_config(), BrandTierTable::standard())
}

fn snapshot(
    brand: &str,
    purchase_year: Option<i32>,
    floor_level: i32,
    total_spent: f64,
    defaults: CategoryDefaults,
) -> ScoringSnapshot {
    ScoringSnapshot {
        brand: brand.to_string(),
        current_year: TEST_YEAR,
        purchase_year,
        floor_level,
        total_spent,
        defaults,
    }
}

#[test]
fn brand_lookup_trims_and_ignores_case() {
    let brands = BrandTierTable::standard();
    assert_eq!(brands.tier_for("  miele  "), BrandTier::Premium);
    assert_eq!(brands.tier_for("Bosch"), BrandTier::Trusted);
    assert_eq!(brands.tier_for("balay"), BrandTier::Recognized);
    assert_eq!(brands.tier_for("ACME FRIDGES"), BrandTier::Unlisted);
    assert_eq!(brands.tier_for("   "), BrandTier::Unlisted);
}

#[test]
fn brand_points_keep_the_legacy_tier_gap() {
    assert_eq!(brand_points(BrandTier::Premium), 4);
    assert_eq!(brand_points(BrandTier::Trusted), 3);
    assert_eq!(brand_points(BrandTier::Recognized), 1);
    // Listed tier three and unlisted tier four score identically on purpose.
    assert_eq!(
        brand_points(BrandTier::Recognized),
        brand_points(BrandTier::Unlisted)
    );
}

#[test]
fn brand_points_never_increase_down_the_tiers() {
    let ordered = [
        BrandTier::Premium,
        BrandTier::Trusted,
        BrandTier::Recognized,
        BrandTier::Unlisted,
    ];
    for pair in ordered.windows(2) {
        assert!(brand_points(pair[0]) >= brand_points(pair[1]));
    }
}

#[test]
fn age_point_requires_strictly_recent_purchase() {
    let config = scoring_config();
    assert_eq!(age_points(TEST_YEAR, Some(2021), &config), 1);
    assert_eq!(age_points(TEST_YEAR, Some(2019), &config), 1);
    // Exactly the window width counts as outside it.
    assert_eq!(age_points(TEST_YEAR, Some(TEST_YEAR - 6), &config), 0);
    assert_eq!(age_points(TEST_YEAR, Some(2010), &config), 0);
    assert_eq!(age_points(TEST_YEAR, None, &config), 0);
}

#[test]
fn trivial_install_earns_nothing_on_any_floor() {
    let config = scoring_config();
    let microondas = defaults("Microondas", 120.0, 8, true);
    for floor in [0, 1, 2, 5] {
        let snapshot = snapshot("MIELE", Some(2021), floor, 0.0, microondas.clone());
        assert_eq!(installation_points(&snapshot, &config), 0);
    }
}

#[test]
fn installation_point_follows_the_floor_limit() {
    let config = scoring_config();
    let lavadora = lavadora_defaults();

    let ground = snapshot("MIELE", Some(2021), 0, 0.0, lavadora.clone());
    assert_eq!(installation_points(&ground, &config), 1);

    let at_limit = snapshot("MIELE", Some(2021), 2, 0.0, lavadora.clone());
    assert_eq!(installation_points(&at_limit, &config), 1);

    let above = snapshot("MIELE", Some(2021), 3, 0.0, lavadora);
    assert_eq!(installation_points(&above, &config), 0);
}

#[test]
fn financial_point_stops_at_half_the_market_price() {
    let config = scoring_config();
    assert_eq!(financial_points(299.99, 600.0, &config), 1);
    // Spend equal to the boundary is already uneconomical.
    assert_eq!(financial_points(300.0, 600.0, &config), 0);
    assert_eq!(financial_points(900.0, 400.0, &config), 0);
    assert_eq!(financial_points(0.0, 600.0, &config), 1);
}

#[test]
fn engine_scores_a_premium_recent_appliance_at_full_marks() {
    let outcome = engine().score(&snapshot(
        "MIELE",
        Some(2021),
        1,
        50.0,
        lavadora_defaults(),
    ));

    assert_eq!(outcome.points_for(ScoreFactor::Brand), 4);
    assert_eq!(outcome.points_for(ScoreFactor::Age), 1);
    assert_eq!(outcome.points_for(ScoreFactor::Installation), 1);
    assert_eq!(outcome.points_for(ScoreFactor::Financial), 1);
    // The raw total may exceed the display ceiling; it is stored unclamped.
    assert_eq!(outcome.total_score, 7);
    assert_eq!(outcome.suggestion, ViabilitySuggestion::Viable);
    assert_eq!(display_level(outcome.total_score, 0), 6);
}

#[test]
fn engine_scores_a_depleted_appliance_as_obsolete() {
    let outcome = engine().score(&snapshot(
        "ACME FRIDGES",
        Some(2015),
        5,
        900.0,
        defaults("Frigorifico Combi", 400.0, 12, false),
    ));

    assert_eq!(outcome.points_for(ScoreFactor::Brand), 1);
    assert_eq!(outcome.points_for(ScoreFactor::Age), 0);
    assert_eq!(outcome.points_for(ScoreFactor::Installation), 0);
    assert_eq!(outcome.points_for(ScoreFactor::Financial), 0);
    assert_eq!(outcome.total_score, 1);
    assert_eq!(outcome.suggestion, ViabilitySuggestion::Obsolete);
}

#[test]
fn engine_notes_name_the_scored_inputs() {
    let outcome = engine().score(&snapshot(
        "Miele",
        Some(2021),
        1,
        50.0,
        lavadora_defaults(),
    ));

    let brand_note = &outcome.components[0].notes;
    assert!(brand_note.contains("Miele"));

    let age_note = &outcome.components[1].notes;
    assert!(age_note.contains("2021"));
}

#[test]
fn classification_covers_every_reachable_total() {
    let config = scoring_config();
    assert_eq!(suggest_outcome(1, &config), ViabilitySuggestion::Obsolete);
    assert_eq!(suggest_outcome(2, &config), ViabilitySuggestion::Obsolete);
    assert_eq!(suggest_outcome(3, &config), ViabilitySuggestion::Doubtful);
    assert_eq!(suggest_outcome(4, &config), ViabilitySuggestion::Doubtful);
    assert_eq!(suggest_outcome(5, &config), ViabilitySuggestion::Viable);
    assert_eq!(suggest_outcome(6, &config), ViabilitySuggestion::Viable);
    assert_eq!(suggest_outcome(7, &config), ViabilitySuggestion::Viable);
}

#[test]
fn every_snapshot_lands_between_one_and_seven() {
    let engine = engine();
    let brands = ["MIELE", "LG", "Balay", "NoName"];
    let years = [None, Some(2021), Some(2010)];
    let floors = [0, 3];
    let spends = [0.0, 900.0];

    for brand in brands {
        for year in years {
            for floor in floors {
                for spent in spends {
                    let outcome =
                        engine.score(&snapshot(brand, year, floor, spent, lavadora_defaults()));
                    assert!(
                        (1..=7).contains(&outcome.total_score),
                        "total {} out of range for brand {brand}",
                        outcome.total_score
                    );
                }
            }
        }
    }
}

#[test]
fn injected_brand_table_changes_scoring() {
    let custom = BrandTierTable::from_entries(vec![(
        "ACME FRIDGES".to_string(),
        BrandTier::Premium,
    )]);
    let engine = AmortizationEngine::new(scoring_config(), custom);

    let outcome = engine.score(&snapshot(
        "acme fridges",
        Some(2021),
        0,
        0.0,
        lavadora_defaults(),
    ));
    assert_eq!(outcome.points_for(ScoreFactor::Brand), 4);
}

#[test]
fn display_level_clamps_to_the_band_scale() {
    assert_eq!(display_level(7, 0), 6);
    assert_eq!(display_level(7, 2), 6);
    assert_eq!(display_level(0, 0), 1);
    assert_eq!(display_level(3, 2), 5);
    assert_eq!(display_level(u8::MAX, u8::MAX), 6);
}

#[test]
fn bands_expose_stable_display_metadata() {
    assert_eq!(ScoreBand::from_level(0), ScoreBand::DeadZone);
    assert_eq!(ScoreBand::from_level(1), ScoreBand::DeadZone);
    assert_eq!(ScoreBand::from_level(4), ScoreBand::Serviceable);
    assert_eq!(ScoreBand::from_level(9), ScoreBand::MasterInvestment);

    let band = ScoreBand::MasterInvestment;
    assert_eq!(band.level(), 6);
    assert_eq!(band.label(), "Master Investment");
    assert!(band.color().starts_with('#'));
    assert!(!band.description().is_empty());

    let view = ScoreBand::MoneyPit.view();
    assert_eq!(view.level, 2);
    assert_eq!(view.label, "Money Pit");
}

#[test]
fn quick_verdict_bands_cover_all_statuses() {
    assert_eq!(
        ScoreBand::for_quick_verdict(QuickVerdictStatus::Viable),
        ScoreBand::MasterInvestment
    );
    assert_eq!(
        ScoreBand::for_quick_verdict(QuickVerdictStatus::Ok),
        ScoreBand::Serviceable
    );
    assert_eq!(
        ScoreBand::for_quick_verdict(QuickVerdictStatus::Unknown),
        ScoreBand::Borderline
    );
    assert_eq!(
        ScoreBand::for_quick_verdict(QuickVerdictStatus::Obsolete),
        ScoreBand::DeadZone
    );
}
