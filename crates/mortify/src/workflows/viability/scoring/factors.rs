use super::super::brands::{BrandTier, BrandTierTable};
use super::config::ScoringConfig;
use super::{ScoreComponent, ScoreFactor, ScoringSnapshot};

pub(crate) fn score_snapshot(
    snapshot: &ScoringSnapshot,
    config: &ScoringConfig,
    brands: &BrandTierTable,
) -> (Vec<ScoreComponent>, u8) {
    let mut components = Vec::new();
    let mut total_score: u8 = 0;

    let tier = brands.tier_for(&snapshot.brand);
    let brand_score = brand_points(tier);
    let brand_notes = if tier == BrandTier::Unlisted {
        format!(
            "brand '{}' not in tier table, treated as tier {}",
            snapshot.brand,
            tier.rank()
        )
    } else {
        format!(
            "brand '{}' listed as {} (tier {})",
            snapshot.brand,
            tier.label(),
            tier.rank()
        )
    };
    components.push(ScoreComponent {
        factor: ScoreFactor::Brand,
        points: brand_score,
        notes: brand_notes,
    });
    total_score += brand_score;

    let age_score = age_points(snapshot.current_year, snapshot.purchase_year, config);
    let age_notes = match snapshot.purchase_year {
        Some(year) => {
            let age = snapshot.current_year - year;
            if age_score > 0 {
                format!(
                    "purchased {year}, {age} years old, within the {}-year window",
                    config.recent_purchase_window_years
                )
            } else {
                format!(
                    "purchased {year}, {age} years old, outside the {}-year window",
                    config.recent_purchase_window_years
                )
            }
        }
        None => "purchase year unknown".to_string(),
    };
    components.push(ScoreComponent {
        factor: ScoreFactor::Age,
        points: age_score,
        notes: age_notes,
    });
    total_score += age_score;

    let installation_score = installation_points(snapshot, config);
    let installation_notes = if snapshot.defaults.trivial_install {
        "category installs trivially, floor level carries no benefit".to_string()
    } else if installation_score > 0 {
        format!(
            "floor {} within the accessible limit {}",
            snapshot.floor_level, config.accessible_floor_limit
        )
    } else {
        format!(
            "floor {} above the accessible limit {}",
            snapshot.floor_level, config.accessible_floor_limit
        )
    };
    components.push(ScoreComponent {
        factor: ScoreFactor::Installation,
        points: installation_score,
        notes: installation_notes,
    });
    total_score += installation_score;

    let financial_score = financial_points(
        snapshot.total_spent,
        snapshot.defaults.avg_market_price,
        config,
    );
    let financial_notes = if financial_score > 0 {
        format!(
            "spent {:.2} stays under {:.0}% of market price {:.2}",
            snapshot.total_spent,
            config.repair_spend_ratio * 100.0,
            snapshot.defaults.avg_market_price
        )
    } else {
        format!(
            "spent {:.2} reaches {:.0}% of market price {:.2}",
            snapshot.total_spent,
            config.repair_spend_ratio * 100.0,
            snapshot.defaults.avg_market_price
        )
    };
    components.push(ScoreComponent {
        factor: ScoreFactor::Financial,
        points: financial_score,
        notes: financial_notes,
    });
    total_score += financial_score;

    (components, total_score)
}

/// Tiers three and four intentionally score the same; the listing still
/// matters for audit notes and future tuning.
pub(crate) fn brand_points(tier: BrandTier) -> u8 {
    match tier {
        BrandTier::Premium => 4,
        BrandTier::Trusted => 3,
        BrandTier::Recognized => 1,
        BrandTier::Unlisted => 1,
    }
}

pub(crate) fn age_points(
    current_year: i32,
    purchase_year: Option<i32>,
    config: &ScoringConfig,
) -> u8 {
    match purchase_year {
        Some(year) if current_year - year < config.recent_purchase_window_years => 1,
        _ => 0,
    }
}

/// A trivially installed category earns nothing regardless of floor; the
/// point rewards avoided installation effort, and there is none to avoid.
pub(crate) fn installation_points(snapshot: &ScoringSnapshot, config: &ScoringConfig) -> u8 {
    if snapshot.defaults.trivial_install {
        return 0;
    }
    if snapshot.floor_level <= config.accessible_floor_limit {
        1
    } else {
        0
    }
}

/// Spend equal to the ratio boundary already counts as uneconomical.
pub(crate) fn financial_points(total_spent: f64, market_price: f64, config: &ScoringConfig) -> u8 {
    if total_spent < market_price * config.repair_spend_ratio {
        1
    } else {
        0
    }
}
