use crate::infra::{
    default_category_rows, default_scoring_config, sample_appliances, sample_tickets,
    InMemoryApplianceRepository, InMemoryAssessmentRepository, InMemoryCategoryCatalog,
    InMemoryRepairLedger, InMemoryReviewQueue,
};
use chrono::{Datelike, Local};
use clap::Args;
use mortify::error::AppError;
use mortify::workflows::catalog::{CategoryBook, CategoryReferenceImporter};
use mortify::workflows::viability::{
    display_level, AmortizationEngine, ApplianceId, Assessment, AssessmentInputs,
    BrandTierTable, CategoryDefaults, ExpertOverride, ExpertReview, ReviewStatus, SaveOutcome,
    ScoreBand, ScoringSnapshot, ViabilitySource, FALLBACK_LIFESPAN_YEARS, FALLBACK_MARKET_PRICE,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct AssessArgs {
    /// Brand name as it appears on the appliance
    #[arg(long)]
    pub(crate) brand: String,
    /// Appliance category, looked up in the reference CSV when one is given
    #[arg(long)]
    pub(crate) category: Option<String>,
    /// Purchase year (omit when unknown)
    #[arg(long)]
    pub(crate) purchase_year: Option<i32>,
    /// Floor the appliance sits on (defaults to ground floor)
    #[arg(long)]
    pub(crate) floor_level: Option<i32>,
    /// Historical repair spend in euros (defaults to zero)
    #[arg(long)]
    pub(crate) total_spent: Option<f64>,
    /// Average market price for the category (service fallback otherwise)
    #[arg(long)]
    pub(crate) market_price: Option<f64>,
    /// Average lifespan in years for the category (service fallback otherwise)
    #[arg(long)]
    pub(crate) lifespan_years: Option<u8>,
    /// Treat the category as trivially installable
    #[arg(long)]
    pub(crate) trivial_install: bool,
    /// Reference year for age arithmetic (defaults to the current year)
    #[arg(long)]
    pub(crate) current_year: Option<i32>,
    /// Category reference CSV used to resolve the category defaults
    #[arg(long)]
    pub(crate) categories_csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Reference year for age arithmetic (defaults to the current year)
    #[arg(long)]
    pub(crate) year: Option<i32>,
    /// Category reference CSV to seed the catalog (curated defaults otherwise)
    #[arg(long)]
    pub(crate) categories_csv: Option<PathBuf>,
    /// Skip the judge review portion of the demo
    #[arg(long)]
    pub(crate) skip_review: bool,
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let AssessArgs {
        brand,
        category,
        purchase_year,
        floor_level,
        total_spent,
        market_price,
        lifespan_years,
        trivial_install,
        current_year,
        categories_csv,
    } = args;

    let current_year = current_year.unwrap_or_else(|| Local::now().year());
    let reference = match (&categories_csv, category.as_deref()) {
        (Some(path), Some(name)) => {
            let book = CategoryReferenceImporter::from_path(path)?;
            book.resolve(name).cloned()
        }
        _ => None,
    };
    let category = category.unwrap_or_else(|| "unspecified".to_string());
    let defaults = CategoryDefaults {
        category: category.clone(),
        avg_market_price: market_price
            .or(reference.as_ref().map(|r| r.avg_market_price))
            .unwrap_or(FALLBACK_MARKET_PRICE),
        avg_lifespan_years: lifespan_years
            .or(reference.as_ref().map(|r| r.avg_lifespan_years))
            .unwrap_or(FALLBACK_LIFESPAN_YEARS),
        trivial_install: trivial_install
            || reference.as_ref().is_some_and(|r| r.trivial_install),
    };
    let snapshot = ScoringSnapshot {
        brand: brand.clone(),
        current_year,
        purchase_year,
        floor_level: floor_level.unwrap_or(0),
        total_spent: total_spent.unwrap_or(0.0),
        defaults,
    };

    let engine = AmortizationEngine::new(default_scoring_config(), BrandTierTable::standard());
    let breakdown = engine.score(&snapshot);
    let level = display_level(breakdown.total_score, 0);
    let band = ScoreBand::from_level(i32::from(level));

    println!("Viability assessment (nothing persisted)");
    println!("Brand '{brand}' | category '{category}' | reference year {current_year}");
    for component in &breakdown.components {
        println!(
            "  - {}: {} ({})",
            component.factor.label(),
            component.points,
            component.notes
        );
    }
    println!(
        "Total {} -> {} ({})",
        breakdown.total_score,
        breakdown.suggestion.label(),
        breakdown.suggestion.summary()
    );
    println!(
        "Display level {}: {} - {}",
        band.level(),
        band.label(),
        band.description()
    );

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        year,
        categories_csv,
        skip_review,
    } = args;

    let current_year = year.unwrap_or_else(|| Local::now().year());

    println!("Mortify viability demo (reference year {current_year})");

    let book = match categories_csv {
        Some(path) => {
            let book = CategoryReferenceImporter::from_path(&path)?;
            println!(
                "Category data: {} categories imported from {}",
                book.len(),
                path.display()
            );
            book
        }
        None => {
            let book = CategoryBook::new(default_category_rows());
            println!("Category data: {} curated categories", book.len());
            book
        }
    };

    let appliances = Arc::new(InMemoryApplianceRepository::default());
    let sample = sample_appliances();
    for appliance in &sample {
        appliances.seed(appliance.clone());
    }
    let ledger = Arc::new(InMemoryRepairLedger::default());
    for ticket in sample_tickets() {
        ledger.seed(ticket);
    }
    let queue = Arc::new(InMemoryReviewQueue::default());
    let service = mortify::workflows::viability::ViabilityService::new(
        appliances,
        Arc::new(InMemoryCategoryCatalog::new(book)),
        ledger,
        Arc::new(InMemoryAssessmentRepository::default()),
        queue.clone(),
        default_scoring_config(),
    );

    println!("\nScoring {} appliances", sample.len());
    let mut review_target: Option<Assessment> = None;
    for appliance in &sample {
        let assessment =
            match service.run_assessment(&appliance.id, AssessmentInputs::default(), current_year)
            {
                Ok(assessment) => assessment,
                Err(err) => {
                    println!("- {}: scoring unavailable ({err})", appliance.id.0);
                    continue;
                }
            };

        println!(
            "- {} ({} {}): total {} -> {} | level {} {}",
            appliance.id.0,
            appliance.brand,
            appliance.category,
            assessment.total_score,
            assessment.suggestion.label(),
            assessment.display_level(),
            assessment.band().label()
        );
        for component in &assessment.components {
            println!(
                "    {}: {} ({})",
                component.factor.label(),
                component.points,
                component.notes
            );
        }

        if appliance.id.0 == "apl-0002" {
            review_target = Some(assessment);
        }
    }

    if !skip_review {
        if let Some(target) = review_target {
            println!("\nJudge review for {}", target.id.0);
            println!(
                "  Before: status {} | display level {}",
                target.review_status.label(),
                target.display_level()
            );
            match service.review(
                &target.id,
                ExpertReview {
                    status: Some(ReviewStatus::Finalized),
                    note: Some("Compressor swap was the expensive part".to_string()),
                    bonus_points: Some(1),
                },
            ) {
                Ok(reviewed) => println!(
                    "  After: status {} | bonus {} | display level {} {}",
                    reviewed.review_status.label(),
                    reviewed.bonus_points.unwrap_or(0),
                    reviewed.display_level(),
                    reviewed.band().label()
                ),
                Err(err) => println!("  Review unavailable: {err}"),
            }
        }
    }

    let endorsed_id = ApplianceId("apl-0002".to_string());
    println!("\nExpert endorsement for {}", endorsed_id.0);
    match service.set_expert_override(
        &endorsed_id,
        ExpertOverride::endorsed(Some("Sourced a refurbished compressor".to_string())),
    ) {
        Ok(SaveOutcome::Saved { appliance }) => {
            println!(
                "  Saved: endorsed={} note={}",
                appliance.expert_override,
                appliance.expert_note.as_deref().unwrap_or("-")
            );
        }
        Ok(SaveOutcome::Reverted { reason, .. }) => {
            println!("  Save refused, previous state kept: {reason}");
        }
        Err(err) => println!("  Endorsement unavailable: {err}"),
    }

    println!("\nQuick verdicts");
    let mut verdict_ids: Vec<ApplianceId> = sample.iter().map(|a| a.id.clone()).collect();
    verdict_ids.push(ApplianceId("apl-9999".to_string()));
    for id in &verdict_ids {
        match service.quick_verdict(id, current_year) {
            Ok(verdict) => {
                let trust = if verdict.trusted { " [trusted]" } else { "" };
                println!(
                    "- {}: {}{} ({})",
                    id.0,
                    verdict.status.label(),
                    trust,
                    verdict.headline
                );
            }
            Err(err) => println!("- {}: verdict unavailable ({err})", id.0),
        }
    }

    println!("\nDisplay overview for {}", endorsed_id.0);
    match service.viability(&endorsed_id, current_year) {
        Ok(overview) => {
            let source = match overview.source {
                ViabilitySource::Assessment => "stored assessment",
                ViabilitySource::QuickVerdict => "quick verdict",
            };
            println!(
                "  level {} {} via {} ({})",
                overview.level, overview.band.label, source, overview.headline
            );
        }
        Err(err) => println!("  Overview unavailable: {err}"),
    }

    let events = queue.events();
    if events.is_empty() {
        println!("\nJudge queue events: none");
    } else {
        println!("\nJudge queue events");
        for alert in events {
            println!(
                "- template={} -> {} ({})",
                alert.template, alert.assessment_id.0, alert.appliance_id.0
            );
        }
    }

    Ok(())
}
