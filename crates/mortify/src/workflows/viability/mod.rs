//! Appliance repair-viability scoring and the judge review pipeline.
//!
//! Scoring walks a fixed path: resolve inputs into a snapshot, run the
//! amortization rubric, persist the run as a pending assessment, and announce
//! it for judge review. The quick verdict path answers without persisting
//! anything, and presentation maps both onto one display scale.

pub mod brands;
pub mod domain;
pub mod numeric;
pub mod presentation;
pub mod repository;
pub mod router;
pub(crate) mod scoring;
pub mod service;
pub mod verdict;

#[cfg(test)]
mod tests;

pub use brands::{BrandTier, BrandTierTable};
pub use domain::{
    is_settled_status, Appliance, ApplianceId, ApplianceUpdate, BrandSelection, CategoryDefaults,
    ExpertOverride, RepairSpend, RepairTicket, ReviewStatus, SaveOutcome, SETTLED_TICKET_STATUSES,
};
pub use presentation::{display_level, BandView, ScoreBand};
pub use repository::{
    AlertError, ApplianceRepository, Assessment, AssessmentBasis, AssessmentId,
    AssessmentRepository, AssessmentView, CategoryCatalog, ExpertReview, RepairLedger,
    RepositoryError, ReviewAlert, ReviewQueue,
};
pub use router::viability_router;
pub use scoring::{
    AmortizationEngine, ScoreBreakdown, ScoreComponent, ScoreFactor, ScoringConfig,
    ScoringSnapshot, ViabilitySuggestion, FALLBACK_LIFESPAN_YEARS, FALLBACK_MARKET_PRICE,
};
pub use service::{
    AssessmentInputs, ViabilityOverview, ViabilityService, ViabilityServiceError, ViabilitySource,
};
pub use verdict::{evaluate_quick_verdict, QuickVerdict, QuickVerdictStatus, MAX_SERVICE_YEARS};
