use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::brands::BrandTierTable;
use super::domain::{ApplianceId, ApplianceUpdate, BrandSelection, ExpertOverride, ReviewStatus, SaveOutcome};
use super::presentation::{BandView, ScoreBand};
use super::repository::{
    ApplianceRepository, Assessment, AssessmentBasis, AssessmentId, AssessmentRepository,
    AssessmentView, CategoryCatalog, ExpertReview, RepairLedger, RepositoryError, ReviewAlert,
    ReviewQueue,
};
use super::scoring::{AmortizationEngine, ScoringConfig, ScoringSnapshot};
use super::verdict::{evaluate_quick_verdict, QuickVerdict};

/// Caller-supplied inputs for one scoring run; everything is optional and
/// falls back to stored appliance fields, ledger history, or defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentInputs {
    pub input_year: Option<i32>,
    pub input_floor_level: Option<i32>,
    pub total_spent_override: Option<f64>,
    pub repair_count: Option<u32>,
    pub brand: Option<BrandSelection>,
}

/// Service composing the appliance store, category catalog, repair ledger,
/// assessment store, and judge queue around the amortization engine.
pub struct ViabilityService<P, C, L, A, Q> {
    appliances: Arc<P>,
    catalog: Arc<C>,
    ledger: Arc<L>,
    assessments: Arc<A>,
    review_queue: Arc<Q>,
    engine: Arc<AmortizationEngine>,
}

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("asmt-{id:06}"))
}

impl<P, C, L, A, Q> ViabilityService<P, C, L, A, Q>
where
    P: ApplianceRepository + 'static,
    C: CategoryCatalog + 'static,
    L: RepairLedger + 'static,
    A: AssessmentRepository + 'static,
    Q: ReviewQueue + 'static,
{
    pub fn new(
        appliances: Arc<P>,
        catalog: Arc<C>,
        ledger: Arc<L>,
        assessments: Arc<A>,
        review_queue: Arc<Q>,
        config: ScoringConfig,
    ) -> Self {
        Self::with_brand_table(
            appliances,
            catalog,
            ledger,
            assessments,
            review_queue,
            config,
            BrandTierTable::standard(),
        )
    }

    pub fn with_brand_table(
        appliances: Arc<P>,
        catalog: Arc<C>,
        ledger: Arc<L>,
        assessments: Arc<A>,
        review_queue: Arc<Q>,
        config: ScoringConfig,
        brands: BrandTierTable,
    ) -> Self {
        let engine = Arc::new(AmortizationEngine::new(config, brands));

        Self {
            appliances,
            catalog,
            ledger,
            assessments,
            review_queue,
            engine,
        }
    }

    /// Score an appliance and persist the run as a new assessment.
    ///
    /// The assessment write is the one transactional step; the queue
    /// announcement afterwards is best effort and never undoes the write.
    pub fn run_assessment(
        &self,
        appliance_id: &ApplianceId,
        inputs: AssessmentInputs,
        current_year: i32,
    ) -> Result<Assessment, ViabilityServiceError> {
        let appliance = self
            .appliances
            .fetch(appliance_id)?
            .ok_or_else(|| ViabilityServiceError::ApplianceNotFound(appliance_id.clone()))?;

        let defaults = self.resolve_defaults(&appliance.category);

        let (total_spent, settled_tickets) = match inputs.total_spent_override {
            Some(total) => (total, None),
            None => {
                let spend = self.ledger.settled_spend(appliance_id)?;
                (spend.total, Some(spend.settled_tickets))
            }
        };
        let repair_count = inputs.repair_count.or(settled_tickets);

        let brand = inputs
            .brand
            .as_ref()
            .map(|selection| selection.name().to_string())
            .unwrap_or_else(|| appliance.brand.clone());
        let purchase_year = inputs.input_year.or(appliance.purchase_year);
        let floor_level = inputs.input_floor_level.unwrap_or(0);

        let snapshot = ScoringSnapshot {
            brand,
            current_year,
            purchase_year,
            floor_level,
            total_spent,
            defaults,
        };
        let breakdown = self.engine.score(&snapshot);

        let assessment = Assessment {
            id: next_assessment_id(),
            appliance_id: appliance_id.clone(),
            basis: AssessmentBasis {
                brand_used: snapshot.brand,
                purchase_year_used: snapshot.purchase_year,
                floor_level_used: snapshot.floor_level,
                total_spent_used: snapshot.total_spent,
                repair_count,
                current_year,
            },
            components: breakdown.components,
            total_score: breakdown.total_score,
            suggestion: breakdown.suggestion,
            review_status: ReviewStatus::PendingJudge,
            expert_note: None,
            bonus_points: None,
            created_at: Utc::now(),
        };

        let stored = self.assessments.insert(assessment)?;
        info!(
            appliance = %stored.appliance_id.0,
            total = stored.total_score,
            suggestion = stored.suggestion.label(),
            "assessment stored for judge review"
        );

        let mut details = BTreeMap::new();
        details.insert(
            "suggestion".to_string(),
            stored.suggestion.label().to_string(),
        );
        details.insert("total_score".to_string(), stored.total_score.to_string());
        let alert = ReviewAlert {
            template: "assessment_pending_judge".to_string(),
            assessment_id: stored.id.clone(),
            appliance_id: stored.appliance_id.clone(),
            details,
        };
        if let Err(error) = self.review_queue.publish(alert) {
            warn!(assessment = %stored.id.0, %error, "judge queue announcement failed");
        }

        Ok(stored)
    }

    fn resolve_defaults(&self, category: &str) -> super::domain::CategoryDefaults {
        match self.catalog.find_defaults(category) {
            Ok(Some(defaults)) => defaults,
            Ok(None) => self.engine.config().fallback_defaults(category),
            Err(error) => {
                warn!(category, %error, "category catalog unavailable, scoring with fallback defaults");
                self.engine.config().fallback_defaults(category)
            }
        }
    }

    /// Quick check that touches no assessment storage.
    pub fn quick_verdict(
        &self,
        appliance_id: &ApplianceId,
        current_year: i32,
    ) -> Result<QuickVerdict, ViabilityServiceError> {
        let appliance = self.appliances.fetch(appliance_id)?;
        Ok(evaluate_quick_verdict(appliance.as_ref(), current_year))
    }

    /// Assessment history for an appliance, newest first.
    pub fn assessments(
        &self,
        appliance_id: &ApplianceId,
    ) -> Result<Vec<Assessment>, ViabilityServiceError> {
        Ok(self.assessments.list_for(appliance_id)?)
    }

    /// Apply a judge review to a stored assessment.
    pub fn review(
        &self,
        assessment_id: &AssessmentId,
        review: ExpertReview,
    ) -> Result<Assessment, ViabilityServiceError> {
        Ok(self.assessments.apply_review(assessment_id, review)?)
    }

    /// Display overview: the latest assessment when one exists, the quick
    /// verdict otherwise.
    pub fn viability(
        &self,
        appliance_id: &ApplianceId,
        current_year: i32,
    ) -> Result<ViabilityOverview, ViabilityServiceError> {
        if let Some(latest) = self.assessments.latest_for(appliance_id)? {
            return Ok(ViabilityOverview {
                appliance_id: appliance_id.clone(),
                source: ViabilitySource::Assessment,
                level: latest.display_level(),
                band: latest.band().view(),
                headline: latest.suggestion.summary(),
                assessment: Some(latest.view()),
                verdict: None,
            });
        }

        let verdict = self.quick_verdict(appliance_id, current_year)?;
        let band = ScoreBand::for_quick_verdict(verdict.status);
        Ok(ViabilityOverview {
            appliance_id: appliance_id.clone(),
            source: ViabilitySource::QuickVerdict,
            level: band.level(),
            band: band.view(),
            headline: verdict.headline.clone(),
            assessment: None,
            verdict: Some(verdict),
        })
    }

    /// Flip the expert endorsement through the explicit save transition.
    ///
    /// A store refusal is not an error to the caller: the previous state is
    /// handed back as an explicit revert with the refusal attached.
    pub fn set_expert_override(
        &self,
        appliance_id: &ApplianceId,
        endorsement: ExpertOverride,
    ) -> Result<SaveOutcome, ViabilityServiceError> {
        let current = self
            .appliances
            .fetch(appliance_id)?
            .ok_or_else(|| ViabilityServiceError::ApplianceNotFound(appliance_id.clone()))?;

        let update = ApplianceUpdate {
            expert_override: Some(endorsement.normalized()),
            ..ApplianceUpdate::default()
        };

        match self.appliances.update_fields(appliance_id, update) {
            Ok(appliance) => Ok(SaveOutcome::Saved { appliance }),
            Err(RepositoryError::NotFound) => Err(RepositoryError::NotFound.into()),
            Err(error) => Ok(SaveOutcome::Reverted {
                appliance: current,
                reason: error.to_string(),
            }),
        }
    }
}

/// Where an overview's level came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViabilitySource {
    Assessment,
    QuickVerdict,
}

/// Merged display payload for appliance detail screens.
#[derive(Debug, Clone, Serialize)]
pub struct ViabilityOverview {
    pub appliance_id: ApplianceId,
    pub source: ViabilitySource,
    pub level: u8,
    pub band: BandView,
    pub headline: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<AssessmentView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<QuickVerdict>,
}

/// Error raised by the viability service.
#[derive(Debug, thiserror::Error)]
pub enum ViabilityServiceError {
    #[error("appliance not found")]
    ApplianceNotFound(ApplianceId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
