use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    Appliance, ApplianceId, ApplianceUpdate, CategoryDefaults, RepairSpend, ReviewStatus,
};
use super::presentation::{display_level, BandView, ScoreBand};
use super::scoring::{ScoreComponent, ScoreFactor, ViabilitySuggestion};

/// Identifier assigned to a persisted assessment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

/// Inputs the engine actually scored with, captured for audit.
///
/// Callers race freely; this record is what lets a judge reconstruct which
/// of the racing inputs produced a given total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentBasis {
    pub brand_used: String,
    pub purchase_year_used: Option<i32>,
    pub floor_level_used: i32,
    pub total_spent_used: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repair_count: Option<u32>,
    pub current_year: i32,
}

/// One persisted scoring run.
///
/// Immutable after insert except for the judge-owned review fields; repeated
/// runs append new rows and the newest row wins for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: AssessmentId,
    pub appliance_id: ApplianceId,
    pub basis: AssessmentBasis,
    pub components: Vec<ScoreComponent>,
    pub total_score: u8,
    pub suggestion: ViabilitySuggestion,
    pub review_status: ReviewStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expert_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus_points: Option<u8>,
    pub created_at: DateTime<Utc>,
}

impl Assessment {
    pub fn points_for(&self, factor: ScoreFactor) -> u8 {
        self.components
            .iter()
            .find(|component| component.factor == factor)
            .map(|component| component.points)
            .unwrap_or(0)
    }

    pub fn display_level(&self) -> u8 {
        display_level(self.total_score, self.bonus_points.unwrap_or(0))
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_level(i32::from(self.display_level()))
    }

    pub fn view(&self) -> AssessmentView {
        AssessmentView {
            assessment_id: self.id.clone(),
            appliance_id: self.appliance_id.clone(),
            score_brand: self.points_for(ScoreFactor::Brand),
            score_age: self.points_for(ScoreFactor::Age),
            score_installation: self.points_for(ScoreFactor::Installation),
            score_financial: self.points_for(ScoreFactor::Financial),
            total_score: self.total_score,
            suggestion: self.suggestion,
            review_status: self.review_status,
            display_level: self.display_level(),
            band: self.band().view(),
            expert_note: self.expert_note.clone(),
            bonus_points: self.bonus_points,
            created_at: self.created_at,
        }
    }
}

/// Wire shape of a persisted assessment.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentView {
    pub assessment_id: AssessmentId,
    pub appliance_id: ApplianceId,
    pub score_brand: u8,
    pub score_age: u8,
    pub score_installation: u8,
    pub score_financial: u8,
    pub total_score: u8,
    pub suggestion: ViabilitySuggestion,
    pub review_status: ReviewStatus,
    pub display_level: u8,
    pub band: BandView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expert_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonus_points: Option<u8>,
    pub created_at: DateTime<Utc>,
}

/// Judge mutation limited to the review-owned fields; `None` leaves a field
/// untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpertReview {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReviewStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bonus_points: Option<u8>,
}

/// Read access to appliance records plus the narrow save path the judge owns.
pub trait ApplianceRepository: Send + Sync {
    fn fetch(&self, id: &ApplianceId) -> Result<Option<Appliance>, RepositoryError>;
    fn update_fields(
        &self,
        id: &ApplianceId,
        update: ApplianceUpdate,
    ) -> Result<Appliance, RepositoryError>;
}

/// Category reference-data lookup. Resolution failures are the caller's to
/// absorb; returning `Ok(None)` means the category genuinely has no entry.
pub trait CategoryCatalog: Send + Sync {
    fn find_defaults(&self, category: &str) -> Result<Option<CategoryDefaults>, RepositoryError>;
}

/// Historical repair spend, already filtered to settled tickets.
pub trait RepairLedger: Send + Sync {
    fn settled_spend(&self, appliance: &ApplianceId) -> Result<RepairSpend, RepositoryError>;
}

/// Storage abstraction for assessments so the service can be exercised in
/// isolation.
pub trait AssessmentRepository: Send + Sync {
    fn insert(&self, assessment: Assessment) -> Result<Assessment, RepositoryError>;
    fn fetch(&self, id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError>;
    /// Newest first, by creation time then identifier.
    fn list_for(&self, appliance: &ApplianceId) -> Result<Vec<Assessment>, RepositoryError>;
    fn latest_for(&self, appliance: &ApplianceId) -> Result<Option<Assessment>, RepositoryError>;
    fn apply_review(
        &self,
        id: &AssessmentId,
        review: ExpertReview,
    ) -> Result<Assessment, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook announcing freshly stored assessments to the judge queue.
pub trait ReviewQueue: Send + Sync {
    fn publish(&self, alert: ReviewAlert) -> Result<(), AlertError>;
}

/// Queue payload so routes and tests can assert the integration boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAlert {
    pub template: String,
    pub assessment_id: AssessmentId,
    pub appliance_id: ApplianceId,
    pub details: BTreeMap<String, String>,
}

/// Alert dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum AlertError {
    #[error("alert transport unavailable: {0}")]
    Transport(String),
}
