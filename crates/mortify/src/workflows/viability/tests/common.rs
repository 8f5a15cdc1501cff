use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::catalog::CategoryBook;
use crate::workflows::viability::domain::{
    Appliance, ApplianceId, ApplianceUpdate, CategoryDefaults, RepairSpend, RepairTicket,
};
use crate::workflows::viability::repository::{
    AlertError, ApplianceRepository, Assessment, AssessmentId, AssessmentRepository,
    CategoryCatalog, ExpertReview, RepairLedger, RepositoryError, ReviewAlert, ReviewQueue,
};
use crate::workflows::viability::{viability_router, ScoringConfig, ViabilityService};

/// Fixed reference year so age arithmetic stays deterministic in tests.
pub(super) const TEST_YEAR: i32 = 2024;

pub(super) fn scoring_config() -> ScoringConfig {
    ScoringConfig {
        recent_purchase_window_years: 6,
        accessible_floor_limit: 2,
        repair_spend_ratio: 0.5,
        viable_from: 5,
        obsolete_below: 3,
        fallback_market_price: 500.0,
        fallback_lifespan_years: 10,
    }
}

pub(super) fn defaults(category: &str, price: f64, lifespan: u8, trivial: bool) -> CategoryDefaults {
    CategoryDefaults {
        category: category.to_string(),
        avg_market_price: price,
        avg_lifespan_years: lifespan,
        trivial_install: trivial,
    }
}

pub(super) fn lavadora_defaults() -> CategoryDefaults {
    defaults("Lavadora", 600.0, 11, false)
}

pub(super) fn appliance(id: &str) -> Appliance {
    Appliance {
        id: ApplianceId(id.to_string()),
        brand: "MIELE".to_string(),
        category: "Lavadora".to_string(),
        purchase_year: Some(2021),
        initial_value: Some(899.0),
        expert_override: false,
        expert_note: None,
    }
}

pub(super) fn ticket(appliance_id: &str, status: &str, cost: f64) -> RepairTicket {
    RepairTicket {
        appliance_id: ApplianceId(appliance_id.to_string()),
        status: status.to_string(),
        cost,
    }
}

pub(super) type TestService =
    ViabilityService<MemoryAppliances, MemoryCatalog, MemoryLedger, MemoryAssessments, MemoryQueue>;

pub(super) struct Harness {
    pub(super) service: TestService,
    pub(super) appliances: Arc<MemoryAppliances>,
    pub(super) ledger: Arc<MemoryLedger>,
    pub(super) assessments: Arc<MemoryAssessments>,
    pub(super) queue: Arc<MemoryQueue>,
}

pub(super) fn build_service() -> Harness {
    let appliances = Arc::new(MemoryAppliances::default());
    let catalog = Arc::new(MemoryCatalog::with_rows(vec![
        lavadora_defaults(),
        defaults("Frigorifico Combi", 650.0, 12, false),
        defaults("Microondas", 120.0, 8, true),
    ]));
    let ledger = Arc::new(MemoryLedger::default());
    let assessments = Arc::new(MemoryAssessments::default());
    let queue = Arc::new(MemoryQueue::default());

    let service = ViabilityService::new(
        appliances.clone(),
        catalog,
        ledger.clone(),
        assessments.clone(),
        queue.clone(),
        scoring_config(),
    );

    Harness {
        service,
        appliances,
        ledger,
        assessments,
        queue,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAppliances {
    pub(super) records: Arc<Mutex<HashMap<ApplianceId, Appliance>>>,
}

impl MemoryAppliances {
    pub(super) fn seed(&self, appliance: Appliance) {
        let mut guard = self.records.lock().expect("appliance mutex poisoned");
        guard.insert(appliance.id.clone(), appliance);
    }
}

impl ApplianceRepository for MemoryAppliances {
    fn fetch(&self, id: &ApplianceId) -> Result<Option<Appliance>, RepositoryError> {
        let guard = self.records.lock().expect("appliance mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update_fields(
        &self,
        id: &ApplianceId,
        update: ApplianceUpdate,
    ) -> Result<Appliance, RepositoryError> {
        let mut guard = self.records.lock().expect("appliance mutex poisoned");
        let appliance = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        update.apply_to(appliance);
        Ok(appliance.clone())
    }
}

/// Appliance store whose writes always fail, for exercising the revert path.
pub(super) struct ReadOnlyAppliances {
    pub(super) inner: MemoryAppliances,
}

impl ApplianceRepository for ReadOnlyAppliances {
    fn fetch(&self, id: &ApplianceId) -> Result<Option<Appliance>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn update_fields(
        &self,
        _id: &ApplianceId,
        _update: ApplianceUpdate,
    ) -> Result<Appliance, RepositoryError> {
        Err(RepositoryError::Unavailable("store is read only".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryCatalog {
    book: CategoryBook,
}

impl MemoryCatalog {
    pub(super) fn with_rows(rows: Vec<CategoryDefaults>) -> Self {
        Self {
            book: CategoryBook::new(rows),
        }
    }
}

impl CategoryCatalog for MemoryCatalog {
    fn find_defaults(&self, category: &str) -> Result<Option<CategoryDefaults>, RepositoryError> {
        Ok(self.book.resolve(category).cloned())
    }
}

pub(super) struct UnavailableCatalog;

impl CategoryCatalog for UnavailableCatalog {
    fn find_defaults(&self, _category: &str) -> Result<Option<CategoryDefaults>, RepositoryError> {
        Err(RepositoryError::Unavailable("catalog offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryLedger {
    pub(super) tickets: Arc<Mutex<Vec<RepairTicket>>>,
}

impl MemoryLedger {
    pub(super) fn seed(&self, ticket: RepairTicket) {
        let mut guard = self.tickets.lock().expect("ledger mutex poisoned");
        guard.push(ticket);
    }
}

impl RepairLedger for MemoryLedger {
    fn settled_spend(&self, appliance: &ApplianceId) -> Result<RepairSpend, RepositoryError> {
        let guard = self.tickets.lock().expect("ledger mutex poisoned");
        Ok(RepairSpend::from_tickets(appliance, guard.iter()))
    }
}

pub(super) struct FailingLedger;

impl RepairLedger for FailingLedger {
    fn settled_spend(&self, _appliance: &ApplianceId) -> Result<RepairSpend, RepositoryError> {
        Err(RepositoryError::Unavailable("ledger offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAssessments {
    pub(super) records: Arc<Mutex<Vec<Assessment>>>,
}

impl AssessmentRepository for MemoryAssessments {
    fn insert(&self, assessment: Assessment) -> Result<Assessment, RepositoryError> {
        let mut guard = self.records.lock().expect("assessment mutex poisoned");
        if guard.iter().any(|existing| existing.id == assessment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(assessment.clone());
        Ok(assessment)
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        let guard = self.records.lock().expect("assessment mutex poisoned");
        Ok(guard.iter().find(|existing| &existing.id == id).cloned())
    }

    fn list_for(&self, appliance: &ApplianceId) -> Result<Vec<Assessment>, RepositoryError> {
        let guard = self.records.lock().expect("assessment mutex poisoned");
        let mut matching: Vec<Assessment> = guard
            .iter()
            .filter(|existing| &existing.appliance_id == appliance)
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.0.cmp(&a.id.0))
        });
        Ok(matching)
    }

    fn latest_for(&self, appliance: &ApplianceId) -> Result<Option<Assessment>, RepositoryError> {
        Ok(self.list_for(appliance)?.into_iter().next())
    }

    fn apply_review(
        &self,
        id: &AssessmentId,
        review: ExpertReview,
    ) -> Result<Assessment, RepositoryError> {
        let mut guard = self.records.lock().expect("assessment mutex poisoned");
        let assessment = guard
            .iter_mut()
            .find(|existing| &existing.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if let Some(status) = review.status {
            assessment.review_status = status;
        }
        if let Some(note) = review.note {
            assessment.expert_note = Some(note);
        }
        if let Some(bonus) = review.bonus_points {
            assessment.bonus_points = Some(bonus);
        }
        Ok(assessment.clone())
    }
}

/// Store that rejects every insert as a duplicate.
pub(super) struct ConflictAssessments;

impl AssessmentRepository for ConflictAssessments {
    fn insert(&self, _assessment: Assessment) -> Result<Assessment, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        Ok(None)
    }

    fn list_for(&self, _appliance: &ApplianceId) -> Result<Vec<Assessment>, RepositoryError> {
        Ok(Vec::new())
    }

    fn latest_for(&self, _appliance: &ApplianceId) -> Result<Option<Assessment>, RepositoryError> {
        Ok(None)
    }

    fn apply_review(
        &self,
        _id: &AssessmentId,
        _review: ExpertReview,
    ) -> Result<Assessment, RepositoryError> {
        Err(RepositoryError::NotFound)
    }
}

pub(super) struct UnavailableAssessments;

impl AssessmentRepository for UnavailableAssessments {
    fn insert(&self, _assessment: Assessment) -> Result<Assessment, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &AssessmentId) -> Result<Option<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_for(&self, _appliance: &ApplianceId) -> Result<Vec<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn latest_for(&self, _appliance: &ApplianceId) -> Result<Option<Assessment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn apply_review(
        &self,
        _id: &AssessmentId,
        _review: ExpertReview,
    ) -> Result<Assessment, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryQueue {
    events: Arc<Mutex<Vec<ReviewAlert>>>,
}

impl MemoryQueue {
    pub(super) fn events(&self) -> Vec<ReviewAlert> {
        self.events.lock().expect("queue mutex poisoned").clone()
    }
}

impl ReviewQueue for MemoryQueue {
    fn publish(&self, alert: ReviewAlert) -> Result<(), AlertError> {
        self.events.lock().expect("queue mutex poisoned").push(alert);
        Ok(())
    }
}

pub(super) struct FailingQueue;

impl ReviewQueue for FailingQueue {
    fn publish(&self, _alert: ReviewAlert) -> Result<(), AlertError> {
        Err(AlertError::Transport("queue offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn viability_router_with_service(service: TestService) -> axum::Router {
    viability_router(Arc::new(service))
}
