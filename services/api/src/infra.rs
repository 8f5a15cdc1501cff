use metrics_exporter_prometheus::PrometheusHandle;
use mortify::workflows::catalog::CategoryBook;
use mortify::workflows::viability::{
    AlertError, Appliance, ApplianceId, ApplianceRepository, ApplianceUpdate, Assessment,
    AssessmentId, AssessmentRepository, CategoryCatalog, CategoryDefaults, ExpertReview,
    RepairLedger, RepairSpend, RepairTicket, RepositoryError, ReviewAlert, ReviewQueue,
    ScoringConfig,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryApplianceRepository {
    records: Arc<Mutex<HashMap<ApplianceId, Appliance>>>,
}

impl InMemoryApplianceRepository {
    pub(crate) fn seed(&self, appliance: Appliance) {
        let mut guard = self.records.lock().expect("appliance mutex poisoned");
        guard.insert(appliance.id.clone(), appliance);
    }
}

impl ApplianceRepository for InMemoryApplianceRepository {
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

#[derive(Default, Clone)]
pub(crate) struct InMemoryCategoryCatalog {
    book: Arc<CategoryBook>,
}

impl InMemoryCategoryCatalog {
    pub(crate) fn new(book: CategoryBook) -> Self {
        Self {
            book: Arc::new(book),
        }
    }
}

impl CategoryCatalog for InMemoryCategoryCatalog {
    fn find_defaults(&self, category: &str) -> Result<Option<CategoryDefaults>, RepositoryError> {
        Ok(self.book.resolve(category).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryRepairLedger {
    tickets: Arc<Mutex<Vec<RepairTicket>>>,
}

impl InMemoryRepairLedger {
    pub(crate) fn seed(&self, ticket: RepairTicket) {
        let mut guard = self.tickets.lock().expect("ledger mutex poisoned");
        guard.push(ticket);
    }
}

impl RepairLedger for InMemoryRepairLedger {
    fn settled_spend(&self, appliance: &ApplianceId) -> Result<RepairSpend, RepositoryError> {
        let guard = self.tickets.lock().expect("ledger mutex poisoned");
        Ok(RepairSpend::from_tickets(appliance, guard.iter()))
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    records: Arc<Mutex<Vec<Assessment>>>,
}

impl AssessmentRepository for InMemoryAssessmentRepository {
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

#[derive(Default, Clone)]
pub(crate) struct InMemoryReviewQueue {
    events: Arc<Mutex<Vec<ReviewAlert>>>,
}

impl ReviewQueue for InMemoryReviewQueue {
    fn publish(&self, alert: ReviewAlert) -> Result<(), AlertError> {
        let mut guard = self.events.lock().expect("queue mutex poisoned");
        guard.push(alert);
        Ok(())
    }
}

impl InMemoryReviewQueue {
    pub(crate) fn events(&self) -> Vec<ReviewAlert> {
        self.events.lock().expect("queue mutex poisoned").clone()
    }
}

pub(crate) fn default_scoring_config() -> ScoringConfig {
    ScoringConfig::default()
}

/// Curated category rows used when no reference CSV is supplied.
pub(crate) fn default_category_rows() -> Vec<CategoryDefaults> {
    fn row(category: &str, price: f64, lifespan: u8, trivial: bool) -> CategoryDefaults {
        CategoryDefaults {
            category: category.to_string(),
            avg_market_price: price,
            avg_lifespan_years: lifespan,
            trivial_install: trivial,
        }
    }

    vec![
        row("Lavadora", 450.0, 11, false),
        row("Lavavajillas", 420.0, 10, false),
        row("Frigorifico Combi", 650.0, 12, false),
        row("Congelador", 540.0, 12, false),
        row("Horno", 400.0, 13, false),
        row("Placa Induccion", 380.0, 10, false),
        row("Microondas", 120.0, 8, true),
        row("Campana Extractora", 210.0, 10, false),
        row("Secadora", 430.0, 11, false),
        row("Termo Electrico", 260.0, 9, false),
        row("Aire Acondicionado Split", 700.0, 10, false),
        row("Aspiradora", 180.0, 7, true),
    ]
}

/// Demonstration appliances so a fresh in-memory service answers real ids.
pub(crate) fn sample_appliances() -> Vec<Appliance> {
    vec![
        Appliance {
            id: ApplianceId("apl-0001".to_string()),
            brand: "Miele".to_string(),
            category: "Lavadora".to_string(),
            purchase_year: Some(2021),
            initial_value: Some(899.0),
            expert_override: false,
            expert_note: None,
        },
        Appliance {
            id: ApplianceId("apl-0002".to_string()),
            brand: "Balay".to_string(),
            category: "Frigorifico Combi".to_string(),
            purchase_year: Some(2012),
            initial_value: Some(520.0),
            expert_override: false,
            expert_note: None,
        },
        Appliance {
            id: ApplianceId("apl-0003".to_string()),
            brand: "Samsung".to_string(),
            category: "Microondas".to_string(),
            purchase_year: Some(2019),
            initial_value: Some(150.0),
            expert_override: false,
            expert_note: None,
        },
        Appliance {
            id: ApplianceId("apl-0004".to_string()),
            brand: "AEG".to_string(),
            category: "Horno".to_string(),
            purchase_year: Some(2009),
            initial_value: Some(430.0),
            expert_override: true,
            expert_note: Some("Commercial-grade oven, parts still stocked".to_string()),
        },
    ]
}

pub(crate) fn sample_tickets() -> Vec<RepairTicket> {
    fn ticket(appliance_id: &str, status: &str, cost: f64) -> RepairTicket {
        RepairTicket {
            appliance_id: ApplianceId(appliance_id.to_string()),
            status: status.to_string(),
            cost,
        }
    }

    vec![
        ticket("apl-0001", "finalizado", 60.0),
        ticket("apl-0002", "finalizado", 140.0),
        ticket("apl-0002", "pagado", 95.0),
        ticket("apl-0002", "abierto", 210.0),
        ticket("apl-0003", "presupuesto", 45.0),
    ]
}
