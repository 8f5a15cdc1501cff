use serde::{Deserialize, Serialize};

/// Identifier assigned to an appliance by the surrounding product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplianceId(pub String);

/// Appliance record as registered in the field-service product.
///
/// Ownership of the record stays with the product; the judge only reads it
/// and, through the expert-override save path, flips the endorsement fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appliance {
    pub id: ApplianceId,
    pub brand: String,
    pub category: String,
    pub purchase_year: Option<i32>,
    pub initial_value: Option<f64>,
    #[serde(default)]
    pub expert_override: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expert_note: Option<String>,
}

/// Brand input tagged by where the caller got it from.
///
/// Both shapes score identically; the tag exists so auditing can tell a
/// catalog pick from a free-typed name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BrandSelection {
    Existing { id: String, name: String },
    New { name: String },
}

impl BrandSelection {
    pub fn name(&self) -> &str {
        match self {
            Self::Existing { name, .. } | Self::New { name } => name,
        }
    }
}

/// Reference data for one appliance category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDefaults {
    pub category: String,
    pub avg_market_price: f64,
    pub avg_lifespan_years: u8,
    pub trivial_install: bool,
}

/// Expert endorsement state applied to an appliance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertOverride {
    pub endorsed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ExpertOverride {
    pub fn endorsed(note: Option<String>) -> Self {
        Self {
            endorsed: true,
            note,
        }
    }

    pub fn cleared() -> Self {
        Self {
            endorsed: false,
            note: None,
        }
    }

    /// A note never outlives the endorsement it annotates.
    pub fn normalized(self) -> Self {
        if self.endorsed {
            self
        } else {
            Self::cleared()
        }
    }
}

/// Field-level update for a stored appliance; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplianceUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expert_override: Option<ExpertOverride>,
}

impl ApplianceUpdate {
    pub fn apply_to(&self, appliance: &mut Appliance) {
        if let Some(year) = self.purchase_year {
            appliance.purchase_year = Some(year);
        }
        if let Some(value) = self.initial_value {
            appliance.initial_value = Some(value);
        }
        if let Some(endorsement) = &self.expert_override {
            let endorsement = endorsement.clone().normalized();
            appliance.expert_override = endorsement.endorsed;
            appliance.expert_note = endorsement.note;
        }
    }
}

/// Result of an appliance save: either the committed state or an explicit
/// revert to the last known-good record with the failure reason attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SaveOutcome {
    Saved { appliance: Appliance },
    Reverted { appliance: Appliance, reason: String },
}

/// Review lifecycle of a persisted assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    PendingJudge,
    Finalized,
}

impl ReviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ReviewStatus::PendingJudge => "pending_judge",
            ReviewStatus::Finalized => "finalized",
        }
    }
}

/// Ticket statuses that count as settled repair spend.
pub const SETTLED_TICKET_STATUSES: [&str; 2] = ["finalizado", "pagado"];

pub fn is_settled_status(status: &str) -> bool {
    SETTLED_TICKET_STATUSES
        .iter()
        .any(|settled| status.trim().eq_ignore_ascii_case(settled))
}

/// Slice of a repair ticket consumed when aggregating historical spend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairTicket {
    pub appliance_id: ApplianceId,
    pub status: String,
    pub cost: f64,
}

/// Settled repair spend for one appliance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RepairSpend {
    pub total: f64,
    pub settled_tickets: u32,
}

impl RepairSpend {
    pub fn from_tickets<'a, I>(appliance: &ApplianceId, tickets: I) -> Self
    where
        I: IntoIterator<Item = &'a RepairTicket>,
    {
        let mut spend = Self::default();
        for ticket in tickets {
            if &ticket.appliance_id == appliance && is_settled_status(&ticket.status) {
                spend.total += ticket.cost;
                spend.settled_tickets += 1;
            }
        }
        spend
    }
}
