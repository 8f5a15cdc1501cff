use serde::{Deserialize, Serialize};

use super::domain::Appliance;

/// Service years after which the quick check writes an appliance off.
///
/// Stricter on purpose than the amortization rubric: the quick check runs
/// without spend or category context, so it only speaks up when age alone
/// settles the question.
pub const MAX_SERVICE_YEARS: i32 = 10;

/// Outcome of the zero-persistence quick check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuickVerdictStatus {
    Viable,
    Obsolete,
    Ok,
    Unknown,
}

impl QuickVerdictStatus {
    pub const fn label(self) -> &'static str {
        match self {
            QuickVerdictStatus::Viable => "viable",
            QuickVerdictStatus::Obsolete => "obsolete",
            QuickVerdictStatus::Ok => "ok",
            QuickVerdictStatus::Unknown => "unknown",
        }
    }
}

/// Lightweight verdict rendered directly on appliance detail screens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickVerdict {
    pub status: QuickVerdictStatus,
    pub headline: String,
    pub trusted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expert_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_years: Option<i32>,
}

/// Evaluates the quick check. An expert endorsement beats every age rule;
/// a missing appliance is a valid UNKNOWN answer, not an error.
pub fn evaluate_quick_verdict(appliance: Option<&Appliance>, current_year: i32) -> QuickVerdict {
    let appliance = match appliance {
        Some(appliance) => appliance,
        None => {
            return QuickVerdict {
                status: QuickVerdictStatus::Unknown,
                headline: "No appliance on record".to_string(),
                trusted: false,
                expert_note: None,
                age_years: None,
            }
        }
    };

    let age_years = appliance.purchase_year.map(|year| current_year - year);

    if appliance.expert_override {
        return QuickVerdict {
            status: QuickVerdictStatus::Viable,
            headline: "Expert-Endorsed".to_string(),
            trusted: true,
            expert_note: appliance.expert_note.clone(),
            age_years,
        };
    }

    if let Some(age) = age_years {
        if age > MAX_SERVICE_YEARS {
            return QuickVerdict {
                status: QuickVerdictStatus::Obsolete,
                headline: format!(
                    "{age} years in service, past the {MAX_SERVICE_YEARS}-year mark"
                ),
                trusted: false,
                expert_note: None,
                age_years,
            };
        }
    }

    QuickVerdict {
        status: QuickVerdictStatus::Ok,
        headline: "Worth keeping in service".to_string(),
        trusted: false,
        expert_note: None,
        age_years,
    }
}
