use serde::{Deserialize, Serialize};

use super::config::ScoringConfig;

/// Suggested disposition for a scored appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViabilitySuggestion {
    Viable,
    Doubtful,
    Obsolete,
}

impl ViabilitySuggestion {
    pub const fn label(self) -> &'static str {
        match self {
            ViabilitySuggestion::Viable => "viable",
            ViabilitySuggestion::Doubtful => "doubtful",
            ViabilitySuggestion::Obsolete => "obsolete",
        }
    }

    pub fn summary(&self) -> String {
        match self {
            ViabilitySuggestion::Viable => "repair is worth the money".to_string(),
            ViabilitySuggestion::Doubtful => "repair value unclear, judge call".to_string(),
            ViabilitySuggestion::Obsolete => "replacement beats repair".to_string(),
        }
    }
}

/// Classification depends on the raw total alone; callers racing each other
/// over the same appliance get consistent answers for equal inputs.
pub(crate) fn suggest_outcome(total_score: u8, config: &ScoringConfig) -> ViabilitySuggestion {
    if total_score >= config.viable_from {
        return ViabilitySuggestion::Viable;
    }
    if total_score < config.obsolete_below {
        return ViabilitySuggestion::Obsolete;
    }
    ViabilitySuggestion::Doubtful
}
