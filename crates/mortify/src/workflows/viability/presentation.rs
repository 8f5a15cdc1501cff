use serde::Serialize;

use super::verdict::QuickVerdictStatus;

/// Display band shown to operators, lowest to highest confidence in repair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    DeadZone,
    MoneyPit,
    Borderline,
    Serviceable,
    SolidBet,
    MasterInvestment,
}

impl ScoreBand {
    pub const fn level(self) -> u8 {
        match self {
            ScoreBand::DeadZone => 1,
            ScoreBand::MoneyPit => 2,
            ScoreBand::Borderline => 3,
            ScoreBand::Serviceable => 4,
            ScoreBand::SolidBet => 5,
            ScoreBand::MasterInvestment => 6,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ScoreBand::DeadZone => "Dead Zone",
            ScoreBand::MoneyPit => "Money Pit",
            ScoreBand::Borderline => "Borderline",
            ScoreBand::Serviceable => "Serviceable",
            ScoreBand::SolidBet => "Solid Bet",
            ScoreBand::MasterInvestment => "Master Investment",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            ScoreBand::DeadZone => "#7f1d1d",
            ScoreBand::MoneyPit => "#dc2626",
            ScoreBand::Borderline => "#f97316",
            ScoreBand::Serviceable => "#facc15",
            ScoreBand::SolidBet => "#84cc16",
            ScoreBand::MasterInvestment => "#16a34a",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            ScoreBand::DeadZone => "Past salvage; budget for replacement",
            ScoreBand::MoneyPit => "Repair money sinks faster than value returns",
            ScoreBand::Borderline => "Too close to call without an expert look",
            ScoreBand::Serviceable => "Reasonable to repair while parts stay cheap",
            ScoreBand::SolidBet => "Repair comfortably beats replacement",
            ScoreBand::MasterInvestment => "Premium build with plenty of life left",
        }
    }

    /// Maps an arbitrary level onto the scale; out-of-range input clamps to
    /// the nearest band rather than erroring.
    pub fn from_level(level: i32) -> Self {
        match level {
            i32::MIN..=1 => ScoreBand::DeadZone,
            2 => ScoreBand::MoneyPit,
            3 => ScoreBand::Borderline,
            4 => ScoreBand::Serviceable,
            5 => ScoreBand::SolidBet,
            _ => ScoreBand::MasterInvestment,
        }
    }

    /// Band shown when only a quick verdict is available.
    pub const fn for_quick_verdict(status: QuickVerdictStatus) -> Self {
        match status {
            QuickVerdictStatus::Viable => ScoreBand::MasterInvestment,
            QuickVerdictStatus::Ok => ScoreBand::Serviceable,
            QuickVerdictStatus::Unknown => ScoreBand::Borderline,
            QuickVerdictStatus::Obsolete => ScoreBand::DeadZone,
        }
    }

    pub fn view(self) -> BandView {
        BandView {
            level: self.level(),
            label: self.label(),
            color: self.color(),
            description: self.description(),
        }
    }
}

/// Squeezes a stored total plus any review bonus onto the display scale.
/// The stored total itself never changes; only the rendering clamps.
pub fn display_level(total_score: u8, bonus_points: u8) -> u8 {
    total_score.saturating_add(bonus_points).clamp(1, 6)
}

/// Wire shape for one band, ready for dashboard rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BandView {
    pub level: u8,
    pub label: &'static str,
    pub color: &'static str,
    pub description: &'static str,
}
