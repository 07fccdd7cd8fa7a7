//! Urgency tiers shared by policy lookups and the prediction engine.

use serde::{Deserialize, Serialize};

/// Coarse classification of imminent-stockout risk.
///
/// Variants are declared from most to least urgent, so the derived `Ord`
/// sorts critical items first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UrgencyLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl UrgencyLevel {
    pub const ALL: [UrgencyLevel; 4] = [Self::Critical, Self::High, Self::Medium, Self::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Critical => "CRITICAL",
            UrgencyLevel::High => "HIGH",
            UrgencyLevel::Medium => "MEDIUM",
            UrgencyLevel::Low => "LOW",
        }
    }

    /// Tiers where there is enough runway to follow the supplier's own ordering rhythm.
    pub fn allows_cadence_planning(&self) -> bool {
        matches!(self, UrgencyLevel::Medium | UrgencyLevel::Low)
    }
}

impl core::fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
