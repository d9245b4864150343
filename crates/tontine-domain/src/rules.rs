//! Tunable thresholds of the ledger calculator.

use serde::{Deserialize, Serialize};

/// Thresholds applied when deriving member status and simulating payments.
///
/// `Default` yields the production rules: a day becomes penalty-eligible at
/// 20:00 UTC, members go on alert after 4 late days and are excluded after
/// 12, and payment simulations walk at most 730 days.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerRules {
    #[serde(default = "LedgerRules::default_due_cutoff_hour")]
    pub due_cutoff_hour: u32,
    #[serde(default = "LedgerRules::default_alert_after_days")]
    pub alert_after_days: i64,
    #[serde(default = "LedgerRules::default_exclusion_after_days")]
    pub exclusion_after_days: i64,
    #[serde(default = "LedgerRules::default_simulation_day_limit")]
    pub simulation_day_limit: u32,
}

impl LedgerRules {
    pub fn default_due_cutoff_hour() -> u32 {
        20
    }

    pub fn default_alert_after_days() -> i64 {
        4
    }

    pub fn default_exclusion_after_days() -> i64 {
        12
    }

    pub fn default_simulation_day_limit() -> u32 {
        365 * 2
    }
}

impl Default for LedgerRules {
    fn default() -> Self {
        Self {
            due_cutoff_hour: Self::default_due_cutoff_hour(),
            alert_after_days: Self::default_alert_after_days(),
            exclusion_after_days: Self::default_exclusion_after_days(),
            simulation_day_limit: Self::default_simulation_day_limit(),
        }
    }
}
