//! Group configuration: the contribution rules every member of a tontine follows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Rules of a rotating savings group.
///
/// Contributions accrue daily from `start_date` (inclusive). `rotation_days`
/// only drives the payout calendar; the ledger itself is daily.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupConfig {
    pub id: Uuid,
    pub name: String,
    pub contribution_amount: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_fee: Option<Amount>,
    pub penalty_per_day: Amount,
    pub start_date: NaiveDate,
    pub rotation_days: u32,
    #[serde(default)]
    pub pot_amount: Amount,
    #[serde(default = "GroupConfig::default_currency")]
    pub currency: String,
}

impl GroupConfig {
    pub fn new(
        name: impl Into<String>,
        contribution_amount: Amount,
        penalty_per_day: Amount,
        start_date: NaiveDate,
        rotation_days: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            contribution_amount,
            admin_fee: None,
            penalty_per_day,
            start_date,
            rotation_days,
            pot_amount: 0,
            currency: Self::default_currency(),
        }
    }

    pub fn with_admin_fee(mut self, admin_fee: Amount) -> Self {
        self.admin_fee = Some(admin_fee);
        self
    }

    /// Admin fee charged per day, zero when the group has none.
    pub fn admin_fee(&self) -> Amount {
        self.admin_fee.unwrap_or(0)
    }

    /// Full amount a member owes for one day with no penalty: contribution plus fee.
    pub fn daily_due(&self) -> Amount {
        self.contribution_amount + self.admin_fee()
    }

    pub fn default_currency() -> String {
        "F".into()
    }
}

impl Identifiable for GroupConfig {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for GroupConfig {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for GroupConfig {
    fn display_label(&self) -> String {
        format!(
            "{} ({}/day, every {} days)",
            self.name,
            format_amount(self.contribution_amount, &self.currency),
            self.rotation_days
        )
    }
}
