//! Pot distributions: the rotation of who collects the pot and when.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PotDistribution {
    pub id: Uuid,
    pub group_id: Uuid,
    pub member_id: Uuid,
    pub distribution_date: NaiveDate,
    pub amount: Amount,
    pub status: PayoutStatus,
}

impl PotDistribution {
    pub fn new(
        group_id: Uuid,
        member_id: Uuid,
        distribution_date: NaiveDate,
        amount: Amount,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id,
            member_id,
            distribution_date,
            amount,
            status: PayoutStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, PayoutStatus::Pending)
    }
}

impl Identifiable for PotDistribution {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for PotDistribution {
    fn display_label(&self) -> String {
        format!("pot:{} {} [{}]", self.id, self.distribution_date, self.status)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PayoutStatus {
    #[default]
    Pending,
    Completed,
}

impl fmt::Display for PayoutStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PayoutStatus::Pending => "Pending",
            PayoutStatus::Completed => "Completed",
        };
        f.write_str(label)
    }
}
