//! Daily attendance records: what a member paid on a given calendar day.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Payment record for one member on one day. At most one exists per `(member_id, date)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub member_id: Uuid,
    #[serde(with = "day")]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub amount_paid: Amount,
    #[serde(default)]
    pub penalty_paid: Amount,
    #[serde(default)]
    pub fee_paid: Amount,
}

impl AttendanceRecord {
    pub fn new(member_id: Uuid, date: NaiveDate, status: AttendanceStatus) -> Self {
        Self {
            id: Uuid::new_v4(),
            member_id,
            date,
            status,
            amount_paid: 0,
            penalty_paid: 0,
            fee_paid: 0,
        }
    }

    pub fn with_payments(
        mut self,
        amount_paid: Amount,
        penalty_paid: Amount,
        fee_paid: Amount,
    ) -> Self {
        self.amount_paid = amount_paid;
        self.penalty_paid = penalty_paid;
        self.fee_paid = fee_paid;
        self
    }

    /// Contribution and fee amounts only count once the day is marked paid or late.
    pub fn counts_as_contribution(&self) -> bool {
        self.status.counts_as_contribution()
    }

    pub fn total_paid(&self) -> Amount {
        self.amount_paid + self.penalty_paid + self.fee_paid
    }
}

impl Identifiable for AttendanceRecord {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Displayable for AttendanceRecord {
    fn display_label(&self) -> String {
        format!("{} [{}]", self.date, self.status)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Paid,
    Late,
    Pending,
}

impl AttendanceStatus {
    pub fn counts_as_contribution(self) -> bool {
        matches!(self, AttendanceStatus::Paid | AttendanceStatus::Late)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AttendanceStatus::Paid => "Paid",
            AttendanceStatus::Late => "Late",
            AttendanceStatus::Pending => "Pending",
        };
        f.write_str(label)
    }
}

/// Reads a calendar day from either `YYYY-MM-DD` or a full timestamp, keeping only the date part.
mod day {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let day = raw.split('T').next().unwrap_or_default().trim();
        NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(D::Error::custom)
    }
}
