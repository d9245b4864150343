//! Group members and their membership lifecycle.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Member {
    pub id: Uuid,
    pub group_id: Uuid,
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    pub join_date: NaiveDate,
    pub status: MemberStatus,
    /// Credit carried forward from overpayments.
    #[serde(default)]
    pub wallet_balance: Amount,
}

impl Member {
    pub fn new(group_id: Uuid, full_name: impl Into<String>, join_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id,
            full_name: full_name.into(),
            phone: String::new(),
            join_date,
            status: MemberStatus::Active,
            wallet_balance: 0,
        }
    }

    /// Archived members stay on record but no longer take part in the rotation.
    pub fn is_archived(&self) -> bool {
        matches!(self.status, MemberStatus::Archived)
    }

    /// Returns `true` when the member should receive a payout slot.
    pub fn is_in_rotation(&self) -> bool {
        !matches!(self.status, MemberStatus::Archived | MemberStatus::Excluded)
    }
}

impl Identifiable for Member {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Member {
    fn name(&self) -> &str {
        &self.full_name
    }
}

impl Displayable for Member {
    fn display_label(&self) -> String {
        format!("{} [{}]", self.full_name, self.status)
    }
}

/// Membership state. `Alert` keeps its historical wire name `ALERT_8J`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    #[default]
    Active,
    #[serde(rename = "ALERT_8J", alias = "ALERT")]
    Alert,
    Excluded,
    Completed,
    Archived,
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MemberStatus::Active => "Active",
            MemberStatus::Alert => "Alert",
            MemberStatus::Excluded => "Excluded",
            MemberStatus::Completed => "Completed",
            MemberStatus::Archived => "Archived",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_status_uses_legacy_wire_name() {
        let encoded = serde_json::to_string(&MemberStatus::Alert).unwrap();
        assert_eq!(encoded, "\"ALERT_8J\"");
        let decoded: MemberStatus = serde_json::from_str("\"ALERT\"").unwrap();
        assert_eq!(decoded, MemberStatus::Alert);
        let decoded: MemberStatus = serde_json::from_str("\"EXCLUDED\"").unwrap();
        assert_eq!(decoded, MemberStatus::Excluded);
    }

    #[test]
    fn excluded_and_archived_members_leave_rotation() {
        let join = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let mut member = Member::new(Uuid::new_v4(), "Awa", join);
        assert!(member.is_in_rotation());
        member.status = MemberStatus::Excluded;
        assert!(!member.is_in_rotation());
        assert!(!member.is_archived());
        member.status = MemberStatus::Archived;
        assert!(member.is_archived());
    }
}
