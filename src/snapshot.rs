//! JSON snapshot of one or more tontine groups.
//!
//! The calculator never reads storage itself; a snapshot is the in-memory
//! copy of everything it needs, loaded from and written back to a single file.

use std::{collections::HashSet, fs, path::Path};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use tontine_core::{validate_group, CoreError, Settlement};
use tontine_domain::{AttendanceRecord, GroupConfig, Member, PotDistribution};

use crate::errors::TontineError;

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "Snapshot::default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub attendances: Vec<AttendanceRecord>,
    #[serde(default)]
    pub payouts: Vec<PotDistribution>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            groups: Vec::new(),
            members: Vec::new(),
            attendances: Vec::new(),
            payouts: Vec::new(),
        }
    }
}

impl Snapshot {
    fn default_schema_version() -> u32 {
        SNAPSHOT_SCHEMA_VERSION
    }

    /// Loads and validates a snapshot file.
    pub fn load(path: &Path) -> Result<Self, TontineError> {
        let data = fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&data)?;
        snapshot.validate()?;
        tracing::debug!(
            path = %path.display(),
            groups = snapshot.groups.len(),
            members = snapshot.members.len(),
            attendances = snapshot.attendances.len(),
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    /// Writes the snapshot to disk atomically by staging to a temporary file.
    pub fn save(&self, path: &Path) -> Result<(), TontineError> {
        let tmp = path.with_extension("tmp");
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Checks group rules and that every record points at a known group or member.
    pub fn validate(&self) -> Result<(), TontineError> {
        if self.schema_version > SNAPSHOT_SCHEMA_VERSION {
            return Err(TontineError::UnsupportedSchema(self.schema_version));
        }
        for group in &self.groups {
            validate_group(group)?;
        }

        let group_ids: HashSet<Uuid> = self.groups.iter().map(|group| group.id).collect();
        let member_ids: HashSet<Uuid> = self.members.iter().map(|member| member.id).collect();

        if let Some(member) = self
            .members
            .iter()
            .find(|member| !group_ids.contains(&member.group_id))
        {
            return Err(TontineError::InvalidRef(format!(
                "member `{}` belongs to unknown group {}",
                member.full_name, member.group_id
            )));
        }
        if let Some(record) = self
            .attendances
            .iter()
            .find(|record| !member_ids.contains(&record.member_id))
        {
            return Err(TontineError::InvalidRef(format!(
                "attendance {} on {} references unknown member {}",
                record.id, record.date, record.member_id
            )));
        }
        if let Some(pot) = self.payouts.iter().find(|pot| {
            !group_ids.contains(&pot.group_id) || !member_ids.contains(&pot.member_id)
        }) {
            return Err(TontineError::InvalidRef(format!(
                "payout {} references an unknown group or member",
                pot.id
            )));
        }
        Ok(())
    }

    /// Finds a group by id or case-insensitive name.
    pub fn find_group(&self, key: &str) -> Option<&GroupConfig> {
        let key = key.trim();
        self.groups
            .iter()
            .find(|group| group.id.to_string() == key)
            .or_else(|| {
                self.groups
                    .iter()
                    .find(|group| group.name.eq_ignore_ascii_case(key))
            })
    }

    pub fn group(&self, id: Uuid) -> Result<&GroupConfig, TontineError> {
        self.groups
            .iter()
            .find(|group| group.id == id)
            .ok_or_else(|| CoreError::GroupNotFound(id).into())
    }

    pub fn members_of(&self, group_id: Uuid) -> Vec<Member> {
        self.members
            .iter()
            .filter(|member| member.group_id == group_id)
            .cloned()
            .collect()
    }

    /// Attendance of every member of the group.
    pub fn attendances_of(&self, group_id: Uuid) -> Vec<AttendanceRecord> {
        let members: HashSet<Uuid> = self
            .members
            .iter()
            .filter(|member| member.group_id == group_id)
            .map(|member| member.id)
            .collect();
        self.attendances
            .iter()
            .filter(|record| members.contains(&record.member_id))
            .cloned()
            .collect()
    }

    /// Stored payouts of the group in calendar order.
    pub fn payouts_of(&self, group_id: Uuid) -> Vec<PotDistribution> {
        let mut pots: Vec<PotDistribution> = self
            .payouts
            .iter()
            .filter(|pot| pot.group_id == group_id)
            .cloned()
            .collect();
        pots.sort_by_key(|pot| pot.distribution_date);
        pots
    }

    /// Writes a settlement back: attendance upserts plus the member's new wallet credit.
    pub fn apply_settlement(
        &mut self,
        member_id: Uuid,
        settlement: &Settlement,
    ) -> Result<(), TontineError> {
        let member = self
            .members
            .iter_mut()
            .find(|member| member.id == member_id)
            .ok_or_else(|| CoreError::MemberNotFound(member_id.to_string()))?;
        member.wallet_balance = settlement.wallet_balance;
        settlement.apply_to(&mut self.attendances);
        Ok(())
    }
}
