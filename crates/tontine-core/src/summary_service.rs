//! Collection totals for reporting: per-day aggregates and the group dashboard.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use tontine_domain::{Amount, AttendanceRecord, GroupConfig, Member, MemberStatus};

/// Money collected on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total_contributions: Amount,
    pub total_penalties: Amount,
    pub total_fees: Amount,
}

impl DailyTotal {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total_contributions: 0,
            total_penalties: 0,
            total_fees: 0,
        }
    }

    pub fn total(&self) -> Amount {
        self.total_contributions + self.total_penalties + self.total_fees
    }
}

/// Headline figures for a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupDashboard {
    pub pot_amount: Amount,
    pub collected_amount: Amount,
    pub penalty_amount: Amount,
    pub fee_amount: Amount,
    pub alert_count: usize,
    /// Whether any attendance was recorded for the day in question.
    pub session_validated: bool,
}

pub struct SummaryService;

impl SummaryService {
    /// Aggregates attendance per calendar day, most recent first.
    ///
    /// Contributions only count for paid or late records; penalties and fees
    /// count whatever the status.
    pub fn daily_totals(attendances: &[AttendanceRecord]) -> Vec<DailyTotal> {
        let mut by_day: BTreeMap<NaiveDate, DailyTotal> = BTreeMap::new();
        for record in attendances {
            let entry = by_day
                .entry(record.date)
                .or_insert_with(|| DailyTotal::empty(record.date));
            if record.counts_as_contribution() {
                entry.total_contributions += record.amount_paid;
            }
            entry.total_penalties += record.penalty_paid;
            entry.total_fees += record.fee_paid;
        }
        by_day.into_values().rev().collect()
    }

    /// Summarises collections for `group` as seen on `today`.
    pub fn dashboard(
        group: &GroupConfig,
        members: &[Member],
        attendances: &[AttendanceRecord],
        today: NaiveDate,
    ) -> GroupDashboard {
        let group_members: Vec<&Member> = members
            .iter()
            .filter(|member| member.group_id == group.id)
            .collect();
        let group_records = attendances.iter().filter(|record| {
            group_members
                .iter()
                .any(|member| member.id == record.member_id)
        });

        let mut dashboard = GroupDashboard {
            pot_amount: group.pot_amount,
            collected_amount: 0,
            penalty_amount: 0,
            fee_amount: 0,
            alert_count: group_members
                .iter()
                .filter(|member| member.status == MemberStatus::Alert)
                .count(),
            session_validated: false,
        };
        for record in group_records {
            dashboard.collected_amount += record.amount_paid;
            dashboard.penalty_amount += record.penalty_paid;
            dashboard.fee_amount += record.fee_paid;
            dashboard.session_validated |= record.date == today;
        }
        dashboard
    }
}
