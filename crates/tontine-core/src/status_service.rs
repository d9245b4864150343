//! Member debt status derived from sparse attendance history.

use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;
use tracing::debug;

use tontine_domain::{Amount, AttendanceRecord, GroupConfig, LedgerRules, Member, MemberStatus};

use crate::time::calendar_days_between;

/// What a member owes (or has in surplus) as of a reference instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberFinanceStatus {
    /// Elapsed contribution days, the start day counting as day 1.
    pub days_since_start: i64,
    pub total_contribution_due: Amount,
    pub total_fee_due: Amount,
    pub total_penalty_due: Amount,
    pub total_contribution_paid: Amount,
    /// Contributions, fees and penalties paid, i.e. the credit side of `balance`.
    pub total_paid: Amount,
    /// Negative when the member is in debt.
    pub balance: Amount,
    /// Elapsed days not yet covered by contributions.
    pub days_late: i64,
    /// Late days that carry a penalty.
    pub penalty_days: i64,
    /// Suggested status; never written back by the calculator.
    pub status: MemberStatus,
    pub unpaid_contributions: Amount,
    pub unpaid_penalties: Amount,
}

impl MemberFinanceStatus {
    fn not_started(status: MemberStatus) -> Self {
        Self {
            days_since_start: 0,
            total_contribution_due: 0,
            total_fee_due: 0,
            total_penalty_due: 0,
            total_contribution_paid: 0,
            total_paid: 0,
            balance: 0,
            days_late: 0,
            penalty_days: 0,
            status,
            unpaid_contributions: 0,
            unpaid_penalties: 0,
        }
    }

    pub fn is_in_debt(&self) -> bool {
        self.balance < 0
    }

    /// Amount needed to be up to date, zero when not in debt.
    pub fn amount_owed(&self) -> Amount {
        (-self.balance).max(0)
    }
}

/// Status of one member within a group overview.
#[derive(Debug, Clone, Serialize)]
pub struct MemberOverview {
    pub member: Member,
    pub finance: MemberFinanceStatus,
}

impl MemberOverview {
    /// Returns `true` when the suggested status differs from the stored one.
    pub fn status_changed(&self) -> bool {
        self.member.status != self.finance.status
    }
}

#[derive(Default)]
struct PaidTotals {
    contribution: Amount,
    fee: Amount,
    penalty: Amount,
}

pub struct MemberStatusService;

impl MemberStatusService {
    /// Computes the member's financial status at `reference`.
    ///
    /// Only records whose `member_id` matches `member.id` are considered, so the
    /// whole group's attendance may be passed in.
    pub fn compute(
        member: &Member,
        group: &GroupConfig,
        attendances: &[AttendanceRecord],
        reference: DateTime<Utc>,
        rules: &LedgerRules,
    ) -> MemberFinanceStatus {
        let days_since_start = calendar_days_between(reference.date_naive(), group.start_date) + 1;
        if days_since_start <= 0 {
            return MemberFinanceStatus::not_started(member.status);
        }

        let total_contribution_due = days_since_start * group.contribution_amount;
        let total_fee_due = days_since_start * group.admin_fee();

        let paid = attendances
            .iter()
            .filter(|record| record.member_id == member.id)
            .fold(PaidTotals::default(), |mut totals, record| {
                if record.counts_as_contribution() {
                    totals.contribution += record.amount_paid;
                    totals.fee += record.fee_paid;
                }
                totals.penalty += record.penalty_paid;
                totals
            });

        // A non-positive contribution makes every day free; validate_group rejects it upstream.
        let paid_days = if group.contribution_amount > 0 {
            paid.contribution.div_euclid(group.contribution_amount)
        } else {
            days_since_start
        };
        let days_late = (days_since_start - paid_days).max(0);

        // Before the cutoff the current day is still in progress and carries no penalty.
        let penalty_days = if days_late > 0 && reference.hour() < rules.due_cutoff_hour {
            (days_late - 1).max(0)
        } else {
            days_late
        };
        let total_penalty_due = penalty_days * group.penalty_per_day;

        let total_paid = paid.contribution + paid.penalty + paid.fee;
        let balance = total_paid - (total_contribution_due + total_fee_due + total_penalty_due);

        let status = if days_late >= rules.exclusion_after_days {
            MemberStatus::Excluded
        } else if days_late >= rules.alert_after_days {
            MemberStatus::Alert
        } else {
            MemberStatus::Active
        };

        let contribution_gap = (total_contribution_due + total_fee_due) - (paid.contribution + paid.fee);
        let penalty_gap = total_penalty_due - paid.penalty;
        let (unpaid_contributions, unpaid_penalties) = split_unpaid(contribution_gap, penalty_gap);

        debug!(
            member = %member.id,
            days_since_start,
            days_late,
            penalty_days,
            balance,
            "member status computed"
        );

        MemberFinanceStatus {
            days_since_start,
            total_contribution_due,
            total_fee_due,
            total_penalty_due,
            total_contribution_paid: paid.contribution,
            total_paid,
            balance,
            days_late,
            penalty_days,
            status,
            unpaid_contributions,
            unpaid_penalties,
        }
    }

    /// Computes statuses for every non-archived member of `group`, largest debt first.
    pub fn group_overview(
        group: &GroupConfig,
        members: &[Member],
        attendances: &[AttendanceRecord],
        reference: DateTime<Utc>,
        rules: &LedgerRules,
    ) -> Vec<MemberOverview> {
        let mut rows: Vec<MemberOverview> = members
            .iter()
            .filter(|member| member.group_id == group.id && !member.is_archived())
            .map(|member| MemberOverview {
                member: member.clone(),
                finance: Self::compute(member, group, attendances, reference, rules),
            })
            .collect();
        rows.sort_by(|a, b| {
            a.finance
                .balance
                .cmp(&b.finance.balance)
                .then_with(|| a.member.full_name.cmp(&b.member.full_name))
        });
        rows
    }
}

/// Splits the outstanding debt between contributions and penalties.
///
/// A surplus in one bucket offsets the deficit of the other, so both parts are
/// non-negative and together equal the total debt.
fn split_unpaid(contribution_gap: Amount, penalty_gap: Amount) -> (Amount, Amount) {
    match (contribution_gap.max(0), penalty_gap.max(0)) {
        (0, penalties) => (0, (penalties + contribution_gap).max(0)),
        (contributions, 0) => ((contributions + penalty_gap).max(0), 0),
        both => both,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_unpaid_nets_surplus_against_the_other_bucket() {
        assert_eq!(split_unpaid(1100, 400), (1100, 400));
        assert_eq!(split_unpaid(-100, 200), (0, 100));
        assert_eq!(split_unpaid(300, -50), (250, 0));
        assert_eq!(split_unpaid(-500, 200), (0, 0));
        assert_eq!(split_unpaid(0, 0), (0, 0));
    }
}
