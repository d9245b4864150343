//! Payout rotation: who collects the pot, and on which day.

use chrono::{Days, NaiveDate};
use tracing::debug;
use uuid::Uuid;

use tontine_domain::{Amount, GroupConfig, Member, PayoutStatus, PotDistribution};

use crate::CoreError;

pub struct PayoutService;

impl PayoutService {
    /// Pot collected over one rotation: every member's contributions for `rotation_days`.
    /// Admin fees stay with the organiser and are excluded.
    pub fn pot_amount(group: &GroupConfig, member_count: usize) -> Amount {
        let members = Amount::try_from(member_count).unwrap_or(Amount::MAX);
        group
            .contribution_amount
            .saturating_mul(Amount::from(group.rotation_days))
            .saturating_mul(members)
    }

    /// Builds a fresh schedule, one pending payout per member in rotation, in the given order.
    ///
    /// The member at position `i` collects on `start_date + (i + 1) * rotation_days`.
    pub fn generate_schedule(
        group: &GroupConfig,
        members: &[Member],
    ) -> Result<Vec<PotDistribution>, CoreError> {
        let rotation: Vec<&Member> = members
            .iter()
            .filter(|member| member.group_id == group.id && member.is_in_rotation())
            .collect();
        let amount = Self::pot_amount(group, rotation.len());
        let schedule = rotation
            .iter()
            .enumerate()
            .map(|(index, member)| {
                let date = payout_date(group.start_date, group.rotation_days, index, 0)?;
                Ok(PotDistribution::new(group.id, member.id, date, amount))
            })
            .collect::<Result<Vec<_>, CoreError>>()?;
        debug!(group = %group.id, payouts = schedule.len(), amount, "payout schedule generated");
        Ok(schedule)
    }

    /// Moves existing payouts onto a new calendar, keeping their chronological order.
    ///
    /// `start_date` counts as the first day of the first rotation, so the payout at
    /// position `i` lands on `start_date + (i + 1) * rotation_days - 1`.
    pub fn reschedule(
        pots: &mut [PotDistribution],
        start_date: NaiveDate,
        rotation_days: u32,
    ) -> Result<(), CoreError> {
        pots.sort_by_key(|pot| pot.distribution_date);
        for (index, pot) in pots.iter_mut().enumerate() {
            pot.distribution_date = payout_date(start_date, rotation_days, index, 1)?;
        }
        Ok(())
    }

    /// Marks the payout identified by `pot_id` as completed.
    pub fn complete(pots: &mut [PotDistribution], pot_id: Uuid) -> Result<(), CoreError> {
        let pot = pots
            .iter_mut()
            .find(|pot| pot.id == pot_id)
            .ok_or(CoreError::PayoutNotFound(pot_id))?;
        if !pot.is_pending() {
            return Err(CoreError::InvalidOperation(format!(
                "payout {pot_id} is already completed"
            )));
        }
        pot.status = PayoutStatus::Completed;
        Ok(())
    }

    /// Earliest pending payout on or after `today`.
    pub fn next_pending(pots: &[PotDistribution], today: NaiveDate) -> Option<&PotDistribution> {
        pots.iter()
            .filter(|pot| pot.is_pending() && pot.distribution_date >= today)
            .min_by_key(|pot| pot.distribution_date)
    }
}

/// `start + (index + 1) * rotation_days - back_days`.
fn payout_date(
    start: NaiveDate,
    rotation_days: u32,
    index: usize,
    back_days: u64,
) -> Result<NaiveDate, CoreError> {
    if rotation_days == 0 {
        return Err(CoreError::InvalidConfiguration(
            "rotation must last at least one day".into(),
        ));
    }
    let offset = u64::try_from(index + 1)
        .ok()
        .and_then(|slot| slot.checked_mul(u64::from(rotation_days)))
        .map(|offset| offset.saturating_sub(back_days))
        .ok_or_else(|| CoreError::InvalidOperation(format!("payout slot {index} overflows")))?;
    start
        .checked_add_days(Days::new(offset))
        .ok_or_else(|| CoreError::InvalidOperation(format!("payout slot {index} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tontine_domain::MemberStatus;

    fn day(month: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, d).unwrap()
    }

    fn group() -> GroupConfig {
        GroupConfig::new("Rotation", 500, 200, day(2, 7), 4).with_admin_fee(50)
    }

    fn members(group: &GroupConfig, names: &[&str]) -> Vec<Member> {
        names
            .iter()
            .map(|name| Member::new(group.id, *name, group.start_date))
            .collect()
    }

    #[test]
    fn pot_amount_excludes_admin_fee() {
        assert_eq!(PayoutService::pot_amount(&group(), 100), 500 * 4 * 100);
        assert_eq!(PayoutService::pot_amount(&group(), 0), 0);
    }

    #[test]
    fn schedule_pays_each_member_at_the_end_of_their_rotation() {
        let group = group();
        let mut roster = members(&group, &["Awa", "Binta", "Coumba", "Dieynaba"]);
        roster[2].status = MemberStatus::Archived;
        roster.push(Member::new(Uuid::new_v4(), "Other group", group.start_date));

        let schedule = PayoutService::generate_schedule(&group, &roster).expect("schedule");

        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule[0].member_id, roster[0].id);
        assert_eq!(schedule[0].distribution_date, day(2, 11));
        assert_eq!(schedule[1].member_id, roster[1].id);
        assert_eq!(schedule[1].distribution_date, day(2, 15));
        assert_eq!(schedule[2].member_id, roster[3].id);
        assert_eq!(schedule[2].distribution_date, day(2, 19));
        assert!(schedule.iter().all(|pot| pot.amount == 500 * 4 * 3 && pot.is_pending()));
    }

    #[test]
    fn reschedule_keeps_order_on_an_inclusive_calendar() {
        let group = group();
        let roster = members(&group, &["Awa", "Binta", "Coumba"]);
        let mut pots = PayoutService::generate_schedule(&group, &roster).unwrap();
        pots.reverse();

        PayoutService::reschedule(&mut pots, day(3, 1), 7).unwrap();

        assert_eq!(pots[0].member_id, roster[0].id);
        assert_eq!(pots[0].distribution_date, day(3, 7));
        assert_eq!(pots[1].member_id, roster[1].id);
        assert_eq!(pots[1].distribution_date, day(3, 14));
        assert_eq!(pots[2].distribution_date, day(3, 21));
    }

    #[test]
    fn one_day_rotation_reschedules_onto_the_start_date() {
        let group = group();
        let roster = members(&group, &["Awa", "Binta"]);
        let mut pots = PayoutService::generate_schedule(&group, &roster).unwrap();

        PayoutService::reschedule(&mut pots, day(3, 1), 1).unwrap();

        assert_eq!(pots[0].distribution_date, day(3, 1));
        assert_eq!(pots[1].distribution_date, day(3, 2));
        assert!(PayoutService::reschedule(&mut pots, day(3, 1), 0).is_err());
    }

    #[test]
    fn complete_marks_payout_once() {
        let group = group();
        let roster = members(&group, &["Awa", "Binta"]);
        let mut pots = PayoutService::generate_schedule(&group, &roster).unwrap();
        let first = pots[0].id;

        PayoutService::complete(&mut pots, first).expect("complete payout");
        assert_eq!(pots[0].status, PayoutStatus::Completed);
        assert!(PayoutService::complete(&mut pots, first).is_err());
        assert!(matches!(
            PayoutService::complete(&mut pots, Uuid::new_v4()),
            Err(CoreError::PayoutNotFound(_))
        ));

        let next = PayoutService::next_pending(&pots, day(2, 7)).expect("pending payout");
        assert_eq!(next.id, pots[1].id);
        assert!(PayoutService::next_pending(&pots, day(2, 16)).is_none());
    }
}
