//! Turns a confirmed payment simulation into the attendance records storage should upsert.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use tontine_domain::{Amount, AttendanceRecord, AttendanceStatus, GroupConfig};

use crate::payment_service::{PaymentSimulation, PaymentStep};

/// Records to upsert, keyed on `(member_id, date)`, plus the member's new wallet credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settlement {
    pub upserts: Vec<AttendanceRecord>,
    pub wallet_balance: Amount,
}

impl Settlement {
    /// Replaces or appends the upserted records in an in-memory attendance snapshot.
    pub fn apply_to(&self, attendances: &mut Vec<AttendanceRecord>) {
        for upsert in &self.upserts {
            match attendances
                .iter_mut()
                .find(|record| record.member_id == upsert.member_id && record.date == upsert.date)
            {
                Some(existing) => *existing = upsert.clone(),
                None => attendances.push(upsert.clone()),
            }
        }
    }
}

pub struct SettlementService;

impl SettlementService {
    pub fn settle(
        member_id: Uuid,
        group: &GroupConfig,
        attendances: &[AttendanceRecord],
        simulation: &PaymentSimulation,
    ) -> Settlement {
        let history: HashMap<NaiveDate, &AttendanceRecord> = attendances
            .iter()
            .filter(|record| record.member_id == member_id)
            .map(|record| (record.date, record))
            .collect();

        let upserts = simulation
            .steps
            .iter()
            .map(|step| settle_step(member_id, group, history.get(&step.date).copied(), step))
            .collect();

        Settlement {
            upserts,
            wallet_balance: simulation.remaining_amount,
        }
    }
}

fn settle_step(
    member_id: Uuid,
    group: &GroupConfig,
    existing: Option<&AttendanceRecord>,
    step: &PaymentStep,
) -> AttendanceRecord {
    let mut record = existing
        .cloned()
        .unwrap_or_else(|| AttendanceRecord::new(member_id, step.date, AttendanceStatus::Pending));

    if step.pay_contribution {
        record.status = AttendanceStatus::Paid;
    }
    if record.status == AttendanceStatus::Paid {
        record.amount_paid = group.contribution_amount;
    }
    record.penalty_paid += step.penalty_cost;
    record.fee_paid += step.fee_cost;
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment_service::{Breakdown, PaymentSimulation};

    fn group() -> GroupConfig {
        let start = NaiveDate::from_ymd_opt(2026, 2, 7).unwrap();
        GroupConfig::new("Settle", 500, 200, start, 7).with_admin_fee(50)
    }

    fn step(date: NaiveDate, penalty: Amount, fee: Amount, contribution: Amount) -> PaymentStep {
        PaymentStep {
            date,
            pay_penalty: penalty > 0,
            pay_fee: fee > 0,
            pay_contribution: contribution > 0,
            penalty_cost: penalty,
            fee_cost: fee,
            contribution_cost: contribution,
        }
    }

    #[test]
    fn settlement_updates_existing_and_creates_missing_days() {
        let group = group();
        let member_id = Uuid::new_v4();
        let first = group.start_date;
        let second = first.succ_opt().unwrap();
        let existing = AttendanceRecord::new(member_id, first, AttendanceStatus::Late)
            .with_payments(0, 50, 0);
        let existing_id = existing.id;
        let simulation = PaymentSimulation {
            total_covered: 1,
            breakdown: Breakdown {
                contributions: 1,
                penalties: 1,
                fees: 2,
            },
            steps: vec![step(first, 150, 50, 500), step(second, 0, 50, 0)],
            remaining_amount: 120,
            halted_on: None,
        };

        let settlement = SettlementService::settle(member_id, &group, &[existing], &simulation);

        assert_eq!(settlement.wallet_balance, 120);
        assert_eq!(settlement.upserts.len(), 2);
        let day_one = &settlement.upserts[0];
        assert_eq!(day_one.id, existing_id);
        assert_eq!(day_one.status, AttendanceStatus::Paid);
        assert_eq!(day_one.amount_paid, 500);
        assert_eq!(day_one.penalty_paid, 200);
        assert_eq!(day_one.fee_paid, 50);

        let day_two = &settlement.upserts[1];
        assert_eq!(day_two.date, second);
        assert_eq!(day_two.status, AttendanceStatus::Pending);
        assert_eq!(day_two.amount_paid, 0);
        assert_eq!(day_two.fee_paid, 50);
    }

    #[test]
    fn apply_to_replaces_records_in_place() {
        let group = group();
        let member_id = Uuid::new_v4();
        let mut attendances = vec![AttendanceRecord::new(
            member_id,
            group.start_date,
            AttendanceStatus::Pending,
        )];
        let simulation = PaymentSimulation {
            total_covered: 1,
            breakdown: Breakdown::default(),
            steps: vec![
                step(group.start_date, 0, 50, 500),
                step(group.start_date.succ_opt().unwrap(), 0, 50, 500),
            ],
            remaining_amount: 0,
            halted_on: None,
        };

        let settlement = SettlementService::settle(member_id, &group, &attendances, &simulation);
        settlement.apply_to(&mut attendances);

        assert_eq!(attendances.len(), 2);
        assert!(attendances
            .iter()
            .all(|record| record.status == AttendanceStatus::Paid && record.amount_paid == 500));
    }
}
