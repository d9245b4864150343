//! Waterfall allocation of a lump-sum payment across the member's daily obligations.
//!
//! Days are walked in order from the group's start date. Within a day the
//! penalty is settled first, then the admin fee, then the contribution. A
//! bucket is either paid in full or not at all; the first bucket that cannot
//! be fully covered halts the whole simulation.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use tontine_domain::{Amount, AttendanceRecord, AttendanceStatus, GroupConfig, LedgerRules};

use crate::time::calendar_days_between;

/// A payment a member intends to make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentRequest {
    pub member_id: Uuid,
    pub amount: Amount,
    /// Credit already held by the member, spent together with `amount`.
    pub wallet_balance: Amount,
}

impl PaymentRequest {
    pub fn new(member_id: Uuid, amount: Amount) -> Self {
        Self {
            member_id,
            amount,
            wallet_balance: 0,
        }
    }

    pub fn with_wallet(mut self, wallet_balance: Amount) -> Self {
        self.wallet_balance = wallet_balance;
        self
    }
}

/// Obligation categories, in settlement priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Penalty,
    Fee,
    Contribution,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Bucket::Penalty => "penalty",
            Bucket::Fee => "fee",
            Bucket::Contribution => "contribution",
        };
        f.write_str(label)
    }
}

/// Number of day-buckets settled per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Breakdown {
    pub contributions: u32,
    pub penalties: u32,
    pub fees: u32,
}

impl Breakdown {
    fn record(&mut self, bucket: Bucket) {
        match bucket {
            Bucket::Penalty => self.penalties += 1,
            Bucket::Fee => self.fees += 1,
            Bucket::Contribution => self.contributions += 1,
        }
    }
}

/// Buckets settled on one day. Costs are zero for buckets not paid in this step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentStep {
    pub date: NaiveDate,
    pub pay_penalty: bool,
    pub pay_fee: bool,
    pub pay_contribution: bool,
    pub penalty_cost: Amount,
    pub fee_cost: Amount,
    pub contribution_cost: Amount,
}

impl PaymentStep {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            pay_penalty: false,
            pay_fee: false,
            pay_contribution: false,
            penalty_cost: 0,
            fee_cost: 0,
            contribution_cost: 0,
        }
    }

    fn mark_paid(&mut self, bucket: Bucket, cost: Amount) {
        match bucket {
            Bucket::Penalty => {
                self.pay_penalty = true;
                self.penalty_cost = cost;
            }
            Bucket::Fee => {
                self.pay_fee = true;
                self.fee_cost = cost;
            }
            Bucket::Contribution => {
                self.pay_contribution = true;
                self.contribution_cost = cost;
            }
        }
    }

    fn is_empty(&self) -> bool {
        !(self.pay_penalty || self.pay_fee || self.pay_contribution)
    }

    pub fn total(&self) -> Amount {
        self.penalty_cost + self.fee_cost + self.contribution_cost
    }
}

/// The bucket that could not be covered in full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HaltReason {
    pub date: NaiveDate,
    pub bucket: Bucket,
    pub cost: Amount,
    pub available: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentSimulation {
    /// Contribution days paid.
    pub total_covered: u32,
    pub breakdown: Breakdown,
    pub steps: Vec<PaymentStep>,
    /// Unallocated funds, to be credited back to the member's wallet.
    pub remaining_amount: Amount,
    pub halted_on: Option<HaltReason>,
}

impl PaymentSimulation {
    fn untouched(remaining_amount: Amount) -> Self {
        Self {
            total_covered: 0,
            breakdown: Breakdown::default(),
            steps: Vec::new(),
            remaining_amount,
            halted_on: None,
        }
    }

    /// Sum of every cost paid across all steps.
    pub fn total_spent(&self) -> Amount {
        self.steps.iter().map(PaymentStep::total).sum()
    }

    /// Last day touched by the payment, if any.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.steps.last().map(|step| step.date)
    }
}

pub struct PaymentService;

impl PaymentService {
    /// Simulates how `request` would be allocated as of `reference`.
    pub fn simulate(
        request: &PaymentRequest,
        group: &GroupConfig,
        attendances: &[AttendanceRecord],
        reference: DateTime<Utc>,
        rules: &LedgerRules,
    ) -> PaymentSimulation {
        let wallet = request.wallet_balance.max(0);
        if request.amount <= 0 {
            return PaymentSimulation::untouched(request.amount.max(0).saturating_add(wallet));
        }

        let history: HashMap<NaiveDate, &AttendanceRecord> = attendances
            .iter()
            .filter(|record| record.member_id == request.member_id)
            .map(|record| (record.date, record))
            .collect();
        let reference_day = reference.date_naive();

        let mut remaining = request.amount.saturating_add(wallet);
        let mut breakdown = Breakdown::default();
        let mut steps = Vec::new();
        let mut halted_on = None;
        let mut days_walked = 0u32;

        'days: while remaining > 0 && days_walked < rules.simulation_day_limit {
            let Some(date) = group
                .start_date
                .checked_add_days(Days::new(u64::from(days_walked)))
            else {
                break;
            };
            days_walked += 1;

            let existing = history.get(&date).copied();
            let strictly_late = calendar_days_between(reference_day, date) >= 1;
            let costs = [
                (Bucket::Penalty, penalty_cost(group, existing, strictly_late)),
                (Bucket::Fee, fee_cost(group, existing)),
                (Bucket::Contribution, contribution_cost(group, existing)),
            ];

            let mut step = PaymentStep::new(date);
            for (bucket, cost) in costs {
                if cost == 0 {
                    continue;
                }
                if remaining < cost {
                    halted_on = Some(HaltReason {
                        date,
                        bucket,
                        cost,
                        available: remaining,
                    });
                    if !step.is_empty() {
                        steps.push(step);
                    }
                    break 'days;
                }
                remaining -= cost;
                step.mark_paid(bucket, cost);
                breakdown.record(bucket);
            }

            if !step.is_empty() {
                steps.push(step);
            }
        }

        if let Some(reason) = &halted_on {
            info!(
                member = %request.member_id,
                date = %reason.date,
                bucket = %reason.bucket,
                cost = reason.cost,
                available = reason.available,
                "payment waterfall halted on uncovered bucket"
            );
        } else if remaining > 0 && days_walked >= rules.simulation_day_limit {
            warn!(
                member = %request.member_id,
                limit = rules.simulation_day_limit,
                remaining,
                "payment simulation reached its day limit"
            );
        }

        PaymentSimulation {
            total_covered: breakdown.contributions,
            breakdown,
            steps,
            remaining_amount: remaining,
            halted_on,
        }
    }
}

/// Penalties only apply to days strictly before the reference day.
fn penalty_cost(
    group: &GroupConfig,
    existing: Option<&AttendanceRecord>,
    strictly_late: bool,
) -> Amount {
    if !strictly_late {
        return 0;
    }
    let already_paid = existing.map_or(0, |record| record.penalty_paid);
    (group.penalty_per_day - already_paid).max(0)
}

fn fee_cost(group: &GroupConfig, existing: Option<&AttendanceRecord>) -> Amount {
    let already_paid = existing.map_or(0, |record| record.fee_paid);
    (group.admin_fee() - already_paid).max(0)
}

/// A day's contribution is settled only by a `Paid` record; `Late` and `Pending` still owe it.
fn contribution_cost(group: &GroupConfig, existing: Option<&AttendanceRecord>) -> Amount {
    let already_paid = match existing {
        Some(record) if record.status == AttendanceStatus::Paid => group.contribution_amount,
        _ => 0,
    };
    (group.contribution_amount - already_paid).max(0)
}
