//! Stable, public-facing helpers that wrap the internal service layer.
//!
//! This module exposes a simplified API that frontends (CLI, reports) can rely
//! on without depending on the entire service surface area. Every helper takes
//! a [`Clock`] in place of the reference instant, so "as of now" is the default
//! and tests can pin time.

use tontine_domain::{Amount, AttendanceRecord, GroupConfig, LedgerRules, Member};

use crate::{
    payment_service::{PaymentRequest, PaymentService, PaymentSimulation},
    settlement_service::{Settlement, SettlementService},
    status_service::{MemberFinanceStatus, MemberStatusService},
    summary_service::{DailyTotal, SummaryService},
    time::Clock,
    CoreError,
};

/// Finance status of `member` at the clock's current instant, under the default rules.
pub fn api_member_status(
    member: &Member,
    group: &GroupConfig,
    attendances: &[AttendanceRecord],
    clock: &dyn Clock,
) -> MemberFinanceStatus {
    MemberStatusService::compute(member, group, attendances, clock.now(), &LedgerRules::default())
}

/// Simulates a payment of `amount` by `member`, spending their wallet credit as well.
pub fn api_simulate_payment(
    member: &Member,
    amount: Amount,
    group: &GroupConfig,
    attendances: &[AttendanceRecord],
    clock: &dyn Clock,
) -> Result<PaymentSimulation, CoreError> {
    if amount < 0 {
        return Err(CoreError::InvalidAmount(format!(
            "payment amount cannot be negative, got {amount}"
        )));
    }
    let request = PaymentRequest::new(member.id, amount).with_wallet(member.wallet_balance);
    Ok(PaymentService::simulate(
        &request,
        group,
        attendances,
        clock.now(),
        &LedgerRules::default(),
    ))
}

/// Simulates and settles a payment in one call, returning the records to upsert.
pub fn api_settle_payment(
    member: &Member,
    amount: Amount,
    group: &GroupConfig,
    attendances: &[AttendanceRecord],
    clock: &dyn Clock,
) -> Result<Settlement, CoreError> {
    let simulation = api_simulate_payment(member, amount, group, attendances, clock)?;
    Ok(SettlementService::settle(member.id, group, attendances, &simulation))
}

/// Per-day collection totals, most recent first.
pub fn api_daily_totals(attendances: &[AttendanceRecord]) -> Vec<DailyTotal> {
    SummaryService::daily_totals(attendances)
}

/// Finds a member by id or by case-insensitive full name.
pub fn api_find_member<'a>(members: &'a [Member], key: &str) -> Result<&'a Member, CoreError> {
    let key = key.trim();
    let lowered = key.to_lowercase();
    members
        .iter()
        .find(|member| member.id.to_string() == key)
        .or_else(|| {
            members
                .iter()
                .find(|member| member.full_name.to_lowercase() == lowered)
        })
        .ok_or_else(|| CoreError::MemberNotFound(key.to_string()))
}
