use tontine_core::{
    HistoryService, HistoryWindow, MemberStatusService, PaymentRequest, PaymentService,
    PaymentSimulation, SettlementService,
};
use tontine_domain::{Amount, GroupConfig, Member};

use crate::cli::commands::{parse_amount, required};
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "status",
            "Show what a member owes",
            "status <member>",
            cmd_status,
        ),
        CommandEntry::new(
            "simulate",
            "Preview how a payment would be allocated",
            "simulate <member> <amount> [wallet]",
            cmd_simulate,
        ),
        CommandEntry::new(
            "settle",
            "Record a payment in the loaded snapshot",
            "settle <member> <amount>",
            cmd_settle,
        ),
        CommandEntry::new(
            "history",
            "Show a member's payments, optionally for the last N days",
            "history <member> [days]",
            cmd_history,
        ),
    ]
}

fn cmd_status(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (member, group) = context.resolve_member(required(args, 0, "member")?)?;
    let reference = context.clock().now();
    let status = MemberStatusService::compute(
        &member,
        &group,
        &context.snapshot()?.attendances,
        reference,
        &context.config.rules,
    );

    let money = |amount| context.money(&group, amount);
    output::section(format!(
        "{} as of {}",
        member.full_name,
        reference.format("%Y-%m-%d %H:%M UTC")
    ));
    if status.status == member.status {
        output::line(format!("  Status            : {}", member.status));
    } else {
        output::line(format!(
            "  Status            : {} (suggested: {})",
            member.status, status.status
        ));
    }
    output::line(format!("  Days since start  : {}", status.days_since_start));
    output::line(format!(
        "  Days late         : {} ({} penalised)",
        status.days_late, status.penalty_days
    ));
    output::line(format!("  Contributions due : {}", money(status.total_contribution_due)));
    output::line(format!("  Fees due          : {}", money(status.total_fee_due)));
    output::line(format!("  Penalties due     : {}", money(status.total_penalty_due)));
    output::line(format!("  Paid              : {}", money(status.total_paid)));
    output::line(format!(
        "  Balance           : {}",
        output::signed(status.balance, money(status.balance))
    ));
    if status.is_in_debt() {
        output::line(format!("  Unpaid dues       : {}", money(status.unpaid_contributions)));
        output::line(format!("  Unpaid penalties  : {}", money(status.unpaid_penalties)));
    }
    if member.wallet_balance != 0 {
        output::line(format!("  Wallet            : {}", money(member.wallet_balance)));
    }
    Ok(())
}

fn cmd_simulate(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (member, group) = context.resolve_member(required(args, 0, "member")?)?;
    let amount = parse_amount(required(args, 1, "amount")?)?;
    let wallet = match args.get(2) {
        Some(raw) => parse_amount(raw)?,
        None => member.wallet_balance,
    };

    let simulation = simulate(context, &member, &group, amount, wallet)?;
    print_simulation(context, &member, &group, &simulation);
    Ok(())
}

fn cmd_settle(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (member, group) = context.resolve_member(required(args, 0, "member")?)?;
    let amount = parse_amount(required(args, 1, "amount")?)?;
    if amount <= 0 {
        return Err(CommandError::InvalidArguments(
            "A settled payment must be positive.".into(),
        ));
    }

    let simulation = simulate(context, &member, &group, amount, member.wallet_balance)?;
    print_simulation(context, &member, &group, &simulation);

    let snapshot = context.snapshot_mut()?;
    let settlement =
        SettlementService::settle(member.id, &group, &snapshot.attendances, &simulation);
    snapshot.apply_settlement(member.id, &settlement)?;
    tracing::info!(
        member = %member.id,
        amount,
        days = settlement.upserts.len(),
        wallet = settlement.wallet_balance,
        "payment settled"
    );

    output::success(format!(
        "Recorded {} day(s) for {}; wallet now {}.",
        settlement.upserts.len(),
        member.full_name,
        context.money(&group, settlement.wallet_balance)
    ));
    output::hint("Use `save` to write the snapshot to disk.");
    Ok(())
}

fn cmd_history(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (member, group) = context.resolve_member(required(args, 0, "member")?)?;
    let window = match args.get(1) {
        Some(raw) => {
            let days = raw.parse::<u32>().map_err(|_| {
                CommandError::InvalidArguments(format!("`{raw}` is not a number of days."))
            })?;
            HistoryWindow::LastDays {
                days,
                until: context.clock().today(),
            }
        }
        None => HistoryWindow::All,
    };

    let attendances = &context.snapshot()?.attendances;
    let history = HistoryService::member_history(member.id, attendances, window)?;
    let money = |amount| context.money(&group, amount);

    output::section(format!("History of {}", member.full_name));
    if history.entries.is_empty() {
        output::info("No payments recorded.");
        return Ok(());
    }
    for (month, records) in history.by_month.iter().rev() {
        output::line(format!("  {month}"));
        for record in records {
            output::line(format!(
                "    {}  {:<8} {:>12} {:>10} {:>10}",
                record.date,
                record.status.to_string(),
                money(record.amount_paid),
                money(record.penalty_paid),
                money(record.fee_paid)
            ));
        }
    }
    output::line(format!(
        "  {} record(s): {} contributed, {} penalties, {} fees",
        history.transaction_count,
        money(history.total_contributed),
        money(history.total_penalties),
        money(history.total_fees)
    ));
    Ok(())
}

fn simulate(
    context: &ShellContext,
    member: &Member,
    group: &GroupConfig,
    amount: Amount,
    wallet: Amount,
) -> Result<PaymentSimulation, CommandError> {
    if amount < 0 || wallet < 0 {
        return Err(CommandError::InvalidArguments(
            "Amounts cannot be negative.".into(),
        ));
    }
    let request = PaymentRequest::new(member.id, amount).with_wallet(wallet);
    Ok(PaymentService::simulate(
        &request,
        group,
        &context.snapshot()?.attendances,
        context.clock().now(),
        &context.config.rules,
    ))
}

fn print_simulation(
    context: &ShellContext,
    member: &Member,
    group: &GroupConfig,
    simulation: &PaymentSimulation,
) {
    let money = |amount| context.money(group, amount);
    let paid_or_dash = |paid: bool, cost| if paid { money(cost) } else { "-".to_string() };

    output::section(format!("Payment for {}", member.full_name));
    for step in &simulation.steps {
        output::line(format!(
            "  {}  penalty {:>10}  fee {:>8}  contribution {:>10}",
            step.date,
            paid_or_dash(step.pay_penalty, step.penalty_cost),
            paid_or_dash(step.pay_fee, step.fee_cost),
            paid_or_dash(step.pay_contribution, step.contribution_cost)
        ));
    }
    output::line(format!(
        "  Covered {} day(s): {} contribution(s), {} penalty(ies), {} fee(s)",
        simulation.total_covered,
        simulation.breakdown.contributions,
        simulation.breakdown.penalties,
        simulation.breakdown.fees
    ));
    output::line(format!("  Spent     : {}", money(simulation.total_spent())));
    output::line(format!("  Remaining : {}", money(simulation.remaining_amount)));
    if let Some(halt) = &simulation.halted_on {
        output::warning(format!(
            "Stopped on {}: the {} costs {} but only {} is left.",
            halt.date,
            halt.bucket,
            money(halt.cost),
            money(halt.available)
        ));
    }
}
