use std::collections::HashMap;

use uuid::Uuid;

use tontine_core::{public_api::api_daily_totals, PayoutService, SummaryService};
use tontine_domain::{PayoutStatus, PotDistribution};

use crate::cli::commands::{parse_instant, required};
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "daily",
            "Collections per day for the active group, most recent first",
            "daily",
            cmd_daily,
        ),
        CommandEntry::new(
            "payouts",
            "Show, generate, complete or reschedule the payout rotation",
            "payouts [generate | complete <member> | reschedule <start-date> [rotation-days]]",
            cmd_payouts,
        ),
        CommandEntry::new(
            "dashboard",
            "Headline figures for the active group",
            "dashboard",
            cmd_dashboard,
        ),
    ]
}

fn cmd_daily(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let group = context.active_group()?;
    let attendances = context.snapshot()?.attendances_of(group.id);
    let totals = api_daily_totals(&attendances);

    output::section(format!("Daily collections: {}", group.name));
    if totals.is_empty() {
        output::info("No attendance recorded yet.");
        return Ok(());
    }
    output::line(format!(
        "  {:<10}  {:>14}  {:>12}  {:>10}  {:>14}",
        "date", "contributions", "penalties", "fees", "total"
    ));
    for day in &totals {
        output::line(format!(
            "  {:<10}  {:>14}  {:>12}  {:>10}  {:>14}",
            day.date.to_string(),
            context.money(group, day.total_contributions),
            context.money(group, day.total_penalties),
            context.money(group, day.total_fees),
            context.money(group, day.total())
        ));
    }
    Ok(())
}

fn cmd_dashboard(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let snapshot = context.snapshot()?;
    let group = context.active_group()?;
    let today = context.clock().today();
    let members = snapshot.members_of(group.id);
    let dashboard = SummaryService::dashboard(group, &members, &snapshot.attendances, today);

    let rotation = members.iter().filter(|member| member.is_in_rotation()).count();
    let pot = if dashboard.pot_amount > 0 {
        dashboard.pot_amount
    } else {
        PayoutService::pot_amount(group, rotation)
    };

    output::section(format!("Dashboard: {} on {today}", group.name));
    output::line(format!("  Pot               : {}", context.money(group, pot)));
    output::line(format!(
        "  Collected         : {}",
        context.money(group, dashboard.collected_amount)
    ));
    output::line(format!(
        "  Penalties         : {}",
        context.money(group, dashboard.penalty_amount)
    ));
    output::line(format!(
        "  Fees              : {}",
        context.money(group, dashboard.fee_amount)
    ));
    output::line(format!("  Members on alert  : {}", dashboard.alert_count));
    output::line(format!(
        "  Session validated : {}",
        if dashboard.session_validated { "yes" } else { "no" }
    ));
    Ok(())
}

fn cmd_payouts(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args.first().map(|action| action.to_lowercase()).as_deref() {
        None => show_payouts(context),
        Some("generate") => generate_payouts(context),
        Some("complete") => complete_payout(context, required(args, 1, "member")?),
        Some("reschedule") => reschedule_payouts(context, &args[1..]),
        Some(other) => Err(CommandError::InvalidArguments(format!(
            "Unknown payouts action `{other}`."
        ))),
    }
}

fn show_payouts(context: &ShellContext) -> CommandResult {
    let snapshot = context.snapshot()?;
    let group = context.active_group()?;
    let stored = snapshot.payouts_of(group.id);
    let (pots, preview) = if stored.is_empty() {
        let members = snapshot.members_of(group.id);
        (PayoutService::generate_schedule(group, &members)?, true)
    } else {
        (stored, false)
    };

    let names: HashMap<Uuid, &str> = snapshot
        .members
        .iter()
        .map(|member| (member.id, member.full_name.as_str()))
        .collect();
    let next = PayoutService::next_pending(&pots, context.clock().today()).map(|pot| pot.id);

    output::section(format!("Payouts: {}", group.name));
    if preview {
        output::info("No schedule stored; showing the rotation `payouts generate` would create.");
    }
    for pot in &pots {
        let status = match pot.status {
            PayoutStatus::Pending => "pending",
            PayoutStatus::Completed => "completed",
        };
        let marker = if Some(pot.id) == next { "  <- next" } else { "" };
        output::line(format!(
            "  {}  {:<28} {:>14}  {}{}",
            pot.distribution_date,
            names.get(&pot.member_id).copied().unwrap_or("?"),
            context.money(group, pot.amount),
            status,
            marker
        ));
    }
    Ok(())
}

fn generate_payouts(context: &mut ShellContext) -> CommandResult {
    let group = context.active_group()?.clone();
    let snapshot = context.snapshot_mut()?;
    if !snapshot.payouts_of(group.id).is_empty() {
        return Err(CommandError::Message(format!(
            "{} already has a payout schedule. Use `payouts reschedule` to move it.",
            group.name
        )));
    }
    let members = snapshot.members_of(group.id);
    let schedule = PayoutService::generate_schedule(&group, &members)?;
    let count = schedule.len();
    snapshot.payouts.extend(schedule);
    output::success(format!("Scheduled {count} payout(s) for {}.", group.name));
    Ok(())
}

fn complete_payout(context: &mut ShellContext, member_key: &str) -> CommandResult {
    let (member, group) = context.resolve_member(member_key)?;
    let snapshot = context.snapshot_mut()?;
    let pot_id = snapshot
        .payouts
        .iter()
        .filter(|pot| pot.member_id == member.id && pot.is_pending())
        .min_by_key(|pot| pot.distribution_date)
        .map(|pot| pot.id)
        .ok_or_else(|| {
            CommandError::Message(format!("{} has no pending payout.", member.full_name))
        })?;
    PayoutService::complete(&mut snapshot.payouts, pot_id)?;
    output::success(format!("Payout to {} marked completed.", member.full_name));
    tracing::info!(group = %group.id, member = %member.id, pot = %pot_id, "payout completed");
    Ok(())
}

fn reschedule_payouts(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let start = parse_instant(required(args, 0, "start-date")?)?.date_naive();
    let group = context.active_group()?.clone();
    let rotation_days = match args.get(1) {
        Some(raw) => raw.parse::<u32>().map_err(|_| {
            CommandError::InvalidArguments(format!("`{raw}` is not a number of days."))
        })?,
        None => group.rotation_days,
    };

    let snapshot = context.snapshot_mut()?;
    let (mut pots, others): (Vec<PotDistribution>, Vec<PotDistribution>) = snapshot
        .payouts
        .drain(..)
        .partition(|pot| pot.group_id == group.id);
    let result = PayoutService::reschedule(&mut pots, start, rotation_days);
    let count = pots.len();
    snapshot.payouts = others;
    snapshot.payouts.extend(pots);
    result?;

    output::success(format!(
        "Moved {count} payout(s) to start {start}, every {rotation_days} day(s)."
    ));
    Ok(())
}
