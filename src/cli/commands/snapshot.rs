use std::path::PathBuf;

use tontine_core::MemberStatusService;
use tontine_domain::Displayable;

use crate::cli::commands::{parse_instant, required};
use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::snapshot::Snapshot;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("load", "Load a snapshot file", "load <path>", cmd_load),
        CommandEntry::new(
            "save",
            "Write the snapshot back to disk",
            "save [path]",
            cmd_save,
        ),
        CommandEntry::new(
            "group",
            "List groups or switch the active group",
            "group [name|id]",
            cmd_group,
        ),
        CommandEntry::new(
            "at",
            "Pin the reference instant used by calculations",
            "at <RFC3339|YYYY-MM-DD|now>",
            cmd_at,
        ),
        CommandEntry::new(
            "members",
            "List members of the active group, largest debt first",
            "members",
            cmd_members,
        ),
    ]
}

fn cmd_load(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = PathBuf::from(required(args, 0, "path")?);
    let snapshot = Snapshot::load(&path)?;
    output::success(format!(
        "Loaded {} group(s), {} member(s), {} attendance record(s) from {}.",
        snapshot.groups.len(),
        snapshot.members.len(),
        snapshot.attendances.len(),
        path.display()
    ));
    context.install_snapshot(snapshot, path.clone());
    if let Ok(group) = context.active_group() {
        output::info(format!("Active group: {}", group.name));
    }

    context.config.last_opened_snapshot = Some(path);
    context.persist_config()
}

fn cmd_save(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = match args.first() {
        Some(raw) => PathBuf::from(raw),
        None => context.snapshot_path.clone().ok_or_else(|| {
            CommandError::InvalidArguments("No snapshot path known. Use `save <path>`.".into())
        })?,
    };
    context.snapshot()?.save(&path)?;
    output::success(format!("Snapshot saved to {}.", path.display()));
    context.snapshot_path = Some(path);
    Ok(())
}

fn cmd_group(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let snapshot = context.snapshot()?;
    let Some(key) = args.first() else {
        output::section("Groups");
        for group in &snapshot.groups {
            let marker = if Some(group.id) == context.active_group { "*" } else { " " };
            output::line(format!(
                "{marker} {:<24} {} / day, started {}",
                group.name,
                context.money(group, group.daily_due()),
                group.start_date
            ));
        }
        return Ok(());
    };

    let group = snapshot
        .find_group(key)
        .ok_or_else(|| CommandError::InvalidArguments(format!("No group named `{key}`.")))?;
    let (id, name) = (group.id, group.name.clone());
    context.active_group = Some(id);
    output::success(format!("Active group: {name}"));
    Ok(())
}

fn cmd_at(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = required(args, 0, "instant")?;
    if raw.eq_ignore_ascii_case("now") {
        context.pinned_at = None;
        output::info("Calculations follow the system clock.");
        return Ok(());
    }
    let instant = parse_instant(raw)?;
    context.pinned_at = Some(instant);
    output::info(format!("Calculations pinned to {}.", instant.to_rfc3339()));
    Ok(())
}

fn cmd_members(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let snapshot = context.snapshot()?;
    let group = context.active_group()?;
    let overview = MemberStatusService::group_overview(
        group,
        &snapshot.members,
        &snapshot.attendances,
        context.clock().now(),
        &context.config.rules,
    );

    output::section(format!("{} ({} members)", group.name, overview.len()));
    for row in &overview {
        let suggestion = if row.status_changed() {
            format!(" -> {}", row.finance.status)
        } else {
            String::new()
        };
        output::line(format!(
            "  {:<32} {:>14}  late {:>3} day(s){}",
            row.member.display_label(),
            output::signed(
                row.finance.balance,
                context.money(group, row.finance.balance)
            ),
            row.finance.days_late,
            suggestion
        ));
    }
    Ok(())
}
