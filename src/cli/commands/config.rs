use tontine_config::ConfigError;

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "config",
            "Show or change preferences and ledger rules",
            "config [key [value]]",
            cmd_config,
        ),
        CommandEntry::new(
            "backup",
            "Back up, list or restore the configuration",
            "backup [note] | backup list | backup restore <name>",
            cmd_backup,
        ),
    ]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            output::section("Configuration");
            for (key, value) in context.config.entries() {
                let shown = if value.is_empty() { "-" } else { value.as_str() };
                output::line(format!("  {key:<28} {shown}"));
            }
            output::line(format!(
                "  {:<28} {}",
                "file",
                context.config_manager.config_path().display()
            ));
            Ok(())
        }
        [key] => {
            let value = context
                .config
                .get(key)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
            output::line(format!("  {key} = {value}"));
            Ok(())
        }
        [key, value] => {
            let previous = context.config.clone();
            context.config.set(key, value)?;
            if let Err(err) = context.persist_config() {
                context.config = previous;
                return Err(err);
            }
            if *key == "ui_color_enabled" {
                output::set_color_enabled(context.config.ui_color_enabled);
            }
            output::success(format!("{key} updated."));
            Ok(())
        }
        _ => Err(CommandError::InvalidArguments(
            "Usage: config [key [value]]".into(),
        )),
    }
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        ["list"] => {
            let backups = context.config_manager.list_backups()?;
            output::section("Configuration backups");
            if backups.is_empty() {
                output::info("No backups yet. Use `backup [note]` to create one.");
            }
            for name in backups {
                output::line(format!("  {name}"));
            }
            Ok(())
        }
        ["restore", name] => {
            let restored = context.config_manager.restore(name)?;
            context.config = restored;
            context.persist_config()?;
            output::set_color_enabled(context.config.ui_color_enabled);
            output::success(format!("Configuration restored from {name}."));
            Ok(())
        }
        ["restore"] => Err(CommandError::InvalidArguments("Missing <name>.".into())),
        _ => {
            let note = args.join(" ");
            let note = (!note.trim().is_empty()).then_some(note);
            let name = context
                .config_manager
                .backup(&context.config, note.as_deref())?;
            output::success(format!("Configuration backed up as {name}."));
            Ok(())
        }
    }
}
