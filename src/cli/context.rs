//! Shell state and error plumbing shared by every command handler.

use std::{io, path::PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use tontine_config::{Config, ConfigError, ConfigManager};
use tontine_core::{public_api::api_find_member, Clock, CoreError, FixedClock, SystemClock};
use tontine_domain::{format_amount, Amount, GroupConfig, Member};

use crate::cli::{commands, output, registry::CommandRegistry};
use crate::errors::TontineError;
use crate::snapshot::Snapshot;
use crate::utils::app_data_dir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Fatal errors that stop the shell itself.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors reported back to the user; the shell keeps running after them.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("No snapshot loaded. Use `load <path>` first.")]
    SnapshotNotLoaded,
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Tontine(#[from] TontineError),
    #[error("exit requested")]
    ExitRequested,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub snapshot: Option<Snapshot>,
    pub snapshot_path: Option<PathBuf>,
    pub active_group: Option<Uuid>,
    /// Reference instant pinned with `at`; `None` follows the system clock.
    pub pinned_at: Option<DateTime<Utc>>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(app_data_dir())?;
        let config = config_manager.load()?;
        output::set_color_enabled(config.ui_color_enabled);

        let mut context = ShellContext {
            mode,
            registry,
            config_manager,
            config,
            snapshot: None,
            snapshot_path: None,
            active_group: None,
            pinned_at: None,
            last_command: None,
            running: true,
        };
        context.auto_load_last();
        Ok(context)
    }

    /// Reopens the last snapshot in interactive sessions. Scripts always start empty.
    fn auto_load_last(&mut self) {
        if self.mode != CliMode::Interactive {
            return;
        }
        let Some(path) = self.config.last_opened_snapshot.clone() else {
            return;
        };
        match Snapshot::load(&path) {
            Ok(snapshot) => self.install_snapshot(snapshot, path),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "could not reopen last snapshot");
                output::warning(format!(
                    "Could not reopen `{}`: {err}",
                    path.display()
                ));
            }
        }
    }

    pub(crate) fn prompt(&self) -> String {
        match self.active_group().ok() {
            Some(group) => format!("tontine({})> ", group.name),
            None => "tontine> ".to_string(),
        }
    }

    pub(crate) fn install_snapshot(&mut self, snapshot: Snapshot, path: PathBuf) {
        self.active_group = snapshot.groups.first().map(|group| group.id);
        self.snapshot = Some(snapshot);
        self.snapshot_path = Some(path);
    }

    pub(crate) fn clock(&self) -> Box<dyn Clock> {
        match self.pinned_at {
            Some(instant) => Box::new(FixedClock(instant)),
            None => Box::new(SystemClock),
        }
    }

    pub(crate) fn snapshot(&self) -> Result<&Snapshot, CommandError> {
        self.snapshot.as_ref().ok_or(CommandError::SnapshotNotLoaded)
    }

    pub(crate) fn snapshot_mut(&mut self) -> Result<&mut Snapshot, CommandError> {
        self.snapshot.as_mut().ok_or(CommandError::SnapshotNotLoaded)
    }

    pub(crate) fn active_group(&self) -> Result<&GroupConfig, CommandError> {
        let snapshot = self.snapshot()?;
        let id = self.active_group.ok_or_else(|| {
            CommandError::Message("The snapshot has no group. Use `group <name>`.".into())
        })?;
        Ok(snapshot.group(id)?)
    }

    /// Looks a member up by id or full name, together with their group.
    pub(crate) fn resolve_member(&self, key: &str) -> Result<(Member, GroupConfig), CommandError> {
        let snapshot = self.snapshot()?;
        let member = api_find_member(&snapshot.members, key)?.clone();
        let group = snapshot.group(member.group_id)?.clone();
        Ok((member, group))
    }

    pub(crate) fn money(&self, group: &GroupConfig, amount: Amount) -> String {
        let currency = if group.currency.is_empty() {
            self.config.currency.as_str()
        } else {
            group.currency.as_str()
        };
        format_amount(amount, currency)
    }

    pub(crate) fn persist_config(&self) -> Result<(), CommandError> {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(best) = self.registry.closest(input) {
            output::info(format!("Suggestion: `{best}`?"));
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::SnapshotNotLoaded => {
                output::error("No snapshot loaded.");
                output::hint("Try `load <path/to/snapshot.json>` to get started.");
            }
            other => output::error(other),
        }
    }
}
