use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tontine_domain::LedgerRules;

use crate::ConfigError;

/// Keys accepted by [`Config::set`], in display order.
pub const CONFIG_KEYS: &[&str] = &[
    "locale",
    "currency",
    "ui_color_enabled",
    "last_opened_snapshot",
    "default_snapshot_root",
    "rules.due_cutoff_hour",
    "rules.alert_after_days",
    "rules.exclusion_after_days",
    "rules.simulation_day_limit",
];

/// Stores user-configurable preferences and the ledger rules used by the calculators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_locale")]
    pub locale: String,
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_opened_snapshot: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for snapshots. Defaults to `~/Documents/Tontine`.
    pub default_snapshot_root: Option<PathBuf>,

    #[serde(default)]
    pub rules: LedgerRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: Self::default_locale(),
            currency: Self::default_currency(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            last_opened_snapshot: None,
            default_snapshot_root: None,
            rules: LedgerRules::default(),
        }
    }
}

impl Config {
    pub fn default_locale() -> String {
        "fr-FR".into()
    }

    pub fn default_currency() -> String {
        "F".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn resolve_default_snapshot_root(&self) -> PathBuf {
        if let Some(path) = &self.default_snapshot_root {
            return path.clone();
        }

        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("Tontine")
    }

    /// Current value of `key` rendered as text, `None` for unknown keys.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "locale" => self.locale.clone(),
            "currency" => self.currency.clone(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            "last_opened_snapshot" => display_path(self.last_opened_snapshot.as_ref()),
            "default_snapshot_root" => display_path(self.default_snapshot_root.as_ref()),
            "rules.due_cutoff_hour" => self.rules.due_cutoff_hour.to_string(),
            "rules.alert_after_days" => self.rules.alert_after_days.to_string(),
            "rules.exclusion_after_days" => self.rules.exclusion_after_days.to_string(),
            "rules.simulation_day_limit" => self.rules.simulation_day_limit.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Updates `key` from its textual form. An empty value clears optional paths.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "locale" if !value.is_empty() => self.locale = value.to_string(),
            "currency" if !value.is_empty() => self.currency = value.to_string(),
            "locale" | "currency" => return Err(invalid()),
            "ui_color_enabled" => self.ui_color_enabled = parse_bool(value).ok_or_else(invalid)?,
            "last_opened_snapshot" => self.last_opened_snapshot = optional_path(value),
            "default_snapshot_root" => self.default_snapshot_root = optional_path(value),
            "rules.due_cutoff_hour" => {
                let hour: u32 = value.parse().map_err(|_| invalid())?;
                if hour > 24 {
                    return Err(invalid());
                }
                self.rules.due_cutoff_hour = hour;
            }
            "rules.alert_after_days" => {
                self.rules.alert_after_days = parse_positive(value).ok_or_else(invalid)?
            }
            "rules.exclusion_after_days" => {
                self.rules.exclusion_after_days = parse_positive(value).ok_or_else(invalid)?
            }
            "rules.simulation_day_limit" => {
                self.rules.simulation_day_limit = value.parse().map_err(|_| invalid())?
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Every key with its current value, in [`CONFIG_KEYS`] order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }
}

fn display_path(path: Option<&PathBuf>) -> String {
    path.map(|path| path.display().to_string())
        .unwrap_or_default()
}

fn optional_path(value: &str) -> Option<PathBuf> {
    (!value.is_empty()).then(|| PathBuf::from(value))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn parse_positive(value: &str) -> Option<i64> {
    value.parse::<i64>().ok().filter(|days| *days > 0)
}
