pub mod config;
pub mod ledger;
pub mod report;
pub mod snapshot;
pub mod system;

use chrono::{DateTime, NaiveDate, Utc};

use tontine_domain::Amount;

use crate::cli::context::CommandError;
use crate::cli::registry::CommandRegistry;

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in system::definitions()
        .into_iter()
        .chain(snapshot::definitions())
        .chain(ledger::definitions())
        .chain(report::definitions())
        .chain(config::definitions())
    {
        registry.register(entry);
    }
}

/// Returns the argument at `index`, or a usage error naming it.
pub(crate) fn required<'a>(
    args: &[&'a str],
    index: usize,
    name: &str,
) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("Missing <{name}>.")))
}

/// Parses a whole amount; `_` and spaces are accepted as thousands separators.
pub(crate) fn parse_amount(raw: &str) -> Result<Amount, CommandError> {
    let cleaned: String = raw.chars().filter(|ch| !matches!(ch, '_' | ' ')).collect();
    cleaned
        .parse::<Amount>()
        .map_err(|_| CommandError::InvalidArguments(format!("`{raw}` is not a whole amount.")))
}

/// Accepts RFC 3339 instants or bare `YYYY-MM-DD` dates (midnight UTC).
pub(crate) fn parse_instant(raw: &str) -> Result<DateTime<Utc>, CommandError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "`{raw}` is not an RFC 3339 instant (e.g. 2026-02-08T22:00:00Z) or a date."
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn amounts_accept_separators() {
        assert_eq!(parse_amount("2_000").unwrap(), 2000);
        assert_eq!(parse_amount("-15").unwrap(), -15);
        assert!(matches!(parse_amount("12.5"), Err(CommandError::InvalidArguments(_))));
    }

    #[test]
    fn instants_are_normalised_to_utc() {
        let instant = parse_instant("2026-02-08T23:30:00+01:00").unwrap();
        assert_eq!(instant, Utc.with_ymd_and_hms(2026, 2, 8, 22, 30, 0).unwrap());

        let midnight = parse_instant("2026-02-08").unwrap();
        assert_eq!(midnight.hour(), 0);
        assert!(parse_instant("yesterday").is_err());
    }

    #[test]
    fn required_names_the_missing_argument() {
        let err = required(&["a"], 1, "amount").unwrap_err();
        assert_eq!(err.to_string(), "Missing <amount>.");
    }
}
