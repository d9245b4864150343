//! Upstream checks for group configuration.
//!
//! The calculators accept any `GroupConfig` and clamp rather than fail; callers
//! that load configuration from storage run it through [`validate_group`] first.

use tontine_domain::GroupConfig;

use crate::CoreError;

/// Rejects configurations the ledger cannot meaningfully evaluate.
pub fn validate_group(group: &GroupConfig) -> Result<(), CoreError> {
    if group.contribution_amount <= 0 {
        return Err(CoreError::InvalidConfiguration(format!(
            "contribution amount must be positive, got {}",
            group.contribution_amount
        )));
    }
    if group.admin_fee() < 0 {
        return Err(CoreError::InvalidConfiguration(format!(
            "admin fee cannot be negative, got {}",
            group.admin_fee()
        )));
    }
    if group.penalty_per_day < 0 {
        return Err(CoreError::InvalidConfiguration(format!(
            "penalty per day cannot be negative, got {}",
            group.penalty_per_day
        )));
    }
    if group.rotation_days == 0 {
        return Err(CoreError::InvalidConfiguration(
            "rotation must last at least one day".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn group() -> GroupConfig {
        let start = NaiveDate::from_ymd_opt(2026, 2, 7).unwrap();
        GroupConfig::new("Validation", 500, 200, start, 7).with_admin_fee(50)
    }

    #[test]
    fn accepts_well_formed_group() {
        validate_group(&group()).expect("valid group");
    }

    #[test]
    fn rejects_non_positive_contribution() {
        let mut cfg = group();
        cfg.contribution_amount = 0;
        let err = validate_group(&cfg).expect_err("zero contribution must fail");
        assert!(
            matches!(err, CoreError::InvalidConfiguration(ref message) if message.contains("contribution")),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn rejects_negative_fee_penalty_and_empty_rotation() {
        let mut cfg = group();
        cfg.admin_fee = Some(-1);
        assert!(validate_group(&cfg).is_err());

        let mut cfg = group();
        cfg.penalty_per_day = -5;
        assert!(validate_group(&cfg).is_err());

        let mut cfg = group();
        cfg.rotation_days = 0;
        assert!(validate_group(&cfg).is_err());
    }
}
