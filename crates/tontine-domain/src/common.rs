//! Shared traits and scalar types for tontine records.

use uuid::Uuid;

/// Whole currency units. Tontine currencies carry no fractional unit.
pub type Amount = i64;

/// Exposes a stable identifier for stored records.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Formats an amount with a thousands separator and the currency suffix, e.g. `12 500 F`.
pub fn format_amount(amount: Amount, currency: &str) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0 { "-" } else { "" };
    if currency.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped} {currency}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_amount_groups_thousands() {
        assert_eq!(format_amount(0, "F"), "0 F");
        assert_eq!(format_amount(750, "F"), "750 F");
        assert_eq!(format_amount(220000, "F"), "220 000 F");
        assert_eq!(format_amount(-1500, "F"), "-1 500 F");
        assert_eq!(format_amount(1234567, ""), "1 234 567");
    }
}
