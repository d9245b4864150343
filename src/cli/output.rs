//! Styled terminal output for the command shell.

use std::fmt;

use colored::Colorize;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Hint,
    Section,
    /// Unprefixed rows, e.g. table lines.
    Plain,
}

/// Turns colour on or off for the whole process.
///
/// When enabled, `colored` still honours `NO_COLOR` and non-terminal stdout.
pub fn set_color_enabled(enabled: bool) {
    if enabled {
        colored::control::unset_override();
    } else {
        colored::control::set_override(false);
    }
}

pub(crate) fn render(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    match kind {
        MessageKind::Info => format!("[i] {text}"),
        MessageKind::Success => format!("[ok] {text}").bright_green().to_string(),
        MessageKind::Warning => format!("[!] {text}").bright_yellow().to_string(),
        MessageKind::Error => format!("[x] {text}").bright_red().to_string(),
        MessageKind::Hint => format!("    {text}").bright_cyan().to_string(),
        MessageKind::Section => format!("=== {} ===", text.trim()).bold().to_string(),
        MessageKind::Plain => text,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let rendered = render(kind, message);
    match kind {
        MessageKind::Section => println!("\n{rendered}"),
        _ => println!("{rendered}"),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn hint(message: impl fmt::Display) {
    print(MessageKind::Hint, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

pub fn line(message: impl fmt::Display) {
    print(MessageKind::Plain, message);
}

/// Balance rendered red when negative and green when positive.
pub fn signed(amount: i64, label: String) -> String {
    match amount {
        a if a < 0 => label.red().to_string(),
        a if a > 0 => label.green().to_string(),
        _ => label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_rendering_without_colour() {
        set_color_enabled(false);
        assert_eq!(render(MessageKind::Info, "loaded"), "[i] loaded");
        assert_eq!(render(MessageKind::Error, "boom"), "[x] boom");
        assert_eq!(render(MessageKind::Section, " Members "), "=== Members ===");
        assert_eq!(render(MessageKind::Plain, "row"), "row");
        assert_eq!(signed(-5, "-5 F".into()), "-5 F");
    }
}
