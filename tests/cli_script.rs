mod common;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::{tempdir, TempDir};

use tontine_domain::AttendanceStatus;

const BIN: &str = "tontine_cli";

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BIN).expect("binary exists");
    cmd.env("TONTINE_CLI_SCRIPT", "1")
        .env("TONTINE_HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_commands() {
    let home = tempdir().unwrap();
    cli(&home)
        .write_stdin("help\nhelp simulate\nexit\n")
        .assert()
        .success()
        .stdout(contains("Available commands"))
        .stdout(contains("dashboard"))
        .stdout(contains("Usage: simulate <member> <amount> [wallet]"));
}

#[test]
fn typo_gets_a_suggestion() {
    let home = tempdir().unwrap();
    cli(&home)
        .write_stdin("stauts\nexit\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `stauts`"))
        .stdout(contains("Suggestion: `status`?"));
}

#[test]
fn commands_need_a_snapshot() {
    let home = tempdir().unwrap();
    cli(&home)
        .write_stdin("status Awa\nexit\n")
        .assert()
        .success()
        .stdout(contains("No snapshot loaded."));
}

#[test]
fn status_after_the_evening_cutoff() {
    let home = tempdir().unwrap();
    let path = common::write_sample(&home);
    let script = format!(
        "load {}\nat 2026-02-08T22:00:00Z\nstatus \"awa diop\"\nexit\n",
        path.display()
    );

    cli(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Loaded 1 group(s), 2 member(s)"))
        .stdout(contains("Days late         : 2 (2 penalised)"))
        .stdout(contains("Balance           : -1 500 F"))
        .stdout(contains("Unpaid dues       : 1 100 F"))
        .stdout(contains("Unpaid penalties  : 400 F"));
}

#[test]
fn simulate_reports_where_the_waterfall_stopped() {
    let home = tempdir().unwrap();
    let path = common::write_sample(&home);
    let script = format!(
        "load {}\nat 2026-02-08T10:00:00Z\nsimulate \"Awa Diop\" 600\nexit\n",
        path.display()
    );

    cli(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Remaining : 350 F"))
        .stdout(contains("0 contribution(s), 1 penalty(ies), 1 fee(s)"))
        .stdout(contains("Stopped on 2026-02-07: the contribution costs 500 F"));
}

#[test]
fn settle_then_save_writes_the_payment_back() {
    let home = tempdir().unwrap();
    let path = common::write_sample(&home);
    let script = format!(
        "load {}\nat 2026-02-08T10:00:00Z\nsettle \"Awa Diop\" 750\nsave\nexit\n",
        path.display()
    );

    cli(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Recorded 1 day(s) for Awa Diop; wallet now 0 F."))
        .stdout(contains("Snapshot saved"));

    let snapshot = common::read_snapshot(&path);
    let awa = snapshot
        .members
        .iter()
        .find(|member| member.full_name == "Awa Diop")
        .expect("member kept");
    let record = snapshot
        .attendances
        .iter()
        .find(|record| record.member_id == awa.id)
        .expect("attendance written");
    assert_eq!(record.date, common::day(2, 7));
    assert_eq!(record.status, AttendanceStatus::Paid);
    assert_eq!(record.total_paid(), 750);
}

#[test]
fn reports_for_the_active_group() {
    let home = tempdir().unwrap();
    let path = common::write_sample(&home);
    let script = format!(
        "load {}\nat 2026-02-07T21:00:00Z\ndaily\ndashboard\npayouts\nmembers\nexit\n",
        path.display()
    );

    cli(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Daily collections: Marche Sandaga"))
        .stdout(contains("550 F"))
        .stdout(contains("Session validated : yes"))
        .stdout(contains("Pot               : 7 000 F"))
        .stdout(contains("2026-02-14  Awa Diop"))
        .stdout(contains("<- next"))
        .stdout(contains("Awa Diop [Active]"));
}

#[test]
fn rescheduled_payouts_start_on_the_first_rotation_day() {
    let home = tempdir().unwrap();
    let path = common::write_sample(&home);
    let script = format!(
        "load {}
at 2026-02-20T10:00:00Z
payouts generate
payouts reschedule 2026-03-01 7
payouts
exit
",
        path.display()
    );

    cli(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Scheduled 2 payout(s) for Marche Sandaga."))
        .stdout(contains("Moved 2 payout(s) to start 2026-03-01, every 7 day(s)."))
        .stdout(contains("2026-03-07  Awa Diop"))
        .stdout(contains("2026-03-14  Binta Ndiaye"));
}

#[test]
fn config_changes_are_persisted() {
    let home = tempdir().unwrap();
    cli(&home)
        .write_stdin("config rules.alert_after_days 3\nconfig rules.alert_after_days\nconfig theme dark\nexit\n")
        .assert()
        .success()
        .stdout(contains("rules.alert_after_days updated."))
        .stdout(contains("rules.alert_after_days = 3"))
        .stdout(contains("Unknown configuration key `theme`"));

    let saved = std::fs::read_to_string(home.path().join("config").join("config.json"))
        .expect("config written");
    assert!(saved.contains("\"alert_after_days\": 3"));
}

#[test]
fn version_shows_schema() {
    let home = tempdir().unwrap();
    cli(&home)
        .write_stdin("version\n")
        .assert()
        .success()
        .stdout(contains("Snapshot schema: v1"));
}

#[test]
fn config_backups_can_be_listed_and_restored() {
    let home = tempdir().unwrap();
    cli(&home)
        .write_stdin("backup Before rules\nbackup list\nexit\n")
        .assert()
        .success()
        .stdout(contains("Configuration backed up as config_"))
        .stdout(contains("_before-rules.json"));

    let backups = home.path().join("config").join("backups");
    let name = std::fs::read_dir(&backups)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .find(|name| name.ends_with("_before-rules.json"))
        .expect("backup file");

    cli(&home)
        .write_stdin(format!(
            "config currency XOF\nbackup restore {name}\nconfig currency\nexit\n"
        ))
        .assert()
        .success()
        .stdout(contains(format!("Configuration restored from {name}.")))
        .stdout(contains("currency = F"));
}
