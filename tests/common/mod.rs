#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::TempDir;

use tontine::snapshot::Snapshot;
use tontine_domain::{AttendanceRecord, AttendanceStatus, GroupConfig, Member};

pub fn day(month: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, d).expect("valid date")
}

/// One group started on 2026-02-07: Awa has paid nothing, Binta paid the first day.
pub fn sample_snapshot() -> Snapshot {
    let group = GroupConfig::new("Marche Sandaga", 500, 200, day(2, 7), 7).with_admin_fee(50);
    let awa = Member::new(group.id, "Awa Diop", group.start_date);
    let binta = Member::new(group.id, "Binta Ndiaye", group.start_date);
    let paid = AttendanceRecord::new(binta.id, day(2, 7), AttendanceStatus::Paid)
        .with_payments(500, 0, 50);

    Snapshot {
        groups: vec![group],
        members: vec![awa, binta],
        attendances: vec![paid],
        ..Snapshot::default()
    }
}

/// Writes the sample snapshot into a fresh temp dir, which also serves as `TONTINE_HOME`.
pub fn write_sample(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("sandaga.json");
    sample_snapshot().save(&path).expect("save sample snapshot");
    path
}

pub fn read_snapshot(path: &Path) -> Snapshot {
    Snapshot::load(path).expect("reload snapshot")
}
