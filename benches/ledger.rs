use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::tempdir;

use tontine::snapshot::Snapshot;
use tontine_core::{MemberStatusService, PaymentRequest, PaymentService, SummaryService};
use tontine_domain::{AttendanceRecord, AttendanceStatus, GroupConfig, LedgerRules, Member};

/// A year-old group of `member_count` members who paid four days out of five.
fn build_snapshot(member_count: usize) -> Snapshot {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let group = GroupConfig::new("Benchmark", 500, 200, start, 7).with_admin_fee(50);
    let members: Vec<Member> = (0..member_count)
        .map(|idx| Member::new(group.id, format!("Member {idx}"), start))
        .collect();

    let mut attendances = Vec::new();
    for member in &members {
        for offset in 0..365 {
            if offset % 5 == 4 {
                continue;
            }
            let date = start + Duration::days(offset);
            attendances.push(
                AttendanceRecord::new(member.id, date, AttendanceStatus::Paid)
                    .with_payments(500, 0, 50),
            );
        }
    }

    Snapshot {
        groups: vec![group],
        members,
        attendances,
        ..Snapshot::default()
    }
}

fn bench_calculations(c: &mut Criterion) {
    let snapshot = build_snapshot(30);
    let group = &snapshot.groups[0];
    let member = &snapshot.members[0];
    let rules = LedgerRules::default();
    let reference = Utc.with_ymd_and_hms(2026, 1, 1, 21, 0, 0).unwrap();

    c.bench_function("status_year_of_attendance", |b| {
        b.iter(|| {
            black_box(MemberStatusService::compute(
                member,
                group,
                &snapshot.attendances,
                reference,
                &rules,
            ))
        })
    });

    let request = PaymentRequest::new(member.id, 10_000_000);
    c.bench_function("waterfall_full_day_limit", |b| {
        b.iter(|| {
            black_box(PaymentService::simulate(
                &request,
                group,
                &[],
                reference,
                &rules,
            ))
        })
    });

    c.bench_function("daily_totals_30_members", |b| {
        b.iter(|| black_box(SummaryService::daily_totals(&snapshot.attendances)))
    });
}

fn bench_snapshot_io(c: &mut Criterion) {
    let snapshot = build_snapshot(30);
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("snapshot.json");

    c.bench_function("snapshot_save_30_members", |b| {
        b.iter(|| snapshot.save(&path).expect("save snapshot"))
    });

    snapshot.save(&path).expect("seed");

    c.bench_function("snapshot_load_30_members", |b| {
        b.iter(|| black_box(Snapshot::load(&path).expect("load snapshot")))
    });
}

criterion_group!(benches, bench_calculations, bench_snapshot_io);
criterion_main!(benches);
