//! A member's own payment history, filtered by period and grouped by month.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use tontine_domain::{Amount, AttendanceRecord};

use crate::CoreError;

/// Period selector for history queries. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryWindow {
    All,
    /// The `days` days up to and including `until`. `days` must be at least one.
    LastDays { days: u32, until: NaiveDate },
    Month { year: i32, month: u32 },
    Custom {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },
}

impl HistoryWindow {
    /// Resolves the window into inclusive `(start, end)` bounds.
    pub fn bounds(&self) -> Result<(Option<NaiveDate>, Option<NaiveDate>), CoreError> {
        match *self {
            HistoryWindow::All => Ok((None, None)),
            HistoryWindow::LastDays { days: 0, .. } => Err(CoreError::InvalidOperation(
                "a history window needs at least one day".into(),
            )),
            HistoryWindow::LastDays { days, until } => {
                let start = until
                    .checked_sub_days(Days::new(u64::from(days - 1)))
                    .ok_or_else(|| {
                        CoreError::InvalidOperation(format!(
                            "{days} days before {until} is out of range"
                        ))
                    })?;
                Ok((Some(start), Some(until)))
            }
            HistoryWindow::Month { year, month } => {
                let invalid =
                    || CoreError::InvalidOperation(format!("invalid month {year}-{month:02}"));
                let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
                let next = if month == 12 {
                    NaiveDate::from_ymd_opt(year + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(year, month + 1, 1)
                }
                .ok_or_else(invalid)?;
                Ok((Some(first), next.pred_opt()))
            }
            HistoryWindow::Custom { start, end } => {
                if let (Some(start), Some(end)) = (start, end) {
                    if start > end {
                        return Err(CoreError::InvalidOperation(format!(
                            "window start {start} is after end {end}"
                        )));
                    }
                }
                Ok((start, end))
            }
        }
    }

    fn contains(bounds: (Option<NaiveDate>, Option<NaiveDate>), date: NaiveDate) -> bool {
        bounds.0.map_or(true, |start| date >= start) && bounds.1.map_or(true, |end| date <= end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberHistory {
    /// Matching records, most recent first.
    pub entries: Vec<AttendanceRecord>,
    pub total_contributed: Amount,
    pub total_penalties: Amount,
    pub total_fees: Amount,
    pub transaction_count: usize,
    /// Entries keyed by `YYYY-MM`.
    pub by_month: BTreeMap<String, Vec<AttendanceRecord>>,
}

pub struct HistoryService;

impl HistoryService {
    pub fn member_history(
        member_id: Uuid,
        attendances: &[AttendanceRecord],
        window: HistoryWindow,
    ) -> Result<MemberHistory, CoreError> {
        let bounds = window.bounds()?;
        let mut entries: Vec<AttendanceRecord> = attendances
            .iter()
            .filter(|record| record.member_id == member_id)
            .filter(|record| HistoryWindow::contains(bounds, record.date))
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.date.cmp(&a.date));

        let mut by_month: BTreeMap<String, Vec<AttendanceRecord>> = BTreeMap::new();
        for record in &entries {
            let key = format!("{}-{:02}", record.date.year(), record.date.month());
            by_month.entry(key).or_default().push(record.clone());
        }

        Ok(MemberHistory {
            total_contributed: entries.iter().map(|record| record.amount_paid).sum(),
            total_penalties: entries.iter().map(|record| record.penalty_paid).sum(),
            total_fees: entries.iter().map(|record| record.fee_paid).sum(),
            transaction_count: entries.len(),
            entries,
            by_month,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tontine_domain::AttendanceStatus;

    fn day(month: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, d).unwrap()
    }

    fn records(member_id: Uuid) -> Vec<AttendanceRecord> {
        let record = |member, date, status, penalty| {
            AttendanceRecord::new(member, date, status).with_payments(500, penalty, 50)
        };
        vec![
            record(member_id, day(1, 30), AttendanceStatus::Paid, 0),
            record(member_id, day(2, 2), AttendanceStatus::Late, 200),
            record(member_id, day(2, 9), AttendanceStatus::Paid, 0),
            record(Uuid::new_v4(), day(2, 9), AttendanceStatus::Paid, 0),
        ]
    }

    #[test]
    fn history_filters_member_sorts_descending_and_groups_by_month() {
        let member_id = Uuid::new_v4();
        let history =
            HistoryService::member_history(member_id, &records(member_id), HistoryWindow::All)
                .expect("history");

        assert_eq!(history.transaction_count, 3);
        assert_eq!(history.entries[0].date, day(2, 9));
        assert_eq!(history.entries[2].date, day(1, 30));
        assert_eq!(history.total_contributed, 1500);
        assert_eq!(history.total_penalties, 200);
        assert_eq!(history.total_fees, 150);
        assert_eq!(history.by_month.len(), 2);
        assert_eq!(history.by_month["2026-02"].len(), 2);
        assert_eq!(history.by_month["2026-01"].len(), 1);
    }

    #[test]
    fn month_window_keeps_only_that_month() {
        let member_id = Uuid::new_v4();
        let window = HistoryWindow::Month { year: 2026, month: 2 };
        let history = HistoryService::member_history(member_id, &records(member_id), window).unwrap();
        assert_eq!(history.transaction_count, 2);
        assert_eq!(window.bounds().unwrap(), (Some(day(2, 1)), Some(day(2, 28))));
    }

    #[test]
    fn last_days_window_is_inclusive() {
        let member_id = Uuid::new_v4();
        let window = HistoryWindow::LastDays { days: 7, until: day(2, 9) };
        assert_eq!(window.bounds().unwrap(), (Some(day(2, 3)), Some(day(2, 9))));
        let history = HistoryService::member_history(member_id, &records(member_id), window).unwrap();
        assert_eq!(history.transaction_count, 1);
        assert_eq!(history.entries[0].date, day(2, 9));

        let single = HistoryWindow::LastDays { days: 1, until: day(2, 9) };
        assert_eq!(single.bounds().unwrap(), (Some(day(2, 9)), Some(day(2, 9))));
        let history = HistoryService::member_history(member_id, &records(member_id), single).unwrap();
        assert_eq!(history.transaction_count, 1);

        let wider = HistoryWindow::LastDays { days: 8, until: day(2, 9) };
        let history = HistoryService::member_history(member_id, &records(member_id), wider).unwrap();
        assert_eq!(history.transaction_count, 2);
        assert_eq!(history.entries.last().unwrap().date, day(2, 2));
    }

    #[test]
    fn zero_day_window_is_rejected() {
        let window = HistoryWindow::LastDays { days: 0, until: day(2, 9) };
        let err = HistoryService::member_history(Uuid::new_v4(), &[], window)
            .expect_err("empty window");
        assert!(matches!(err, CoreError::InvalidOperation(_)));
    }

    #[test]
    fn inverted_custom_window_is_rejected() {
        let window = HistoryWindow::Custom {
            start: Some(day(3, 1)),
            end: Some(day(2, 1)),
        };
        let err = HistoryService::member_history(Uuid::new_v4(), &[], window)
            .expect_err("inverted window must fail");
        assert!(matches!(err, CoreError::InvalidOperation(_)), "unexpected error: {err:?}");
    }
}
