//! Daily created/completed activity series.
//!
//! Creation and completion are two independent timelines: a task created on
//! Monday and completed on Wednesday counts once on each day. Both scans
//! bucket by calendar date in the reporting timezone and are merged over a
//! zero-filled range so every day in the window is present.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use taskdeck_commons::Task;

/// One row of the series, serialized as `{"date":"YYYY-MM-DD","created":n,"completed":n}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub created: u32,
    pub completed: u32,
}

fn local_date(instant: DateTime<Utc>, offset: FixedOffset) -> NaiveDate {
    instant.with_timezone(&offset).date_naive()
}

/// First date of the window. With `lookback_days == 0` this is tomorrow,
/// which makes the range empty.
fn first_day(today: NaiveDate, lookback_days: u32) -> NaiveDate {
    today - Duration::days(i64::from(lookback_days) - 1)
}

/// UTC instant of local midnight on the first day of the window.
///
/// Every task that can contribute to [`build_series`] was created or
/// completed at or after this instant, so it bounds the storage query.
pub fn window_start(now: DateTime<Utc>, lookback_days: u32, offset: FixedOffset) -> DateTime<Utc> {
    let first = first_day(local_date(now, offset), lookback_days);
    let local_midnight = first.and_time(NaiveTime::MIN);
    Utc.from_utc_datetime(&(local_midnight - Duration::seconds(i64::from(offset.local_minus_utc()))))
}

/// Build the per-day series for `[today - (lookback_days - 1), today]`,
/// ascending by date.
pub fn build_series(
    tasks: &[Task],
    lookback_days: u32,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> Vec<DailyActivity> {
    if lookback_days == 0 {
        return Vec::new();
    }

    let today = local_date(now, offset);
    let first = first_day(today, lookback_days);
    let in_range = |date: &NaiveDate| *date >= first && *date <= today;

    let mut created: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for date in tasks.iter().map(|t| local_date(t.created_at, offset)).filter(in_range) {
        *created.entry(date).or_default() += 1;
    }

    let mut completed: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    let completions = tasks
        .iter()
        .filter(|t| t.status.is_completed())
        .filter_map(|t| t.completed_at)
        .map(|at| local_date(at, offset))
        .filter(in_range);
    for date in completions {
        *completed.entry(date).or_default() += 1;
    }

    first
        .iter_days()
        .take(lookback_days as usize)
        .map(|date| DailyActivity {
            date,
            created: created.get(&date).copied().unwrap_or(0),
            completed: completed.get(&date).copied().unwrap_or(0),
        })
        .collect()
}
