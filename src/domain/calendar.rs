use std::collections::HashSet;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::Serialize;

/// Upper bound on the number of sprint periods generated for one release.
///
/// This guards against runaway iteration on malformed configuration (for
/// example a multi-decade window with one-day sprints). It is not a business
/// rule; callers that need more periods can pass their own limit to
/// [`generate_sprint_periods_with_limit`].
pub const MAX_SPRINT_PERIODS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SprintPeriod {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn is_holiday(date: NaiveDate, holidays: &[NaiveDate]) -> bool {
    holidays.contains(&date)
}

/// Counts weekdays in `[start, end]` that are not holidays.
pub fn calculate_working_days(start: NaiveDate, end: NaiveDate, holidays: &[NaiveDate]) -> u32 {
    if start > end {
        return 0;
    }

    let holidays: HashSet<NaiveDate> = holidays.iter().copied().collect();
    start
        .iter_days()
        .take_while(|date| *date <= end)
        .filter(|date| !is_weekend(*date) && !holidays.contains(date))
        .count() as u32
}

/// Counts PTO entries inside `[start, end]` that land on a working day.
///
/// PTO on a weekend or a holiday is ignored since that day is already
/// excluded from capacity. Each entry is one person-day, so a date listed
/// twice counts twice.
pub fn count_pto_days_in_range(
    start: NaiveDate,
    end: NaiveDate,
    pto_dates: &[NaiveDate],
    holidays: &[NaiveDate],
) -> u32 {
    if start > end {
        return 0;
    }

    let holidays: HashSet<NaiveDate> = holidays.iter().copied().collect();
    pto_dates
        .iter()
        .filter(|date| **date >= start && **date <= end)
        .filter(|date| !is_weekend(**date) && !holidays.contains(date))
        .count() as u32
}

pub fn generate_sprint_periods(
    release_start: NaiveDate,
    release_end: NaiveDate,
    sprint_length_days: u32,
) -> Vec<SprintPeriod> {
    generate_sprint_periods_with_limit(
        release_start,
        release_end,
        sprint_length_days,
        MAX_SPRINT_PERIODS,
    )
}

/// Splits `[release_start, release_end]` into back-to-back periods of
/// `sprint_length_days` calendar days. The last period is cut at
/// `release_end`. Stops after `max_periods` periods with a warning.
pub fn generate_sprint_periods_with_limit(
    release_start: NaiveDate,
    release_end: NaiveDate,
    sprint_length_days: u32,
    max_periods: usize,
) -> Vec<SprintPeriod> {
    if release_start > release_end || sprint_length_days == 0 {
        return Vec::new();
    }

    let mut periods = Vec::new();
    let mut current = Some(release_start);

    while let Some(start_date) = current.filter(|date| *date <= release_end) {
        if periods.len() >= max_periods {
            tracing::warn!(
                max_periods,
                %start_date,
                %release_end,
                "sprint period limit reached before the end of the release"
            );
            break;
        }

        let end_date = start_date
            .checked_add_days(Days::new(u64::from(sprint_length_days) - 1))
            .map_or(release_end, |date| date.min(release_end));
        periods.push(SprintPeriod {
            start_date,
            end_date,
        });
        current = end_date.succ_opt();
    }

    periods
}
