use chrono::NaiveDate;

use crate::domain::calendar::MAX_SPRINT_PERIODS;

#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseConfig {
    /// First day of the release, inclusive.
    pub release_start: NaiveDate,
    /// Last day of the release, inclusive.
    pub release_end: NaiveDate,
    pub sprint_length_days: u32,
    pub number_of_developers: u32,
    pub holidays: Vec<NaiveDate>,
    /// One entry per person per day off, across the whole team.
    pub pto_dates: Vec<NaiveDate>,
    pub max_sprints: usize,
}

impl ReleaseConfig {
    pub fn new(
        release_start: NaiveDate,
        release_end: NaiveDate,
        sprint_length_days: u32,
        number_of_developers: u32,
    ) -> Self {
        Self {
            release_start,
            release_end,
            sprint_length_days,
            number_of_developers,
            holidays: Vec::new(),
            pto_dates: Vec::new(),
            max_sprints: MAX_SPRINT_PERIODS,
        }
    }
}
