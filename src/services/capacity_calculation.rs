use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::calendar::{calculate_working_days, count_pto_days_in_range};

#[derive(Debug, Clone, Copy)]
pub struct SprintCapacityInput<'a> {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub number_of_developers: u32,
    pub holidays: &'a [NaiveDate],
    pub pto_dates: &'a [NaiveDate],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SprintCapacity {
    pub working_days: u32,
    /// Person-days left after PTO. Never negative.
    pub capacity_days: f64,
}

pub fn calculate_sprint_capacity(input: &SprintCapacityInput<'_>) -> SprintCapacity {
    let working_days = calculate_working_days(input.start_date, input.end_date, input.holidays);
    let pto_days = count_pto_days_in_range(
        input.start_date,
        input.end_date,
        input.pto_dates,
        input.holidays,
    );

    let gross_days = i64::from(working_days) * i64::from(input.number_of_developers);
    let capacity_days = (gross_days - i64::from(pto_days)).max(0);

    SprintCapacity {
        working_days,
        capacity_days: capacity_days as f64,
    }
}

pub fn sum_capacities(results: &[SprintCapacity]) -> SprintCapacity {
    results
        .iter()
        .fold(SprintCapacity::default(), |acc, capacity| SprintCapacity {
            working_days: acc.working_days + capacity.working_days,
            capacity_days: acc.capacity_days + capacity.capacity_days,
        })
}
