use chrono::NaiveDate;

use crate::domain::release::ReleaseConfig;
use crate::domain::ticket::TicketInput;

pub fn on_date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn build_ticket(id: &str, priority: i32, effort_days: f64) -> TicketInput {
    let mut ticket = TicketInput::new(id, effort_days, priority);
    ticket.title = format!("Ticket {id}");
    ticket.epic = "Core".to_string();
    ticket
}

/// Mon 2025-01-06 to Fri 2025-01-17 as a single 14-day sprint.
pub fn two_week_release(number_of_developers: u32) -> ReleaseConfig {
    ReleaseConfig::new(on_date(2025, 1, 6), on_date(2025, 1, 17), 14, number_of_developers)
}
