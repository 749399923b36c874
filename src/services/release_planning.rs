use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::calendar::{SprintPeriod, generate_sprint_periods_with_limit};
use crate::domain::release::ReleaseConfig;
use crate::domain::ticket::TicketInput;
use crate::services::capacity_calculation::{
    SprintCapacity, SprintCapacityInput, calculate_sprint_capacity, sum_capacities,
};
use crate::services::planning_types::{
    PlanOutcome, ReleasePlan, ReleaseSummary, Sprint, SprintUtilization,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReleasePlanningError {
    #[error("release start {start} is after release end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("sprint length must be greater than zero days")]
    InvalidSprintLength,
}

/// Splits the backlog into sprints with a greedy, priority-ordered first fit.
///
/// Tickets are sorted by priority, then by effort, keeping input order for
/// ties. Each ticket goes whole into the first sprint with enough remaining
/// capacity; tickets that fit nowhere end up in `overflow_tickets`.
///
/// # Errors
/// - Returns an error when the release starts after it ends.
/// - Returns an error when the sprint length is zero.
///
/// Tickets without a positive, finite effort never cause an error; they are
/// reported in `skipped_ticket_ids` and otherwise ignored.
pub fn build_release_plan(
    tickets: &[TicketInput],
    config: &ReleaseConfig,
) -> Result<ReleasePlan, ReleasePlanningError> {
    validate_config(config)?;

    let (valid_tickets, skipped_ticket_ids) = partition_schedulable_tickets(tickets);
    let total_backlog_days: f64 = valid_tickets.iter().map(|ticket| ticket.effort_days).sum();

    if valid_tickets.is_empty() {
        tracing::debug!("no schedulable tickets, returning an empty plan");
        return Ok(ReleasePlan {
            sprints: Vec::new(),
            overflow_tickets: Vec::new(),
            total_backlog_days: 0.0,
            total_capacity_days: 0.0,
            feasible_percentage: 100.0,
            skipped_ticket_ids,
        });
    }

    if config.number_of_developers == 0 {
        tracing::debug!("release has no developers, every ticket overflows");
        return Ok(unschedulable_plan(valid_tickets, total_backlog_days, skipped_ticket_ids));
    }

    let periods = generate_sprint_periods_with_limit(
        config.release_start,
        config.release_end,
        config.sprint_length_days,
        config.max_sprints,
    );
    if periods.is_empty() {
        tracing::debug!("no sprint periods fit the release window, every ticket overflows");
        return Ok(unschedulable_plan(valid_tickets, total_backlog_days, skipped_ticket_ids));
    }

    let mut sprints = build_sprints(&periods, config);
    let mut backlog = valid_tickets;
    sort_backlog(&mut backlog);
    let overflow_tickets = allocate_first_fit(&mut sprints, backlog);

    let capacities: Vec<SprintCapacity> = sprints
        .iter()
        .map(|sprint| SprintCapacity {
            working_days: sprint.working_days,
            capacity_days: sprint.capacity_days,
        })
        .collect();
    let total_capacity_days = sum_capacities(&capacities).capacity_days;

    let overflow_days: f64 = overflow_tickets.iter().map(|ticket| ticket.effort_days).sum();
    let feasible_percentage = feasible_percentage(total_backlog_days, overflow_days);

    tracing::debug!(
        sprints = sprints.len(),
        overflow = overflow_tickets.len(),
        total_backlog_days,
        total_capacity_days,
        feasible_percentage,
        "release plan built"
    );

    Ok(ReleasePlan {
        sprints,
        overflow_tickets,
        total_backlog_days,
        total_capacity_days,
        feasible_percentage,
        skipped_ticket_ids,
    })
}

/// Same as [`build_release_plan`], but reports configuration errors as a
/// [`PlanOutcome::Failure`] instead of an `Err`.
pub fn build_release_plan_safe(tickets: &[TicketInput], config: &ReleaseConfig) -> PlanOutcome {
    match build_release_plan(tickets, config) {
        Ok(data) => PlanOutcome::Success { data },
        Err(e) => PlanOutcome::Failure {
            error: e.to_string(),
        },
    }
}

pub fn is_release_feasible(plan: &ReleasePlan) -> bool {
    plan.overflow_tickets.is_empty()
}

pub fn get_release_summary(plan: &ReleasePlan) -> ReleaseSummary {
    let allocated_days: f64 = plan.sprints.iter().map(|sprint| sprint.allocated_days).sum();
    let placed_ticket_count = plan.sprints.iter().map(|sprint| sprint.tickets.len()).sum();
    let utilization_percentage = if plan.total_capacity_days > 0.0 {
        round2(allocated_days / plan.total_capacity_days * 100.0)
    } else {
        0.0
    };

    ReleaseSummary {
        sprint_count: plan.sprints.len(),
        placed_ticket_count,
        overflow_ticket_count: plan.overflow_tickets.len(),
        total_backlog_days: plan.total_backlog_days,
        total_capacity_days: plan.total_capacity_days,
        allocated_days,
        capacity_remaining: plan.total_capacity_days - allocated_days,
        utilization_percentage,
        feasible_percentage: plan.feasible_percentage,
        is_feasible: is_release_feasible(plan),
    }
}

pub fn get_sprint_utilization(sprint: &Sprint) -> SprintUtilization {
    let utilization = if sprint.capacity_days > 0.0 {
        sprint.allocated_days / sprint.capacity_days
    } else {
        0.0
    };

    SprintUtilization {
        sprint_id: sprint.id.clone(),
        allocated_days: sprint.allocated_days,
        capacity_days: sprint.capacity_days,
        utilization,
        remaining_days: sprint.remaining_capacity(),
    }
}

fn validate_config(config: &ReleaseConfig) -> Result<(), ReleasePlanningError> {
    if config.release_start > config.release_end {
        return Err(ReleasePlanningError::InvalidDateRange {
            start: config.release_start,
            end: config.release_end,
        });
    }
    if config.sprint_length_days == 0 {
        return Err(ReleasePlanningError::InvalidSprintLength);
    }
    Ok(())
}

fn partition_schedulable_tickets(tickets: &[TicketInput]) -> (Vec<TicketInput>, Vec<String>) {
    let mut valid = Vec::with_capacity(tickets.len());
    let mut skipped = Vec::new();

    for ticket in tickets {
        if ticket.has_schedulable_effort() {
            valid.push(ticket.clone());
        } else {
            tracing::warn!(
                ticket = %ticket.id,
                effort_days = ticket.effort_days,
                "skipping ticket without a positive effort"
            );
            skipped.push(ticket.id.clone());
        }
    }

    (valid, skipped)
}

fn unschedulable_plan(
    mut tickets: Vec<TicketInput>,
    total_backlog_days: f64,
    skipped_ticket_ids: Vec<String>,
) -> ReleasePlan {
    sort_backlog(&mut tickets);
    ReleasePlan {
        sprints: Vec::new(),
        overflow_tickets: tickets,
        total_backlog_days,
        total_capacity_days: 0.0,
        feasible_percentage: 0.0,
        skipped_ticket_ids,
    }
}

fn build_sprints(periods: &[SprintPeriod], config: &ReleaseConfig) -> Vec<Sprint> {
    periods
        .iter()
        .enumerate()
        .map(|(index, period)| {
            let capacity = calculate_sprint_capacity(&SprintCapacityInput {
                start_date: period.start_date,
                end_date: period.end_date,
                number_of_developers: config.number_of_developers,
                holidays: &config.holidays,
                pto_dates: &config.pto_dates,
            });
            Sprint {
                id: format!("sprint-{}", index + 1),
                name: format!("Sprint {}", index + 1),
                start_date: period.start_date,
                end_date: period.end_date,
                working_days: capacity.working_days,
                capacity_days: capacity.capacity_days,
                allocated_days: 0.0,
                tickets: Vec::new(),
            }
        })
        .collect()
}

/// Priority ascending, then effort ascending. `sort_by` is stable, so equal
/// keys keep their input order.
fn sort_backlog(tickets: &mut [TicketInput]) {
    tickets.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.effort_days.total_cmp(&b.effort_days))
    });
}

fn allocate_first_fit(sprints: &mut [Sprint], backlog: Vec<TicketInput>) -> Vec<TicketInput> {
    let mut overflow = Vec::new();

    for ticket in backlog {
        match sprints
            .iter_mut()
            .find(|sprint| sprint.remaining_capacity() >= ticket.effort_days)
        {
            Some(sprint) => {
                sprint.allocated_days += ticket.effort_days;
                sprint.tickets.push(ticket);
            }
            None => overflow.push(ticket),
        }
    }

    overflow
}

fn feasible_percentage(total_backlog_days: f64, overflow_days: f64) -> f64 {
    if total_backlog_days <= 0.0 {
        return 100.0;
    }
    let placed_days = total_backlog_days - overflow_days;
    round2(placed_days / total_backlog_days * 100.0).clamp(0.0, 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{build_ticket, on_date, two_week_release};

    fn overflow_ids(plan: &ReleasePlan) -> Vec<&str> {
        plan.overflow_tickets.iter().map(|t| t.id.as_str()).collect()
    }

    fn sprint_ticket_ids(sprint: &Sprint) -> Vec<&str> {
        sprint.tickets.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn a_two_week_release_has_one_sprint_with_full_team_capacity() {
        let plan = build_release_plan(&[build_ticket("T-1", 1, 1.0)], &two_week_release(2)).unwrap();

        assert_eq!(plan.sprints.len(), 1);
        let sprint = &plan.sprints[0];
        assert_eq!(sprint.id, "sprint-1");
        assert_eq!(sprint.name, "Sprint 1");
        assert_eq!(sprint.start_date, on_date(2025, 1, 6));
        assert_eq!(sprint.end_date, on_date(2025, 1, 17));
        assert_eq!(sprint.working_days, 10);
        assert_eq!(sprint.capacity_days, 20.0);
        assert_eq!(plan.total_capacity_days, 20.0);
    }

    #[test]
    fn a_ticket_that_does_not_fit_the_remaining_capacity_overflows() {
        let tickets = vec![build_ticket("T-1", 1, 8.0), build_ticket("T-2", 2, 15.0)];
        let plan = build_release_plan(&tickets, &two_week_release(2)).unwrap();

        let sprint = &plan.sprints[0];
        assert_eq!(sprint_ticket_ids(sprint), vec!["T-1"]);
        assert_eq!(sprint.allocated_days, 8.0);
        assert_eq!(sprint.remaining_capacity(), 12.0);
        assert_eq!(overflow_ids(&plan), vec!["T-2"]);
        assert_eq!(plan.total_backlog_days, 23.0);
        assert_eq!(plan.total_capacity_days, 20.0);
        assert_eq!(plan.feasible_percentage, 34.78);
        assert!(!is_release_feasible(&plan));
    }

    #[test]
    fn tickets_without_positive_effort_are_skipped() {
        let tickets = vec![
            build_ticket("T-1", 1, 2.0),
            build_ticket("BAD-1", 1, -1.0),
            build_ticket("BAD-2", 1, 0.0),
            build_ticket("BAD-3", 1, f64::NAN),
        ];
        let plan = build_release_plan(&tickets, &two_week_release(2)).unwrap();

        assert_eq!(sprint_ticket_ids(&plan.sprints[0]), vec!["T-1"]);
        assert!(plan.overflow_tickets.is_empty());
        assert_eq!(plan.total_backlog_days, 2.0);
        assert_eq!(plan.skipped_ticket_ids, vec!["BAD-1", "BAD-2", "BAD-3"]);
    }

    #[test]
    fn an_inverted_release_window_is_rejected() {
        let mut config = two_week_release(2);
        config.release_start = on_date(2025, 1, 18);

        let err = build_release_plan(&[], &config).unwrap_err();
        assert_eq!(
            err,
            ReleasePlanningError::InvalidDateRange {
                start: on_date(2025, 1, 18),
                end: on_date(2025, 1, 17),
            }
        );

        match build_release_plan_safe(&[], &config) {
            PlanOutcome::Failure { error } => {
                assert_eq!(error, "release start 2025-01-18 is after release end 2025-01-17");
            }
            PlanOutcome::Success { .. } => panic!("expected a failure outcome"),
        }
    }

    #[test]
    fn a_zero_sprint_length_is_rejected() {
        let mut config = two_week_release(2);
        config.sprint_length_days = 0;

        let err = build_release_plan(&[build_ticket("T-1", 1, 1.0)], &config).unwrap_err();
        assert_eq!(err, ReleasePlanningError::InvalidSprintLength);
        assert!(!build_release_plan_safe(&[], &config).is_success());
    }

    #[test]
    fn the_safe_variant_returns_the_plan_on_success() {
        let tickets = vec![build_ticket("T-1", 1, 3.0)];
        let outcome = build_release_plan_safe(&tickets, &two_week_release(1));

        assert!(outcome.is_success());
        assert_eq!(
            outcome.plan(),
            Some(&build_release_plan(&tickets, &two_week_release(1)).unwrap())
        );
    }

    #[test]
    fn equal_priority_tickets_are_ordered_by_effort() {
        let tickets = vec![build_ticket("FIVE", 1, 5.0), build_ticket("THREE", 1, 3.0)];
        let plan = build_release_plan(&tickets, &two_week_release(2)).unwrap();
        assert_eq!(sprint_ticket_ids(&plan.sprints[0]), vec!["THREE", "FIVE"]);
    }

    #[test]
    fn ties_on_priority_and_effort_keep_input_order() {
        let tickets = vec![
            build_ticket("B", 2, 1.0),
            build_ticket("A", 2, 1.0),
            build_ticket("C", 1, 4.0),
            build_ticket("D", 2, 1.0),
        ];
        let plan = build_release_plan(&tickets, &two_week_release(2)).unwrap();
        assert_eq!(sprint_ticket_ids(&plan.sprints[0]), vec!["C", "B", "A", "D"]);
    }

    #[test]
    fn first_fit_backfills_earlier_sprints_with_smaller_tickets() {
        // Two one-week sprints with 5 days each.
        let config = ReleaseConfig::new(on_date(2025, 1, 6), on_date(2025, 1, 19), 7, 1);
        let tickets = vec![
            build_ticket("BIG", 1, 4.0),
            build_ticket("HUGE", 2, 5.0),
            build_ticket("SMALL", 3, 1.0),
            build_ticket("TOO-BIG", 4, 6.0),
        ];
        let plan = build_release_plan(&tickets, &config).unwrap();

        assert_eq!(plan.sprints.len(), 2);
        assert_eq!(sprint_ticket_ids(&plan.sprints[0]), vec!["BIG", "SMALL"]);
        assert_eq!(sprint_ticket_ids(&plan.sprints[1]), vec!["HUGE"]);
        assert_eq!(overflow_ids(&plan), vec!["TOO-BIG"]);
        assert_eq!(plan.feasible_percentage, 62.5);
    }

    #[test]
    fn an_empty_backlog_is_fully_feasible() {
        let plan = build_release_plan(&[], &two_week_release(2)).unwrap();
        assert!(plan.sprints.is_empty());
        assert!(plan.overflow_tickets.is_empty());
        assert_eq!(plan.total_backlog_days, 0.0);
        assert_eq!(plan.total_capacity_days, 0.0);
        assert_eq!(plan.feasible_percentage, 100.0);
        assert!(is_release_feasible(&plan));
    }

    #[test]
    fn without_developers_every_ticket_overflows_in_priority_order() {
        let tickets = vec![build_ticket("LOW", 3, 1.0), build_ticket("HIGH", 1, 2.0)];
        let plan = build_release_plan(&tickets, &two_week_release(0)).unwrap();

        assert!(plan.sprints.is_empty());
        assert_eq!(overflow_ids(&plan), vec!["HIGH", "LOW"]);
        assert_eq!(plan.total_backlog_days, 3.0);
        assert_eq!(plan.total_capacity_days, 0.0);
        assert_eq!(plan.feasible_percentage, 0.0);
    }

    #[test]
    fn a_zero_sprint_limit_makes_every_ticket_overflow() {
        let mut config = two_week_release(2);
        config.max_sprints = 0;
        let plan = build_release_plan(&[build_ticket("T-1", 1, 1.0)], &config).unwrap();

        assert!(plan.sprints.is_empty());
        assert_eq!(overflow_ids(&plan), vec!["T-1"]);
        assert_eq!(plan.feasible_percentage, 0.0);
    }

    #[test]
    fn holidays_and_pto_shrink_sprint_capacity() {
        let mut config = two_week_release(2);
        config.holidays = vec![on_date(2025, 1, 8)];
        config.pto_dates = vec![on_date(2025, 1, 9), on_date(2025, 1, 9), on_date(2025, 1, 8)];
        let plan = build_release_plan(&[build_ticket("T-1", 1, 1.0)], &config).unwrap();

        assert_eq!(plan.sprints[0].working_days, 9);
        assert_eq!(plan.sprints[0].capacity_days, 16.0);
    }

    #[test]
    fn release_summary_reports_counts_and_utilization() {
        let tickets = vec![
            build_ticket("T-1", 1, 8.0),
            build_ticket("T-2", 1, 2.0),
            build_ticket("T-3", 2, 15.0),
        ];
        let plan = build_release_plan(&tickets, &two_week_release(2)).unwrap();
        let summary = get_release_summary(&plan);

        assert_eq!(
            summary,
            ReleaseSummary {
                sprint_count: 1,
                placed_ticket_count: 2,
                overflow_ticket_count: 1,
                total_backlog_days: 25.0,
                total_capacity_days: 20.0,
                allocated_days: 10.0,
                capacity_remaining: 10.0,
                utilization_percentage: 50.0,
                feasible_percentage: 40.0,
                is_feasible: false,
            }
        );
    }

    #[test]
    fn release_summary_utilization_is_zero_without_capacity() {
        let plan = build_release_plan(&[build_ticket("T-1", 1, 1.0)], &two_week_release(0)).unwrap();
        let summary = get_release_summary(&plan);
        assert_eq!(summary.utilization_percentage, 0.0);
        assert_eq!(summary.capacity_remaining, 0.0);
        assert_eq!(summary.sprint_count, 0);
    }

    #[test]
    fn sprint_utilization_is_a_ratio_of_capacity() {
        let plan = build_release_plan(&[build_ticket("T-1", 1, 5.0)], &two_week_release(2)).unwrap();
        let utilization = get_sprint_utilization(&plan.sprints[0]);

        assert_eq!(
            utilization,
            SprintUtilization {
                sprint_id: "sprint-1".to_string(),
                allocated_days: 5.0,
                capacity_days: 20.0,
                utilization: 0.25,
                remaining_days: 15.0,
            }
        );
    }

    #[test]
    fn sprint_utilization_is_zero_for_a_sprint_without_capacity() {
        let mut config = two_week_release(1);
        config.holidays = (6..=17).map(|day| on_date(2025, 1, day)).collect();
        let plan = build_release_plan(&[build_ticket("T-1", 1, 1.0)], &config).unwrap();

        let utilization = get_sprint_utilization(&plan.sprints[0]);
        assert_eq!(utilization.capacity_days, 0.0);
        assert_eq!(utilization.utilization, 0.0);
        assert_eq!(overflow_ids(&plan), vec!["T-1"]);
    }

    #[test]
    fn building_the_same_plan_twice_gives_identical_results() {
        let tickets = vec![
            build_ticket("T-1", 2, 3.0),
            build_ticket("T-2", 1, 7.5),
            build_ticket("T-3", 2, 3.0),
            build_ticket("T-4", 3, 12.0),
        ];
        let mut config = ReleaseConfig::new(on_date(2025, 1, 6), on_date(2025, 2, 28), 10, 2);
        config.pto_dates = vec![on_date(2025, 1, 21)];

        let first = build_release_plan(&tickets, &config).unwrap();
        let second = build_release_plan(&tickets, &config).unwrap();
        assert_eq!(first, second);
    }
}
