use crate::services::planning_types::{ReleasePlan, Sprint};
use crate::services::release_planning::{get_release_summary, get_sprint_utilization};

pub fn format_release_report(plan: &ReleasePlan) -> String {
    let summary = get_release_summary(plan);
    let feasibility = if summary.is_feasible {
        "feasible"
    } else {
        "not feasible"
    };

    let mut lines = Vec::new();
    lines.push("Release Plan".to_string());
    lines.push(format!("Sprints: {}", summary.sprint_count));
    lines.push(format!("Backlog days: {:.2}", summary.total_backlog_days));
    lines.push(format!("Capacity days: {:.2}", summary.total_capacity_days));
    lines.push(format!("Allocated days: {:.2}", summary.allocated_days));
    lines.push(format!("Capacity remaining: {:.2}", summary.capacity_remaining));
    lines.push(format!("Utilization: {:.2}%", summary.utilization_percentage));
    lines.push(format!(
        "Feasibility: {:.2}% ({feasibility})",
        summary.feasible_percentage
    ));
    if !plan.skipped_ticket_ids.is_empty() {
        lines.push(format!("Skipped tickets: {}", plan.skipped_ticket_ids.join(", ")));
    }
    lines.push(String::new());
    lines.push("Sprint | Dates | Working days | Capacity | Allocated | Utilization".to_string());
    lines.push("-------|-------|--------------|----------|-----------|------------".to_string());
    lines.extend(plan.sprints.iter().map(format_sprint_row));
    lines.push(String::new());
    lines.push("Overflow:".to_string());
    if plan.overflow_tickets.is_empty() {
        lines.push("none".to_string());
    } else {
        for ticket in &plan.overflow_tickets {
            lines.push(format!(
                "- {} (priority {}, {:.2} days)",
                ticket.id, ticket.priority, ticket.effort_days
            ));
        }
    }

    lines.join("\n")
}

fn format_sprint_row(sprint: &Sprint) -> String {
    let utilization = get_sprint_utilization(sprint);
    format!(
        "{name} | {start} - {end} | {working_days} | {capacity:.2} | {allocated:.2} | {percent:.2}%",
        name = sprint.name,
        start = sprint.start_date.format("%Y-%m-%d"),
        end = sprint.end_date.format("%Y-%m-%d"),
        working_days = sprint.working_days,
        capacity = sprint.capacity_days,
        allocated = sprint.allocated_days,
        percent = utilization.utilization * 100.0
    )
}
