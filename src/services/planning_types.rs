use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::ticket::TicketInput;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Sprint {
    pub id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub working_days: u32,
    pub capacity_days: f64,
    pub allocated_days: f64,
    pub tickets: Vec<TicketInput>,
}

impl Sprint {
    pub fn remaining_capacity(&self) -> f64 {
        self.capacity_days - self.allocated_days
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ReleasePlan {
    pub sprints: Vec<Sprint>,
    pub overflow_tickets: Vec<TicketInput>,
    pub total_backlog_days: f64,
    pub total_capacity_days: f64,
    /// Share of backlog effort that was placed, 0..=100, two decimals.
    pub feasible_percentage: f64,
    /// Tickets left out of planning because their effort was not a positive number.
    pub skipped_ticket_ids: Vec<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ReleaseSummary {
    pub sprint_count: usize,
    pub placed_ticket_count: usize,
    pub overflow_ticket_count: usize,
    pub total_backlog_days: f64,
    pub total_capacity_days: f64,
    pub allocated_days: f64,
    pub capacity_remaining: f64,
    pub utilization_percentage: f64,
    pub feasible_percentage: f64,
    pub is_feasible: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SprintUtilization {
    pub sprint_id: String,
    pub allocated_days: f64,
    pub capacity_days: f64,
    /// `allocated_days / capacity_days`, or 0 for a sprint without capacity.
    pub utilization: f64,
    pub remaining_days: f64,
}

/// Result of the non-failing planning entry point.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PlanOutcome {
    Success { data: ReleasePlan },
    Failure { error: String },
}

impl PlanOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PlanOutcome::Success { .. })
    }

    pub fn plan(&self) -> Option<&ReleasePlan> {
        match self {
            PlanOutcome::Success { data } => Some(data),
            PlanOutcome::Failure { .. } => None,
        }
    }
}
