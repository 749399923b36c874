use serde::Serialize;

/// One backlog item as seen by the planner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketInput {
	pub id: String,
	pub title: String,
	pub epic: String,
	pub effort_days: f64,
	/// 1 is the most urgent.
	pub priority: i32,
	pub assigned_to_raw: Option<String>,
}

impl TicketInput {
	pub fn new(id: impl Into<String>, effort_days: f64, priority: i32) -> Self {
		Self {
			id: id.into(),
			title: String::new(),
			epic: String::new(),
			effort_days,
			priority,
			assigned_to_raw: None,
		}
	}

	/// Only tickets with a finite, positive effort take part in allocation.
	pub fn has_schedulable_effort(&self) -> bool {
		self.effort_days.is_finite() && self.effort_days > 0.0
	}
}
