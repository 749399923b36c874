use std::collections::HashSet;
use std::io;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::calendar::MAX_SPRINT_PERIODS;
use crate::domain::release::ReleaseConfig;
use crate::domain::ticket::TicketInput;

#[derive(Error, Debug)]
pub enum ReleaseYamlError {
    #[error("failed to read release yaml: {0}")]
    Read(#[from] io::Error),
    #[error("failed to parse release yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid date format: {0} (expected YYYY-MM-DD)")]
    InvalidDate(String),
    #[error("invalid pto range for {member}: start_date {start_date} is after end_date {end_date}")]
    InvalidDateRange {
        member: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    #[error("missing ticket id")]
    MissingTicketId,
    #[error("duplicate ticket id: {0}")]
    DuplicateTicketId(String),
}

/// Backlog and configuration loaded from one release file.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseInput {
    pub config: ReleaseConfig,
    pub tickets: Vec<TicketInput>,
}

#[derive(Debug, Deserialize)]
struct ReleaseFileRecord {
    release: ReleaseRecord,
    #[serde(default)]
    tickets: Vec<TicketRecord>,
}

#[derive(Debug, Deserialize)]
struct ReleaseRecord {
    start_date: String,
    end_date: String,
    sprint_length_days: u32,
    number_of_developers: u32,
    holidays: Option<Vec<String>>,
    pto_dates: Option<Vec<String>>,
    pto_ranges: Option<Vec<PtoRangeRecord>>,
    max_sprints: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct PtoRangeRecord {
    member: Option<String>,
    start_date: String,
    end_date: String,
}

#[derive(Debug, Deserialize)]
struct TicketRecord {
    id: String,
    title: Option<String>,
    epic: Option<String>,
    effort_days: Option<f64>,
    #[serde(default = "default_priority")]
    priority: i32,
    assigned_to: Option<String>,
}

fn default_priority() -> i32 {
    1
}

pub fn load_release_from_yaml_file<P: AsRef<Path>>(
    path: P,
) -> Result<ReleaseInput, ReleaseYamlError> {
    let contents = std::fs::read_to_string(path)?;
    deserialize_release_from_yaml_str(&contents)
}

pub fn deserialize_release_from_yaml_str(input: &str) -> Result<ReleaseInput, ReleaseYamlError> {
    let record: ReleaseFileRecord = serde_yaml::from_str(input)?;
    let config = config_from_record(record.release)?;

    let mut seen_ids = HashSet::new();
    let mut tickets = Vec::with_capacity(record.tickets.len());
    for ticket_record in record.tickets {
        let id = ticket_record.id.trim().to_string();
        if id.is_empty() {
            return Err(ReleaseYamlError::MissingTicketId);
        }
        if !seen_ids.insert(id.clone()) {
            return Err(ReleaseYamlError::DuplicateTicketId(id));
        }

        tickets.push(TicketInput {
            id,
            title: ticket_record.title.unwrap_or_default(),
            epic: ticket_record.epic.unwrap_or_default(),
            // The planner drops tickets without a usable estimate.
            effort_days: ticket_record.effort_days.unwrap_or(f64::NAN),
            priority: ticket_record.priority,
            assigned_to_raw: ticket_record.assigned_to,
        });
    }

    Ok(ReleaseInput { config, tickets })
}

fn config_from_record(record: ReleaseRecord) -> Result<ReleaseConfig, ReleaseYamlError> {
    let holidays = parse_dates(record.holidays.unwrap_or_default())?;
    let mut pto_dates = parse_dates(record.pto_dates.unwrap_or_default())?;
    for range in record.pto_ranges.unwrap_or_default() {
        pto_dates.extend(expand_pto_range(range)?);
    }

    Ok(ReleaseConfig {
        release_start: parse_date(&record.start_date)?,
        release_end: parse_date(&record.end_date)?,
        sprint_length_days: record.sprint_length_days,
        number_of_developers: record.number_of_developers,
        holidays,
        pto_dates,
        max_sprints: record.max_sprints.unwrap_or(MAX_SPRINT_PERIODS),
    })
}

fn expand_pto_range(range: PtoRangeRecord) -> Result<Vec<NaiveDate>, ReleaseYamlError> {
    let start_date = parse_date(&range.start_date)?;
    let end_date = parse_date(&range.end_date)?;
    if start_date > end_date {
        return Err(ReleaseYamlError::InvalidDateRange {
            member: range.member.unwrap_or_else(|| "unknown member".to_string()),
            start_date,
            end_date,
        });
    }
    Ok(start_date
        .iter_days()
        .take_while(|date| *date <= end_date)
        .collect())
}

fn parse_dates(values: Vec<String>) -> Result<Vec<NaiveDate>, ReleaseYamlError> {
    values.iter().map(|value| parse_date(value)).collect()
}

fn parse_date(value: &str) -> Result<NaiveDate, ReleaseYamlError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ReleaseYamlError::InvalidDate(value.to_string()))
}
