use std::process::ExitCode;

use crate::commands::base_commands::{Commands, OutputFormat};
use crate::commands::report_format::format_release_report;
use crate::services::planning_types::PlanOutcome;
use crate::services::release_planning::build_release_plan_safe;
use crate::services::release_yaml::load_release_from_yaml_file;

pub fn plan_command(cmd: Commands) -> ExitCode {
    let Commands::Plan {
        input,
        output,
        format,
        max_sprints,
    } = cmd
    else {
        return ExitCode::FAILURE;
    };

    let mut release = match load_release_from_yaml_file(&input) {
        Ok(release) => release,
        Err(e) => {
            eprintln!("Failed to load release: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(max_sprints) = max_sprints {
        release.config.max_sprints = max_sprints;
    }

    tracing::info!(
        tickets = release.tickets.len(),
        start = %release.config.release_start,
        end = %release.config.release_end,
        "planning release"
    );
    let outcome = build_release_plan_safe(&release.tickets, &release.config);

    let serialized = match format {
        OutputFormat::Yaml => serde_yaml::to_string(&outcome).map_err(|e| e.to_string()),
        OutputFormat::Json => serde_json::to_string_pretty(&outcome).map_err(|e| e.to_string()),
    };
    let contents = match serialized {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("Failed to serialize release plan: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = std::fs::write(&output, contents) {
        eprintln!("Failed to write release plan: {e}");
        return ExitCode::FAILURE;
    }

    match outcome {
        PlanOutcome::Success { data } => {
            println!("{}", format_release_report(&data));
            println!();
            println!("Release plan written to {output}");
            ExitCode::SUCCESS
        }
        PlanOutcome::Failure { error } => {
            eprintln!("Failed to plan release: {error}");
            ExitCode::FAILURE
        }
    }
}
