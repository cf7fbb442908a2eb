use std::path::Path;

use serde::Serialize;

use crate::error::SwarmError;

use super::aggregate::SwarmReport;
use super::plan::WorkLoadPlan;

/// Divisor to format x100 values as `xx.yy`.
const PERCENT_DIVISOR: u64 = 100;
const CSV_HEADER: &str =
    "second,workers,connections_attempted,connections_actual,messages_attempted,messages_actual";

pub(crate) fn format_x100(value: u64) -> String {
    format!(
        "{}.{:02}",
        value / PERCENT_DIVISOR,
        value % PERCENT_DIVISOR
    )
}

/// Human-readable summary of an attack, one line per entry.
#[must_use]
pub fn summary_lines(report: &SwarmReport) -> Vec<String> {
    let mut lines = Vec::new();
    let counts = &report.counts;
    lines.push(format!("Workers: {}", report.workers));
    lines.push(format!(
        "Outcomes: {} success, {} already running, {} offline, {} timeout, {} network error, {} protocol error",
        counts.success,
        counts.already_running,
        counts.offline,
        counts.timeout,
        counts.network_error,
        counts.protocol_error
    ));

    let unreachable = counts
        .offline
        .saturating_add(counts.network_error)
        .saturating_add(counts.protocol_error);
    if unreachable > 0 {
        lines.push(format!(
            "     {} of your workers didn't make it to the action.",
            unreachable
        ));
    }
    if counts.timeout > 0 {
        lines.push(format!(
            "     Target timed out without fully responding to {} workers.",
            counts.timeout
        ));
    }
    if counts.already_running > 0 {
        lines.push(format!(
            "     {} workers were already running a load test and sat this one out.",
            counts.already_running
        ));
    }
    for fate in report.fates.iter().filter(|fate| fate.kind.is_failure()) {
        match &fate.detail {
            Some(detail) => lines.push(format!(
                "     Worker {} ({}): {}: {}",
                fate.index,
                fate.address,
                fate.kind.as_str(),
                detail
            )),
            None => lines.push(format!(
                "     Worker {} ({}): {}",
                fate.index,
                fate.address,
                fate.kind.as_str()
            )),
        }
    }

    if report.no_data {
        lines.push("     No workers completed the mission.".to_owned());
        return lines;
    }

    let totals = &report.totals;
    lines.push(format!("     Connections opened:\t\t{}", totals.connections));
    lines.push(format!(
        "     Average rate:\t\t\t{} [#/sec]",
        format_x100(totals.avg_rate_x100)
    ));
    lines.push(format!(
        "     Average rate over last minute:\t{} [#/sec]",
        format_x100(totals.last_minute_rate_x100)
    ));
    lines.push(format!("     Load test errors:\t\t{}", totals.errors));
    lines.push(format!(
        "     Errors per minute:\t\t{}",
        format_x100(totals.errors_per_minute_x100)
    ));
    lines.push(format!("     IPs used:\t{}", totals.ips.join(", ")));
    if !report.timeline.is_empty() {
        lines.push(
            "     Second  Workers  Conn attempted  Conn actual  Msg attempted  Msg actual"
                .to_owned(),
        );
        for cell in &report.timeline {
            lines.push(format!(
                "     {:>6}  {:>7}  {:>14}  {:>11}  {:>13}  {:>10}",
                cell.second,
                cell.workers,
                cell.connections_attempted,
                cell.connections_actual,
                cell.messages_attempted.to_string(),
                cell.messages_actual
            ));
        }
    }
    lines.push("Mission Assessment: Swarm annihilated target.".to_owned());
    lines
}

pub fn print_report(report: &SwarmReport) {
    for line in summary_lines(report) {
        println!("{}", line);
    }
}

#[derive(Serialize)]
struct JsonExport<'report> {
    generated_at: String,
    plan: &'report WorkLoadPlan,
    report: &'report SwarmReport,
}

/// Writes the plan and the full report as pretty JSON.
///
/// # Errors
///
/// Returns an error when serialization or the file write fails.
pub async fn write_json(
    path: &Path,
    plan: &WorkLoadPlan,
    report: &SwarmReport,
) -> Result<(), SwarmError> {
    let export = JsonExport {
        generated_at: chrono::Local::now().to_rfc3339(),
        plan,
        report,
    };
    let json = serde_json::to_vec_pretty(&export).map_err(|err| SwarmError::Serialize {
        context: "JSON export",
        source: err,
    })?;
    tokio::fs::write(path, json)
        .await
        .map_err(|err| SwarmError::Export {
            context: "JSON export",
            path: path.to_path_buf(),
            source: err,
        })
}

/// Merged per-second timeline as CSV. An unbounded attempted-messages cell
/// is written as `unbounded`.
#[must_use]
pub fn timeline_csv(report: &SwarmReport) -> String {
    let rows: String = report
        .timeline
        .iter()
        .map(|cell| {
            format!(
                "{},{},{},{},{},{}\n",
                cell.second,
                cell.workers,
                cell.connections_attempted,
                cell.connections_actual,
                cell.messages_attempted,
                cell.messages_actual
            )
        })
        .collect();
    format!("{}\n{}", CSV_HEADER, rows)
}

/// # Errors
///
/// Returns an error when the file write fails.
pub async fn write_timeline_csv(path: &Path, report: &SwarmReport) -> Result<(), SwarmError> {
    tokio::fs::write(path, timeline_csv(report))
        .await
        .map_err(|err| SwarmError::Export {
            context: "timeline CSV",
            path: path.to_path_buf(),
            source: err,
        })
}
