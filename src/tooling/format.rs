//! Format run reports and scenario summaries as text.

use crate::directory::Capability;
use crate::sim::{RunReport, Scenario};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn capability_label(capability: Capability) -> &'static str {
    match capability {
        Capability::AuctionParticipant => "guard",
        Capability::SensorOnly => "sensor",
    }
}

/// Format a simulation run as human-readable text.
pub fn format_run_report_text(report: &RunReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Run Summary")));
    out.push_str(&format!("  Scenario: {}\n", report.scenario));
    out.push_str(&format!("  Ticks: {}\n", report.ticks));
    out.push_str(&format!("  Elapsed: {:.2}\n", report.elapsed));
    let outcome = report
        .outcome
        .as_ref()
        .map(|e| e.to_string())
        .unwrap_or_else(|| "still running".to_string());
    out.push_str(&format!("  Outcome: {}\n", outcome));
    out.push_str(&format!(
        "  Asset compromised: {}\n",
        if report.world.asset_compromised { "yes" } else { "no" }
    ));
    out.push_str(&format!("  Rounds started: {}\n\n", report.world.rounds_started));

    out.push_str(&format!("{}\n\n", format_section_heading("Agents")));
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Agent", "Name", "Kind", "Role", "Position", "Coordinator"]);
    for row in &report.agents {
        table.add_row(vec![
            row.id.to_string(),
            row.name.clone(),
            capability_label(row.capability).to_string(),
            row.role.to_string(),
            row.position.to_string(),
            if row.coordinator { "yes" } else { "-" }.to_string(),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));

    out.push_str(&format!("{}\n\n", format_section_heading("Events")));
    if report.events.is_empty() {
        out.push_str("No events.\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Time", "Event"]);
    for row in &report.events {
        table.add_row(vec![format!("{:.2}", row.at), row.event.to_string()]);
    }
    out.push_str(&format!("{}\n\n", table));
    out.push_str(&format!("Total: {} events.\n", report.events.len()));
    out
}

/// Format a simulation run as JSON.
pub fn format_run_report_json(report: &RunReport) -> String {
    serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
}

/// Format a validated scenario as human-readable text.
pub fn format_scenario_summary_text(scenario: &Scenario) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading("Scenario")
    ));
    out.push_str(&format!("  Name: {}\n", scenario.display_name()));
    out.push_str(&format!("  Guards: {}\n", scenario.guards.len()));
    out.push_str(&format!("  Cameras: {}\n", scenario.cameras.len()));
    out.push_str(&format!(
        "  Chokepoints: {}\n",
        scenario.landmarks.chokepoints.len()
    ));
    out.push_str(&format!("  Loud events: {}\n\n", scenario.loud_events.len()));

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Name", "Kind", "Start", "Reports to"]);
    for guard in &scenario.guards {
        table.add_row(vec![
            guard.name.clone(),
            "guard".to_string(),
            guard.position.to_string(),
            "-".to_string(),
        ]);
    }
    for camera in &scenario.cameras {
        table.add_row(vec![
            camera.name.clone(),
            "sensor".to_string(),
            camera.position.to_string(),
            camera.guard.clone().unwrap_or_else(|| "all guards".to_string()),
        ]);
    }
    out.push_str(&format!("{}\n\n", table));
    out.push_str("Scenario is valid.\n");
    out
}
