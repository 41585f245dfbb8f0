//! Report formatting.

use clap::ValueEnum;
use cmsmig_core::MigrationReport;
use comfy_table::{Cell, Table};

/// Output format for the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// ASCII table summary
    Table,
    /// Full report as JSON
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Table => write!(f, "table"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

pub fn format_report(report: &MigrationReport, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Json => serde_json::to_string_pretty(report),
        ReportFormat::Table => Ok(format_table(report)),
    }
}

fn format_table(report: &MigrationReport) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Handler", "Status", "Processed", "Migrated", "Skipped"]);
    for progress in &report.handlers {
        table.add_row(vec![
            Cell::new(progress.entity_type),
            Cell::new(progress.status),
            Cell::new(progress.processed),
            Cell::new(progress.migrated),
            Cell::new(progress.skipped),
        ]);
    }

    let mut output = format!("Migration {} {}\n{table}", report.migration_id, report.status);
    output.push_str(&format!(
        "\nblocked: {} ({} properties), ignored properties: {}, replaced data types: {}",
        report.blocked, report.blocked_properties, report.ignored_properties, report.replaced_data_types
    ));

    if !report.unmapped_editors.is_empty() {
        output.push_str(&format!(
            "\nno migrator for: {}",
            report.unmapped_editors.join(", ")
        ));
    }
    if !report.fallback_editors.is_empty() {
        output.push_str(&format!(
            "\nfallback used for: {}",
            report.fallback_editors.join(", ")
        ));
    }
    for warning in &report.warnings {
        output.push_str(&format!("\nwarning: {warning}"));
    }

    output
}
