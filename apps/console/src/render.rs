//! Plain-text rendering of list views, overlays and the dashboard.

use console_core::{
    dashboard::Dashboard, editor::RowMode, summary::StatusSummary, Column, TableView,
};
use shared::domain::Record;

fn summary_line(summary: &StatusSummary) -> String {
    let mut parts: Vec<String> = summary
        .buckets()
        .iter()
        .map(|bucket| format!("{}: {}", bucket.status, bucket.count))
        .collect();
    if summary.unassigned() > 0 {
        parts.push(format!(
            "unassigned (shown as {}): {}",
            summary.default_status(),
            summary.unassigned()
        ));
    }
    parts.join(" | ")
}

pub fn table(view: &TableView<'_>) -> String {
    let mut lines = Vec::new();
    let title = if view.query.is_empty() {
        format!("{} ({} records)", view.config.kind.label(), view.summary.total())
    } else {
        format!(
            "{} ({} of {} records match \"{}\")",
            view.config.kind.label(),
            view.matches,
            view.summary.total(),
            view.query
        )
    };
    lines.push(title);
    lines.push(summary_line(&view.summary));
    if view.loading {
        lines.push("Loading...".to_string());
    }

    let mut header = vec!["ID", "Status"];
    header.extend(view.config.columns.iter().map(|column| column.label));
    lines.push(header.join(" | "));

    if view.rows.is_empty() {
        lines.push("No records found.".to_string());
    }
    for row in &view.rows {
        let status = match row.mode {
            RowMode::Viewing => row.status.to_string(),
            RowMode::Editing { pending_status } => format!("[{pending_status}]"),
        };
        let mut cells = vec![row.record.id.to_string(), status];
        cells.extend(view.config.columns.iter().map(|column| column.text(row.record)));
        lines.push(cells.join(" | "));
    }

    lines.push(format!("Page {} of {}", view.page.current, view.page.total));
    lines.join("\n")
}

pub fn detail(record: &Record, columns: &[Column]) -> String {
    let width = columns
        .iter()
        .map(|column| column.label.len())
        .max()
        .unwrap_or(0);
    columns
        .iter()
        .map(|column| format!("{:<width$}  {}", column.label, column.text(record)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn dashboard(dashboard: &Dashboard) -> String {
    dashboard
        .kinds
        .iter()
        .map(|entry| {
            if entry.available {
                format!(
                    "{:<18} {:>4}  {}",
                    entry.kind.label(),
                    entry.total,
                    summary_line(&entry.summary)
                )
            } else {
                format!("{:<18}    -  unavailable", entry.kind.label())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
