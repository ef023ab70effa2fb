use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Global output format setting
static OUTPUT_JSON: AtomicBool = AtomicBool::new(false);

pub fn set_json_output(json: bool) {
    OUTPUT_JSON.store(json, Ordering::Relaxed);
}

pub fn is_json_output() -> bool {
    OUTPUT_JSON.load(Ordering::Relaxed)
}

/// Print a table or JSON depending on output mode
pub fn print_table<T, R, F>(items: &[T], to_row: F)
where
    T: Serialize,
    R: Tabled,
    F: Fn(&T) -> R,
{
    if is_json_output() {
        println!("{}", serde_json::to_string_pretty(items).unwrap_or_default());
    } else {
        let rows: Vec<R> = items.iter().map(|item| to_row(item)).collect();
        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{table}");
    }
}

/// Print a message (as a simple object in JSON mode)
pub fn print_message(message: &str) {
    if is_json_output() {
        println!(r#"{{"message": "{}"}}"#, message.replace('"', "\\\""));
    } else {
        println!("{message}");
    }
}

/// Color a status by its workflow-state name
pub fn status_colored(status: &str) -> String {
    let lower = status.to_lowercase();
    if lower.contains("done") || lower.contains("complete") || lower.contains("closed") {
        status.green().to_string()
    } else if lower.contains("progress") || lower.contains("started") {
        status.blue().to_string()
    } else if lower.contains("review") {
        status.magenta().to_string()
    } else if lower.contains("blocked") || lower.contains("canceled") || lower.contains("cancelled")
    {
        status.red().to_string()
    } else if lower.contains("backlog") || lower.contains("triage") {
        status.bright_black().to_string()
    } else {
        status.to_string()
    }
}

/// Format a date string as date only
pub fn format_date_only(iso: &str) -> String {
    use chrono::{DateTime, Utc};

    if let Ok(dt) = iso.parse::<DateTime<Utc>>() {
        dt.format("%Y-%m-%d").to_string()
    } else {
        iso.split('T').next().unwrap_or(iso).to_string()
    }
}

/// Truncate a string with ellipsis
pub fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", &s[..max - 3])
    }
}
