//! Output formatting module
//!
//! Handles:
//! - Fixed-width client table for the terminal
//! - JSON snapshot output
//! - Status and sort summary lines

use anyhow::Result;
use serde_json::json;
use std::time::SystemTime;

use crate::models::{Column, CredentialRecord};
use crate::monitor::{ClientTable, RefreshStatus};

/// Clears the screen and homes the cursor between watch cycles
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Renders the table with a header, a rule, the rows and the status lines
pub fn render_table(table: &ClientTable, status: &RefreshStatus) -> String {
    let mut out = String::new();

    let header: Vec<&str> = Column::ALL.iter().map(|c| c.header()).collect();
    push_line(&mut out, &header);
    let rule_len: usize = Column::ALL.iter().map(|c| c.width()).sum();
    out.push_str(&"-".repeat(rule_len));
    out.push('\n');

    if table.is_empty() {
        out.push_str("No clients connected.\n");
    }
    for row in table.rows() {
        let cells: Vec<&str> = Column::ALL.iter().map(|c| row.display(*c)).collect();
        push_line(&mut out, &cells);
    }

    out.push('\n');
    out.push_str(&status.to_string());
    out.push('\n');
    out.push_str(&format!("Sorted by {} ({})\n", table.sort_column().header(), table.order()));
    out
}

/// Renders the table as a JSON document
pub fn render_json(table: &ClientTable, status: &RefreshStatus) -> Result<String> {
    let updated = match status {
        RefreshStatus::Updated { at, .. } => Some(iso8601(*at)?),
        _ => None,
    };
    let error = match status {
        RefreshStatus::Failed(cause) => Some(cause.clone()),
        _ => None,
    };

    let document = json!({
        "updated": updated,
        "count": table.len(),
        "sorted_by": table.sort_column().key(),
        "order": table.order(),
        "error": error,
        "clients": table.rows(),
    });
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Human summary of the saved login, password redacted
pub fn describe_credentials(record: &CredentialRecord, outcome: &str) -> String {
    let show = |value: &Option<String>| value.clone().filter(|v| !v.is_empty()).unwrap_or_else(|| "(not set)".to_string());
    let password = match record.password.as_deref() {
        Some(p) if !p.is_empty() => "********",
        _ => "(not set)",
    };

    let mut out = String::new();
    out.push_str(&format!("Saved credentials: {}\n", outcome));
    out.push_str(&format!("  Username: {}\n", show(&record.username)));
    out.push_str(&format!("  Password: {}\n", password));
    out.push_str(&format!("  Base URL: {}\n", show(&record.base_url)));
    out.push_str(&format!("  Site: {}\n", show(&record.site)));
    out.push_str(&format!("  Verify TLS: {}\n", if record.verify { "yes" } else { "no" }));
    out
}

fn iso8601(at: SystemTime) -> Result<String> {
    use time::OffsetDateTime;

    let timestamp = OffsetDateTime::from(at);
    Ok(timestamp.format(&time::format_description::well_known::Iso8601::DEFAULT)?)
}

fn push_line(out: &mut String, cells: &[&str]) {
    for (column, text) in Column::ALL.iter().zip(cells) {
        let width = column.width();
        out.push_str(&format!("{:<width$}", fit(text, width - 1), width = width));
    }
    let trimmed = out.trim_end_matches(' ').len();
    out.truncate(trimmed);
    out.push('\n');
}

/// Truncates to `max` characters, marking the cut with '~'
fn fit(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('~');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClientRecord, SortOrder};
    use serde_json::{json, Value};

    fn table_with(clients: Vec<Value>) -> ClientTable {
        let records: Vec<ClientRecord> = clients
            .into_iter()
            .filter_map(|v| match v {
                Value::Object(map) => Some(ClientRecord::from(map)),
                _ => None,
            })
            .collect();
        let mut table = ClientTable::new(Column::Uptime, SortOrder::Ascending);
        table.populate(&records);
        table
    }

    #[test]
    fn test_table_layout() {
        let table = table_with(vec![json!({
            "name": "laptop",
            "ip": "192.168.0.10",
            "active": true,
            "connectDevType": "ap",
            "ssid": "Home",
            "apName": "Hallway",
            "activity": 512,
            "trafficDown": 1048576,
            "trafficUp": 2048,
            "uptime": 3725
        })]);
        let status = RefreshStatus::Updated { at: SystemTime::now(), count: 1 };
        let text = render_table(&table, &status);
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("USERNAME            IP ADDRESS      STATUS"));
        assert!(lines[0].ends_with("UPTIME"));
        assert_eq!(lines[1].len(), 128);
        assert!(lines[2].starts_with("laptop              192.168.0.10    CONNECTED   Home"));
        assert!(lines[2].contains("Hallway"));
        assert!(lines[2].contains("512.0 B/s"));
        assert!(lines[2].contains("1.0 MB"));
        assert!(lines[2].ends_with("1:02:05"));
        assert!(text.contains("Last updated: "));
        assert!(text.ends_with("Sorted by UPTIME (ascending)\n"));
    }

    #[test]
    fn test_long_cells_are_truncated() {
        let table = table_with(vec![json!({"name": "a-very-long-device-hostname", "uptime": 1})]);
        let text = render_table(&table, &RefreshStatus::Pending);
        let row = text.lines().nth(2).unwrap();
        assert!(row.starts_with("a-very-long-device~ "));
    }

    #[test]
    fn test_empty_table_message() {
        let table = table_with(vec![]);
        let text = render_table(&table, &RefreshStatus::Failed("boom".to_string()));
        assert!(text.contains("No clients connected."));
        assert!(text.contains("Error refreshing data: boom"));
    }

    #[test]
    fn test_json_document() {
        let table = table_with(vec![json!({"name": "phone", "ip": "10.0.0.3", "uptime": 59})]);
        let status = RefreshStatus::Updated { at: SystemTime::now(), count: 1 };
        let parsed: Value = serde_json::from_str(&render_json(&table, &status).unwrap()).unwrap();

        assert_eq!(parsed["count"], 1);
        assert_eq!(parsed["sorted_by"], "uptime");
        assert_eq!(parsed["order"], "ascending");
        assert!(parsed["updated"].as_str().unwrap().contains('T'));
        assert!(parsed["error"].is_null());
        assert_eq!(parsed["clients"][0]["name"]["display"], "phone");
        assert_eq!(parsed["clients"][0]["ip"]["sort"], json!([10, 0, 0, 3]));
        assert_eq!(parsed["clients"][0]["uptime"]["display"], "59");
    }

    #[test]
    fn test_json_reports_failure() {
        let table = table_with(vec![]);
        let parsed: Value =
            serde_json::from_str(&render_json(&table, &RefreshStatus::Failed("down".to_string())).unwrap()).unwrap();
        assert!(parsed["updated"].is_null());
        assert_eq!(parsed["error"], "down");
    }

    #[test]
    fn test_credentials_summary_hides_password() {
        let record = CredentialRecord::new("admin", "hunter2", "https://controller:8043", "Default", false);
        let text = describe_credentials(&record, "loaded");
        assert!(text.contains("Username: admin"));
        assert!(text.contains("Password: ********"));
        assert!(!text.contains("hunter2"));
        assert!(text.contains("Verify TLS: no"));

        let empty = describe_credentials(&CredentialRecord::default(), "none saved");
        assert!(empty.contains("Username: (not set)"));
        assert!(empty.contains("Password: (not set)"));
    }
}
