//! Client record formatting
//!
//! Pure transformations from a raw controller client record into display
//! strings and parallel sort keys. Every function is total: malformed or
//! missing data degrades to the sentinel string instead of failing.

use serde_json::Value;

use crate::constants::SENTINEL;
use crate::models::{ClientRecord, Column, FormattedCell, FormattedRow, SortKey};

const SIZE_PREFIXES: [&str; 8] = ["", "K", "M", "G", "T", "P", "E", "Z"];

/// "CONNECTED" for active clients, the sentinel otherwise
pub fn format_status(active: bool) -> String {
    if active {
        "CONNECTED".to_string()
    } else {
        SENTINEL.to_string()
    }
}

/// Access point name for wireless clients, "<switch> Port <n>" for wired ones
pub fn format_port(record: &ClientRecord) -> String {
    if record.is_ap() {
        return record.text("apName").unwrap_or_else(|| SENTINEL.to_string());
    }
    match (record.text("switchName"), record.text("port")) {
        (Some(switch), Some(port)) => format!("{} Port {}", switch, port),
        _ => SENTINEL.to_string(),
    }
}

/// SSID for wireless clients, network name for wired ones
pub fn format_network(record: &ClientRecord) -> String {
    let field = if record.is_ap() { "ssid" } else { "networkName" };
    record.text(field).unwrap_or_else(|| SENTINEL.to_string())
}

/// Decimal-scaled byte count or rate with one decimal place.
/// Anything still at or above 1000 after "Z" is reported in "Y".
pub fn format_size(value: &Value, suffix: &str) -> String {
    match as_number(value) {
        Some(size) => scale_size(size, suffix),
        None => SENTINEL.to_string(),
    }
}

fn scale_size(mut size: f64, suffix: &str) -> String {
    for prefix in SIZE_PREFIXES {
        if size.abs() < 1000.0 {
            return format!("{:.1} {}{}", size, prefix, suffix);
        }
        size /= 1000.0;
    }
    format!("{:.1} Y{}", size, suffix)
}

/// Uptime rendered from its coarsest non-zero unit down
pub fn format_duration(value: &Value) -> String {
    match as_seconds(value) {
        Some(seconds) => format_seconds(seconds),
        None => SENTINEL.to_string(),
    }
}

/// `D d H:MM:SS`, `H:MM:SS`, `MM:SS` or `SS`; the sentinel for zero
pub fn format_seconds(seconds: i64) -> String {
    // floor division so negative inputs decompose the same way on every platform
    let days = seconds.div_euclid(86_400);
    let hours = seconds.div_euclid(3600).rem_euclid(24);
    let minutes = seconds.rem_euclid(3600).div_euclid(60);
    let secs = seconds.rem_euclid(60);

    if days > 0 {
        format!("{}d {}:{:02}:{:02}", days, hours, minutes, secs)
    } else if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{:02}:{:02}", minutes, secs)
    } else if secs > 0 {
        format!("{:02}", secs)
    } else {
        SENTINEL.to_string()
    }
}

/// Octet tuple for ordering dotted-quad addresses.
/// Anything other than exactly four integer parts maps to `SortKey::INVALID_IP`.
pub fn ip_sort_key(ip: &str) -> [i64; 4] {
    let parts: Vec<&str> = ip.split('.').collect();
    if parts.len() != 4 {
        return SortKey::INVALID_IP;
    }
    let mut octets = [0i64; 4];
    for (slot, part) in octets.iter_mut().zip(parts) {
        match part.trim().parse::<i64>() {
            Ok(n) => *slot = n,
            Err(_) => return SortKey::INVALID_IP,
        }
    }
    octets
}

/// Formats every column of one client record
pub fn build_row(record: &ClientRecord) -> FormattedRow {
    FormattedRow {
        cells: Column::ALL.map(|column| build_cell(record, column)),
    }
}

fn build_cell(record: &ClientRecord, column: Column) -> FormattedCell {
    match column {
        Column::Name => record
            .text("name")
            .map(FormattedCell::text)
            .unwrap_or_else(FormattedCell::sentinel),
        Column::Ip => {
            let ip = record.text("ip").unwrap_or_else(|| SENTINEL.to_string());
            FormattedCell {
                sort: SortKey::Ip(ip_sort_key(&ip)),
                display: ip,
            }
        }
        Column::Status => FormattedCell::text(format_status(record.get("active").is_some_and(is_truthy))),
        Column::Network => FormattedCell::text(format_network(record)),
        Column::Port => FormattedCell::text(format_port(record)),
        Column::Activity => size_cell(record, column.key(), "B/s"),
        Column::Download | Column::Upload => size_cell(record, column.key(), "B"),
        Column::Uptime => {
            let seconds = field_or_zero(record, "uptime", as_seconds);
            FormattedCell {
                display: seconds.map(format_seconds).unwrap_or_else(|| SENTINEL.to_string()),
                sort: SortKey::Number(seconds.map(|s| s as f64)),
            }
        }
    }
}

fn size_cell(record: &ClientRecord, key: &str, suffix: &str) -> FormattedCell {
    let size = field_or_zero(record, key, as_number);
    FormattedCell {
        display: size
            .map(|s| scale_size(s, suffix))
            .unwrap_or_else(|| SENTINEL.to_string()),
        sort: SortKey::Number(size),
    }
}

/// Absent counters read as zero; present-but-unusable values stay unusable
fn field_or_zero<T: Default>(record: &ClientRecord, key: &str, coerce: fn(&Value) -> Option<T>) -> Option<T> {
    match record.get(key) {
        Some(value) => coerce(value),
        None => Some(T::default()),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

fn as_seconds(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
