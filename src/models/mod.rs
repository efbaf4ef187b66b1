//! Data models module
//!
//! Defines core data structures:
//! - CredentialRecord: saved login material, encrypted at rest
//! - ClientRecord: raw client snapshot returned by the controller
//! - Column / SortOrder: the fixed table layout and its ordering
//! - SortKey / FormattedCell / FormattedRow: display text paired with sort keys

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::constants::SENTINEL;

/// Saved login material for one controller
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    /// Controller base URL
    #[serde(default, rename = "baseurl")]
    pub base_url: Option<String>,
    /// Controller site identifier
    #[serde(default)]
    pub site: Option<String>,
    /// Whether the controller's TLS certificate is verified
    #[serde(default)]
    pub verify: bool,
}

impl CredentialRecord {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        base_url: impl Into<String>,
        site: impl Into<String>,
        verify: bool,
    ) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            base_url: Some(base_url.into()),
            site: Some(site.into()),
            verify,
        }
    }

    /// True when nothing has been saved
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Enough material to attempt an automatic login.
    /// Username, password and base URL must be non-empty; the site may be empty.
    pub fn is_complete(&self) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        filled(&self.username) && filled(&self.password) && filled(&self.base_url) && self.site.is_some()
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("site", &self.site)
            .field("verify", &self.verify)
            .finish()
    }
}

/// Raw client snapshot as delivered by the controller library.
///
/// Field presence and types vary across controller firmware versions, so the
/// record is kept as an untyped map and interpreted by the formatter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientRecord(pub serde_json::Map<String, serde_json::Value>);

impl ClientRecord {
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Field rendered as text. Absent and null fields yield `None`.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Connected through a wireless access point
    pub fn is_ap(&self) -> bool {
        matches!(self.0.get("connectDevType"), Some(serde_json::Value::String(t)) if t == "ap")
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for ClientRecord {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(map)
    }
}

/// Table columns, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "ip")]
    Ip,
    #[serde(rename = "active")]
    Status,
    #[serde(rename = "networkName")]
    Network,
    #[serde(rename = "port")]
    Port,
    #[serde(rename = "activity")]
    Activity,
    #[serde(rename = "trafficDown")]
    Download,
    #[serde(rename = "trafficUp")]
    Upload,
    #[serde(rename = "uptime")]
    Uptime,
}

impl Column {
    pub const ALL: [Column; 9] = [
        Column::Name,
        Column::Ip,
        Column::Status,
        Column::Network,
        Column::Port,
        Column::Activity,
        Column::Download,
        Column::Upload,
        Column::Uptime,
    ];

    /// Client record field the column is derived from
    pub fn key(self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Ip => "ip",
            Column::Status => "active",
            Column::Network => "networkName",
            Column::Port => "port",
            Column::Activity => "activity",
            Column::Download => "trafficDown",
            Column::Upload => "trafficUp",
            Column::Uptime => "uptime",
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            Column::Name => "USERNAME",
            Column::Ip => "IP ADDRESS",
            Column::Status => "STATUS",
            Column::Network => "SSID/NETWORK",
            Column::Port => "AP/PORT",
            Column::Activity => "ACTIVITY",
            Column::Download => "DOWNLOAD",
            Column::Upload => "UPLOAD",
            Column::Uptime => "UPTIME",
        }
    }

    /// Relative width used when laying out the table
    pub fn width(self) -> usize {
        match self {
            Column::Name => 20,
            Column::Ip | Column::Network | Column::Port | Column::Uptime => 16,
            Column::Status | Column::Activity => 12,
            Column::Download | Column::Upload => 10,
        }
    }

    pub fn index(self) -> usize {
        Column::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Column {
    type Err = String;

    /// Accepts the field key or the header label, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Column::ALL
            .iter()
            .copied()
            .find(|c| c.key().eq_ignore_ascii_case(wanted) || c.header().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let keys: Vec<&str> = Column::ALL.iter().map(|c| c.key()).collect();
                format!("unknown column '{}' (expected one of: {})", wanted, keys.join(", "))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Ascending => f.write_str("ascending"),
            SortOrder::Descending => f.write_str("descending"),
        }
    }
}

/// Key used to order a cell instead of its display text
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SortKey {
    /// Dotted-quad octets; `[-1; 4]` for anything that is not a valid IP
    Ip([i64; 4]),
    /// Raw numeric value; `None` when the field was not numeric
    Number(Option<f64>),
    /// Display text
    Text(String),
}

impl SortKey {
    pub const INVALID_IP: [i64; 4] = [-1, -1, -1, -1];

    fn rank(&self) -> u8 {
        match self {
            SortKey::Ip(_) => 0,
            SortKey::Number(_) => 1,
            SortKey::Text(_) => 2,
        }
    }
}

impl Eq for SortKey {}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Ip(a), SortKey::Ip(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => match (a, b) {
                (Some(x), Some(y)) => x.total_cmp(y),
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Display text and the key it sorts by, derived from the same raw value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedCell {
    pub display: String,
    pub sort: SortKey,
}

impl FormattedCell {
    /// Cell whose sort key is its own text
    pub fn text(display: impl Into<String>) -> Self {
        let display = display.into();
        Self {
            sort: SortKey::Text(display.clone()),
            display,
        }
    }

    pub fn sentinel() -> Self {
        Self::text(SENTINEL)
    }
}

/// One table row: a cell per column, in `Column::ALL` order
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedRow {
    pub cells: [FormattedCell; 9],
}

impl FormattedRow {
    pub fn cell(&self, column: Column) -> &FormattedCell {
        &self.cells[column.index()]
    }

    pub fn display(&self, column: Column) -> &str {
        &self.cell(column).display
    }
}

impl Serialize for FormattedRow {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for column in Column::ALL {
            map.serialize_entry(column.key(), self.cell(column))?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests;
