//! Replay driver: serves client snapshots from a JSON export on disk.
//!
//! Base URL form: `file:///path/to/clients.json`. The file may hold a bare
//! array of client records, `{"data": [...]}`, or the controller envelope
//! `{"result": {"data": [...]}}`. The file is re-read on every listing.

use std::fs;
use std::path::PathBuf;

use log::{debug, warn};
use serde_json::Value;

use super::{AuthError, Connector, ControllerClient, ControllerTarget, FetchError};
use crate::models::ClientRecord;

const SCHEME: &str = "file://";

#[derive(Debug, Default, Clone, Copy)]
pub struct ReplayConnector;

impl ReplayConnector {
    /// Whether this driver understands the given base URL
    pub fn handles(base_url: &str) -> bool {
        base_url.starts_with(SCHEME)
    }
}

impl Connector for ReplayConnector {
    fn connect(&self, target: &ControllerTarget) -> Result<Box<dyn ControllerClient>, AuthError> {
        let path = target
            .base_url
            .strip_prefix(SCHEME)
            .ok_or_else(|| AuthError::UnsupportedDriver(target.base_url.clone()))?;
        if path.is_empty() {
            return Err(AuthError::Unreachable("empty file path".to_string()));
        }
        if target.verify_tls {
            debug!("TLS verification does not apply to {}", target.base_url);
        }
        Ok(Box::new(ReplayClient {
            path: PathBuf::from(path),
            authenticated: false,
        }))
    }
}

struct ReplayClient {
    path: PathBuf,
    authenticated: bool,
}

impl ControllerClient for ReplayClient {
    fn authenticate(&mut self, username: &str, password: &str) -> Result<(), AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::Rejected("invalid username or password".to_string()));
        }
        if !self.path.is_file() {
            return Err(AuthError::Unreachable(format!("{} is not a readable file", self.path.display())));
        }
        self.authenticated = true;
        Ok(())
    }

    fn list_site_clients(&mut self) -> Result<Vec<ClientRecord>, FetchError> {
        if !self.authenticated {
            return Err(FetchError::NotAuthenticated);
        }
        let raw = fs::read_to_string(&self.path)
            .map_err(|e| FetchError::Unreachable(format!("{}: {}", self.path.display(), e)))?;
        let payload: Value = serde_json::from_str(&raw).map_err(|e| FetchError::Malformed(e.to_string()))?;
        parse_client_list(payload)
    }

    fn disconnect(&mut self) {
        self.authenticated = false;
    }
}

fn parse_client_list(payload: Value) -> Result<Vec<ClientRecord>, FetchError> {
    let entries = match payload {
        Value::Array(entries) => entries,
        Value::Object(mut envelope) => {
            let data = match envelope.remove("result") {
                Some(Value::Object(mut result)) => result.remove("data"),
                _ => envelope.remove("data"),
            };
            match data {
                Some(Value::Array(entries)) => entries,
                _ => return Err(FetchError::Malformed("no client array under 'data'".to_string())),
            }
        }
        _ => return Err(FetchError::Malformed("expected a JSON array or object".to_string())),
    };

    let mut clients = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            Value::Object(map) => clients.push(ClientRecord::from(map)),
            other => warn!("Skipping non-object client entry: {}", other),
        }
    }
    Ok(clients)
}
