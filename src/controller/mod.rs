//! Controller client seam
//!
//! The network controller library is an external collaborator. This module
//! pins down the narrow contract the monitor consumes from it:
//! - `Connector::connect(base_url, site, verify_tls)` yields a client handle
//! - `ControllerClient::authenticate` / `list_site_clients` / `disconnect`
//!
//! `Session` wraps an authenticated handle and guarantees `disconnect` is
//! invoked exactly once, whether the session is closed explicitly or dropped.

pub mod replay;

use log::{debug, info};
use thiserror::Error;

use crate::models::{ClientRecord, CredentialRecord};

pub use replay::ReplayConnector;

/// Authentication and connection failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("login rejected: {0}")]
    Rejected(String),
    #[error("controller unreachable: {0}")]
    Unreachable(String),
    #[error("no controller driver for '{0}'")]
    UnsupportedDriver(String),
    #[error("incomplete credentials: {0} is missing")]
    Incomplete(&'static str),
}

/// Client list retrieval failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("controller unreachable: {0}")]
    Unreachable(String),
    #[error("unexpected client list payload: {0}")]
    Malformed(String),
    #[error("session is not authenticated")]
    NotAuthenticated,
}

/// Where and how to reach a controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerTarget {
    pub base_url: String,
    pub site: String,
    pub verify_tls: bool,
}

/// A connected (not necessarily authenticated) controller handle
pub trait ControllerClient {
    fn authenticate(&mut self, username: &str, password: &str) -> Result<(), AuthError>;

    /// Fresh snapshot of every client known to the site
    fn list_site_clients(&mut self) -> Result<Vec<ClientRecord>, FetchError>;

    /// Releases session resources
    fn disconnect(&mut self);
}

/// Factory for controller handles
pub trait Connector {
    fn connect(&self, target: &ControllerTarget) -> Result<Box<dyn ControllerClient>, AuthError>;
}

/// Picks a driver from the base URL scheme
#[derive(Debug, Default, Clone, Copy)]
pub struct DriverConnector;

impl Connector for DriverConnector {
    fn connect(&self, target: &ControllerTarget) -> Result<Box<dyn ControllerClient>, AuthError> {
        if ReplayConnector::handles(&target.base_url) {
            return ReplayConnector.connect(target);
        }
        Err(AuthError::UnsupportedDriver(target.base_url.clone()))
    }
}

/// Authenticated controller session
pub struct Session {
    client: Box<dyn ControllerClient>,
    target: ControllerTarget,
    username: String,
    closed: bool,
}

impl Session {
    /// Connects and authenticates with saved or entered credentials
    pub fn open(connector: &dyn Connector, credentials: &CredentialRecord) -> Result<Self, AuthError> {
        let username = required(&credentials.username, "username")?;
        let password = required(&credentials.password, "password")?;
        let base_url = required(&credentials.base_url, "base URL")?;

        let target = ControllerTarget {
            base_url: base_url.to_string(),
            site: credentials.site.clone().unwrap_or_default(),
            verify_tls: credentials.verify,
        };

        debug!("Connecting to {} (site '{}', verify TLS: {})", target.base_url, target.site, target.verify_tls);
        let client = connector.connect(&target)?;

        // wrapped before authenticating so a rejected handle is still released
        let mut session = Session {
            client,
            target,
            username: username.to_string(),
            closed: false,
        };
        session.client.authenticate(username, password)?;
        info!("Authenticated as {} on {}", session.username, session.target.base_url);
        Ok(session)
    }

    pub fn target(&self) -> &ControllerTarget {
        &self.target
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn list_site_clients(&mut self) -> Result<Vec<ClientRecord>, FetchError> {
        if self.closed {
            return Err(FetchError::NotAuthenticated);
        }
        self.client.list_site_clients()
    }

    /// Disconnects now instead of at drop
    pub fn close(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if !self.closed {
            self.closed = true;
            self.client.disconnect();
            debug!("Disconnected from {}", self.target.base_url);
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn required<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str, AuthError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AuthError::Incomplete(name)),
    }
}
