//! Login flow
//!
//! Unauthenticated -> Authenticating -> Authenticated, or Failed and back to
//! Unauthenticated for the next attempt. Saved credentials are tried once
//! without asking; after that the user is prompted at most `max_attempts`
//! times before giving up.

use log::{info, warn};
use serde_json::json;
use thiserror::Error;

use crate::constants::DEFAULT_SITE;
use crate::controller::{AuthError, Connector, Session};
use crate::credentials::CredentialStore;
use crate::logging::log_event;
use crate::models::CredentialRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginState {
    Unauthenticated,
    Authenticating,
    Authenticated,
    Failed(AuthError),
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("login cancelled")]
    Cancelled,
    #[error("login failed after {attempts} attempt(s): {last}")]
    AttemptsExhausted { attempts: u32, last: AuthError },
    #[error("{0}, and interactive login is disabled")]
    PromptUnavailable(String),
}

/// Interactive credential entry (the login dialog)
pub trait CredentialPrompt {
    /// Asks for credentials, pre-filled from `saved`. `None` means the user cancelled.
    fn prompt(&mut self, saved: &CredentialRecord, last_error: Option<&AuthError>) -> Option<CredentialRecord>;
}

pub struct LoginFlow<'a> {
    store: &'a CredentialStore,
    connector: &'a dyn Connector,
    max_attempts: u32,
    state: LoginState,
}

impl<'a> LoginFlow<'a> {
    pub fn new(store: &'a CredentialStore, connector: &'a dyn Connector, max_attempts: u32) -> Self {
        Self {
            store,
            connector,
            max_attempts: max_attempts.max(1),
            state: LoginState::Unauthenticated,
        }
    }

    pub fn state(&self) -> &LoginState {
        &self.state
    }

    /// Auto-login first; fall back to the prompt when one is available
    pub fn run(&mut self, prompt: Option<&mut dyn CredentialPrompt>) -> Result<Session, LoginError> {
        let skipped = match self.auto_login() {
            Ok(session) => return Ok(session),
            Err(reason) => reason,
        };
        match prompt {
            Some(prompt) => self.interactive(prompt),
            None => Err(LoginError::PromptUnavailable(skipped)),
        }
    }

    /// Logs in with the saved credentials without asking the user.
    /// The error says why the saved login could not be used.
    fn auto_login(&mut self) -> Result<Session, String> {
        let saved = self.store.load();
        if !saved.is_complete() {
            return Err("no complete saved credentials".to_string());
        }
        self.attempt(&saved).map_err(|e| {
            warn!("Auto-login failed: {}", e);
            format!("saved credentials failed ({})", e)
        })
    }

    /// Prompts until a login succeeds, the user cancels, or attempts run out.
    /// Entered credentials are saved before each attempt.
    pub fn interactive(&mut self, prompt: &mut dyn CredentialPrompt) -> Result<Session, LoginError> {
        let mut last_error: Option<AuthError> = None;

        for attempt in 1..=self.max_attempts {
            let mut saved = self.store.load();
            if saved.site.as_deref().map_or(true, str::is_empty) {
                saved.site = Some(DEFAULT_SITE.to_string());
            }

            let entered = match prompt.prompt(&saved, last_error.as_ref()) {
                Some(record) => record,
                None => {
                    self.state = LoginState::Unauthenticated;
                    info!("Login cancelled by user");
                    return Err(LoginError::Cancelled);
                }
            };

            if let Err(e) = self.store.save(&entered) {
                warn!("Could not save credentials: {}", e);
            }

            match self.attempt(&entered) {
                Ok(session) => return Ok(session),
                Err(e) => {
                    log_event(
                        log::Level::Warn,
                        "Interactive login failed",
                        &json!({
                            "event": "login_failed",
                            "attempt": attempt,
                            "max_attempts": self.max_attempts,
                            "error": e.to_string(),
                        }),
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(LoginError::AttemptsExhausted {
            attempts: self.max_attempts,
            last: last_error.unwrap_or(AuthError::Rejected("no attempt made".to_string())),
        })
    }

    fn attempt(&mut self, credentials: &CredentialRecord) -> Result<Session, AuthError> {
        self.state = LoginState::Authenticating;
        match Session::open(self.connector, credentials) {
            Ok(session) => {
                self.state = LoginState::Authenticated;
                log_event(
                    log::Level::Info,
                    "Logged in",
                    &json!({
                        "event": "login",
                        "username": session.username(),
                        "base_url": session.target().base_url,
                        "site": session.target().site,
                        "verify_tls": session.target().verify_tls,
                    }),
                );
                if !session.target().verify_tls {
                    warn!("TLS certificate verification is disabled for {}", session.target().base_url);
                }
                Ok(session)
            }
            Err(e) => {
                self.state = LoginState::Failed(e.clone());
                Err(e)
            }
        }
    }
}
