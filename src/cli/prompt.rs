//! Terminal login prompt
//!
//! Each field shows its saved value in brackets; pressing Enter keeps it.
//! The password is read without echo. End of input cancels the prompt.

use log::warn;
use std::io::{self, BufRead, Write};

use crate::controller::AuthError;
use crate::login::CredentialPrompt;
use crate::models::CredentialRecord;

type PasswordReader = fn(&str) -> io::Result<String>;

pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
    read_password: PasswordReader,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stderr> {
    /// Prompts on stderr so stdout stays clean for table or JSON output
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr(), |label: &str| rpassword::prompt_password(label))
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W, read_password: PasswordReader) -> Self {
        Self {
            input,
            output,
            read_password,
        }
    }

    /// `Ok(None)` on end of input
    fn ask(&mut self, label: &str, current: Option<&str>) -> io::Result<Option<String>> {
        match current.filter(|v| !v.is_empty()) {
            Some(value) => write!(self.output, "{} [{}]: ", label, value)?,
            None => write!(self.output, "{}: ", label)?,
        }
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let entered = line.trim();
        if entered.is_empty() {
            Ok(Some(current.unwrap_or_default().to_string()))
        } else {
            Ok(Some(entered.to_string()))
        }
    }

    fn ask_password(&mut self, saved: Option<&str>) -> io::Result<String> {
        let has_saved = saved.is_some_and(|p| !p.is_empty());
        let label = if has_saved { "Password [saved]: " } else { "Password: " };
        let entered = (self.read_password)(label)?;
        if entered.is_empty() {
            Ok(saved.unwrap_or_default().to_string())
        } else {
            Ok(entered)
        }
    }

    fn ask_yes_no(&mut self, label: &str, current: bool) -> io::Result<Option<bool>> {
        let hint = if current { "Y/n" } else { "y/N" };
        loop {
            let answer = match self.ask(&format!("{} ({})", label, hint), None)? {
                Some(answer) => answer,
                None => return Ok(None),
            };
            match answer.to_ascii_lowercase().as_str() {
                "" => return Ok(Some(current)),
                "y" | "yes" | "true" | "1" => return Ok(Some(true)),
                "n" | "no" | "false" | "0" => return Ok(Some(false)),
                _ => writeln!(self.output, "Please answer y or n.")?,
            }
        }
    }

    fn read_record(
        &mut self,
        saved: &CredentialRecord,
        last_error: Option<&AuthError>,
    ) -> io::Result<Option<CredentialRecord>> {
        if let Some(error) = last_error {
            writeln!(self.output, "Login failed: {}", error)?;
        }
        writeln!(self.output, "Omada controller login (Ctrl-D to cancel)")?;

        let Some(username) = self.ask("Username", saved.username.as_deref())? else {
            return Ok(None);
        };
        let password = self.ask_password(saved.password.as_deref())?;
        let Some(base_url) = self.ask("Base URL", saved.base_url.as_deref())? else {
            return Ok(None);
        };
        let Some(site) = self.ask("Site", saved.site.as_deref())? else {
            return Ok(None);
        };
        let Some(verify) = self.ask_yes_no("Verify TLS certificate", saved.verify)? else {
            return Ok(None);
        };

        Ok(Some(CredentialRecord::new(username, password, base_url, site, verify)))
    }
}

impl<R: BufRead, W: Write> CredentialPrompt for TerminalPrompt<R, W> {
    fn prompt(&mut self, saved: &CredentialRecord, last_error: Option<&AuthError>) -> Option<CredentialRecord> {
        match self.read_record(saved, last_error) {
            Ok(record) => record,
            Err(e) => {
                warn!("Login prompt failed: {}", e);
                None
            }
        }
    }
}
