//! CLI argument parsing and validation module
//!
//! Handles command-line interface using clap, including:
//! - Subcommands (watch, show, login, credentials)
//! - Storage directory override
//! - Sort column and order
//! - Output format selection (human/JSON)
//! - Verbosity and prompt control

pub mod prompt;

use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::constants::{REFRESH_SECS_MAX, REFRESH_SECS_MIN};
use crate::models::{Column, SortOrder};

pub use prompt::TerminalPrompt;

/// What the binary was asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Refresh the table until interrupted
    Watch,
    /// One refresh, then exit
    Show,
    /// Re-enter and verify the saved login
    Login,
    /// Print the saved login without the password
    Credentials,
}

/// Parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub command: CommandKind,
    pub config_dir: Option<PathBuf>,
    /// Overrides `[monitor] refresh_interval` when set
    pub interval: Option<u64>,
    /// Overrides `[monitor] sort_column` when set
    pub sort_column: Option<Column>,
    /// Forces descending order when set
    pub descending: bool,
    pub json_output: bool,
    pub verbosity: u8,
    pub no_prompt: bool,
}

impl CliConfig {
    /// Sort order after applying `--desc` over the settings file value
    pub fn sort_order(&self, configured: SortOrder) -> SortOrder {
        if self.descending {
            SortOrder::Descending
        } else {
            configured
        }
    }
}

/// Version string with the commit it was built from
pub fn version() -> &'static str {
    concat!(env!("OMADA_MONITOR_VERSION"), " (", env!("GIT_HASH"), ")")
}

pub fn build_command() -> Command {
    Command::new("omada-monitor")
        .version(version())
        .about("Monitor clients connected to an Omada network controller")
        .long_about(
            "Shows a periodically refreshed table of the clients known to an Omada controller site. \
             Login details are saved encrypted in the storage directory and reused on the next start.",
        )
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .value_name("DIR")
                .help("Directory holding the key, saved credentials and config.toml")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("interval")
                .short('i')
                .long("interval")
                .value_name("SECONDS")
                .help("Refresh interval in seconds (1-3600, default 30)")
                .value_parser(value_parser!(u64).range(REFRESH_SECS_MIN..=REFRESH_SECS_MAX))
                .global(true),
        )
        .arg(
            Arg::new("sort")
                .short('s')
                .long("sort")
                .value_name("COLUMN")
                .help("Column to sort by (name, ip, active, networkName, port, activity, trafficDown, trafficUp, uptime)")
                .value_parser(|s: &str| s.parse::<Column>())
                .global(true),
        )
        .arg(
            Arg::new("desc")
                .long("desc")
                .help("Sort in descending order")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("json")
                .short('j')
                .long("json")
                .help("Output in JSON format")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (repeatable)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("no-prompt")
                .long("no-prompt")
                .help("Never prompt for credentials; only use the saved login")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(Command::new("watch").about("Refresh the client table until interrupted (default)"))
        .subcommand(Command::new("show").about("Fetch the client table once and exit"))
        .subcommand(Command::new("login").about("Enter, save and verify controller login details"))
        .subcommand(Command::new("credentials").about("Show the saved login details with the password hidden"))
}

/// Parse command line arguments and return configuration
pub fn parse_args() -> Result<CliConfig> {
    let matches = build_command().get_matches();
    Ok(config_from_matches(&matches))
}

/// Parses an explicit argument list (first item is the binary name)
pub fn parse_from<I, T>(args: I) -> Result<CliConfig>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = build_command().try_get_matches_from(args)?;
    Ok(config_from_matches(&matches))
}

fn config_from_matches(matches: &ArgMatches) -> CliConfig {
    let command = match matches.subcommand_name() {
        Some("show") => CommandKind::Show,
        Some("login") => CommandKind::Login,
        Some("credentials") => CommandKind::Credentials,
        _ => CommandKind::Watch,
    };

    CliConfig {
        command,
        config_dir: matches.get_one::<PathBuf>("config-dir").cloned(),
        interval: matches.get_one::<u64>("interval").copied(),
        sort_column: matches.get_one::<Column>("sort").copied(),
        descending: matches.get_flag("desc"),
        json_output: matches.get_flag("json"),
        verbosity: matches.get_count("verbose"),
        no_prompt: matches.get_flag("no-prompt"),
    }
}
