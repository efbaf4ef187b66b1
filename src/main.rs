#![forbid(unsafe_code)]

use anyhow::{bail, Context, Result};
use std::io::{IsTerminal, Write};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use omada_monitor::cli::{self, CliConfig, CommandKind, TerminalPrompt};
use omada_monitor::config::{self, Settings};
use omada_monitor::controller::{DriverConnector, Session};
use omada_monitor::credentials::{CredentialStore, LoadOutcome};
use omada_monitor::login::{CredentialPrompt, LoginFlow};
use omada_monitor::monitor::{self, ClientTable, RefreshStatus};
use omada_monitor::{logging, output};

fn main() -> Result<()> {
    let config = cli::parse_args()?;
    logging::init(config.verbosity);

    let storage_dir = config::resolve_storage_dir(config.config_dir.as_deref())?;
    let settings = Settings::load_or_default(&storage_dir)?;

    let store = CredentialStore::new(&storage_dir);
    store
        .ensure_ready()
        .with_context(|| format!("cannot prepare credential storage at {}", storage_dir.display()))?;

    match config.command {
        CommandKind::Credentials => show_credentials(&store),
        CommandKind::Login => run_login(&store, &settings, &config),
        CommandKind::Show => run_show(&store, &settings, &config),
        CommandKind::Watch => run_watch(&store, &settings, &config),
    }
}

fn show_credentials(store: &CredentialStore) -> Result<()> {
    let (record, outcome) = match store.load_outcome() {
        LoadOutcome::Loaded(record) => (record, "loaded".to_string()),
        LoadOutcome::Empty => (Default::default(), "none saved".to_string()),
        LoadOutcome::Corrupt(reason) => (Default::default(), format!("unreadable ({})", reason)),
    };
    print!("{}", output::describe_credentials(&record, &outcome));
    println!("  Stored in: {}", store.dir().display());
    Ok(())
}

fn run_login(store: &CredentialStore, settings: &Settings, config: &CliConfig) -> Result<()> {
    if !prompt_allowed(config) {
        bail!("interactive login needs a terminal; run without --no-prompt");
    }

    let connector = DriverConnector;
    let mut flow = LoginFlow::new(store, &connector, settings.login.max_attempts);
    let mut prompt = TerminalPrompt::stdio();
    let session = flow.interactive(&mut prompt).context("login failed")?;

    println!(
        "Logged in as {} on {} (site '{}'); credentials saved to {}",
        session.username(),
        session.target().base_url,
        session.target().site,
        store.credentials_path().display()
    );
    session.close();
    Ok(())
}

fn run_show(store: &CredentialStore, settings: &Settings, config: &CliConfig) -> Result<()> {
    let mut session = open_session(store, settings, config)?;
    let mut table = new_table(settings, config);

    let status = monitor::refresh(&mut session, &mut table);
    session.close();

    print_cycle(&table, &status, config, false)?;
    if let RefreshStatus::Failed(cause) = status {
        bail!("Error refreshing data: {}", cause);
    }
    Ok(())
}

fn run_watch(store: &CredentialStore, settings: &Settings, config: &CliConfig) -> Result<()> {
    let mut session = open_session(store, settings, config)?;

    // Only after login: until then Ctrl+C must still end a blocked prompt or read
    let interrupted = Arc::new(AtomicBool::new(false));
    let _ = signal_hook::flag::register(signal_hook::consts::SIGINT, interrupted.clone());
    let _ = signal_hook::flag::register(signal_hook::consts::SIGTERM, interrupted.clone());

    let mut table = new_table(settings, config);
    let interval = config
        .interval
        .map(Duration::from_secs)
        .unwrap_or_else(|| settings.refresh_duration());

    let clear = !config.json_output && std::io::stdout().is_terminal();
    if !config.json_output {
        eprintln!("Refreshing every {}s. Press Ctrl+C to stop.", interval.as_secs());
    }

    monitor::run_refresh_loop(&mut session, &mut table, interval, &interrupted, |table, status| {
        if let Err(e) = print_cycle(table, status, config, clear) {
            log::error!("Cannot write output: {:#}", e);
        }
    });

    session.close();
    if !config.json_output {
        eprintln!("Monitoring stopped.");
    }
    Ok(())
}

/// Saved credentials first, then the prompt when a terminal is attached
fn open_session(store: &CredentialStore, settings: &Settings, config: &CliConfig) -> Result<Session> {
    let connector = DriverConnector;
    let mut flow = LoginFlow::new(store, &connector, settings.login.max_attempts);

    let mut terminal;
    let prompt: Option<&mut dyn CredentialPrompt> = if prompt_allowed(config) {
        terminal = TerminalPrompt::stdio();
        Some(&mut terminal)
    } else {
        None
    };

    flow.run(prompt).context("cannot log in to the controller")
}

fn new_table(settings: &Settings, config: &CliConfig) -> ClientTable {
    let column = config.sort_column.unwrap_or(settings.monitor.sort_column);
    ClientTable::new(column, config.sort_order(settings.sort_order()))
}

fn prompt_allowed(config: &CliConfig) -> bool {
    !config.no_prompt && std::io::stdin().is_terminal()
}

fn print_cycle(table: &ClientTable, status: &RefreshStatus, config: &CliConfig, clear: bool) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    if config.json_output {
        writeln!(stdout, "{}", output::render_json(table, status)?)?;
    } else {
        if clear {
            write!(stdout, "{}", output::CLEAR_SCREEN)?;
        }
        write!(stdout, "{}", output::render_table(table, status))?;
    }
    stdout.flush()?;
    Ok(())
}
