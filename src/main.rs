//! Harvest-Watch main entry point
//!
//! This is the command-line interface for the Galaxy Harvester resource monitor.

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use harvest_watch::config::{load_config_with_hash, Config};
use harvest_watch::fetch::{
    coordinator_from_config, FetchOutcome, FetchSession, PollControl, Poller, StopReason,
};
use harvest_watch::output::{
    diff_records, load_statistics, print_statistics, render_records, write_markdown_report,
    OutputFormat, RecordChanges,
};
use harvest_watch::resource::{sort_records, SortKey};
use harvest_watch::storage::{open_storage, SqliteStorage, Storage};
use harvest_watch::FetchError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Harvest-Watch: keeps an eye on Galaxy Harvester resources
///
/// Fetches the current resource list of one game server with your session
/// token, prints it, and reports which resources appeared or disappeared
/// since the previous poll.
#[derive(Parser, Debug)]
#[command(name = "harvest-watch")]
#[command(version)]
#[command(about = "A Galaxy Harvester resource monitor", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Galaxy Harvester session token
    #[arg(long, env = "GH_SID", hide_env_values = true)]
    token: Option<String>,

    /// Game server ID, overrides the configuration
    #[arg(long, value_name = "ID")]
    server: Option<String>,

    /// Upstream sort order (by-name, by-category, by-upload-time)
    #[arg(long, value_name = "KEY")]
    sort: Option<String>,

    /// Fetch once and exit instead of polling
    #[arg(long)]
    once: bool,

    /// Output format (table, markdown, json)
    #[arg(long, default_value = "table")]
    format: OutputFormat,

    /// Re-sort fetched records locally before printing
    #[arg(long, value_name = "KEY", value_parser = parse_sort_key)]
    local_sort: Option<SortKey>,

    /// Also write each poll as a markdown report to this file
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be fetched without fetching
    #[arg(long, conflicts_with_all = ["history", "once"])]
    dry_run: bool,

    /// Show statistics from the poll history and exit
    #[arg(long, conflicts_with_all = ["dry_run", "once"])]
    history: bool,
}

fn parse_sort_key(value: &str) -> Result<SortKey, String> {
    value.parse()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config, &cli)
    } else if cli.history {
        handle_history(&config)
    } else {
        handle_poll(&config, &cli).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("harvest_watch=info,warn"),
            1 => EnvFilter::new("harvest_watch=debug,info"),
            2 => EnvFilter::new("harvest_watch=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be fetched
fn handle_dry_run(config: &Config, cli: &Cli) -> anyhow::Result<()> {
    let mut coordinator = coordinator_from_config(config)?;
    apply_overrides(&mut coordinator, cli)?;
    let session = coordinator.session();

    println!("=== Harvest-Watch Dry Run ===\n");

    println!("Upstream:");
    println!("  Endpoint: {}", coordinator.transport().endpoint());
    println!("  Session cookie: {}", config.upstream.session_cookie);
    println!("  Timeout: {}s", config.upstream.request_timeout_secs);

    println!("\nSession:");
    println!("  Server: {}", session.server_id());
    println!(
        "  Sort: {} (sent as {})",
        session.sort_key(),
        session.sort_key().upstream_param()
    );
    println!(
        "  Token: {}",
        if cli.token.as_deref().map_or(true, |t| t.trim().is_empty()) {
            "missing"
        } else {
            "provided"
        }
    );

    println!("\nUser Agent:");
    println!("  {}/{}", config.user_agent.name, config.user_agent.version);

    println!("\nPolling:");
    println!(
        "  Interval: {}s",
        Poller::new(Duration::from_secs(config.poll.interval_secs))
            .interval()
            .as_secs()
    );
    match &config.storage {
        Some(storage) => println!(
            "  History: {} (keep {} polls)",
            storage.database_path, storage.keep_polls
        ),
        None => println!("  History: disabled"),
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the --history mode: shows statistics from the poll database
fn handle_history(config: &Config) -> anyhow::Result<()> {
    let storage_config = config
        .storage
        .as_ref()
        .context("No [storage] section configured, there is no history to show")?;

    println!("Database: {}\n", storage_config.database_path);

    let storage = open_storage(Path::new(&storage_config.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats, Utc::now());

    Ok(())
}

/// Handles fetching, either once or on the poll interval until Ctrl-C
async fn handle_poll(config: &Config, cli: &Cli) -> anyhow::Result<()> {
    let mut coordinator = coordinator_from_config(config)?;
    apply_overrides(&mut coordinator, cli)?;

    let mut history = match &config.storage {
        Some(storage) => Some(History {
            storage: open_storage(Path::new(&storage.database_path))?,
            keep: storage.keep_polls,
        }),
        None => None,
    };

    // Server and sort cannot change while polling
    let session = coordinator.session().clone();
    let token = cli.token.clone().unwrap_or_default();

    tracing::info!(
        "Fetching resources for server {} sorted {}",
        session.server_id(),
        session.sort_key()
    );

    if cli.once {
        let result = coordinator.fetch(&token).await;
        return match result {
            Ok(outcome) => present(&outcome, &session, history.as_mut(), cli),
            Err(e) => {
                eprintln!("{}", e.user_message());
                Err(e.into())
            }
        };
    }

    let poller = Poller::new(Duration::from_secs(config.poll.interval_secs));
    tracing::info!("Polling every {}s, press Ctrl-C to stop", poller.interval().as_secs());

    let on_cycle = |cycle: u64, result: &Result<FetchOutcome, FetchError>| {
        match result {
            Ok(outcome) => {
                if let Err(e) = present(outcome, &session, history.as_mut(), cli) {
                    tracing::error!("Cycle {}: {:#}", cycle, e);
                }
            }
            Err(e) => eprintln!("{}", e.user_message()),
        }
        PollControl::Continue
    };

    tokio::select! {
        summary = poller.run(&mut coordinator, &token, on_cycle) => {
            if summary.stopped_by == StopReason::Fatal {
                anyhow::bail!("Polling stopped, the session token is missing or was rejected");
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, stopping");
        }
    }

    Ok(())
}

/// Applies --server and --sort on top of the configured selection
fn apply_overrides<T: harvest_watch::Transport>(
    coordinator: &mut harvest_watch::FetchCoordinator<T>,
    cli: &Cli,
) -> anyhow::Result<()> {
    if cli.server.is_none() && cli.sort.is_none() {
        return Ok(());
    }

    let server = cli
        .server
        .clone()
        .unwrap_or_else(|| coordinator.session().server_id().to_string());
    let sort = cli
        .sort
        .clone()
        .unwrap_or_else(|| coordinator.session().sort_key().to_string());

    coordinator.configure(&server, &sort)?;
    Ok(())
}

/// Stored poll history and how much of it to keep
struct History {
    storage: SqliteStorage,
    keep: usize,
}

impl History {
    /// Stores a poll and returns the changes against the one before it
    fn record(
        &mut self,
        session: &FetchSession,
        outcome: &FetchOutcome,
    ) -> anyhow::Result<Option<RecordChanges>> {
        let previous = match self.storage.latest_poll()? {
            Some(poll) => Some(self.storage.load_records(poll.id)?),
            None => None,
        };

        let poll_id = self.storage.record_poll(session, outcome)?;
        let pruned = self.storage.prune_history(self.keep)?;
        tracing::debug!("Stored poll {}, pruned {} old polls", poll_id, pruned);

        Ok(previous.map(|records| diff_records(&records, &outcome.records)))
    }
}

/// Prints one successful fetch and records it in the history
fn present(
    outcome: &FetchOutcome,
    session: &FetchSession,
    history: Option<&mut History>,
    cli: &Cli,
) -> anyhow::Result<()> {
    for warning in &outcome.warnings {
        tracing::warn!("{}", warning);
    }

    let changes = match history {
        Some(history) => history.record(session, outcome)?,
        None => None,
    };

    let mut records = outcome.records.clone();
    if let Some(key) = cli.local_sort {
        sort_records(&mut records, key);
    }

    print!("{}", render_records(&records, cli.format)?);

    if let Some(changes) = &changes {
        if changes.is_empty() {
            tracing::info!("No new or removed resources since the last poll");
        }
        for name in &changes.added {
            println!("+ {}", name);
        }
        for name in &changes.removed {
            println!("- {}", name);
        }
    }

    if let Some(path) = &cli.report {
        write_markdown_report(&records, changes.as_ref(), path)?;
        tracing::info!("Report written to {}", path.display());
    }

    Ok(())
}
