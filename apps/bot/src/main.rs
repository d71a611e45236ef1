//! TeamWatch bot
//!
//! Loads configuration from the environment (and `.env`), opens the SQLite
//! database, starts the notifier engine and the Telegram update listener,
//! then runs until Ctrl+C.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use teamwatch_notifier::{
    CommandDispatcher, DependenciesBuilder, MaintenanceMode, NotifierConfig, NotifierEngine,
    StatusFetcher, TeamRosterSource, TelegramClient, UpdateListener,
};
use teamwatch_storage::{Database, SqliteMemberRepository, SqliteSubscriberRepository};
use tokio::sync::Mutex;
use tracing::{error, info};

/// Prefix for rotated log files, e.g. `teamwatch.2026-01-22.log`
const LOG_PREFIX: &str = "teamwatch";

fn get_logs_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("teamwatch").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Initialize tracing with console and daily-rotated file output.
///
/// The returned guard flushes the file writer and must outlive the program.
fn init_tracing() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    dotenvy::dotenv().ok();

    let logs_dir = get_logs_dir();
    if let Err(e) = std::fs::create_dir_all(&logs_dir) {
        eprintln!("Warning: Failed to create logs directory: {}", e);
    }

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix("log")
        .build(&logs_dir)
        .context("Failed to create log file appender")?;
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    // RUST_LOG takes precedence
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("info")
            .add_directive("teamwatch=debug".parse()?)
            .add_directive("teamwatch_core=debug".parse()?)
            .add_directive("teamwatch_notifier=debug".parse()?)
            .add_directive("teamwatch_storage=debug".parse()?)
            .add_directive("hyper=warn".parse()?)
            .add_directive("reqwest=warn".parse()?),
    };

    let console_layer = fmt::layer()
        .with_ansi(true)
        .compact()
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_file(true)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    Ok(guard)
}

fn open_database(config: &NotifierConfig) -> Result<Database> {
    let path = config
        .database_path
        .clone()
        .or_else(teamwatch_storage::default_database_path)
        .context("No database path configured and no platform data directory")?;

    info!(path = %path.display(), "[Main] Opening database");
    Database::open(&path).with_context(|| format!("Failed to open database at {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let _guard = init_tracing()?;

    info!(version = env!("CARGO_PKG_VERSION"), "[Main] TeamWatch starting");

    let config = NotifierConfig::from_env().context("Invalid configuration")?;
    let db = Arc::new(Mutex::new(open_database(&config)?));

    let member_repo = Arc::new(SqliteMemberRepository::new(db.clone()));
    let subscriber_repo = Arc::new(SqliteSubscriberRepository::new(db));

    let telegram = Arc::new(
        TelegramClient::new(
            &config.telegram_api_url,
            &config.telegram_token,
            config.request_timeout,
        )
        .context("Failed to build Telegram client")?,
    );
    let status_source = Arc::new(
        StatusFetcher::new(config.status_url(), config.request_timeout)
            .context("Failed to build status client")?,
    );
    let roster_source = Arc::new(
        TeamRosterSource::new(config.team_members_url(), config.request_timeout)
            .context("Failed to build roster client")?
            .with_token(config.lichess_token.clone())
            .with_extra_members(config.extra_members.clone()),
    );

    let deps = DependenciesBuilder::new()
        .with_member_repo(member_repo)
        .with_subscriber_repo(subscriber_repo.clone())
        .with_status_source(status_source)
        .with_roster_source(roster_source)
        .with_transport(telegram.clone())
        .build()?;

    let engine = NotifierEngine::start(&config, deps);

    let dispatcher = Arc::new(CommandDispatcher::new(
        subscriber_repo,
        engine.cache(),
        engine.fanout(),
        MaintenanceMode::new(),
        config.admin_id,
    ));
    let listener = UpdateListener::new(telegram, dispatcher).spawn();

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "[Main] Failed to listen for shutdown signal");
    }

    info!("[Main] Shutting down");
    listener.abort();
    engine.shutdown().await;

    Ok(())
}
