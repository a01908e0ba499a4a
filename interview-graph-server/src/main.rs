//! interview-graph HTTP server.
//!
//! Configure via env (or `.env`): `OPENAI_API_KEY`, `OPENAI_API_BASE`, `OPENAI_MODEL`,
//! `DB_PATH`, `QUALITY_PASS_SCORE`, `MAX_ITERATIONS`, `PROGRESS_CAPACITY`,
//! `PROGRESS_LINGER_SECS`, `CHECKPOINT_TTL_SECS`, `CHECKPOINT_SWEEP_SECS`, `LISTEN`,
//! `LOG_FILE`. Set `OFFLINE_LLM=1` to serve canned generation replies instead of
//! calling a model.

use std::sync::Arc;
use std::time::Duration;

use interview_graph::{
    offline_llm, ChatOpenAI, Checkpointer, InterviewService, InterviewState, JsonSerializer,
    LlmClient, LlmSettings, ProgressHub, ServiceConfig, SqliteSaver,
};
use tracing::info;

const DEFAULT_SWEEP_SECS: u64 = 3600;

/// Load .env from current directory; if not found, try parent (workspace root when run from crate dir).
fn load_dotenv() {
    if dotenv::dotenv().is_ok() {
        return;
    }
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(parent) = cwd.parent() {
            let env_path = parent.join(".env");
            if env_path.is_file() {
                let _ = dotenv::from_path(env_path);
            }
        }
    }
}

/// Initializes tracing: always to stdout; if env `LOG_FILE` is set, also to that file (append, plain text).
fn init_tracing() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;
    use tracing_subscriber::Layer;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("info,interview_graph=debug,interview_graph_server=debug")
    });

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_filter(filter.clone());

    let registry = tracing_subscriber::registry().with(stdout_layer);

    if let Ok(path) = std::env::var("LOG_FILE") {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false)
            .with_filter(filter);
        registry.with(file_layer).init();
        tracing::info!(path = %path, "logging to file");
    } else {
        registry.init();
    }
    Ok(())
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "yes" | "on")
}

fn build_llm() -> Result<Arc<dyn LlmClient>, Box<dyn std::error::Error + Send + Sync>> {
    if std::env::var("OFFLINE_LLM").map(|v| is_truthy(&v)).unwrap_or(false) {
        info!("OFFLINE_LLM set: serving canned generation replies");
        return Ok(Arc::new(offline_llm(&[]).without_recording()));
    }
    let settings = LlmSettings::from_env()?;
    info!(model = %settings.model, base_url = ?settings.api_base, "LLM config loaded");
    Ok(Arc::new(ChatOpenAI::from_settings(&settings)))
}

/// Calls `reclaim_expired` every `period` for the life of the process.
fn spawn_sweeper(service: InterviewService, period: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = service.reclaim_expired().await {
                tracing::warn!(error = %e, "checkpoint sweep failed");
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    load_dotenv();

    if std::env::var("LOG_FILE").is_err() {
        eprintln!("interview-graph-server: LOG_FILE not set, logs only to stdout. Set LOG_FILE=./interview-graph-server.log in .env or env to also write to a file.");
    }

    init_tracing()?;

    let config = ServiceConfig::from_env()?;
    let llm = build_llm()?;
    let saver: Arc<dyn Checkpointer<InterviewState>> = Arc::new(SqliteSaver::<InterviewState>::new(
        &config.db_path,
        Arc::new(JsonSerializer),
    )?);
    info!(
        db_path = %config.db_path,
        pass_score = config.pass_score,
        max_iterations = config.max_iterations,
        "runtime config loaded"
    );

    let hub = ProgressHub::new(config.progress_capacity, config.progress_linger);
    let service = InterviewService::new(llm, saver, hub, config)?;

    let sweep_secs = match std::env::var("CHECKPOINT_SWEEP_SECS") {
        Ok(v) => v
            .trim()
            .parse::<u64>()
            .map_err(|_| format!("invalid value for CHECKPOINT_SWEEP_SECS: {}", v))?,
        Err(_) => DEFAULT_SWEEP_SECS,
    };
    spawn_sweeper(service.clone(), Duration::from_secs(sweep_secs.max(1)));

    let app = interview_graph_server::app(service);
    let listen = std::env::var("LISTEN").unwrap_or_else(|_| "0.0.0.0:8123".to_string());
    info!("listening on http://{}", listen);
    let listener = tokio::net::TcpListener::bind(&listen).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
