//! Laudo Server
//!
//! Builds "Laudo de Inspeção Predial" reports. The HTTP API keeps one
//! editable session per report in progress and exposes:
//!
//! - The options catalog
//! - Record, event and checklist edits
//! - Narrative text, optionally written by a chat-completion service
//! - PDF generation, drafts and a JSON memory store
//!
//! The `render` subcommand turns a saved snapshot into a PDF offline.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    routing::{get, patch, post, put},
    Router,
};
use chrono::Utc;
use clap::{Parser, Subcommand};
use laudo_narrative::{
    ChatCompletionsClient, ChatCompletionsConfig, CompletionClient, NarrativeGenerator,
};
use laudo_session::{MemoryStore, Session, DEFAULT_MEMORY_PATH};
use laudo_types::SavedReport;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;
mod state;

use api::*;
use state::AppState;

const MEMORY_PATH_VAR: &str = "LAUDO_MEMORY_PATH";

/// Command-line arguments for the laudo server
#[derive(Parser, Debug)]
#[command(name = "laudo-server")]
#[command(about = "Building inspection report generator")]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve(ServeArgs),
    /// Render a saved snapshot (JSON) to a PDF
    Render {
        /// Snapshot file with `dados` and `eventos`
        #[arg(long)]
        input: PathBuf,

        /// Directory that receives the PDF
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct ServeArgs {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Render timeout in milliseconds
    #[arg(long, default_value = "30000")]
    timeout_ms: u64,

    /// Rate limit: requests per second per IP
    #[arg(long, default_value = "10")]
    rate_limit: u32,

    /// JSON memory store (defaults to $LAUDO_MEMORY_PATH or laudos_memoria.json)
    #[arg(long)]
    memory_path: Option<PathBuf>,

    /// Directory for memory backups
    #[arg(long, default_value = "backups")]
    backup_dir: PathBuf,
}

/// Server settings resolved from arguments and environment
#[derive(Debug)]
struct ServerConfig {
    addr: SocketAddr,
    timeout_ms: u64,
    rate_limit: u32,
    memory_path: PathBuf,
    backup_dir: PathBuf,
    completions: Option<ChatCompletionsConfig>,
}

impl ServerConfig {
    fn resolve(args: ServeArgs) -> anyhow::Result<Self> {
        let addr: SocketAddr = format!("{}:{}", args.host, args.port)
            .parse()
            .context("invalid host/port")?;
        let memory_path = args
            .memory_path
            .or_else(|| std::env::var_os(MEMORY_PATH_VAR).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEMORY_PATH));

        Ok(Self {
            addr,
            timeout_ms: args.timeout_ms,
            rate_limit: args.rate_limit.max(1),
            memory_path,
            backup_dir: args.backup_dir,
            completions: ChatCompletionsConfig::from_env(),
        })
    }
}

fn narrative_generator(config: Option<ChatCompletionsConfig>) -> anyhow::Result<NarrativeGenerator> {
    let Some(config) = config else {
        warn!("GROQ_API_KEY not set, narrative uses the standard text only");
        return Ok(NarrativeGenerator::offline());
    };
    info!(model = %config.model, endpoint = %config.endpoint, "Chat completions enabled");
    let client: Arc<dyn CompletionClient> = Arc::new(ChatCompletionsClient::new(config)?);
    Ok(NarrativeGenerator::new(Some(client)))
}

/// All API routes over `state`, without network-level middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handle_health))
        .route("/api/catalog", get(handle_catalog))
        // Sessions
        .route("/api/sessions", post(handle_create_session))
        .route(
            "/api/sessions/:id",
            get(handle_get_session).delete(handle_delete_session),
        )
        .route("/api/sessions/:id/record", patch(handle_edit_record))
        // Events
        .route(
            "/api/sessions/:id/events",
            post(handle_add_event).delete(handle_clear_events),
        )
        .route(
            "/api/sessions/:id/events/:index",
            patch(handle_edit_event).delete(handle_remove_event),
        )
        .route(
            "/api/sessions/:id/events/:index/images",
            put(handle_attach_images),
        )
        .route("/api/sessions/:id/documents", put(handle_documents))
        // Narrative
        .route("/api/sessions/:id/narrative", post(handle_narrative))
        .route("/api/sessions/:id/narrative/rewrite", post(handle_rewrite))
        .route("/api/sessions/:id/brief-account", post(handle_brief_account))
        // Generation and snapshots
        .route("/api/sessions/:id/generate", post(handle_generate))
        .route("/api/sessions/:id/saved", get(handle_list_saved))
        .route("/api/sessions/:id/saved/:name/load", post(handle_load_saved))
        .route("/api/sessions/:id/drafts", post(handle_save_draft))
        .route("/api/sessions/:id/persist", post(handle_persist))
        .route("/api/memory/backup", post(handle_backup))
        .with_state(state)
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = ServerConfig::resolve(args)?;
    info!("Starting laudo server on {}", config.addr);

    let memory = MemoryStore::open(&config.memory_path)
        .with_context(|| format!("opening memory store {}", config.memory_path.display()))?;
    let narrative = narrative_generator(config.completions.clone())?;
    let state = AppState::new(narrative, memory, config.backup_dir.clone(), config.timeout_ms);

    // Create rate limiter configuration
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(config.rate_limit.into())
            .burst_size(config.rate_limit * 2)
            .finish()
            .context("invalid rate limiter config")?,
    );

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .layer(GovernorLayer {
                config: governor_conf,
            }),
    );

    let listener = tokio::net::TcpListener::bind(config.addr).await?;

    info!("Server listening on http://{}", config.addr);
    info!("Rate limit: {} requests/second per IP", config.rate_limit);
    info!("Render timeout: {}ms", config.timeout_ms);
    info!("Memory store: {}", config.memory_path.display());

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn render(input: PathBuf, out_dir: PathBuf) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&input)
        .with_context(|| format!("reading {}", input.display()))?;
    let snapshot: SavedReport =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", input.display()))?;

    let name = input.display().to_string();
    let mut session = Session::default();
    session.insert_saved(name.clone(), snapshot);
    session.load_saved(&name)?;
    let generated = session.generate(Utc::now())?;

    std::fs::create_dir_all(&out_dir)?;
    let out = out_dir.join(&generated.filename);
    std::fs::write(&out, &generated.report.bytes)?;
    info!(
        path = %out.display(),
        pages = generated.report.page_count,
        "Report written"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match args.command {
        Command::Serve(serve_args) => serve(serve_args).await,
        Command::Render { input, out_dir } => {
            tokio::task::spawn_blocking(move || render(input, out_dir)).await?
        }
    }
}
