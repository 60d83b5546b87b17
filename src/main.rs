//! Translation Agent - Main Entry Point
//!
//! Serves the translate → reflect → improve pipeline over HTTP.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use translation_agent::api::handlers::{self, AppState};
use translation_agent::completion::build_agents;
use translation_agent::pipeline::Translator;
use translation_agent::types::ServiceConfig;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "translation_agent=info,tower_http=debug".into()),
    );
    let json = std::env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // Load configuration
    let config_path = std::env::var("TRANSLATOR_CONFIG").ok().map(PathBuf::from);
    let config = ServiceConfig::load(config_path.as_deref())?;

    info!("Starting Translation Agent v{}", env!("CARGO_PKG_VERSION"));
    info!(
        max_tokens_per_chunk = config.max_tokens_per_chunk,
        encoding = %config.encoding,
        requests_per_minute = config.requests_per_minute,
        concurrency = config.concurrency,
        "Loaded configuration"
    );

    // Initialize components
    let agents = build_agents(&config).context("failed to configure completion endpoints")?;
    let translator = Translator::new(agents, &config.pipeline_config())
        .context("failed to initialize translator")?;
    let port = config.port;
    let state = Arc::new(AppState::new(Arc::new(translator), config));

    // Drop finished jobs periodically
    let job_store = state.job_store.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(600));
        loop {
            interval.tick().await;
            job_store.write().await.cleanup_old_jobs();
        }
    });

    // Build HTTP routes
    let app = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/translate", post(handlers::translate))
        .route("/translate/jobs", post(handlers::start_translation_job))
        .route(
            "/translate/jobs/:job_id",
            get(handlers::get_job_status).delete(handlers::cancel_job),
        )
        .with_state(state)
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            ),
        );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
