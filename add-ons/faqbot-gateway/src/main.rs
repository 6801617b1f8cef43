//! Axum-based HTTP gateway for the FAQ assistant. Config-driven via CoreConfig.

mod handlers;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use faqbot_core::{CoreConfig, CsvRecordSource, KnowledgeIndex, ResponseRouter};
use faqbot_skills::build_capabilities;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::Instrument;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const CORRELATION_HEADER: &str = "x-correlation-id";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<CoreConfig>,
    pub(crate) router: Arc<ResponseRouter>,
    /// "off", "mock" or "live".
    pub(crate) llm_mode: &'static str,
}

fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/v1/status", get(status))
        .route("/v1/answer", post(handlers::answer::answer))
        .route("/v1/faqs", get(handlers::faqs::list_faqs))
        .route("/v1/categories", get(handlers::faqs::list_categories))
        .with_state(state)
        .layer(middleware::from_fn(correlation_span))
        .layer(cors)
}

/// Runs each request inside a span carrying a fresh correlation id, echoed as a header.
async fn correlation_span(req: Request, next: Next) -> Response {
    let correlation_id = uuid::Uuid::new_v4().to_string();
    let span = tracing::info_span!(
        "request",
        correlation_id = %correlation_id,
        method = %req.method(),
        path = %req.uri().path(),
    );
    let mut res = next.run(req).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        res.headers_mut().insert(CORRELATION_HEADER, value);
    }
    res
}

/// GET /v1/status: app identity, knowledge-base size and capability mode.
async fn status(State(state): State<AppState>) -> Json<serde_json::Value> {
    let index = state.router.index();
    Json(serde_json::json!({
        "app_name": state.config.app_name,
        "entries": index.len(),
        "categories": index.categories().len(),
        "fallback_mode": state.router.is_fallback_mode(),
        "llm_mode": state.llm_mode,
    }))
}

fn load_state(config: CoreConfig) -> Result<AppState, BoxError> {
    let index = KnowledgeIndex::from_source(&CsvRecordSource::new(&config.knowledge_path))?;
    let caps = build_capabilities(&config);
    let llm_mode = caps.mode_label();
    let router = caps.install(
        ResponseRouter::new(Arc::new(index)).with_threshold(config.search_threshold),
    );
    Ok(AppState {
        config: Arc::new(config),
        router: Arc::new(router),
        llm_mode,
    })
}

/// Pre-flight check: config loads, knowledge base loads and the port is free.
fn run_verify() -> Result<(), String> {
    let config = CoreConfig::load().map_err(|e| format!("Config load failed: {}", e))?;
    let port = config.port;

    print!("Checking knowledge base {}... ", config.knowledge_path);
    let state = load_state(config).map_err(|e| format!("Knowledge base unavailable: {}", e))?;
    println!("OK ({} entries)", state.router.index().len());
    println!("Capability mode: {}", state.llm_mode);

    print!("Checking port {}... ", port);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    match std::net::TcpListener::bind(addr) {
        Ok(listener) => {
            drop(listener);
            println!("OK (available)");
        }
        Err(e) => return Err(format!("Port {} BLOCKED: {}", port, e)),
    }

    println!("\n✅ SUCCESS: All systems GO. Ready to start gateway.");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[faqbot-gateway] .env not loaded: {} (using system environment)", e);
    }

    if std::env::args().any(|a| a == "--verify") {
        match run_verify() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("❌ PRE-FLIGHT FAILED: {}", e);
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CoreConfig::load()?;
    let port = config.port;
    let state = load_state(config)?;
    let app_name = state.config.app_name.clone();
    tracing::info!(
        target: "faqbot::gateway",
        entries = state.router.index().len(),
        llm_mode = state.llm_mode,
        "Knowledge base ready"
    );

    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("{} listening on {}", app_name, addr);
    axum::serve(listener, build_app(state)).await?;
    Ok(())
}
