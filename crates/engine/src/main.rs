//! tablehost engine - Main entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tablehost_engine::api;
use tablehost_engine::infrastructure::{
    clock::SystemClock,
    config::AppConfig,
    http_table_adapter::HttpTableAdapter,
    payment::HostPaymentResolver,
    ports::{ClockPort, PaymentResolver, ProfileRepo, SessionRepo, TableAdapter},
    sqlite::{self, SqliteProfileRepo, SqliteSessionRepo},
    timed_table_adapter::TimedTableAdapter,
};
use tablehost_engine::App;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the engine may be run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tablehost_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting tablehost engine");

    let config = AppConfig::from_env()?;
    if config.operator_ids.is_empty() {
        tracing::warn!("OPERATOR_IDS is empty; nobody can start polls or end sessions");
    }
    if config.host_handles.is_empty() {
        tracing::warn!("No HOST_VENMO/HOST_CASHAPP/HOST_ZELLE set; join requests will be refused");
    }

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());

    // Connect to SQLite
    tracing::info!("Opening database at {}", config.database_path);
    let pool = sqlite::connect(&config.database_path).await?;
    let sessions: Arc<dyn SessionRepo> = Arc::new(SqliteSessionRepo::new(pool.clone()));
    let profiles: Arc<dyn ProfileRepo> = Arc::new(SqliteProfileRepo::new(pool, clock.clone()));

    // Table automation sidecar, bounded per step
    let timeouts = config.adapter_timeouts;
    tracing::info!(
        url = %config.table_adapter_url,
        create_secs = timeouts.create.as_secs(),
        admit_secs = timeouts.admit.as_secs(),
        remove_secs = timeouts.remove.as_secs(),
        "Table adapter configured"
    );
    let adapter: Arc<dyn TableAdapter> = Arc::new(TimedTableAdapter::new(
        Arc::new(HttpTableAdapter::new(&config.table_adapter_url)),
        timeouts,
    ));

    let payments: Arc<dyn PaymentResolver> = Arc::new(HostPaymentResolver::new(
        config.host_handles.clone(),
        profiles.clone(),
    ));

    // Create application
    let app = Arc::new(App::new(
        &config, sessions, profiles, adapter, payments, clock,
    ));

    let mut router = api::http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = build_cors_layer_from_env() {
        router = router.layer(cors);
    }

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

fn build_cors_layer_from_env() -> Option<CorsLayer> {
    let allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())?;

    let mut cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    if allowed_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        if origins.is_empty() {
            return None;
        }

        cors = cors.allow_origin(origins);
    }

    Some(cors)
}
