//! Constructivo site server.
//!
//! Serves the public marketing API, the session-gated admin API, the
//! WebSocket invalidation channel, and the built SPA bundle from a single
//! listener.
//!
//! # Architecture
//!
//! - Axum web framework, JSON API under `/api`, WebSocket upgrade at `/ws`
//! - `PostgreSQL` via sqlx for content, users, notifications and sessions
//! - Google OAuth for sign-in; the first user becomes admin
//! - Admin dashboards hold a WebSocket subscription and refetch on
//!   invalidation events pushed after each relevant write

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use sentry::integrations::tracing as sentry_tracing;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use constructivo_server::config::ServerConfig;
use constructivo_server::realtime::CacheRegistry;
use constructivo_server::services::EmailService;
use constructivo_server::state::AppState;
use constructivo_server::{db, middleware, realtime, routes};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ServerConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Initialize the tracing subscriber.
///
/// JSON output on the deploy platform (detected via `FLY_APP_NAME`), plain
/// text locally.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "constructivo_server=info,tower_http=debug".into());

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter));

    if std::env::var("FLY_APP_NAME").is_ok() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created");

    // NOTE: Content migrations are NOT run automatically on startup.
    // Run them explicitly via: cargo run -p constructivo-cli -- migrate

    let email = config
        .email()
        .map(|smtp| {
            EmailService::new(smtp, &config.base_url).expect("Failed to create SMTP transport")
        });
    if email.is_none() {
        tracing::warn!("SMTP not configured; outbound email disabled");
    }

    let registry = std::sync::Arc::new(CacheRegistry::new());
    let state = AppState::new(config.clone(), pool, registry, email);

    // Session layer; its store manages the sessions table itself
    let (session_store, session_layer) = middleware::create_session_layer(state.pool(), state.config());
    session_store
        .migrate()
        .await
        .expect("Failed to migrate session store");

    // SPA bundle with client-side routing: unknown paths fall back to the shell
    let static_service = ServeDir::new(&config.static_dir).not_found_service(ServeFile::new(
        format!("{}/index.html", config.static_dir.trim_end_matches('/')),
    ));

    let app = Router::new()
        .route("/health", get(routes::health))
        .route("/health/ready", get(readiness))
        .nest("/api", routes::api_routes())
        .nest("/auth", routes::auth_routes())
        .layer(session_layer)
        .with_state(state.clone())
        .merge(realtime::router(state.registry_handle()))
        .fallback_service(static_service)
        .layer(TraceLayer::new_for_http())
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    tracing::info!("constructivo-server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
