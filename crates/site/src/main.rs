//! TechFix-IT site - Marketing pages, admin area and content API.
//!
//! This binary serves the public site on port 3000.
//!
//! # Architecture
//!
//! - Axum web framework with Askama templates for server-side rendering
//! - `PostgreSQL` for site content, admin accounts and sessions
//! - Local directory or hosted bucket for admin image uploads
//! - SMTP relay for the contact form
//!
//! Migrations are NOT run on startup. Run them explicitly via:
//! `cargo run -p techfix-cli -- migrate`

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use techfix_site::config::SiteConfig;
use techfix_site::db::{self, PgDatabase};
use techfix_site::middleware;
use techfix_site::services::{
    HttpObjectStore, LocalObjectStore, MailRelay, ObjectStore, SmtpMailRelay,
};
use techfix_site::state::AppState;

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &SiteConfig) -> Option<sentry::ClientInitGuard> {
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
            before_send: Some(Arc::new(drop_client_errors)),
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Drop events for 4xx responses; only server faults are reported.
fn drop_client_errors(event: sentry::protocol::Event<'static>) -> Option<sentry::protocol::Event<'static>> {
    let status = event
        .contexts
        .get("response")
        .and_then(|context| match context {
            sentry::protocol::Context::Other(map) => map.get("status_code"),
            _ => None,
        })
        .and_then(serde_json::Value::as_u64);

    match status {
        Some(code) if (400..500).contains(&code) => None,
        _ => Some(event),
    }
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Install the tracing subscriber. JSON output on Fly.io, human-readable otherwise.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "techfix_site=info,tower_http=debug".into());
    if std::env::var_os("FLY_APP_NAME").is_some() {
        let sentry_layer = sentry_tracing::layer().event_filter(sentry_event_filter);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .with(sentry_layer)
            .init();
    } else {
        let sentry_layer = sentry_tracing::layer().event_filter(sentry_event_filter);
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .with(sentry_layer)
            .init();
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = SiteConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created");

    let uploads: Arc<dyn ObjectStore> = match &config.storage {
        Some(storage) => {
            tracing::info!(bucket = %storage.bucket, "Uploads go to hosted storage");
            Arc::new(HttpObjectStore::new(storage.clone()).expect("Failed to build storage client"))
        }
        None => {
            tracing::info!(dir = %config.upload_dir.display(), "Uploads go to local directory");
            Arc::new(LocalObjectStore::new(config.upload_dir.clone()))
        }
    };

    let mailer: Option<Arc<dyn MailRelay>> = match &config.email {
        Some(email) => Some(Arc::new(
            SmtpMailRelay::new(email, &config.contact_recipient)
                .expect("Failed to configure mail relay"),
        )),
        None => {
            tracing::warn!("SMTP is not configured; contact submissions will fail");
            None
        }
    };

    let session_layer = middleware::create_session_layer(&pool, &config);
    let addr = config.socket_addr();
    let state = AppState::new(config, Arc::new(PgDatabase::new(pool)), uploads, mailer);
    let app = techfix_site::build_router(state, session_layer);

    tracing::info!("techfix-site listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
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
