use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ssg_demo_api::config::{Config, SessionSeed};
use ssg_demo_api::routes::build_router;
use ssg_demo_api::state::AppState;
use ssg_demo_api::{ClientCredentials, Session};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SSG demo API v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "SSG endpoint: {:?} ({}), timeout {:?}",
        config.endpoint, config.base_url, config.request_timeout
    );

    let session = match &config.preload {
        Some(seed) => Some(preload_session(seed)?),
        None => {
            info!("No session preloaded; waiting for upload on /api/v1/session");
            None
        }
    };

    let state = AppState::new(config.clone(), session);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Loads the session named by the `SSG_*` environment variables. Startup fails if
/// the credentials do not verify.
fn preload_session(seed: &SessionSeed) -> Result<Session> {
    let credentials = ClientCredentials::from_paths(&seed.cert_path, &seed.key_path);
    Session::load(&seed.uen, &seed.encryption_key, credentials)
        .context("Preloaded session credentials were rejected")
}
