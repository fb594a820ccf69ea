//! fmtel
//!
//! Receives Forza "Data Out" telemetry, renders a live terminal dashboard and
//! optionally serves the latest packet over HTTP as JSON and SSE.

use anyhow::{Context, Result};
use clap::Parser;
use fmtel_adapters::{DemoSource, UdpSource};
use fmtel_core::SessionTracker;
use fmtel_server::api::{self, Endpoints};
use fmtel_server::config::{self, Settings};
use fmtel_server::{dashboard, pipeline, state};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::parse();

    // Initialize tracing; stdout belongs to the dashboard
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting fmtel {}", env!("CARGO_PKG_VERSION"));

    let cars = config::load_cars(&settings.cars_path());
    let tracker = SessionTracker::new(cars);
    let state = state::AppState::new();
    let cancel = CancellationToken::new();

    let (dashboard_tx, dashboard_task) = if settings.headless {
        (None, None)
    } else {
        let (tx, rx) = mpsc::channel(1);
        let task = tokio::spawn(dashboard::run(
            rx,
            settings.temp,
            settings.refresh_interval(),
            cancel.clone(),
        ));
        (Some(tx), Some(task))
    };

    let pipeline_task = if settings.demo {
        info!("Demo mode, generating synthetic packets");
        tokio::spawn(pipeline::run(
            DemoSource::new().with_game(settings.game),
            settings.game,
            tracker,
            state.clone(),
            dashboard_tx,
            cancel.clone(),
        ))
    } else {
        let source = UdpSource::bind(&settings.udp_addr)
            .await
            .context("Failed to start UDP listener")?;
        tokio::spawn(pipeline::run(
            source,
            settings.game,
            tracker,
            state.clone(),
            dashboard_tx,
            cancel.clone(),
        ))
    };

    if settings.http_enabled() {
        let endpoints = Endpoints {
            json: settings.json,
            sse: settings.sse,
        };
        let app = api::create_router(state.clone(), endpoints);

        let listener = tokio::net::TcpListener::bind(settings.http_addr)
            .await
            .with_context(|| format!("Failed to bind HTTP server on {}", settings.http_addr))?;
        info!("Server listening on http://{}", settings.http_addr);

        let shutdown = cancel.clone();
        tokio::spawn(async move {
            let serve = axum::serve(listener, app)
                .with_graceful_shutdown(async move { shutdown.cancelled().await });
            if let Err(e) = serve.await {
                error!("HTTP server error: {}", e);
            }
        });
    }

    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received ctrl-c, shutting down");
                ctrl_c_cancel.cancel();
            }
            Err(e) => error!("Failed to listen for ctrl-c: {}", e),
        }
    });

    let stats = pipeline_task.await.context("Receive pipeline task failed")?;
    cancel.cancel();

    if let Some(task) = dashboard_task {
        task.await.context("Dashboard task failed")??;
    }

    info!(
        accepted = stats.session.accepted,
        duplicates = stats.session.duplicates,
        not_running = stats.session.not_running,
        malformed = stats.malformed,
        "fmtel stopped"
    );
    Ok(())
}
