//! REST API and SSE routes

use crate::state::{AppState, PipelineStats};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use fmtel_core::export::to_json_filtered;
use fmtel_core::{CarReference, DynoStats, FieldMask, ForzaPacket, PacketSummary, Snapshot};
use futures::stream::{Stream, StreamExt};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::IntervalStream;
use tower_http::cors::CorsLayer;

/// How often SSE clients are offered the latest packet
pub const SSE_PUSH_INTERVAL: Duration = Duration::from_millis(200);

/// Which endpoint groups to mount
#[derive(Debug, Clone, Copy, Default)]
pub struct Endpoints {
    /// `/forza`, `/forza/summary`, `/forza/car`, `/forza/stats`, `/forza/dyno`
    pub json: bool,
    /// `/forza/sse`
    pub sse: bool,
}

impl Endpoints {
    pub fn all() -> Self {
        Self {
            json: true,
            sse: true,
        }
    }
}

/// Create the main application router
pub fn create_router(state: AppState, endpoints: Endpoints) -> Router {
    let mut router = Router::new();

    if endpoints.json {
        router = router
            .route("/forza", get(latest_packet))
            .route("/forza/summary", get(latest_summary))
            .route("/forza/car", get(current_car))
            .route("/forza/stats", get(pipeline_stats))
            .route("/forza/dyno", get(dyno_peaks))
            .route("/forza/dyno/reset", post(reset_dyno));
    }
    if endpoints.sse {
        router = router.route("/forza/sse", get(telemetry_stream));
    }

    router.layer(CorsLayer::permissive()).with_state(state)
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("no telemetry received yet")]
    NoTelemetry,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::NoTelemetry => StatusCode::NOT_FOUND,
        };
        (status, self.to_string()).into_response()
    }
}

fn require_snapshot(state: &AppState) -> Result<Arc<Snapshot>, ApiError> {
    state.latest().ok_or(ApiError::NoTelemetry)
}

// === JSON Endpoints ===

async fn latest_packet(State(state): State<AppState>) -> Result<Json<ForzaPacket>, ApiError> {
    let snapshot = require_snapshot(&state)?;
    Ok(Json(snapshot.packet))
}

async fn latest_summary(State(state): State<AppState>) -> Result<Json<PacketSummary>, ApiError> {
    let snapshot = require_snapshot(&state)?;
    Ok(Json(PacketSummary::new(&snapshot.packet, &snapshot.car)))
}

async fn current_car(State(state): State<AppState>) -> Result<Json<CarReference>, ApiError> {
    let snapshot = require_snapshot(&state)?;
    Ok(Json(CarReference::clone(&snapshot.car)))
}

async fn pipeline_stats(State(state): State<AppState>) -> Json<PipelineStats> {
    Json(state.stats())
}

async fn dyno_peaks(State(state): State<AppState>) -> Json<DynoStats> {
    Json(state.dyno())
}

/// The pipeline applies the reset between datagrams, so this only queues it
async fn reset_dyno(State(state): State<AppState>) -> StatusCode {
    state.request_dyno_reset();
    StatusCode::ACCEPTED
}

// === Telemetry Stream Endpoint ===

#[derive(Deserialize)]
struct StreamQuery {
    fields: Option<String>,
}

async fn telemetry_stream(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let field_mask = query.fields.map(|f| FieldMask::parse(&f));
    let rx = state.subscribe();
    let mut last_sequence = 0u64;

    let ticks = IntervalStream::new(tokio::time::interval(SSE_PUSH_INTERVAL));
    let stream = ticks.filter_map(move |_| {
        let latest = rx.borrow().clone();
        let event = match latest {
            Some(snapshot) if snapshot.sequence != last_sequence => {
                last_sequence = snapshot.sequence;
                match to_json_filtered(&snapshot.packet, field_mask.as_ref()) {
                    Ok(json) => Some(Ok(Event::default().data(json))),
                    Err(e) => {
                        tracing::error!("Failed to serialize packet: {}", e);
                        None
                    }
                }
            }
            _ => None,
        };
        futures::future::ready(event)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
