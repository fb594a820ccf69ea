//! Application state management

use fmtel_core::{DynoStats, SessionStats, Snapshot};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{watch, Notify};

/// Counters kept by the receive pipeline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    #[serde(flatten)]
    pub session: SessionStats,
    /// Datagrams rejected by the decoder
    pub malformed: u64,
    /// Transient receive failures
    pub receive_errors: u64,
}

/// Shared application state
///
/// The receive pipeline is the only writer; HTTP handlers only read. The one
/// thing handlers can do is ask the pipeline to clear the dyno peaks.
#[derive(Clone)]
pub struct AppState {
    /// Latest accepted snapshot, `None` until the first packet
    pub latest_tx: Arc<watch::Sender<Option<Arc<Snapshot>>>>,

    pub stats_tx: Arc<watch::Sender<PipelineStats>>,

    /// Dyno peaks, republished on every accept and after a reset
    pub dyno_tx: Arc<watch::Sender<DynoStats>>,

    /// Pending dyno reset request for the pipeline
    pub dyno_reset: Arc<Notify>,
}

impl AppState {
    pub fn new() -> Self {
        let (latest_tx, _) = watch::channel(None);
        let (stats_tx, _) = watch::channel(PipelineStats::default());
        let (dyno_tx, _) = watch::channel(DynoStats::default());

        Self {
            latest_tx: Arc::new(latest_tx),
            stats_tx: Arc::new(stats_tx),
            dyno_tx: Arc::new(dyno_tx),
            dyno_reset: Arc::new(Notify::new()),
        }
    }

    /// Current snapshot, if any packet has been accepted
    pub fn latest(&self) -> Option<Arc<Snapshot>> {
        self.latest_tx.borrow().clone()
    }

    pub fn publish(&self, snapshot: Arc<Snapshot>) {
        self.latest_tx.send_replace(Some(snapshot));
    }

    /// Subscribe to snapshot changes
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Snapshot>>> {
        self.latest_tx.subscribe()
    }

    pub fn stats(&self) -> PipelineStats {
        *self.stats_tx.borrow()
    }

    pub fn set_stats(&self, stats: PipelineStats) {
        self.stats_tx.send_replace(stats);
    }

    pub fn dyno(&self) -> DynoStats {
        *self.dyno_tx.borrow()
    }

    pub fn set_dyno(&self, dyno: DynoStats) {
        self.dyno_tx.send_replace(dyno);
    }

    pub fn subscribe_dyno(&self) -> watch::Receiver<DynoStats> {
        self.dyno_tx.subscribe()
    }

    /// Ask the pipeline to clear the dyno peaks. Requests made while one is
    /// already pending collapse into a single reset.
    pub fn request_dyno_reset(&self) {
        self.dyno_reset.notify_one();
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
