//! Receive pipeline
//!
//! This module handles:
//! - Reading datagrams from the active packet source
//! - Decoding and filtering them through the session tracker
//! - Publishing accepted snapshots to the HTTP state and the dashboard
//! - Applying dyno reset requests between datagrams

use crate::state::{AppState, PipelineStats};
use fmtel_core::{decode_for, Acceptance, CarLookup, Game, PacketSource, SessionTracker, Snapshot};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Main pipeline loop
///
/// Runs until the source closes or `cancel` fires. Datagrams are decoded in
/// the layout of `game` and processed strictly in arrival order. The
/// dashboard channel applies back-pressure: the next datagram is not read
/// until the previous snapshot was taken. Dyno reset requests are applied
/// between datagrams.
pub async fn run<S, L>(
    mut source: S,
    game: Game,
    mut tracker: SessionTracker<L>,
    state: AppState,
    mut dashboard: Option<mpsc::Sender<Arc<Snapshot>>>,
    cancel: CancellationToken,
) -> PipelineStats
where
    S: PacketSource,
    L: CarLookup,
{
    info!(
        "Receive pipeline started on {} ({} layout, {} bytes)",
        source.name(),
        game.label(),
        game.packet_size()
    );
    let mut stats = PipelineStats::default();

    loop {
        let received = tokio::select! {
            _ = cancel.cancelled() => break,
            _ = state.dyno_reset.notified() => {
                tracker.reset_dyno();
                state.set_dyno(tracker.dyno());
                continue;
            }
            received = source.recv() => received,
        };

        let datagram = match received {
            Ok(datagram) => datagram,
            Err(e) if e.is_terminal() => {
                info!("Packet source {} ended: {}", source.name(), e);
                break;
            }
            Err(e) => {
                warn!("Error receiving datagram: {}", e);
                stats.receive_errors += 1;
                state.set_stats(stats);
                continue;
            }
        };

        let packet = match decode_for(game, datagram) {
            Ok(packet) => packet,
            Err(e) => {
                warn!("Dropping datagram: {}", e);
                stats.malformed += 1;
                state.set_stats(stats);
                continue;
            }
        };

        let acceptance = tracker.accept(packet);
        stats.session = tracker.stats();
        state.set_stats(stats);
        if acceptance.is_accepted() {
            state.set_dyno(tracker.dyno());
        }

        let Acceptance::Accepted {
            snapshot,
            car_changed,
        } = acceptance
        else {
            continue;
        };

        if car_changed {
            info!(
                ordinal = snapshot.packet.car_ordinal,
                "Now driving {} {} ({})",
                snapshot.car.maker,
                snapshot.car.model,
                snapshot.car.year
            );
        }

        state.publish(Arc::clone(&snapshot));

        let delivered = match &dashboard {
            Some(tx) => tokio::select! {
                _ = cancel.cancelled() => break,
                sent = tx.send(snapshot) => sent.is_ok(),
            },
            None => true,
        };
        if !delivered {
            debug!("Dashboard receiver dropped");
            dashboard = None;
        }
    }

    info!(
        accepted = stats.session.accepted,
        malformed = stats.malformed,
        "Receive pipeline stopped"
    );
    stats
}
