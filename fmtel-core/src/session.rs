//! Session state tracking
//!
//! The tracker owns the "current" packet and car. Each decoded packet passes
//! an accept filter:
//! 1. packets from a paused or stopped simulation are dropped
//! 2. packets repeating the last accepted timestamp are dropped
//! 3. accepted packets update the timestamp; a changed car ordinal triggers a
//!    car lookup, falling back to the unknown-car sentinel
//!
//! Every accept also folds the packet into the session's [`DynoStats`]
//! peaks. Every accept produces a new immutable [`Snapshot`]; nothing already
//! handed out is mutated afterwards.

use crate::cars::{CarLookup, CarReference};
use crate::dyno::DynoStats;
use crate::model::ForzaPacket;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Immutable view of the session after one accepted packet
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// 1 for the first accepted packet, incremented per accept
    pub sequence: u64,
    pub received_at: DateTime<Utc>,
    pub packet: ForzaPacket,
    pub car: Arc<CarReference>,
    /// Peaks including this packet
    pub dyno: DynoStats,
}

/// Outcome of offering a packet to the tracker
#[derive(Debug, Clone, PartialEq)]
pub enum Acceptance {
    Accepted {
        snapshot: Arc<Snapshot>,
        car_changed: bool,
    },
    /// The simulation is not running; the packet was ignored
    NotRunning,
    /// Same timestamp as the last accepted packet
    Duplicate,
}

impl Acceptance {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Acceptance::Accepted { .. })
    }
}

/// Packet counters since the tracker was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub accepted: u64,
    pub not_running: u64,
    pub duplicates: u64,
    pub car_changes: u64,
}

pub struct SessionTracker<L> {
    cars: L,
    last_timestamp: Option<u32>,
    last_car_ordinal: Option<i32>,
    current_car: Arc<CarReference>,
    current: Option<Arc<Snapshot>>,
    dyno: DynoStats,
    stats: SessionStats,
}

impl<L: CarLookup> SessionTracker<L> {
    pub fn new(cars: L) -> Self {
        Self {
            cars,
            last_timestamp: None,
            last_car_ordinal: None,
            current_car: Arc::new(CarReference::unknown()),
            current: None,
            dyno: DynoStats::new(),
            stats: SessionStats::default(),
        }
    }

    /// Offer a freshly decoded packet, stamped with the current time
    pub fn accept(&mut self, packet: ForzaPacket) -> Acceptance {
        self.accept_at(packet, Utc::now())
    }

    pub fn accept_at(&mut self, packet: ForzaPacket, received_at: DateTime<Utc>) -> Acceptance {
        if !packet.is_running() {
            self.stats.not_running += 1;
            return Acceptance::NotRunning;
        }

        if self.last_timestamp == Some(packet.timestamp_ms) {
            self.stats.duplicates += 1;
            return Acceptance::Duplicate;
        }
        self.last_timestamp = Some(packet.timestamp_ms);

        let car_changed = self.last_car_ordinal != Some(packet.car_ordinal);
        if car_changed {
            self.current_car = Arc::new(self.cars.lookup_or_unknown(packet.car_ordinal));
            self.last_car_ordinal = Some(packet.car_ordinal);
            self.stats.car_changes += 1;
        }

        self.dyno.update(&packet);
        self.stats.accepted += 1;
        let snapshot = Arc::new(Snapshot {
            sequence: self.stats.accepted,
            received_at,
            packet,
            car: Arc::clone(&self.current_car),
            dyno: self.dyno,
        });
        self.current = Some(Arc::clone(&snapshot));

        Acceptance::Accepted {
            snapshot,
            car_changed,
        }
    }

    /// Latest accepted snapshot, if any
    pub fn current(&self) -> Option<&Arc<Snapshot>> {
        self.current.as_ref()
    }

    pub fn current_car(&self) -> &CarReference {
        &self.current_car
    }

    pub fn last_timestamp(&self) -> Option<u32> {
        self.last_timestamp
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Peaks since the tracker was created or last reset
    pub fn dyno(&self) -> DynoStats {
        self.dyno
    }

    /// Clear the peaks. Already published snapshots keep their values.
    pub fn reset_dyno(&mut self) {
        self.dyno.reset();
        debug!(accepted = self.stats.accepted, "Dyno peaks cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cars::CarList;

    fn cars() -> CarList {
        CarList::new([CarReference {
            car_ordinal: 5,
            group: "Retro Hot Hatch".to_string(),
            maker: "Volkswagen".to_string(),
            model: "Golf GTI".to_string(),
            year: 1983,
            weight: 1808,
        }])
    }

    fn packet(timestamp_ms: u32, car_ordinal: i32, running: bool) -> ForzaPacket {
        ForzaPacket {
            is_race_on: i32::from(running),
            timestamp_ms,
            car_ordinal,
            ..Default::default()
        }
    }

    #[test]
    fn test_not_running_is_ignored() {
        let mut tracker = SessionTracker::new(cars());
        assert_eq!(tracker.accept(packet(1000, 5, false)), Acceptance::NotRunning);
        assert!(tracker.current().is_none());
        assert_eq!(tracker.last_timestamp(), None);
        assert!(tracker.current_car().is_unknown());
        assert_eq!(tracker.stats().not_running, 1);
    }

    #[test]
    fn test_first_running_packet_is_accepted_and_looks_up_car() {
        let mut tracker = SessionTracker::new(cars());
        let outcome = tracker.accept(packet(0, 5, true));

        match outcome {
            Acceptance::Accepted {
                snapshot,
                car_changed,
            } => {
                assert!(car_changed);
                assert_eq!(snapshot.sequence, 1);
                assert_eq!(snapshot.car.maker, "Volkswagen");
            }
            other => panic!("expected accept, got {:?}", other),
        }
        assert_eq!(tracker.last_timestamp(), Some(0));
    }

    #[test]
    fn test_duplicate_timestamp_is_discarded() {
        let mut tracker = SessionTracker::new(cars());
        assert!(tracker.accept(packet(1000, 5, true)).is_accepted());

        let mut retransmit = packet(1000, 5, true);
        retransmit.speed = 99.0;
        assert_eq!(tracker.accept(retransmit), Acceptance::Duplicate);

        let current = tracker.current().unwrap();
        assert_eq!(current.packet.speed, 0.0);
        assert_eq!(current.sequence, 1);
        assert_eq!(tracker.stats().duplicates, 1);
    }

    #[test]
    fn test_same_car_keeps_reference() {
        let mut tracker = SessionTracker::new(cars());
        tracker.accept(packet(1000, 5, true));
        let first_car = Arc::clone(&tracker.current().unwrap().car);

        match tracker.accept(packet(1016, 5, true)) {
            Acceptance::Accepted {
                snapshot,
                car_changed,
            } => {
                assert!(!car_changed);
                assert!(Arc::ptr_eq(&snapshot.car, &first_car));
            }
            other => panic!("expected accept, got {:?}", other),
        }
        assert_eq!(tracker.stats().car_changes, 1);
    }

    #[test]
    fn test_unknown_ordinal_resolves_to_sentinel() {
        let mut tracker = SessionTracker::new(cars());
        tracker.accept(packet(1000, 5, true));
        tracker.accept(packet(1001, 404, true));

        let car = tracker.current_car();
        assert_eq!(car.maker, "Unknown");
        assert_eq!(car.year, 9999);
        assert_eq!(car.weight, 9999);
    }

    #[test]
    fn test_earlier_snapshots_are_not_mutated() {
        let mut tracker = SessionTracker::new(cars());
        tracker.accept(packet(1000, 5, true));
        let held = Arc::clone(tracker.current().unwrap());

        tracker.accept(packet(2000, 404, true));

        assert_eq!(held.packet.timestamp_ms, 1000);
        assert_eq!(held.car.maker, "Volkswagen");
        assert_eq!(tracker.current().unwrap().packet.timestamp_ms, 2000);
    }

    #[test]
    fn test_duplicate_check_ignores_paused_packets() {
        let mut tracker = SessionTracker::new(cars());
        tracker.accept(packet(1000, 5, true));
        // A paused packet does not consume the timestamp
        assert_eq!(tracker.accept(packet(1001, 5, false)), Acceptance::NotRunning);
        assert!(tracker.accept(packet(1001, 5, true)).is_accepted());
    }

    #[test]
    fn test_dyno_follows_accepted_packets_only() {
        let mut tracker = SessionTracker::new(cars());
        let mut fast = packet(1000, 5, true);
        fast.gear = 3;
        fast.speed = 40.0;
        tracker.accept(fast);

        // paused and duplicate packets never reach the peaks
        let mut paused = packet(1001, 5, false);
        paused.speed = 90.0;
        tracker.accept(paused);
        let mut retransmit = packet(1000, 5, true);
        retransmit.speed = 90.0;
        tracker.accept(retransmit);

        let dyno = tracker.dyno();
        assert_eq!(dyno.top_speed.km_per_hour, 144);
        assert_eq!(dyno.gear(3).unwrap().km_per_hour, 144);
        assert_eq!(tracker.current().unwrap().dyno, dyno);
    }

    #[test]
    fn test_reset_dyno_keeps_published_snapshot() {
        let mut tracker = SessionTracker::new(cars());
        let mut fast = packet(1000, 5, true);
        fast.speed = 40.0;
        tracker.accept(fast);
        let held = Arc::clone(tracker.current().unwrap());

        tracker.reset_dyno();
        assert_eq!(tracker.dyno(), DynoStats::default());
        assert_eq!(held.dyno.top_speed.km_per_hour, 144);

        let mut slow = packet(2000, 5, true);
        slow.speed = 10.0;
        tracker.accept(slow);
        assert_eq!(tracker.dyno().top_speed.km_per_hour, 36);
        assert_eq!(tracker.stats().accepted, 2);
    }

    #[test]
    fn test_duplicate_then_car_change_scenario() {
        let mut tracker = SessionTracker::new(cars());

        let outcomes = [
            tracker.accept(packet(1000, 5, true)),
            tracker.accept(packet(1000, 5, true)),
            tracker.accept(packet(1001, 7, true)),
        ];

        let accepted = outcomes.iter().filter(|o| o.is_accepted()).count();
        assert_eq!(accepted, 2);
        assert_eq!(outcomes[1], Acceptance::Duplicate);
        assert_eq!(tracker.last_timestamp(), Some(1001));
        assert_eq!(*tracker.current_car(), CarReference::unknown());
        assert_eq!(
            tracker.stats(),
            SessionStats {
                accepted: 2,
                not_running: 0,
                duplicates: 1,
                car_changes: 2,
            }
        );
    }
}
