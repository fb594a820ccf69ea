//! Demo source that generates synthetic telemetry for testing
//!
//! Simulates laps around a short circuit with straights, braking zones,
//! corners and acceleration phases, and encodes each tick as a real dash
//! packet in the selected game's layout so the whole decode path is exercised
//! without a running game.

use fmtel_core::model::{Corners, ForzaPacket, Vector3};
use fmtel_core::{encode_for, Game, PacketSource, SourceError};
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior};

/// Default packet spacing
pub const DEMO_TICK: Duration = Duration::from_millis(100);

/// Car ordinal reported by every demo packet
pub const DEMO_CAR_ORDINAL: i32 = 2352;

const DEMO_TRACK_ORDINAL: i32 = 110;
const MAX_RPM: f32 = 8000.0;
const IDLE_RPM: f32 = 900.0;

// =============================================================================
// Track definition
// =============================================================================

#[derive(Clone, Copy)]
enum SegmentKind {
    Straight,
    Braking,
    Corner,
    Accel,
}

#[derive(Clone, Copy)]
struct TrackSegment {
    kind: SegmentKind,
    /// seconds to traverse
    duration: f32,
    /// m/s at end of segment
    target_speed: f32,
    /// peak normalized steering, + = right
    steering: f32,
}

const fn segment(kind: SegmentKind, duration: f32, target_speed: f32, steering: f32) -> TrackSegment {
    TrackSegment {
        kind,
        duration,
        target_speed,
        steering,
    }
}

/// A ~45s lap
const DEMO_TRACK: [TrackSegment; 11] = [
    segment(SegmentKind::Straight, 7.0, 72.0, 0.0),
    segment(SegmentKind::Braking, 2.5, 30.0, 0.05),
    segment(SegmentKind::Corner, 3.5, 27.0, 0.7),
    segment(SegmentKind::Accel, 3.5, 52.0, 0.2),
    segment(SegmentKind::Straight, 5.0, 64.0, 0.0),
    segment(SegmentKind::Braking, 2.0, 42.0, -0.05),
    segment(SegmentKind::Corner, 4.0, 40.0, -0.5),
    segment(SegmentKind::Accel, 3.0, 58.0, -0.1),
    segment(SegmentKind::Braking, 3.0, 22.0, -0.05),
    segment(SegmentKind::Corner, 4.5, 20.0, -0.85),
    segment(SegmentKind::Accel, 7.0, 72.0, -0.15),
];

fn lap_duration() -> f32 {
    DEMO_TRACK.iter().map(|s| s.duration).sum()
}

// =============================================================================
// Lap state
// =============================================================================

struct LapState {
    speed: f32,
    throttle: f32,
    brake: f32,
    steering: f32,
    gear: u8,
    rpm: f32,
}

fn compute_lap_state(lap_time: f32) -> LapState {
    let mut elapsed = 0.0_f32;
    let mut seg_idx = DEMO_TRACK.len() - 1;
    for (i, seg) in DEMO_TRACK.iter().enumerate() {
        if elapsed + seg.duration > lap_time {
            seg_idx = i;
            break;
        }
        elapsed += seg.duration;
    }
    if seg_idx == DEMO_TRACK.len() - 1 {
        elapsed = lap_duration() - DEMO_TRACK[seg_idx].duration;
    }

    let seg = DEMO_TRACK[seg_idx];
    let seg_t = ((lap_time - elapsed) / seg.duration).clamp(0.0, 1.0);
    let prev_speed = DEMO_TRACK[(seg_idx + DEMO_TRACK.len() - 1) % DEMO_TRACK.len()].target_speed;

    let smooth_t = smoothstep(seg_t);
    let speed = lerp(prev_speed, seg.target_speed, smooth_t);

    let (throttle, brake) = match seg.kind {
        SegmentKind::Straight => (0.95 + 0.05 * (1.0 - seg_t), 0.0),
        SegmentKind::Braking => (0.0, (1.0 - smooth_t * 0.3).clamp(0.0, 1.0)),
        SegmentKind::Corner => (0.2 + 0.3 * seg_t, 0.0),
        SegmentKind::Accel => (0.5 + 0.5 * smooth_t, 0.0),
    };

    // ramp in over the first half, out over the second
    let envelope = if seg_t < 0.5 {
        smoothstep(seg_t * 2.0)
    } else {
        smoothstep((1.0 - seg_t) * 2.0)
    };

    let gear = speed_to_gear(speed);
    LapState {
        speed,
        throttle,
        brake,
        steering: seg.steering * envelope,
        gear,
        rpm: speed_to_rpm(speed, gear),
    }
}

fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn speed_to_gear(speed_ms: f32) -> u8 {
    match speed_ms * 3.6 {
        x if x < 40.0 => 1,
        x if x < 80.0 => 2,
        x if x < 120.0 => 3,
        x if x < 170.0 => 4,
        x if x < 230.0 => 5,
        _ => 6,
    }
}

fn speed_to_rpm(speed_ms: f32, gear: u8) -> f32 {
    let ratio = match gear {
        1 => 130.0,
        2 => 85.0,
        3 => 60.0,
        4 => 45.0,
        5 => 36.0,
        _ => 30.0,
    };
    (speed_ms * ratio + IDLE_RPM).clamp(IDLE_RPM, MAX_RPM)
}

/// Small deterministic jitter centered around 0
fn jitter(seed: f32, amplitude: f32) -> f32 {
    let x = (seed * 12.9898 + 78.233).sin() * 43_758.547;
    (x - x.floor() - 0.5) * 2.0 * amplitude
}

fn to_pedal(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

// =============================================================================
// DemoSource
// =============================================================================

pub struct DemoSource {
    tick: Duration,
    ticker: Option<Interval>,
    elapsed_ms: u32,
    laps_completed: u16,
    best_lap: f32,
    last_lap: f32,
    distance: f32,
    game: Game,
    buf: Vec<u8>,
}

impl DemoSource {
    pub fn new() -> Self {
        Self::with_tick(DEMO_TICK)
    }

    pub fn with_tick(tick: Duration) -> Self {
        Self {
            tick,
            ticker: None,
            elapsed_ms: 0,
            laps_completed: 0,
            best_lap: 0.0,
            last_lap: 0.0,
            distance: 0.0,
            game: Game::Motorsport,
            buf: Vec::new(),
        }
    }

    /// Encode packets in the layout `game` sends
    pub fn with_game(mut self, game: Game) -> Self {
        self.game = game;
        self
    }

    /// Advance the simulation by one tick and return the packet for it
    pub fn next_packet(&mut self) -> ForzaPacket {
        let dt = self.tick.as_secs_f32();
        self.elapsed_ms = self
            .elapsed_ms
            .wrapping_add(self.tick.as_millis().max(1) as u32);

        let race_time = self.elapsed_ms as f32 / 1000.0;
        let lap_length = lap_duration();
        let lap_index = (race_time / lap_length) as u16;
        if lap_index > self.laps_completed {
            self.laps_completed = lap_index;
            self.last_lap = lap_length + jitter(race_time, 0.8);
            if self.best_lap == 0.0 || self.last_lap < self.best_lap {
                self.best_lap = self.last_lap;
            }
        }

        let lap_time = race_time % lap_length;
        let state = compute_lap_state(lap_time);
        self.distance += state.speed * dt;

        let torque = 180.0 + 320.0 * state.throttle;
        let power = torque * state.rpm * std::f32::consts::TAU / 60.0;
        let heat = 160.0 + state.speed * 0.6 + state.steering.abs() * 40.0;
        let wear = (1.0 - race_time * 0.0002).max(0.0);
        let heading = self.distance / 400.0;

        ForzaPacket {
            is_race_on: 1,
            timestamp_ms: self.elapsed_ms,
            engine_max_rpm: MAX_RPM,
            engine_idle_rpm: IDLE_RPM,
            current_engine_rpm: (state.rpm + jitter(race_time, 25.0)).clamp(IDLE_RPM, MAX_RPM),
            velocity: Vector3::new(state.steering * 2.0, 0.0, state.speed),
            yaw: heading,
            tire_temp: Corners::new(
                heat + 6.0 + state.steering.max(0.0) * 10.0,
                heat + 6.0 - state.steering.min(0.0) * 10.0,
                heat,
                heat,
            ),
            tire_wear: Corners::new(wear - 0.01, wear - 0.01, wear, wear),
            car_ordinal: DEMO_CAR_ORDINAL,
            car_class: 4,
            car_performance_index: 700,
            drivetrain_type: 1,
            num_cylinders: 8,
            position: Vector3::new(heading.cos() * 400.0, 0.5, heading.sin() * 400.0),
            speed: state.speed,
            power,
            torque,
            boost: 14.0 * state.throttle,
            fuel: (1.0 - race_time * 0.0005).max(0.0),
            distance_traveled: self.distance,
            best_lap: self.best_lap,
            last_lap: self.last_lap,
            current_lap: lap_time,
            current_race_time: race_time,
            lap_number: self.laps_completed,
            race_position: 1,
            accel: to_pedal(state.throttle),
            brake: to_pedal(state.brake),
            gear: state.gear,
            steer: (state.steering.clamp(-1.0, 1.0) * 127.0).round() as i8,
            track_ordinal: DEMO_TRACK_ORDINAL,
            ..Default::default()
        }
    }
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketSource for DemoSource {
    fn name(&self) -> &str {
        "demo"
    }

    async fn recv(&mut self) -> Result<&[u8], SourceError> {
        let tick = self.tick;
        let ticker = self.ticker.get_or_insert_with(|| {
            let mut ticker = tokio::time::interval(tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker
        });
        ticker.tick().await;

        let packet = self.next_packet();
        self.buf = encode_for(self.game, &packet);
        Ok(self.buf.as_slice())
    }
}
