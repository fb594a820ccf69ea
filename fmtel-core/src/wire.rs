//! Fixed-layout little-endian wire format
//!
//! The packet is a flat sequence of numeric fields with no padding. Fields
//! are read and written one by one in [`ForzaPacket`] declaration order, so
//! the layout never depends on in-memory struct alignment.
//!
//! | Offset | Fields                                   |
//! |--------|------------------------------------------|
//! | 0      | is_race_on (i32), timestamp_ms (u32)     |
//! | 8      | engine rpm ×3, acceleration, velocity, angular velocity, yaw/pitch/roll |
//! | 68     | nine per-corner blocks (16 bytes each)   |
//! | 212    | car ordinal, class, PI, drivetrain, cylinders (i32) |
//! | 232    | position, speed, power, torque           |
//! | 256    | tire temperatures                        |
//! | 272    | boost, fuel, distance, lap/race times    |
//! | 300    | lap number (u16)                         |
//! | 302    | race position and inputs (u8 ×6, i8 ×3)  |
//! | 311    | tire wear                                |
//! | 327    | track ordinal (i32)                      |
//!
//! Forza Horizon 5 sends the same fields up to the AI brake difference, with
//! 12 undocumented bytes inserted at offset 232 and one trailing pad byte. It
//! has no tire wear or track ordinal; those decode as zero.

use crate::error::PacketError;
use crate::game::Game;
use crate::model::{Corners, ForzaPacket, Vector3};

/// Size of one dash packet in bytes
pub const PACKET_SIZE: usize = 331;

/// Size of one Forza Horizon 5 dash packet in bytes
pub const HORIZON_PACKET_SIZE: usize = 324;

/// End of the fields shared by every dash layout, up to the car info
const SLED_SIZE: usize = 232;

/// End of the dash fields both layouts carry (through the AI brake difference)
const SHARED_DASH_END: usize = 311;

/// Undocumented bytes Horizon inserts between the sled and the dash
const HORIZON_GAP: usize = 12;

const HORIZON_DASH: usize = SLED_SIZE + HORIZON_GAP;

/// Decode one datagram. The buffer must be exactly [`PACKET_SIZE`] bytes.
pub fn decode(data: &[u8]) -> Result<ForzaPacket, PacketError> {
    let data: &[u8; PACKET_SIZE] =
        data.try_into()
            .map_err(|_| PacketError::MalformedPacket {
                expected: PACKET_SIZE,
                actual: data.len(),
            })?;

    let mut r = PacketReader::new(data);

    // Struct expressions evaluate fields in source order, which is wire order
    let packet = ForzaPacket {
        is_race_on: r.i32(),
        timestamp_ms: r.u32(),
        engine_max_rpm: r.f32(),
        engine_idle_rpm: r.f32(),
        current_engine_rpm: r.f32(),
        acceleration: r.vector3(),
        velocity: r.vector3(),
        angular_velocity: r.vector3(),
        yaw: r.f32(),
        pitch: r.f32(),
        roll: r.f32(),
        normalized_suspension_travel: r.corners_f32(),
        tire_slip_ratio: r.corners_f32(),
        wheel_rotation_speed: r.corners_f32(),
        wheel_on_rumble_strip: r.corners_i32(),
        wheel_in_puddle_depth: r.corners_f32(),
        surface_rumble: r.corners_f32(),
        tire_slip_angle: r.corners_f32(),
        tire_combined_slip: r.corners_f32(),
        suspension_travel_meters: r.corners_f32(),
        car_ordinal: r.i32(),
        car_class: r.i32(),
        car_performance_index: r.i32(),
        drivetrain_type: r.i32(),
        num_cylinders: r.i32(),
        position: r.vector3(),
        speed: r.f32(),
        power: r.f32(),
        torque: r.f32(),
        tire_temp: r.corners_f32(),
        boost: r.f32(),
        fuel: r.f32(),
        distance_traveled: r.f32(),
        best_lap: r.f32(),
        last_lap: r.f32(),
        current_lap: r.f32(),
        current_race_time: r.f32(),
        lap_number: r.u16(),
        race_position: r.u8(),
        accel: r.u8(),
        brake: r.u8(),
        clutch: r.u8(),
        hand_brake: r.u8(),
        gear: r.u8(),
        steer: r.i8(),
        normalized_driving_line: r.i8(),
        normalized_ai_brake_difference: r.i8(),
        tire_wear: r.corners_f32(),
        track_ordinal: r.i32(),
    };

    debug_assert_eq!(r.position(), PACKET_SIZE);
    Ok(packet)
}

/// Encode a packet into its wire layout
pub fn encode(packet: &ForzaPacket) -> [u8; PACKET_SIZE] {
    let mut w = PacketWriter::new();

    w.i32(packet.is_race_on);
    w.u32(packet.timestamp_ms);
    w.f32(packet.engine_max_rpm);
    w.f32(packet.engine_idle_rpm);
    w.f32(packet.current_engine_rpm);
    w.vector3(&packet.acceleration);
    w.vector3(&packet.velocity);
    w.vector3(&packet.angular_velocity);
    w.f32(packet.yaw);
    w.f32(packet.pitch);
    w.f32(packet.roll);
    w.corners_f32(&packet.normalized_suspension_travel);
    w.corners_f32(&packet.tire_slip_ratio);
    w.corners_f32(&packet.wheel_rotation_speed);
    w.corners_i32(&packet.wheel_on_rumble_strip);
    w.corners_f32(&packet.wheel_in_puddle_depth);
    w.corners_f32(&packet.surface_rumble);
    w.corners_f32(&packet.tire_slip_angle);
    w.corners_f32(&packet.tire_combined_slip);
    w.corners_f32(&packet.suspension_travel_meters);
    w.i32(packet.car_ordinal);
    w.i32(packet.car_class);
    w.i32(packet.car_performance_index);
    w.i32(packet.drivetrain_type);
    w.i32(packet.num_cylinders);
    w.vector3(&packet.position);
    w.f32(packet.speed);
    w.f32(packet.power);
    w.f32(packet.torque);
    w.corners_f32(&packet.tire_temp);
    w.f32(packet.boost);
    w.f32(packet.fuel);
    w.f32(packet.distance_traveled);
    w.f32(packet.best_lap);
    w.f32(packet.last_lap);
    w.f32(packet.current_lap);
    w.f32(packet.current_race_time);
    w.u16(packet.lap_number);
    w.u8(packet.race_position);
    w.u8(packet.accel);
    w.u8(packet.brake);
    w.u8(packet.clutch);
    w.u8(packet.hand_brake);
    w.u8(packet.gear);
    w.i8(packet.steer);
    w.i8(packet.normalized_driving_line);
    w.i8(packet.normalized_ai_brake_difference);
    w.corners_f32(&packet.tire_wear);
    w.i32(packet.track_ordinal);

    debug_assert_eq!(w.pos, PACKET_SIZE);
    w.buf
}

/// Decode one datagram using the layout of `game`
pub fn decode_for(game: Game, data: &[u8]) -> Result<ForzaPacket, PacketError> {
    match game {
        Game::Motorsport => decode(data),
        Game::Horizon5 => {
            if data.len() != HORIZON_PACKET_SIZE {
                return Err(PacketError::MalformedPacket {
                    expected: HORIZON_PACKET_SIZE,
                    actual: data.len(),
                });
            }
            let mut full = [0u8; PACKET_SIZE];
            full[..SLED_SIZE].copy_from_slice(&data[..SLED_SIZE]);
            full[SLED_SIZE..SHARED_DASH_END]
                .copy_from_slice(&data[HORIZON_DASH..HORIZON_DASH + SHARED_DASH_END - SLED_SIZE]);
            decode(&full)
        }
    }
}

/// Encode a packet into the layout of `game`. Fields the layout lacks are
/// dropped and the Horizon gap is zero-filled.
pub fn encode_for(game: Game, packet: &ForzaPacket) -> Vec<u8> {
    let full = encode(packet);
    match game {
        Game::Motorsport => full.to_vec(),
        Game::Horizon5 => {
            let mut out = vec![0u8; HORIZON_PACKET_SIZE];
            out[..SLED_SIZE].copy_from_slice(&full[..SLED_SIZE]);
            out[HORIZON_DASH..HORIZON_DASH + SHARED_DASH_END - SLED_SIZE]
                .copy_from_slice(&full[SLED_SIZE..SHARED_DASH_END]);
            out
        }
    }
}

impl TryFrom<&[u8]> for ForzaPacket {
    type Error = PacketError;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        decode(data)
    }
}

impl ForzaPacket {
    pub fn to_bytes(&self) -> [u8; PACKET_SIZE] {
        encode(self)
    }
}

/// Forward-only cursor over a full-size packet buffer
struct PacketReader<'a> {
    data: &'a [u8; PACKET_SIZE],
    pos: usize,
}

impl<'a> PacketReader<'a> {
    fn new(data: &'a [u8; PACKET_SIZE]) -> Self {
        Self { data, pos: 0 }
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn take<const N: usize>(&mut self) -> [u8; N] {
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        out
    }

    fn i32(&mut self) -> i32 {
        i32::from_le_bytes(self.take())
    }

    fn u32(&mut self) -> u32 {
        u32::from_le_bytes(self.take())
    }

    fn f32(&mut self) -> f32 {
        f32::from_le_bytes(self.take())
    }

    fn u16(&mut self) -> u16 {
        u16::from_le_bytes(self.take())
    }

    fn u8(&mut self) -> u8 {
        u8::from_le_bytes(self.take())
    }

    fn i8(&mut self) -> i8 {
        i8::from_le_bytes(self.take())
    }

    fn vector3(&mut self) -> Vector3<f32> {
        Vector3::new(self.f32(), self.f32(), self.f32())
    }

    fn corners_f32(&mut self) -> Corners<f32> {
        Corners::new(self.f32(), self.f32(), self.f32(), self.f32())
    }

    fn corners_i32(&mut self) -> Corners<i32> {
        Corners::new(self.i32(), self.i32(), self.i32(), self.i32())
    }
}

struct PacketWriter {
    buf: [u8; PACKET_SIZE],
    pos: usize,
}

impl PacketWriter {
    fn new() -> Self {
        Self {
            buf: [0u8; PACKET_SIZE],
            pos: 0,
        }
    }

    fn put<const N: usize>(&mut self, bytes: [u8; N]) {
        self.buf[self.pos..self.pos + N].copy_from_slice(&bytes);
        self.pos += N;
    }

    fn i32(&mut self, v: i32) {
        self.put(v.to_le_bytes());
    }

    fn u32(&mut self, v: u32) {
        self.put(v.to_le_bytes());
    }

    fn f32(&mut self, v: f32) {
        self.put(v.to_le_bytes());
    }

    fn u16(&mut self, v: u16) {
        self.put(v.to_le_bytes());
    }

    fn u8(&mut self, v: u8) {
        self.put([v]);
    }

    fn i8(&mut self, v: i8) {
        self.put(v.to_le_bytes());
    }

    fn vector3(&mut self, v: &Vector3<f32>) {
        self.f32(v.x);
        self.f32(v.y);
        self.f32(v.z);
    }

    fn corners_f32(&mut self, c: &Corners<f32>) {
        for v in c.all() {
            self.f32(*v);
        }
    }

    fn corners_i32(&mut self, c: &Corners<i32>) {
        for v in c.all() {
            self.i32(*v);
        }
    }
}
