//! Telemetry packet record
//!
//! [`ForzaPacket`] mirrors the Forza "Data Out" dash packet field for field.
//! Declaration order matches wire order; see [`crate::wire`] for the byte
//! layout. Per-wheel quantities are grouped in [`Corners`].
//!
//! Coordinate system: car-local
//! - X: Right (positive = right side)
//! - Y: Up (positive = up)
//! - Z: Forward (positive = forward)

use crate::classify::{CarClass, Drivetrain};
use crate::units::{self, Temperature};
use serde::{Deserialize, Serialize};

/// 3D vector with typed components
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T> Vector3<T> {
    pub fn new(x: T, y: T, z: T) -> Self {
        Self { x, y, z }
    }
}

/// One value per wheel (Front-Left, Front-Right, Rear-Left, Rear-Right)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Corners<T> {
    pub front_left: T,
    pub front_right: T,
    pub rear_left: T,
    pub rear_right: T,
}

impl<T> Corners<T> {
    pub fn new(front_left: T, front_right: T, rear_left: T, rear_right: T) -> Self {
        Self {
            front_left,
            front_right,
            rear_left,
            rear_right,
        }
    }

    /// Apply `f` to every corner independently
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Corners<U> {
        Corners {
            front_left: f(self.front_left),
            front_right: f(self.front_right),
            rear_left: f(self.rear_left),
            rear_right: f(self.rear_right),
        }
    }

    /// Corners in wire order
    pub fn all(&self) -> [&T; 4] {
        [
            &self.front_left,
            &self.front_right,
            &self.rear_left,
            &self.rear_right,
        ]
    }
}

impl<T: Copy> Corners<T> {
    pub fn splat(value: T) -> Self {
        Self::new(value, value, value, value)
    }
}

/// Tire temperatures in the unit they were requested in
pub type TireTemperatures = Corners<f32>;

/// Tire wear, 1.0 = new and 0.0 = fully worn
pub type TireWear = Corners<f32>;

/// Car position in world space (meters)
pub type Position = Vector3<f32>;

/// Suspension travel, either normalized (0.0 = max stretch, 1.0 = max
/// compression) or in meters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuspensionTravel {
    pub normalized: bool,
    #[serde(flatten)]
    pub travel: Corners<f32>,
}

/// Raw pedal positions, 0 (released) to 255 (fully pressed)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PedalInputs {
    pub throttle: u8,
    pub brake: u8,
    pub clutch: u8,
    pub hand_brake: u8,
}

/// One decoded telemetry datagram
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ForzaPacket {
    /// 1 while a race is on, 0 in menus or when the race is stopped
    pub is_race_on: i32,

    /// Game clock in milliseconds. Can overflow to 0.
    pub timestamp_ms: u32,

    pub engine_max_rpm: f32,
    pub engine_idle_rpm: f32,
    pub current_engine_rpm: f32,

    /// Car-local acceleration (m/s²)
    pub acceleration: Vector3<f32>,

    /// Car-local velocity (m/s)
    pub velocity: Vector3<f32>,

    /// Car-local angular velocity; X = pitch, Y = yaw, Z = roll (rad/s)
    pub angular_velocity: Vector3<f32>,

    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,

    /// 0.0 = max stretch, 1.0 = max compression
    pub normalized_suspension_travel: Corners<f32>,

    /// 0 = full grip, |ratio| > 1.0 = loss of grip
    pub tire_slip_ratio: Corners<f32>,

    /// Wheel rotation speed (rad/s)
    pub wheel_rotation_speed: Corners<f32>,

    /// 1 while the wheel is on a rumble strip
    pub wheel_on_rumble_strip: Corners<i32>,

    /// 0 to 1, where 1 is the deepest puddle
    pub wheel_in_puddle_depth: Corners<f32>,

    /// Force feedback surface rumble, non-dimensional
    pub surface_rumble: Corners<f32>,

    /// 0 = full grip, |angle| > 1.0 = loss of grip
    pub tire_slip_angle: Corners<f32>,

    /// 0 = full grip, |slip| > 1.0 = loss of grip
    pub tire_combined_slip: Corners<f32>,

    /// Suspension travel (meters)
    pub suspension_travel_meters: Corners<f32>,

    /// Car identifier, keyed into the car reference table
    pub car_ordinal: i32,

    /// 1-based class code, 1 = D through 8 = X
    pub car_class: i32,

    /// 100 (slowest) to 999 (fastest)
    pub car_performance_index: i32,

    /// 0 = FWD, 1 = RWD, 2 = AWD
    pub drivetrain_type: i32,

    pub num_cylinders: i32,

    // === Dash ===
    /// World position (meters)
    pub position: Vector3<f32>,

    /// Meters per second
    pub speed: f32,

    /// Watts
    pub power: f32,

    /// Newton-meters
    pub torque: f32,

    /// Fahrenheit
    pub tire_temp: Corners<f32>,

    /// PSI
    pub boost: f32,
    pub fuel: f32,
    pub distance_traveled: f32,

    /// Lap and race times in seconds
    pub best_lap: f32,
    pub last_lap: f32,
    pub current_lap: f32,
    pub current_race_time: f32,

    pub lap_number: u16,
    pub race_position: u8,

    /// Pedals, 0 (none) to 255 (full)
    pub accel: u8,
    pub brake: u8,
    pub clutch: u8,
    pub hand_brake: u8,

    pub gear: u8,

    /// -127 (full left) to 127 (full right)
    pub steer: i8,

    pub normalized_driving_line: i8,
    pub normalized_ai_brake_difference: i8,

    /// 1.0 = new, 0.0 = fully worn
    pub tire_wear: Corners<f32>,

    /// Track identifier
    pub track_ordinal: i32,
}

impl ForzaPacket {
    /// True while the simulation is running a race (`is_race_on == 1`)
    pub fn is_running(&self) -> bool {
        self.is_race_on == 1
    }

    /// True in menus, while paused, or when no race is on
    pub fn is_paused(&self) -> bool {
        !self.is_running()
    }

    pub fn km_per_hour(&self) -> u32 {
        units::km_per_hour(self.speed)
    }

    pub fn miles_per_hour(&self) -> u32 {
        units::miles_per_hour(self.speed)
    }

    pub fn horsepower(&self) -> u32 {
        units::horsepower(self.power)
    }

    pub fn kilowatts(&self) -> u32 {
        units::kilowatts(self.power)
    }

    pub fn foot_pounds(&self) -> u32 {
        units::foot_pounds(self.torque)
    }

    pub fn drivetrain(&self) -> Drivetrain {
        Drivetrain::classify(self.drivetrain_type, self.is_running())
    }

    pub fn car_class(&self) -> CarClass {
        CarClass::classify(self.car_class, self.is_running())
    }

    /// Tire temperatures converted per corner
    pub fn tire_temps(&self, unit: Temperature) -> TireTemperatures {
        self.tire_temp.map(|f| unit.from_fahrenheit(f))
    }

    pub fn tire_temps_celsius(&self) -> TireTemperatures {
        self.tire_temps(Temperature::Celsius)
    }

    pub fn tire_wear(&self) -> TireWear {
        self.tire_wear
    }

    pub fn normalized_suspension_travel(&self) -> SuspensionTravel {
        SuspensionTravel {
            normalized: true,
            travel: self.normalized_suspension_travel,
        }
    }

    pub fn suspension_travel(&self) -> SuspensionTravel {
        SuspensionTravel {
            normalized: false,
            travel: self.suspension_travel_meters,
        }
    }

    pub fn car_position(&self) -> Position {
        self.position
    }

    pub fn pedal_inputs(&self) -> PedalInputs {
        PedalInputs {
            throttle: self.accel,
            brake: self.brake,
            clutch: self.clutch,
            hand_brake: self.hand_brake,
        }
    }

    pub fn fmt_best_lap(&self) -> String {
        units::format_lap_time(self.best_lap)
    }

    pub fn fmt_last_lap(&self) -> String {
        units::format_lap_time(self.last_lap)
    }

    pub fn fmt_current_lap(&self) -> String {
        units::format_lap_time(self.current_lap)
    }

    pub fn fmt_current_race_time(&self) -> String {
        units::format_race_time(self.current_race_time)
    }
}
