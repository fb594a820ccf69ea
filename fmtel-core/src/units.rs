//! Unit conversions and time formatting for dashboard values
//!
//! All functions are total: negative, NaN or infinite inputs saturate instead
//! of failing, since the integer conversions truncate toward zero.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// km/h per m/s
pub const KMH_PER_MPS: f32 = 3.6;

/// mph per m/s
#[allow(clippy::excessive_precision)]
pub const MPH_PER_MPS: f32 = 2.2369362921;

/// Mechanical horsepower per watt
pub const HP_PER_WATT: f32 = 0.00134102;

/// N·m per ft·lb
pub const NM_PER_FOOT_POUND: f64 = 1.356;

const NANOS_PER_SECOND: u64 = 1_000_000_000;
const SECONDS_PER_DAY: u64 = 86_400;

/// Speed in km/h, truncated
pub fn km_per_hour(meters_per_second: f32) -> u32 {
    (meters_per_second * KMH_PER_MPS) as u32
}

/// Speed in mph, truncated
pub fn miles_per_hour(meters_per_second: f32) -> u32 {
    (meters_per_second * MPH_PER_MPS) as u32
}

/// Power in horsepower, truncated
pub fn horsepower(watts: f32) -> u32 {
    (watts * HP_PER_WATT) as u32
}

/// Power in kilowatts, truncated
pub fn kilowatts(watts: f32) -> u32 {
    (watts / 1000.0) as u32
}

/// Torque in ft·lb, truncated. Divided in f64.
pub fn foot_pounds(newton_meters: f32) -> u32 {
    (f64::from(newton_meters) / NM_PER_FOOT_POUND) as u32
}

/// Fahrenheit to Celsius
pub fn fahrenheit_to_celsius(fahrenheit: f32) -> f32 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

/// Seconds as a wall-clock time after midnight.
///
/// Sub-millisecond digits are truncated and whole days are dropped, so a lap
/// time renders the same way a clock would. Non-finite input is midnight.
fn clock_time(seconds: f32) -> NaiveTime {
    if !seconds.is_finite() {
        return NaiveTime::default();
    }
    let nanos = (f64::from(seconds) * NANOS_PER_SECOND as f64) as u64;
    let secs = (nanos / NANOS_PER_SECOND) % SECONDS_PER_DAY;
    let frac = nanos % NANOS_PER_SECOND;
    NaiveTime::from_num_seconds_from_midnight_opt(secs as u32, frac as u32).unwrap_or_default()
}

/// Lap time as `mm:ss.mmm`, e.g. `03:42.583`. Minutes wrap at one hour.
pub fn format_lap_time(seconds: f32) -> String {
    clock_time(seconds).format("%M:%S%.3f").to_string()
}

/// Race time as `hh:mm:ss.mmm`, e.g. `00:03:42.583`
pub fn format_race_time(seconds: f32) -> String {
    clock_time(seconds).format("%H:%M:%S%.3f").to_string()
}

/// Temperature unit used for display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Temperature {
    #[default]
    Celsius,
    Fahrenheit,
}

impl Temperature {
    /// Convert a raw Fahrenheit reading into this unit
    pub fn from_fahrenheit(self, fahrenheit: f32) -> f32 {
        match self {
            Temperature::Celsius => fahrenheit_to_celsius(fahrenheit),
            Temperature::Fahrenheit => fahrenheit,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Temperature::Celsius => "°C",
            Temperature::Fahrenheit => "°F",
        }
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Temperature::Celsius => f.write_str("celsius"),
            Temperature::Fahrenheit => f.write_str("fahrenheit"),
        }
    }
}

/// Lenient parse: `fahrenheit` (any case) selects Fahrenheit, anything else
/// falls back to Celsius.
impl FromStr for Temperature {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("fahrenheit") {
            Ok(Temperature::Fahrenheit)
        } else {
            Ok(Temperature::Celsius)
        }
    }
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn speed_is_floor_of_exact_formula(speed in 0.0f32..1e6) {
            prop_assert_eq!(km_per_hour(speed), (speed * KMH_PER_MPS).floor() as u32);
            prop_assert_eq!(miles_per_hour(speed), (speed * MPH_PER_MPS).floor() as u32);
        }

        #[test]
        fn power_is_floor_of_exact_formula(watts in 0.0f32..1e6) {
            prop_assert_eq!(horsepower(watts), (watts * HP_PER_WATT).floor() as u32);
            prop_assert_eq!(kilowatts(watts), (watts / 1000.0).floor() as u32);
        }

        #[test]
        fn torque_is_floor_of_exact_formula(newton_meters in 0.0f32..1e6) {
            let expected = (f64::from(newton_meters) / NM_PER_FOOT_POUND).floor() as u32;
            prop_assert_eq!(foot_pounds(newton_meters), expected);
        }

        #[test]
        fn lap_time_always_has_fixed_width(seconds in any::<f32>()) {
            prop_assert_eq!(format_lap_time(seconds).len(), "00:00.000".len());
        }
    }
}
