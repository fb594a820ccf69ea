//! JSON export helpers
//!
//! [`FieldMask`] lets stream clients ask for a subset of packet fields to
//! reduce bandwidth; [`PacketSummary`] carries the derived dashboard values.

use crate::cars::CarReference;
use crate::classify::{CarClass, Drivetrain};
use crate::model::{ForzaPacket, PedalInputs, TireTemperatures, TireWear};
use crate::units::Temperature;
use serde::Serialize;
use std::collections::HashSet;
use std::str::FromStr;

/// Field kept in every filtered payload so clients can order updates
const ALWAYS_INCLUDED: &str = "timestamp_ms";

/// Specifies which top-level fields to include in serialized output
#[derive(Debug, Clone, Default)]
pub struct FieldMask {
    fields: HashSet<String>,
    include_all: bool,
}

impl FieldMask {
    /// Create a mask that includes all fields
    pub fn all() -> Self {
        Self {
            fields: HashSet::new(),
            include_all: true,
        }
    }

    /// Create a mask from a comma-separated list of field names
    pub fn parse(fields: &str) -> Self {
        let fields: HashSet<String> = fields
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            fields,
            include_all: false,
        }
    }

    /// Check if a field should be included
    pub fn includes(&self, field: &str) -> bool {
        self.include_all || self.fields.contains(&field.to_lowercase())
    }

    pub fn is_all(&self) -> bool {
        self.include_all
    }
}

impl FromStr for FieldMask {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Serialize `value` keeping only the top-level fields the mask includes
///
/// With no mask, or a mask that includes everything, the full value is
/// serialized. `timestamp_ms` is always kept when present.
pub fn to_json_filtered<T: Serialize>(
    value: &T,
    mask: Option<&FieldMask>,
) -> serde_json::Result<String> {
    let mask = match mask {
        Some(mask) if !mask.is_all() => mask,
        _ => return serde_json::to_string(value),
    };

    let mut json = serde_json::to_value(value)?;
    if let serde_json::Value::Object(map) = &mut json {
        map.retain(|key, _| key == ALWAYS_INCLUDED || mask.includes(key));
    }
    serde_json::to_string(&json)
}

/// Derived, human-readable dashboard values for one packet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PacketSummary {
    pub timestamp_ms: u32,
    pub running: bool,
    pub car: CarReference,
    pub car_class: CarClass,
    pub performance_index: i32,
    pub drivetrain: Drivetrain,
    pub rpm: f32,
    pub max_rpm: f32,
    pub gear: u8,
    pub speed_kmh: u32,
    pub speed_mph: u32,
    pub horsepower: u32,
    pub kilowatts: u32,
    pub foot_pounds: u32,
    pub boost: f32,
    pub fuel: f32,
    pub lap_number: u16,
    pub race_position: u8,
    pub best_lap: String,
    pub last_lap: String,
    pub current_lap: String,
    pub race_time: String,
    pub tire_temps_celsius: TireTemperatures,
    pub tire_temps_fahrenheit: TireTemperatures,
    pub tire_wear: TireWear,
    pub pedals: PedalInputs,
}

impl PacketSummary {
    pub fn new(packet: &ForzaPacket, car: &CarReference) -> Self {
        Self {
            timestamp_ms: packet.timestamp_ms,
            running: packet.is_running(),
            car: car.clone(),
            car_class: packet.car_class(),
            performance_index: packet.car_performance_index,
            drivetrain: packet.drivetrain(),
            rpm: packet.current_engine_rpm,
            max_rpm: packet.engine_max_rpm,
            gear: packet.gear,
            speed_kmh: packet.km_per_hour(),
            speed_mph: packet.miles_per_hour(),
            horsepower: packet.horsepower(),
            kilowatts: packet.kilowatts(),
            foot_pounds: packet.foot_pounds(),
            boost: packet.boost,
            fuel: packet.fuel,
            lap_number: packet.lap_number,
            race_position: packet.race_position,
            best_lap: packet.fmt_best_lap(),
            last_lap: packet.fmt_last_lap(),
            current_lap: packet.fmt_current_lap(),
            race_time: packet.fmt_current_race_time(),
            tire_temps_celsius: packet.tire_temps(Temperature::Celsius),
            tire_temps_fahrenheit: packet.tire_temps(Temperature::Fahrenheit),
            tire_wear: packet.tire_wear(),
            pedals: packet.pedal_inputs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Corners;

    fn make_test_packet() -> ForzaPacket {
        ForzaPacket {
            is_race_on: 1,
            timestamp_ms: 4242,
            speed: 30.0,
            current_engine_rpm: 5000.0,
            gear: 3,
            car_class: 8,
            drivetrain_type: 0,
            tire_temp: Corners::splat(212.0),
            current_lap: 45.2,
            ..Default::default()
        }
    }

    #[test]
    fn test_field_mask_parse_comma_separated() {
        let mask = FieldMask::parse("speed,current_engine_rpm,gear");
        assert!(mask.includes("speed"));
        assert!(mask.includes("current_engine_rpm"));
        assert!(mask.includes("gear"));
        assert!(!mask.includes("brake"));
        assert!(!mask.is_all());
    }

    #[test]
    fn test_field_mask_parse_with_whitespace_and_case() {
        let mask = FieldMask::parse(" Speed , GEAR ");
        assert!(mask.includes("speed"));
        assert!(mask.includes("gear"));
    }

    #[test]
    fn test_field_mask_parse_empty_string() {
        let mask = FieldMask::parse("");
        assert!(!mask.is_all());
        assert!(!mask.includes("speed"));
    }

    #[test]
    fn test_field_mask_all_and_from_str() {
        assert!(FieldMask::all().includes("anything"));
        let mask: FieldMask = "speed,gear".parse().unwrap();
        assert!(mask.includes("gear"));
        assert!(!mask.includes("fuel"));
    }

    #[test]
    fn test_to_json_filtered_without_mask_returns_full_packet() {
        let json = to_json_filtered(&make_test_packet(), None).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["speed"], 30.0);
        assert_eq!(parsed["gear"], 3);
        assert!(parsed.get("tire_temp").is_some());
        assert!(parsed.get("track_ordinal").is_some());
    }

    #[test]
    fn test_to_json_filtered_keeps_only_requested_fields() {
        let mask = FieldMask::parse("speed,gear");
        let json = to_json_filtered(&make_test_packet(), Some(&mask)).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let object = parsed.as_object().unwrap();

        assert_eq!(object.len(), 3);
        assert_eq!(parsed["timestamp_ms"], 4242);
        assert_eq!(parsed["speed"], 30.0);
        assert_eq!(parsed["gear"], 3);
        assert!(parsed.get("brake").is_none());
    }

    #[test]
    fn test_to_json_filtered_ignores_unknown_fields() {
        let mask = FieldMask::parse("no_such_field");
        let json = to_json_filtered(&make_test_packet(), Some(&mask)).unwrap();
        assert_eq!(json, r#"{"timestamp_ms":4242}"#);
    }

    #[test]
    fn test_summary_derives_dashboard_values() {
        let summary = PacketSummary::new(&make_test_packet(), &CarReference::unknown());
        assert_eq!(summary.speed_kmh, 108);
        assert_eq!(summary.speed_mph, 67);
        assert_eq!(summary.car_class, CarClass::X);
        assert_eq!(summary.drivetrain, Drivetrain::Fwd);
        assert_eq!(summary.current_lap, "00:45.200");
        assert_eq!(summary.tire_temps_celsius.front_left, 100.0);
        assert_eq!(summary.tire_temps_fahrenheit.front_left, 212.0);
        assert!(summary.car.is_unknown());
    }

    #[test]
    fn test_summary_serializes_labels() {
        let mut packet = make_test_packet();
        packet.is_race_on = 0;
        let summary = PacketSummary::new(&packet, &CarReference::unknown());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["drivetrain"], "-");
        assert_eq!(json["car_class"], "X");
        assert_eq!(json["running"], false);
    }
}
