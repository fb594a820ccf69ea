//! Peak values over a driving session
//!
//! Tracks the best speed reached in each gear plus the overall top speed,
//! peak torque and peak power. Peaks only ever rise until [`DynoStats::reset`].
//! A new peak needs a strictly larger value; ties keep the earlier reading.

use crate::model::ForzaPacket;
use serde::Serialize;

/// Gear slots tracked: 0 is reverse, 1..=10 are forward gears
pub const DYNO_GEARS: usize = 11;

/// A speed reading in both display units, captured together
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TopSpeed {
    pub km_per_hour: u32,
    pub miles_per_hour: u32,
}

impl TopSpeed {
    fn of(packet: &ForzaPacket) -> Self {
        Self {
            km_per_hour: packet.km_per_hour(),
            miles_per_hour: packet.miles_per_hour(),
        }
    }

    /// Replace with `candidate` if it is faster. km/h decides.
    fn raise(&mut self, candidate: TopSpeed) {
        if self.km_per_hour < candidate.km_per_hour {
            *self = candidate;
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DynoStats {
    /// Indexed by gear, reverse at 0
    pub top_speed_per_gear: [TopSpeed; DYNO_GEARS],
    pub top_speed: TopSpeed,
    pub max_newton_meters: f32,
    /// ft·lb of the reading that set `max_newton_meters`
    pub max_foot_pounds: u32,
    pub max_horsepower: u32,
    /// kW of the reading that set `max_horsepower`
    pub max_kilowatts: u32,
}

impl DynoStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one accepted packet into the peaks
    pub fn update(&mut self, packet: &ForzaPacket) {
        let speed = TopSpeed::of(packet);

        // gears above 10 are not a real gearbox position
        if let Some(slot) = self.top_speed_per_gear.get_mut(usize::from(packet.gear)) {
            slot.raise(speed);
        }
        self.top_speed.raise(speed);

        if self.max_newton_meters < packet.torque {
            self.max_newton_meters = packet.torque;
            self.max_foot_pounds = packet.foot_pounds();
        }

        let horsepower = packet.horsepower();
        if self.max_horsepower < horsepower {
            self.max_horsepower = horsepower;
            self.max_kilowatts = packet.kilowatts();
        }
    }

    /// Clear every peak back to zero
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Top speed reached in `gear`, `None` for gears above 10
    pub fn gear(&self, gear: u8) -> Option<TopSpeed> {
        self.top_speed_per_gear.get(usize::from(gear)).copied()
    }

    pub fn reverse(&self) -> TopSpeed {
        self.top_speed_per_gear[0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet(gear: u8, speed: f32, torque: f32, power: f32) -> ForzaPacket {
        ForzaPacket {
            is_race_on: 1,
            gear,
            speed,
            torque,
            power,
            ..Default::default()
        }
    }

    #[test]
    fn test_starts_empty() {
        let dyno = DynoStats::new();
        assert_eq!(dyno.top_speed, TopSpeed::default());
        assert_eq!(dyno.max_horsepower, 0);
        assert!(dyno.top_speed_per_gear.iter().all(|s| s.km_per_hour == 0));
    }

    #[test]
    fn test_tracks_maxima_per_gear() {
        let mut dyno = DynoStats::new();
        dyno.update(&packet(1, 10.0, 0.0, 0.0));
        dyno.update(&packet(1, 15.0, 0.0, 0.0));
        dyno.update(&packet(1, 12.0, 0.0, 0.0));
        dyno.update(&packet(2, 25.0, 0.0, 0.0));
        dyno.update(&packet(2, 20.0, 0.0, 0.0));

        assert_eq!(
            dyno.gear(1),
            Some(TopSpeed {
                km_per_hour: 54,
                miles_per_hour: 33
            })
        );
        assert_eq!(dyno.gear(2).unwrap().km_per_hour, 90);
        assert_eq!(dyno.gear(3), Some(TopSpeed::default()));
        assert_eq!(dyno.top_speed.km_per_hour, 90);
        assert_eq!(dyno.top_speed.miles_per_hour, 55);
    }

    #[test]
    fn test_reverse_uses_slot_zero() {
        let mut dyno = DynoStats::new();
        dyno.update(&packet(0, 8.0, 0.0, 0.0));

        assert_eq!(dyno.reverse().km_per_hour, 28);
        assert_eq!(dyno.gear(1), Some(TopSpeed::default()));
        assert_eq!(dyno.top_speed.km_per_hour, 28);
    }

    #[test]
    fn test_gear_above_ten_is_ignored_per_gear() {
        let mut dyno = DynoStats::new();
        dyno.update(&packet(11, 50.0, 0.0, 0.0));
        dyno.update(&packet(255, 60.0, 0.0, 0.0));

        assert!(dyno.top_speed_per_gear.iter().all(|s| *s == TopSpeed::default()));
        assert_eq!(dyno.gear(11), None);
        // still counts towards the overall top speed
        assert_eq!(dyno.top_speed.km_per_hour, 216);
    }

    #[test]
    fn test_torque_and_power_peaks_keep_paired_units() {
        let mut dyno = DynoStats::new();
        dyno.update(&packet(3, 30.0, 400.0, 150_000.0));
        dyno.update(&packet(3, 30.0, 1000.0, 100_000.0));
        dyno.update(&packet(3, 30.0, 500.0, 120_000.0));

        assert_eq!(dyno.max_newton_meters, 1000.0);
        assert_eq!(dyno.max_foot_pounds, 737);
        assert_eq!(dyno.max_horsepower, 201);
        assert_eq!(dyno.max_kilowatts, 150);
    }

    #[test]
    fn test_equal_reading_does_not_replace_peak() {
        let mut dyno = DynoStats::new();
        dyno.update(&packet(2, 20.0, 0.0, 0.0));
        // marker that only survives if the tie is ignored
        dyno.top_speed_per_gear[2].miles_per_hour = 1;
        dyno.update(&packet(2, 20.0, 0.0, 0.0));
        assert_eq!(dyno.gear(2).unwrap().miles_per_hour, 1);
    }

    #[test]
    fn test_negative_readings_leave_peaks_at_zero() {
        let mut dyno = DynoStats::new();
        dyno.update(&packet(1, -5.0, -100.0, -2000.0));
        assert_eq!(dyno, DynoStats::default());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut dyno = DynoStats::new();
        dyno.update(&packet(4, 60.0, 600.0, 300_000.0));
        dyno.update(&packet(0, 5.0, 100.0, 10_000.0));
        assert_ne!(dyno, DynoStats::default());

        dyno.reset();
        assert_eq!(dyno, DynoStats::default());

        dyno.update(&packet(1, 10.0, 50.0, 5_000.0));
        assert_eq!(dyno.top_speed.km_per_hour, 36);
        assert_eq!(dyno.gear(4), Some(TopSpeed::default()));
    }
}
