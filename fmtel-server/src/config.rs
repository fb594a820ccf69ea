//! Command line settings

use clap::Parser;
use fmtel_adapters::DEFAULT_UDP_ADDR;
use fmtel_core::{CarList, Game, Temperature};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:9999";
pub const DEFAULT_CARS_FILE: &str = "cars.json";

#[derive(Parser, Debug, Clone)]
#[command(name = "fmtel")]
#[command(version, about = "Live Forza telemetry dashboard with JSON and SSE endpoints", long_about = None)]
pub struct Settings {
    /// Address to receive "Data Out" packets on
    #[arg(long, default_value = DEFAULT_UDP_ADDR)]
    pub udp_addr: String,

    /// Address of the HTTP server
    #[arg(long, default_value = DEFAULT_HTTP_ADDR)]
    pub http_addr: SocketAddr,

    /// Serve the latest packet as JSON
    #[arg(long)]
    pub json: bool,

    /// Serve a server-sent-event stream of packets
    #[arg(long)]
    pub sse: bool,

    /// Game sending the telemetry (fm, fm8 or fh5)
    #[arg(long, default_value_t = Game::Motorsport)]
    pub game: Game,

    /// Tire temperature unit (celsius or fahrenheit)
    #[arg(long, default_value_t = Temperature::Celsius)]
    pub temp: Temperature,

    /// Maximum dashboard redraws per second
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub refresh_rate: u32,

    /// Car list file [default: ./cars.json, then <config dir>/fmtel/cars.json]
    #[arg(long)]
    pub cars: Option<PathBuf>,

    /// Generate synthetic packets instead of listening on UDP
    #[arg(long)]
    pub demo: bool,

    /// Run without the terminal dashboard
    #[arg(long)]
    pub headless: bool,
}

impl Settings {
    pub fn http_enabled(&self) -> bool {
        self.json || self.sse
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(1) / self.refresh_rate.max(1)
    }

    /// Car list location: explicit flag, then the working directory, then
    /// the user config directory
    pub fn cars_path(&self) -> PathBuf {
        if let Some(path) = &self.cars {
            return path.clone();
        }

        let local = PathBuf::from(DEFAULT_CARS_FILE);
        if local.exists() {
            return local;
        }

        dirs::config_dir()
            .map(|dir| dir.join("fmtel").join(DEFAULT_CARS_FILE))
            .unwrap_or(local)
    }
}

/// Load the car list, continuing with an empty table when it is unusable
pub fn load_cars(path: &Path) -> CarList {
    match CarList::load(path) {
        Ok(cars) => {
            info!("Loaded {} cars from {}", cars.len(), path.display());
            cars
        }
        Err(e) => {
            warn!("Car list unavailable, every car will show as unknown: {:#}", e);
            CarList::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::parse_from(["fmtel"]);
        assert_eq!(settings.udp_addr, "0.0.0.0:7777");
        assert_eq!(settings.http_addr, "0.0.0.0:9999".parse().unwrap());
        assert_eq!(settings.temp, Temperature::Celsius);
        assert_eq!(settings.game, Game::Motorsport);
        assert_eq!(settings.refresh_rate, 30);
        assert!(!settings.http_enabled());
        assert!(!settings.demo);
        assert!(!settings.headless);
    }

    #[test]
    fn test_flags() {
        let settings = Settings::parse_from([
            "fmtel",
            "--udp-addr",
            "127.0.0.1:5300",
            "--sse",
            "--temp",
            "fahrenheit",
            "--refresh-rate",
            "10",
            "--cars",
            "/tmp/cars.json",
        ]);
        assert_eq!(settings.udp_addr, "127.0.0.1:5300");
        assert!(settings.http_enabled());
        assert_eq!(settings.temp, Temperature::Fahrenheit);
        assert_eq!(settings.refresh_interval(), Duration::from_millis(100));
        assert_eq!(settings.cars_path(), PathBuf::from("/tmp/cars.json"));
    }

    #[test]
    fn test_unrecognized_temperature_falls_back_to_celsius() {
        let settings = Settings::parse_from(["fmtel", "--temp", "kelvin"]);
        assert_eq!(settings.temp, Temperature::Celsius);
    }

    #[test]
    fn test_game_selects_layout() {
        let settings = Settings::parse_from(["fmtel", "--game", "FH5"]);
        assert_eq!(settings.game, Game::Horizon5);
        assert_eq!(settings.game.packet_size(), 324);
    }

    #[test]
    fn test_unknown_game_is_rejected() {
        assert!(Settings::try_parse_from(["fmtel", "--game", "gt7"]).is_err());
    }

    #[test]
    fn test_refresh_rate_must_be_positive() {
        assert!(Settings::try_parse_from(["fmtel", "--refresh-rate", "0"]).is_err());
    }

    #[test]
    fn test_load_cars_missing_file_yields_empty_list() {
        let cars = load_cars(Path::new("/definitely/not/here/cars.json"));
        assert!(cars.is_empty());
    }
}
