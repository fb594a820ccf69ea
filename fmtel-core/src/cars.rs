//! Car reference table
//!
//! The table is loaded once at startup from a JSON array and is read-only
//! afterwards. Lookups that miss resolve to [`CarReference::unknown`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Static information about one car model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarReference {
    pub car_ordinal: i32,
    pub group: String,
    pub maker: String,
    pub model: String,
    pub year: i32,
    pub weight: i32,
}

impl CarReference {
    /// Sentinel used when an ordinal has no entry in the table
    pub fn unknown() -> Self {
        Self {
            car_ordinal: 0,
            group: "Unknown".to_string(),
            maker: "Unknown".to_string(),
            model: "Unknown".to_string(),
            year: 9999,
            weight: 9999,
        }
    }

    pub fn is_unknown(&self) -> bool {
        *self == Self::unknown()
    }
}

impl Default for CarReference {
    fn default() -> Self {
        Self::unknown()
    }
}

/// Lookup of car references by ordinal
pub trait CarLookup: Send + Sync {
    fn lookup(&self, ordinal: i32) -> Option<&CarReference>;

    /// Lookup that falls back to the unknown-car sentinel
    fn lookup_or_unknown(&self, ordinal: i32) -> CarReference {
        self.lookup(ordinal)
            .cloned()
            .unwrap_or_else(CarReference::unknown)
    }
}

/// In-memory car table indexed by ordinal
#[derive(Debug, Clone, Default)]
pub struct CarList {
    cars: HashMap<i32, CarReference>,
}

impl CarList {
    pub fn new(cars: impl IntoIterator<Item = CarReference>) -> Self {
        Self {
            cars: cars.into_iter().map(|c| (c.car_ordinal, c)).collect(),
        }
    }

    /// Parse a JSON array of car objects
    pub fn from_json(json: &str) -> Result<Self> {
        let cars: Vec<CarReference> =
            serde_json::from_str(json).context("Failed to parse car list JSON")?;
        Ok(Self::new(cars))
    }

    /// Load a car list file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read car list {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid car list {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }
}

impl CarLookup for CarList {
    fn lookup(&self, ordinal: i32) -> Option<&CarReference> {
        self.cars.get(&ordinal)
    }
}
