//! Drivetrain and car class labels
//!
//! Both classifications treat code 0 (after the class offset) as untrusted
//! outside an active race: the game zero-fills these fields in menus, so a
//! zero only means FWD / class D while a race is running.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label shown when a code cannot be classified
pub const UNKNOWN_LABEL: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Drivetrain {
    #[serde(rename = "FWD")]
    Fwd,
    #[serde(rename = "RWD")]
    Rwd,
    #[serde(rename = "AWD")]
    Awd,
    #[serde(rename = "-")]
    Unknown,
}

impl Drivetrain {
    pub fn classify(code: i32, race_on: bool) -> Self {
        match code {
            0 if race_on => Drivetrain::Fwd,
            1 => Drivetrain::Rwd,
            2 => Drivetrain::Awd,
            _ => Drivetrain::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Drivetrain::Fwd => "FWD",
            Drivetrain::Rwd => "RWD",
            Drivetrain::Awd => "AWD",
            Drivetrain::Unknown => UNKNOWN_LABEL,
        }
    }
}

impl fmt::Display for Drivetrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Performance class, D (slowest) through X (fastest)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarClass {
    D,
    C,
    B,
    A,
    S,
    R,
    P,
    X,
    #[serde(rename = "-")]
    Unknown,
}

impl CarClass {
    /// Classify a 1-based class code (1 = D, 8 = X)
    pub fn classify(code: i32, race_on: bool) -> Self {
        match code.wrapping_sub(1) {
            0 if race_on => CarClass::D,
            1 => CarClass::C,
            2 => CarClass::B,
            3 => CarClass::A,
            4 => CarClass::S,
            5 => CarClass::R,
            6 => CarClass::P,
            7 => CarClass::X,
            _ => CarClass::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CarClass::D => "D",
            CarClass::C => "C",
            CarClass::B => "B",
            CarClass::A => "A",
            CarClass::S => "S",
            CarClass::R => "R",
            CarClass::P => "P",
            CarClass::X => "X",
            CarClass::Unknown => UNKNOWN_LABEL,
        }
    }
}

impl fmt::Display for CarClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
