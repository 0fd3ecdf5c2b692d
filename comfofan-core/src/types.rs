//! Core types for ventilation control

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ComfoFanError;

/// Discrete ventilation speed levels reported and accepted by the bridge
///
/// Ordered from lowest to highest. `Away` is the "off" level: the unit keeps
/// a minimal airflow but the fan entity reports itself as off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VentilationSpeed {
    Away,
    Low,
    Medium,
    High,
}

impl VentilationSpeed {
    /// Number of speed levels, including `Away`
    pub const COUNT: usize = 4;

    /// Active (non-off) speeds in ascending order
    pub const ACTIVE: [VentilationSpeed; 3] = [
        VentilationSpeed::Low,
        VentilationSpeed::Medium,
        VentilationSpeed::High,
    ];

    /// Position of this speed in the bridge's speed index (0 = away)
    pub fn index(self) -> u8 {
        match self {
            VentilationSpeed::Away => 0,
            VentilationSpeed::Low => 1,
            VentilationSpeed::Medium => 2,
            VentilationSpeed::High => 3,
        }
    }

    /// Look up a speed by bridge index
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(VentilationSpeed::Away),
            1 => Some(VentilationSpeed::Low),
            2 => Some(VentilationSpeed::Medium),
            3 => Some(VentilationSpeed::High),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VentilationSpeed::Away => "away",
            VentilationSpeed::Low => "low",
            VentilationSpeed::Medium => "medium",
            VentilationSpeed::High => "high",
        }
    }
}

impl fmt::Display for VentilationSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VentilationSpeed {
    type Err = ComfoFanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "away" => Ok(VentilationSpeed::Away),
            "low" => Ok(VentilationSpeed::Low),
            "medium" => Ok(VentilationSpeed::Medium),
            "high" => Ok(VentilationSpeed::High),
            _ => Err(ComfoFanError::InvalidSpeed(s.to_string())),
        }
    }
}

/// Ventilation operating mode, exposed as the fan's preset mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VentilationMode {
    /// The unit follows its own schedule and sensors
    Auto,
    /// The unit holds the speed that was last requested
    Manual,
}

impl VentilationMode {
    /// All preset modes, in the order they are advertised
    pub const ALL: [VentilationMode; 2] = [VentilationMode::Auto, VentilationMode::Manual];

    pub fn as_str(self) -> &'static str {
        match self {
            VentilationMode::Auto => "auto",
            VentilationMode::Manual => "manual",
        }
    }
}

impl fmt::Display for VentilationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VentilationMode {
    type Err = ComfoFanError;

    /// Strict parse: only the exact lowercase mode names are accepted.
    ///
    /// ```
    /// use comfofan_core::VentilationMode;
    ///
    /// assert_eq!("auto".parse::<VentilationMode>().unwrap(), VentilationMode::Auto);
    /// assert!("InvalidPresetMode".parse::<VentilationMode>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(VentilationMode::Auto),
            "manual" => Ok(VentilationMode::Manual),
            _ => Err(ComfoFanError::InvalidPresetMode(s.to_string())),
        }
    }
}

impl TryFrom<&str> for VentilationMode {
    type Error = ComfoFanError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Feature flags advertised by the fan entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupportedFeatures(u32);

impl SupportedFeatures {
    pub const SET_SPEED: Self = Self(1);
    pub const PRESET_MODE: Self = Self(8);
    pub const TURN_OFF: Self = Self(16);
    pub const TURN_ON: Self = Self(32);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn bits(self) -> u32 {
        self.0
    }
}

impl std::ops::BitOr for SupportedFeatures {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

/// Observable state of the fan entity
///
/// Both attributes are unknown until the first command or bridge update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanState {
    /// Current fan intensity (0-100)
    pub percentage: Option<u8>,
    /// Current operating mode
    pub preset_mode: Option<VentilationMode>,
}

impl FanState {
    /// The fan counts as on whenever it runs above the away level
    pub fn is_on(&self) -> Option<bool> {
        self.percentage.map(|p| p > 0)
    }
}
