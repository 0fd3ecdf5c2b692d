//! Sensor updates pushed by the bridge
//!
//! The bridge reports state changes as `(sensor id, integer value)` pairs.
//! Only the two sensors backing the fan entity are decoded here.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::{VentilationMode, VentilationSpeed};

/// Current fan speed as an index (0 = away, 3 = high)
pub const SENSOR_FAN_SPEED_MODE: u16 = 65;

/// Current operating mode (-1 = auto, otherwise manual)
pub const SENSOR_OPERATING_MODE: u16 = 56;

/// Mode code reported while the unit runs in auto mode
pub const MODE_CODE_AUTO: i64 = -1;

/// Mode code reported while the unit holds a manual setting
pub const MODE_CODE_MANUAL: i64 = 0;

/// A single update pushed by the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorUpdate {
    pub sensor_id: u16,
    pub value: i64,
}

impl SensorUpdate {
    pub fn new(sensor_id: u16, value: i64) -> Self {
        Self { sensor_id, value }
    }

    /// Speed update for the given speed
    pub fn fan_speed(speed: VentilationSpeed) -> Self {
        Self::new(SENSOR_FAN_SPEED_MODE, speed.index() as i64)
    }

    /// Operating mode update for the given mode
    pub fn operating_mode(mode: VentilationMode) -> Self {
        Self::new(SENSOR_OPERATING_MODE, mode_to_code(mode))
    }
}

/// Decode a speed index, clamping anything the bridge should not send
pub fn speed_from_index(index: i64) -> VentilationSpeed {
    let max = VentilationSpeed::COUNT as i64 - 1;
    let clamped = index.clamp(0, max);
    if clamped != index {
        warn!(
            "Bridge reported speed index {} outside 0-{}, clamping to {}",
            index, max, clamped
        );
    }
    VentilationSpeed::from_index(clamped as u8).unwrap_or(VentilationSpeed::Away)
}

/// Decode an operating mode code
///
/// Returns `None` for negative codes other than the auto marker.
pub fn mode_from_code(code: i64) -> Option<VentilationMode> {
    match code {
        MODE_CODE_AUTO => Some(VentilationMode::Auto),
        c if c >= 0 => Some(VentilationMode::Manual),
        _ => None,
    }
}

/// Encode an operating mode the way the bridge reports it
pub fn mode_to_code(mode: VentilationMode) -> i64 {
    match mode {
        VentilationMode::Auto => MODE_CODE_AUTO,
        VentilationMode::Manual => MODE_CODE_MANUAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_from_index() {
        assert_eq!(speed_from_index(0), VentilationSpeed::Away);
        assert_eq!(speed_from_index(1), VentilationSpeed::Low);
        assert_eq!(speed_from_index(2), VentilationSpeed::Medium);
        assert_eq!(speed_from_index(3), VentilationSpeed::High);
    }

    #[test]
    fn test_speed_from_index_clamps() {
        assert_eq!(speed_from_index(-5), VentilationSpeed::Away);
        assert_eq!(speed_from_index(4), VentilationSpeed::High);
        assert_eq!(speed_from_index(i64::MAX), VentilationSpeed::High);
    }

    #[test]
    fn test_mode_from_code() {
        assert_eq!(mode_from_code(-1), Some(VentilationMode::Auto));
        assert_eq!(mode_from_code(0), Some(VentilationMode::Manual));
        assert_eq!(mode_from_code(1), Some(VentilationMode::Manual));
        assert_eq!(mode_from_code(-2), None);
    }

    #[test]
    fn test_mode_code_roundtrip() {
        for mode in VentilationMode::ALL {
            assert_eq!(mode_from_code(mode_to_code(mode)), Some(mode));
        }
    }

    #[test]
    fn test_update_constructors() {
        let update = SensorUpdate::fan_speed(VentilationSpeed::Medium);
        assert_eq!(update, SensorUpdate::new(SENSOR_FAN_SPEED_MODE, 2));

        let update = SensorUpdate::operating_mode(VentilationMode::Auto);
        assert_eq!(update, SensorUpdate::new(SENSOR_OPERATING_MODE, -1));
    }
}
