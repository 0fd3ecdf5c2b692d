//! Percentage <-> discrete speed mapping
//!
//! The fan entity speaks percentages (0-100) while the bridge only knows a
//! handful of discrete speeds. A list of `n` active speeds splits the range
//! into `n` equal steps: step `k` is represented by `round(k * 100 / n)`, and
//! any percentage maps to the nearest step, rounding ties up. A non-zero
//! percentage never selects "off", so 1% is always the lowest active speed.
//!
//! With three active speeds the canonical percentages are 33, 67 and 100.

use crate::error::{ComfoFanError, Result};
use crate::types::VentilationSpeed;

/// Highest accepted percentage
pub const MAX_PERCENTAGE: u8 = 100;

/// Check that a requested percentage lies within 0-100
pub fn validate_percentage(value: i32) -> Result<u8> {
    if !(0..=MAX_PERCENTAGE as i32).contains(&value) {
        return Err(ComfoFanError::OutOfRange { value });
    }
    Ok(value as u8)
}

/// Integer division rounding to nearest, ties up
#[inline]
fn div_round(numerator: u32, denominator: u32) -> u32 {
    (2 * numerator + denominator) / (2 * denominator)
}

/// Pick the item of an ordered list closest to a percentage
///
/// Returns `None` only for an empty list. Percentages above 100 select the
/// last item; 0 selects the first (callers handle "off" themselves).
pub fn percentage_to_ordered_list_item<T: Copy>(list: &[T], percentage: u8) -> Option<T> {
    if list.is_empty() {
        return None;
    }

    let len = list.len() as u32;
    let step = div_round(percentage as u32 * len, MAX_PERCENTAGE as u32).clamp(1, len);
    Some(list[(step - 1) as usize])
}

/// Canonical percentage of an item in an ordered list
///
/// Returns `None` if the item is not part of the list.
pub fn ordered_list_item_to_percentage<T: PartialEq>(list: &[T], item: &T) -> Option<u8> {
    let position = list.iter().position(|candidate| candidate == item)? as u32 + 1;
    Some(div_round(position * MAX_PERCENTAGE as u32, list.len() as u32) as u8)
}

/// Map a validated percentage to the ventilation speed to request
///
/// ```
/// use comfofan_core::{percentage_to_speed, VentilationSpeed};
///
/// assert_eq!(percentage_to_speed(0), VentilationSpeed::Away);
/// assert_eq!(percentage_to_speed(1), VentilationSpeed::Low);
/// assert_eq!(percentage_to_speed(50), VentilationSpeed::Medium);
/// assert_eq!(percentage_to_speed(100), VentilationSpeed::High);
/// ```
pub fn percentage_to_speed(percentage: u8) -> VentilationSpeed {
    if percentage == 0 {
        return VentilationSpeed::Away;
    }
    percentage_to_ordered_list_item(&VentilationSpeed::ACTIVE, percentage)
        .unwrap_or(VentilationSpeed::High)
}

/// Canonical percentage reported for a ventilation speed
///
/// ```
/// use comfofan_core::{speed_to_percentage, VentilationSpeed};
///
/// assert_eq!(speed_to_percentage(VentilationSpeed::Medium), 67);
/// ```
pub fn speed_to_percentage(speed: VentilationSpeed) -> u8 {
    if speed == VentilationSpeed::Away {
        return 0;
    }
    ordered_list_item_to_percentage(&VentilationSpeed::ACTIVE, &speed).unwrap_or(0)
}
