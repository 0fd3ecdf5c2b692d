//! comfofan-bridge
//!
//! The bridge capability seam and the fan entity built on top of it.
//
//! Public API:
//! - `bridge::VentilationBridge` — commands and push updates offered by a bridge
//! - `simulated::SimulatedBridge` — in-process bridge for development and tests
//! - `fan::VentilationFan` — the fan entity (percentage + preset mode)

pub mod bridge;
pub mod fan;
pub mod simulated;

pub use bridge::{VentilationBridge, UPDATE_CHANNEL_CAPACITY};
pub use fan::{VentilationFan, DEFAULT_TURN_ON_PERCENTAGE};
pub use simulated::{BridgeCommand, SimulatedBridge};
