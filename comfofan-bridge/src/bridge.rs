//! Bridge capability abstraction
//!
//! The bridge is the gateway that physically drives the ventilation unit.
//! Everything the fan entity needs from it is captured by
//! [`VentilationBridge`], so the entity can run against real hardware, the
//! [`SimulatedBridge`](crate::SimulatedBridge), or a test double.

use async_trait::async_trait;
use comfofan_core::{Result, SensorUpdate, VentilationMode, VentilationSpeed};
use tokio::sync::broadcast;

/// Capacity of the sensor update channel
///
/// Receivers that fall further behind than this skip the oldest updates.
pub const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Commands and push updates offered by a ventilation bridge
#[async_trait]
pub trait VentilationBridge: Send + Sync {
    /// Stable bridge identifier
    fn uuid(&self) -> &str;

    /// Request a discrete ventilation speed
    async fn set_speed(&self, speed: VentilationSpeed) -> Result<()>;

    /// Request an operating mode
    async fn set_mode(&self, mode: VentilationMode) -> Result<()>;

    /// Register for sensor updates pushed by the bridge
    ///
    /// Updates are delivered in bridge order. The channel closes when the
    /// bridge goes away.
    fn subscribe(&self) -> broadcast::Receiver<SensorUpdate>;
}
