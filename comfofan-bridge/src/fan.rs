//! Ventilation fan entity
//!
//! Presents a ventilation unit as a fan with a percentage and a preset mode.
//! Commands are validated here and forwarded to the bridge; state arrives
//! from two directions: the value of a successful command, and sensor
//! updates pushed by the bridge. Both attributes are independent and the
//! last write wins.

use comfofan_core::{
    mode_from_code, percentage_to_speed, speed_from_index, speed_to_percentage,
    validate_percentage, ComfoFanError, FanState, Result, SensorUpdate, SupportedFeatures,
    VentilationMode, VentilationSpeed, SENSOR_FAN_SPEED_MODE, SENSOR_OPERATING_MODE,
};
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, info, trace, warn};

use crate::bridge::VentilationBridge;

/// Percentage used by `turn_on` when nothing else is requested (lowest speed)
pub const DEFAULT_TURN_ON_PERCENTAGE: i32 = 1;

/// Fan entity backed by a ventilation bridge
///
/// Generic over the bridge type so tests can use a recording double;
/// defaults to a trait object for the daemon.
pub struct VentilationFan<B: VentilationBridge + ?Sized = dyn VentilationBridge> {
    bridge: Arc<B>,
    unique_id: String,
    name: String,
    state: RwLock<FanState>,
    updates: Mutex<Option<broadcast::Receiver<SensorUpdate>>>,
}

impl<B: VentilationBridge + ?Sized> VentilationFan<B> {
    /// Create the entity and subscribe to the bridge's updates
    pub fn new(bridge: Arc<B>, name: impl Into<String>) -> Self {
        let unique_id = bridge.uuid().to_string();
        let updates = bridge.subscribe();

        Self {
            bridge,
            unique_id,
            name: name.into(),
            state: RwLock::new(FanState::default()),
            updates: Mutex::new(Some(updates)),
        }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, FanState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, FanState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn unique_id(&self) -> &str {
        &self.unique_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of both observable attributes
    pub fn state(&self) -> FanState {
        *self.read_state()
    }

    pub fn percentage(&self) -> Option<u8> {
        self.read_state().percentage
    }

    pub fn preset_mode(&self) -> Option<VentilationMode> {
        self.read_state().preset_mode
    }

    pub fn is_on(&self) -> Option<bool> {
        self.read_state().is_on()
    }

    /// Number of active speed steps
    pub fn speed_count(&self) -> usize {
        VentilationSpeed::ACTIVE.len()
    }

    pub fn preset_modes(&self) -> &'static [VentilationMode] {
        &VentilationMode::ALL
    }

    pub fn supported_features(&self) -> SupportedFeatures {
        SupportedFeatures::SET_SPEED
            | SupportedFeatures::PRESET_MODE
            | SupportedFeatures::TURN_ON
            | SupportedFeatures::TURN_OFF
    }

    /// Set the fan intensity
    ///
    /// Fails with `OutOfRange` outside 0-100 without contacting the bridge.
    /// Otherwise sends exactly one speed command.
    pub async fn set_percentage(&self, percentage: i32) -> Result<()> {
        let percentage = validate_percentage(percentage)?;
        let speed = percentage_to_speed(percentage);

        debug!(
            "Fan {}: {}% -> speed {}",
            self.unique_id, percentage, speed
        );
        self.bridge.set_speed(speed).await?;

        self.write_state().percentage = Some(speed_to_percentage(speed));
        Ok(())
    }

    /// Turn the fan on
    ///
    /// A preset mode takes precedence over a percentage. Without either, the
    /// fan starts at the lowest speed.
    pub async fn turn_on(
        &self,
        percentage: Option<i32>,
        preset_mode: Option<VentilationMode>,
    ) -> Result<()> {
        if let Some(mode) = preset_mode {
            return self.apply_preset_mode(mode).await;
        }
        self.set_percentage(percentage.unwrap_or(DEFAULT_TURN_ON_PERCENTAGE))
            .await
    }

    /// Turn the fan off (away speed)
    pub async fn turn_off(&self) -> Result<()> {
        self.set_percentage(0).await
    }

    /// Set the preset mode by name
    ///
    /// Fails with `InvalidPresetMode` for unknown names without contacting
    /// the bridge.
    pub async fn set_preset_mode(&self, mode: &str) -> Result<()> {
        let mode: VentilationMode = mode.parse()?;
        self.apply_preset_mode(mode).await
    }

    /// Send an already validated preset mode to the bridge
    pub async fn apply_preset_mode(&self, mode: VentilationMode) -> Result<()> {
        debug!("Fan {}: preset mode {}", self.unique_id, mode);
        self.bridge.set_mode(mode).await?;

        self.write_state().preset_mode = Some(mode);
        Ok(())
    }

    /// Apply a speed index reported by the bridge
    pub fn handle_speed_update(&self, index: i64) {
        let speed = speed_from_index(index);
        let percentage = speed_to_percentage(speed);

        debug!(
            "Fan {}: bridge reports speed {} ({}%)",
            self.unique_id, speed, percentage
        );
        self.write_state().percentage = Some(percentage);
    }

    /// Apply an operating mode code reported by the bridge
    pub fn handle_mode_update(&self, code: i64) {
        match mode_from_code(code) {
            Some(mode) => {
                debug!("Fan {}: bridge reports mode {}", self.unique_id, mode);
                self.write_state().preset_mode = Some(mode);
            }
            None => warn!(
                "Fan {}: ignoring unknown operating mode code {}",
                self.unique_id, code
            ),
        }
    }

    /// Route a sensor update to the matching handler
    pub fn handle_sensor_update(&self, update: SensorUpdate) {
        match update.sensor_id {
            SENSOR_FAN_SPEED_MODE => self.handle_speed_update(update.value),
            SENSOR_OPERATING_MODE => self.handle_mode_update(update.value),
            other => trace!("Fan {}: ignoring sensor {}", self.unique_id, other),
        }
    }

    /// Apply every update already delivered, without waiting
    ///
    /// Returns the number of updates applied. Does nothing once
    /// [`run_updates`](Self::run_updates) owns the subscription.
    pub fn process_pending_updates(&self) -> usize {
        let mut guard = self.updates.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(receiver) = guard.as_mut() else {
            return 0;
        };

        let mut applied = 0;
        loop {
            match receiver.try_recv() {
                Ok(update) => {
                    self.handle_sensor_update(update);
                    applied += 1;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("Fan {}: skipped {} stale updates", self.unique_id, skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        applied
    }

    /// Apply bridge updates until the bridge closes the channel
    ///
    /// Takes ownership of the subscription; a second call fails.
    pub async fn run_updates(&self) -> Result<()> {
        let mut receiver = self
            .updates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or_else(|| ComfoFanError::Other("Update loop already running".to_string()))?;

        info!("Fan {}: listening for bridge updates", self.unique_id);

        loop {
            match receiver.recv().await {
                Ok(update) => self.handle_sensor_update(update),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Fan {}: skipped {} stale updates", self.unique_id, skipped);
                }
                Err(RecvError::Closed) => {
                    warn!("Fan {}: bridge closed the update channel", self.unique_id);
                    return Err(ComfoFanError::BridgeDisconnected);
                }
            }
        }
    }
}
