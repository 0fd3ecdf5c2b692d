//! In-process simulated bridge
//!
//! Behaves like a bridge that accepts every command and confirms it with a
//! sensor update, the way a real unit reports its new state after a change.
//! Used by the daemon when no hardware is attached, and by tests.

use async_trait::async_trait;
use comfofan_core::{ComfoFanError, Result, SensorUpdate, VentilationMode, VentilationSpeed};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::bridge::{VentilationBridge, UPDATE_CHANNEL_CAPACITY};

/// A command received by the simulated bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeCommand {
    SetSpeed(VentilationSpeed),
    SetMode(VentilationMode),
}

struct SimulatedState {
    speed: VentilationSpeed,
    mode: VentilationMode,
    commands: Vec<BridgeCommand>,
    fail_next: Option<String>,
}

/// Simulated ventilation bridge
pub struct SimulatedBridge {
    uuid: String,
    state: Mutex<SimulatedState>,
    updates: broadcast::Sender<SensorUpdate>,
}

impl SimulatedBridge {
    /// Create a bridge starting at low speed in auto mode
    pub fn new(uuid: impl Into<String>) -> Self {
        Self::with_initial_state(uuid, VentilationSpeed::Low, VentilationMode::Auto)
    }

    /// Create a bridge with an explicit starting speed and mode
    pub fn with_initial_state(
        uuid: impl Into<String>,
        speed: VentilationSpeed,
        mode: VentilationMode,
    ) -> Self {
        let uuid = uuid.into();
        info!(
            "Simulated bridge {} starting at speed={} mode={}",
            uuid, speed, mode
        );

        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            uuid,
            state: Mutex::new(SimulatedState {
                speed,
                mode,
                commands: Vec::new(),
                fail_next: None,
            }),
            updates,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SimulatedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current speed of the simulated unit
    pub fn speed(&self) -> VentilationSpeed {
        self.lock().speed
    }

    /// Current mode of the simulated unit
    pub fn mode(&self) -> VentilationMode {
        self.lock().mode
    }

    /// Commands accepted so far, oldest first
    pub fn commands(&self) -> Vec<BridgeCommand> {
        self.lock().commands.clone()
    }

    /// Make the next command fail with a bridge error
    pub fn fail_next(&self, reason: impl Into<String>) {
        self.lock().fail_next = Some(reason.into());
    }

    /// Push an arbitrary update to all subscribers
    ///
    /// Returns the number of subscribers that received it.
    pub fn push(&self, update: SensorUpdate) -> usize {
        match self.updates.send(update) {
            Ok(receivers) => receivers,
            Err(_) => {
                debug!("No subscribers for update {:?}", update);
                0
            }
        }
    }

    /// Report the current speed and mode, as a bridge does on registration
    pub fn publish_state(&self) {
        let (speed, mode) = {
            let state = self.lock();
            (state.speed, state.mode)
        };
        self.push(SensorUpdate::fan_speed(speed));
        self.push(SensorUpdate::operating_mode(mode));
    }

    fn check_failure(&self) -> Result<()> {
        if let Some(reason) = self.lock().fail_next.take() {
            warn!("Simulated bridge {} rejecting command: {}", self.uuid, reason);
            return Err(ComfoFanError::Bridge(reason));
        }
        Ok(())
    }
}

#[async_trait]
impl VentilationBridge for SimulatedBridge {
    fn uuid(&self) -> &str {
        &self.uuid
    }

    async fn set_speed(&self, speed: VentilationSpeed) -> Result<()> {
        self.check_failure()?;
        debug!("Simulated bridge {}: set_speed({})", self.uuid, speed);
        {
            let mut state = self.lock();
            state.speed = speed;
            state.commands.push(BridgeCommand::SetSpeed(speed));
        }
        self.push(SensorUpdate::fan_speed(speed));
        Ok(())
    }

    async fn set_mode(&self, mode: VentilationMode) -> Result<()> {
        self.check_failure()?;
        debug!("Simulated bridge {}: set_mode({})", self.uuid, mode);
        {
            let mut state = self.lock();
            state.mode = mode;
            state.commands.push(BridgeCommand::SetMode(mode));
        }
        self.push(SensorUpdate::operating_mode(mode));
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SensorUpdate> {
        self.updates.subscribe()
    }
}
