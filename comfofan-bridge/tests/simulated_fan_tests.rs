//! End-to-end tests of the fan entity against bridge implementations

use async_trait::async_trait;
use comfofan_bridge::{BridgeCommand, SimulatedBridge, VentilationBridge, VentilationFan};
use comfofan_core::{
    ComfoFanError, FanState, Result, SensorUpdate, VentilationMode, VentilationSpeed,
    SENSOR_FAN_SPEED_MODE,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;

fn simulated_fan() -> (Arc<SimulatedBridge>, VentilationFan<SimulatedBridge>) {
    let bridge = Arc::new(SimulatedBridge::new("0123456789abcdef"));
    let fan = VentilationFan::new(bridge.clone(), "ComfoAir Q350");
    (bridge, fan)
}

#[tokio::test]
async fn test_unique_id_follows_bridge() {
    let (_bridge, fan) = simulated_fan();
    assert_eq!(fan.unique_id(), "0123456789abcdef");
}

#[tokio::test]
async fn test_initial_state_is_published() {
    let bridge = Arc::new(SimulatedBridge::with_initial_state(
        "sim",
        VentilationSpeed::Medium,
        VentilationMode::Manual,
    ));
    let fan = VentilationFan::new(bridge.clone(), "ComfoAir");
    assert_eq!(fan.state(), FanState::default());

    bridge.publish_state();
    fan.process_pending_updates();

    assert_eq!(fan.percentage(), Some(67));
    assert_eq!(fan.preset_mode(), Some(VentilationMode::Manual));
}

#[tokio::test]
async fn test_commands_round_trip_through_bridge() {
    let (bridge, fan) = simulated_fan();

    fan.set_percentage(90).await.unwrap();
    fan.set_preset_mode("manual").await.unwrap();
    fan.turn_off().await.unwrap();

    assert_eq!(
        bridge.commands(),
        vec![
            BridgeCommand::SetSpeed(VentilationSpeed::High),
            BridgeCommand::SetMode(VentilationMode::Manual),
            BridgeCommand::SetSpeed(VentilationSpeed::Away),
        ]
    );

    // Confirmations agree with the commanded state
    assert_eq!(fan.process_pending_updates(), 3);
    assert_eq!(fan.percentage(), Some(0));
    assert_eq!(fan.preset_mode(), Some(VentilationMode::Manual));
    assert_eq!(bridge.speed(), VentilationSpeed::Away);
}

#[tokio::test]
async fn test_push_update_overrides_command() {
    let (bridge, fan) = simulated_fan();

    fan.set_percentage(100).await.unwrap();
    // The unit drops back to medium on its own (e.g. a wall switch)
    bridge.push(SensorUpdate::new(SENSOR_FAN_SPEED_MODE, 2));
    fan.process_pending_updates();

    assert_eq!(fan.percentage(), Some(67));
}

#[tokio::test]
async fn test_rejected_command_reaches_caller() {
    let (bridge, fan) = simulated_fan();
    bridge.fail_next("unit unreachable");

    let result = fan.turn_on(None, None).await;

    assert!(matches!(result, Err(ComfoFanError::Bridge(_))));
    assert!(bridge.commands().is_empty());
    assert_eq!(fan.percentage(), None);
}

#[tokio::test]
async fn test_update_loop_applies_updates() {
    let bridge = Arc::new(SimulatedBridge::new("sim"));
    let fan = Arc::new(VentilationFan::new(bridge.clone(), "ComfoAir"));

    let runner = fan.clone();
    let handle = tokio::spawn(async move { runner.run_updates().await });

    bridge.push(SensorUpdate::operating_mode(VentilationMode::Auto));
    bridge.push(SensorUpdate::fan_speed(VentilationSpeed::High));

    for _ in 0..100 {
        if fan.percentage() == Some(100) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    assert_eq!(fan.percentage(), Some(100));
    assert_eq!(fan.preset_mode(), Some(VentilationMode::Auto));
    handle.abort();
}

/// Bridge whose update channel can be closed, like a dropped connection
struct ClosableBridge {
    updates: Mutex<Option<broadcast::Sender<SensorUpdate>>>,
}

impl ClosableBridge {
    fn new() -> Self {
        let (updates, _) = broadcast::channel(4);
        Self {
            updates: Mutex::new(Some(updates)),
        }
    }

    fn close(&self) {
        self.updates.lock().unwrap().take();
    }
}

#[async_trait]
impl VentilationBridge for ClosableBridge {
    fn uuid(&self) -> &str {
        "closable"
    }

    async fn set_speed(&self, _speed: VentilationSpeed) -> Result<()> {
        Ok(())
    }

    async fn set_mode(&self, _mode: VentilationMode) -> Result<()> {
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SensorUpdate> {
        match self.updates.lock().unwrap().as_ref() {
            Some(sender) => sender.subscribe(),
            None => broadcast::channel(1).1,
        }
    }
}

#[tokio::test]
async fn test_update_loop_ends_when_bridge_disconnects() {
    let bridge = Arc::new(ClosableBridge::new());
    let fan = VentilationFan::new(bridge.clone(), "ComfoAir");

    bridge.close();
    let result = tokio::time::timeout(Duration::from_secs(1), fan.run_updates())
        .await
        .expect("update loop should stop");

    assert!(matches!(result, Err(ComfoFanError::BridgeDisconnected)));
}

#[tokio::test]
async fn test_fan_as_trait_object() {
    let bridge: Arc<dyn VentilationBridge> = Arc::new(SimulatedBridge::new("dyn"));
    let fan: VentilationFan = VentilationFan::new(bridge, "ComfoAir");

    fan.turn_on(Some(34), None).await.unwrap();
    assert_eq!(fan.percentage(), Some(33));
}
