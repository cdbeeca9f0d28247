//! Lamp role run-loop.

use crate::relay::{RelayBackend, RelayError};
use booth_bus::Bus;
use booth_common::message::{BoothState, Message};
use booth_common::role::Role;
use booth_core::worker::{RoleWorker, StateLatch, WorkerError};
use std::thread;
use std::time::Duration;
use tracing::warn;

/// Half-period of the startup blink.
const BLINK_INTERVAL: Duration = Duration::from_millis(150);

/// Blinks emitted when the appliance comes up.
const STARTUP_BLINKS: u32 = 2;

/// Switches a [`RelayBackend`] from state broadcasts.
pub struct LampWorker {
    relay: Box<dyn RelayBackend>,
    latch: StateLatch,
}

impl LampWorker {
    pub fn new(relay: Box<dyn RelayBackend>) -> Self {
        Self {
            relay,
            latch: StateLatch::new(),
        }
    }

    fn blink(&mut self) -> Result<(), RelayError> {
        for _ in 0..STARTUP_BLINKS {
            self.relay.turn_on()?;
            thread::sleep(BLINK_INTERVAL);
            self.relay.turn_off()?;
            thread::sleep(BLINK_INTERVAL);
        }
        Ok(())
    }

    fn apply(&mut self, state: &BoothState) -> Result<(), RelayError> {
        match state {
            BoothState::Startup => self.blink(),
            // The lamp burns for the whole shooting stretch.
            BoothState::Countdown { .. } => self.relay.turn_on(),
            BoothState::Capture { .. } => Ok(()),
            BoothState::Assemble => self.relay.turn_off(),
            BoothState::Idle => self.relay.turn_off(),
            BoothState::Teardown { .. } => self.relay.turn_off(),
            BoothState::Greeter | BoothState::Review { .. } => Ok(()),
        }
    }
}

impl RoleWorker for LampWorker {
    fn role(&self) -> Role {
        Role::Lamp
    }

    fn run(&mut self, bus: &Bus) -> Result<(), WorkerError> {
        self.latch.reset();

        for message in bus.drain(Role::Lamp) {
            let Message::State(state) = message else {
                continue;
            };
            if !self.latch.admit(&state) {
                continue;
            }
            // A dark bulb must never end a sitting.
            if let Err(e) = self.apply(&state) {
                warn!(%state, error = %e, "relay switch failed, lighting degraded");
            }
        }
        if let Err(e) = self.relay.turn_off() {
            warn!(error = %e, "relay off failed during teardown");
        }
        self.relay.shutdown();
        Ok(())
    }
}
