//! Input role run-loop.

use crate::buttons::InputBackend;
use booth_bus::Bus;
use booth_common::message::{BoothEvent, Message};
use booth_common::role::Role;
use booth_core::worker::{RoleWorker, WorkerError};
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Debounce-friendly poll cadence.
const POLL_TICK: Duration = Duration::from_millis(20);

/// Polls an [`InputBackend`] and reports presses.
pub struct InputWorker {
    backend: Box<dyn InputBackend>,
}

impl InputWorker {
    pub fn new(backend: Box<dyn InputBackend>) -> Self {
        Self { backend }
    }
}

impl RoleWorker for InputWorker {
    fn role(&self) -> Role {
        Role::Input
    }

    fn run(&mut self, bus: &Bus) -> Result<(), WorkerError> {
        loop {
            match bus.receive(Role::Input, false) {
                Some(Message::Stop) => break,
                // State broadcasts carry nothing a stateless poller needs.
                Some(_) => continue,
                None => {}
            }

            match self
                .backend
                .poll()
                .map_err(|e| WorkerError::Backend(e.to_string()))?
            {
                Some(button) => {
                    debug!(?button, "button pressed");
                    bus.send(
                        Role::Orchestrator,
                        Message::Event(BoothEvent::input(button)),
                    );
                }
                None => thread::sleep(POLL_TICK),
            }
        }
        self.backend.shutdown();
        Ok(())
    }
}
