//! Display role run-loop.
//!
//! Timed screens never block the mailbox: while the greeter or
//! countdown clock runs, incoming mail is polled and any state change
//! interrupts the timer, so a fault rewind repaints immediately and the
//! scheduled cue is dropped instead of firing into the wrong state.

use crate::render::{DisplayError, RenderBackend, Screen};
use booth_bus::Bus;
use booth_common::message::{BoothEvent, BoothState, ButtonId, CameraEvent, Message};
use booth_common::role::Role;
use booth_core::worker::{RoleWorker, StateLatch, WorkerError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Poll cadence while a timed screen is up.
const POLL_TICK: Duration = Duration::from_millis(10);

/// How long the timed screens stay up.
#[derive(Debug, Clone, Copy)]
pub struct DisplayTiming {
    pub greeter: Duration,
    pub countdown: Duration,
}

impl DisplayTiming {
    pub fn from_secs(greeter_s: f64, countdown_s: f64) -> Self {
        Self {
            greeter: Duration::from_secs_f64(greeter_s),
            countdown: Duration::from_secs_f64(countdown_s),
        }
    }
}

/// Drives a [`RenderBackend`] from state broadcasts.
pub struct DisplayWorker {
    backend: Box<dyn RenderBackend>,
    timing: DisplayTiming,
    latch: StateLatch,
}

impl DisplayWorker {
    pub fn new(backend: Box<dyn RenderBackend>, timing: DisplayTiming) -> Self {
        Self {
            backend,
            timing,
            latch: StateLatch::new(),
        }
    }

    /// Wait until `deadline`, painting viewfinder frames as they come.
    ///
    /// Returns the first non-preview message to arrive, which aborts
    /// the timer; `None` means the deadline was reached undisturbed.
    fn wait_interruptible(
        &mut self,
        bus: &Bus,
        deadline: Instant,
    ) -> Result<Option<Message>, DisplayError> {
        while Instant::now() < deadline {
            match bus.receive(Role::Display, false) {
                Some(Message::Event(BoothEvent::Camera(CameraEvent::Preview(frame)))) => {
                    self.backend.render(Screen::PreviewFrame(&frame))?;
                }
                Some(other) => return Ok(Some(other)),
                None => thread::sleep(POLL_TICK),
            }
        }
        Ok(None)
    }

    /// Greeter screen: when its time is up, advance the sitting.
    fn run_greeter(&mut self, bus: &Bus) -> Result<Option<Message>, DisplayError> {
        self.backend.render(Screen::Greeter)?;
        if let Some(interrupt) = self.wait_interruptible(bus, Instant::now() + self.timing.greeter)? {
            debug!("greeter interrupted, advance dropped");
            return Ok(Some(interrupt));
        }
        bus.send(
            Role::Orchestrator,
            Message::Event(BoothEvent::input(ButtonId::Advance)),
        );
        Ok(None)
    }

    /// Countdown screen: tick down second by second, cue the shot at
    /// zero. The clock divides the configured span evenly over the
    /// displayed seconds.
    fn run_countdown(&mut self, bus: &Bus) -> Result<Option<Message>, DisplayError> {
        let seconds = self.timing.countdown.as_secs_f64().ceil() as u32;
        let start = Instant::now();
        for tick in 0..seconds {
            self.backend.render(Screen::Countdown {
                seconds_left: seconds - tick,
            })?;
            let deadline = start + self.timing.countdown.mul_f64(f64::from(tick + 1) / f64::from(seconds));
            if let Some(interrupt) = self.wait_interruptible(bus, deadline)? {
                debug!("countdown interrupted, shot cue dropped");
                return Ok(Some(interrupt));
            }
        }
        bus.send(
            Role::Orchestrator,
            Message::Event(BoothEvent::Camera(CameraEvent::Countdown)),
        );
        Ok(None)
    }

    /// Apply one state. Returns a message that interrupted a timed
    /// screen and still needs dispatching.
    fn apply(&mut self, bus: &Bus, state: BoothState) -> Result<Option<Message>, DisplayError> {
        match state {
            BoothState::Startup => self.backend.render(Screen::Startup).map(|()| None),
            BoothState::Idle => self.backend.render(Screen::Idle).map(|()| None),
            BoothState::Greeter => self.run_greeter(bus),
            BoothState::Countdown { .. } => self.run_countdown(bus),
            BoothState::Capture { .. } => self.backend.render(Screen::Capture).map(|()| None),
            BoothState::Assemble => self.backend.render(Screen::Assemble).map(|()| None),
            BoothState::Review { picture } => {
                self.backend.render(Screen::Review(&picture)).map(|()| None)
            }
            BoothState::Teardown { .. } => self.backend.render(Screen::Black).map(|()| None),
        }
    }
}

impl RoleWorker for DisplayWorker {
    fn role(&self) -> Role {
        Role::Display
    }

    fn run(&mut self, bus: &Bus) -> Result<(), WorkerError> {
        self.latch.reset();
        let mut pending: Option<Message> = None;

        loop {
            let message = match pending.take() {
                Some(message) => message,
                None => match bus.receive(Role::Display, true) {
                    Some(message) => message,
                    None => break,
                },
            };

            match message {
                Message::Stop => break,
                Message::Event(BoothEvent::Camera(CameraEvent::Preview(frame))) => {
                    self.backend
                        .render(Screen::PreviewFrame(&frame))
                        .map_err(|e| WorkerError::Backend(e.to_string()))?;
                }
                Message::Event(event) => {
                    warn!(%event, "unexpected event in display mailbox");
                }
                Message::State(state) => {
                    if !self.latch.admit(&state) {
                        continue;
                    }
                    pending = self
                        .apply(bus, state)
                        .map_err(|e| WorkerError::Backend(e.to_string()))?;
                }
            }
        }
        self.backend.shutdown();
        Ok(())
    }
}
