//! The orchestrator event loop.
//!
//! Owns the single authoritative [`BoothState`], drains its own mailbox,
//! applies the pure transition function, and broadcasts every new state.
//! It never touches hardware and never blocks on anything but its own
//! mailbox; all coupling to the worker roles goes through the bus.

use crate::machine::{Reaction, SessionPolicy, transition};
use booth_bus::Bus;
use booth_common::consts::{EXIT_FATAL, EXIT_RESTART, EXIT_SHUTDOWN};
use booth_common::message::{BoothEvent, BoothState, ButtonId, ExitAction, Message};
use booth_common::role::Role;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Central state machine loop.
pub struct Orchestrator {
    bus: Arc<Bus>,
    policy: SessionPolicy,
    state: BoothState,
    /// Armed when the appliance was launched with `--run` or
    /// `run_on_startup`; fires a synthetic trigger on the first Idle.
    kickstart_pending: bool,
}

impl Orchestrator {
    pub fn new(bus: Arc<Bus>, policy: SessionPolicy, run_on_startup: bool) -> Self {
        Self {
            bus,
            policy,
            state: BoothState::Startup,
            kickstart_pending: run_on_startup,
        }
    }

    /// Current authoritative state (for tests and diagnostics).
    pub fn state(&self) -> &BoothState {
        &self.state
    }

    /// Run until teardown. Returns the appliance exit code.
    ///
    /// The loop's observable side effect per event is at most one
    /// broadcast of the computed next state plus, for shot pictures, one
    /// point-to-point relay to the postprocess role.
    pub fn run(&mut self) -> i32 {
        info!(state = %self.state, "orchestrator starting");
        self.bus.broadcast(Message::State(BoothState::Startup));

        loop {
            let Some(message) = self.bus.receive(Role::Orchestrator, true) else {
                // Unreachable while the bus is alive; treat as fatal.
                error!("orchestrator mailbox closed");
                return EXIT_FATAL;
            };

            let event = match message {
                Message::Event(event) => event,
                Message::Stop => {
                    // Stop addressed at the orchestrator means someone
                    // outside the state machine wants us gone.
                    warn!("orchestrator received stop sentinel, shutting down");
                    return self.teardown(ExitAction::Shutdown);
                }
                Message::State(state) => {
                    // States are produced only by the orchestrator.
                    warn!(%state, "discarding state message in orchestrator mailbox");
                    continue;
                }
            };

            if let Some(code) = self.handle(event) {
                return code;
            }
        }
    }

    /// Apply one event. Returns an exit code once teardown completes.
    pub fn handle(&mut self, event: BoothEvent) -> Option<i32> {
        if let BoothEvent::Error { source, message } = &event {
            warn!(%source, %message, "error event received");
        }
        match transition(&self.state, event, &self.policy) {
            Reaction::Ignore(reason) => {
                debug!(state = %self.state, reason, "event ignored");
                None
            }
            Reaction::Goto(next) => self.enter(next),
            Reaction::Forward { to, event, then } => {
                self.bus.send(to, Message::Event(event));
                match then {
                    Some(next) => self.enter(next),
                    None => None,
                }
            }
        }
    }

    fn enter(&mut self, next: BoothState) -> Option<i32> {
        info!(from = %self.state, to = %next, "state transition");
        self.state = next.clone();
        self.bus.broadcast(Message::State(next));

        match &self.state {
            BoothState::Teardown { action } => Some(self.teardown(*action)),
            BoothState::Idle if self.kickstart_pending => {
                // One-shot: behave as if the trigger was pressed the
                // moment the appliance became ready.
                self.kickstart_pending = false;
                info!("run-on-startup: injecting trigger");
                self.bus.send(
                    Role::Orchestrator,
                    Message::Event(BoothEvent::input(ButtonId::Trigger)),
                );
                None
            }
            _ => None,
        }
    }

    /// Ends the drain loop of every worker role and maps the teardown
    /// action to the process exit code the outer wrapper interprets.
    fn teardown(&self, action: ExitAction) -> i32 {
        self.bus.broadcast(Message::Stop);
        let code = match action {
            ExitAction::Shutdown => EXIT_SHUTDOWN,
            ExitAction::Restart => EXIT_RESTART,
            ExitAction::Fatal => EXIT_FATAL,
        };
        info!(?action, code, "teardown complete");
        code
    }
}
