//! Shared worker-role contract.
//!
//! Every worker role has the same run-loop shape: drain the own mailbox,
//! dispatch each message, optionally report events back to the
//! orchestrator. The supervisor owns the loop's lifecycle; this module
//! owns its shape.

use booth_bus::Bus;
use booth_common::message::BoothState;
use booth_common::role::Role;
use thiserror::Error;

/// Error type a role run-loop may surface to the supervisor.
///
/// Faults below this level stay inside the role: transient backend
/// hiccups are logged and retried per role policy; only faults that end
/// the current run-loop cross this boundary, and they do so as values,
/// never as panics (panics are caught by the supervisor as a last
/// resort).
#[derive(Debug, Error)]
pub enum WorkerError {
    /// A hardware/service backend failed beyond the role's own recovery.
    #[error("backend failure: {0}")]
    Backend(String),

    /// Filesystem or OS-level failure.
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

/// Contract every worker role satisfies.
///
/// `run` blocks inside `bus.drain(self.role())`, handling one message
/// fully before dequeuing the next. Returning `Ok(())` means the Stop
/// sentinel was drained and the role wound down cleanly; returning an
/// error hands the fault to the supervisor, which reports it as an error
/// event and restarts the loop if the role is recoverable.
pub trait RoleWorker: Send {
    /// The mailbox this worker owns.
    fn role(&self) -> Role;

    /// Run the role loop until the Stop sentinel or a fault.
    fn run(&mut self, bus: &Bus) -> Result<(), WorkerError>;
}

/// Deduplicates state broadcasts.
///
/// Broadcasting the same state twice must be a safe no-op for every
/// worker (the orchestrator may replay after a recovery rewind). Roles
/// with side effects per state — the camera most of all — gate their
/// dispatch on `admit`.
#[derive(Debug, Default)]
pub struct StateLatch {
    last: Option<BoothState>,
}

impl StateLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit `state` if it differs from the previously admitted one.
    /// Returns `false` for an identical replay.
    pub fn admit(&mut self, state: &BoothState) -> bool {
        if self.last.as_ref() == Some(state) {
            return false;
        }
        self.last = Some(state.clone());
        true
    }

    /// Forget the last state (used when a role loop restarts, so the
    /// next broadcast is always applied).
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_rejects_identical_replay() {
        let mut latch = StateLatch::new();
        assert!(latch.admit(&BoothState::Idle));
        assert!(!latch.admit(&BoothState::Idle));
        assert!(latch.admit(&BoothState::Greeter));
        assert!(!latch.admit(&BoothState::Greeter));
    }

    #[test]
    fn latch_distinguishes_payloads() {
        let mut latch = StateLatch::new();
        assert!(latch.admit(&BoothState::Countdown { remaining: 3 }));
        assert!(latch.admit(&BoothState::Countdown { remaining: 2 }));
        assert!(!latch.admit(&BoothState::Countdown { remaining: 2 }));
    }

    #[test]
    fn reset_reopens_the_latch() {
        let mut latch = StateLatch::new();
        assert!(latch.admit(&BoothState::Idle));
        latch.reset();
        assert!(latch.admit(&BoothState::Idle));
    }
}
