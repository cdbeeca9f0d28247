//! The photographic ritual as a pure transition function.
//!
//! Ritual: idle → greeter → countdown → capture (repeated) → assemble →
//! review → idle. The function is total: every (state, event) pair maps
//! to exactly one [`Reaction`]. Stale events — unavoidable when an error
//! recovery rewinds the session while old reports are still in flight —
//! map to a logged no-op rather than being dropped on the floor.

use booth_common::message::{
    BoothEvent, BoothState, ButtonId, CameraEvent, ExitAction, WorkerEvent,
};
use booth_common::role::Role;

/// Session parameters the transition function needs.
///
/// Derived from configuration once per launch; carried by value so the
/// function stays free of config-file plumbing.
#[derive(Debug, Clone, Copy)]
pub struct SessionPolicy {
    /// Shots per sitting.
    pub num_shots: u32,
    /// Forward individual shots to postprocessing.
    pub keep_pictures: bool,
}

impl SessionPolicy {
    pub const fn new(num_shots: u32, keep_pictures: bool) -> Self {
        Self {
            num_shots,
            keep_pictures,
        }
    }
}

/// Result of applying one event to the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reaction {
    /// Defined no-op — the event is valid but carries no work in this
    /// state. The reason string goes to the debug log.
    Ignore(&'static str),
    /// Transition; the orchestrator broadcasts the new state.
    Goto(BoothState),
    /// Relay an event point-to-point, optionally also transitioning.
    /// Used for shot pictures on their way to the postprocess role.
    Forward {
        to: Role,
        event: BoothEvent,
        then: Option<BoothState>,
    },
}

/// Compute the reaction to `event` in `current`.
///
/// Total over all (state, event) pairs. Faults always produce a defined
/// outcome: recoverable sources rewind the session to `Startup`, fatal
/// sources force `Teardown`. Combinations that can only arise from
/// internal corruption (an assemble report before the last shot) also
/// force `Teardown` instead of being ignored.
pub fn transition(current: &BoothState, event: BoothEvent, policy: &SessionPolicy) -> Reaction {
    use BoothState::*;

    // Faults and operator exits outrank the ritual in every state.
    match &event {
        BoothEvent::Error { source, .. } => {
            return if matches!(current, Teardown { .. }) {
                Reaction::Ignore("already tearing down")
            } else if source.is_recoverable() {
                Reaction::Goto(Startup)
            } else {
                Reaction::Goto(Teardown {
                    action: ExitAction::Fatal,
                })
            };
        }
        BoothEvent::Input(input) if input.button == ButtonId::Shutdown => {
            return Reaction::Goto(Teardown {
                action: ExitAction::Shutdown,
            });
        }
        BoothEvent::Input(input) if input.button == ButtonId::Restart => {
            return Reaction::Goto(Teardown {
                action: ExitAction::Restart,
            });
        }
        // Preview frames go camera → display; one landing here is a
        // misrouted leftover, never a state driver.
        BoothEvent::Camera(CameraEvent::Preview(_)) => {
            return Reaction::Ignore("preview frames bypass the orchestrator");
        }
        _ => {}
    }

    match (current, event) {
        (Teardown { .. }, _) => Reaction::Ignore("tearing down"),

        // ── Startup ─────────────────────────────────────────────────
        (Startup, BoothEvent::Camera(CameraEvent::Ready)) => Reaction::Goto(Idle),
        (Startup, BoothEvent::Input(_)) => Reaction::Ignore("not ready yet"),

        // ── Idle → Greeter ──────────────────────────────────────────
        (Idle, BoothEvent::Input(input)) if input.button == ButtonId::Trigger => {
            Reaction::Goto(Greeter)
        }

        // ── Greeter → Countdown ─────────────────────────────────────
        // The display times the greeter screen and emits Advance.
        (Greeter, BoothEvent::Input(input)) if input.button == ButtonId::Advance => {
            Reaction::Goto(Countdown {
                remaining: policy.num_shots,
            })
        }

        // ── Countdown → Capture ─────────────────────────────────────
        // The display emits the countdown event when the visible count
        // reaches zero; the shot index is derived from the state itself.
        (Countdown { remaining }, BoothEvent::Camera(CameraEvent::Countdown)) => {
            let total = policy.num_shots;
            let shot = total.saturating_sub(*remaining) + 1;
            Reaction::Goto(Capture { shot, total })
        }

        // ── Capture: shot taken ─────────────────────────────────────
        (Capture { shot, total }, BoothEvent::Camera(CameraEvent::Capture(picture))) => {
            let then = if shot < total {
                Some(Countdown {
                    remaining: total - shot,
                })
            } else {
                // Last shot: hold in Capture until the assemble report.
                None
            };
            if policy.keep_pictures {
                Reaction::Forward {
                    to: Role::Postprocess,
                    event: BoothEvent::Camera(CameraEvent::Capture(picture)),
                    then,
                }
            } else {
                match then {
                    Some(next) => Reaction::Goto(next),
                    None => Reaction::Ignore("shot discarded (keep_pictures off)"),
                }
            }
        }

        // ── Capture → Assemble ──────────────────────────────────────
        (Capture { shot, total }, BoothEvent::Camera(CameraEvent::Assemble)) => {
            if shot == total {
                Reaction::Goto(Assemble)
            } else {
                // The camera reports assemble only after the final shot;
                // anything else means the session counters are corrupt.
                Reaction::Goto(Teardown {
                    action: ExitAction::Fatal,
                })
            }
        }

        // ── Assemble → Review ───────────────────────────────────────
        (Assemble, BoothEvent::Camera(CameraEvent::Review(picture))) => {
            Reaction::Goto(Review { picture })
        }

        // ── Review → Idle ───────────────────────────────────────────
        (Review { .. }, BoothEvent::Worker(WorkerEvent::Idle)) => Reaction::Goto(Idle),

        // ── Stale leftovers ─────────────────────────────────────────
        // After an error recovery rewinds to Startup, reports from the
        // aborted sitting may still arrive. Each is a defined, logged
        // no-op; FIFO ordering guarantees nothing newer was skipped.
        (_, BoothEvent::Camera(CameraEvent::Ready)) => Reaction::Ignore("duplicate ready"),
        (_, BoothEvent::Camera(CameraEvent::Countdown)) => Reaction::Ignore("stale countdown"),
        (_, BoothEvent::Camera(CameraEvent::Capture(_))) => Reaction::Ignore("stale shot"),
        (_, BoothEvent::Camera(CameraEvent::Assemble)) => Reaction::Ignore("stale assemble"),
        (_, BoothEvent::Camera(CameraEvent::Review(_))) => Reaction::Ignore("stale review"),
        (_, BoothEvent::Worker(WorkerEvent::Idle)) => Reaction::Ignore("stale worker idle"),
        (_, BoothEvent::Input(_)) => Reaction::Ignore("input ignored in current state"),

        // Handled by the fault block above; unreachable but the match
        // must stay exhaustive without a blanket arm hiding new variants.
        (_, BoothEvent::Error { .. }) => Reaction::Ignore("handled above"),
        (_, BoothEvent::Camera(CameraEvent::Preview(_))) => {
            Reaction::Ignore("preview frames bypass the orchestrator")
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
