//! The closed message model flowing over the mailbox bus.
//!
//! Three layers, all exhaustively enumerated:
//!
//! - [`Message`] is what a mailbox holds: a broadcast state, an event, or
//!   the `Stop` sentinel that terminates a drain iteration.
//! - [`BoothState`] is the authoritative appliance state, produced only by
//!   the orchestrator.
//! - [`BoothEvent`] is everything the worker roles report back.
//!
//! No role may invent a new tag at runtime; adding a variant is a
//! compile-time-checked change at every consumer (exhaustive `match`).

use crate::picture::Picture;
use crate::role::Role;
use core::fmt;
use serde::{Deserialize, Serialize};

// ─── Message ────────────────────────────────────────────────────────

/// A single mailbox entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    /// Authoritative state broadcast by the orchestrator.
    State(BoothState),
    /// Report from a worker role (or a relay by the orchestrator).
    Event(BoothEvent),
    /// Sentinel: terminates the receiving role's drain iteration.
    Stop,
}

// ─── BoothState ─────────────────────────────────────────────────────

/// What happens to the appliance after a [`BoothState::Teardown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExitAction {
    /// Clean shutdown, exit code 0.
    Shutdown,
    /// Reload configuration and relaunch the whole process group.
    Restart,
    /// Unrecoverable fault; non-zero exit for operator attention.
    Fatal,
}

/// The authoritative appliance state.
///
/// Session counters ride inside `Countdown`/`Capture` so a worker restart
/// can never desynchronize a counter from the state describing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoothState {
    /// Roles are initializing; waiting for the camera to report ready.
    Startup,
    /// Waiting for a trigger.
    Idle,
    /// Welcome screen before a sitting begins.
    Greeter,
    /// Visible countdown before the next shot.
    Countdown {
        /// Shots still to be taken in this sitting (including the next one).
        remaining: u32,
    },
    /// A shot is being taken.
    Capture {
        /// 1-based index of the shot being taken.
        shot: u32,
        /// Total shots per sitting.
        total: u32,
    },
    /// All shots taken; the composite picture is being assembled.
    Assemble,
    /// Composite ready; shown to the user while postprocessing runs.
    Review {
        /// The assembled composite picture.
        picture: Picture,
    },
    /// Terminal state for this session.
    Teardown {
        /// What the supervisor should do once all roles have wound down.
        action: ExitAction,
    },
}

impl fmt::Display for BoothState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Startup => write!(f, "startup"),
            Self::Idle => write!(f, "idle"),
            Self::Greeter => write!(f, "greeter"),
            Self::Countdown { remaining } => write!(f, "countdown({remaining})"),
            Self::Capture { shot, total } => write!(f, "capture({shot}/{total})"),
            Self::Assemble => write!(f, "assemble"),
            Self::Review { .. } => write!(f, "review"),
            Self::Teardown { action } => write!(f, "teardown({action:?})"),
        }
    }
}

// ─── BoothEvent ─────────────────────────────────────────────────────

/// Events originating from the camera role's side of the ritual.
///
/// `Countdown` is the capture gate: it is emitted by whichever role times
/// the visible countdown (the display) when the count reaches zero, and
/// tells the orchestrator to advance into `Capture`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraEvent {
    /// Camera backend initialized and ready to shoot.
    Ready,
    /// One viewfinder frame. Sent point-to-point to the display,
    /// bypassing the orchestrator.
    Preview(Picture),
    /// A full-resolution shot was taken.
    Capture(Picture),
    /// The visible countdown completed; take the next shot.
    Countdown,
    /// All shots of the sitting are taken; assemble the composite.
    Assemble,
    /// The composite picture is assembled.
    Review(Picture),
}

impl CameraEvent {
    /// Short tag for logging, without any payload.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Preview(_) => "preview",
            Self::Capture(_) => "capture",
            Self::Countdown => "countdown",
            Self::Assemble => "assemble",
            Self::Review(_) => "review",
        }
    }
}

/// Events from the postprocessing role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerEvent {
    /// All postprocessing tasks for the sitting finished.
    Idle,
}

/// Logical button identity carried by an [`InputEvent`].
///
/// GPIO backends map raw pin numbers through [`ButtonId::from_id`]; GUI
/// backends emit the logical variant directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum ButtonId {
    /// Start a sitting (the big button).
    Trigger = 1,
    /// Advance past a timed screen (greeter auto-advance or tap).
    Advance = 2,
    /// Shut the appliance down.
    Shutdown = 3,
    /// Restart the appliance, reloading configuration.
    Restart = 4,
}

impl ButtonId {
    /// Map a raw button id (e.g. from a GPIO pin table) to a logical
    /// button. Returns `None` for unassigned ids.
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::Trigger),
            2 => Some(Self::Advance),
            3 => Some(Self::Shutdown),
            4 => Some(Self::Restart),
            _ => None,
        }
    }
}

/// A user interaction, physical or on-screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputEvent {
    /// The logical button that was pressed.
    pub button: ButtonId,
}

/// Everything a worker role can report to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoothEvent {
    /// Camera-side ritual events.
    Camera(CameraEvent),
    /// Postprocessing events.
    Worker(WorkerEvent),
    /// User interaction.
    Input(InputEvent),
    /// A fault, converted to an event before crossing the role boundary.
    Error {
        /// Role the fault originated in.
        source: Role,
        /// Human-readable description for the log.
        message: String,
    },
}

impl BoothEvent {
    /// Convenience constructor for input events.
    pub const fn input(button: ButtonId) -> Self {
        Self::Input(InputEvent { button })
    }

    /// Convenience constructor for error events.
    pub fn error(source: Role, message: impl Into<String>) -> Self {
        Self::Error {
            source,
            message: message.into(),
        }
    }
}

impl fmt::Display for BoothEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Camera(ev) => write!(f, "camera/{}", ev.kind()),
            Self::Worker(WorkerEvent::Idle) => write!(f, "worker/idle"),
            Self::Input(ev) => write!(f, "input/{:?}", ev.button),
            Self::Error { source, .. } => write!(f, "error/{source}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picture::PictureFormat;

    #[test]
    fn button_id_mapping() {
        assert_eq!(ButtonId::from_id(1), Some(ButtonId::Trigger));
        assert_eq!(ButtonId::from_id(2), Some(ButtonId::Advance));
        assert_eq!(ButtonId::from_id(3), Some(ButtonId::Shutdown));
        assert_eq!(ButtonId::from_id(4), Some(ButtonId::Restart));
        assert_eq!(ButtonId::from_id(0), None);
        assert_eq!(ButtonId::from_id(99), None);
    }

    #[test]
    fn camera_event_kinds() {
        let pic = Picture::new(PictureFormat::Jpeg, vec![1]);
        assert_eq!(CameraEvent::Ready.kind(), "ready");
        assert_eq!(CameraEvent::Preview(pic.clone()).kind(), "preview");
        assert_eq!(CameraEvent::Capture(pic.clone()).kind(), "capture");
        assert_eq!(CameraEvent::Countdown.kind(), "countdown");
        assert_eq!(CameraEvent::Assemble.kind(), "assemble");
        assert_eq!(CameraEvent::Review(pic).kind(), "review");
    }

    #[test]
    fn state_display_is_compact() {
        assert_eq!(BoothState::Idle.to_string(), "idle");
        assert_eq!(
            BoothState::Countdown { remaining: 3 }.to_string(),
            "countdown(3)"
        );
        assert_eq!(
            BoothState::Capture { shot: 2, total: 3 }.to_string(),
            "capture(2/3)"
        );
    }

    #[test]
    fn identical_state_broadcasts_compare_equal() {
        // The state latch in the worker loops relies on this.
        let a = BoothState::Capture { shot: 1, total: 3 };
        let b = BoothState::Capture { shot: 1, total: 3 };
        assert_eq!(a, b);
        assert_ne!(a, BoothState::Capture { shot: 2, total: 3 });
    }
}
