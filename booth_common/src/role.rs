//! Worker role identities.
//!
//! `Role` names each independently-running part of the appliance. The set
//! is fixed at startup; there is no dynamic role registration. Every role
//! owns exactly one mailbox on the bus, addressed by its index.

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Identity of a worker role in the appliance process group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Role {
    /// Central state machine; owns the authoritative current state.
    Orchestrator = 0,
    /// GUI / screen rendering and user interaction.
    Display = 1,
    /// Camera handling (preview, shots, composite assembly).
    Camera = 2,
    /// Physical button input (GPIO or equivalent).
    Input = 3,
    /// Postprocessing of captured pictures (save, upload, ...).
    Postprocess = 4,
    /// Lamp relay control.
    Lamp = 5,
}

impl Role {
    /// All roles, in mailbox index order.
    pub const ALL: [Role; 6] = [
        Role::Orchestrator,
        Role::Display,
        Role::Camera,
        Role::Input,
        Role::Postprocess,
        Role::Lamp,
    ];

    /// Number of roles (and mailboxes).
    pub const COUNT: usize = Self::ALL.len();

    /// Mailbox index of this role.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Restart policy: can this role's run-loop be restarted after a
    /// fault without tearing down the whole appliance?
    ///
    /// The orchestrator never restarts itself; a display fault leaves the
    /// operator blind and is treated as fatal. Everything else recovers.
    #[inline]
    pub const fn is_recoverable(self) -> bool {
        matches!(
            self,
            Role::Camera | Role::Input | Role::Postprocess | Role::Lamp
        )
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Orchestrator => write!(f, "orchestrator"),
            Self::Display => write!(f, "display"),
            Self::Camera => write!(f, "camera"),
            Self::Input => write!(f, "input"),
            Self::Postprocess => write!(f, "postprocess"),
            Self::Lamp => write!(f, "lamp"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "orchestrator" => Ok(Self::Orchestrator),
            "display" => Ok(Self::Display),
            "camera" => Ok(Self::Camera),
            "input" => Ok(Self::Input),
            "postprocess" => Ok(Self::Postprocess),
            "lamp" => Ok(Self::Lamp),
            _ => Err(format!("unknown Role: {s:?}")),
        }
    }
}
