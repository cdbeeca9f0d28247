//! Common re-exports for convenience.
//!
//! ```rust
//! use booth_common::prelude::*;
//! ```

pub use crate::config::{BoothConfig, ConfigError, ConfigLoader, LogLevel};
pub use crate::consts::{EXIT_FATAL, EXIT_RESTART, EXIT_SHUTDOWN};
pub use crate::message::{
    BoothEvent, BoothState, ButtonId, CameraEvent, ExitAction, InputEvent, Message, WorkerEvent,
};
pub use crate::picture::{Picture, PictureFormat};
pub use crate::role::Role;
