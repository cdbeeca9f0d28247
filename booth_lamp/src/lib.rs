//! Lamp role.
//!
//! Switches the booth lighting through a relay: a short blink salutes a
//! successful startup, the lamp burns through countdown and capture,
//! and everything goes dark at teardown. Lighting is decoration, not
//! function, so relay faults are logged and swallowed; a sitting never
//! fails because a bulb did.

pub mod relay;
pub mod worker;

pub use relay::{NoRelay, RelayBackend};
pub use worker::LampWorker;
