//! Input role.
//!
//! Polls the physical buttons and turns presses into input events on
//! the orchestrator's mailbox. The role is stateless on purpose: it
//! reports every press and lets the state machine decide what a press
//! means right now.

pub mod buttons;
pub mod worker;

pub use buttons::{InputBackend, NoButtons};
pub use worker::InputWorker;
