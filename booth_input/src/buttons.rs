//! Button backend seam.

use booth_common::message::ButtonId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    /// The input device failed beyond a missed poll.
    #[error("input device error: {0}")]
    Device(String),
}

/// Contract for a button source.
///
/// `poll` returns at most one debounced press per call and never
/// blocks; the worker provides the cadence.
pub trait InputBackend: Send {
    fn poll(&mut self) -> Result<Option<ButtonId>, InputError>;

    /// Release the device. Called once at teardown.
    fn shutdown(&mut self);
}

/// Backend for booths without physical buttons (touch-only setups).
#[derive(Debug, Default)]
pub struct NoButtons;

impl InputBackend for NoButtons {
    fn poll(&mut self) -> Result<Option<ButtonId>, InputError> {
        Ok(None)
    }

    fn shutdown(&mut self) {}
}
