//! Relay backend seam.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RelayError {
    /// The relay board rejected the switch command.
    #[error("relay error: {0}")]
    Switch(String),
}

/// Contract for a lamp relay channel.
pub trait RelayBackend: Send {
    fn turn_on(&mut self) -> Result<(), RelayError>;

    fn turn_off(&mut self) -> Result<(), RelayError>;

    /// Release the channel. Called once at teardown, after a final
    /// `turn_off`.
    fn shutdown(&mut self);
}

/// Backend for booths without lighting hardware.
#[derive(Debug, Default)]
pub struct NoRelay;

impl RelayBackend for NoRelay {
    fn turn_on(&mut self) -> Result<(), RelayError> {
        Ok(())
    }

    fn turn_off(&mut self) -> Result<(), RelayError> {
        Ok(())
    }

    fn shutdown(&mut self) {}
}
