//! Capture backend seam.
//!
//! One trait per physical camera family; the worker never sees past it.
//! The dummy backend produces deterministic frames and is the default
//! for bench rigs and automated tests.

use booth_common::picture::{Picture, PictureFormat};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum CameraError {
    /// The device rejected or failed the operation.
    #[error("camera device error: {0}")]
    Device(String),

    /// The device dropped off the bus entirely.
    #[error("camera disconnected")]
    Disconnected,
}

/// Contract for a capture device.
///
/// `activate`/`idle` bracket a sitting: activation may take seconds on
/// real hardware (autofocus, mirror, exposure metering), so the worker
/// calls it once per sitting rather than once per shot. All calls come
/// from the single camera thread; implementations need no internal
/// locking.
pub trait CaptureBackend: Send {
    /// Short identifier, also the config key selecting this backend.
    fn name(&self) -> &'static str;

    /// Bring the device into shooting condition.
    fn activate(&mut self) -> Result<(), CameraError>;

    /// Drop back to standby between sittings.
    fn idle(&mut self) -> Result<(), CameraError>;

    /// Grab one low-resolution viewfinder frame.
    ///
    /// Returns `Ok(None)` when the device has no live view; the worker
    /// then skips preview streaming for the whole sitting.
    fn capture_preview(&mut self) -> Result<Option<Picture>, CameraError>;

    /// Take one full-resolution shot.
    fn capture_picture(&mut self) -> Result<Picture, CameraError>;

    /// Release the device. Called once at teardown.
    fn shutdown(&mut self);
}

/// Look up a backend by its config name.
pub fn backend_by_name(name: &str) -> Option<Box<dyn CaptureBackend>> {
    match name {
        "dummy" => Some(Box::new(DummyCamera::new())),
        _ => None,
    }
}

/// Deterministic software camera.
///
/// Frames are tiny tagged byte runs: previews carry `0xEE`, shot `n`
/// carries `n`. Enough structure for every downstream consumer without
/// any image codec.
#[derive(Debug, Default)]
pub struct DummyCamera {
    active: bool,
    shot_count: u8,
}

impl DummyCamera {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CaptureBackend for DummyCamera {
    fn name(&self) -> &'static str {
        "dummy"
    }

    fn activate(&mut self) -> Result<(), CameraError> {
        debug!("dummy camera active");
        self.active = true;
        Ok(())
    }

    fn idle(&mut self) -> Result<(), CameraError> {
        debug!("dummy camera idle");
        self.active = false;
        Ok(())
    }

    fn capture_preview(&mut self) -> Result<Option<Picture>, CameraError> {
        if !self.active {
            return Err(CameraError::Device("preview while inactive".to_string()));
        }
        Ok(Some(Picture::new(PictureFormat::Jpeg, vec![0xEE; 32])))
    }

    fn capture_picture(&mut self) -> Result<Picture, CameraError> {
        if !self.active {
            return Err(CameraError::Device("capture while inactive".to_string()));
        }
        self.shot_count = self.shot_count.wrapping_add(1);
        Ok(Picture::new(PictureFormat::Jpeg, vec![self.shot_count; 64]))
    }

    fn shutdown(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_shots_are_numbered() {
        let mut camera = DummyCamera::new();
        camera.activate().unwrap();
        assert_eq!(camera.capture_picture().unwrap().bytes()[0], 1);
        assert_eq!(camera.capture_picture().unwrap().bytes()[0], 2);
    }

    #[test]
    fn dummy_rejects_capture_while_inactive() {
        let mut camera = DummyCamera::new();
        assert!(camera.capture_picture().is_err());
        camera.activate().unwrap();
        camera.idle().unwrap();
        assert!(camera.capture_preview().is_err());
    }

    #[test]
    fn lookup_knows_the_dummy_backend() {
        assert_eq!(backend_by_name("dummy").map(|b| b.name()), Some("dummy"));
        assert!(backend_by_name("polaroid").is_none());
    }
}
