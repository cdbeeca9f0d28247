//! Shot assembly.
//!
//! The booth takes several shots per sitting but reviews and stores one
//! picture. How the shots become that picture is a policy choice behind
//! [`Compositor`]; the default simply presents the final shot.

use crate::backend::CameraError;
use booth_common::picture::Picture;

/// Turns the shots of one sitting into the reviewed picture.
pub trait Compositor: Send {
    fn compose(&self, shots: &[Picture]) -> Result<Picture, CameraError>;
}

/// Presents the last shot unchanged.
#[derive(Debug, Default)]
pub struct LastShotCompositor;

impl Compositor for LastShotCompositor {
    fn compose(&self, shots: &[Picture]) -> Result<Picture, CameraError> {
        shots
            .last()
            .cloned()
            .ok_or_else(|| CameraError::Device("no shots to assemble".to_string()))
    }
}
