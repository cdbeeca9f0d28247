//! Camera role.
//!
//! Owns the capture hardware behind the [`backend::CaptureBackend`]
//! seam. Reacts to state broadcasts: arms the sensor when a sitting
//! begins, streams viewfinder frames straight to the display while the
//! countdown screen is up, reports every shot to the orchestrator and
//! assembles the final picture when the sitting completes.

pub mod backend;
pub mod compose;
pub mod worker;

pub use backend::{CaptureBackend, DummyCamera, backend_by_name};
pub use compose::{Compositor, LastShotCompositor};
pub use worker::CameraWorker;
