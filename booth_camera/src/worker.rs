//! Camera role run-loop.

use crate::backend::{CameraError, CaptureBackend};
use crate::compose::Compositor;
use booth_bus::Bus;
use booth_common::message::{BoothEvent, BoothState, CameraEvent, Message};
use booth_common::picture::Picture;
use booth_common::role::Role;
use booth_core::worker::{RoleWorker, StateLatch, WorkerError};
use tracing::{debug, info, warn};

/// Drives a [`CaptureBackend`] from state broadcasts.
pub struct CameraWorker {
    backend: Box<dyn CaptureBackend>,
    compositor: Box<dyn Compositor>,
    show_preview: bool,
    latch: StateLatch,
    shots: Vec<Picture>,
    /// Cleared when a sitting reveals the backend has no live view.
    preview_available: bool,
}

impl CameraWorker {
    pub fn new(
        backend: Box<dyn CaptureBackend>,
        compositor: Box<dyn Compositor>,
        show_preview: bool,
    ) -> Self {
        Self {
            backend,
            compositor,
            show_preview,
            latch: StateLatch::new(),
            shots: Vec::new(),
            preview_available: true,
        }
    }

    /// Stream viewfinder frames until new mail arrives.
    ///
    /// The countdown screen stays live exactly as long as the mailbox is
    /// empty; the next broadcast (the capture state) ends the stream
    /// without any frame going to waste.
    fn stream_preview(&mut self, bus: &Bus) -> Result<(), CameraError> {
        if !self.show_preview || !self.preview_available {
            return Ok(());
        }
        while bus.is_empty(Role::Camera) {
            match self.backend.capture_preview()? {
                Some(frame) => bus.send(
                    Role::Display,
                    Message::Event(BoothEvent::Camera(CameraEvent::Preview(frame))),
                ),
                None => {
                    info!("backend has no live view, preview disabled");
                    self.preview_available = false;
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    fn apply(&mut self, bus: &Bus, state: BoothState) -> Result<(), CameraError> {
        match state {
            BoothState::Startup => {
                self.backend.activate()?;
                self.backend.idle()?;
                bus.send(
                    Role::Orchestrator,
                    Message::Event(BoothEvent::Camera(CameraEvent::Ready)),
                );
            }
            BoothState::Greeter => {
                self.shots.clear();
                self.backend.activate()?;
            }
            BoothState::Countdown { .. } => {
                self.stream_preview(bus)?;
            }
            BoothState::Capture { shot, total } => {
                let picture = self.backend.capture_picture()?;
                debug!(shot, total, bytes = picture.len(), "shot taken");
                self.shots.push(picture.clone());
                bus.send(
                    Role::Orchestrator,
                    Message::Event(BoothEvent::Camera(CameraEvent::Capture(picture))),
                );
                if shot == total {
                    bus.send(
                        Role::Orchestrator,
                        Message::Event(BoothEvent::Camera(CameraEvent::Assemble)),
                    );
                }
            }
            BoothState::Assemble => {
                let composed = self.compositor.compose(&self.shots)?;
                bus.send(
                    Role::Orchestrator,
                    Message::Event(BoothEvent::Camera(CameraEvent::Review(composed))),
                );
            }
            BoothState::Review { .. } => {}
            BoothState::Idle => {
                self.shots.clear();
                self.backend.idle()?;
            }
            BoothState::Teardown { .. } => {
                self.backend.shutdown();
            }
        }
        Ok(())
    }
}

impl RoleWorker for CameraWorker {
    fn role(&self) -> Role {
        Role::Camera
    }

    fn run(&mut self, bus: &Bus) -> Result<(), WorkerError> {
        // Fresh loop entry after a restart must re-apply the next state.
        self.latch.reset();

        for message in bus.drain(Role::Camera) {
            let Message::State(state) = message else {
                warn!("camera mailbox carries no events, message discarded");
                continue;
            };
            if !self.latch.admit(&state) {
                continue;
            }
            self.apply(bus, state)
                .map_err(|e| WorkerError::Backend(e.to_string()))?;
        }
        self.backend.shutdown();
        Ok(())
    }
}
