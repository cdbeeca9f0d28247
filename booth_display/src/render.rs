//! Render backend seam.

use booth_common::picture::Picture;
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DisplayError {
    /// The panel or rendering surface failed.
    #[error("render failure: {0}")]
    Render(String),
}

/// One frame's worth of screen content.
#[derive(Debug)]
pub enum Screen<'a> {
    Startup,
    Idle,
    Greeter,
    Countdown { seconds_left: u32 },
    /// Live viewfinder frame painted over the countdown screen.
    PreviewFrame(&'a Picture),
    Capture,
    Assemble,
    Review(&'a Picture),
    /// Blanked panel during teardown.
    Black,
}

impl Screen<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Startup => "startup",
            Screen::Idle => "idle",
            Screen::Greeter => "greeter",
            Screen::Countdown { .. } => "countdown",
            Screen::PreviewFrame(_) => "preview",
            Screen::Capture => "capture",
            Screen::Assemble => "assemble",
            Screen::Review(_) => "review",
            Screen::Black => "black",
        }
    }
}

/// Contract for a rendering surface.
///
/// Called only from the display thread; a frame is fully painted before
/// the next one is requested.
pub trait RenderBackend: Send {
    fn render(&mut self, screen: Screen<'_>) -> Result<(), DisplayError>;

    /// Release the surface. Called once at teardown.
    fn shutdown(&mut self);
}

/// Records screen names instead of painting them.
///
/// The frame log is shared so a test can keep reading it after the
/// backend moved into the worker.
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    frames: Arc<Mutex<Vec<String>>>,
}

impl HeadlessDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle onto the frame log.
    pub fn frames(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.frames)
    }
}

impl RenderBackend for HeadlessDisplay {
    fn render(&mut self, screen: Screen<'_>) -> Result<(), DisplayError> {
        debug!(screen = screen.name(), "headless frame");
        let entry = match &screen {
            Screen::Countdown { seconds_left } => format!("countdown:{seconds_left}"),
            other => other.name().to_string(),
        };
        self.frames.lock().push(entry);
        Ok(())
    }

    fn shutdown(&mut self) {}
}
