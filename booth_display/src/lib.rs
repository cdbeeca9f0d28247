//! Display role.
//!
//! Renders the screen for the current booth state and drives the two
//! timed screens: the greeter (advances the sitting when its time is
//! up) and the countdown (ticks down, paints viewfinder frames as they
//! arrive, and cues the shot at zero). Everything behind the
//! [`render::RenderBackend`] seam; the headless backend keeps the rest
//! of the appliance testable without a panel attached.

pub mod render;
pub mod worker;

pub use render::{HeadlessDisplay, RenderBackend, Screen};
pub use worker::{DisplayTiming, DisplayWorker};
