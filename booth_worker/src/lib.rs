//! Postprocess role.
//!
//! Receives every shot and the assembled picture of a sitting, names
//! them, and runs the configured follow-up tasks (storage first, then
//! whatever else the booth owner wired in). When the work is done it
//! reports idle, which sends the appliance back to the idle screen.
//!
//! Task failures are logged and swallowed: a full SD card must not
//! strand guests on the review screen.

pub mod tasks;
pub mod tracker;
pub mod worker;

pub use tasks::{PictureSaver, PostprocessTask, TaskError};
pub use tracker::PictureTracker;
pub use worker::PostprocessWorker;
