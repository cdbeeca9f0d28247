//! Follow-up tasks.
//!
//! A task receives a picture and the path the tracker assigned to it.
//! Tasks run on the postprocess thread in registration order; storage
//! registers first so later tasks (printing, upload) can rely on the
//! file existing.

use booth_common::picture::Picture;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum TaskError {
    #[error("I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// Task-specific failure (printer offline, upload rejected, ...).
    #[error("{0}")]
    Failed(String),
}

/// One follow-up step for finished pictures.
pub trait PostprocessTask: Send {
    /// Identifier used in logs.
    fn name(&self) -> &'static str;

    /// Whether individual shots are fed to this task too. Most tasks
    /// only care about the assembled picture.
    fn wants_shots(&self) -> bool {
        false
    }

    fn process(&mut self, picture: &Picture, path: &Path) -> Result<(), TaskError>;
}

/// Writes pictures to local storage, creating directories as needed.
#[derive(Debug, Default)]
pub struct PictureSaver;

impl PostprocessTask for PictureSaver {
    fn name(&self) -> &'static str {
        "saver"
    }

    fn wants_shots(&self) -> bool {
        true
    }

    fn process(&mut self, picture: &Picture, path: &Path) -> Result<(), TaskError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, picture.bytes())?;
        debug!(path = %path.display(), bytes = picture.len(), "picture saved");
        Ok(())
    }
}
