//! Picture naming.
//!
//! One sitting gets one timestamp; the assembled picture is
//! `<prefix>_<ts>.<ext>` and the individual shots are
//! `<prefix>_<ts>_shot-<n>.<ext>`. The storage directory may carry
//! strftime specifiers (e.g. `photos/%Y-%m-%d`) and is expanded per
//! sitting, so an appliance running for weeks rolls into fresh
//! directories by itself.

use booth_common::picture::PictureFormat;
use chrono::{DateTime, Local};
use std::path::PathBuf;

/// Timestamp granularity of one sitting: `yymmddHHMMSS`.
const SESSION_STAMP: &str = "%y%m%d%H%M%S";

#[derive(Debug)]
pub struct PictureTracker {
    basedir_template: String,
    prefix: String,
    basedir: PathBuf,
    stamp: String,
    shot: u32,
}

impl PictureTracker {
    pub fn new(basedir: &str, prefix: &str) -> Self {
        let mut tracker = Self {
            basedir_template: basedir.to_string(),
            prefix: prefix.to_string(),
            basedir: PathBuf::new(),
            stamp: String::new(),
            shot: 0,
        };
        tracker.start_session_at(Local::now());
        tracker
    }

    /// Begin a new sitting: fresh timestamp, shot counter at zero,
    /// storage directory re-expanded.
    pub fn start_session(&mut self) {
        self.start_session_at(Local::now());
    }

    pub fn start_session_at(&mut self, now: DateTime<Local>) {
        self.basedir = PathBuf::from(now.format(&self.basedir_template).to_string());
        self.stamp = now.format(SESSION_STAMP).to_string();
        self.shot = 0;
    }

    /// Directory all pictures of the current sitting land in.
    pub fn basedir(&self) -> &PathBuf {
        &self.basedir
    }

    /// Path for the next individual shot of this sitting.
    pub fn next_shot_path(&mut self, format: PictureFormat) -> PathBuf {
        self.shot += 1;
        self.basedir.join(format!(
            "{}_{}_shot-{}.{}",
            self.prefix,
            self.stamp,
            self.shot,
            format.extension()
        ))
    }

    /// Path for the assembled picture of this sitting.
    pub fn composite_path(&self, format: PictureFormat) -> PathBuf {
        self.basedir
            .join(format!("{}_{}.{}", self.prefix, self.stamp, format.extension()))
    }
}
