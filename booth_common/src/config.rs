//! Configuration loading traits and types.
//!
//! All photobooth crates load TOML configuration through the same
//! [`ConfigLoader`] trait. The appliance-wide [`BoothConfig`] lives here so
//! the supervisor binary and the role crates agree on section names.
//!
//! # TOML Example
//!
//! ```toml
//! [shared]
//! log_level = "debug"
//! service_name = "booth-01"
//!
//! [session]
//! num_shots = 3
//! countdown_time_s = 5.0
//!
//! [storage]
//! basedir = "/var/lib/photobooth/%Y-%m-%d"
//! prefix = "booth"
//! ```

use crate::consts::{
    DEFAULT_COUNTDOWN_TIME_S, DEFAULT_GREETER_TIME_S, DEFAULT_NUM_SHOTS, DEFAULT_REVIEW_TIME_S,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed tracing information.
    Trace,
    /// Debug information useful during development.
    Debug,
    /// General information about application operation.
    #[default]
    Info,
    /// Warning messages for potentially problematic situations.
    Warn,
    /// Error messages for serious problems.
    Error,
}

/// Common configuration fields shared across all photobooth crates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Appliance instance identifier.
    pub service_name: String,
}

/// Photographic ritual parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Shots per sitting.
    #[serde(default = "default_num_shots")]
    pub num_shots: u32,

    /// Seconds the greeter screen is shown before the first countdown.
    #[serde(default = "default_greeter_time")]
    pub greeter_time_s: f64,

    /// Seconds of visible countdown before each shot.
    #[serde(default = "default_countdown_time")]
    pub countdown_time_s: f64,

    /// Seconds the review screen is shown.
    #[serde(default = "default_review_time")]
    pub review_time_s: f64,

    /// Skip the idle screen and start a sitting right after startup.
    #[serde(default)]
    pub run_on_startup: bool,

    /// Stream viewfinder frames to the display during countdown.
    #[serde(default = "default_true")]
    pub show_preview: bool,

    /// Keep individual shots (forward them to postprocessing) in
    /// addition to the assembled composite.
    #[serde(default = "default_true")]
    pub keep_pictures: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            num_shots: DEFAULT_NUM_SHOTS,
            greeter_time_s: DEFAULT_GREETER_TIME_S,
            countdown_time_s: DEFAULT_COUNTDOWN_TIME_S,
            review_time_s: DEFAULT_REVIEW_TIME_S,
            run_on_startup: false,
            show_preview: true,
            keep_pictures: true,
        }
    }
}

/// Where captured pictures land on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base directory for saved pictures. May contain `strftime`-style
    /// placeholders (e.g. `%Y-%m-%d`), expanded once per launch.
    pub basedir: String,

    /// Filename prefix; empty means no prefix.
    #[serde(default)]
    pub prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            basedir: "pictures".to_string(),
            prefix: "booth".to_string(),
        }
    }
}

/// Camera role configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Capture backend name (e.g. `"dummy"`).
    #[serde(default = "default_camera_backend")]
    pub backend: String,

    /// Clockwise rotation applied by the backend, degrees (0/90/180/270).
    #[serde(default)]
    pub rotation: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            backend: default_camera_backend(),
            rotation: 0,
        }
    }
}

/// Lamp relay configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RelayConfig {
    /// Enable the lamp role.
    #[serde(default)]
    pub enable: bool,

    /// Relay channel the lamp is wired to (1-based).
    #[serde(default = "default_lamp_id")]
    pub lamp_id: u8,
}

/// Supervisor hardening knobs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SupervisorConfig {
    /// Synthesize an error event when a role with queued mail has not
    /// dequeued anything for this many seconds. Disabled when absent.
    #[serde(default)]
    pub stall_timeout_s: Option<u64>,
}

/// Appliance-wide configuration, one TOML file per launch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoothConfig {
    pub shared: SharedConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub supervisor: SupervisorConfig,
}

impl BoothConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - `service_name` is empty
    /// - `num_shots` is zero
    /// - `rotation` is not one of 0/90/180/270
    /// - `basedir` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shared.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        if self.session.num_shots == 0 {
            return Err(ConfigError::ValidationError(
                "session.num_shots must be at least 1".to_string(),
            ));
        }
        if !matches!(self.camera.rotation, 0 | 90 | 180 | 270) {
            return Err(ConfigError::ValidationError(format!(
                "camera.rotation must be 0/90/180/270, got {}",
                self.camera.rotation
            )));
        }
        if self.storage.basedir.is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.basedir cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Trait for loading configuration from TOML files.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
/// - Returns `ConfigError::ValidationError` if semantic validation fails
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

// Blanket implementation for all types that implement DeserializeOwned.
impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

fn default_num_shots() -> u32 {
    DEFAULT_NUM_SHOTS
}

fn default_greeter_time() -> f64 {
    DEFAULT_GREETER_TIME_S
}

fn default_countdown_time() -> f64 {
    DEFAULT_COUNTDOWN_TIME_S
}

fn default_review_time() -> f64 {
    DEFAULT_REVIEW_TIME_S
}

fn default_true() -> bool {
    true
}

fn default_camera_backend() -> String {
    "dummy".to_string()
}

fn default_lamp_id() -> u8 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn minimal_toml() -> &'static str {
        r#"[shared]
service_name = "booth-test"
"#
    }

    #[test]
    fn load_minimal_config_with_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", minimal_toml()).unwrap();
        file.flush().unwrap();

        let config = BoothConfig::load(file.path()).unwrap();
        assert_eq!(config.shared.log_level, LogLevel::Info);
        assert_eq!(config.session.num_shots, DEFAULT_NUM_SHOTS);
        assert!(config.session.show_preview);
        assert!(config.session.keep_pictures);
        assert!(!config.session.run_on_startup);
        assert_eq!(config.camera.backend, "dummy");
        assert!(!config.relay.enable);
        assert!(config.supervisor.stall_timeout_s.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn load_full_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[shared]
log_level = "debug"
service_name = "booth-01"

[session]
num_shots = 4
countdown_time_s = 3.0
run_on_startup = true

[storage]
basedir = "/tmp/booth"
prefix = "party"

[camera]
backend = "dummy"
rotation = 90

[relay]
enable = true
lamp_id = 2

[supervisor]
stall_timeout_s = 30
"#
        )
        .unwrap();
        file.flush().unwrap();

        let config = BoothConfig::load(file.path()).unwrap();
        assert_eq!(config.shared.log_level, LogLevel::Debug);
        assert_eq!(config.session.num_shots, 4);
        assert!(config.session.run_on_startup);
        assert_eq!(config.storage.prefix, "party");
        assert_eq!(config.camera.rotation, 90);
        assert!(config.relay.enable);
        assert_eq!(config.relay.lamp_id, 2);
        assert_eq!(config.supervisor.stall_timeout_s, Some(30));
        config.validate().unwrap();
    }

    #[test]
    fn file_not_found() {
        let result = BoothConfig::load(Path::new("/nonexistent/photobooth.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound)));
    }

    #[test]
    fn parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "invalid toml {{{{").unwrap();
        let result = BoothConfig::load(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn validation_rejects_zero_shots() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[shared]
service_name = "booth"

[session]
num_shots = 0
"#
        )
        .unwrap();
        file.flush().unwrap();

        let config = BoothConfig::load(file.path()).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn validation_rejects_bad_rotation() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[shared]
service_name = "booth"

[camera]
rotation = 45
"#
        )
        .unwrap();
        file.flush().unwrap();

        let config = BoothConfig::load(file.path()).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn validation_rejects_empty_service_name() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[shared]
service_name = ""
"#
        )
        .unwrap();
        file.flush().unwrap();

        let config = BoothConfig::load(file.path()).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
