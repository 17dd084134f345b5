//! driveprobe - physical drive random-read probe
//!
//! An interactive Windows CLI that lists physical disk drives and measures
//! random-read latency and throughput against a selected drive.

use std::fmt;

// Public re-exports
pub mod catalog;
pub mod config;
pub mod io;
pub mod models;
pub mod probe;
pub mod shell;
pub mod util;

// Common error types
#[derive(Debug)]
pub enum DriveProbeError {
    /// Running on a platform the tool does not support
    Unsupported(String),
    /// Drive catalog enumeration failed
    Enumeration(String),
    /// Opening a device handle failed
    DeviceOpen(String),
    /// Querying an opened device (e.g. its byte length) failed
    DeviceQuery(String),
    /// Device is smaller than a single probe block
    DriveTooSmall(String),
    /// User input failed validation
    InvalidInput(String),
    /// Configuration validation or parsing error
    Config(String),
    /// I/O operation failed
    Io(std::io::Error),
}

impl fmt::Display for DriveProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriveProbeError::Unsupported(msg) => write!(f, "Unsupported platform: {}", msg),
            DriveProbeError::Enumeration(msg) => write!(f, "Drive enumeration error: {}", msg),
            DriveProbeError::DeviceOpen(msg) => write!(f, "Device open error: {}", msg),
            DriveProbeError::DeviceQuery(msg) => write!(f, "Device query error: {}", msg),
            DriveProbeError::DriveTooSmall(msg) => write!(f, "Drive too small: {}", msg),
            DriveProbeError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            DriveProbeError::Config(msg) => write!(f, "Configuration error: {}", msg),
            DriveProbeError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for DriveProbeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DriveProbeError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DriveProbeError {
    fn from(err: std::io::Error) -> Self {
        DriveProbeError::Io(err)
    }
}

impl From<toml::de::Error> for DriveProbeError {
    fn from(err: toml::de::Error) -> Self {
        DriveProbeError::Config(format!("TOML parsing error: {}", err))
    }
}

impl From<toml::ser::Error> for DriveProbeError {
    fn from(err: toml::ser::Error) -> Self {
        DriveProbeError::Config(format!("TOML serialization error: {}", err))
    }
}

/// Result type alias for driveprobe operations
pub type Result<T> = std::result::Result<T, DriveProbeError>;

/// Verify that the process is running on a Windows host.
///
/// Physical drives are addressed through the `\\.\PhysicalDriveN` device
/// namespace, so the binary refuses to start anywhere else. The check is a
/// runtime one: the library itself builds and tests on any platform.
pub fn ensure_windows_host() -> Result<()> {
    if cfg!(windows) {
        Ok(())
    } else {
        Err(DriveProbeError::Unsupported(
            "physical drive access requires Windows".to_string(),
        ))
    }
}

// Common types and constants
pub const APP_NAME: &str = "driveprobe";
pub const CONFIG_FILE: &str = "driveprobe.toml";
/// Bytes read per probe sample unless overridden by configuration.
pub const DEFAULT_BLOCK_SIZE: u64 = 4096;
/// Random-read attempts per probe unless the user chooses otherwise.
pub const DEFAULT_SAMPLE_COUNT: u32 = 25;
