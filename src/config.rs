//! Configuration management module
//!
//! Handles loading, saving, and validation of the probe defaults. The config
//! file is the only file the tool ever touches; probe results are printed,
//! never persisted.

use crate::{
    DriveProbeError, Result, APP_NAME, CONFIG_FILE, DEFAULT_BLOCK_SIZE, DEFAULT_SAMPLE_COUNT,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Probe configuration: block size and the default sample count offered in
/// the interactive prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Bytes read per sample
    pub block_size: u64,
    /// Default number of random-read attempts per probe
    pub sample_count: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            sample_count: DEFAULT_SAMPLE_COUNT,
        }
    }
}

impl ProbeConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the block size for probe reads
    pub fn with_block_size(mut self, size: u64) -> Self {
        self.block_size = size;
        self
    }

    /// Set the default sample count
    pub fn with_sample_count(mut self, count: u32) -> Self {
        self.sample_count = count;
        self
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(DriveProbeError::Config(
                "Block size must be greater than 0".to_string(),
            ));
        }

        // Raw device reads fail unless offsets and lengths are sector
        // multiples, so only power-of-two sizes from one sector up are
        // accepted
        if !self.block_size.is_power_of_two() {
            return Err(DriveProbeError::Config(
                "Block size must be a power of 2".to_string(),
            ));
        }

        const MIN_BLOCK_SIZE: u64 = 512;
        const MAX_BLOCK_SIZE: u64 = 1024 * 1024; // 1 MiB
        if self.block_size < MIN_BLOCK_SIZE || self.block_size > MAX_BLOCK_SIZE {
            return Err(DriveProbeError::Config(format!(
                "Block size must be between {} and {} bytes",
                MIN_BLOCK_SIZE, MAX_BLOCK_SIZE
            )));
        }

        if self.sample_count == 0 {
            return Err(DriveProbeError::Config(
                "Sample count must be greater than 0".to_string(),
            ));
        }

        const MAX_SAMPLE_COUNT: u32 = 100_000;
        if self.sample_count > MAX_SAMPLE_COUNT {
            return Err(DriveProbeError::Config(format!(
                "Too many samples: {} (max: {})",
                self.sample_count, MAX_SAMPLE_COUNT
            )));
        }

        Ok(())
    }

    /// Load configuration from the standard config file location
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| {
            DriveProbeError::Config(format!(
                "Failed to read config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            DriveProbeError::Config(format!(
                "Failed to parse config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to the standard config file location
    pub fn save(&self) -> Result<()> {
        self.validate()?;

        let config_path = Self::config_file_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DriveProbeError::Config(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            DriveProbeError::Config(format!("Failed to serialize configuration: {}", e))
        })?;

        fs::write(&config_path, content).map_err(|e| {
            DriveProbeError::Config(format!(
                "Failed to write config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Get the standard configuration file path
    /// Uses $CONFIG_HOME/driveprobe/driveprobe.toml
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            DriveProbeError::Config("Unable to determine config directory".to_string())
        })?;

        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProbeConfig::default();
        assert_eq!(config.block_size, 4096);
        assert_eq!(config.sample_count, 25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_samples() {
        let config = ProbeConfig::new().with_sample_count(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_power_of_two_block() {
        let config = ProbeConfig::new().with_block_size(4000);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_block_size_out_of_range() {
        assert!(ProbeConfig::new().with_block_size(256).validate().is_err());
        assert!(ProbeConfig::new()
            .with_block_size(2 * 1024 * 1024)
            .validate()
            .is_err());
        assert!(ProbeConfig::new().with_block_size(512).validate().is_ok());
        assert!(ProbeConfig::new()
            .with_block_size(1024 * 1024)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_toml_serialization() {
        let config = ProbeConfig::new()
            .with_block_size(8192)
            .with_sample_count(50);
        let toml_str = toml::to_string(&config).expect("Failed to serialize to TOML");
        let deserialized: ProbeConfig =
            toml::from_str(&toml_str).expect("Failed to deserialize from TOML");

        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_config_file_path() {
        let path = ProbeConfig::config_file_path();
        assert!(path.is_ok());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("driveprobe"));
        assert!(path.to_string_lossy().contains("driveprobe.toml"));
    }
}
