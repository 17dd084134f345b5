//! Drive catalog descriptor
//!
//! A `DriveDescriptor` is an immutable snapshot of one physical drive as
//! reported by the platform at enumeration time. The `device_id` is opaque to
//! everything but the device layer, which uses it to open a handle.

use serde::{Deserialize, Serialize};

use crate::util::units::format_gigabytes;

/// Snapshot of one enumerated physical drive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveDescriptor {
    /// Opaque platform identifier, e.g. `\\.\PHYSICALDRIVE0`
    pub device_id: String,
    /// Manufacturer model string; empty when the platform reports none
    pub model: String,
    /// Total capacity in bytes
    pub size_bytes: u64,
    /// Interface label such as "SATA", "USB", "NVMe" or "Unknown"
    pub interface_type: String,
}

impl DriveDescriptor {
    /// Capacity in gigabytes (1 GB = 1024^3 bytes)
    pub fn size_gb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0 * 1024.0)
    }

    /// Full catalog line: id, model, capacity and interface
    pub fn label(&self) -> String {
        format!(
            "{} - {} - {} - {}",
            self.device_id,
            self.model,
            format_gigabytes(self.size_bytes),
            self.interface_type
        )
    }

    /// Compact line for selection prompts: id and model only
    pub fn short_label(&self) -> String {
        format!("{} - {}", self.device_id, self.model)
    }
}
