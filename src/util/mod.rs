//! Utility functions module
//!
//! Contains the display formatting helpers shared by the drive catalog,
//! the sample trace and the probe summary.

pub mod units;

// Re-export commonly used functions
pub use units::{format_gigabytes, format_millis, format_throughput_mib};
