//! Units formatting utilities
//!
//! Provides the fixed display formats used across the catalog listing,
//! the per-sample trace and the probe summary.

use std::time::Duration;

/// Format a byte count as gigabytes with two decimals (1 GB = 1024^3 bytes)
///
/// # Examples
/// ```
/// use driveprobe::util::units::format_gigabytes;
///
/// assert_eq!(format_gigabytes(1073741824), "1.00 GB");
/// assert_eq!(format_gigabytes(500107862016), "465.76 GB");
/// ```
pub fn format_gigabytes(bytes: u64) -> String {
    format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
}

/// Format a duration as milliseconds with two decimals
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use driveprobe::util::units::format_millis;
///
/// assert_eq!(format_millis(Duration::from_millis(5)), "5.00 ms");
/// assert_eq!(format_millis(Duration::from_micros(1500)), "1.50 ms");
/// ```
pub fn format_millis(duration: Duration) -> String {
    format!("{:.2} ms", duration.as_secs_f64() * 1000.0)
}

/// Format a MiB/s throughput figure with two decimals
///
/// # Examples
/// ```
/// use driveprobe::util::units::format_throughput_mib;
///
/// assert_eq!(format_throughput_mib(2.604), "2.60 MiB/s");
/// assert_eq!(format_throughput_mib(0.0), "0.00 MiB/s");
/// ```
pub fn format_throughput_mib(mib_per_sec: f64) -> String {
    format!("{:.2} MiB/s", mib_per_sec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_gigabytes() {
        assert_eq!(format_gigabytes(0), "0.00 GB");
        assert_eq!(format_gigabytes(1024 * 1024 * 1024), "1.00 GB");
        assert_eq!(format_gigabytes(512 * 1024 * 1024), "0.50 GB");
        assert_eq!(format_gigabytes(500_107_862_016), "465.76 GB");
    }

    #[test]
    fn test_format_millis() {
        assert_eq!(format_millis(Duration::ZERO), "0.00 ms");
        assert_eq!(format_millis(Duration::from_micros(1234)), "1.23 ms");
        assert_eq!(format_millis(Duration::from_micros(1500)), "1.50 ms");
        assert_eq!(format_millis(Duration::from_secs(2)), "2000.00 ms");
    }

    #[test]
    fn test_format_throughput_mib() {
        assert_eq!(format_throughput_mib(2.604_166), "2.60 MiB/s");
        assert_eq!(format_throughput_mib(120.0), "120.00 MiB/s");
    }
}
