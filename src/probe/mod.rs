//! Probe engine module
//!
//! Contains the random-read sampling logic that turns an opened device into
//! a stream of timed samples and a final summary.

pub mod random_read;

// Re-export commonly used types
pub use random_read::RandomReadProbe;
