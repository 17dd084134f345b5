//! Data models module
//!
//! Contains drive catalog descriptors, per-sample probe records, and the
//! aggregated probe summary.

pub mod drive;
pub mod sample;

// Re-export commonly used types
pub use drive::DriveDescriptor;
pub use sample::{ProbeSummary, SampleOutcome, SampleResult};
