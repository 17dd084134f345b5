//! Probe sample data models
//!
//! Contains the per-attempt record produced by the random-read sampler and
//! the running summary aggregated over a whole probe. A sample is created
//! once, streamed to the consumer, and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::util::units::{format_millis, format_throughput_mib};

/// Outcome of a single random-read attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SampleOutcome {
    /// The read completed; short reads report the actual count
    Success {
        /// Bytes actually returned by the read call
        bytes_read: u64,
        /// Wall-clock time of the read call alone (positioning excluded)
        #[serde(with = "duration_serde")]
        elapsed: Duration,
    },
    /// Positioning or reading failed; the probe continues with the next block
    Failed {
        /// Operating system error message for the failed call
        error: String,
    },
}

/// Record of one random-read attempt against a drive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleResult {
    /// 1-based attempt number within the probe
    pub attempt: u32,
    /// Block index drawn from `[0, max_blocks)`
    pub block_index: u64,
    /// Byte offset of the block (`block_index * block_size`)
    pub offset: u64,
    /// Offset as a percentage of total drive capacity
    pub percent_of_drive: f64,
    /// What happened when the block was read
    pub outcome: SampleOutcome,
}

impl SampleResult {
    /// Render the progressive trace line for this sample.
    ///
    /// `requested` is the total attempt count of the probe, shown as the
    /// denominator of the `[i/N]` prefix.
    pub fn trace_line(&self, requested: u32) -> String {
        match &self.outcome {
            SampleOutcome::Success {
                bytes_read,
                elapsed,
            } => format!(
                "[{}/{}] Block {} (~{:.1}%): Read {} bytes in {}",
                self.attempt,
                requested,
                self.block_index,
                self.percent_of_drive,
                bytes_read,
                format_millis(*elapsed)
            ),
            SampleOutcome::Failed { error } => format!(
                "[{}/{}] Block {} (~{:.1}%): Error reading block: {}",
                self.attempt, requested, self.block_index, self.percent_of_drive, error
            ),
        }
    }

    /// Whether this sample completed its read call
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, SampleOutcome::Success { .. })
    }
}

/// Aggregated outcome of a completed probe
///
/// Byte and time totals accumulate successful samples only, so the derived
/// latency and throughput figures describe the reads that actually completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeSummary {
    /// Attempts the probe was asked to perform
    pub requested: u32,
    /// Attempts whose read call completed
    pub successes: u32,
    /// Attempts that failed to position or read
    pub failures: u32,
    /// Total bytes returned by successful reads
    pub bytes_read: u64,
    /// Total wall-clock time spent inside successful read calls
    #[serde(with = "duration_serde")]
    pub read_time: Duration,
}

impl ProbeSummary {
    /// Create an empty summary for a probe of `requested` attempts
    pub fn new(requested: u32) -> Self {
        Self {
            requested,
            successes: 0,
            failures: 0,
            bytes_read: 0,
            read_time: Duration::ZERO,
        }
    }

    /// Fold one sample into the running totals
    pub fn record(&mut self, sample: &SampleResult) {
        match &sample.outcome {
            SampleOutcome::Success {
                bytes_read,
                elapsed,
            } => {
                self.successes += 1;
                self.bytes_read += bytes_read;
                self.read_time += *elapsed;
            }
            SampleOutcome::Failed { .. } => {
                self.failures += 1;
            }
        }
    }

    /// Fraction of attempts that succeeded, in percent
    pub fn success_rate(&self) -> f64 {
        if self.requested == 0 {
            return 0.0;
        }
        self.successes as f64 / self.requested as f64 * 100.0
    }

    /// Mean read latency, `None` when no read succeeded
    pub fn avg_latency(&self) -> Option<Duration> {
        if self.successes == 0 {
            None
        } else {
            Some(self.read_time / self.successes)
        }
    }

    /// Mean throughput in MiB/s over successful reads, `None` when no read
    /// succeeded
    pub fn avg_throughput_mib(&self) -> Option<f64> {
        if self.successes == 0 {
            return None;
        }
        let elapsed_secs = self.read_time.as_secs_f64();
        if elapsed_secs > 0.0 {
            Some(self.bytes_read as f64 / (1024.0 * 1024.0) / elapsed_secs)
        } else {
            Some(0.0)
        }
    }

    /// Render the human-readable end-of-probe report.
    ///
    /// Latency and throughput lines are omitted entirely when no read
    /// succeeded; a rate of zero is still reported.
    pub fn report(&self) -> String {
        let mut out = format!(
            "Success rate: {}/{} ({:.1}%)",
            self.successes,
            self.requested,
            self.success_rate()
        );
        if let Some(avg) = self.avg_latency() {
            out.push_str(&format!("\nAverage latency: {}", format_millis(avg)));
        }
        if let Some(throughput) = self.avg_throughput_mib() {
            out.push_str(&format!(
                "\nAverage throughput: {}",
                format_throughput_mib(throughput)
            ));
        }
        out
    }
}

// Custom serde module for Duration serialization
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_nanos().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = u128::deserialize(deserializer)?;
        Ok(Duration::from_nanos(nanos as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success_sample(attempt: u32, bytes_read: u64, elapsed: Duration) -> SampleResult {
        SampleResult {
            attempt,
            block_index: 0,
            offset: 0,
            percent_of_drive: 0.0,
            outcome: SampleOutcome::Success {
                bytes_read,
                elapsed,
            },
        }
    }

    fn failed_sample(attempt: u32, error: &str) -> SampleResult {
        SampleResult {
            attempt,
            block_index: 0,
            offset: 0,
            percent_of_drive: 0.0,
            outcome: SampleOutcome::Failed {
                error: error.to_string(),
            },
        }
    }

    #[test]
    fn test_trace_line_success_format() {
        let sample = SampleResult {
            attempt: 3,
            block_index: 17,
            offset: 17 * 4096,
            percent_of_drive: 42.666,
            outcome: SampleOutcome::Success {
                bytes_read: 4096,
                elapsed: Duration::from_micros(1234),
            },
        };
        assert_eq!(
            sample.trace_line(25),
            "[3/25] Block 17 (~42.7%): Read 4096 bytes in 1.23 ms"
        );
    }

    #[test]
    fn test_trace_line_failure_format() {
        let sample = SampleResult {
            attempt: 5,
            block_index: 2,
            offset: 8192,
            percent_of_drive: 10.0,
            outcome: SampleOutcome::Failed {
                error: "The device is not ready.".to_string(),
            },
        };
        assert_eq!(
            sample.trace_line(5),
            "[5/5] Block 2 (~10.0%): Error reading block: The device is not ready."
        );
    }

    #[test]
    fn test_summary_two_reads_exact_numbers() {
        // Two 4096-byte reads taking 1 ms and 2 ms: 8192 bytes over 3 ms.
        let mut summary = ProbeSummary::new(2);
        summary.record(&success_sample(1, 4096, Duration::from_millis(1)));
        summary.record(&success_sample(2, 4096, Duration::from_millis(2)));

        assert_eq!(summary.successes, 2);
        assert_eq!(summary.failures, 0);
        assert_eq!(summary.bytes_read, 8192);
        assert_eq!(summary.avg_latency(), Some(Duration::from_micros(1500)));

        // 8192 B / 1 MiB / 0.003 s = 2.6041... MiB/s
        let throughput = summary.avg_throughput_mib().unwrap();
        assert!((throughput - 2.604_166).abs() < 0.001);

        let report = summary.report();
        assert!(report.contains("Success rate: 2/2 (100.0%)"));
        assert!(report.contains("Average latency: 1.50 ms"));
        assert!(report.contains("Average throughput: 2.60 MiB/s"));
    }

    #[test]
    fn test_summary_mixed_outcomes() {
        let mut summary = ProbeSummary::new(5);
        summary.record(&success_sample(1, 4096, Duration::from_millis(1)));
        summary.record(&success_sample(2, 4096, Duration::from_millis(1)));
        summary.record(&failed_sample(3, "boom"));
        summary.record(&success_sample(4, 4096, Duration::from_millis(1)));
        summary.record(&failed_sample(5, "boom"));

        assert_eq!(summary.successes, 3);
        assert_eq!(summary.failures, 2);
        assert_eq!(summary.bytes_read, 3 * 4096);
        assert_eq!(summary.read_time, Duration::from_millis(3));
        assert!(summary.report().contains("Success rate: 3/5 (60.0%)"));
    }

    #[test]
    fn test_summary_zero_successes_omits_averages() {
        let mut summary = ProbeSummary::new(3);
        for attempt in 1..=3 {
            summary.record(&failed_sample(attempt, "io error"));
        }

        assert_eq!(summary.avg_latency(), None);
        assert_eq!(summary.avg_throughput_mib(), None);

        let report = summary.report();
        assert_eq!(report, "Success rate: 0/3 (0.0%)");
        assert!(!report.contains("Average latency"));
        assert!(!report.contains("Average throughput"));
    }

    #[test]
    fn test_success_rate_one_decimal() {
        let mut summary = ProbeSummary::new(3);
        summary.record(&success_sample(1, 4096, Duration::from_millis(1)));
        // 1/3 = 33.333...% renders as 33.3%
        assert!(summary.report().contains("(33.3%)"));
    }

    #[test]
    fn test_short_read_counts_actual_bytes() {
        let mut summary = ProbeSummary::new(1);
        summary.record(&success_sample(1, 512, Duration::from_millis(1)));
        assert_eq!(summary.successes, 1);
        assert_eq!(summary.bytes_read, 512);
    }

    #[test]
    fn test_sample_serde_round_trip() {
        let sample = success_sample(7, 4096, Duration::from_nanos(123_456_789));
        let json = serde_json::to_string(&sample).expect("Failed to serialize to JSON");
        let back: SampleResult = serde_json::from_str(&json).expect("Failed to deserialize");
        assert_eq!(sample, back);

        let failed = failed_sample(8, "Access is denied.");
        let json = serde_json::to_string(&failed).unwrap();
        let back: SampleResult = serde_json::from_str(&json).unwrap();
        assert_eq!(failed, back);
    }
}
