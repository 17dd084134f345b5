//! Random-read probe
//!
//! Issues a fixed number of single-block reads at uniformly random block
//! offsets against one device, timing each read call alone, and streams
//! every sample as it completes. Reads are strictly sequential and the probe
//! holds exactly one device handle, released on every exit path when the
//! handle is dropped.

use crate::io::device::{DeviceHandle, DeviceIO, PlatformDeviceIO};
use crate::models::{ProbeSummary, SampleOutcome, SampleResult};
use crate::{DriveProbeError, Result};
use rand::Rng;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Random-read probe executor
pub struct RandomReadProbe {
    device: String,
    samples: u32,
    block_size: u64,
    device_io: Arc<dyn DeviceIO + Send + Sync>,
}

impl RandomReadProbe {
    /// Create a probe against the platform device layer
    pub fn new(device: impl Into<String>, samples: u32, block_size: u64) -> Result<Self> {
        Self::with_device_io(device, samples, block_size, PlatformDeviceIO::new())
    }

    /// Create a probe reading through a caller-supplied device provider.
    ///
    /// Tests inject scripted fakes here; everything above the `DeviceIO`
    /// seam runs unchanged against them.
    pub fn with_device_io(
        device: impl Into<String>,
        samples: u32,
        block_size: u64,
        device_io: impl DeviceIO + Send + Sync + 'static,
    ) -> Result<Self> {
        if samples == 0 {
            return Err(DriveProbeError::InvalidInput(
                "sample count must be at least 1".to_string(),
            ));
        }
        if block_size == 0 {
            return Err(DriveProbeError::InvalidInput(
                "block size must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            device: device.into(),
            samples,
            block_size,
            device_io: Arc::new(device_io),
        })
    }

    /// Execute the probe, streaming one `SampleResult` per attempt.
    ///
    /// The random source is supplied by the caller so runs can be replayed
    /// with a seeded generator. Per-attempt seek or read failures become
    /// `Failed` samples and the probe continues; only opening the device,
    /// querying its length, or a drive smaller than one block abort the run.
    pub async fn run<R>(
        &self,
        mut rng: R,
        trace_tx: mpsc::Sender<SampleResult>,
    ) -> Result<ProbeSummary>
    where
        R: Rng + Send,
    {
        let mut handle = self
            .device_io
            .open_read(&self.device)
            .map_err(|e| DriveProbeError::DeviceOpen(format!("{}: {}", self.device, e)))?;

        let total_bytes = handle
            .byte_length()
            .map_err(|e| DriveProbeError::DeviceQuery(format!("{}: {}", self.device, e)))?;

        let max_blocks = total_bytes / self.block_size;
        if max_blocks == 0 {
            return Err(DriveProbeError::DriveTooSmall(format!(
                "{} holds {} bytes, less than one {}-byte block",
                self.device, total_bytes, self.block_size
            )));
        }

        let mut summary = ProbeSummary::new(self.samples);
        let mut buffer = vec![0u8; self.block_size as usize];

        for attempt in 1..=self.samples {
            let block_index = rng.gen_range(0..max_blocks);
            let offset = block_index * self.block_size;
            let percent_of_drive = offset as f64 / total_bytes as f64 * 100.0;

            let outcome = read_one_block(handle.as_mut(), offset, &mut buffer);

            let sample = SampleResult {
                attempt,
                block_index,
                offset,
                percent_of_drive,
                outcome,
            };
            summary.record(&sample);
            // A dropped receiver only silences the trace; the probe still
            // runs to completion and returns its summary
            let _ = trace_tx.send(sample).await;
        }

        Ok(summary)
    }
}

// The device provider is a trait object without a Debug form of its own
impl fmt::Debug for RandomReadProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomReadProbe")
            .field("device", &self.device)
            .field("samples", &self.samples)
            .field("block_size", &self.block_size)
            .finish_non_exhaustive()
    }
}

/// Position the cursor and read a single block, timing the read call alone
fn read_one_block(handle: &mut dyn DeviceHandle, offset: u64, buffer: &mut [u8]) -> SampleOutcome {
    if let Err(err) = handle.seek_to(offset) {
        return SampleOutcome::Failed {
            error: err.to_string(),
        };
    }

    let read_start = Instant::now();
    match handle.read_block(buffer) {
        Ok(bytes_read) => SampleOutcome::Success {
            bytes_read: bytes_read as u64,
            elapsed: read_start.elapsed(),
        },
        Err(err) => SampleOutcome::Failed {
            error: err.to_string(),
        },
    }
}
