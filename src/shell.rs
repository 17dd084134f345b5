//! Interactive shell module
//!
//! The line-oriented menu loop: list drives, probe a drive, exit. Prompting
//! and printing stay here; everything the user types goes through pure parse
//! functions so validation is testable without a terminal. Invalid input is
//! reported and re-prompted, never fatal.

use std::io::{self, Write};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use rand::{rngs::SmallRng, SeedableRng};
use tokio::sync::mpsc;

use crate::catalog::list_physical_drives;
use crate::config::ProbeConfig;
use crate::io::{create_device_io, DeviceIO};
use crate::models::{DriveDescriptor, SampleResult};
use crate::probe::RandomReadProbe;
use crate::{DriveProbeError, Result};

/// One of the three menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ListDrives,
    ProbeDrive,
    Exit,
}

/// Run the interactive menu until the user exits.
///
/// The configuration is validated before any device is touched; a config
/// that bypassed `validate()` is an error, not a prompt loop. Drives are
/// enumerated once up front; both menu options work from that snapshot.
/// Probe and selection problems are reported and the menu continues; only
/// losing stdin ends the loop early.
pub async fn run_menu(config: &ProbeConfig) -> Result<()> {
    config.validate()?;

    let drives = list_physical_drives()?;
    if drives.is_empty() {
        println!("No physical drives found.");
        return Ok(());
    }

    loop {
        println!("\nSelect an option:");
        println!("1) List physical drives");
        println!("2) Quick random-read test on a drive");
        println!("3) Exit");
        let choice = prompt("Enter choice [1-3]: ")?;

        match parse_menu_choice(&choice) {
            Ok(MenuChoice::ListDrives) => list_drives(&drives),
            Ok(MenuChoice::ProbeDrive) => probe_drive(&drives, config).await?,
            Ok(MenuChoice::Exit) => {
                println!("Exiting.");
                break;
            }
            Err(DriveProbeError::InvalidInput(msg)) => println!("{}", msg),
            Err(err) => return Err(err),
        }
    }

    Ok(())
}

/// Option 1: print the full catalog, one numbered line per drive
fn list_drives(drives: &[DriveDescriptor]) {
    for (index, drive) in drives.iter().enumerate() {
        println!("{}) {}", index + 1, drive.label());
    }
}

/// Option 2: select a drive, choose a sample count, run the probe
async fn probe_drive(drives: &[DriveDescriptor], config: &ProbeConfig) -> Result<()> {
    for (index, drive) in drives.iter().enumerate() {
        println!("{}) {}", index + 1, drive.short_label());
    }

    let selection = prompt(&format!("Select drive [1-{}]: ", drives.len()))?;
    let index = match parse_drive_selection(&selection, drives.len()) {
        Ok(index) => index,
        Err(DriveProbeError::InvalidInput(msg)) => {
            println!("{}", msg);
            return Ok(());
        }
        Err(err) => return Err(err),
    };
    let device_id = drives[index].device_id.clone();

    // Sizing open for the prompt's upper bound; the probe opens its own
    // handle afterwards
    let total_blocks = match query_total_blocks(&device_id, config.block_size) {
        Ok(blocks) => blocks,
        Err(err) => {
            log::debug!("sizing open failed for {}: {}", device_id, err);
            println!("Invalid input or error retrieving drive info.");
            return Ok(());
        }
    };
    println!("Drive total blocks available: {}", total_blocks);

    let max_tests = total_blocks.min(u32::MAX as u64);
    let requested = if max_tests == 0 {
        // No count can be valid here; run with the default and let the
        // probe report the drive as too small
        config.sample_count
    } else {
        loop {
            let raw = prompt(&format!(
                "Enter number of random-read tests [default {}, max {}]: ",
                config.sample_count, max_tests
            ))?;
            match parse_sample_count(&raw, config.sample_count, max_tests) {
                Ok(count) => break count,
                Err(DriveProbeError::InvalidInput(msg)) => println!("{}", msg),
                Err(err) => return Err(err),
            }
        }
    };

    run_probe(&device_id, requested, config.block_size).await
}

/// Run one probe, echoing trace lines above a progress bar, then print the
/// summary. Probe failures go to stderr and control returns to the menu.
async fn run_probe(device_id: &str, requested: u32, block_size: u64) -> Result<()> {
    let probe = RandomReadProbe::new(device_id, requested, block_size)?;
    let (tx, mut rx) = mpsc::channel::<SampleResult>(100);

    let pb = ProgressBar::with_draw_target(Some(requested as u64), ProgressDrawTarget::stdout());
    pb.set_style(ProgressStyle::with_template("{pos}/{len} {bar:30}").unwrap());

    let printer = tokio::spawn(async move {
        while let Some(sample) = rx.recv().await {
            pb.println(sample.trace_line(requested));
            pb.inc(1);
        }
        pb.finish_and_clear();
    });

    let outcome = probe.run(SmallRng::from_entropy(), tx).await;
    printer.await.ok();

    match outcome {
        Ok(summary) => {
            println!("\n{}", summary.report());
        }
        Err(err) => eprintln!("{}", err),
    }
    Ok(())
}

/// Open the device just long enough to learn how many whole blocks it holds
fn query_total_blocks(device_id: &str, block_size: u64) -> io::Result<u64> {
    let device_io = create_device_io();
    let mut handle = device_io.open_read(device_id)?;
    let total_bytes = handle.byte_length()?;
    Ok(total_bytes / block_size)
}

/// Parse a menu selection; surrounding whitespace is ignored
pub fn parse_menu_choice(input: &str) -> Result<MenuChoice> {
    match input.trim() {
        "1" => Ok(MenuChoice::ListDrives),
        "2" => Ok(MenuChoice::ProbeDrive),
        "3" => Ok(MenuChoice::Exit),
        _ => Err(DriveProbeError::InvalidInput(
            "Invalid option, try again.".to_string(),
        )),
    }
}

/// Parse a 1-based drive selection against a catalog of `drive_count` drives.
///
/// Returns the 0-based index. Non-numeric input and out-of-range numbers
/// produce distinct messages, matching what the menu prints.
pub fn parse_drive_selection(input: &str, drive_count: usize) -> Result<usize> {
    let selected: i64 = input.trim().parse().map_err(|_| {
        DriveProbeError::InvalidInput("Invalid input or error retrieving drive info.".to_string())
    })?;
    if selected < 1 || selected as u64 > drive_count as u64 {
        return Err(DriveProbeError::InvalidInput(
            "Invalid selection.".to_string(),
        ));
    }
    Ok((selected - 1) as usize)
}

/// Parse the requested sample count.
///
/// Empty input selects `default`, and every value, the default included,
/// must fall within `1..=max_blocks`. Counts are capped at `u32::MAX` even
/// on drives with more addressable blocks.
pub fn parse_sample_count(input: &str, default: u32, max_blocks: u64) -> Result<u32> {
    let max = max_blocks.min(u32::MAX as u64);
    let trimmed = input.trim();

    let value: i64 = if trimmed.is_empty() {
        i64::from(default)
    } else {
        trimmed.parse().map_err(|_| {
            DriveProbeError::InvalidInput("Invalid number. Please enter an integer.".to_string())
        })?
    };

    if value < 1 || value as u64 > max {
        return Err(DriveProbeError::InvalidInput(format!(
            "Please enter a number between 1 and {}.",
            max
        )));
    }
    Ok(value as u32)
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut input = String::new();
    let bytes = io::stdin().read_line(&mut input)?;
    if bytes == 0 {
        return Err(DriveProbeError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "stdin closed",
        )));
    }
    Ok(input)
}
