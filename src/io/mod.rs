//! I/O operations module
//!
//! Contains the device handle abstraction the sampler reads through and the
//! Win32 device-control plumbing shared with the drive catalog.

pub mod device;
pub mod ioctl;

pub use device::{create_device_io, DeviceHandle, DeviceIO, PlatformDeviceIO};
