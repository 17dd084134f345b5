//! Drive catalog module
//!
//! Enumerates the physical drives the host exposes and returns an immutable
//! snapshot per drive. Absent candidates are skipped silently; an empty host
//! yields an empty catalog, not an error.

use crate::models::DriveDescriptor;
use crate::Result;

/// List the physical drives visible to the current process.
///
/// Windows probes the `\\.\PhysicalDriveN` namespace with metadata-only
/// handles, so listing works without administrator rights. The Unix variant
/// exists for development and testing and scans `/sys/block`.
pub fn list_physical_drives() -> Result<Vec<DriveDescriptor>> {
    let mut drives = Vec::new();

    #[cfg(windows)]
    drives.extend(windows_impl::enumerate()?);

    #[cfg(unix)]
    drives.extend(unix_impl::enumerate()?);

    Ok(drives)
}

#[cfg(windows)]
mod windows_impl {
    use super::*;
    use crate::io::ioctl;
    use std::fs::OpenOptions;
    use std::os::windows::fs::OpenOptionsExt;
    use std::os::windows::io::{AsRawHandle, RawHandle};

    const FILE_SHARE_READ: u32 = 0x00000001;
    const FILE_SHARE_WRITE: u32 = 0x00000002;

    /// Highest PhysicalDrive index probed during enumeration
    const MAX_DRIVE_INDEX: u32 = 31;

    pub fn enumerate() -> Result<Vec<DriveDescriptor>> {
        let mut drives = Vec::new();
        for index in 0..=MAX_DRIVE_INDEX {
            let device_id = format!("\\\\.\\PHYSICALDRIVE{}", index);
            match probe_drive(&device_id) {
                Some(descriptor) => drives.push(descriptor),
                None => log::debug!("no drive at {}", device_id),
            }
        }
        Ok(drives)
    }

    fn probe_drive(device_id: &str) -> Option<DriveDescriptor> {
        // Zero desired access: metadata queries succeed where a read open
        // would be denied
        let file = OpenOptions::new()
            .access_mode(0)
            .share_mode(FILE_SHARE_READ | FILE_SHARE_WRITE)
            .open(device_id)
            .ok()?;
        let handle = file.as_raw_handle();

        let size_bytes = disk_size(handle)?;
        let (model, interface_type) = device_identity(handle);

        Some(DriveDescriptor {
            device_id: device_id.to_string(),
            model,
            size_bytes,
            interface_type,
        })
    }

    fn disk_size(handle: RawHandle) -> Option<u64> {
        let mut reply = [0u8; 0x120];
        let len = ioctl::device_io_control(
            handle,
            ioctl::IOCTL_DISK_GET_DRIVE_GEOMETRY_EX,
            &[],
            &mut reply,
        )
        .ok()?;
        ioctl::read_i64_le(&reply[..len], ioctl::GEOMETRY_EX_DISK_SIZE_OFFSET)
            .map(|size| size as u64)
    }

    fn device_identity(handle: RawHandle) -> (String, String) {
        let query = ioctl::storage_property_query();
        let mut reply = vec![0u8; 1024];
        match ioctl::device_io_control(
            handle,
            ioctl::IOCTL_STORAGE_QUERY_PROPERTY,
            &query,
            &mut reply,
        ) {
            Ok(len) => {
                let descriptor = &reply[..len];
                let vendor =
                    ioctl::descriptor_string(descriptor, ioctl::DESCRIPTOR_VENDOR_ID_OFFSET);
                let product =
                    ioctl::descriptor_string(descriptor, ioctl::DESCRIPTOR_PRODUCT_ID_OFFSET);
                let model = match (vendor, product) {
                    (Some(vendor), Some(product)) => format!("{} {}", vendor, product),
                    (None, Some(product)) => product,
                    (Some(vendor), None) => vendor,
                    (None, None) => String::new(),
                };
                let bus = ioctl::read_u32_le(descriptor, ioctl::DESCRIPTOR_BUS_TYPE_OFFSET)
                    .unwrap_or(0);
                (model, ioctl::bus_type_label(bus).to_string())
            }
            Err(err) => {
                log::debug!("storage property query failed: {}", err);
                (String::new(), "Unknown".to_string())
            }
        }
    }
}

#[cfg(unix)]
mod unix_impl {
    use super::*;
    use crate::DriveProbeError;
    use std::fs;
    use std::path::Path;

    /// `/sys/block/<dev>/size` counts 512-byte sectors regardless of the
    /// device's logical sector size
    const SECTOR_SIZE: u64 = 512;

    pub fn enumerate() -> Result<Vec<DriveDescriptor>> {
        let sys_block = Path::new("/sys/block");
        if !sys_block.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(sys_block).map_err(|e| {
            DriveProbeError::Enumeration(format!("Failed to read /sys/block: {}", e))
        })?;

        let mut drives = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_virtual_device(&name) {
                continue;
            }

            let sectors: u64 = match read_sys_value(&entry.path().join("size")) {
                Some(sectors) if sectors > 0 => sectors,
                _ => {
                    log::debug!("skipping {}: no usable size", name);
                    continue;
                }
            };

            let model = fs::read_to_string(entry.path().join("device/model"))
                .map(|s| s.trim().to_string())
                .unwrap_or_default();

            drives.push(DriveDescriptor {
                device_id: format!("/dev/{}", name),
                model,
                size_bytes: sectors * SECTOR_SIZE,
                interface_type: interface_label(&name).to_string(),
            });
        }

        drives.sort_by(|a, b| a.device_id.cmp(&b.device_id));
        Ok(drives)
    }

    /// Kernel-provided devices that are not physical drives
    pub fn is_virtual_device(name: &str) -> bool {
        ["loop", "ram", "zram", "dm-", "md"]
            .iter()
            .any(|prefix| name.starts_with(prefix))
    }

    pub fn interface_label(name: &str) -> &'static str {
        if name.starts_with("nvme") {
            "NVMe"
        } else if name.starts_with("mmcblk") {
            "MMC"
        } else {
            "Unknown"
        }
    }

    fn read_sys_value(path: &Path) -> Option<u64> {
        fs::read_to_string(path).ok()?.trim().parse().ok()
    }
}
