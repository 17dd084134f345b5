//! Win32 device control plumbing
//!
//! Control codes, reply layouts and string extraction for the three device
//! queries the tool issues: total byte length of an opened device, drive
//! geometry, and the storage device descriptor (model and bus type). The
//! `DeviceIoControl` binding is declared inline; reply parsing is plain byte
//! slicing so it stays testable off Windows.

/// `IOCTL_DISK_GET_LENGTH_INFO`: 8-byte total length of the opened device.
/// Requires a handle opened with read access.
pub const IOCTL_DISK_GET_LENGTH_INFO: u32 = 0x0007405C;

/// `IOCTL_DISK_GET_DRIVE_GEOMETRY_EX`: geometry plus disk size. Works on
/// handles opened with no access rights, which keeps enumeration usable
/// without administrator privileges.
pub const IOCTL_DISK_GET_DRIVE_GEOMETRY_EX: u32 = 0x000700A0;

/// `IOCTL_STORAGE_QUERY_PROPERTY`: returns a `STORAGE_DEVICE_DESCRIPTOR`.
pub const IOCTL_STORAGE_QUERY_PROPERTY: u32 = 0x002D1400;

/// Byte offset of `DiskSize` within the `DISK_GEOMETRY_EX` reply
pub const GEOMETRY_EX_DISK_SIZE_OFFSET: usize = 24;

// STORAGE_DEVICE_DESCRIPTOR field offsets
pub const DESCRIPTOR_VENDOR_ID_OFFSET: usize = 12;
pub const DESCRIPTOR_PRODUCT_ID_OFFSET: usize = 16;
pub const DESCRIPTOR_BUS_TYPE_OFFSET: usize = 28;

/// Build the 12-byte `STORAGE_PROPERTY_QUERY` input asking for the standard
/// storage device property. Both fields are zero (`StorageDeviceProperty`,
/// `PropertyStandardQuery`).
pub fn storage_property_query() -> [u8; 12] {
    [0u8; 12]
}

/// Read a little-endian u32 out of a reply buffer
pub fn read_u32_le(buf: &[u8], offset: usize) -> Option<u32> {
    let bytes = buf.get(offset..offset + 4)?;
    Some(u32::from_le_bytes(bytes.try_into().ok()?))
}

/// Read a little-endian i64 out of a reply buffer
pub fn read_i64_le(buf: &[u8], offset: usize) -> Option<i64> {
    let bytes = buf.get(offset..offset + 8)?;
    Some(i64::from_le_bytes(bytes.try_into().ok()?))
}

/// Extract a descriptor string field.
///
/// `offset_field` is the byte position of the u32 that holds the string's
/// offset within the descriptor buffer. A zero or out-of-range offset means
/// the device did not report the field; the string itself is NUL-terminated
/// and often padded with spaces, which are trimmed.
pub fn descriptor_string(descriptor: &[u8], offset_field: usize) -> Option<String> {
    let start = read_u32_le(descriptor, offset_field)? as usize;
    if start == 0 || start >= descriptor.len() {
        return None;
    }
    let tail = &descriptor[start..];
    let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    let text = String::from_utf8_lossy(&tail[..end]).trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Map a `STORAGE_BUS_TYPE` value to the interface label shown in the catalog
pub fn bus_type_label(bus_type: u32) -> &'static str {
    match bus_type {
        1 => "SCSI",
        2 => "ATAPI",
        3 => "ATA",
        4 => "1394",
        5 => "SSA",
        6 => "Fibre",
        7 => "USB",
        8 => "RAID",
        9 => "iSCSI",
        10 => "SAS",
        11 => "SATA",
        12 => "SD",
        13 => "MMC",
        14 | 15 => "Virtual",
        16 => "Spaces",
        17 => "NVMe",
        _ => "Unknown",
    }
}

#[cfg(windows)]
mod windows_impl {
    use std::ffi::c_void;
    use std::io;
    use std::os::windows::io::RawHandle;

    extern "system" {
        fn DeviceIoControl(
            h_device: RawHandle,
            dw_io_control_code: u32,
            lp_in_buffer: *const c_void,
            n_in_buffer_size: u32,
            lp_out_buffer: *mut c_void,
            n_out_buffer_size: u32,
            lp_bytes_returned: *mut u32,
            lp_overlapped: *mut c_void,
        ) -> i32;
    }

    /// Issue a synchronous device control request and return the reply size
    pub fn device_io_control(
        handle: RawHandle,
        control_code: u32,
        input: &[u8],
        output: &mut [u8],
    ) -> io::Result<usize> {
        let mut bytes_returned: u32 = 0;
        let ok = unsafe {
            DeviceIoControl(
                handle,
                control_code,
                input.as_ptr() as *const c_void,
                input.len() as u32,
                output.as_mut_ptr() as *mut c_void,
                output.len() as u32,
                &mut bytes_returned,
                std::ptr::null_mut(),
            )
        };
        if ok == 0 {
            Err(io::Error::last_os_error())
        } else {
            Ok(bytes_returned as usize)
        }
    }
}

#[cfg(windows)]
pub use windows_impl::device_io_control;
