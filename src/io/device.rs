use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom};

/// Device handle provider trait
///
/// The sampler never opens devices itself; it goes through this seam so tests
/// can substitute scripted fakes for real drives.
pub trait DeviceIO {
    /// Open a device (or file) for shared, read-only block access
    fn open_read(&self, device: &str) -> io::Result<Box<dyn DeviceHandle>>;
}

/// An open read-only device handle
///
/// The underlying OS handle is released when the box is dropped; there is no
/// explicit close call, so every exit path releases exactly once.
pub trait DeviceHandle: Send + Sync {
    /// Total addressable length of the device in bytes
    fn byte_length(&mut self) -> io::Result<u64>;

    /// Position the cursor at an absolute byte offset
    fn seek_to(&mut self, offset: u64) -> io::Result<u64>;

    /// Issue a single read at the current position.
    ///
    /// Returns the byte count the OS actually delivered; callers treat short
    /// reads as data, not as errors, and never retry.
    fn read_block(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Platform-specific device I/O implementation
#[derive(Clone)]
pub struct PlatformDeviceIO;

impl PlatformDeviceIO {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlatformDeviceIO {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(windows)]
mod windows_impl {
    use super::*;
    use crate::io::ioctl;
    use std::os::windows::fs::OpenOptionsExt;
    use std::os::windows::io::AsRawHandle;

    const FILE_SHARE_READ: u32 = 0x00000001;
    const FILE_SHARE_WRITE: u32 = 0x00000002;

    pub struct WindowsDeviceHandle {
        file: File,
    }

    impl WindowsDeviceHandle {
        pub fn new(file: File) -> Self {
            Self { file }
        }
    }

    impl DeviceHandle for WindowsDeviceHandle {
        fn byte_length(&mut self) -> io::Result<u64> {
            let mut reply = [0u8; 8];
            match ioctl::device_io_control(
                self.file.as_raw_handle(),
                ioctl::IOCTL_DISK_GET_LENGTH_INFO,
                &[],
                &mut reply,
            ) {
                Ok(len) => {
                    let length = ioctl::read_i64_le(&reply[..len], 0).ok_or_else(|| {
                        io::Error::new(
                            io::ErrorKind::InvalidData,
                            "short IOCTL_DISK_GET_LENGTH_INFO reply",
                        )
                    })?;
                    Ok(length as u64)
                }
                Err(_) => {
                    // Regular files reject the disk control code; measure by
                    // seeking to the end instead
                    let len = self.file.seek(SeekFrom::End(0))?;
                    self.file.seek(SeekFrom::Start(0))?;
                    Ok(len)
                }
            }
        }

        fn seek_to(&mut self, offset: u64) -> io::Result<u64> {
            self.file.seek(SeekFrom::Start(offset))
        }

        fn read_block(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.file.read(buf)
        }
    }

    impl DeviceIO for PlatformDeviceIO {
        fn open_read(&self, device: &str) -> io::Result<Box<dyn DeviceHandle>> {
            // Both share flags so a mounted volume stays usable while probed
            let file = OpenOptions::new()
                .read(true)
                .share_mode(FILE_SHARE_READ | FILE_SHARE_WRITE)
                .open(device)?;
            Ok(Box::new(WindowsDeviceHandle::new(file)))
        }
    }
}

#[cfg(unix)]
mod unix_impl {
    use super::*;

    pub struct UnixDeviceHandle {
        file: File,
    }

    impl UnixDeviceHandle {
        pub fn new(file: File) -> Self {
            Self { file }
        }
    }

    impl DeviceHandle for UnixDeviceHandle {
        fn byte_length(&mut self) -> io::Result<u64> {
            // Works for block devices and plain files alike
            let len = self.file.seek(SeekFrom::End(0))?;
            self.file.seek(SeekFrom::Start(0))?;
            Ok(len)
        }

        fn seek_to(&mut self, offset: u64) -> io::Result<u64> {
            self.file.seek(SeekFrom::Start(offset))
        }

        fn read_block(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.file.read(buf)
        }
    }

    impl DeviceIO for PlatformDeviceIO {
        fn open_read(&self, device: &str) -> io::Result<Box<dyn DeviceHandle>> {
            let file = OpenOptions::new().read(true).open(device)?;
            Ok(Box::new(UnixDeviceHandle::new(file)))
        }
    }
}

// Re-export platform-specific implementations
#[cfg(windows)]
pub use windows_impl::*;

#[cfg(unix)]
pub use unix_impl::*;

/// Create a new platform-specific device I/O instance
pub fn create_device_io() -> impl DeviceIO {
    PlatformDeviceIO::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn create_test_device(content: &[u8]) -> (tempfile::TempDir, String) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("device.bin");
        let mut file = File::create(&path).unwrap();
        file.write_all(content).unwrap();
        file.sync_all().unwrap();
        (dir, path.to_string_lossy().into_owned())
    }

    #[test]
    fn test_byte_length_reports_file_size() {
        let (_dir, path) = create_test_device(&[0xAB; 8192]);
        let device_io = create_device_io();

        let mut handle = device_io.open_read(&path).unwrap();
        assert_eq!(handle.byte_length().unwrap(), 8192);
    }

    #[test]
    fn test_byte_length_leaves_cursor_at_start() {
        let (_dir, path) = create_test_device(b"0123456789");
        let device_io = create_device_io();

        let mut handle = device_io.open_read(&path).unwrap();
        handle.byte_length().unwrap();

        let mut buf = [0u8; 4];
        let n = handle.read_block(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"0123");
    }

    #[test]
    fn test_seek_and_read_round_trip() {
        let (_dir, path) = create_test_device(b"0123456789");
        let device_io = create_device_io();

        let mut handle = device_io.open_read(&path).unwrap();
        assert_eq!(handle.seek_to(4).unwrap(), 4);

        let mut buf = [0u8; 4];
        let n = handle.read_block(&mut buf).unwrap();
        assert_eq!(n, 4);
        assert_eq!(&buf[..n], b"4567");
    }

    #[test]
    fn test_short_read_near_end() {
        let (_dir, path) = create_test_device(b"0123456789");
        let device_io = create_device_io();

        let mut handle = device_io.open_read(&path).unwrap();
        handle.seek_to(8).unwrap();

        let mut buf = [0u8; 4];
        let n = handle.read_block(&mut buf).unwrap();
        assert_eq!(n, 2);
        assert_eq!(&buf[..n], b"89");
    }

    #[test]
    fn test_read_at_end_returns_zero() {
        let (_dir, path) = create_test_device(b"0123456789");
        let device_io = create_device_io();

        let mut handle = device_io.open_read(&path).unwrap();
        handle.seek_to(10).unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(handle.read_block(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_open_missing_device_fails() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent.bin");
        let device_io = create_device_io();

        assert!(device_io
            .open_read(&missing.to_string_lossy())
            .is_err());
    }
}
