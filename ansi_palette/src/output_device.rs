// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{fmt::{Debug, Formatter},
          io::Write,
          sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError}};

pub type SendWriter = dyn Write + Send;
pub type SafeWriter = Arc<StdMutex<SendWriter>>;
pub type LockedOutputDevice<'a> = &'a mut dyn Write;

/// Macro to simplify locking and getting a mutable reference to the output device.
/// Don't call this again in the same scope, it will deadlock! A safe approach is
/// to use this macro in a separate block scope.
///
/// Usage example:
/// ```
/// use r3bl_ansi_palette::{lock_output_device_as_mut, OutputDevice, LockedOutputDevice};
/// let (device, stdout_mock) = OutputDevice::new_mock();
/// { // Start a new block scope to avoid deadlock.
///     let mut_ref: LockedOutputDevice<'_> = lock_output_device_as_mut!(device);
///     let _ = mut_ref.write_all(b"Hello, world!");
/// } // The lock is released here.
/// assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "Hello, world!");
/// ```
#[macro_export]
macro_rules! lock_output_device_as_mut {
    ($device:expr) => {
        &mut *$device.lock()
    };
}

/// Where a [`crate::StyleEntry`] writes to when it is used as a scoped guard.
/// - It is safe to clone, clones share the same underlying writer.
/// - The default is stdout.
#[derive(Clone)]
pub struct OutputDevice {
    pub resource: SafeWriter,
    pub is_mock: bool,
}

impl Debug for OutputDevice {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputDevice")
            .field("is_mock", &self.is_mock)
            .finish_non_exhaustive()
    }
}

impl Default for OutputDevice {
    fn default() -> Self { Self::new_stdout() }
}

impl OutputDevice {
    #[must_use]
    pub fn new_stdout() -> Self {
        Self {
            resource: Arc::new(StdMutex::new(std::io::stdout())),
            is_mock: false,
        }
    }

    /// Wrap any writer, eg: a file or a socket.
    pub fn new_with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            resource: Arc::new(StdMutex::new(writer)),
            is_mock: false,
        }
    }

    /// Returns a device that writes into memory, and a handle to read what was written.
    #[must_use]
    pub fn new_mock() -> (Self, StdoutMock) {
        let stdout_mock = StdoutMock::default();
        let device = Self {
            resource: Arc::new(StdMutex::new(stdout_mock.clone())),
            is_mock: true,
        };
        (device, stdout_mock)
    }

    /// Locks the output device for writing. A poisoned lock is recovered, since a
    /// writer has no invariants that a panic could break.
    ///
    /// ```
    /// use r3bl_ansi_palette::{OutputDevice, LockedOutputDevice};
    ///
    /// let device = OutputDevice::new_stdout();
    /// let mut_ref: LockedOutputDevice<'_> = &mut *device.lock();
    /// let _ = mut_ref.write_all(b"Hello, world!\n");
    /// ```
    pub fn lock(&self) -> MutexGuard<'_, SendWriter> {
        self.resource.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write `text` and flush, so nothing is left buffered between the enter and exit
    /// of a scoped style.
    ///
    /// # Errors
    ///
    /// Any I/O error from the underlying writer.
    pub fn write_and_flush(&self, text: &str) -> std::io::Result<()> {
        let mut_ref: LockedOutputDevice<'_> = lock_output_device_as_mut!(self);
        mut_ref.write_all(text.as_bytes())?;
        mut_ref.flush()
    }
}

/// You can safely clone this struct, since it only contains an `Arc<StdMutex<Vec<u8>>>`.
/// The inner `buffer` will not be cloned, just the [Arc] will be cloned.
#[derive(Clone, Default)]
pub struct StdoutMock {
    pub buffer: Arc<StdMutex<Vec<u8>>>,
}

impl Debug for StdoutMock {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "StdoutMock({:?})", self.get_copy_of_buffer_as_string())
    }
}

impl StdoutMock {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    fn buffer(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn get_copy_of_buffer(&self) -> Vec<u8> { self.buffer().clone() }

    #[must_use]
    pub fn get_copy_of_buffer_as_string(&self) -> String {
        String::from_utf8_lossy(&self.buffer()).into_owned()
    }

    #[must_use]
    pub fn get_copy_of_buffer_as_string_strip_ansi(&self) -> String {
        let stripped = strip_ansi_escapes::strip(self.buffer().as_slice());
        String::from_utf8_lossy(&stripped).into_owned()
    }
}

impl Write for StdoutMock {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> { Ok(()) }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_stdout_output_device_is_not_mock() {
        let device = OutputDevice::new_stdout();
        assert!(!device.is_mock);
        assert!(!OutputDevice::default().is_mock);
    }

    #[test]
    fn test_mock_captures_writes() {
        let (device, stdout_mock) = OutputDevice::new_mock();
        assert!(device.is_mock);

        device.write_and_flush("hello ").unwrap();
        device.clone().write_and_flush("world").unwrap();

        assert_eq!(stdout_mock.get_copy_of_buffer_as_string(), "hello world");
    }

    #[test]
    fn test_stdout_mock_strip_ansi() {
        let mut stdout_mock = StdoutMock::default();
        // Points to the same inner value as `stdout_mock`.
        let stdout_mock_clone = stdout_mock.clone();

        let normal_text = "hello world";
        let red_text = format!("\x1b[31m{normal_text}\x1b[0m");
        stdout_mock.write_all(red_text.as_bytes()).unwrap();

        assert_eq!(stdout_mock_clone.get_copy_of_buffer_as_string(), red_text);
        assert_eq!(
            stdout_mock_clone.get_copy_of_buffer_as_string_strip_ansi(),
            normal_text
        );
    }

    #[test]
    fn test_new_with_writer() {
        let stdout_mock = StdoutMock::new();
        let device = OutputDevice::new_with_writer(stdout_mock.clone());
        assert!(!device.is_mock);
        device.write_and_flush("abc").unwrap();
        assert_eq!(stdout_mock.get_copy_of_buffer(), b"abc".to_vec());
    }
}
