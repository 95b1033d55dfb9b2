//! # RFCOMM Serial Transport
//!
//! Writes print jobs to the printer's bound RFCOMM device.
//!
//! ## TTY Configuration
//!
//! The device is opened write-only and switched to raw mode so binary data
//! passes through unmodified:
//!
//! - **No input processing**: Disable IGNBRK, BRKINT, PARMRK, ISTRIP, etc.
//! - **No output processing**: Disable OPOST (no CR/LF translation)
//! - **8-bit characters**: CS8 (8 data bits, no parity)
//! - **No echo**: Disable ECHO, ECHONL
//! - **Non-canonical mode**: Disable ICANON (no line buffering)
//!
//! Baud rate is left at the device default; RFCOMM ignores it.
//!
//! ## Timeouts
//!
//! Opening is bounded by a connect timeout (10 seconds by default): the open
//! runs on a helper thread and is abandoned if it has not finished in time.
//! Writes and flushes are **not** bounded. A printer that stops draining its
//! buffer blocks the writer indefinitely; callers needing a hard deadline
//! must supervise the whole process.
//!
//! ## Flushing
//!
//! [`Write::flush`] waits (`tcdrain`) until the kernel has handed every
//! queued byte to the Bluetooth stack. That is the only delivery guarantee
//! available: the printer sends nothing back.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::io::AsRawFd;
use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::discovery::SerialEndpoint;

/// Default bound on opening the serial device.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Opens a writable port for an endpoint.
///
/// Implementations report a timed-out open as [`io::ErrorKind::TimedOut`].
pub trait PortOpener {
    type Port: Write;

    fn open(&self, endpoint: &SerialEndpoint, timeout: Duration) -> io::Result<Self::Port>;
}

impl<O: PortOpener + ?Sized> PortOpener for &O {
    type Port = O::Port;

    fn open(&self, endpoint: &SerialEndpoint, timeout: Duration) -> io::Result<O::Port> {
        (**self).open(endpoint, timeout)
    }
}

/// # Serial Printer Transport
///
/// An open, raw-mode RFCOMM device. The device closes when this is dropped.
///
/// ## Example
///
/// ```no_run
/// use std::io::Write;
/// use phomemo::transport::{DEFAULT_CONNECT_TIMEOUT, SerialTransport};
///
/// let mut port = SerialTransport::open_timeout("/dev/rfcomm0", DEFAULT_CONNECT_TIMEOUT)?;
/// port.write_all(&[0x1F, 0x11, 0x38])?;
/// port.flush()?;
///
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct SerialTransport {
    file: File,
}

impl SerialTransport {
    /// Open and configure the device, blocking as long as the OS does.
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - The device doesn't exist
    /// - Permission denied (may need root or dialout group)
    /// - The path is not a TTY, or TTY configuration fails
    pub fn open<P: AsRef<Path>>(device: P) -> io::Result<Self> {
        let file = OpenOptions::new().write(true).open(device.as_ref())?;
        configure_tty_raw(file.as_raw_fd())?;
        Ok(Self { file })
    }

    /// Open the device, giving up after `timeout`.
    ///
    /// An RFCOMM open blocks while the kernel pages the remote device. If the
    /// deadline passes, the helper thread is left to finish on its own and
    /// closes the device if it ever succeeds.
    pub fn open_timeout<P: AsRef<Path>>(device: P, timeout: Duration) -> io::Result<Self> {
        let path = device.as_ref().to_path_buf();
        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name("serial-open".to_string())
            .spawn(move || {
                // Receiver may be gone after a timeout; dropping the port closes it
                let _ = tx.send(Self::open(&path));
            })?;

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(io::Error::new(
                io::ErrorKind::TimedOut,
                format!("open did not complete within {:?}", timeout),
            )),
            Err(RecvTimeoutError::Disconnected) => {
                Err(io::Error::other("serial open thread exited without a result"))
            }
        }
    }
}

impl Write for SerialTransport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        drain(self.file.as_raw_fd())
    }
}

/// Opens real serial devices with [`SerialTransport::open_timeout`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialOpener;

impl PortOpener for SerialOpener {
    type Port = SerialTransport;

    fn open(&self, endpoint: &SerialEndpoint, timeout: Duration) -> io::Result<SerialTransport> {
        debug!(port = %endpoint, ?timeout, "opening serial port");
        SerialTransport::open_timeout(endpoint.path(), timeout)
    }
}

/// Wait until all queued output has been transmitted.
fn drain(fd: i32) -> io::Result<()> {
    let result = unsafe { libc::tcdrain(fd) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Configure a file descriptor for raw TTY mode.
///
/// ## What Gets Disabled
///
/// - **Input flags**: IGNBRK, BRKINT, PARMRK, ISTRIP, INLCR, IGNCR, ICRNL, IXON, IXOFF, IXANY
/// - **Output flags**: OPOST
/// - **Local flags**: ECHO, ECHONL, ICANON, ISIG, IEXTEN
/// - **Control flags**: CSIZE, PARENB (then CS8 is set)
///
/// IXON/IXOFF/IXANY must be off: the job header packets contain 0x11 (XON)
/// and 0x13 (XOFF), and raster rows can contain anything.
fn configure_tty_raw(fd: i32) -> io::Result<()> {
    use std::mem::MaybeUninit;

    let mut termios = MaybeUninit::uninit();
    let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }
    let mut termios = unsafe { termios.assume_init() };

    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);

    termios.c_oflag &= !libc::OPOST;

    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);

    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8;

    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
    if result != 0 {
        return Err(io::Error::last_os_error());
    }

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
