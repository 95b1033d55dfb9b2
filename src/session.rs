//! # Print Session
//!
//! Sends one [`PrintJob`] to one serial endpoint.
//!
//! ## States
//!
//! ```text
//! Idle ──► Opening ──► HeaderSent ──► Streaming ──► Done
//!   │         │            │              │
//!   └─────────┴────────────┴──────────────┴──► Error
//! ```
//!
//! | Transition | Work | Failure |
//! |------------|------|---------|
//! | Idle → Opening | require an endpoint | `NotConnected` |
//! | Opening → HeaderSent | open with connect timeout | `PortUnavailable` |
//! | HeaderSent | 7 control packets, flush after each | `TransmissionFailed { Header }` |
//! | Streaming | one write + flush per chunk | `TransmissionFailed { Chunk }` |
//! | → Done | port closed | |
//!
//! The port lives only inside [`PrintSession::run`] and is closed on every
//! exit path when it goes out of scope.
//!
//! ## Delivery
//!
//! Success means the OS serial layer accepted and drained every byte. The
//! printer has no response channel here, so nothing is read back and nothing
//! is retried. Writes have no timeout: a stalled printer stalls the session.
//!
//! One session per printer at a time; there is no locking.

use std::io::Write;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::discovery::SerialEndpoint;
use crate::error::{PhomemoError, Stage};
use crate::protocol::job::{Packet, PrintJob};
use crate::transport::{DEFAULT_CONNECT_TIMEOUT, PortOpener};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Opening,
    HeaderSent,
    Streaming,
    Done,
    Error,
}

/// # Print Session
///
/// ```
/// use std::io;
/// use std::time::Duration;
/// use phomemo::discovery::SerialEndpoint;
/// use phomemo::protocol::{job::PrintJob, raster::RasterImage};
/// use phomemo::session::{PrintSession, SessionState};
/// use phomemo::transport::PortOpener;
///
/// struct Sink;
///
/// impl PortOpener for Sink {
///     type Port = io::Sink;
///     fn open(&self, _: &SerialEndpoint, _: Duration) -> io::Result<io::Sink> {
///         Ok(io::sink())
///     }
/// }
///
/// let job = PrintJob::from_image(&RasterImage::filled(320, 96, 0));
/// let mut session = PrintSession::new(Sink);
/// session.run(Some(&SerialEndpoint::new("/dev/rfcomm0")), &job)?;
/// assert_eq!(session.state(), SessionState::Done);
/// # Ok::<(), phomemo::PhomemoError>(())
/// ```
#[derive(Debug)]
pub struct PrintSession<O> {
    opener: O,
    connect_timeout: Duration,
    state: SessionState,
}

impl<O: PortOpener> PrintSession<O> {
    pub fn new(opener: O) -> Self {
        Self {
            opener,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            state: SessionState::Idle,
        }
    }

    /// Set the bound on opening the serial device (default 10s).
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Send `job` to `endpoint`.
    ///
    /// `endpoint` is `None` when the port could not be resolved; the session
    /// then fails with `NotConnected` without touching any device.
    pub fn run(
        &mut self,
        endpoint: Option<&SerialEndpoint>,
        job: &PrintJob,
    ) -> Result<(), PhomemoError> {
        let result = self.run_inner(endpoint, job);
        if let Err(e) = &result {
            warn!(state = ?self.state, error = %e, "print session failed");
            self.state = SessionState::Error;
        }
        result
    }

    fn run_inner(
        &mut self,
        endpoint: Option<&SerialEndpoint>,
        job: &PrintJob,
    ) -> Result<(), PhomemoError> {
        let endpoint = endpoint.ok_or(PhomemoError::NotConnected { address: None })?;

        self.state = SessionState::Opening;
        let mut port = self
            .opener
            .open(endpoint, self.connect_timeout)
            .map_err(|e| PhomemoError::PortUnavailable {
                path: endpoint.to_string(),
                reason: e.to_string(),
            })?;
        self.state = SessionState::HeaderSent;
        info!(port = %endpoint, chunks = job.chunk_count(), "printing");

        for packet in job.packets() {
            let stage = match packet {
                Packet::Header { index, .. } => Stage::Header { packet: *index },
                Packet::Chunk { index, .. } => {
                    self.state = SessionState::Streaming;
                    Stage::Chunk { index: *index }
                }
            };
            send(&mut port, packet.bytes())
                .map_err(|source| PhomemoError::TransmissionFailed { stage, source })?;
            debug!(%stage, len = packet.bytes().len(), "sent");
        }

        drop(port);
        self.state = SessionState::Done;
        info!(port = %endpoint, "print job sent");
        Ok(())
    }
}

fn send<W: Write>(port: &mut W, bytes: &[u8]) -> std::io::Result<()> {
    port.write_all(bytes)?;
    port.flush()
}

// ============================================================================
// TESTS
// ============================================================================
