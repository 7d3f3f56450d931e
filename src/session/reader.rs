//! # Line Reader
//!
//! Turns the printer's byte stream into response lines.
//!
//! ## Framing
//!
//! The printer ends each line with `CR LF`. CR closes the current line, LF is
//! dropped. Reading stops once an LF has been read and nothing more is
//! buffered, so bursts that straddle an LF are still drained. A tail without a
//! CR is never returned.
//!
//! ## Timing
//!
//! Two limits bound a read:
//!
//! - the caller's `timeout` for the first byte of the response
//! - in multi-line mode, the per-line timeout for each further line
//!
//! Waiting sleeps in short slices bounded by a [`Deadline`]. A byte read that
//! outlasts the transport's own read timeout ends the read with whatever lines
//! were complete.

use std::io;
use std::mem;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use super::Deadline;
use crate::protocol::commands::{CR, LF};
use crate::transport::{Transport, is_timeout};

/// Longest single sleep while waiting for the printer.
pub const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Reads CR LF delimited response lines from a transport.
#[derive(Debug, Clone)]
pub struct LineReader {
    line_timeout: Duration,
}

impl LineReader {
    /// Create a reader that waits up to `line_timeout` for each further line
    /// of a multi-line response.
    pub fn new(line_timeout: Duration) -> Self {
        Self { line_timeout }
    }

    pub fn line_timeout(&self) -> Duration {
        self.line_timeout
    }

    /// Read the printer's response.
    ///
    /// Stale bytes in both buffers are discarded first. Returns an empty list
    /// when nothing arrives within `timeout`.
    ///
    /// ## Errors
    ///
    /// Only transport failures other than timeouts are returned.
    pub fn read<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        timeout: Duration,
        expect_multiple: bool,
    ) -> io::Result<Vec<String>> {
        debug!(?timeout, expect_multiple, "Reading printer response");
        transport.discard_buffers()?;

        let mut deadline = Deadline::new();
        deadline.start(timeout);

        let mut lines = Vec::new();
        if !wait_for_data(transport, &deadline)? {
            debug!("Read timed out with no response");
            return Ok(lines);
        }

        match self.drain(transport, &mut deadline, expect_multiple, &mut lines) {
            Ok(()) => {}
            Err(e) if is_timeout(&e) => {
                warn!(error = %e, lines = lines.len(), "Read timed out");
            }
            Err(e) => return Err(e),
        }

        Ok(lines)
    }

    fn drain<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        deadline: &mut Deadline,
        expect_multiple: bool,
        lines: &mut Vec<String>,
    ) -> io::Result<()> {
        let mut line = String::new();

        loop {
            let byte = transport.read_byte()?;

            match byte {
                CR => {
                    debug!(line = %line, "Received");
                    lines.push(mem::take(&mut line));
                    if expect_multiple {
                        deadline.start(self.line_timeout);
                        wait_for_data(transport, deadline)?;
                    }
                }
                LF => {}
                // Latin-1: one char per byte
                other => line.push(char::from(other)),
            }

            if byte == LF && transport.bytes_to_read()? == 0 {
                return Ok(());
            }
        }
    }
}

/// Wait until the transport has bytes to read or `deadline` elapses.
///
/// Returns whether data arrived.
pub fn wait_for_data<T: Transport + ?Sized>(
    transport: &mut T,
    deadline: &Deadline,
) -> io::Result<bool> {
    loop {
        if transport.bytes_to_read()? > 0 {
            return Ok(true);
        }
        if deadline.elapsed() {
            return Ok(false);
        }
        let nap = deadline
            .remaining()
            .map_or(POLL_INTERVAL, |left| left.min(POLL_INTERVAL));
        thread::sleep(nap);
    }
}

// ============================================================================
// TESTS
// ============================================================================
