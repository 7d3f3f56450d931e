//! # Scripted Transport
//!
//! An in-memory stand-in for a printer, used to exercise sessions without
//! hardware.
//!
//! Replies are attached to commands. When a command line is written, its reply
//! is queued "in flight" and only lands in the input buffer on the next read
//! or availability query. This models the printer's latency: a reader that
//! discards stale input right after writing a command still sees the reply.
//!
//! Bytes can also be scheduled with [`ScriptedTransport::send_after`], to
//! model a printer that emits a response line by line.
//!
//! Reading from an empty input buffer fails with [`io::ErrorKind::TimedOut`]
//! immediately, as a serial port would after its read timeout.
//!
//! ## Example
//!
//! ```
//! use labelbridge::transport::{ScriptedTransport, Transport};
//!
//! let mut printer = ScriptedTransport::new().reply("UF", "001\r\nL5\r\n");
//! printer.write_line("UF").unwrap();
//! printer.discard_buffers().unwrap();
//! assert_eq!(printer.bytes_to_read().unwrap(), 9);
//! ```

use std::collections::{HashMap, VecDeque};
use std::io;
use std::time::{Duration, Instant};

use super::Transport;

/// Printer double with canned replies and a write log.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: HashMap<String, Vec<u8>>,
    in_flight: Vec<u8>,
    scheduled: VecDeque<(Instant, Vec<u8>)>,
    input: VecDeque<u8>,
    written: Vec<String>,
    fail_on_write: Option<usize>,
    flushes: usize,
    discards: usize,
    closes: usize,
    closed: bool,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `command` with `response` whenever it is written.
    pub fn reply(mut self, command: &str, response: impl AsRef<[u8]>) -> Self {
        self.replies
            .insert(command.to_string(), response.as_ref().to_vec());
        self
    }

    /// Make the `n`th line write (zero-based) fail with a broken pipe.
    pub fn fail_on_write(mut self, n: usize) -> Self {
        self.fail_on_write = Some(n);
        self
    }

    /// Put bytes straight into the input buffer, as if already received.
    pub fn feed(&mut self, bytes: impl AsRef<[u8]>) {
        self.input.extend(bytes.as_ref());
    }

    /// Queue bytes the printer is about to send, unprompted.
    pub fn send(&mut self, bytes: impl AsRef<[u8]>) {
        self.in_flight.extend_from_slice(bytes.as_ref());
    }

    /// Queue bytes the printer sends `delay` from now.
    ///
    /// Chunks are released in the order they were scheduled.
    pub fn send_after(&mut self, delay: Duration, bytes: impl AsRef<[u8]>) {
        self.scheduled
            .push_back((Instant::now() + delay, bytes.as_ref().to_vec()));
    }

    /// Lines written so far, without terminators.
    pub fn written(&self) -> &[String] {
        &self.written
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    pub fn discard_count(&self) -> usize {
        self.discards
    }

    pub fn close_count(&self) -> usize {
        self.closes
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn land_in_flight(&mut self) {
        if !self.in_flight.is_empty() {
            self.input.extend(self.in_flight.drain(..));
        }
        let now = Instant::now();
        while self.scheduled.front().is_some_and(|(due, _)| *due <= now) {
            if let Some((_, chunk)) = self.scheduled.pop_front() {
                self.input.extend(chunk);
            }
        }
    }

    fn ensure_open(&self) -> io::Result<()> {
        if self.closed {
            Err(io::Error::new(io::ErrorKind::NotConnected, "port is closed"))
        } else {
            Ok(())
        }
    }
}

impl Transport for ScriptedTransport {
    fn bytes_to_read(&mut self) -> io::Result<usize> {
        self.ensure_open()?;
        self.land_in_flight();
        Ok(self.input.len())
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        self.ensure_open()?;
        self.land_in_flight();
        self.input
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::TimedOut, "read timed out"))
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.ensure_open()?;
        if self.fail_on_write == Some(self.written.len()) {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "printer disconnected",
            ));
        }
        if let Some(reply) = self.replies.get(line) {
            self.in_flight.extend_from_slice(reply);
        }
        self.written.push(line.to_string());
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.ensure_open()?;
        self.flushes += 1;
        Ok(())
    }

    fn discard_buffers(&mut self) -> io::Result<()> {
        self.ensure_open()?;
        self.discards += 1;
        self.input.clear();
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.closes += 1;
        self.closed = true;
        Ok(())
    }
}
