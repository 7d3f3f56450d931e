//! # Printer Transport Layer
//!
//! This module provides the byte channel a printer session talks over.
//!
//! ## Available Transports
//!
//! - [`serial`]: Serial port (USB-serial or RS-232) via the `serialport` crate
//! - [`scripted`]: In-memory printer double with canned replies, for tests
//!
//! ## Contract
//!
//! A transport is opened by the caller and handed to one session. Reads are
//! byte-at-a-time and bounded by the transport's own read timeout: a read that
//! waits longer fails with [`io::ErrorKind::TimedOut`]. Writes are whole lines;
//! the transport appends the line terminator.

use std::io;

pub mod scripted;
pub mod serial;

pub use scripted::ScriptedTransport;
pub use serial::SerialTransport;

/// Bidirectional byte channel to a printer.
pub trait Transport {
    /// Number of bytes received and not yet read.
    fn bytes_to_read(&mut self) -> io::Result<usize>;

    /// Read one byte, blocking up to the read timeout.
    fn read_byte(&mut self) -> io::Result<u8>;

    /// Write one line followed by the line terminator.
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Push buffered output to the device.
    fn flush(&mut self) -> io::Result<()>;

    /// Drop any bytes waiting in the input and output buffers.
    fn discard_buffers(&mut self) -> io::Result<()>;

    /// Release the channel. Later operations fail.
    fn close(&mut self) -> io::Result<()>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn bytes_to_read(&mut self) -> io::Result<usize> {
        (**self).bytes_to_read()
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        (**self).read_byte()
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        (**self).write_line(line)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }

    fn discard_buffers(&mut self) -> io::Result<()> {
        (**self).discard_buffers()
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }
}

/// Whether an I/O error means "no byte arrived in time".
pub fn is_timeout(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}
