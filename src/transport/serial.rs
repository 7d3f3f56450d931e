//! # Serial Port Transport
//!
//! This module provides communication with LP-50 printers over a serial port
//! (native RS-232 or a USB-serial adapter such as `/dev/ttyUSB0` or `COM5`).
//!
//! ## Port Selection
//!
//! The configured port name is matched case-insensitively against the ports
//! the operating system reports. A missing port is a configuration error and
//! a port held by another program is reported as busy. Both happen before any
//! printer session starts.
//!
//! ## Line Settings
//!
//! 8 data bits, no parity, one stop bit, no flow control. The baud rate comes
//! from [`PrinterConfig`].
//!
//! ## Timeouts
//!
//! The `serialport` crate has a single timeout per port. The read timeout is
//! installed at open time; each line write temporarily switches to the write
//! timeout and restores the read timeout afterwards.
//!
//! A line write returns only once the line has drained to the wire, bounded by
//! the write timeout. Discarding the buffers right after a command, as the
//! line reader does, then can't drop the command before the printer sees it.

use std::io::{self, Read, Write};
use std::time::Duration;

use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use tracing::{debug, info};

use super::Transport;
use crate::error::LabelError;
use crate::printer::PrinterConfig;
use crate::protocol::commands::LINE_TERMINATOR;

/// # Serial Printer Transport
///
/// Manages a connection to an LP-50 printer over a serial port.
///
/// ## Example
///
/// ```no_run
/// use labelbridge::printer::PrinterConfig;
/// use labelbridge::transport::{SerialTransport, Transport};
///
/// let config = PrinterConfig::default();
/// let mut transport = SerialTransport::open(&config)?;
///
/// transport.write_line("UF")?;
/// transport.flush()?;
///
/// # Ok::<(), labelbridge::LabelError>(())
/// ```
pub struct SerialTransport {
    port: Option<Box<dyn SerialPort>>,
    name: String,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl SerialTransport {
    /// Select the configured port among the available ones and open it.
    ///
    /// ## Errors
    ///
    /// - [`LabelError::PortNotFound`] if no available port matches
    /// - [`LabelError::PortBusy`] if another program holds the port
    /// - [`LabelError::Io`] for any other open failure
    pub fn open(config: &PrinterConfig) -> Result<Self, LabelError> {
        let ports = available_ports()?;
        let name = select_port(&config.port, &ports)?;
        // The port is listed, so "no device" means someone else holds it
        Self::open_port(&name, config).map_err(|e| match e {
            LabelError::PortNotFound(name) => LabelError::PortBusy(name),
            other => other,
        })
    }

    /// Open a port by exact name, skipping enumeration.
    pub fn open_port(name: &str, config: &PrinterConfig) -> Result<Self, LabelError> {
        info!(port = name, baud = config.baud_rate, "Opening port");

        let port = serialport::new(name, config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.read_timeout())
            .open()
            .map_err(|e| open_error(name, e))?;

        info!(port = name, "Communicating through port");

        Ok(Self {
            port: Some(port),
            name: name.to_string(),
            read_timeout: config.read_timeout(),
            write_timeout: config.write_timeout(),
        })
    }

    /// Name of the underlying port.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn port(&mut self) -> io::Result<&mut Box<dyn SerialPort>> {
        self.port
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "port is closed"))
    }
}

impl Transport for SerialTransport {
    fn bytes_to_read(&mut self) -> io::Result<usize> {
        let port = self.port()?;
        Ok(SerialPort::bytes_to_read(&**port)? as usize)
    }

    fn read_byte(&mut self) -> io::Result<u8> {
        let port = self.port()?;
        let mut buf = [0u8; 1];
        loop {
            match port.read(&mut buf) {
                Ok(1) => return Ok(buf[0]),
                Ok(_) => {
                    return Err(io::Error::new(io::ErrorKind::TimedOut, "no byte received"));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let (read_timeout, write_timeout) = (self.read_timeout, self.write_timeout);
        let port = self.port()?;

        if write_timeout != read_timeout {
            port.set_timeout(write_timeout)?;
        }
        let result = write_and_drain(&mut **port, line);
        if write_timeout != read_timeout {
            port.set_timeout(read_timeout)?;
        }
        result
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(self.port()?)
    }

    fn discard_buffers(&mut self) -> io::Result<()> {
        self.port()?.clear(ClearBuffer::All)?;
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        match self.port.take() {
            Some(port) => {
                debug!(port = %self.name, "Closing port");
                drop(port);
                Ok(())
            }
            None => Err(io::Error::new(
                io::ErrorKind::NotConnected,
                "port already closed",
            )),
        }
    }
}

/// Write one terminated line and wait until it has left the output queue.
fn write_and_drain<W: Write + ?Sized>(port: &mut W, line: &str) -> io::Result<()> {
    port.write_all(line.as_bytes())?;
    port.write_all(LINE_TERMINATOR.as_bytes())?;
    Write::flush(port)
}

// ============================================================================
// PORT DISCOVERY
// ============================================================================

/// Names of the serial ports currently present.
pub fn available_ports() -> Result<Vec<String>, LabelError> {
    let ports: Vec<String> = serialport::available_ports()?
        .into_iter()
        .map(|p| p.port_name)
        .collect();
    debug!(ports = ?ports, "Available ports");
    Ok(ports)
}

/// Pick the available port matching the configured name, ignoring case.
///
/// Returns the name as the operating system spells it.
pub fn select_port(configured: &str, available: &[String]) -> Result<String, LabelError> {
    available
        .iter()
        .find(|port| port.eq_ignore_ascii_case(configured))
        .cloned()
        .ok_or_else(|| LabelError::PortNotFound(configured.to_string()))
}

/// Map an open failure to the error taxonomy.
fn open_error(name: &str, e: serialport::Error) -> LabelError {
    if is_busy(&e) {
        LabelError::PortBusy(name.to_string())
    } else if e.kind() == serialport::ErrorKind::NoDevice {
        LabelError::PortNotFound(name.to_string())
    } else {
        LabelError::Io(io::Error::other(format!(
            "Failed to open {}: {}",
            name, e
        )))
    }
}

/// Error texts serialport gives a port held by another process.
///
/// Windows reports `ERROR_ACCESS_DENIED`, POSIX a held exclusive lock, both
/// under [`serialport::ErrorKind::NoDevice`]. `EBUSY` comes through as its
/// errno description.
const BUSY_MARKERS: &[&str] = &["access is denied", "exclusive lock", "busy"];

fn is_busy(e: &serialport::Error) -> bool {
    let description = e.description.to_lowercase();
    BUSY_MARKERS.iter().any(|marker| description.contains(marker))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Records writes and whether they were drained.
    #[derive(Default)]
    struct WireLog {
        queued: Vec<u8>,
        sent: Vec<u8>,
    }

    impl Write for WireLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.queued.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            self.sent.append(&mut self.queued);
            Ok(())
        }
    }

    #[test]
    fn test_line_write_drains_before_returning() {
        let mut wire = WireLog::default();
        write_and_drain(&mut wire, "UF").unwrap();
        // Nothing left queued for a buffer discard to drop
        assert!(wire.queued.is_empty());
        assert_eq!(wire.sent, b"UF\n");
    }

    #[test]
    fn test_each_line_drained_separately() {
        let mut wire = WireLog::default();
        write_and_drain(&mut wire, "FR\"L5\"").unwrap();
        wire.sent.clear();
        write_and_drain(&mut wire, "?").unwrap();
        assert_eq!(wire.sent, b"?\n");
    }

    fn ports(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_select_port_case_insensitive() {
        let available = ports(&["COM1", "COM5"]);
        assert_eq!(select_port("com5", &available).unwrap(), "COM5");
    }

    #[test]
    fn test_select_port_exact() {
        let available = ports(&["/dev/ttyS0", "/dev/ttyUSB0"]);
        assert_eq!(
            select_port("/dev/ttyUSB0", &available).unwrap(),
            "/dev/ttyUSB0"
        );
    }

    #[test]
    fn test_select_port_missing() {
        let available = ports(&["COM1"]);
        let err = select_port("COM5", &available).unwrap_err();
        assert!(matches!(err, LabelError::PortNotFound(ref p) if p == "COM5"));
    }

    #[test]
    fn test_select_port_none_available() {
        assert!(select_port("COM5", &[]).is_err());
    }

    #[test]
    fn test_windows_access_denied_is_busy() {
        let e = serialport::Error::new(serialport::ErrorKind::NoDevice, "Access is denied.");
        assert!(matches!(open_error("COM5", e), LabelError::PortBusy(ref p) if p == "COM5"));
    }

    #[test]
    fn test_held_lock_is_busy() {
        let e = serialport::Error::new(
            serialport::ErrorKind::NoDevice,
            "Unable to acquire exclusive lock on serial port",
        );
        assert!(matches!(
            open_error("/dev/ttyUSB0", e),
            LabelError::PortBusy(_)
        ));
    }

    #[test]
    fn test_ebusy_is_busy() {
        let e = serialport::Error::new(serialport::ErrorKind::Unknown, "Device or resource busy");
        assert!(matches!(open_error("/dev/ttyUSB0", e), LabelError::PortBusy(_)));
    }

    #[test]
    fn test_missing_device_maps_to_not_found() {
        let e = serialport::Error::new(serialport::ErrorKind::NoDevice, "No such device");
        assert!(matches!(open_error("/dev/ttyUSB9", e), LabelError::PortNotFound(_)));
    }

    #[test]
    fn test_other_open_failure_keeps_text() {
        let e = serialport::Error::new(serialport::ErrorKind::InvalidInput, "bad baud rate");
        let err = open_error("COM5", e);
        assert!(matches!(err, LabelError::Io(_)));
        assert!(err.to_string().contains("bad baud rate"));
    }

    // Note: Reading and writing require actual hardware.
    // Session behavior is covered against ScriptedTransport.
}
