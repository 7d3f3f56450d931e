//! # Labelbridge - Thermal Label Printer Bridge
//!
//! Labelbridge prints labels from forms stored in a Datecs LP-50 thermal
//! printer over a serial link. It provides:
//!
//! - **Protocol implementation**: form listing, recall, prompt and print commands
//! - **Session**: the timeout-governed exchange that fills in and prints a form
//! - **Transport**: serial port communication and a scripted printer for tests
//! - **Records**: CSV rows naming a form and its prompt answers
//!
//! ## Quick Start
//!
//! ```no_run
//! use labelbridge::{
//!     printer::PrinterConfig,
//!     session::PrinterSession,
//!     transport::SerialTransport,
//! };
//!
//! let config = PrinterConfig::default();
//!
//! // Select the configured port and open it
//! let mut transport = SerialTransport::open(&config)?;
//!
//! // Fill in form L5 and print one label; the port is closed afterwards
//! let session = PrinterSession::new(&config);
//! let report = session.run(&mut transport, "L5", &["42", "Jane Doe"])?;
//!
//! if !report.form_found {
//!     eprintln!("printer did not list form L5");
//! }
//!
//! # Ok::<(), labelbridge::error::LabelError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`protocol`] | LP-50 command builders and form list |
//! | [`session`] | Printer session, line reader, deadline |
//! | [`transport`] | Communication backends |
//! | [`printer`] | Link configuration |
//! | [`record`] | CSV print records |
//! | [`error`] | Error types |
//!
//! ## Supported Printers
//!
//! Currently tested with:
//! - Datecs LP-50 (serial and USB-serial)
//!
//! Forms and graphics must be loaded into the printer beforehand, for example
//! with the Datecs label editor.

pub mod error;
pub mod printer;
pub mod protocol;
pub mod record;
pub mod session;
pub mod transport;

// Re-exports for convenience
pub use error::LabelError;
pub use printer::PrinterConfig;
pub use session::PrinterSession;
pub use transport::SerialTransport;
