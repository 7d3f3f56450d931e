//! # LP-50 Protocol Implementation
//!
//! This module provides the command builders and response types for the
//! form-based label printing commands of Datecs LP-50 thermal printers.
//!
//! ## Module Structure
//!
//! - [`commands`]: Command line builders (`UF`, `FR`, `?`, `P`)
//! - [`forms`]: Parsed form list returned by `UF`
//!
//! ## Usage Example
//!
//! ```
//! use labelbridge::protocol::commands;
//!
//! // Command sequence for one label of form L5
//! let lines = vec![
//!     commands::form_recall("L5"),
//!     commands::prompt(),
//!     "42".to_string(),
//!     commands::print_one(),
//! ];
//! assert_eq!(lines[0], "FR\"L5\"");
//! ```

pub mod commands;
pub mod forms;

pub use forms::FormList;
