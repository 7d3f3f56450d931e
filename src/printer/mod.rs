//! # Printer Module
//!
//! This module provides printer link configuration.
//!
//! ## Modules
//!
//! - [`config`]: Serial port and timeout settings

pub mod config;

pub use config::PrinterConfig;
