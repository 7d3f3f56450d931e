//! # Error Types
//!
//! This module defines error types used throughout the labelbridge library.
//!
//! Errors fall into two groups:
//!
//! - **Pre-session** errors ([`LabelError::Config`], [`LabelError::PortNotFound`],
//!   [`LabelError::PortBusy`], [`LabelError::Record`]) are raised before a
//!   transport is opened, so no cleanup is involved.
//! - **Session** errors ([`LabelError::Transport`]) name the protocol stage that
//!   failed and carry the underlying transport error text.

use std::fmt;
use std::io;

use thiserror::Error;

/// Main error type for labelbridge operations
#[derive(Debug, Error)]
pub enum LabelError {
    /// Invalid configuration, argument or record
    #[error("Configuration error: {0}")]
    Config(String),

    /// The configured serial port is not among the available ports
    #[error("Printer not found on port {0}. Please connect the printer on the correct port.")]
    PortNotFound(String),

    /// The serial port is held by another program
    #[error("Serial port {0} is already in use by another program.")]
    PortBusy(String),

    /// Transport failure while talking to the printer
    #[error("Transport error during {stage}: {source}")]
    Transport {
        stage: Stage,
        #[source]
        source: io::Error,
    },

    /// Print record file could not be read
    #[error("Error reading records: {0}")]
    Record(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl LabelError {
    /// Wrap a transport error with the stage it happened in.
    pub fn transport(stage: Stage, source: io::Error) -> Self {
        Self::Transport { stage, source }
    }

    /// Stage of a session failure, if this is one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Transport { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

impl From<serialport::Error> for LabelError {
    fn from(e: serialport::Error) -> Self {
        LabelError::Io(e.into())
    }
}

impl From<csv::Error> for LabelError {
    fn from(e: csv::Error) -> Self {
        LabelError::Record(e.to_string())
    }
}

/// Stages of a printer session, in protocol order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ListForms,
    VerifyForm,
    ActivateForm,
    PromptExchange,
    Print,
    Closed,
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::ListForms => "form listing",
            Stage::VerifyForm => "form verification",
            Stage::ActivateForm => "form activation",
            Stage::PromptExchange => "prompt exchange",
            Stage::Print => "print",
            Stage::Closed => "port close",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_names_stage() {
        let err = LabelError::transport(
            Stage::PromptExchange,
            io::Error::new(io::ErrorKind::BrokenPipe, "cable unplugged"),
        );
        assert_eq!(err.stage(), Some(Stage::PromptExchange));
        assert_eq!(
            err.to_string(),
            "Transport error during prompt exchange: cable unplugged"
        );
    }

    #[test]
    fn test_config_error_has_no_stage() {
        let err = LabelError::Config("bad baud".to_string());
        assert_eq!(err.stage(), None);
    }

    #[test]
    fn test_stage_names() {
        let names: Vec<String> = [
            Stage::ListForms,
            Stage::VerifyForm,
            Stage::ActivateForm,
            Stage::PromptExchange,
            Stage::Print,
            Stage::Closed,
        ]
        .iter()
        .map(Stage::to_string)
        .collect();
        assert_eq!(
            names,
            [
                "form listing",
                "form verification",
                "form activation",
                "prompt exchange",
                "print",
                "port close",
            ]
        );
    }

    #[test]
    fn test_port_busy_message() {
        let err = LabelError::PortBusy("COM5".to_string());
        assert!(err.to_string().contains("COM5"));
        assert!(err.to_string().contains("in use"));
    }
}
