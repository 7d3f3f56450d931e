//! # Printer Session
//!
//! One conversation with the printer: fill in a stored form and print it.
//!
//! ## Stages
//!
//! ```text
//! ListForms ──► VerifyForm ──► ActivateForm ──► PromptExchange ──► Print ──► Closed
//!    UF          (local)        FR"name"         ?, values...       P1,1     flush, close
//! ```
//!
//! Stages run strictly in order. VerifyForm never stops the sequence: a form
//! missing from the printer's list is logged as a warning and the printer gets
//! to reject it.
//!
//! Substitution values are written one per line with no read-back. Their
//! count must match the form's prompts; the protocol has no way to check it.
//!
//! ## Cleanup
//!
//! The transport is flushed and closed exactly once on every exit path. A
//! failure in an earlier stage wins over a failure during cleanup.
//!
//! ## Example
//!
//! ```
//! use labelbridge::printer::PrinterConfig;
//! use labelbridge::session::PrinterSession;
//! use labelbridge::transport::ScriptedTransport;
//!
//! let mut printer = ScriptedTransport::new().reply("UF", "002\r\nL0\r\nL5\r\n");
//! let session = PrinterSession::new(&PrinterConfig::default());
//!
//! let report = session.run(&mut printer, "L5", &["42", "Jane Doe"])?;
//! assert!(report.form_found);
//! assert_eq!(printer.written(), &["UF", "FR\"L5\"", "?", "42", "Jane Doe", "P1,1"]);
//! # Ok::<(), labelbridge::LabelError>(())
//! ```

pub mod deadline;
pub mod reader;

pub use deadline::{Deadline, DeadlineState};
pub use reader::LineReader;

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error, info, info_span, warn};

use crate::error::{LabelError, Stage};
use crate::printer::PrinterConfig;
use crate::protocol::{FormList, commands};
use crate::transport::Transport;

/// Outcome of a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeReport {
    /// Form name as requested
    pub form: String,
    /// Forms the printer reported
    pub forms: FormList,
    /// Whether the requested form was in the list
    pub form_found: bool,
    /// Number of substitution values written
    pub values_sent: usize,
}

/// Runs the form printing protocol over a transport.
#[derive(Debug, Clone)]
pub struct PrinterSession {
    reader: LineReader,
    list_timeout: Duration,
}

impl PrinterSession {
    pub fn new(config: &PrinterConfig) -> Self {
        Self {
            reader: LineReader::new(config.read_timeout()),
            list_timeout: config.list_timeout(),
        }
    }

    /// Override the timeouts: `list_timeout` for the first byte of the form
    /// listing, `line_timeout` for each further line.
    pub fn with_timeouts(list_timeout: Duration, line_timeout: Duration) -> Self {
        Self {
            reader: LineReader::new(line_timeout),
            list_timeout,
        }
    }

    /// Print one label of `form_name` with `substitutions` answering its
    /// prompts in order, then flush and close `transport`.
    ///
    /// ## Errors
    ///
    /// [`LabelError::Transport`] naming the failed stage. The transport has
    /// been flushed and closed by the time the error is returned.
    pub fn run<T, S>(
        &self,
        transport: &mut T,
        form_name: &str,
        substitutions: &[S],
    ) -> Result<ExchangeReport, LabelError>
    where
        T: Transport + ?Sized,
        S: AsRef<str>,
    {
        let _span = info_span!("session", form = form_name).entered();
        let result = self.exchange(transport, form_name, substitutions);
        finish(transport, result)
    }

    /// Ask the printer for its stored forms, then flush and close `transport`.
    pub fn list_forms<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
    ) -> Result<FormList, LabelError> {
        let result = self.read_forms(transport);
        finish(transport, result)
    }

    fn exchange<T, S>(
        &self,
        transport: &mut T,
        form_name: &str,
        substitutions: &[S],
    ) -> Result<ExchangeReport, LabelError>
    where
        T: Transport + ?Sized,
        S: AsRef<str>,
    {
        let forms = self.read_forms(transport)?;

        let form_found = verify_form(&forms, form_name);

        info!(stage = %Stage::ActivateForm, "Activating form");
        send(transport, Stage::ActivateForm, &commands::form_recall(form_name))?;

        info!(
            stage = %Stage::PromptExchange,
            values = substitutions.len(),
            "Answering prompts"
        );
        send(transport, Stage::PromptExchange, &commands::prompt())?;
        for value in substitutions {
            send(transport, Stage::PromptExchange, value.as_ref())?;
        }
        transport
            .flush()
            .map_err(|e| LabelError::transport(Stage::PromptExchange, e))?;

        info!(stage = %Stage::Print, "Printing");
        send(transport, Stage::Print, &commands::print_one())?;

        info!("Completed");
        Ok(ExchangeReport {
            form: form_name.to_string(),
            forms,
            form_found,
            values_sent: substitutions.len(),
        })
    }

    fn read_forms<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
    ) -> Result<FormList, LabelError> {
        info!(stage = %Stage::ListForms, "Reading available forms");
        send(transport, Stage::ListForms, &commands::list_forms())?;

        let lines = self
            .reader
            .read(transport, self.list_timeout, true)
            .map_err(|e| LabelError::transport(Stage::ListForms, e))?;

        let forms = FormList::from_lines(lines);
        info!(
            count = forms.count.as_deref().unwrap_or("-"),
            forms = ?forms.names,
            "Available forms"
        );
        Ok(forms)
    }
}

/// Case-insensitive search of the printer's forms. Warns when absent.
pub fn verify_form(forms: &FormList, form_name: &str) -> bool {
    let found = forms.contains(form_name);
    if !found {
        warn!(
            stage = %Stage::VerifyForm,
            form = form_name,
            "Form not found in printer memory, printer may not be properly configured"
        );
    }
    found
}

fn send<T: Transport + ?Sized>(
    transport: &mut T,
    stage: Stage,
    line: &str,
) -> Result<(), LabelError> {
    debug!(%stage, line, "Sending");
    transport
        .write_line(line)
        .map_err(|e| LabelError::transport(stage, e))
}

/// Flush and close the transport, then settle which error, if any, to report.
fn finish<T, R>(transport: &mut T, result: Result<R, LabelError>) -> Result<R, LabelError>
where
    T: Transport + ?Sized,
{
    let flushed = transport.flush();
    let closed = transport.close();
    let cleanup = flushed.and(closed);

    match (result, cleanup) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(LabelError::transport(Stage::Closed, e)),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(cleanup_err)) => {
            error!(error = %cleanup_err, "Cleanup failed after earlier error");
            Err(e)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
