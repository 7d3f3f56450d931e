//! # Print Records
//!
//! Reads the label requests handed to the printer session.
//!
//! ## Format
//!
//! Comma separated, no header row, UTF-8. Each row is one label:
//!
//! ```text
//! L5,42,Jane Doe
//! ```
//!
//! The first field names the form; the rest answer its prompts in order.
//!
//! With [`RecordLayout::Counted`] the second field declares how many values
//! follow, and rows where the declared and actual counts differ are rejected:
//!
//! ```text
//! L5,2,42,Jane Doe
//! ```
//!
//! The printer can't report how many prompts a form has, so the declared
//! count is only checked against the row itself.

use std::fs::File;
use std::io;
use std::path::Path;

use clap::ValueEnum;
use tracing::debug;

use crate::error::LabelError;

/// Field layout of a record row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RecordLayout {
    /// `FORM,V00,V01,...`
    #[default]
    Plain,
    /// `FORM,COUNT,V00,V01,...`
    Counted,
}

/// One label to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintRecord {
    /// Form name, as written in the file
    pub form: String,
    /// Prompt answers, in order
    pub values: Vec<String>,
}

impl PrintRecord {
    /// Build a record from the fields of one row.
    ///
    /// `line` is only used in error messages.
    pub fn from_fields(
        fields: Vec<String>,
        layout: RecordLayout,
        line: u64,
    ) -> Result<Self, LabelError> {
        let mut fields = fields.into_iter();

        let form = match fields.next() {
            Some(form) if !form.trim().is_empty() => form,
            _ => {
                return Err(LabelError::Config(format!(
                    "line {}: missing form name",
                    line
                )));
            }
        };

        if layout == RecordLayout::Counted {
            let declared = fields.next().ok_or_else(|| {
                LabelError::Config(format!("line {}: missing variable count", line))
            })?;
            let declared: usize = declared.trim().parse().map_err(|_| {
                LabelError::Config(format!(
                    "line {}: invalid variable count '{}'",
                    line, declared
                ))
            })?;
            let values: Vec<String> = fields.collect();
            if values.len() != declared {
                return Err(LabelError::Config(format!(
                    "line {}: form {} declares {} values but {} were given",
                    line,
                    form,
                    declared,
                    values.len()
                )));
            }
            return Ok(Self { form, values });
        }

        Ok(Self {
            form,
            values: fields.collect(),
        })
    }
}

/// Read every record from CSV text.
pub fn read_records<R: io::Read>(
    reader: R,
    layout: RecordLayout,
) -> Result<Vec<PrintRecord>, LabelError> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(b',')
        .from_reader(reader);

    let mut records = Vec::new();
    for row in csv.records() {
        let row = row?;
        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let line = row.position().map_or(0, |p| p.line());
        let fields: Vec<String> = row.iter().map(str::to_string).collect();
        debug!(line, fields = ?fields, "Record");
        records.push(PrintRecord::from_fields(fields, layout, line)?);
    }
    Ok(records)
}

/// Read every record from a CSV file.
pub fn load_records<P: AsRef<Path>>(
    path: P,
    layout: RecordLayout,
) -> Result<Vec<PrintRecord>, LabelError> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| LabelError::Record(format!("{}: {}", path.display(), e)))?;
    read_records(file, layout)
}

// ============================================================================
// TESTS
// ============================================================================
