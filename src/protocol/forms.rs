//! # Form List
//!
//! Parsed response to the `UF` command.
//!
//! The printer answers with a count line followed by one line per form:
//!
//! ```text
//! 002
//! L0
//! L1
//! ```
//!
//! The count is informational. It is kept as received and never checked
//! against the number of names that follow.

use serde::Serialize;

/// Forms reported by the printer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormList {
    /// First response line, as received
    pub count: Option<String>,
    /// Remaining response lines
    pub names: Vec<String>,
}

impl FormList {
    /// Build a form list from response lines.
    ///
    /// ## Example
    ///
    /// ```
    /// use labelbridge::protocol::FormList;
    ///
    /// let forms = FormList::from_lines(vec!["002".into(), "L0".into(), "L5".into()]);
    /// assert_eq!(forms.count.as_deref(), Some("002"));
    /// assert!(forms.contains("l5"));
    /// ```
    pub fn from_lines(lines: Vec<String>) -> Self {
        let mut lines = lines.into_iter();
        let count = lines.next();
        Self {
            count,
            names: lines.collect(),
        }
    }

    /// Case-insensitive lookup of a form name.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|form| form.eq_ignore_ascii_case(name))
    }

    /// Count reported by the printer, if it parses as a number.
    pub fn reported_count(&self) -> Option<usize> {
        self.count.as_deref().and_then(|c| c.trim().parse().ok())
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
