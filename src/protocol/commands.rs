//! # LP-50 Form Commands
//!
//! Builders for the small subset of the Datecs LP-50 command language used to
//! fill in and print a stored form.
//!
//! ## Command Structure
//!
//! Every command is one line of ASCII text. The line terminator is added by
//! the transport ([`crate::transport::Transport::write_line`]), so the
//! builders here return the bare command.
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `UF` | List forms stored in printer memory |
//! | `FR"name"` | Recall (activate) a stored form |
//! | `?` | Start the variable and counter prompt sequence |
//! | `P1,1` | Print one set of one label |

/// Line terminator appended to every command written over the serial link.
pub const LINE_TERMINATOR: &str = "\n";

/// Carriage return: ends a printer response line.
pub const CR: u8 = b'\r';

/// Line feed: framing byte following CR in printer responses.
pub const LF: u8 = b'\n';

// ============================================================================
// FORM COMMANDS
// ============================================================================

/// # List Forms (UF)
///
/// Asks the printer to enumerate the forms stored in its memory.
///
/// ## Response
///
/// ```text
/// 002\r\n
/// L0\r\n
/// L1\r\n
/// ```
///
/// The first line is the form count, one line per form follows.
///
/// ## Example
///
/// ```
/// use labelbridge::protocol::commands;
///
/// assert_eq!(commands::list_forms(), "UF");
/// ```
#[inline]
pub fn list_forms() -> String {
    "UF".to_string()
}

/// # Form Recall (FR"name")
///
/// Activates a stored form. The name is embedded verbatim between literal
/// double quotes; the printer compares names case-insensitively.
///
/// ## Example
///
/// ```
/// use labelbridge::protocol::commands;
///
/// assert_eq!(commands::form_recall("L5"), "FR\"L5\"");
/// ```
#[inline]
pub fn form_recall(name: &str) -> String {
    format!("FR\"{}\"", name)
}

/// # Prompt (?)
///
/// Starts the prompt sequence of the active form. The printer then expects one
/// line per declared variable, in declaration order.
#[inline]
pub fn prompt() -> String {
    "?".to_string()
}

// ============================================================================
// PRINT COMMANDS
// ============================================================================

/// # Print (P)
///
/// Prints `sets` sets of `copies` copies of the active form.
///
/// ## Example
///
/// ```
/// use labelbridge::protocol::commands;
///
/// assert_eq!(commands::print(2, 3), "P2,3");
/// ```
#[inline]
pub fn print(sets: u32, copies: u32) -> String {
    format!("P{},{}", sets, copies)
}

/// Print a single copy of a single label (`P1,1`).
#[inline]
pub fn print_one() -> String {
    print(1, 1)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_forms() {
        assert_eq!(list_forms(), "UF");
    }

    #[test]
    fn test_form_recall_preserves_case() {
        assert_eq!(form_recall("l5"), "FR\"l5\"");
        assert_eq!(form_recall("Shipping Label"), "FR\"Shipping Label\"");
    }

    #[test]
    fn test_prompt() {
        assert_eq!(prompt(), "?");
    }

    #[test]
    fn test_print_one() {
        assert_eq!(print_one(), "P1,1");
    }

    #[test]
    fn test_terminator_bytes() {
        assert_eq!(CR, 0x0D);
        assert_eq!(LF, 0x0A);
        assert_eq!(LINE_TERMINATOR.as_bytes(), &[LF]);
    }
}
