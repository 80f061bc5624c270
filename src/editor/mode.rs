//! Completer mode management.
//!
//! The completer popup shows one of three pages, depending on what the
//! parser's proposal expects next.
//!
//! # Example
//!
//! ```
//! use querybuilder::editor::mode::CompleterMode;
//!
//! let mode = CompleterMode::default();
//! assert_eq!(mode, CompleterMode::Proposals);
//! assert_eq!(format!("{}", mode), "PROPOSALS");
//! ```

use std::fmt;

/// The page the completer popup currently shows.
///
/// The mode is displayed in the status bar using the `Display` implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompleterMode {
    /// A list of completion proposals.
    #[default]
    Proposals,
    /// A sorted list of plain values (tags, contacts).
    Strings,
    /// A date picker.
    DateTime,
}

impl fmt::Display for CompleterMode {
    /// Formats the mode as an uppercase string suitable for the status bar.
    ///
    /// # Examples
    ///
    /// ```
    /// use querybuilder::editor::mode::CompleterMode;
    ///
    /// assert_eq!(format!("{}", CompleterMode::Strings), "STRINGS");
    /// assert_eq!(format!("{}", CompleterMode::DateTime), "DATE");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompleterMode::Proposals => write!(f, "PROPOSALS"),
            CompleterMode::Strings => write!(f, "STRINGS"),
            CompleterMode::DateTime => write!(f, "DATE"),
        }
    }
}
