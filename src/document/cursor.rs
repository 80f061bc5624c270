//! Caret tracking for the block tree.
//!
//! The cursor stores a global character offset plus the path of the segment
//! that currently holds the caret. Two segments meet at every boundary, so the
//! offset alone cannot tell whether the caret sits at the end of the left-hand
//! segment or at the start of the right-hand one; the focus path settles it.
//!
//! # Example
//!
//! ```
//! use querybuilder::document::cursor::Cursor;
//!
//! let mut cursor = Cursor::new();
//! assert_eq!(cursor.position(), 0);
//! assert_eq!(cursor.path(), &[0]);
//!
//! cursor.set(5, vec![1, 0]);
//! assert_eq!(cursor.position(), 5);
//! assert_eq!(cursor.path(), &[1, 0]);
//! ```

/// Global caret offset and the path of the focused segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    position: usize,
    path: Vec<usize>,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

impl Cursor {
    /// Creates a cursor at offset 0 in the root's first segment.
    pub fn new() -> Self {
        Self {
            position: 0,
            path: vec![0],
        }
    }

    /// Global character offset of the caret.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Path of the focused segment.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Moves the caret, replacing the focused segment path.
    pub fn set(&mut self, position: usize, path: Vec<usize>) {
        self.position = position;
        self.path = path;
    }
}
