//! The grouped, editable query buffer.
//!
//! # Modules
//!
//! - `node`: Segment and block nodes, block splitting and coloring
//! - `position`: Offset/path mapping and caret navigation across segments
//! - `cursor`: Caret position plus the focused segment
//! - `tree`: The buffer itself, with editing operations and change events

pub mod cursor;
pub mod node;
pub mod position;
pub mod tree;

pub use node::{Block, Node, Segment};
pub use tree::{BlockInfo, BlockTree, TreeEvent};
