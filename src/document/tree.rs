//! The grouped query buffer.
//!
//! [`BlockTree`] owns the root [`Block`] and the caret, and is the only place
//! where segment text and nesting change. Every mutation queues consolidated
//! [`TreeEvent`]s; the owner drains them with [`BlockTree::take_events`] after
//! each operation and reacts (typically by reparsing on `TextChanged`).
//!
//! # Example
//!
//! ```
//! use querybuilder::document::tree::{BlockTree, TreeEvent};
//!
//! let mut tree = BlockTree::with_text("tag:work");
//! tree.set_cursor_position(8);
//! tree.insert_text(" music");
//!
//! assert_eq!(tree.text(), "tag:work music");
//! assert_eq!(tree.cursor_position(), 14);
//! assert_eq!(
//!     tree.take_events(),
//!     vec![TreeEvent::CursorChanged(14), TreeEvent::TextChanged]
//! );
//! ```

use super::cursor::Cursor;
use super::node::{char_len, char_slice, Block, Node, Segment};
use super::position::{global_offset, locate, locate_caret, segment_at, Location, Step};
use crate::theme::palette::Rgb;
use tracing::debug;

/// Change notifications queued by [`BlockTree`] mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    /// The buffer text was edited by the user.
    TextChanged,
    /// The caret moved to this global offset.
    CursorChanged(usize),
    /// The caret tried to move left past the start of the buffer.
    CursorBeforeStart,
    /// The caret tried to move right past the end of the buffer.
    CursorAfterEnd,
    /// A nested block was closed and folded back into plain text.
    BlockClosed,
}

/// Flattened view of one nested block, with global inclusive bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockInfo {
    pub start: usize,
    pub end: usize,
    pub depth: usize,
    pub color: Option<Rgb>,
    pub closable: bool,
    pub path: Vec<usize>,
}

/// The query buffer: a root block plus the caret.
#[derive(Debug, Clone)]
pub struct BlockTree {
    root: Block,
    cursor: Cursor,
    events: Vec<TreeEvent>,
}

impl Default for BlockTree {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockTree {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::with_text("")
    }

    /// Creates a flat buffer holding `text`, caret at offset 0.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            root: Block::root(text),
            cursor: Cursor::new(),
            events: Vec::new(),
        }
    }

    pub fn root(&self) -> &Block {
        &self.root
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn text(&self) -> String {
        self.root.text()
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Returns `true` when the buffer holds no nested block.
    pub fn is_flat(&self) -> bool {
        self.root
            .children()
            .iter()
            .all(|child| matches!(child, Node::Segment(_)))
    }

    /// Replaces the whole buffer with a single flat segment.
    ///
    /// All blocks are dropped. The caret keeps its offset, clamped to the new
    /// length. This is a programmatic replacement: no `TextChanged` is queued.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.root = Block::root(text);
        let position = self.cursor.position();
        self.place_cursor(position);
    }

    /// Drops every nested block, keeping the text and the caret offset.
    pub fn remove_all_blocks(&mut self) {
        let text = self.text();
        self.set_text(text);
    }

    /// Boxes the inclusive global range `[start, end]` as a nested block.
    ///
    /// See [`Block::add_block`]; invalid ranges are ignored and return `false`.
    pub fn add_block(&mut self, start: usize, end: usize) -> bool {
        let added = self.root.add_block(start, end);
        if added {
            self.refocus();
        } else {
            debug!(start, end, "block not added");
        }
        added
    }

    /// Closes the nested block at `path`, folding its text into a segment.
    ///
    /// The text is unchanged; only the grouping disappears until the next
    /// reparse. Returns `false` when `path` does not address a closable block.
    pub fn close_block(&mut self, path: &[usize]) -> bool {
        let Some((&index, parent_path)) = path.split_last() else {
            return false;
        };

        let parent = if parent_path.is_empty() {
            Some(&mut self.root)
        } else {
            block_at_mut(&mut self.root, parent_path)
        };

        let closed = parent.is_some_and(|parent| parent.close_child(index));
        if closed {
            self.root.reflow();
            self.refocus();
            self.push_event(TreeEvent::BlockClosed);
        }
        closed
    }

    /// Closes the innermost block around the caret.
    pub fn close_block_at_cursor(&mut self) -> bool {
        let path = self.cursor.path();
        if path.len() < 2 {
            return false;
        }
        let block_path = path[..path.len() - 1].to_vec();
        self.close_block(&block_path)
    }

    /// Lists every nested block in document order.
    pub fn blocks(&self) -> Vec<BlockInfo> {
        let mut blocks = Vec::new();
        collect_blocks(&self.root, 0, 0, &mut Vec::new(), &mut blocks);
        blocks
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor.position()
    }

    /// Moves the caret to `position`, clamped to `[0, len]`.
    pub fn set_cursor_position(&mut self, position: usize) {
        let previous = self.cursor.position();
        self.place_cursor(position);

        if self.cursor.position() != previous {
            self.push_event(TreeEvent::CursorChanged(self.cursor.position()));
        }
    }

    /// Focused segment path and the caret offset inside it.
    pub fn cursor_location(&self) -> Location {
        let path = self.cursor.path().to_vec();
        let start = global_offset(&self.root, &path).unwrap_or(0);
        Location::new(path, self.cursor.position().saturating_sub(start))
    }

    /// Moves the caret one step left.
    ///
    /// At offset 0 of a segment the caret moves to the end of the previous
    /// sibling instead; at the start of the buffer a `CursorBeforeStart` event
    /// is queued and the caret stays put.
    pub fn move_left(&mut self) {
        let location = self.cursor_location();
        let step = self.root.step_left(&location.path, location.offset);
        self.apply_step(step);
    }

    /// Moves the caret one step right, symmetric to [`BlockTree::move_left`].
    pub fn move_right(&mut self) {
        let location = self.cursor_location();
        let step = self.root.step_right(&location.path, location.offset);
        self.apply_step(step);
    }

    pub fn move_home(&mut self) {
        self.set_cursor_position(0);
    }

    pub fn move_end(&mut self) {
        self.set_cursor_position(self.len());
    }

    /// Types `text` at the caret, inside the focused segment.
    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }

        let location = self.cursor_location();
        let Some(segment) = segment_at_mut(&mut self.root, &location.path) else {
            return;
        };
        segment.insert_str(location.offset, text);
        self.root.reflow();

        let position = self.cursor.position() + char_len(text);
        self.cursor.set(position, location.path);
        self.push_event(TreeEvent::CursorChanged(position));
        self.push_event(TreeEvent::TextChanged);
    }

    /// Removes the character before the caret. Returns `false` at offset 0.
    pub fn delete_backward(&mut self) -> bool {
        let position = self.cursor.position();
        if position == 0 {
            return false;
        }

        let location = self.cursor_location();
        let target = if location.offset > 0 {
            Location::new(location.path, location.offset - 1)
        } else {
            locate(&self.root, position - 1)
        };

        if !self.remove_char(&target) {
            return false;
        }

        self.cursor.set(position - 1, target.path);
        self.push_event(TreeEvent::CursorChanged(position - 1));
        self.push_event(TreeEvent::TextChanged);
        true
    }

    /// Removes the character after the caret. Returns `false` at the end.
    pub fn delete_forward(&mut self) -> bool {
        let position = self.cursor.position();
        if position >= self.len() {
            return false;
        }

        let location = self.cursor_location();
        let focused_len = segment_at(&self.root, &location.path).map_or(0, Segment::len);
        let target = if location.offset < focused_len {
            location
        } else {
            locate(&self.root, position)
        };

        if !self.remove_char(&target) {
            return false;
        }

        self.push_event(TreeEvent::TextChanged);
        true
    }

    /// Replaces the characters `[start, end)` with `replacement`.
    ///
    /// The buffer is flattened; the caret offset is kept (clamped). Queues
    /// `TextChanged`.
    pub fn splice(&mut self, start: usize, end: usize, replacement: &str) {
        let text = self.text();
        let len = char_len(&text);
        let start = start.min(len);
        let end = end.clamp(start, len);

        let mut spliced = char_slice(&text, 0, start);
        spliced.push_str(replacement);
        spliced.push_str(&char_slice(&text, end, len - end));

        self.set_text(spliced);
        self.push_event(TreeEvent::TextChanged);
    }

    /// Drains the queued notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<TreeEvent> {
        std::mem::take(&mut self.events)
    }

    fn remove_char(&mut self, location: &Location) -> bool {
        let removed = segment_at_mut(&mut self.root, &location.path)
            .and_then(|segment| segment.remove_char(location.offset))
            .is_some();
        if removed {
            self.root.reflow();
        }
        removed
    }

    fn apply_step(&mut self, step: Step) {
        match step {
            Step::Moved(location) => {
                let start = global_offset(&self.root, &location.path).unwrap_or(0);
                let position = start + location.offset;
                self.cursor.set(position, location.path);
                self.push_event(TreeEvent::CursorChanged(position));
            }
            Step::BeforeStart => self.push_event(TreeEvent::CursorBeforeStart),
            Step::AfterEnd => self.push_event(TreeEvent::CursorAfterEnd),
        }
    }

    /// Clamps `position` and focuses the segment that owns the caret there.
    fn place_cursor(&mut self, position: usize) {
        let position = position.min(self.len());
        let location = locate_caret(&self.root, position);
        self.cursor.set(position, location.path);
    }

    /// Recomputes the focus after the structure changed under the caret.
    fn refocus(&mut self) {
        let position = self.cursor.position();
        self.place_cursor(position);
    }

    /// Queues `event`, keeping at most one `TextChanged` and one pending
    /// `CursorChanged` between drains.
    fn push_event(&mut self, event: TreeEvent) {
        match event {
            TreeEvent::TextChanged if self.events.contains(&TreeEvent::TextChanged) => {}
            TreeEvent::CursorChanged(_) => {
                match self
                    .events
                    .iter_mut()
                    .find(|queued| matches!(queued, TreeEvent::CursorChanged(_)))
                {
                    Some(queued) => *queued = event,
                    None => self.events.push(event),
                }
            }
            _ => self.events.push(event),
        }
    }
}

fn block_at_mut<'a>(root: &'a mut Block, path: &[usize]) -> Option<&'a mut Block> {
    let mut block = root;
    for &index in path {
        block = match block.child_mut(index)? {
            Node::Block(nested) => nested,
            Node::Segment(_) => return None,
        };
    }
    Some(block)
}

fn segment_at_mut<'a>(root: &'a mut Block, path: &[usize]) -> Option<&'a mut Segment> {
    let (&last, parents) = path.split_last()?;
    match block_at_mut(root, parents)?.child_mut(last)? {
        Node::Segment(segment) => Some(segment),
        Node::Block(_) => None,
    }
}

fn collect_blocks(
    block: &Block,
    offset: usize,
    depth: usize,
    path: &mut Vec<usize>,
    out: &mut Vec<BlockInfo>,
) {
    for (index, child) in block.children().iter().enumerate() {
        if let Node::Block(nested) = child {
            let start = offset + nested.start();
            path.push(index);
            out.push(BlockInfo {
                start,
                end: (start + nested.len()).saturating_sub(1),
                depth: depth + 1,
                color: nested.color(),
                closable: nested.is_closable(),
                path: path.clone(),
            });
            collect_blocks(nested, start, depth + 1, path, out);
            path.pop();
        }
    }
}
