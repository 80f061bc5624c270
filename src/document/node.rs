//! Segment and block nodes of the grouped query buffer.
//!
//! The buffer is an owned tree: a [`Block`] holds an ordered list of [`Node`]s,
//! each either a leaf [`Segment`] of plain text or a nested [`Block`]. Blocks
//! are created by splitting a segment around a character range
//! ([`Block::add_block`]); the middle part becomes a new colored block.
//!
//! All offsets are character offsets. A node's `start` is relative to the
//! start of its parent block.
//!
//! # Example
//!
//! ```
//! use querybuilder::document::node::{Block, Node};
//!
//! let mut root = Block::root("tag:work OR tag:home");
//! assert!(root.add_block(0, 7));
//!
//! // The segment was split into a block and a trailing segment
//! assert_eq!(root.children().len(), 2);
//! assert!(matches!(&root.children()[0], Node::Block(b) if b.text() == "tag:work"));
//! assert!(matches!(&root.children()[1], Node::Segment(s) if s.text() == " OR tag:home"));
//! assert_eq!(root.text(), "tag:work OR tag:home");
//! ```

use crate::theme::palette::{ColorCycle, Rgb};
use tracing::trace;

/// Number of characters in `text`.
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the character at `char_index`, or `text.len()` past the end.
pub(crate) fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}

/// Characters `[start, start + len)` of `text`.
pub(crate) fn char_slice(text: &str, start: usize, len: usize) -> String {
    text.chars().skip(start).take(len).collect()
}

/// A leaf run of editable plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    start: usize,
    text: String,
}

impl Segment {
    pub fn new(start: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            text: text.into(),
        }
    }

    /// Offset of the first character, relative to the parent block.
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        char_len(&self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Inserts `text` before the character at `offset` (clamped to the end).
    pub(crate) fn insert_str(&mut self, offset: usize, text: &str) {
        let index = byte_index(&self.text, offset);
        self.text.insert_str(index, text);
    }

    /// Removes the character at `offset`, if any.
    pub(crate) fn remove_char(&mut self, offset: usize) -> Option<char> {
        if offset >= self.len() {
            return None;
        }
        let index = byte_index(&self.text, offset);
        Some(self.text.remove(index))
    }
}

/// A child of a [`Block`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Segment(Segment),
    Block(Block),
}

impl Node {
    pub fn start(&self) -> usize {
        match self {
            Node::Segment(segment) => segment.start,
            Node::Block(block) => block.start,
        }
    }

    pub(crate) fn set_start(&mut self, start: usize) {
        match self {
            Node::Segment(segment) => segment.start = start,
            Node::Block(block) => block.start = start,
        }
    }

    /// Length in characters of the text rendered by this node.
    pub fn len(&self) -> usize {
        match self {
            Node::Segment(segment) => segment.len(),
            Node::Block(block) => block.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn text(&self) -> String {
        match self {
            Node::Segment(segment) => segment.text.clone(),
            Node::Block(block) => block.text(),
        }
    }

    fn push_text(&self, out: &mut String) {
        match self {
            Node::Segment(segment) => out.push_str(&segment.text),
            Node::Block(block) => {
                for child in &block.children {
                    child.push_text(out);
                }
            }
        }
    }

    pub fn as_segment(&self) -> Option<&Segment> {
        match self {
            Node::Segment(segment) => Some(segment),
            Node::Block(_) => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Node::Block(block) => Some(block),
            Node::Segment(_) => None,
        }
    }
}

/// An ordered group of segments and nested blocks.
///
/// Every block has at least one child, and its children partition its text
/// contiguously. Nested blocks carry a palette color distinct from their
/// parent's and can be closed by the user; the root block has neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    start: usize,
    color: Option<Rgb>,
    closable: bool,
    colors: ColorCycle,
    pub(crate) children: Vec<Node>,
}

impl Block {
    /// Creates a block holding `content` as a single segment.
    pub fn new(start: usize, content: impl Into<String>, color: Option<Rgb>, closable: bool) -> Self {
        Self {
            start,
            color,
            closable,
            colors: ColorCycle::default(),
            children: vec![Node::Segment(Segment::new(0, content))],
        }
    }

    /// Creates an uncolored, non-closable root block.
    pub fn root(content: impl Into<String>) -> Self {
        Self::new(0, content, None, false)
    }

    /// Offset of the first character, relative to the parent block.
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn color(&self) -> Option<Rgb> {
        self.color
    }

    pub fn is_closable(&self) -> bool {
        self.closable
    }

    /// Index of the palette entry the next nested block will start from.
    pub fn sub_color_index(&self) -> usize {
        self.colors.index()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Content of this block and its sub-blocks.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.push_text(&mut out);
        }
        out
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.children.iter().map(Node::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Marks the inclusive character range `[start, end]` as a new nested block.
    ///
    /// The range must lie inside a single child, otherwise nothing happens. A
    /// range that exactly covers an existing segment is also ignored, so the
    /// same span is never boxed twice. Returns `true` when a block was created.
    pub fn add_block(&mut self, start: usize, end: usize) -> bool {
        if start > end || end >= self.len() {
            trace!(start, end, "block range out of bounds");
            return false;
        }

        let (Some((index, child_start)), Some((end_index, _))) =
            (self.child_at(start), self.child_at(end))
        else {
            return false;
        };

        if index != end_index {
            trace!(start, end, "block range straddles siblings");
            return false;
        }

        let content = match &mut self.children[index] {
            Node::Block(block) => return block.add_block(start - child_start, end - child_start),
            Node::Segment(segment) => segment.text.clone(),
        };

        let left_len = start - child_start;
        let mid_len = end - start + 1;
        let right_len = char_len(&content) - left_len - mid_len;

        if left_len == 0 && right_len == 0 {
            // Perfectly overlapping blocks
            return false;
        }

        let color = self.colors.next_distinct_from(self.color);
        let mut replacement = Vec::with_capacity(3);

        if left_len > 0 {
            replacement.push(Node::Segment(Segment::new(
                child_start,
                char_slice(&content, 0, left_len),
            )));
        }

        replacement.push(Node::Block(Block::new(
            start,
            char_slice(&content, left_len, mid_len),
            Some(color),
            true,
        )));

        if right_len > 0 {
            replacement.push(Node::Segment(Segment::new(
                end + 1,
                char_slice(&content, left_len + mid_len, right_len),
            )));
        }

        self.children.splice(index..=index, replacement);
        true
    }

    /// Replaces the nested block at `index` with a plain segment holding its
    /// text, merging it with neighbouring segments.
    ///
    /// Returns `false` when the child is not a closable block.
    pub(crate) fn close_child(&mut self, index: usize) -> bool {
        let text = match self.children.get(index) {
            Some(Node::Block(block)) if block.closable => block.text(),
            _ => return false,
        };

        self.children[index] = Node::Segment(Segment::new(0, text));
        self.merge_segments();
        self.reflow();
        true
    }

    /// Joins runs of adjacent segments into one segment each.
    fn merge_segments(&mut self) {
        let mut merged: Vec<Node> = Vec::with_capacity(self.children.len());

        for child in self.children.drain(..) {
            match (merged.last_mut(), child) {
                (Some(Node::Segment(previous)), Node::Segment(segment)) => {
                    previous.text.push_str(&segment.text);
                }
                (_, child) => merged.push(child),
            }
        }

        self.children = merged;
    }

    /// Recomputes the `start` of every descendant from the children lengths.
    pub(crate) fn reflow(&mut self) {
        let mut offset = 0;
        for child in &mut self.children {
            child.set_start(offset);
            if let Node::Block(block) = child {
                block.reflow();
            }
            offset += child.len();
        }
    }

    pub(crate) fn child_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.children.get_mut(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::palette::PALETTE;

    fn segment_texts(block: &Block) -> Vec<String> {
        block.children().iter().map(Node::text).collect()
    }

    #[test]
    fn test_add_block_in_middle_splits_three_ways() {
        let mut root = Block::root("abc def ghi");
        assert!(root.add_block(4, 6));

        assert_eq!(segment_texts(&root), vec!["abc ", "def", " ghi"]);
        assert_eq!(root.children()[1].start(), 4);
        assert_eq!(root.children()[2].start(), 7);
        assert!(root.children()[1].as_block().unwrap().is_closable());
    }

    #[test]
    fn test_add_block_at_edges_skips_empty_segments() {
        let mut root = Block::root("abcdef");
        assert!(root.add_block(0, 2));
        assert_eq!(segment_texts(&root), vec!["abc", "def"]);

        let mut root = Block::root("abcdef");
        assert!(root.add_block(3, 5));
        assert_eq!(segment_texts(&root), vec!["abc", "def"]);
        assert!(root.children()[1].as_block().is_some());
    }

    #[test]
    fn test_add_block_exact_cover_is_noop() {
        let mut root = Block::root("abcdef");
        assert!(root.add_block(0, 2));
        let before = root.clone();

        assert!(!root.add_block(0, 2));
        assert_eq!(root, before);
    }

    #[test]
    fn test_add_block_whole_root_segment_is_noop() {
        let mut root = Block::root("tag:work");
        assert!(!root.add_block(0, 7));
        assert_eq!(root.children().len(), 1);
        assert!(root.children()[0].as_segment().is_some());
    }

    #[test]
    fn test_add_block_straddling_siblings_is_rejected() {
        let mut root = Block::root("abcdef");
        assert!(root.add_block(2, 3));
        let before = root.clone();

        assert!(!root.add_block(1, 4));
        assert_eq!(root, before);
    }

    #[test]
    fn test_add_block_out_of_range_is_rejected() {
        let mut root = Block::root("abc");
        assert!(!root.add_block(1, 3));
        assert!(!root.add_block(2, 1));
        assert_eq!(root.children().len(), 1);
    }

    #[test]
    fn test_nested_add_block_recurses_with_local_offsets() {
        let mut root = Block::root("xx(a OR b)yy");
        assert!(root.add_block(2, 9));
        assert!(root.add_block(3, 3));

        let outer = root.children()[1].as_block().unwrap();
        assert_eq!(outer.start(), 2);
        assert_eq!(segment_texts(outer), vec!["(", "a", " OR b)"]);
        assert_eq!(outer.children()[1].start(), 1);
        assert_eq!(root.text(), "xx(a OR b)yy");
    }

    #[test]
    fn test_sibling_blocks_cycle_colors() {
        let mut root = Block::root("a b c");
        assert!(root.add_block(0, 0));
        assert!(root.add_block(2, 2));
        assert!(root.add_block(4, 4));

        let colors: Vec<_> = root
            .children()
            .iter()
            .filter_map(Node::as_block)
            .map(|b| b.color().unwrap())
            .collect();
        assert_eq!(colors, vec![PALETTE[0], PALETTE[1], PALETTE[2]]);
        assert_eq!(root.sub_color_index(), 3);
    }

    #[test]
    fn test_nested_block_avoids_parent_color() {
        let mut root = Block::root("abcdef");
        assert!(root.add_block(0, 4));
        assert!(root.add_block(1, 2));

        let outer = root.children()[0].as_block().unwrap();
        let inner = outer.children()[1].as_block().unwrap();
        assert_eq!(outer.color(), Some(PALETTE[0]));
        assert_eq!(inner.color(), Some(PALETTE[1]));
    }

    #[test]
    fn test_close_child_merges_segments() {
        let mut root = Block::root("abc def ghi");
        assert!(root.add_block(4, 6));
        assert!(root.close_child(1));

        assert_eq!(root.children().len(), 1);
        assert_eq!(root.children()[0].as_segment().unwrap().text(), "abc def ghi");
        assert!(!root.close_child(0));
    }

    #[test]
    fn test_segment_multibyte_editing() {
        let mut segment = Segment::new(0, "café");
        segment.insert_str(4, "s");
        assert_eq!(segment.text(), "cafés");
        assert_eq!(segment.remove_char(3), Some('é'));
        assert_eq!(segment.text(), "cafs");
        assert_eq!(segment.remove_char(9), None);
    }

    #[test]
    fn test_char_helpers() {
        assert_eq!(char_len("né"), 2);
        assert_eq!(byte_index("né!", 2), 3);
        assert_eq!(byte_index("né", 5), 3);
        assert_eq!(char_slice("abcdef", 2, 3), "cde");
    }
}
