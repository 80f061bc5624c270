//! Mapping between global character offsets and nodes of the block tree.
//!
//! A node is addressed by its *path*: the sequence of child indices leading
//! from the root block to it, the same way a cursor path addresses a node in a
//! document tree. [`locate`] turns a global offset into the path of the segment
//! owning it plus a local offset; [`global_offset`] goes the other way.
//!
//! Cursor navigation across segment boundaries lives here as well. Moving past
//! the edge of a segment produces a [`Step::BeforeStart`] or [`Step::AfterEnd`]
//! signal that each enclosing block either resolves (by focusing a sibling) or
//! hands back to its own parent.
//!
//! # Example
//!
//! ```
//! use querybuilder::document::node::Block;
//! use querybuilder::document::position::{global_offset, locate};
//!
//! let mut root = Block::root("tag:a OR tag:b");
//! root.add_block(9, 13);
//!
//! let location = locate(&root, 11);
//! assert_eq!(location.path, vec![1, 0]);
//! assert_eq!(location.offset, 2);
//! assert_eq!(global_offset(&root, &location.path), Some(9));
//! ```

use super::node::{Block, Node};

/// A segment path plus an offset local to that segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    pub path: Vec<usize>,
    pub offset: usize,
}

impl Location {
    pub fn new(path: Vec<usize>, offset: usize) -> Self {
        Self { path, offset }
    }

    /// Re-roots the location one level up, under child `index`.
    fn under(mut self, index: usize) -> Self {
        self.path.insert(0, index);
        self
    }
}

/// Outcome of moving the caret one step inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// The caret landed at this location (relative to the block).
    Moved(Location),
    /// The caret tried to leave the block through its start.
    BeforeStart,
    /// The caret tried to leave the block through its end.
    AfterEnd,
}

impl Block {
    /// Finds the child covering local offset `position`.
    ///
    /// Returns the child index and the child's start. The first child whose
    /// end lies after `position` wins, so a position on a boundary belongs to
    /// the right-hand child. Positions past the end select the last child.
    pub fn child_at(&self, position: usize) -> Option<(usize, usize)> {
        let mut child_start = 0;

        for (index, child) in self.children.iter().enumerate() {
            let len = child.len();
            if child_start + len > position {
                return Some((index, child_start));
            }
            child_start += len;
        }

        let last = self.children.len().checked_sub(1)?;
        Some((last, child_start - self.children[last].len()))
    }

    /// Moves the caret one character left from `offset` in the focused segment.
    ///
    /// `focus` is the segment path relative to this block.
    pub fn step_left(&self, focus: &[usize], offset: usize) -> Step {
        let Some((&index, rest)) = focus.split_first() else {
            return Step::BeforeStart;
        };

        let step = match self.children.get(index) {
            Some(Node::Segment(_)) if offset > 0 => Step::Moved(Location::new(vec![], offset - 1)),
            Some(Node::Segment(_)) => Step::BeforeStart,
            Some(Node::Block(block)) => block.step_left(rest, offset),
            None => Step::BeforeStart,
        };

        match step {
            Step::Moved(location) => Step::Moved(location.under(index)),
            // Put the cursor at the end of the previous child
            Step::BeforeStart if index > 0 => {
                Step::Moved(self.children[index - 1].last_location().under(index - 1))
            }
            other => other,
        }
    }

    /// Moves the caret one character right from `offset` in the focused segment.
    pub fn step_right(&self, focus: &[usize], offset: usize) -> Step {
        let Some((&index, rest)) = focus.split_first() else {
            return Step::AfterEnd;
        };

        let step = match self.children.get(index) {
            Some(Node::Segment(segment)) if offset < segment.len() => {
                Step::Moved(Location::new(vec![], offset + 1))
            }
            Some(Node::Segment(_)) => Step::AfterEnd,
            Some(Node::Block(block)) => block.step_right(rest, offset),
            None => Step::AfterEnd,
        };

        match step {
            Step::Moved(location) => Step::Moved(location.under(index)),
            // Put the cursor at the start of the next child
            Step::AfterEnd if index + 1 < self.children.len() => {
                Step::Moved(self.children[index + 1].first_location().under(index + 1))
            }
            other => other,
        }
    }
}

impl Node {
    /// Caret location at the very start of this node.
    pub fn first_location(&self) -> Location {
        match self {
            Node::Segment(_) => Location::default(),
            Node::Block(block) => match block.children.first() {
                Some(child) => child.first_location().under(0),
                None => Location::default(),
            },
        }
    }

    /// Caret location at the very end of this node.
    pub fn last_location(&self) -> Location {
        match self {
            Node::Segment(segment) => Location::new(vec![], segment.len()),
            Node::Block(block) => match block.children.last() {
                Some(child) => child.last_location().under(block.children.len() - 1),
                None => Location::default(),
            },
        }
    }
}

/// Finds the segment owning the character at global `position`.
///
/// Out-of-range positions clamp to the end of the last segment.
pub fn locate(root: &Block, position: usize) -> Location {
    let mut path = Vec::new();
    let mut block = root;
    let mut position = position;

    loop {
        let Some((index, child_start)) = block.child_at(position) else {
            return Location::new(path, 0);
        };
        path.push(index);
        let local = position.saturating_sub(child_start);

        match &block.children[index] {
            Node::Segment(segment) => return Location::new(path, local.min(segment.len())),
            Node::Block(nested) => {
                block = nested;
                position = local;
            }
        }
    }
}

/// Finds the segment that should hold a caret placed at global `position`.
///
/// The caret belongs to the segment of the character just before it, so a
/// caret sitting on a boundary stays at the end of the left-hand segment.
pub fn locate_caret(root: &Block, position: usize) -> Location {
    let position = position.min(root.len());
    let mut location = locate(root, position.saturating_sub(1));

    let start = global_offset(root, &location.path).unwrap_or(0);
    let len = segment_at(root, &location.path).map_or(0, |segment| segment.len());
    location.offset = position.saturating_sub(start).min(len);
    location
}

/// Global offset of the node at `path`: the sum of the starts along the path.
pub fn global_offset(root: &Block, path: &[usize]) -> Option<usize> {
    let mut offset = 0;
    let mut block = root;

    for (depth, &index) in path.iter().enumerate() {
        let child = block.children.get(index)?;
        offset += child.start();

        match child {
            Node::Block(nested) => block = nested,
            Node::Segment(_) if depth + 1 == path.len() => {}
            Node::Segment(_) => return None,
        }
    }

    Some(offset)
}

/// Returns the node at `path`, or `None` for the root or an invalid path.
pub fn node_at<'a>(root: &'a Block, path: &[usize]) -> Option<&'a Node> {
    let (&last, parents) = path.split_last()?;
    let mut block = root;

    for &index in parents {
        block = block.children.get(index)?.as_block()?;
    }

    block.children.get(last)
}

/// Returns the segment at `path`, if the path ends on one.
pub fn segment_at<'a>(root: &'a Block, path: &[usize]) -> Option<&'a super::node::Segment> {
    node_at(root, path)?.as_segment()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `"ab(cd)ef"` with the parenthesized part boxed, then `d` boxed inside.
    fn nested_root() -> Block {
        let mut root = Block::root("ab(cd)ef");
        assert!(root.add_block(2, 5));
        assert!(root.add_block(4, 4));
        root
    }

    #[test]
    fn test_child_at_boundaries() {
        let mut root = Block::root("abcdef");
        root.add_block(2, 3);

        assert_eq!(root.child_at(0), Some((0, 0)));
        assert_eq!(root.child_at(1), Some((0, 0)));
        assert_eq!(root.child_at(2), Some((1, 2)));
        assert_eq!(root.child_at(4), Some((2, 4)));
        // Past the end: last child
        assert_eq!(root.child_at(99), Some((2, 4)));
    }

    #[test]
    fn test_locate_descends_into_nested_blocks() {
        let root = nested_root();

        assert_eq!(locate(&root, 0), Location::new(vec![0], 0));
        assert_eq!(locate(&root, 3), Location::new(vec![1, 0], 1));
        assert_eq!(locate(&root, 4), Location::new(vec![1, 1, 0], 0));
        assert_eq!(locate(&root, 5), Location::new(vec![1, 2], 0));
        assert_eq!(locate(&root, 7), Location::new(vec![2], 1));
        assert_eq!(locate(&root, 50), Location::new(vec![2], 2));
    }

    #[test]
    fn test_locate_caret_prefers_left_segment() {
        let root = nested_root();

        assert_eq!(locate_caret(&root, 0), Location::new(vec![0], 0));
        assert_eq!(locate_caret(&root, 2), Location::new(vec![0], 2));
        assert_eq!(locate_caret(&root, 4), Location::new(vec![1, 0], 2));
        assert_eq!(locate_caret(&root, 8), Location::new(vec![2], 2));
        assert_eq!(locate_caret(&root, 80), Location::new(vec![2], 2));
    }

    #[test]
    fn test_global_offset_sums_starts() {
        let root = nested_root();

        assert_eq!(global_offset(&root, &[]), Some(0));
        assert_eq!(global_offset(&root, &[1]), Some(2));
        assert_eq!(global_offset(&root, &[1, 1]), Some(4));
        assert_eq!(global_offset(&root, &[1, 1, 0]), Some(4));
        assert_eq!(global_offset(&root, &[2]), Some(6));
        assert_eq!(global_offset(&root, &[0, 1]), None);
        assert_eq!(global_offset(&root, &[7]), None);
    }

    #[test]
    fn test_step_left_crosses_into_previous_sibling() {
        let root = nested_root();

        // Offset 0 of "ef" lands at the end of the block's last segment
        assert_eq!(
            root.step_left(&[2], 0),
            Step::Moved(Location::new(vec![1, 2], 1))
        );
        // Offset 0 of the inner block bubbles to its parent, which focuses "("+"c"
        assert_eq!(
            root.step_left(&[1, 1, 0], 0),
            Step::Moved(Location::new(vec![1, 0], 2))
        );
        assert_eq!(root.step_left(&[0], 0), Step::BeforeStart);
    }

    #[test]
    fn test_step_right_crosses_into_next_sibling() {
        let root = nested_root();

        assert_eq!(
            root.step_right(&[0], 2),
            Step::Moved(Location::new(vec![1, 0], 0))
        );
        assert_eq!(
            root.step_right(&[1, 0], 2),
            Step::Moved(Location::new(vec![1, 1, 0], 0))
        );
        assert_eq!(
            root.step_right(&[1, 2], 1),
            Step::Moved(Location::new(vec![2], 0))
        );
        assert_eq!(root.step_right(&[2], 2), Step::AfterEnd);
    }

    #[test]
    fn test_node_at_and_segment_at() {
        let root = nested_root();

        assert!(node_at(&root, &[]).is_none());
        assert!(node_at(&root, &[1]).unwrap().as_block().is_some());
        assert_eq!(segment_at(&root, &[1, 1, 0]).unwrap().text(), "d");
        assert!(segment_at(&root, &[1]).is_none());
    }
}
