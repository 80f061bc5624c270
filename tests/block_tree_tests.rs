use querybuilder::document::tree::{BlockTree, TreeEvent};
use querybuilder::theme::palette::PALETTE;

fn ranges(tree: &BlockTree) -> Vec<(usize, usize)> {
    tree.blocks().iter().map(|b| (b.start, b.end)).collect()
}

#[test]
fn test_add_block_splits_segment() {
    let mut tree = BlockTree::with_text("tag:vacation AND size:>1MB");
    assert!(tree.add_block(0, 11));
    assert!(tree.add_block(17, 25));

    assert_eq!(ranges(&tree), vec![(0, 11), (17, 25)]);
    assert_eq!(tree.text(), "tag:vacation AND size:>1MB");
    assert_eq!(tree.root().children().len(), 3);
}

#[test]
fn test_sibling_blocks_take_successive_colors() {
    let mut tree = BlockTree::with_text("aa bb cc");
    tree.add_block(0, 1);
    tree.add_block(3, 4);
    tree.add_block(6, 7);

    let colors: Vec<_> = tree.blocks().iter().map(|b| b.color).collect();
    assert_eq!(colors, vec![Some(PALETTE[0]), Some(PALETTE[1]), Some(PALETTE[2])]);
}

#[test]
fn test_nested_block_never_reuses_parent_color() {
    let mut tree = BlockTree::with_text("tag:(a OR b) x");
    assert!(tree.add_block(0, 11));
    assert!(tree.add_block(5, 5));

    let blocks = tree.blocks();
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[1].depth, 2);
    assert_ne!(blocks[0].color, blocks[1].color);
    assert_eq!(blocks[1].path, vec![0, 1]);
}

#[test]
fn test_add_block_twice_is_noop() {
    let mut tree = BlockTree::with_text("abcdef");
    assert!(tree.add_block(0, 3));
    assert!(!tree.add_block(0, 3));
    assert_eq!(tree.blocks().len(), 1);
}

#[test]
fn test_add_block_rejects_straddling_range() {
    let mut tree = BlockTree::with_text("abcdef");
    tree.add_block(1, 2);
    assert!(!tree.add_block(0, 4));
    assert!(!tree.add_block(2, 9));
    assert!(!tree.add_block(4, 3));
    assert_eq!(ranges(&tree), vec![(1, 2)]);
}

#[test]
fn test_close_block_keeps_text() {
    let mut tree = BlockTree::with_text("foo bar baz");
    tree.add_block(4, 6);
    tree.set_cursor_position(5);
    tree.take_events();

    assert!(tree.close_block_at_cursor());
    assert!(tree.is_flat());
    assert_eq!(tree.text(), "foo bar baz");
    assert_eq!(tree.cursor_position(), 5);
    assert_eq!(tree.take_events(), vec![TreeEvent::BlockClosed]);
}

#[test]
fn test_close_outside_block_does_nothing() {
    let mut tree = BlockTree::with_text("foo bar");
    tree.add_block(4, 6);
    tree.set_cursor_position(1);
    assert!(!tree.close_block_at_cursor());
    assert_eq!(tree.blocks().len(), 1);
}

#[test]
fn test_editing_inside_block_grows_it() {
    let mut tree = BlockTree::with_text("tag:work music");
    tree.add_block(0, 7);
    tree.set_cursor_position(8);
    tree.insert_text("s");

    assert_eq!(tree.text(), "tag:works music");
    assert_eq!(ranges(&tree), vec![(0, 8)]);
    assert_eq!(tree.cursor_position(), 9);
}

#[test]
fn test_delete_backward_and_forward() {
    let mut tree = BlockTree::with_text("abc");
    tree.set_cursor_position(2);

    assert!(tree.delete_backward());
    assert_eq!(tree.text(), "ac");
    assert_eq!(tree.cursor_position(), 1);

    assert!(tree.delete_forward());
    assert_eq!(tree.text(), "a");
    assert!(!tree.delete_forward());

    tree.move_home();
    assert!(!tree.delete_backward());
}

#[test]
fn test_splice_flattens_and_signals_change() {
    let mut tree = BlockTree::with_text("tag:wo x");
    tree.add_block(0, 5);
    tree.take_events();

    tree.splice(0, 6, "tag:work");
    assert_eq!(tree.text(), "tag:work x");
    assert!(tree.is_flat());
    assert_eq!(tree.take_events(), vec![TreeEvent::TextChanged]);
}

#[test]
fn test_events_are_coalesced() {
    let mut tree = BlockTree::new();
    tree.insert_text("a");
    tree.insert_text("b");
    tree.move_left();

    assert_eq!(
        tree.take_events(),
        vec![TreeEvent::CursorChanged(1), TreeEvent::TextChanged]
    );
    assert!(tree.take_events().is_empty());
}

#[test]
fn test_unicode_offsets_are_characters() {
    let mut tree = BlockTree::with_text("tag:café x");
    assert!(tree.add_block(0, 7));
    tree.move_end();
    assert_eq!(tree.cursor_position(), 10);
    assert_eq!(tree.blocks()[0].end, 7);
}
