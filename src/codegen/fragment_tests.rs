// Grid Fragment Tests

use super::*;
use crate::codegen::tags::{TagArena, TagKind};
use test_log::test;

fn digit(d: u8) -> Command {
    Command::digit(d).unwrap()
}

fn label(arena: &mut TagArena, name: &str) -> TagId {
    arena.allocate(TagKind::Label {
        name: name.to_string(),
    })
}

#[test]
fn test_out_of_bounds_read_is_empty_and_pure() {
    let mut fragment = GridFragment::new();
    fragment.set(0, 0, digit(1)).unwrap();
    let before = fragment.clone();

    assert!(fragment.get(5, 5).is_empty());
    assert!(fragment.get(-3, 0).is_empty());
    assert!(fragment.get(0, -1).is_empty());
    assert_eq!(fragment, before);
}

#[test]
fn test_write_to_occupied_cell_fails() {
    let mut fragment = GridFragment::new();
    fragment.set(0, 0, digit(1)).unwrap();

    match fragment.set(0, 0, digit(2)) {
        Err(CodeGenError::InvalidCodeManipulation { x, y, .. }) => {
            assert_eq!((x, y), (0, 0));
        }
        other => panic!("expected occupied-cell failure, got {:?}", other),
    }
    // an empty command is rejected as well, the cell is simply taken
    assert!(fragment.set(0, 0, Command::unused()).is_err());
    assert_eq!(fragment.get(0, 0), digit(1));
}

#[test]
fn test_empty_over_empty_is_idempotent() {
    let mut fragment = GridFragment::new();
    fragment.set(2, 1, Command::unused()).unwrap();
    fragment.set(2, 1, Command::unused()).unwrap();

    assert_eq!((fragment.width(), fragment.height()), (3, 2));
    assert_eq!(fragment.cells().count(), 0);
}

#[test]
fn test_tagged_empty_cell_is_occupied() {
    let mut arena = TagArena::new();
    let tag = label(&mut arena, "marker");
    let mut fragment = GridFragment::new();
    fragment.set(0, 0, Command::unused().with_tag(tag)).unwrap();

    assert!(fragment.set(0, 0, digit(3)).is_err());
    assert_eq!(fragment.cells().count(), 1);
}

#[test]
fn test_duplicate_tag_is_rejected() {
    let mut arena = TagArena::new();
    let tag = label(&mut arena, "target");
    let mut fragment = GridFragment::new();
    fragment.set(0, 0, digit(1).with_tag(tag)).unwrap();

    assert_eq!(
        fragment.set(1, 0, digit(2).with_tag(tag)),
        Err(CodeGenError::DuplicateTag {
            tag,
            x: 1,
            y: 0,
            existing_x: 0,
            existing_y: 0,
        })
    );
}

#[test]
fn test_structurally_equal_tags_are_distinct() {
    let mut arena = TagArena::new();
    let first = label(&mut arena, "same");
    let second = label(&mut arena, "same");
    let mut fragment = GridFragment::new();
    fragment.set(0, 0, digit(1).with_tag(first)).unwrap();
    fragment.set(1, 0, digit(2).with_tag(second)).unwrap();

    assert_ne!(first, second);
    assert_eq!(fragment.find_tag(first), Some((0, 0)));
    assert_eq!(fragment.find_tag(second), Some((1, 0)));
}

#[test]
fn test_expansion_into_negative_coordinates() {
    let mut fragment = GridFragment::new();
    fragment.set(-2, -1, digit(4)).unwrap();

    assert_eq!(fragment.min_x(), -2);
    assert_eq!(fragment.min_y(), -1);
    assert_eq!(fragment.max_x(), 0);
    assert_eq!(fragment.max_y(), 0);
    assert_eq!(fragment.get(-2, -1), digit(4));
    assert!(fragment.get(-1, -1).is_empty());
}

#[test]
fn test_normalize_is_shape_preserving() {
    let mut arena = TagArena::new();
    let tag = label(&mut arena, "origin");
    let mut fragment = GridFragment::new();
    fragment.set(-2, -1, digit(1)).unwrap();
    fragment.set(1, 2, digit(3)).unwrap();
    fragment.set(0, 0, Command::new(CommandKind::Add).with_tag(tag)).unwrap();

    let before: Vec<_> = fragment.cells().collect();
    let (dx, dy) = (-fragment.min_x(), -fragment.min_y());
    fragment.normalize();

    assert_eq!((fragment.min_x(), fragment.min_y()), (0, 0));
    for (x, y, command) in before {
        assert_eq!(fragment.get(x + dx, y + dy), command);
    }
    assert_eq!(fragment.find_tag(tag), Some((2, 1)));
}

#[test]
fn test_copy_is_independent() {
    let original = GridFragment::single(digit(1)).unwrap();
    let mut copy = original.clone();
    copy.set(1, 0, digit(2)).unwrap();

    assert_eq!(original.width(), 1);
    assert!(original.get(1, 0).is_empty());
    assert_eq!(copy.get(1, 0), digit(2));
}

#[test]
fn test_copy_normalized_leaves_source_alone() {
    let mut source = GridFragment::new();
    source.set(-3, 0, digit(7)).unwrap();
    let copy = source.copy_normalized();

    assert_eq!(source.min_x(), -3);
    assert_eq!(copy.min_x(), 0);
    assert_eq!(copy.get(0, 0), digit(7));
}

#[test]
fn test_fill_swaps_bounds_and_tags_corner() {
    let mut arena = TagArena::new();
    let tag = label(&mut arena, "array");
    let mut fragment = GridFragment::new();
    fragment
        .fill(3, 2, 0, 0, Command::chr('x'), Some(tag))
        .unwrap();

    assert_eq!((fragment.width(), fragment.height()), (3, 2));
    assert_eq!(fragment.cells().count(), 6);
    assert_eq!(fragment.find_tag(tag), Some((0, 0)));
    assert_eq!(fragment.get(2, 1).tag, None);
}

#[test]
fn test_fill_column_walkway_skips_occupied_cells() {
    let mut fragment = GridFragment::new();
    fragment.set(0, 1, digit(5)).unwrap();
    fragment.fill_column_walkway(0, 3, 0).unwrap();

    assert_eq!(fragment.get(0, 0).kind, CommandKind::Walkway);
    assert_eq!(fragment.get(0, 1), digit(5));
    assert_eq!(fragment.get(0, 2).kind, CommandKind::Walkway);
}

#[test]
fn test_blit_collision_is_fatal() {
    let mut target = GridFragment::new();
    target.set(1, 0, digit(1)).unwrap();
    let source = GridFragment::single(digit(2)).unwrap();

    assert!(matches!(
        target.blit(1, 0, &source),
        Err(CodeGenError::InvalidCodeManipulation { x: 1, y: 0, .. })
    ));

    target.blit(2, 0, &source).unwrap();
    assert_eq!(target.width(), 3);
    assert_eq!(target.get(2, 0), digit(2));
}

#[test]
fn test_blit_covers_full_extent() {
    let mut source = GridFragment::new();
    source.set(0, 0, digit(1)).unwrap();
    source.set(3, 2, Command::unused()).unwrap();

    let mut target = GridFragment::new();
    target.blit(1, 1, &source).unwrap();
    assert_eq!(target.max_x(), 5);
    assert_eq!(target.max_y(), 4);
}

#[test]
fn test_remove_column_moves_tags() {
    let mut arena = TagArena::new();
    let kept = label(&mut arena, "kept");
    let dropped = label(&mut arena, "dropped");
    let mut fragment = GridFragment::from_lines(&["1a2"]).unwrap();
    fragment.set_tag(2, 0, kept).unwrap();
    fragment.set_tag(1, 0, dropped).unwrap();

    fragment.remove_column(1).unwrap();

    assert_eq!(fragment.width(), 2);
    assert_eq!(fragment.get(1, 0).glyph(), '2');
    assert_eq!(fragment.find_tag(kept), Some((1, 0)));
    assert!(!fragment.has_tag(dropped));
    assert!(fragment.remove_column(5).is_err());
}

#[test]
fn test_remove_row() {
    let mut fragment = GridFragment::from_lines(&["1", "2", "3"]).unwrap();
    fragment.remove_row(0).unwrap();

    assert_eq!(fragment.height(), 2);
    assert_eq!(fragment.to_lines(' '), vec!["2", "3"]);
}

#[test]
fn test_mirror_twice_restores() {
    let mut arena = TagArena::new();
    let tag = label(&mut arena, "corner");
    let mut fragment = GridFragment::from_lines(&["12+", "v :"]).unwrap();
    fragment.set_tag(2, 1, tag).unwrap();
    let original = fragment.clone();

    fragment.mirror_x().unwrap();
    assert_eq!(fragment.to_lines(' '), vec!["+21", ": v"]);
    assert_eq!(fragment.find_tag(tag), Some((0, 1)));

    fragment.mirror_x().unwrap();
    assert_eq!(fragment, original);
}

#[test]
fn test_mirror_rejects_direction_dependent_cell() {
    let mut fragment = GridFragment::from_lines(&["1>2"]).unwrap();
    let before = fragment.clone();

    assert_eq!(
        fragment.mirror_x(),
        Err(CodeGenError::NonMirrorableCell {
            x: 1,
            y: 0,
            glyph: '>'
        })
    );
    assert_eq!(fragment, before);
}

#[test]
fn test_shape_queries() {
    let fragment = GridFragment::from_lines(&["1  ", " 2 "]).unwrap();
    assert!(!fragment.is_h_flat());
    assert!(!fragment.is_v_flat());
    assert!(fragment.is_row_single(0));
    assert!(fragment.first_row_is_single());
    assert!(fragment.last_row_is_single());
    assert!(fragment.is_column_single(0));
    assert!(!fragment.is_column_single(2));

    let flat = GridFragment::from_lines(&["123"]).unwrap();
    assert!(flat.is_h_flat());
    assert!(!flat.is_row_single(0));
}

#[test]
fn test_force_non_empty() {
    let mut empty = GridFragment::new();
    empty.force_non_empty(Command::new(CommandKind::PcDown)).unwrap();
    assert_eq!(empty.to_lines(' '), vec!["v"]);

    let mut filled = GridFragment::single(digit(1)).unwrap();
    filled.force_non_empty(Command::new(CommandKind::PcDown)).unwrap();
    assert_eq!(filled.to_lines(' '), vec!["1"]);
}

#[test]
fn test_set_tag_rules() {
    let mut arena = TagArena::new();
    let entry = label(&mut arena, "entry");
    let other = label(&mut arena, "other");
    let mut fragment = GridFragment::from_lines(&["v1"]).unwrap();

    fragment.set_tag(0, 0, entry).unwrap();
    fragment.set_tag(0, 0, entry).unwrap();
    assert_eq!(fragment.get(0, 0).kind, CommandKind::PcDown);
    assert!(fragment.set_tag(1, 0, entry).is_err());
    assert!(fragment.set_tag(0, 0, other).is_err());
}

#[test]
fn test_render_uses_unused_glyph() {
    let mut fragment = GridFragment::from_lines(&["1 2"]).unwrap();
    fragment.set(3, 0, Command::walkway()).unwrap();

    assert_eq!(fragment.to_lines('.'), vec!["1.2 "]);
    assert_eq!(fragment.to_string(), "1 2 \n");
}
