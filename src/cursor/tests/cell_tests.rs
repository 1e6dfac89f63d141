//! Tests for the chunk-crossing cursors

use ahash::AHashSet;

use crate::cursor::{
    CellCursor, Localizable, RandomlyPositionable, Sampler, SamplerMut, SequentialIterable,
};
use crate::img::{ArrayImg, CellImg, GetElement, Img};
use crate::structure::{Dimensions, Position};

fn dims(sizes: &[usize]) -> Dimensions {
    Dimensions::new(sizes.to_vec()).unwrap()
}

fn value(p: &Position) -> i64 {
    p.iter().rev().fold(0, |acc, &c| 100 * acc + c)
}

fn drain<C: SequentialIterable + Localizable + Sampler<Element = i64>>(
    cursor: &mut C,
) -> Vec<(Position, i64)> {
    let mut out = Vec::new();
    while cursor.has_next() {
        cursor.fwd();
        out.push((cursor.position(), *cursor.get().unwrap()));
    }
    out
}

#[test]
fn visits_cells_in_order_and_pixels_in_raster_order_within() {
    let img = CellImg::from_fn(dims(&[3, 2]), dims(&[2, 2]), value).unwrap();
    let mut cursor = img.cursor();
    let visited: Vec<Position> = drain(&mut cursor).into_iter().map(|(p, _)| p).collect();

    let expected: Vec<Position> = [[0, 0], [1, 0], [0, 1], [1, 1], [2, 0], [2, 1]]
        .into_iter()
        .map(Position::from)
        .collect();
    assert_eq!(visited, expected);
}

#[test]
fn chunk_crossing_equivalence() {
    for (sizes, cell_sizes) in [
        (vec![7, 5], vec![3, 2]),
        (vec![4, 4, 3], vec![2, 3, 2]),
        (vec![9], vec![4]),
        (vec![5, 3], vec![5, 3]),
        (vec![2, 3, 2, 2], vec![1, 2, 2, 1]),
    ] {
        let flat = ArrayImg::from_fn(dims(&sizes), value);
        let chunked = CellImg::from_fn(dims(&sizes), dims(&cell_sizes), value).unwrap();

        let mut flat_cursor = flat.random_access();
        let mut chunked_cursor = chunked.cursor();
        let mut seen = AHashSet::new();
        let mut count = 0;
        while chunked_cursor.has_next() {
            chunked_cursor.fwd();
            let p = chunked_cursor.position();
            flat_cursor.set_position(&p);
            assert_eq!(chunked_cursor.get(), flat_cursor.get(), "at {p}");
            assert!(seen.insert(p));
            count += 1;
        }
        assert_eq!(count, flat.size());
    }
}

#[test]
fn exhausted_cursor_parks_in_the_sentinel_state() {
    let img = CellImg::from_fn(dims(&[3, 3]), dims(&[2, 2]), value).unwrap();
    let mut cursor = img.cursor();
    drain(&mut cursor);
    let last = cursor.position();
    assert_eq!(cursor.cell_index(), 3);

    for _ in 0..3 {
        cursor.fwd();
        assert!(!cursor.has_next());
        assert_eq!(cursor.get(), None);
        assert_eq!(cursor.locator(), None);
        assert_eq!(cursor.cell_index(), img.num_cells());
    }
    assert_eq!(cursor.position(), last);

    cursor.reset();
    assert!(cursor.has_next());
    cursor.fwd();
    assert_eq!(cursor.position(), Position::from([0, 0]));
}

#[test]
fn reset_matches_a_fresh_cursor() {
    let img = CellImg::from_fn(dims(&[5, 4]), dims(&[2, 3]), value).unwrap();
    let fresh = drain(&mut CellCursor::new(&img));

    let mut cursor = img.cursor();
    cursor.jump_fwd(9);
    cursor.reset();
    cursor.reset();
    assert_eq!(cursor.cell_index(), 0);
    assert_eq!(cursor.get(), None);
    assert_eq!(drain(&mut cursor), fresh);
}

#[test]
fn clone_forks_at_the_same_position() {
    let img = CellImg::from_fn(dims(&[4, 4]), dims(&[2, 2]), value).unwrap();
    let mut cursor = img.cursor();
    cursor.jump_fwd(6);
    let mut fork = cursor.clone();

    assert_eq!(fork.position(), cursor.position());
    assert_eq!(drain(&mut fork).len(), 10);
    assert_eq!(cursor.position(), Position::from([3, 0]));
    assert_eq!(drain(&mut cursor).len(), 10);
}

#[test]
fn cell_cursor_writes_reach_the_right_cell() {
    let mut img = CellImg::<i64>::zeros(dims(&[3, 3]), dims(&[2, 2])).unwrap();
    {
        let mut cursor = img.cursor_mut();
        while cursor.has_next() {
            cursor.fwd();
            let v = value(&cursor.position());
            cursor.set(v).unwrap();
        }
    }
    let expected = CellImg::from_fn(dims(&[3, 3]), dims(&[2, 2]), value).unwrap();
    assert_eq!(img, expected);
}

#[test]
fn random_access_crosses_cells() {
    let img = CellImg::from_fn(dims(&[5, 5]), dims(&[2, 2]), value).unwrap();
    let mut ra = img.random_access();
    assert_eq!(ra.position(), Position::from([0, 0]));
    assert_eq!(ra.get(), Some(&0));

    ra.fwd_dim(0);
    assert_eq!(ra.cell_index(), Some(0));
    ra.fwd_dim(0);
    assert_eq!(ra.cell_index(), Some(1));
    assert_eq!(ra.get(), Some(&2));

    ra.move_dim(3, 1);
    assert_eq!(ra.cell_index(), Some(4));
    assert_eq!(ra.get(), Some(&302));

    ra.move_to(&[4, 4]);
    assert_eq!(ra.cell_index(), Some(8));
    assert_eq!(ra.get(), Some(&404));

    ra.bck_dim(1);
    assert_eq!(ra.get(), Some(&304));
    assert_eq!(ra.locator(), Some(img.locate(&[4, 3])));
}

#[test]
fn random_access_outside_the_image_reads_nothing() {
    let img = CellImg::from_fn(dims(&[4, 4]), dims(&[2, 2]), value).unwrap();
    let mut ra = img.random_access();
    ra.set_position(&[1, 1]);

    ra.move_dim(-2, 0);
    assert_eq!(ra.cell_index(), None);
    assert_eq!(ra.get(), None);

    ra.move_dim(5, 0);
    assert_eq!(ra.cell_index(), None);
    assert_eq!(ra.get(), None);

    ra.move_dim(-1, 0);
    assert_eq!(ra.get(), Some(&103));
}

#[test]
fn random_access_matches_flat_random_access() {
    let sizes = [6, 5, 3];
    let flat = ArrayImg::from_fn(dims(&sizes), value);
    let chunked = CellImg::from_fn(dims(&sizes), dims(&[4, 2, 2]), value).unwrap();

    let mut a = flat.random_access();
    let mut b = chunked.random_access();
    a.set_position(&[0, 0, 0]);
    b.set_position(&[0, 0, 0]);

    let moves: [(i64, usize); 10] = [
        (3, 0),
        (2, 1),
        (1, 2),
        (2, 0),
        (-2, 1),
        (1, 2),
        (-5, 0),
        (4, 1),
        (-2, 2),
        (1, 0),
    ];
    for (delta, dim) in moves {
        a.move_dim(delta, dim);
        b.move_dim(delta, dim);
        assert_eq!(a.position(), b.position());
        assert_eq!(a.get(), b.get(), "at {}", b.position());
    }
}

#[test]
fn random_access_writes() {
    let mut img = CellImg::<i64>::zeros(dims(&[3, 3]), dims(&[2, 2])).unwrap();
    let mut ra = img.random_access_mut();
    ra.set_position(&[2, 2]);
    ra.set(7).unwrap();
    ra.move_dim(-2, 1);
    *ra.get_mut().unwrap() = 3;
    ra.fwd_dim(0);
    assert!(ra.set(1).is_err());

    assert_eq!(img.get_ref(&[2, 2]).unwrap(), &7);
    assert_eq!(img.get_ref(&[2, 0]).unwrap(), &3);
}

#[test]
fn display_shows_position_and_value() {
    let img = CellImg::from_fn(dims(&[3, 3]), dims(&[2, 2]), value).unwrap();
    let mut cursor = img.cursor();
    cursor.jump_fwd(5);
    assert_eq!(cursor.to_string(), "(2, 0) = 2");
}
