use crate::cursor::{
    Localizable, RandomlyPositionable, RegionOfInterestCursor, Sampler, SamplerMut,
    SequentialIterable,
};
use crate::img::{ArrayImg, CellImg};
use crate::structure::{Dimensions, Position};

fn dims(sizes: &[usize]) -> Dimensions {
    Dimensions::new(sizes.to_vec()).unwrap()
}

fn value(p: &Position) -> i64 {
    p.iter().rev().fold(0, |acc, &c| 100 * acc + c)
}

fn drain<S: RandomlyPositionable + Sampler<Element = i64>>(
    cursor: &mut RegionOfInterestCursor<S>,
) -> Vec<(Position, i64)> {
    let mut out = Vec::new();
    while cursor.has_next() {
        cursor.fwd();
        out.push((cursor.position(), *cursor.get().unwrap()));
    }
    out
}

#[test]
fn region_is_walked_in_raster_order() {
    let img = ArrayImg::from_fn(dims(&[6, 5]), value);
    let mut ra = img.random_access();
    let mut roi = ra.region_of_interest(&[2, 1], dims(&[3, 2]));

    let visited = drain(&mut roi);
    let values: Vec<i64> = visited.iter().map(|(_, v)| *v).collect();
    assert_eq!(values, vec![102, 103, 104, 202, 203, 204]);
    for (p, v) in &visited {
        assert_eq!(*v, value(p));
    }
}

#[test]
fn region_completeness_on_cells() {
    let img = CellImg::from_fn(dims(&[7, 7, 3]), dims(&[3, 3, 2]), value).unwrap();
    let mut roi = RegionOfInterestCursor::new(img.random_access(), &[1, 2, 1], dims(&[5, 4, 2]));
    assert_eq!(roi.size(), &dims(&[5, 4, 2]));
    assert_eq!(roi.offset(), &Position::from([1, 2, 1]));

    let visited = drain(&mut roi);
    assert_eq!(visited.len(), 40);
    let size = roi.size().clone();
    for (i, (p, _)) in visited.iter().enumerate() {
        let local = size.expanded_position(i.into());
        let global: Position = local.iter().zip([1, 2, 1]).map(|(l, o)| l + o).collect();
        assert_eq!(*p, global);
    }
}

#[test]
fn reset_and_exhaustion() {
    let img = ArrayImg::from_fn(dims(&[4, 4]), value);
    let mut roi = RegionOfInterestCursor::new(img.random_access(), &[1, 1], dims(&[2, 2]));
    let first = drain(&mut roi);

    roi.fwd();
    assert!(!roi.has_next());
    assert_eq!(roi.get(), None);

    roi.reset();
    roi.reset();
    assert_eq!(drain(&mut roi), first);
    assert_eq!(roi.into_source().position(), Position::from([2, 2]));
}

#[test]
fn writes_inside_the_region() {
    let mut img = ArrayImg::<i64>::zeros(dims(&[4, 3]));
    {
        let mut roi =
            RegionOfInterestCursor::new(img.random_access_mut(), &[1, 0], dims(&[2, 3]));
        while roi.has_next() {
            roi.fwd();
            roi.set(1).unwrap();
        }
    }
    assert_eq!(img.data(), &[0, 1, 1, 0, 0, 1, 1, 0, 0, 1, 1, 0]);
}

#[test]
#[should_panic(expected = "dimensionality mismatch")]
fn region_must_match_the_source() {
    let img = ArrayImg::<i64>::zeros(dims(&[4, 3]));
    RegionOfInterestCursor::new(img.random_access(), &[1, 0], dims(&[2]));
}
