//! Odometer stepping through a box
//!
//! [`raster_step`] is the one place that knows how to advance a position in
//! raster order (dimension 0 fastest) inside an arbitrary box. The
//! [`ZeroMinIntervalIterator`] wraps it into a localizing iterator over
//! `[0, size)` that drives the neighborhood and region-of-interest cursors.

use super::traits::{Localizable, SequentialIterable};
use crate::structure::{index_to_position, Coordinate, Dimensions, FlatIndex};

/// Advances `position` to its raster successor inside the box starting at
/// `origin` with extent `extent`.
///
/// The first dimension that still has room is incremented and all lower
/// dimensions go back to their origin. Returns `false`, leaving `position`
/// untouched, if `position` was the last position of the box.
pub fn raster_step(position: &mut [Coordinate], origin: &[Coordinate], extent: &[usize]) -> bool {
    for d in 0..position.len() {
        if position[d] < origin[d] + extent[d] as Coordinate - 1 {
            position[d] += 1;
            position[..d].copy_from_slice(&origin[..d]);
            return true;
        }
    }
    false
}

/// Localizing iterator over the zero-min box of the given dimensions.
///
/// Starts before the first position, see [`SequentialIterable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZeroMinIntervalIterator {
    dimensions: Dimensions,
    origin: Vec<Coordinate>,
    position: Vec<Coordinate>,
    index: i64,
    last_index: i64,
}

impl ZeroMinIntervalIterator {
    pub fn new(dimensions: Dimensions) -> Self {
        let n = dimensions.num_dimensions();
        let last_index = dimensions.size() as i64 - 1;
        let mut iter = ZeroMinIntervalIterator {
            dimensions,
            origin: vec![0; n],
            position: vec![0; n],
            index: -1,
            last_index,
        };
        iter.reset();
        iter
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    /// Linear index of the current position, `None` before the first step
    /// and after exhaustion.
    pub fn index(&self) -> Option<FlatIndex> {
        if (0..=self.last_index).contains(&self.index) {
            FlatIndex::from_signed(self.index)
        } else {
            None
        }
    }

    pub fn current(&self) -> &[Coordinate] {
        &self.position
    }
}

impl SequentialIterable for ZeroMinIntervalIterator {
    fn fwd(&mut self) {
        if self.index >= self.last_index {
            self.index = self.last_index + 1;
            return;
        }
        self.index += 1;
        raster_step(&mut self.position, &self.origin, &self.dimensions);
    }

    fn has_next(&self) -> bool {
        self.index < self.last_index
    }

    fn reset(&mut self) {
        self.index = -1;
        self.position.fill(0);
        if let Some(first) = self.position.first_mut() {
            *first = -1;
        }
    }

    fn jump_fwd(&mut self, steps: usize) {
        let target = self.index.saturating_add(steps as i64);
        if target > self.last_index {
            self.index = self.last_index + 1;
            return;
        }
        self.index = target;
        if let Some(index) = FlatIndex::from_signed(target) {
            index_to_position(index, &self.dimensions, &mut self.position);
        }
    }
}

impl Localizable for ZeroMinIntervalIterator {
    fn num_dimensions(&self) -> usize {
        self.position.len()
    }

    fn position_dim(&self, dim: usize) -> Coordinate {
        self.position[dim]
    }
}
