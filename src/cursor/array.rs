//! Cursors over a flat [`ArrayImg`]
//!
//! Both cursors hold the image through any pointer that derefs to it: a
//! shared reference gives a read-only cursor that can be cloned, a mutable
//! reference gives a cursor that can also write.

use std::ops::{Deref, DerefMut};

use super::interval::raster_step;
use super::traits::{Localizable, RandomlyPositionable, Sampler, SamplerMut, SequentialIterable};
use crate::img::{array::signed_strides, ArrayImg, GetElement, Img, SetElement};
use crate::structure::{linear_offset, Coordinate, FlatIndex, Position};

/// Plain raster cursor.
///
/// Only tracks the linear index; the position is derived on demand.
#[derive(Debug, Clone)]
pub struct ArrayCursor<I> {
    img: I,
    strides: Vec<i64>,
    index: i64,
    size: i64,
}

impl<T, I: Deref<Target = ArrayImg<T>>> ArrayCursor<I> {
    pub fn new(img: I) -> Self {
        let size = img.size() as i64;
        let strides = signed_strides(img.dimensions());
        ArrayCursor {
            img,
            strides,
            index: -1,
            size,
        }
    }

    pub fn img(&self) -> &ArrayImg<T> {
        &self.img
    }

    /// Storage locator of the current element
    pub fn locator(&self) -> Option<FlatIndex> {
        if self.index < self.size {
            FlatIndex::from_signed(self.index)
        } else {
            None
        }
    }
}

impl<T, I: Deref<Target = ArrayImg<T>>> SequentialIterable for ArrayCursor<I> {
    fn fwd(&mut self) {
        self.index = (self.index + 1).min(self.size);
    }

    fn has_next(&self) -> bool {
        self.index < self.size - 1
    }

    fn reset(&mut self) {
        self.index = -1;
    }

    fn jump_fwd(&mut self, steps: usize) {
        self.index = self.index.saturating_add(steps as i64).min(self.size);
    }
}

impl<T, I: Deref<Target = ArrayImg<T>>> Localizable for ArrayCursor<I> {
    fn num_dimensions(&self) -> usize {
        self.img.num_dimensions()
    }

    fn position_dim(&self, dim: usize) -> Coordinate {
        if self.index < 0 {
            return if dim == 0 { -1 } else { 0 };
        }
        let component = self.index / self.strides[dim];
        if dim + 1 == self.strides.len() {
            component
        } else {
            component % self.img.dimensions().dim(dim) as Coordinate
        }
    }

    fn localize(&self, position: &mut [Coordinate]) {
        match FlatIndex::from_signed(self.index) {
            Some(index) => self.img.dimensions().index_to_position(index, position),
            None => {
                self.img.dimensions().index_to_position(0.into(), position);
                if let Some(first) = position.first_mut() {
                    *first = -1;
                }
            }
        }
    }

    fn position(&self) -> Position {
        let mut position = Position::origin(self.num_dimensions());
        self.localize(&mut position);
        position
    }
}

impl<T, I: Deref<Target = ArrayImg<T>>> Sampler for ArrayCursor<I> {
    type Element = T;

    fn get(&self) -> Option<&T> {
        self.img.get_at(self.locator()?)
    }
}

impl<T, I: DerefMut<Target = ArrayImg<T>>> SamplerMut for ArrayCursor<I> {
    fn get_mut(&mut self) -> Option<&mut T> {
        let locator = self.locator()?;
        self.img.get_mut_at(locator)
    }
}

/// Localizable-by-dim cursor over an [`ArrayImg`].
///
/// Keeps the position and the signed linear index in lockstep: every move
/// along one dimension adds `delta * stride[dim]` to the index. Sequential
/// stepping walks the image in raster order like [`ArrayCursor`] but also
/// maintains the position.
#[derive(Debug, Clone)]
pub struct ArrayRandomAccess<I> {
    img: I,
    strides: Vec<i64>,
    origin: Vec<Coordinate>,
    position: Position,
    index: i64,
    size: i64,
}

impl<T, I: Deref<Target = ArrayImg<T>>> ArrayRandomAccess<I> {
    pub fn new(img: I) -> Self {
        let n = img.num_dimensions();
        let strides = signed_strides(img.dimensions());
        let size = img.size() as i64;
        let mut cursor = ArrayRandomAccess {
            img,
            strides,
            origin: vec![0; n],
            position: Position::origin(n),
            index: -1,
            size,
        };
        cursor.reset();
        cursor
    }

    pub fn img(&self) -> &ArrayImg<T> {
        &self.img
    }

    /// Signed linear index, negative or past the end outside the image.
    pub fn linear_index(&self) -> i64 {
        self.index
    }

    /// Storage locator of the current element, if inside the buffer.
    pub fn locator(&self) -> Option<FlatIndex> {
        if self.index < self.size {
            FlatIndex::from_signed(self.index)
        } else {
            None
        }
    }
}

impl<T, I: Deref<Target = ArrayImg<T>>> SequentialIterable for ArrayRandomAccess<I> {
    fn fwd(&mut self) {
        if self.index >= self.size - 1 {
            if self.index == self.size - 1 {
                // one past the end: last dimension overflows, the rest restart
                self.index = self.size;
                if let Some((last, lower)) = self.position.split_last_mut() {
                    lower.fill(0);
                    *last = self.img.dimensions().dim(lower.len()) as Coordinate;
                }
            }
            return;
        }
        self.index += 1;
        raster_step(&mut self.position, &self.origin, self.img.dimensions());
    }

    fn has_next(&self) -> bool {
        self.index < self.size - 1
    }

    fn reset(&mut self) {
        self.position.fill(0);
        if let Some(first) = self.position.first_mut() {
            *first = -1;
        }
        self.index = -1;
    }
}

impl<T, I: Deref<Target = ArrayImg<T>>> Localizable for ArrayRandomAccess<I> {
    fn num_dimensions(&self) -> usize {
        self.position.len()
    }

    fn position_dim(&self, dim: usize) -> Coordinate {
        self.position[dim]
    }

    fn position(&self) -> Position {
        self.position.clone()
    }
}

impl<T, I: Deref<Target = ArrayImg<T>>> RandomlyPositionable for ArrayRandomAccess<I> {
    fn set_position(&mut self, position: &[Coordinate]) {
        self.position.copy_from(position);
        self.index = linear_offset(&self.position, &self.strides);
    }

    fn set_position_dim(&mut self, value: Coordinate, dim: usize) {
        let delta = value - self.position[dim];
        self.move_dim(delta, dim);
    }

    fn move_dim(&mut self, delta: Coordinate, dim: usize) {
        self.index = self
            .index
            .wrapping_add(delta.wrapping_mul(self.strides[dim]));
        self.position[dim] += delta;
    }

    fn fwd_dim(&mut self, dim: usize) {
        self.index = self.index.wrapping_add(self.strides[dim]);
        self.position[dim] += 1;
    }

    fn bck_dim(&mut self, dim: usize) {
        self.index = self.index.wrapping_sub(self.strides[dim]);
        self.position[dim] -= 1;
    }
}

impl<T, I: Deref<Target = ArrayImg<T>>> Sampler for ArrayRandomAccess<I> {
    type Element = T;

    fn get(&self) -> Option<&T> {
        self.img.get_at(self.locator()?)
    }
}

impl<T, I: DerefMut<Target = ArrayImg<T>>> SamplerMut for ArrayRandomAccess<I> {
    fn get_mut(&mut self) -> Option<&mut T> {
        let locator = self.locator()?;
        self.img.get_mut_at(locator)
    }
}
