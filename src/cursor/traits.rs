//! Capability traits of the cursor family
//!
//! A cursor implements only what it supports: reading (and maybe writing)
//! the element under it, stepping through a sequence of positions, reporting
//! its position, and being repositioned at random. Derived cursors such as
//! [`LocalNeighborhoodCursor`] only ask for [`RandomlyPositionable`].

use anyhow::{anyhow, Result};

use super::{LocalNeighborhoodCursor, RegionOfInterestCursor};
use crate::structure::{Coordinate, Dimensions, Position};

/// Read access to the element under a cursor
pub trait Sampler {
    type Element;

    /// The element at the current position, `None` when the cursor does not
    /// point at a stored element (before the first step, after exhaustion, or
    /// outside the image).
    fn get(&self) -> Option<&Self::Element>;
}

/// Write access to the element under a cursor
pub trait SamplerMut: Sampler {
    fn get_mut(&mut self) -> Option<&mut Self::Element>;

    /// Overwrites the element at the current position
    ///
    /// # Errors
    ///
    /// If the cursor does not point at a stored element.
    fn set(&mut self, value: Self::Element) -> Result<()> {
        let slot = self
            .get_mut()
            .ok_or_else(|| anyhow!("cursor does not point at an element"))?;
        *slot = value;
        Ok(())
    }
}

/// Stepping through a fixed sequence of positions.
///
/// A fresh (or reset) cursor sits before its first element: call
/// [`fwd`](Self::fwd) once before reading. Stepping past the last element
/// parks the cursor in an exhausted state; it never wraps around and further
/// calls to `fwd` leave it there.
pub trait SequentialIterable {
    fn fwd(&mut self);

    /// Whether another call to `fwd` reaches an element
    fn has_next(&self) -> bool;

    /// Back to before the first element
    fn reset(&mut self);

    fn jump_fwd(&mut self, steps: usize) {
        for _ in 0..steps {
            self.fwd();
        }
    }
}

pub trait Localizable {
    fn num_dimensions(&self) -> usize;

    fn position_dim(&self, dim: usize) -> Coordinate;

    /// Writes the current position into `position`.
    ///
    /// # Panics
    ///
    /// On a dimensionality mismatch.
    fn localize(&self, position: &mut [Coordinate]) {
        assert_eq!(
            position.len(),
            self.num_dimensions(),
            "dimensionality mismatch"
        );
        for (d, p) in position.iter_mut().enumerate() {
            *p = self.position_dim(d);
        }
    }

    fn position(&self) -> Position {
        (0..self.num_dimensions())
            .map(|d| self.position_dim(d))
            .collect()
    }
}

/// Random repositioning, absolute or relative along single axes.
///
/// None of these operations check bounds: moving outside the image is allowed
/// and only makes [`Sampler::get`] return `None` (or garbage, for flat images,
/// when the linear index happens to land inside the buffer).
pub trait RandomlyPositionable: Localizable {
    fn set_position(&mut self, position: &[Coordinate]);

    fn set_position_dim(&mut self, value: Coordinate, dim: usize);

    /// Moves by `delta` along `dim` without resolving the whole position again.
    fn move_dim(&mut self, delta: Coordinate, dim: usize);

    fn fwd_dim(&mut self, dim: usize) {
        self.move_dim(1, dim);
    }

    fn bck_dim(&mut self, dim: usize) {
        self.move_dim(-1, dim);
    }

    /// Relative move, one [`move_dim`](Self::move_dim) per dimension.
    ///
    /// # Panics
    ///
    /// On a dimensionality mismatch.
    fn move_by(&mut self, delta: &[Coordinate]) {
        assert_eq!(delta.len(), self.num_dimensions(), "dimensionality mismatch");
        for (d, &k) in delta.iter().enumerate() {
            if k != 0 {
                self.move_dim(k, d);
            }
        }
    }

    /// Absolute move that only touches the dimensions that differ.
    ///
    /// # Panics
    ///
    /// On a dimensionality mismatch.
    fn move_to(&mut self, position: &[Coordinate]) {
        assert_eq!(
            position.len(),
            self.num_dimensions(),
            "dimensionality mismatch"
        );
        for (d, &p) in position.iter().enumerate() {
            let dist = p - self.position_dim(d);
            if dist != 0 {
                self.move_dim(dist, d);
            }
        }
    }

    /// Jumps to the position of another cursor.
    fn set_position_from<L: Localizable + ?Sized>(&mut self, other: &L) {
        self.set_position(&other.position());
    }

    /// Lends this cursor to a neighborhood cursor around `center`.
    ///
    /// The neighborhood holds the only mutable borrow, so no other derived
    /// cursor can drive this one until it is dropped.
    fn local_neighborhood(&mut self, center: &[Coordinate]) -> LocalNeighborhoodCursor<&mut Self>
    where
        Self: Sized,
    {
        LocalNeighborhoodCursor::new(self, center)
    }

    /// Lends this cursor to a cursor over the box `[offset, offset + size)`.
    fn region_of_interest(
        &mut self,
        offset: &[Coordinate],
        size: Dimensions,
    ) -> RegionOfInterestCursor<&mut Self>
    where
        Self: Sized,
    {
        RegionOfInterestCursor::new(self, offset, size)
    }
}

impl<S: Sampler + ?Sized> Sampler for &mut S {
    type Element = S::Element;

    fn get(&self) -> Option<&Self::Element> {
        (**self).get()
    }
}

impl<S: SamplerMut + ?Sized> SamplerMut for &mut S {
    fn get_mut(&mut self) -> Option<&mut Self::Element> {
        (**self).get_mut()
    }
}

impl<L: Localizable + ?Sized> Localizable for &mut L {
    fn num_dimensions(&self) -> usize {
        (**self).num_dimensions()
    }

    fn position_dim(&self, dim: usize) -> Coordinate {
        (**self).position_dim(dim)
    }

    fn localize(&self, position: &mut [Coordinate]) {
        (**self).localize(position)
    }

    fn position(&self) -> Position {
        (**self).position()
    }
}

impl<R: RandomlyPositionable + ?Sized> RandomlyPositionable for &mut R {
    fn set_position(&mut self, position: &[Coordinate]) {
        (**self).set_position(position)
    }

    fn set_position_dim(&mut self, value: Coordinate, dim: usize) {
        (**self).set_position_dim(value, dim)
    }

    fn move_dim(&mut self, delta: Coordinate, dim: usize) {
        (**self).move_dim(delta, dim)
    }

    fn fwd_dim(&mut self, dim: usize) {
        (**self).fwd_dim(dim)
    }

    fn bck_dim(&mut self, dim: usize) {
        (**self).bck_dim(dim)
    }

    fn move_by(&mut self, delta: &[Coordinate]) {
        (**self).move_by(delta)
    }

    fn move_to(&mut self, position: &[Coordinate]) {
        (**self).move_to(position)
    }
}

impl<S: SequentialIterable + ?Sized> SequentialIterable for &mut S {
    fn fwd(&mut self) {
        (**self).fwd()
    }

    fn has_next(&self) -> bool {
        (**self).has_next()
    }

    fn reset(&mut self) {
        (**self).reset()
    }

    fn jump_fwd(&mut self, steps: usize) {
        (**self).jump_fwd(steps)
    }
}
