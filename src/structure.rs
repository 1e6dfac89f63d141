//! Coordinate model
//!
//! Dimension vectors, positions, strides ("allocation steps") and the
//! conversion between a position and its linear index. Dimension 0 varies
//! fastest, so `index(p) = Σ p[d] * stride[d]` with `stride[0] = 1` and
//! `stride[d] = stride[d-1] * size[d-1]`.
//!
//! The unchecked conversions are on the hot path of every cursor and do not
//! look at bounds. Out-of-range input gives a meaningless (but memory safe)
//! result. Use [`Dimensions::checked_index`] when the input is not trusted.

use std::ops::Deref;

use anyhow::{anyhow, Result};
use bincode::Encode;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod flat_index;
pub mod position;

pub use flat_index::FlatIndex;
pub use position::{Coordinate, Position};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("dimension {0} has size zero")]
    ZeroSized(usize),
    #[error("mismatched order: {0} components, expected {1}")]
    MismatchedOrder(usize, usize),
}

/// The extent of an image (or a cell) along every dimension.
///
/// All sizes are strictly positive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize, Encode)]
#[display(fmt = "{:?}", sizes)]
#[serde(into = "Vec<usize>", try_from = "Vec<usize>")]
pub struct Dimensions {
    sizes: Vec<usize>,
}

impl Dimensions {
    /// # Errors
    ///
    /// `ZeroSized` if any of the sizes is zero.
    pub fn new(sizes: impl Into<Vec<usize>>) -> Result<Self, StructureError> {
        let sizes = sizes.into();
        if let Some(d) = sizes.iter().position(|&s| s == 0) {
            return Err(StructureError::ZeroSized(d));
        }
        Ok(Dimensions { sizes })
    }

    /// `size` repeated along `num_dimensions` axes, e.g. the `3x3x..x3` box of a neighborhood.
    ///
    /// # Panics
    ///
    /// If `size` is zero.
    pub fn uniform(num_dimensions: usize, size: usize) -> Self {
        assert!(size > 0, "uniform dimensions need a positive size");
        Dimensions {
            sizes: vec![size; num_dimensions],
        }
    }

    pub(crate) fn from_positive(sizes: Vec<usize>) -> Self {
        debug_assert!(sizes.iter().all(|&s| s > 0));
        Dimensions { sizes }
    }

    pub fn num_dimensions(&self) -> usize {
        self.sizes.len()
    }

    /// Number of elements in the box, 1 for the zero dimensional box.
    pub fn size(&self) -> usize {
        self.sizes.iter().product()
    }

    /// yields the allocation steps, dimension 0 first
    pub fn strides(&self) -> Vec<usize> {
        strides(&self.sizes)
    }

    pub fn dim(&self, d: usize) -> usize {
        self.sizes[d]
    }

    /// Whether `position` lies in `[0, size)` along every dimension.
    ///
    /// # Panics
    ///
    /// On a dimensionality mismatch.
    pub fn contains(&self, position: &[Coordinate]) -> bool {
        self.assert_order(position.len());
        position
            .iter()
            .zip(&self.sizes)
            .all(|(&p, &s)| p >= 0 && (p as u64) < s as u64)
    }

    /// Unchecked position to linear index.
    ///
    /// # Panics
    ///
    /// On a dimensionality mismatch.
    pub fn position_to_index(&self, position: &[Coordinate]) -> FlatIndex {
        self.assert_order(position.len());
        position_to_index(position, &self.sizes)
    }

    /// Unchecked linear index to position, written into `position`.
    ///
    /// # Panics
    ///
    /// On a dimensionality mismatch.
    pub fn index_to_position(&self, index: FlatIndex, position: &mut [Coordinate]) {
        self.assert_order(position.len());
        index_to_position(index, &self.sizes, position);
    }

    /// Allocating version of [`Self::index_to_position`].
    pub fn expanded_position(&self, index: FlatIndex) -> Position {
        let mut position = Position::origin(self.num_dimensions());
        index_to_position(index, &self.sizes, &mut position);
        position
    }

    /// Verifies that the position is a valid position for this box
    ///
    /// # Errors
    ///
    /// `Mismatched order` = if the number of components is different from the number of dimensions,
    ///
    /// `Position out of bounds` = if a component is out of bounds for the size of that dimension
    pub fn verify_position(&self, position: &[Coordinate]) -> Result<()> {
        if position.len() != self.num_dimensions() {
            return Err(anyhow!(StructureError::MismatchedOrder(
                position.len(),
                self.num_dimensions()
            )));
        }

        for (d, (&p, &s)) in position.iter().zip(&self.sizes).enumerate() {
            if p < 0 || p as u64 >= s as u64 {
                return Err(anyhow!(
                    "Position component {} out of bounds for dimension {} of size {}",
                    p,
                    d,
                    s
                ));
            }
        }
        Ok(())
    }

    /// yields the linear index of a position
    ///
    /// # Errors
    ///
    /// Same as [`Self::verify_position`]
    pub fn checked_index(&self, position: &[Coordinate]) -> Result<FlatIndex> {
        self.verify_position(position)?;
        Ok(position_to_index(position, &self.sizes))
    }

    fn assert_order(&self, len: usize) {
        assert_eq!(
            len,
            self.num_dimensions(),
            "dimensionality mismatch: {} components for {} dimensions",
            len,
            self.num_dimensions()
        );
    }
}

impl Deref for Dimensions {
    type Target = [usize];

    fn deref(&self) -> &Self::Target {
        &self.sizes
    }
}

impl TryFrom<Vec<usize>> for Dimensions {
    type Error = StructureError;

    fn try_from(value: Vec<usize>) -> Result<Self, Self::Error> {
        Dimensions::new(value)
    }
}

decode_via_try_from!(Dimensions, Vec<usize>);

impl From<Dimensions> for Vec<usize> {
    fn from(value: Dimensions) -> Self {
        value.sizes
    }
}

impl<const N: usize> TryFrom<[usize; N]> for Dimensions {
    type Error = StructureError;

    fn try_from(value: [usize; N]) -> Result<Self, Self::Error> {
        Dimensions::new(value.to_vec())
    }
}

/// Allocation steps of a box, `stride[0] = 1`.
pub fn strides(sizes: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; sizes.len()];
    for d in 1..sizes.len() {
        strides[d] = strides[d - 1] * sizes[d - 1];
    }
    strides
}

/// Linear index of `position` in a zero-min box of the given sizes.
///
/// Does not allocate and does not check bounds or lengths.
pub fn position_to_index(position: &[Coordinate], sizes: &[usize]) -> FlatIndex {
    let mut index: i64 = 0;
    for (&p, &s) in position.iter().zip(sizes).rev() {
        index = index.wrapping_mul(s as i64).wrapping_add(p);
    }
    FlatIndex::from(index as usize)
}

/// Inverse of [`position_to_index`]. The last dimension receives whatever is
/// left of the index, so an index past the end lands past the end of the last
/// dimension.
pub fn index_to_position(index: FlatIndex, sizes: &[usize], position: &mut [Coordinate]) {
    let Some(last) = sizes.len().checked_sub(1) else {
        return;
    };
    let mut index = usize::from(index);
    for d in 0..last {
        position[d] = (index % sizes[d]) as Coordinate;
        index /= sizes[d];
    }
    position[last] = index as Coordinate;
}

/// Signed linear offset of a position given its strides, may be negative or
/// past the end for positions outside the box.
pub fn linear_offset(position: &[Coordinate], strides: &[i64]) -> i64 {
    position
        .iter()
        .zip(strides)
        .map(|(&p, &s)| p.wrapping_mul(s))
        .fold(0, i64::wrapping_add)
}
