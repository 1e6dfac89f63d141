//! Storage containers
//!
//! An image maps positions of its box to storage locators. [`ArrayImg`] keeps
//! all elements in one buffer addressed by the dot product of position and
//! strides; [`CellImg`] tiles the box with independently allocated [`Cell`]s and
//! addresses an element by cell index plus a cell-local linear index.
//!
//! Images do not interpret their elements. Values are read and written
//! through the [`GetElement`] and [`SetElement`] contract, given a locator
//! previously produced by the image or one of its cursors.

use std::fmt::Debug;

use anyhow::{anyhow, Result};
use thiserror::Error;

use crate::structure::{Coordinate, Dimensions, Position, StructureError};

pub mod array;
pub mod cell;

pub use array::ArrayImg;
pub use cell::{Cell, CellImg, CellLocator};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImgError {
    #[error("StructureError: {0}")]
    Structure(#[from] StructureError),
    #[error("data of length {0} does not fill a box of size {1}")]
    DataLength(usize, usize),
    #[error("expected {1} cells, found {0}")]
    CellCount(usize, usize),
    #[error("expected a grid of {expected} cells, found {found}")]
    CellGrid {
        expected: Dimensions,
        found: Dimensions,
    },
    #[error("cell {cell} has index {found}")]
    CellIndex { cell: usize, found: usize },
    #[error("cell {cell} should start at {expected}, found {found}")]
    CellOffset {
        cell: usize,
        expected: Position,
        found: Position,
    },
    #[error("cell {cell} should have dimensions {expected}, found {found}")]
    CellDimensions {
        cell: usize,
        expected: Dimensions,
        found: Dimensions,
    },
}

/// A box of elements addressable by position.
pub trait Img {
    /// Where an element lives in storage.
    type Locator: Copy + Debug + PartialEq;

    fn dimensions(&self) -> &Dimensions;

    fn num_dimensions(&self) -> usize {
        self.dimensions().num_dimensions()
    }

    /// Number of elements
    fn size(&self) -> usize {
        self.dimensions().size()
    }

    /// Resolves a position to its storage locator without bounds checks.
    ///
    /// # Panics
    ///
    /// On a dimensionality mismatch.
    fn locate(&self, position: &[Coordinate]) -> Self::Locator;
}

/// Read access to the elements of an image
pub trait GetElement: Img {
    type Element;

    /// `None` if the locator does not point into the storage.
    fn get_at(&self, locator: Self::Locator) -> Option<&Self::Element>;

    /// Checked read by position
    ///
    /// # Errors
    ///
    /// Forwards the error from [`Dimensions::verify_position`]
    fn get_ref(&self, position: &[Coordinate]) -> Result<&Self::Element> {
        self.dimensions().verify_position(position)?;
        self.get_at(self.locate(position))
            .ok_or_else(|| anyhow!("no element stored at {:?}", position))
    }
}

/// Write access to the elements of an image
pub trait SetElement: GetElement {
    fn get_mut_at(&mut self, locator: Self::Locator) -> Option<&mut Self::Element>;

    /// Set the element behind the locator, returns an error if it points outside the storage
    fn set_at(&mut self, locator: Self::Locator, value: Self::Element) -> Result<()> {
        let slot = self
            .get_mut_at(locator)
            .ok_or_else(|| anyhow!("locator {:?} out of bounds", locator))?;
        *slot = value;
        Ok(())
    }

    /// Checked write by position
    ///
    /// # Errors
    ///
    /// Forwards the error from [`Dimensions::verify_position`]
    fn set(&mut self, position: &[Coordinate], value: Self::Element) -> Result<()> {
        self.dimensions().verify_position(position)?;
        let locator = self.locate(position);
        self.set_at(locator, value)
    }
}
