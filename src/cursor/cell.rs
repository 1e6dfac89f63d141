//! Cursors over a chunked [`CellImg`]
//!
//! Both cursors cache the metadata of the cell they are in (offset, extent,
//! number of pixels) and only go back to the image when the cell index
//! changes.

use std::ops::{Deref, DerefMut};

use log::trace;

use super::interval::raster_step;
use super::traits::{Localizable, RandomlyPositionable, Sampler, SamplerMut, SequentialIterable};
use crate::img::{CellImg, CellLocator, GetElement, Img, SetElement};
use crate::structure::{Coordinate, FlatIndex, Position};

/// Raster cursor that walks a cell image cell by cell.
///
/// Inside a cell the position advances with the odometer step over the cell
/// box; at the end of a cell it jumps to the offset of the next one. The
/// visiting order is therefore not the global raster order, but every
/// position of the image is visited exactly once.
#[derive(Debug, Clone)]
pub struct CellCursor<I> {
    img: I,
    num_cells: usize,
    cell: usize,
    last_cell: Option<usize>,
    cell_max_i: i64,
    cell_extent: Vec<usize>,
    cell_offset: Position,
    position: Position,
    index: i64,
}

impl<T, I: Deref<Target = CellImg<T>>> CellCursor<I> {
    pub fn new(img: I) -> Self {
        let n = img.num_dimensions();
        let num_cells = img.num_cells();
        let mut cursor = CellCursor {
            img,
            num_cells,
            cell: 0,
            last_cell: None,
            cell_max_i: 0,
            cell_extent: vec![0; n],
            cell_offset: Position::origin(n),
            position: Position::origin(n),
            index: -1,
        };
        cursor.reset();
        cursor
    }

    pub fn img(&self) -> &CellImg<T> {
        &self.img
    }

    /// Raster index of the current cell, equal to the number of cells once
    /// the cursor is exhausted.
    pub fn cell_index(&self) -> usize {
        self.cell
    }

    /// Storage locator of the current element
    pub fn locator(&self) -> Option<CellLocator> {
        if self.cell >= self.num_cells || self.index >= self.cell_max_i {
            return None;
        }
        Some(CellLocator {
            cell: self.cell,
            local: FlatIndex::from_signed(self.index)?,
        })
    }

    fn refresh_cell(&mut self) {
        if self.last_cell == Some(self.cell) {
            return;
        }
        let cell = self.img.cell(self.cell);
        self.cell_max_i = cell.num_pixels() as i64;
        self.cell_extent.copy_from_slice(cell.dimensions());
        self.cell_offset.copy_from(cell.offset());
        self.last_cell = Some(self.cell);
        trace!(
            "cursor entered cell {} at {} with {} pixels",
            self.cell,
            self.cell_offset,
            self.cell_max_i
        );
    }
}

impl<T, I: Deref<Target = CellImg<T>>> SequentialIterable for CellCursor<I> {
    fn fwd(&mut self) {
        if self.index < self.cell_max_i - 1 {
            self.index += 1;
            raster_step(&mut self.position, &self.cell_offset, &self.cell_extent);
        } else if self.cell + 1 < self.num_cells {
            self.cell += 1;
            self.refresh_cell();
            self.index = 0;
            self.position.copy_from(&self.cell_offset);
        } else {
            // exhausted, stays here until reset
            self.cell = self.num_cells;
            self.last_cell = None;
            self.index = self.cell_max_i;
        }
    }

    fn has_next(&self) -> bool {
        self.cell + 1 < self.num_cells || self.index < self.cell_max_i - 1
    }

    fn reset(&mut self) {
        self.cell = 0;
        self.last_cell = None;
        self.refresh_cell();
        self.index = -1;
        self.position.copy_from(&self.cell_offset);
        if let Some(first) = self.position.first_mut() {
            *first -= 1;
        }
    }
}

impl<T, I: Deref<Target = CellImg<T>>> Localizable for CellCursor<I> {
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

impl<T, I: Deref<Target = CellImg<T>>> Sampler for CellCursor<I> {
    type Element = T;

    fn get(&self) -> Option<&T> {
        self.img.get_at(self.locator()?)
    }
}

impl<T, I: DerefMut<Target = CellImg<T>>> SamplerMut for CellCursor<I> {
    fn get_mut(&mut self) -> Option<&mut T> {
        let locator = self.locator()?;
        self.img.get_mut_at(locator)
    }
}

/// Localizable-by-dim cursor over a [`CellImg`].
///
/// Moves that stay inside the current cell only touch the cell-local index.
/// Moves that leave it resolve the cell containing the new position; outside
/// the image there is no cell and [`Sampler::get`] gives `None`.
#[derive(Debug, Clone)]
pub struct CellRandomAccess<I> {
    img: I,
    position: Position,
    cell: Option<usize>,
    last_cell: Option<usize>,
    cell_offset: Position,
    cell_extent: Vec<usize>,
    cell_strides: Vec<i64>,
    index: i64,
}

impl<T, I: Deref<Target = CellImg<T>>> CellRandomAccess<I> {
    pub fn new(img: I) -> Self {
        let n = img.num_dimensions();
        let mut cursor = CellRandomAccess {
            img,
            position: Position::origin(n),
            cell: None,
            last_cell: None,
            cell_offset: Position::origin(n),
            cell_extent: vec![0; n],
            cell_strides: vec![0; n],
            index: 0,
        };
        cursor.relocate();
        cursor
    }

    pub fn img(&self) -> &CellImg<T> {
        &self.img
    }

    /// Raster index of the cell under the cursor, `None` outside the image.
    pub fn cell_index(&self) -> Option<usize> {
        self.cell
    }

    pub fn locator(&self) -> Option<CellLocator> {
        Some(CellLocator {
            cell: self.cell?,
            local: FlatIndex::from_signed(self.index)?,
        })
    }

    fn in_cell(&self, value: Coordinate, dim: usize) -> bool {
        self.cell.is_some()
            && value >= self.cell_offset[dim]
            && value < self.cell_offset[dim] + self.cell_extent[dim] as Coordinate
    }

    /// Resolves cell and local index from scratch for the current position.
    fn relocate(&mut self) {
        if !self.img.dimensions().contains(&self.position) {
            self.cell = None;
            return;
        }
        let cell = self.img.cell_index(&self.position);
        self.cell = Some(cell);
        if self.last_cell != Some(cell) {
            let c = self.img.cell(cell);
            self.cell_offset.copy_from(c.offset());
            self.cell_extent.copy_from_slice(c.dimensions());
            self.cell_strides = c.signed_strides();
            self.last_cell = Some(cell);
            trace!("random access entered cell {} at {}", cell, self.cell_offset);
        }
        self.index = self
            .position
            .iter()
            .zip(self.cell_offset.iter())
            .zip(&self.cell_strides)
            .map(|((&p, &o), &s)| (p - o) * s)
            .sum();
    }
}

impl<T, I: Deref<Target = CellImg<T>>> Localizable for CellRandomAccess<I> {
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

impl<T, I: Deref<Target = CellImg<T>>> RandomlyPositionable for CellRandomAccess<I> {
    fn set_position(&mut self, position: &[Coordinate]) {
        self.position.copy_from(position);
        self.relocate();
    }

    fn set_position_dim(&mut self, value: Coordinate, dim: usize) {
        let delta = value - self.position[dim];
        self.move_dim(delta, dim);
    }

    fn move_dim(&mut self, delta: Coordinate, dim: usize) {
        let target = self.position[dim] + delta;
        if self.in_cell(target, dim) {
            self.index += delta * self.cell_strides[dim];
            self.position[dim] = target;
        } else {
            self.position[dim] = target;
            self.relocate();
        }
    }
}

impl<T, I: Deref<Target = CellImg<T>>> Sampler for CellRandomAccess<I> {
    type Element = T;

    fn get(&self) -> Option<&T> {
        self.img.get_at(self.locator()?)
    }
}

impl<T, I: DerefMut<Target = CellImg<T>>> SamplerMut for CellRandomAccess<I> {
    fn get_mut(&mut self) -> Option<&mut T> {
        let locator = self.locator()?;
        self.img.get_mut_at(locator)
    }
}
