use bincode::{Decode, Encode};
use log::debug;
use num::Zero;
use serde::{Deserialize, Serialize};

use super::{array::signed_strides, GetElement, Img, ImgError, SetElement};
use crate::cursor::{CellCursor, CellRandomAccess};
use crate::structure::{
    linear_offset, Coordinate, Dimensions, FlatIndex, Position, StructureError,
};

/// Storage locator of a [`CellImg`]: which cell, and where inside its buffer.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode,
)]
pub struct CellLocator {
    pub cell: usize,
    pub local: FlatIndex,
}

/// One independently allocated box of a [`CellImg`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Encode)]
#[serde(try_from = "RawCell<T>")]
pub struct Cell<T> {
    index: usize,
    offset: Position,
    dimensions: Dimensions,
    data: Vec<T>,
}

#[derive(Deserialize, Decode)]
struct RawCell<T> {
    index: usize,
    offset: Position,
    dimensions: Dimensions,
    data: Vec<T>,
}

impl<T> TryFrom<RawCell<T>> for Cell<T> {
    type Error = ImgError;

    fn try_from(raw: RawCell<T>) -> Result<Self, ImgError> {
        Cell::new(raw.index, raw.offset, raw.dimensions, raw.data)
    }
}

decode_via_try_from!(Cell<T>, RawCell<T>, T);

impl<T> Cell<T> {
    /// # Errors
    ///
    /// `DataLength` if `data` does not fill `dimensions`.
    pub fn new(
        index: usize,
        offset: Position,
        dimensions: Dimensions,
        data: Vec<T>,
    ) -> Result<Self, ImgError> {
        if data.len() != dimensions.size() {
            return Err(ImgError::DataLength(data.len(), dimensions.size()));
        }
        if offset.num_dimensions() != dimensions.num_dimensions() {
            return Err(StructureError::MismatchedOrder(
                offset.num_dimensions(),
                dimensions.num_dimensions(),
            )
            .into());
        }
        Ok(Cell {
            index,
            offset,
            dimensions,
            data,
        })
    }

    /// Raster index of the cell among all cells of its image
    pub fn index(&self) -> usize {
        self.index
    }

    /// Origin of the cell in the image
    pub fn offset(&self) -> &Position {
        &self.offset
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    pub fn num_pixels(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Whether the global position lies inside this cell.
    pub fn contains(&self, position: &[Coordinate]) -> bool {
        position
            .iter()
            .zip(self.offset.iter())
            .zip(self.dimensions.iter())
            .all(|((&p, &o), &s)| p >= o && p < o + s as Coordinate)
    }

    /// Cell-local linear index of a global position, unchecked.
    pub fn local_index(&self, position: &[Coordinate]) -> FlatIndex {
        let local: Position = position
            .iter()
            .zip(self.offset.iter())
            .map(|(p, o)| p - o)
            .collect();
        self.dimensions.position_to_index(&local)
    }

    /// Cell-local strides, signed for relative moves.
    pub(crate) fn signed_strides(&self) -> Vec<i64> {
        signed_strides(&self.dimensions)
    }
}

/// An image tiled by a regular lattice of cells.
///
/// All cells have the nominal cell dimensions except the last cell along each
/// axis, which is truncated to the image extent. Cells are stored in raster
/// order of the cell grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Encode)]
#[serde(try_from = "RawCellImg<T>")]
pub struct CellImg<T> {
    dimensions: Dimensions,
    cell_dimensions: Dimensions,
    grid: Dimensions,
    cells: Vec<Cell<T>>,
}

/// Wire form of a [`CellImg`], checked by [`CellImg::from_cells`] on the way in.
#[derive(Deserialize, Decode)]
struct RawCellImg<T> {
    dimensions: Dimensions,
    cell_dimensions: Dimensions,
    grid: Dimensions,
    cells: Vec<Cell<T>>,
}

impl<T> TryFrom<RawCellImg<T>> for CellImg<T> {
    type Error = ImgError;

    fn try_from(raw: RawCellImg<T>) -> Result<Self, ImgError> {
        let img = CellImg::from_cells(raw.dimensions, raw.cell_dimensions, raw.cells)?;
        if img.grid != raw.grid {
            return Err(ImgError::CellGrid {
                expected: img.grid,
                found: raw.grid,
            });
        }
        Ok(img)
    }
}

decode_via_try_from!(CellImg<T>, RawCellImg<T>, T);

impl<T> CellImg<T> {
    /// Fills the image by calling `f` with every position, cell by cell.
    ///
    /// # Errors
    ///
    /// `MismatchedOrder` if the cell dimensions do not have the dimensionality of the image.
    pub fn from_fn(
        dimensions: Dimensions,
        cell_dimensions: Dimensions,
        mut f: impl FnMut(&Position) -> T,
    ) -> Result<Self, ImgError> {
        let grid = cell_grid(&dimensions, &cell_dimensions)?;
        let mut cells = Vec::with_capacity(grid.size());
        let mut grid_position = Position::origin(grid.num_dimensions());
        let mut local = Position::origin(grid.num_dimensions());

        for index in 0..grid.size() {
            grid.index_to_position(index.into(), &mut grid_position);
            let (offset, cell_dims) = expected_cell(&dimensions, &cell_dimensions, &grid_position);

            let mut data = Vec::with_capacity(cell_dims.size());
            for i in 0..cell_dims.size() {
                cell_dims.index_to_position(i.into(), &mut local);
                let global: Position = local.iter().zip(offset.iter()).map(|(l, o)| l + o).collect();
                data.push(f(&global));
            }
            cells.push(Cell {
                index,
                offset,
                dimensions: cell_dims,
                data,
            });
        }

        debug!(
            "cell image {} with {} cells of {}",
            dimensions,
            cells.len(),
            cell_dimensions
        );

        Ok(CellImg {
            dimensions,
            cell_dimensions,
            grid,
            cells,
        })
    }

    pub fn filled(
        dimensions: Dimensions,
        cell_dimensions: Dimensions,
        value: T,
    ) -> Result<Self, ImgError>
    where
        T: Clone,
    {
        Self::from_fn(dimensions, cell_dimensions, |_| value.clone())
    }

    pub fn zeros(dimensions: Dimensions, cell_dimensions: Dimensions) -> Result<Self, ImgError>
    where
        T: Zero + Clone,
    {
        Self::filled(dimensions, cell_dimensions, T::zero())
    }

    /// Assembles an image from cells allocated elsewhere.
    ///
    /// The cells must be given in raster order of the cell grid and must have
    /// exactly the offsets and dimensions of the regular tiling, which
    /// guarantees they cover the box without gaps or overlaps.
    pub fn from_cells(
        dimensions: Dimensions,
        cell_dimensions: Dimensions,
        cells: Vec<Cell<T>>,
    ) -> Result<Self, ImgError> {
        let grid = cell_grid(&dimensions, &cell_dimensions)?;
        if cells.len() != grid.size() {
            return Err(ImgError::CellCount(cells.len(), grid.size()));
        }

        for (i, cell) in cells.iter().enumerate() {
            if cell.index != i {
                return Err(ImgError::CellIndex {
                    cell: i,
                    found: cell.index,
                });
            }
            let (offset, cell_dims) = expected_cell(
                &dimensions,
                &cell_dimensions,
                &grid.expanded_position(i.into()),
            );
            if cell.offset != offset {
                return Err(ImgError::CellOffset {
                    cell: i,
                    expected: offset,
                    found: cell.offset.clone(),
                });
            }
            if cell.dimensions != cell_dims {
                return Err(ImgError::CellDimensions {
                    cell: i,
                    expected: cell_dims,
                    found: cell.dimensions.clone(),
                });
            }
        }

        debug!("cell image {} from {} cells", dimensions, cells.len());

        Ok(CellImg {
            dimensions,
            cell_dimensions,
            grid,
            cells,
        })
    }

    /// Nominal dimensions of a cell
    pub fn cell_dimensions(&self) -> &Dimensions {
        &self.cell_dimensions
    }

    /// Number of cells along every dimension
    pub fn grid(&self) -> &Dimensions {
        &self.grid
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Resolves a cell by its raster index.
    ///
    /// # Panics
    ///
    /// If `index` is not smaller than [`Self::num_cells`].
    pub fn cell(&self, index: usize) -> &Cell<T> {
        assert!(
            index < self.cells.len(),
            "cell index {} out of range for {} cells",
            index,
            self.cells.len()
        );
        &self.cells[index]
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell<T>> {
        self.cells.iter()
    }

    /// Raster index of the cell that would contain the position, unchecked.
    pub fn cell_index(&self, position: &[Coordinate]) -> usize {
        let grid_position: Position = position
            .iter()
            .zip(self.cell_dimensions.iter())
            .map(|(&p, &s)| p.div_euclid(s as Coordinate))
            .collect();
        self.grid.position_to_index(&grid_position).into()
    }

    pub fn cursor(&self) -> CellCursor<&Self> {
        CellCursor::new(self)
    }

    pub fn cursor_mut(&mut self) -> CellCursor<&mut Self> {
        CellCursor::new(self)
    }

    /// Chunk aware localizable-by-dim cursor, placed at the origin
    pub fn random_access(&self) -> CellRandomAccess<&Self> {
        CellRandomAccess::new(self)
    }

    pub fn random_access_mut(&mut self) -> CellRandomAccess<&mut Self> {
        CellRandomAccess::new(self)
    }
}

impl<T> Img for CellImg<T> {
    type Locator = CellLocator;

    fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    fn locate(&self, position: &[Coordinate]) -> CellLocator {
        assert_eq!(
            position.len(),
            self.dimensions.num_dimensions(),
            "dimensionality mismatch"
        );
        let cell = self.cell_index(position);
        let local = match self.cells.get(cell) {
            Some(c) => c.local_index(position),
            None => {
                let strides = signed_strides(&self.cell_dimensions);
                let local: Position = position
                    .iter()
                    .zip(self.cell_dimensions.iter())
                    .map(|(&p, &s)| p.rem_euclid(s as Coordinate))
                    .collect();
                FlatIndex::from(linear_offset(&local, &strides) as usize)
            }
        };
        CellLocator { cell, local }
    }
}

impl<T> GetElement for CellImg<T> {
    type Element = T;

    fn get_at(&self, locator: CellLocator) -> Option<&T> {
        self.cells
            .get(locator.cell)?
            .data
            .get(usize::from(locator.local))
    }
}

impl<T> SetElement for CellImg<T> {
    fn get_mut_at(&mut self, locator: CellLocator) -> Option<&mut T> {
        self.cells
            .get_mut(locator.cell)?
            .data
            .get_mut(usize::from(locator.local))
    }
}

/// Number of cells along every axis, rounding up.
fn cell_grid(dimensions: &Dimensions, cell_dimensions: &Dimensions) -> Result<Dimensions, ImgError> {
    if dimensions.num_dimensions() != cell_dimensions.num_dimensions() {
        return Err(StructureError::MismatchedOrder(
            cell_dimensions.num_dimensions(),
            dimensions.num_dimensions(),
        )
        .into());
    }
    Ok(Dimensions::new(
        dimensions
            .iter()
            .zip(cell_dimensions.iter())
            .map(|(&s, &c)| s.div_ceil(c))
            .collect::<Vec<_>>(),
    )?)
}

/// Offset and (possibly truncated) dimensions of the cell at a grid position.
fn expected_cell(
    dimensions: &Dimensions,
    cell_dimensions: &Dimensions,
    grid_position: &[Coordinate],
) -> (Position, Dimensions) {
    let offset: Position = grid_position
        .iter()
        .zip(cell_dimensions.iter())
        .map(|(&g, &c)| g * c as Coordinate)
        .collect();
    let sizes: Vec<usize> = offset
        .iter()
        .zip(dimensions.iter().zip(cell_dimensions.iter()))
        .map(|(&o, (&s, &c))| c.min(s - o as usize))
        .collect();
    // offsets lie inside the image, so truncated sizes stay positive
    let cell_dims = Dimensions::from_positive(sizes);
    (offset, cell_dims)
}
