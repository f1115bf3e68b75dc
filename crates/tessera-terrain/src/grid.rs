//! Row-major 2D grids indexed by [`TileCoord`].

use crate::coord::TileCoord;
use crate::field::FieldError;

/// A dense, row-major 2D array.
///
/// Cell `(x, y)` lives at index `y * width + x`. Lookups with negative or
/// out-of-range coordinates return `None` instead of panicking.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Builds a grid by evaluating `f` at every coordinate.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(TileCoord) -> T) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(TileCoord::new(x as i32, y as i32)));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Wraps an existing row-major buffer.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::LengthMismatch`] if `cells.len() != width * height`.
    pub fn from_vec(width: usize, height: usize, cells: Vec<T>) -> Result<Self, FieldError> {
        if cells.len() != width * height {
            return Err(FieldError::LengthMismatch {
                expected: width * height,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Grid width (number of columns).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height (number of rows).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns `true` if `coord` addresses a cell of this grid.
    pub fn contains(&self, coord: TileCoord) -> bool {
        self.index_of(coord).is_some()
    }

    /// Returns the cell at `coord`, or `None` if out of bounds.
    pub fn get(&self, coord: TileCoord) -> Option<&T> {
        self.index_of(coord).map(|i| &self.cells[i])
    }

    /// Mutable access to the cell at `coord`.
    pub fn get_mut(&mut self, coord: TileCoord) -> Option<&mut T> {
        self.index_of(coord).map(|i| &mut self.cells[i])
    }

    /// Row-major view of all cells.
    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    /// Iterates `(coord, cell)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, &T)> {
        let width = self.width.max(1);
        self.cells.iter().enumerate().map(move |(i, cell)| {
            (
                TileCoord::new((i % width) as i32, (i / width) as i32),
                cell,
            )
        })
    }

    /// Applies `f` to every cell, producing a grid of the same shape.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    fn index_of(&self, coord: TileCoord) -> Option<usize> {
        let x = usize::try_from(coord.x).ok()?;
        let y = usize::try_from(coord.y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}

impl<T: Clone> Grid<T> {
    /// Creates a grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }
}
