// Generic fixed-size 2-D container
// Row-major storage with row/column addressing, bounds checks and 8-neighbour lookup

use std::ops::{Index, IndexMut};

use crate::gsw_error::Error;

/// A (row, column) position on a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Pos { row, col }
    }
}

impl From<(usize, usize)> for Pos {
    fn from((row, col): (usize, usize)) -> Self {
        Pos { row, col }
    }
}

// (row, col) offsets of the eight surrounding cells
const NEIGHBOUR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Fixed-size grid of `T`, never resized after construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    elems: Vec<T>,
    rows: usize,
    cols: usize,
}

impl<T: Default + Clone> Grid<T> {
    /// Create a grid filled with `T::default()`
    /// Callers bound `rows` and `cols` first; the board does so in its constructors
    pub fn new(rows: usize, cols: usize) -> Self {
        Grid {
            elems: vec![T::default(); rows * cols],
            rows,
            cols,
        }
    }
}

impl<T> Grid<T> {
    /// Adopt existing row-major storage
    pub fn from_vec(elems: Vec<T>, rows: usize, cols: usize) -> Result<Self, Error> {
        let expected = rows.checked_mul(cols).unwrap_or(usize::MAX);
        if elems.len() != expected {
            return Err(Error::DimensionMismatch {
                expected,
                actual: elems.len(),
            });
        }
        Ok(Grid { elems, rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    /// Flat storage index of `pos`; only meaningful for valid positions
    pub fn index(&self, pos: Pos) -> usize {
        pos.row * self.cols + pos.col
    }

    /// Position of flat storage index `i`
    pub fn position(&self, i: usize) -> Pos {
        Pos {
            row: i / self.cols,
            col: i % self.cols,
        }
    }

    pub fn is_valid(&self, pos: Pos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    fn check(&self, pos: Pos) -> Result<usize, Error> {
        if self.is_valid(pos) {
            Ok(self.index(pos))
        } else {
            Err(Error::OutOfBounds {
                pos,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    pub fn get(&self, pos: Pos) -> Result<&T, Error> {
        let i = self.check(pos)?;
        Ok(&self.elems[i])
    }

    pub fn get_mut(&mut self, pos: Pos) -> Result<&mut T, Error> {
        let i = self.check(pos)?;
        Ok(&mut self.elems[i])
    }

    /// The up-to-eight valid positions surrounding `pos`, excluding `pos` itself
    ///
    /// Offsets are applied with checked arithmetic, so row 0 and column 0
    /// never wrap around into a valid position.
    pub fn neighbours(&self, pos: Pos) -> Vec<Pos> {
        NEIGHBOUR_OFFSETS
            .iter()
            .filter_map(|&(dr, dc)| {
                let row = pos.row.checked_add_signed(dr)?;
                let col = pos.col.checked_add_signed(dc)?;
                Some(Pos { row, col })
            })
            .filter(|&p| self.is_valid(p))
            .collect()
    }

    /// Every position in row-major order
    pub fn all_positions(&self) -> Vec<Pos> {
        (0..self.elems.len()).map(|i| self.position(i)).collect()
    }

    /// Run `f` on every element in storage order
    pub fn apply<F>(&mut self, f: F) -> &mut Self
    where
        F: FnMut(&mut T),
    {
        self.iter_mut().for_each(f);
        self
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.elems.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.elems.iter_mut()
    }
}

impl<T> Index<Pos> for Grid<T> {
    type Output = T;

    fn index(&self, pos: Pos) -> &T {
        assert!(self.is_valid(pos), "grid position out of bounds: {:?}", pos);
        &self.elems[Grid::index(self, pos)]
    }
}

impl<T> IndexMut<Pos> for Grid<T> {
    fn index_mut(&mut self, pos: Pos) -> &mut T {
        assert!(self.is_valid(pos), "grid position out of bounds: {:?}", pos);
        let i = Grid::index(self, pos);
        &mut self.elems[i]
    }
}
