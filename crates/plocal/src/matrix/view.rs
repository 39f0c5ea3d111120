use std::borrow::Cow;

use num_rational::BigRational;
use num_traits::{One, Zero};

use super::Matrix;
use crate::MatrixError;

/// Anything that can be read as a matrix of rationals: a dense [`Matrix`], the [`Identity`], or a
/// rectangular slice of a dense matrix.
pub trait MatrixView {
    fn rows(&self) -> usize;
    fn columns(&self) -> usize;
    fn entry(&self, i: usize, j: usize) -> Cow<'_, BigRational>;

    fn shape(&self) -> (usize, usize) {
        (self.rows(), self.columns())
    }

    fn to_matrix(&self) -> Matrix {
        Matrix::from_view(self)
    }

    /// Equality of dimensions and entries, regardless of how either side is represented.
    fn view_eq<V: MatrixView + ?Sized>(&self, other: &V) -> bool {
        self.shape() == other.shape()
            && (0..self.rows())
                .all(|i| (0..self.columns()).all(|j| self.entry(i, j) == other.entry(i, j)))
    }
}

/// The `n x n` identity, without allocating any entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    n: usize,
}

impl Identity {
    pub const fn new(n: usize) -> Self {
        Self { n }
    }
}

impl MatrixView for Identity {
    fn rows(&self) -> usize {
        self.n
    }

    fn columns(&self) -> usize {
        self.n
    }

    fn entry(&self, i: usize, j: usize) -> Cow<'_, BigRational> {
        assert!(i < self.n && j < self.n);
        if i == j {
            Cow::Owned(BigRational::one())
        } else {
            Cow::Owned(BigRational::zero())
        }
    }
}

/// A rectangular region of a matrix: `rows x columns` entries starting at `(row, column)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub row: usize,
    pub column: usize,
    pub rows: usize,
    pub columns: usize,
}

impl Block {
    pub const fn new(row: usize, column: usize, rows: usize, columns: usize) -> Self {
        Self {
            row,
            column,
            rows,
            columns,
        }
    }

    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    pub const fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns == 0
    }

    pub const fn overlaps(&self, other: &Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.row < other.row + other.rows
            && self.row + self.rows > other.row
            && self.column < other.column + other.columns
            && self.column + self.columns > other.column
    }

    pub(super) fn assert_within(&self, rows: usize, columns: usize) {
        assert!(
            self.row + self.rows <= rows && self.column + self.columns <= columns,
            "block {self:?} does not fit in a {rows}x{columns} matrix"
        );
    }
}

/// A read-only view of a block of a matrix.
#[derive(Debug, Clone, Copy)]
pub struct MatrixSlice<'a> {
    matrix: &'a Matrix,
    block: Block,
}

impl<'a> MatrixSlice<'a> {
    pub(super) fn new(matrix: &'a Matrix, block: Block) -> Self {
        block.assert_within(matrix.rows(), matrix.columns());
        Self { matrix, block }
    }

    pub fn into_owned(self) -> Matrix {
        Matrix::from_view(&self)
    }
}

impl MatrixView for MatrixSlice<'_> {
    fn rows(&self) -> usize {
        self.block.rows
    }

    fn columns(&self) -> usize {
        self.block.columns
    }

    fn entry(&self, i: usize, j: usize) -> Cow<'_, BigRational> {
        assert!(i < self.block.rows && j < self.block.columns);
        Cow::Borrowed(self.matrix.entry(self.block.row + i, self.block.column + j))
    }
}

/// A mutable view of a block of a matrix. Writing through it writes into the owning matrix.
#[derive(Debug)]
pub struct MatrixSliceMut<'a> {
    matrix: &'a mut Matrix,
    block: Block,
}

impl<'a> MatrixSliceMut<'a> {
    pub(super) fn new(matrix: &'a mut Matrix, block: Block) -> Self {
        block.assert_within(matrix.rows(), matrix.columns());
        Self { matrix, block }
    }

    pub fn set_entry(&mut self, i: usize, j: usize, value: BigRational) {
        assert!(i < self.block.rows && j < self.block.columns);
        self.matrix
            .set_entry(self.block.row + i, self.block.column + j, value);
    }

    /// Overwrite the block with the entries of `source`, which must have the same shape.
    ///
    /// The borrow checker already rules out `source` being another view of the matrix this slice
    /// writes into. Copies between two blocks of one matrix go through [`Matrix::copy_block`].
    pub fn assign<V: MatrixView + ?Sized>(&mut self, source: &V) -> Result<(), MatrixError> {
        MatrixError::check_shape(self.block.shape(), source.shape())?;
        for i in 0..self.block.rows {
            for j in 0..self.block.columns {
                self.set_entry(i, j, source.entry(i, j).into_owned());
            }
        }
        Ok(())
    }
}

impl MatrixView for MatrixSliceMut<'_> {
    fn rows(&self) -> usize {
        self.block.rows
    }

    fn columns(&self) -> usize {
        self.block.columns
    }

    fn entry(&self, i: usize, j: usize) -> Cow<'_, BigRational> {
        assert!(i < self.block.rows && j < self.block.columns);
        Cow::Borrowed(self.matrix.entry(self.block.row + i, self.block.column + j))
    }
}
