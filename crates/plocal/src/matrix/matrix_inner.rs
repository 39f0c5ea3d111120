use std::{
    borrow::Cow,
    fmt,
    ops::{Index, IndexMut},
};

use itertools::Itertools;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};
use serde::Serialize;

use super::{Block, MatrixSlice, MatrixSliceMut, MatrixView};
use crate::MatrixError;

/// A dense matrix of exact rationals, stored row-major.
///
/// Matrices act on column vectors. A morphism `X -> Y` is stored with one row per generator of
/// `Y` and one column per generator of `X`, so that `g ∘ f` is `g.multiply(&f)`.
///
/// The dimensions are fixed at construction. The elementary row and column operations mutate in
/// place and return `&mut Self` so that they can be chained.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Matrix {
    rows: usize,
    columns: usize,
    entries: Vec<BigRational>,
}

impl Matrix {
    /// The `rows x columns` zero matrix.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            entries: vec![BigRational::zero(); rows * columns],
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut result = Self::new(n, n);
        for i in 0..n {
            result[(i, i)] = BigRational::one();
        }
        result
    }

    /// Build a matrix from its entries in row-major order.
    pub fn from_entries(rows: usize, columns: usize, entries: Vec<BigRational>) -> Self {
        assert_eq!(entries.len(), rows * columns);
        Self {
            rows,
            columns,
            entries,
        }
    }

    /// Build a matrix from a list of rows. An empty list gives the `0 x 0` matrix.
    pub fn from_rows(rows: Vec<Vec<BigRational>>) -> Result<Self, MatrixError> {
        let columns = rows.first().map_or(0, Vec::len);
        for row in &rows {
            MatrixError::check_shape((1, columns), (1, row.len()))?;
        }
        Ok(Self {
            rows: rows.len(),
            columns,
            entries: rows.into_iter().flatten().collect(),
        })
    }

    /// Build a matrix from integer rows. This is mostly useful for writing down literals.
    ///
    /// # Panics
    /// If the rows have different lengths.
    ///
    /// # Example
    /// ```
    /// # use plocal::matrix::Matrix;
    /// let m = Matrix::from_vec(&[vec![1, 0, 1], vec![0, 1, 1]]);
    /// assert_eq!(m.rows(), 2);
    /// assert_eq!(m.columns(), 3);
    /// ```
    pub fn from_vec(input: &[Vec<i64>]) -> Self {
        let rows = input
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&x| BigRational::from_integer(BigInt::from(x)))
                    .collect()
            })
            .collect();
        Self::from_rows(rows).expect("rows of a matrix literal must have equal length")
    }

    pub fn from_view<V: MatrixView + ?Sized>(view: &V) -> Self {
        let entries = (0..view.rows())
            .cartesian_product(0..view.columns())
            .map(|(i, j)| view.entry(i, j).into_owned())
            .collect();
        Self {
            rows: view.rows(),
            columns: view.columns(),
            entries,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    fn index_of(&self, i: usize, j: usize) -> usize {
        assert!(
            i < self.rows && j < self.columns,
            "entry ({i}, {j}) out of range for a {}x{} matrix",
            self.rows,
            self.columns
        );
        i * self.columns + j
    }

    pub fn entry(&self, i: usize, j: usize) -> &BigRational {
        &self.entries[self.index_of(i, j)]
    }

    pub fn set_entry(&mut self, i: usize, j: usize, value: BigRational) {
        let idx = self.index_of(i, j);
        self.entries[idx] = value;
    }

    pub fn row(&self, i: usize) -> &[BigRational] {
        assert!(i < self.rows);
        &self.entries[i * self.columns..(i + 1) * self.columns]
    }

    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(Zero::is_zero)
    }

    pub fn transpose(&self) -> Self {
        let mut result = Self::new(self.columns, self.rows);
        for (i, j) in (0..self.rows).cartesian_product(0..self.columns) {
            result[(j, i)] = self[(i, j)].clone();
        }
        result
    }

    pub fn slice(&self, row: usize, column: usize, rows: usize, columns: usize) -> MatrixSlice<'_> {
        MatrixSlice::new(self, Block::new(row, column, rows, columns))
    }

    pub fn slice_mut(
        &mut self,
        row: usize,
        column: usize,
        rows: usize,
        columns: usize,
    ) -> MatrixSliceMut<'_> {
        MatrixSliceMut::new(self, Block::new(row, column, rows, columns))
    }

    /// Copy the block `source` of this matrix onto the block `target`.
    ///
    /// # Errors
    /// `DimensionMismatch` if the blocks have different shapes, and `AliasingViolation` if they
    /// overlap.
    pub fn copy_block(&mut self, target: Block, source: Block) -> Result<(), MatrixError> {
        MatrixError::check_shape(target.shape(), source.shape())?;
        target.assert_within(self.rows, self.columns);
        source.assert_within(self.rows, self.columns);
        if target.overlaps(&source) {
            return Err(MatrixError::AliasingViolation);
        }
        for (i, j) in (0..source.rows).cartesian_product(0..source.columns) {
            let value = self[(source.row + i, source.column + j)].clone();
            self[(target.row + i, target.column + j)] = value;
        }
        Ok(())
    }

    /// The product `self * rhs`.
    pub fn multiply<V: MatrixView + ?Sized>(&self, rhs: &V) -> Result<Self, MatrixError> {
        compose(self, rhs)
    }

    /// `self[i2] += lambda * self[i1]`
    pub fn row_add(&mut self, i1: usize, i2: usize, lambda: &BigRational) -> &mut Self {
        assert!(i1 < self.rows && i2 < self.rows);
        if lambda.is_zero() {
            return self;
        }
        for j in 0..self.columns {
            let delta = lambda * &self.entries[i1 * self.columns + j];
            self.entries[i2 * self.columns + j] += delta;
        }
        self
    }

    pub fn row_mul(&mut self, i: usize, lambda: &BigRational) -> &mut Self {
        assert!(i < self.rows);
        for entry in &mut self.entries[i * self.columns..(i + 1) * self.columns] {
            *entry = &*entry * lambda;
        }
        self
    }

    pub fn row_swap(&mut self, i1: usize, i2: usize) -> &mut Self {
        assert!(i1 < self.rows && i2 < self.rows);
        if i1 != i2 {
            for j in 0..self.columns {
                self.entries.swap(i1 * self.columns + j, i2 * self.columns + j);
            }
        }
        self
    }

    /// `column j2 += lambda * column j1`
    pub fn col_add(&mut self, j1: usize, j2: usize, lambda: &BigRational) -> &mut Self {
        assert!(j1 < self.columns && j2 < self.columns);
        if lambda.is_zero() {
            return self;
        }
        for i in 0..self.rows {
            let delta = lambda * &self.entries[i * self.columns + j1];
            self.entries[i * self.columns + j2] += delta;
        }
        self
    }

    pub fn col_mul(&mut self, j: usize, lambda: &BigRational) -> &mut Self {
        assert!(j < self.columns);
        for i in 0..self.rows {
            let entry = &mut self.entries[i * self.columns + j];
            *entry = &*entry * lambda;
        }
        self
    }

    pub fn col_swap(&mut self, j1: usize, j2: usize) -> &mut Self {
        assert!(j1 < self.columns && j2 < self.columns);
        if j1 != j2 {
            for i in 0..self.rows {
                self.entries.swap(i * self.columns + j1, i * self.columns + j2);
            }
        }
        self
    }
}

/// The composite `g ∘ f`, i.e. the matrix product `g * f`.
pub fn compose<G, F>(g: &G, f: &F) -> Result<Matrix, MatrixError>
where
    G: MatrixView + ?Sized,
    F: MatrixView + ?Sized,
{
    MatrixError::check_shape((g.columns(), f.columns()), f.shape())?;
    let mut gf = Matrix::new(g.rows(), f.columns());
    for (i, j) in (0..g.rows()).cartesian_product(0..f.columns()) {
        let mut acc = BigRational::zero();
        for k in 0..g.columns() {
            acc += &*g.entry(i, k) * &*f.entry(k, j);
        }
        gf[(i, j)] = acc;
    }
    Ok(gf)
}

impl MatrixView for Matrix {
    fn rows(&self) -> usize {
        self.rows
    }

    fn columns(&self) -> usize {
        self.columns
    }

    fn entry(&self, i: usize, j: usize) -> Cow<'_, BigRational> {
        Cow::Borrowed(Matrix::entry(self, i, j))
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = BigRational;

    fn index(&self, (i, j): (usize, usize)) -> &BigRational {
        self.entry(i, j)
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut BigRational {
        let idx = self.index_of(i, j);
        &mut self.entries[idx]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Matrix ({}x{})", self.rows, self.columns)?;
        for i in 0..self.rows {
            for entry in self.row(i) {
                write!(f, "{entry} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Identity;
    use expect_test::expect;

    fn q(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn composition() {
        let a = Matrix::from_vec(&[vec![1, 0, 1], vec![0, 1, 1]]);
        let b = Matrix::from_vec(&[vec![1, 0], vec![0, 1], vec![1, 1]]);
        let c = a.multiply(&b).unwrap();
        assert_eq!(c, Matrix::from_vec(&[vec![2, 1], vec![1, 2]]));

        let id = Identity::new(2);
        let c2 = compose(&compose(&id, &c).unwrap(), &id).unwrap();
        assert_eq!(c2, c);
    }

    #[test]
    fn composition_dimension_mismatch() {
        let a = Matrix::new(2, 3);
        let b = Matrix::new(2, 3);
        assert_eq!(
            a.multiply(&b),
            Err(MatrixError::DimensionMismatch {
                expected: (3, 3),
                found: (2, 3)
            })
        );
    }

    #[test]
    fn equality() {
        assert_ne!(Matrix::new(2, 3), Matrix::new(3, 2));
        assert_eq!(Matrix::new(0, 0), Matrix::from_rows(vec![]).unwrap());
        assert_eq!(Matrix::identity(3), Identity::new(3).to_matrix());
    }

    #[test]
    fn ragged_rows() {
        let rows = vec![vec![q(1, 1), q(2, 1)], vec![q(3, 1)]];
        assert!(matches!(
            Matrix::from_rows(rows),
            Err(MatrixError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn row_operations() {
        let mut m = Matrix::from_vec(&[vec![1, 2], vec![3, 4]]);
        m.row_add(0, 1, &q(-3, 1));
        assert_eq!(m, Matrix::from_vec(&[vec![1, 2], vec![0, -2]]));
        m.row_mul(1, &q(-1, 2)).row_swap(0, 1);
        assert_eq!(m, Matrix::from_vec(&[vec![0, 1], vec![1, 2]]));
    }

    #[test]
    fn column_operations() {
        let mut m = Matrix::from_vec(&[vec![1, 2], vec![3, 4]]);
        m.col_add(0, 1, &q(-2, 1));
        assert_eq!(m, Matrix::from_vec(&[vec![1, 0], vec![3, -2]]));
        m.col_mul(0, &q(1, 3)).col_swap(0, 1);
        assert_eq!(m[(0, 1)], q(1, 3));
        assert_eq!(m[(1, 1)], q(1, 1));
        assert_eq!(m[(1, 0)], q(-2, 1));
    }

    #[test]
    fn copy_block_aliasing() {
        let mut a = Matrix::new(5, 5);
        assert_eq!(
            a.copy_block(Block::new(0, 0, 2, 2), Block::new(1, 1, 2, 2)),
            Err(MatrixError::AliasingViolation)
        );
        assert_eq!(
            a.copy_block(Block::new(0, 0, 2, 2), Block::new(2, 2, 2, 2)),
            Ok(())
        );
        assert_eq!(
            a.copy_block(Block::new(3, 3, 2, 2), Block::new(3, 2, 2, 2)),
            Err(MatrixError::AliasingViolation)
        );
        assert_eq!(
            a.copy_block(Block::new(1, 3, 2, 2), Block::new(1, 1, 2, 2)),
            Ok(())
        );
    }

    #[test]
    fn copy_block_values() {
        let mut a = Matrix::from_vec(&[vec![1, 2, 0], vec![3, 4, 0]]);
        a.copy_block(Block::new(0, 2, 2, 1), Block::new(0, 0, 2, 1))
            .unwrap();
        assert_eq!(a, Matrix::from_vec(&[vec![1, 2, 1], vec![3, 4, 3]]));
        assert!(matches!(
            a.copy_block(Block::new(0, 2, 2, 1), Block::new(0, 0, 1, 2)),
            Err(MatrixError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn transpose() {
        let m = Matrix::from_vec(&[vec![1, 2, 3]]);
        assert_eq!(m.transpose(), Matrix::from_vec(&[vec![1], vec![2], vec![3]]));
    }

    #[test]
    fn display() {
        let mut m = Matrix::from_vec(&[vec![1, 0, -3], vec![0, 2, 7]]);
        m[(0, 1)] = q(2, 5);
        expect![[r#"
            Matrix (2x3)
            1 2/5 -3 
            0 2 7 
        "#]]
        .assert_eq(&m.to_string());
    }
}
