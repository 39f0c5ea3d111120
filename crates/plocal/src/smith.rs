//! Smith normal form over the integers localized at a prime.
//!
//! Over `Z_(p)` every nonzero rational integral at `p` is a unit times a power of `p`, so a matrix
//! can be diagonalized by invertible row and column operations until every diagonal entry is `0`
//! or exactly `p^k`. The reduction here also records its basis changes on companion matrices; see
//! [`ChangeOfBasis`].

use num_traits::Zero;
use tracing::instrument;

use crate::{
    matrix::{ChangeOfBasis, Matrix},
    prime::{p_pow_q, p_val_q, ValidPrime, Valuation},
    MatrixError,
};

/// Check that every companion matrix lives on the right side of a basis of dimension `dim`.
fn check_companions(basis: &ChangeOfBasis, dim: usize) -> Result<(), MatrixError> {
    for m in &basis.to {
        MatrixError::check_shape((dim, m.columns()), m.shape())?;
    }
    for m in &basis.from {
        MatrixError::check_shape((m.rows(), dim), m.shape())?;
    }
    Ok(())
}

/// The nonzero entry of minimal valuation in the block `d.., d..`. Ties go to the first entry in
/// row-major order.
fn find_pivot(p: ValidPrime, f: &Matrix, d: usize) -> Option<(usize, usize, Valuation)> {
    let mut best: Option<(usize, usize, Valuation)> = None;
    for i in d..f.rows() {
        for j in d..f.columns() {
            let v = p_val_q(p, f.entry(i, j));
            if v.is_infinite() {
                continue;
            }
            if best.map_or(true, |(_, _, w)| v < w) {
                best = Some((i, j, v));
            }
        }
    }
    best
}

/// Reduce `f` to Smith normal form at `p`, in place.
///
/// `f` is a map `X -> Y`. Every basis change of `X` is applied to the companions in `x` as well as
/// to the columns of `f`, and every basis change of `Y` to the companions in `y` and the rows of
/// `f`. Afterwards `f` is zero off the diagonal, and its diagonal reads `p^{k_0}, p^{k_1}, ...,
/// p^{k_{r-1}}, 0, ..., 0` with `k_0 <= k_1 <= ...`. Returns the number `r` of nonzero diagonal
/// entries.
///
/// # Errors
/// `DimensionMismatch` if a companion does not match the dimension of its basis, and
/// `NegativeValuation` if a chosen pivot is not integral at `p`. In the second case the matrices
/// are left partially reduced.
#[instrument(skip_all, fields(%p, rows = f.rows(), columns = f.columns()))]
pub fn smith_reduce(
    p: ValidPrime,
    f: &mut Matrix,
    x: &mut ChangeOfBasis,
    y: &mut ChangeOfBasis,
) -> Result<usize, MatrixError> {
    check_companions(x, f.columns())?;
    check_companions(y, f.rows())?;

    let size = std::cmp::min(f.rows(), f.columns());
    let mut rank = 0;
    for d in 0..size {
        let Some((i_min, j_min, v)) = find_pivot(p, f, d) else {
            break;
        };
        let k = match v {
            Valuation::Finite(k) if k >= 0 => k,
            _ => {
                return Err(MatrixError::NegativeValuation {
                    row: i_min,
                    column: j_min,
                })
            }
        };
        let pivot = f.entry(i_min, j_min).clone();
        tracing::trace!(d, i_min, j_min, k, "pivot");

        // Clear the pivot column.
        for i in 0..f.rows() {
            if i == i_min || f.entry(i, j_min).is_zero() {
                continue;
            }
            let lambda = f.entry(i, j_min) / &pivot;
            f.row_add(i_min, i, &-&lambda);
            y.add(i, i_min, &lambda);
        }

        // Clear the pivot row.
        for j in 0..f.columns() {
            if j == j_min || f.entry(i_min, j).is_zero() {
                continue;
            }
            let lambda = -(f.entry(i_min, j) / &pivot);
            f.col_add(j_min, j, &lambda);
            x.add(j_min, j, &lambda);
        }

        f.row_swap(i_min, d);
        y.swap(i_min, d);
        f.col_swap(j_min, d);
        x.swap(j_min, d);

        let scale = p_pow_q(p, Valuation::Finite(k)) / pivot;
        f.col_mul(d, &scale);
        x.mul(d, &scale);

        rank += 1;
    }
    tracing::debug!(rank, "reduced");
    Ok(rank)
}

/// Whether `f` is in the shape [`smith_reduce`] produces, with exactly `rank` nonzero diagonal
/// entries.
pub fn is_smith_normal(p: ValidPrime, f: &Matrix, rank: usize) -> bool {
    let mut last = 0;
    for i in 0..f.rows() {
        for j in 0..f.columns() {
            let entry = f.entry(i, j);
            if i != j || i >= rank {
                if !entry.is_zero() {
                    return false;
                }
                continue;
            }
            match p_val_q(p, entry) {
                Valuation::Finite(k) if k >= last && *entry == p_pow_q(p, Valuation::Finite(k)) => {
                    last = k;
                }
                _ => return false,
            }
        }
    }
    rank <= std::cmp::min(f.rows(), f.columns())
}
