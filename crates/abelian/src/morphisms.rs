//! Kernels, cokernels and images of morphisms between [`AbelianGroup`]s.
//!
//! A morphism `f: X -> Y` is a matrix with `Y.rank()` rows and `X.rank()` columns, written in the
//! generators of the two presentations. It is only meaningful if it respects the relations, i.e.
//! `f` times the torsion matrix of `X` lies in the image of the torsion matrix of `Y`. This is not
//! checked.
//!
//! Each computation changes the basis of some group, and takes lists of auxiliary matrices to
//! carry along. Matrices in a `to` list are maps *into* that group and are returned with their
//! rows rewritten. Matrices in a `from` list are maps *out of* it and are returned with their
//! columns rewritten.

use num_rational::BigRational;
use num_traits::{One, Zero};
use plocal::{
    matrix::{ChangeOfBasis, Matrix},
    prime::{p_pow_q, p_val_q, ValidPrime, Valuation},
    smith::smith_reduce,
    MatrixError,
};
use serde::Serialize;
use tracing::instrument;

use crate::AbelianGroup;

/// A group together with the auxiliary maps, rewritten in its basis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupWithMorphisms {
    pub group: AbelianGroup,
    pub maps_to: Vec<Matrix>,
    pub maps_from: Vec<Matrix>,
}

/// The matrix `[f | R_Y]`, where `R_Y` is the torsion matrix of `y`.
fn with_relations(p: ValidPrime, f: &Matrix, y: &AbelianGroup) -> Result<Matrix, MatrixError> {
    MatrixError::check_shape((y.rank(), f.columns()), f.shape())?;
    let mut result = Matrix::new(f.rows(), f.columns() + y.tor_rank());
    result.slice_mut(0, 0, f.rows(), f.columns()).assign(f)?;
    result
        .slice_mut(0, f.columns(), y.rank(), y.tor_rank())
        .assign(&y.torsion_matrix(p))?;
    Ok(result)
}

fn drop_rows(matrices: Vec<Matrix>, n: usize) -> Vec<Matrix> {
    matrices
        .into_iter()
        .map(|m| m.slice(n, 0, m.rows() - n, m.columns()).into_owned())
        .collect()
}

fn drop_columns(matrices: Vec<Matrix>, n: usize) -> Vec<Matrix> {
    matrices
        .into_iter()
        .map(|m| m.slice(0, n, m.rows(), m.columns() - n).into_owned())
        .collect()
}

/// The cokernel of `f: X -> Y`.
///
/// `to_y` are maps into `Y` and become maps into the cokernel, i.e. are composed with the
/// projection. `from_y` are maps out of `Y`, and their restriction to the complement of the
/// image is returned. In particular passing the identity of `Y` as `from_y` gives a section of
/// the projection on the level of generators.
///
/// # Errors
/// `DimensionMismatch` if `f` does not have `y.rank()` rows or a companion has the wrong shape,
/// and `NegativeValuation` if `f` is not integral at `p`.
#[instrument(skip_all, fields(%p, y = %y.display(p)))]
pub fn compute_cokernel(
    p: ValidPrime,
    f: &Matrix,
    y: &AbelianGroup,
    to_y: &[Matrix],
    from_y: &[Matrix],
) -> Result<GroupWithMorphisms, MatrixError> {
    MatrixError::check_shape((y.rank(), f.columns()), f.shape())?;
    let mut m = with_relations(p, f, y)?;
    let mut to_y = to_y.to_vec();
    let mut from_y = from_y.to_vec();

    let rank = smith_reduce(
        p,
        &mut m,
        &mut ChangeOfBasis::new(),
        &mut ChangeOfBasis::with(&mut to_y, &mut from_y),
    )?;

    // The diagonal reads 1, ..., 1, p^k, ..., p^l, 0, ... and the units kill their generators.
    let one = BigRational::one();
    let used = (0..rank).take_while(|&d| *m.entry(d, d) == one).count();
    let torsion = (used..rank)
        .map(|d| match p_val_q(p, m.entry(d, d)) {
            Valuation::Finite(k) => k as u32,
            Valuation::Infinite => unreachable!("zero entry inside the diagonal rank"),
        })
        .collect::<Vec<_>>();
    let group = AbelianGroup::new(y.rank() - rank, torsion);
    tracing::debug!(cokernel = %group.display(p), "computed cokernel");

    Ok(GroupWithMorphisms {
        group,
        maps_to: drop_rows(to_y, used),
        maps_from: drop_columns(from_y, used),
    })
}

/// The kernel of `f: X -> Y`.
///
/// `to_x` are maps into `X` that must land in the kernel; they are returned as maps into the
/// kernel. `from_x` are maps out of `X`, and are returned composed with the inclusion of the
/// kernel. Passing the identity of `X` as `from_x` therefore yields the inclusion itself.
///
/// # Errors
/// As for [`compute_cokernel`]; additionally `DimensionMismatch` if `f` does not have
/// `x.rank()` columns.
#[instrument(skip_all, fields(%p, x = %x.display(p), y = %y.display(p)))]
pub fn compute_kernel(
    p: ValidPrime,
    f: &Matrix,
    x: &AbelianGroup,
    y: &AbelianGroup,
    to_x: &[Matrix],
    from_x: &[Matrix],
) -> Result<GroupWithMorphisms, MatrixError> {
    MatrixError::check_shape((y.rank(), x.rank()), f.shape())?;
    let w = x.rank();
    let lifted_rank = w + y.tor_rank();

    // An element of the kernel is a pair (a, b) with f a + R_Y b = 0, and ker [f | R_Y] is free.
    // The relations of X lift to it as (R_X, -R_Y^{-1} f R_X).
    let mut rel_x_lift = Matrix::new(lifted_rank, x.tor_rank());
    rel_x_lift
        .slice_mut(0, 0, w, x.tor_rank())
        .assign(&x.torsion_matrix(p))?;
    for (i, ei) in y.torsion_exponents().iter().enumerate() {
        for (j, ej) in x.torsion_exponents().iter().enumerate() {
            let shift = p_pow_q(p, Valuation::Finite(*ej as i32 - *ei as i32));
            rel_x_lift[(w + i, j)] = -(f.entry(i, j) * shift);
        }
    }

    let mut to_lifts = Vec::with_capacity(to_x.len() + 1);
    for g in to_x {
        let fg = f.multiply(g)?;
        let mut lift = Matrix::new(lifted_rank, g.columns());
        lift.slice_mut(0, 0, w, g.columns()).assign(g)?;
        for (i, &ei) in y.torsion_exponents().iter().enumerate() {
            let scale = p_pow_q(p, Valuation::Finite(-(ei as i32)));
            for j in 0..g.columns() {
                lift[(w + i, j)] = -(fg.entry(i, j) * &scale);
            }
        }
        to_lifts.push(lift);
    }
    to_lifts.push(rel_x_lift);

    let mut from_padded = Vec::with_capacity(from_x.len());
    for g in from_x {
        MatrixError::check_shape((g.rows(), w), g.shape())?;
        let mut padded = Matrix::new(g.rows(), lifted_rank);
        padded.slice_mut(0, 0, g.rows(), w).assign(g)?;
        from_padded.push(padded);
    }

    let mut m = with_relations(p, f, y)?;
    let rank = smith_reduce(
        p,
        &mut m,
        &mut ChangeOfBasis::with(&mut to_lifts, &mut from_padded),
        &mut ChangeOfBasis::new(),
    )?;

    // The generators past the diagonal rank span ker [f | R_Y].
    let mut to_lifts = drop_rows(to_lifts, rank);
    let from_padded = drop_columns(from_padded, rank);
    let rel_kernel = to_lifts.split_off(to_x.len());

    compute_cokernel(
        p,
        &rel_kernel[0],
        &AbelianGroup::free(lifted_rank - rank),
        &to_lifts,
        &from_padded,
    )
}

/// The image of `f: X -> Y`, as the cokernel of the inclusion of the kernel of `f`.
///
/// `maps_to` holds the projection `X -> im f` and `maps_from` the inclusion `im f -> Y`.
#[instrument(skip_all, fields(%p))]
pub fn compute_image(
    p: ValidPrime,
    f: &Matrix,
    x: &AbelianGroup,
    y: &AbelianGroup,
) -> Result<GroupWithMorphisms, MatrixError> {
    let kernel = compute_kernel(p, f, x, y, &[], &[Matrix::identity(x.rank())])?;
    compute_cokernel(
        p,
        &kernel.maps_from[0],
        x,
        &[Matrix::identity(x.rank())],
        std::slice::from_ref(f),
    )
}

/// Find `g` with `map ∘ g = f`, where `f` is a map from a free group into `y` and `map: X -> Y`.
///
/// The lift is read off a Smith reduction of `[R_Y | map]`, and whether it actually exists is not
/// checked. Use [`morphism_equal`] on the result if in doubt.
#[instrument(skip_all, fields(%p, y = %y.display(p)))]
pub fn lift_from_free(
    p: ValidPrime,
    f: &Matrix,
    map: &Matrix,
    y: &AbelianGroup,
) -> Result<Matrix, MatrixError> {
    MatrixError::check_shape((y.rank(), f.columns()), f.shape())?;
    MatrixError::check_shape((y.rank(), map.columns()), map.shape())?;
    let t = y.tor_rank();
    let width = t + map.columns();

    let mut m = Matrix::new(y.rank(), width);
    m.slice_mut(0, 0, y.rank(), t).assign(&y.torsion_matrix(p))?;
    m.slice_mut(0, t, y.rank(), map.columns()).assign(map)?;

    let mut f = f.clone();
    let mut basis = Matrix::identity(width);
    let rank = smith_reduce(
        p,
        &mut m,
        &mut ChangeOfBasis::with([], [&mut basis]),
        &mut ChangeOfBasis::with([&mut f], []),
    )?;

    // Solve the diagonal system, then return to the original basis.
    let mut solution = Matrix::new(width, f.columns());
    for i in 0..rank {
        let d = m.entry(i, i);
        for j in 0..f.columns() {
            solution[(i, j)] = f.entry(i, j) / d;
        }
    }
    let solution = basis.multiply(&solution)?;
    Ok(solution.slice(t, 0, map.columns(), f.columns()).into_owned())
}

/// Whether `f` and `g` agree as maps into `y`, i.e. their difference lies in the relations of
/// `y`.
pub fn morphism_equal(
    p: ValidPrime,
    f: &Matrix,
    g: &Matrix,
    y: &AbelianGroup,
) -> Result<bool, MatrixError> {
    MatrixError::check_shape((y.rank(), f.columns()), f.shape())?;
    MatrixError::check_shape(f.shape(), g.shape())?;
    for i in 0..f.rows() {
        for j in 0..f.columns() {
            let diff = f.entry(i, j) - g.entry(i, j);
            let agrees = match y.exponent(i) {
                Some(e) => p_val_q(p, &diff) >= Valuation::Finite(e as i32),
                None => diff.is_zero(),
            };
            if !agrees {
                return Ok(false);
            }
        }
    }
    Ok(true)
}

/// Whether `f` is zero as a map into `y`.
pub fn morphism_zero(p: ValidPrime, f: &Matrix, y: &AbelianGroup) -> Result<bool, MatrixError> {
    morphism_equal(p, f, &Matrix::new(f.rows(), f.columns()), y)
}
