use num_rational::BigRational;
use num_traits::{One, Zero};

use super::Matrix;

/// A set of matrices that must follow a change of basis of one group.
///
/// Matrices in `to` are maps *into* the group, so a basis change acts on their rows. Matrices in
/// `from` are maps *out of* the group, so it acts on their columns, by the inverse operation.
/// After any sequence of operations, `from[k] * to[l]` is unchanged for every `k` and `l`.
#[derive(Debug, Default)]
pub struct ChangeOfBasis<'a> {
    pub to: Vec<&'a mut Matrix>,
    pub from: Vec<&'a mut Matrix>,
}

impl<'a> ChangeOfBasis<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        to: impl IntoIterator<Item = &'a mut Matrix>,
        from: impl IntoIterator<Item = &'a mut Matrix>,
    ) -> Self {
        Self {
            to: to.into_iter().collect(),
            from: from.into_iter().collect(),
        }
    }

    /// Replace the basis vector `e[i2]` by `e[i2] + lambda * e[i1]`.
    pub fn add(&mut self, i1: usize, i2: usize, lambda: &BigRational) {
        if lambda.is_zero() {
            return;
        }
        let neg = -lambda;
        for m in &mut self.to {
            m.row_add(i2, i1, &neg);
        }
        for m in &mut self.from {
            m.col_add(i1, i2, lambda);
        }
    }

    /// Replace the basis vector `e[i]` by `lambda * e[i]`. `lambda` must be nonzero.
    pub fn mul(&mut self, i: usize, lambda: &BigRational) {
        assert!(!lambda.is_zero(), "cannot rescale a basis vector by zero");
        if lambda.is_one() {
            return;
        }
        let inv = lambda.recip();
        for m in &mut self.to {
            m.row_mul(i, &inv);
        }
        for m in &mut self.from {
            m.col_mul(i, lambda);
        }
    }

    pub fn swap(&mut self, i1: usize, i2: usize) {
        if i1 == i2 {
            return;
        }
        for m in &mut self.to {
            m.row_swap(i1, i2);
        }
        for m in &mut self.from {
            m.col_swap(i1, i2);
        }
    }
}
