use std::{borrow::Cow, fmt};

use num_rational::BigRational;
use num_traits::Zero;
use plocal::{
    matrix::MatrixView,
    prime::{p_pow_z, ValidPrime},
};
use serde::{Deserialize, Serialize};

/// A finitely generated abelian group localized at a prime, `Z/p^{e_0} + ... + Z/p^{e_{t-1}} +
/// Z^n`.
///
/// The prime is not part of the group; every operation that needs it takes it explicitly. The
/// basis is ordered with the torsion generators first, in the order of `torsion`, followed by the
/// `free_rank` free generators.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbelianGroup {
    free_rank: usize,
    torsion: Vec<u32>,
}

impl AbelianGroup {
    /// # Panics
    /// If a torsion exponent is zero. Such a summand is trivial and must be left out.
    pub fn new(free_rank: usize, torsion: Vec<u32>) -> Self {
        assert!(
            torsion.iter().all(|&e| e > 0),
            "torsion exponents must be positive"
        );
        Self { free_rank, torsion }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn free(rank: usize) -> Self {
        Self::new(rank, vec![])
    }

    pub fn free_rank(&self) -> usize {
        self.free_rank
    }

    pub fn tor_rank(&self) -> usize {
        self.torsion.len()
    }

    /// The number of generators.
    pub fn rank(&self) -> usize {
        self.free_rank + self.torsion.len()
    }

    pub fn torsion_exponents(&self) -> &[u32] {
        &self.torsion
    }

    /// The exponent of the `i`th generator, or `None` if it is free.
    pub fn exponent(&self, i: usize) -> Option<u32> {
        self.torsion.get(i).copied()
    }

    pub fn is_zero(&self) -> bool {
        self.rank() == 0
    }

    /// The relations of the presentation, as a `rank x tor_rank` matrix whose `j`th column is
    /// `p^{e_j}` times the `j`th generator.
    pub fn torsion_matrix(&self, p: ValidPrime) -> TorsionMatrix<'_> {
        TorsionMatrix { group: self, p }
    }

    pub fn display(&self, p: ValidPrime) -> GroupDisplay<'_> {
        GroupDisplay { group: self, p }
    }
}

/// See [`AbelianGroup::torsion_matrix`].
#[derive(Clone, Copy, Debug)]
pub struct TorsionMatrix<'a> {
    group: &'a AbelianGroup,
    p: ValidPrime,
}

impl MatrixView for TorsionMatrix<'_> {
    fn rows(&self) -> usize {
        self.group.rank()
    }

    fn columns(&self) -> usize {
        self.group.tor_rank()
    }

    fn entry(&self, i: usize, j: usize) -> Cow<'_, BigRational> {
        assert!(i < self.rows() && j < self.columns());
        if i == j {
            Cow::Owned(BigRational::from_integer(p_pow_z(
                self.p,
                self.group.torsion[j],
            )))
        } else {
            Cow::Owned(BigRational::zero())
        }
    }
}

/// Renders a group as `Z + Z/3 + Z/9`, with the prime powers evaluated.
pub struct GroupDisplay<'a> {
    group: &'a AbelianGroup,
    p: ValidPrime,
}

impl fmt::Display for GroupDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.group.is_zero() {
            return write!(f, "0");
        }
        let free = std::iter::repeat("Z".to_string()).take(self.group.free_rank);
        let torsion = self
            .group
            .torsion
            .iter()
            .map(|&e| format!("Z/{}", p_pow_z(self.p, e)));
        write!(f, "{}", itertools::join(free.chain(torsion), " + "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use expect_test::expect;
    use plocal::matrix::Matrix;
    use rstest::rstest;

    #[rstest]
    #[case(AbelianGroup::zero(), "0")]
    #[case(AbelianGroup::free(1), "Z")]
    #[case(AbelianGroup::new(0, vec![2]), "Z/9")]
    #[case(AbelianGroup::new(2, vec![1, 2, 2]), "Z + Z + Z/3 + Z/9 + Z/9")]
    fn display(#[case] group: AbelianGroup, #[case] output: &str) {
        assert_eq!(group.display(ValidPrime::new(3)).to_string(), output);
    }

    #[test]
    fn ranks() {
        let g = AbelianGroup::new(2, vec![1, 3]);
        assert_eq!(g.rank(), 4);
        assert_eq!(g.tor_rank(), 2);
        assert_eq!(g.free_rank(), 2);
        assert_eq!(g.exponent(1), Some(3));
        assert_eq!(g.exponent(2), None);
        assert!(!g.is_zero());
        assert!(AbelianGroup::new(0, vec![]).is_zero());
    }

    #[test]
    fn torsion_matrix() {
        let g = AbelianGroup::new(1, vec![1, 3]);
        let m = g.torsion_matrix(ValidPrime::new(2));
        assert_eq!(m.shape(), (3, 2));
        assert!(m.view_eq(&Matrix::from_vec(&[vec![2, 0], vec![0, 8], vec![0, 0]])));
        expect![[r#"
            Matrix (3x2)
            2 0 
            0 8 
            0 0 
        "#]]
        .assert_eq(&m.to_matrix().to_string());
    }

    #[test]
    #[should_panic]
    fn zero_exponent() {
        AbelianGroup::new(1, vec![0]);
    }
}
