use abelian::{
    compute_cokernel, compute_image, compute_kernel, lift_from_free, morphism_equal,
    morphism_zero, AbelianGroup,
};
use plocal::{
    matrix::{ChangeOfBasis, Matrix},
    prime::ValidPrime,
    smith::smith_reduce,
};
use sseq::{coordinates::TrigradedIndex, SpectralSequence};

#[test]
fn cokernel_of_free_diagonal() {
    let p = ValidPrime::new(3);
    let f = Matrix::from_vec(&[vec![0, 0, 0], vec![0, 2, 0], vec![0, 0, 3]]);
    let c = compute_cokernel(p, &f, &AbelianGroup::free(3), &[], &[]).unwrap();
    assert_eq!(c.group.free_rank(), 1);
    assert_eq!(c.group.tor_rank(), 1);
    assert_eq!(c.group.torsion_exponents(), &[1]);
}

#[test]
fn kernel_into_torsion() {
    let p = ValidPrime::new(5);
    let x = AbelianGroup::new(0, vec![1, 2]);
    let y = AbelianGroup::new(0, vec![2]);
    let f = Matrix::from_vec(&[vec![5, 2]]);
    let k = compute_kernel(p, &f, &x, &y, &[], &[Matrix::identity(2)]).unwrap();
    assert_eq!(k.group.free_rank(), 0);
    assert_eq!(k.group.torsion_exponents(), &[1]);
    assert!(morphism_zero(p, &f.multiply(&k.maps_from[0]).unwrap(), &y).unwrap());
}

#[test]
fn image_of_torsion_map() {
    let p = ValidPrime::new(3);
    let x = AbelianGroup::new(0, vec![2, 1]);
    let f = Matrix::from_vec(&[vec![0, 6], vec![0, 0]]);
    let image = compute_image(p, &f, &x, &x).unwrap();
    assert_eq!(image.group.free_rank(), 0);
    assert_eq!(image.group.torsion_exponents(), &[1]);
}

#[test]
fn lift_along_diagonal() {
    let p = ValidPrime::new(2);
    let y = AbelianGroup::new(0, vec![1, 3]);
    let f = Matrix::from_vec(&[vec![1, 4], vec![3, 0]]);
    let map = Matrix::from_vec(&[vec![1], vec![1]]);
    let g = lift_from_free(p, &f, &map, &y).unwrap();
    assert_eq!(g, Matrix::from_vec(&[vec![3, 0]]));
    assert!(morphism_equal(p, &map.multiply(&g).unwrap(), &f, &y).unwrap());
}

#[test]
fn anti_diagonal_reduces_to_identity() {
    let p = ValidPrime::new(2);
    let mut f = Matrix::from_vec(&[vec![0, 0, 1], vec![0, 1, 0], vec![1, 0, 0]]);
    let rank =
        smith_reduce(p, &mut f, &mut ChangeOfBasis::new(), &mut ChangeOfBasis::new()).unwrap();
    assert_eq!(rank, 3);
    assert_eq!(f, Matrix::identity(3));
}

#[test]
fn zero_differential_changes_nothing() {
    let p = ValidPrime::new(2);
    let mut sseq = SpectralSequence::new(p);
    let a = TrigradedIndex::new(3, 0, 0);
    let b = a.target(3);
    sseq.set_e2(a, AbelianGroup::new(2, vec![1])).unwrap();
    sseq.set_e2(b, AbelianGroup::new(0, vec![1, 2])).unwrap();

    // Move both ends to page 3 without a d_2.
    sseq.set_bounds(a.q(), 0, 0);
    sseq.set_bounds(b.q(), 1, 1);
    sseq.set_diff_zero(a, 2).unwrap();
    sseq.set_diff_zero(b.source(2), 2).unwrap();

    // Every entry is a multiple of the order of the generator it lands on.
    let d = Matrix::from_vec(&[vec![2, 0, 4], vec![0, 4, -8]]);
    sseq.set_diff(a, 3, d).unwrap();

    assert_eq!(sseq.get_kernel(a, 4), sseq.get_kernel(a, 3));
    assert_eq!(sseq.get_inclusion(a, 4), sseq.get_inclusion(a, 3));
    assert_eq!(sseq.get_cokernel(b, 4), sseq.get_cokernel(b, 3));
    assert_eq!(sseq.get_projection(b, 4), sseq.get_projection(b, 3));
    assert_eq!(sseq.get_diff_from(a, 3), None);
    assert_eq!(sseq.get_diff_to(b, 3), None);
}

#[test]
fn nonzero_differential_then_page() {
    let p = ValidPrime::new(2);
    let mut sseq = SpectralSequence::new(p);
    let a = TrigradedIndex::new(2, 0, 0);
    let b = a.target(2);
    sseq.set_e2(a, AbelianGroup::free(2)).unwrap();
    sseq.set_e2(b, AbelianGroup::free(1)).unwrap();

    sseq.set_diff(a, 2, Matrix::from_vec(&[vec![2, 4]])).unwrap();
    sseq.finish(a).unwrap();
    sseq.finish(b).unwrap();

    assert_eq!(sseq.get_kernel(a, 3).unwrap(), AbelianGroup::free(1));
    assert_eq!(sseq.get_e(a, 3).unwrap().group, AbelianGroup::free(1));
    assert_eq!(sseq.get_e(b, 3).unwrap().group, AbelianGroup::new(0, vec![1]));
    assert_eq!(
        sseq.get_e(b, 3).unwrap().group.display(p).to_string(),
        "Z/2"
    );
}
