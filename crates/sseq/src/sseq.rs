use std::collections::BTreeMap;

use abelian::{
    compute_cokernel, compute_image, compute_kernel, morphism_zero, AbelianGroup,
    GroupWithMorphisms,
};
use plocal::{matrix::Matrix, prime::ValidPrime, MatrixError};
use rustc_hash::FxHashMap;
use tracing::instrument;

use crate::{coordinates::TrigradedIndex, GroupSequence, SseqError};

/// The first page of the spectral sequence.
pub const MIN_PAGE: u32 = 2;

/// A spectral sequence of finitely generated abelian groups at a prime, filled in page by page.
///
/// Every index carries two [`GroupSequence`]s starting from its `E_2` group. The kernel sequence
/// records the subgroup of cycles: `K_{r+1}` is the kernel of the `d_r` leaving the index,
/// restricted to `K_r`, together with its inclusion into `E_2`. The cokernel sequence records the
/// quotient by boundaries: `C_{r+1}` is `C_r` modulo the image of the `d_r` arriving at the
/// index, together with the projection from `E_2`. A `d_r` is a map `K_r(source) -> C_r(target)`.
///
/// # Invariants
///  - if `differentials[(index, r)]` is defined, then the kernel sequence at `index` and the
///    cokernel sequence at `index.target(r)` are both past page `r`.
///  - a zero differential is never recorded.
#[derive(Debug)]
pub struct SpectralSequence {
    p: ValidPrime,

    kernels: BTreeMap<TrigradedIndex, GroupSequence>,
    cokernels: BTreeMap<TrigradedIndex, GroupSequence>,

    /// (source, r) -> d_r, as a matrix from `K_r(source)` to `C_r(target)`.
    differentials: FxHashMap<(TrigradedIndex, u32), Matrix>,

    /// q -> (min_s, max_s), inclusive.
    bounds: BTreeMap<i32, (i32, i32)>,
}

impl SpectralSequence {
    pub fn new(p: ValidPrime) -> Self {
        Self {
            p,
            kernels: BTreeMap::new(),
            cokernels: BTreeMap::new(),
            differentials: FxHashMap::default(),
            bounds: BTreeMap::new(),
        }
    }

    pub fn prime(&self) -> ValidPrime {
        self.p
    }

    /// Declare the `E_2` group at `index`.
    pub fn set_e2(&mut self, index: TrigradedIndex, group: AbelianGroup) -> Result<(), SseqError> {
        if self.kernels.contains_key(&index) {
            return Err(SseqError::AlreadyDeclared { index });
        }
        tracing::debug!(%index, group = %group.display(self.p), "set E_2");
        self.kernels
            .insert(index, GroupSequence::new(MIN_PAGE, group.clone()));
        self.cokernels
            .insert(index, GroupSequence::new(MIN_PAGE, group));
        Ok(())
    }

    /// The indices at which an `E_2` group was declared, in increasing order.
    pub fn indices(&self) -> impl Iterator<Item = TrigradedIndex> + '_ {
        self.kernels.keys().copied()
    }

    fn kernel_sequence(&self, index: TrigradedIndex) -> Result<&GroupSequence, SseqError> {
        self.kernels
            .get(&index)
            .ok_or(SseqError::Undefined { index })
    }

    fn cokernel_sequence(&self, index: TrigradedIndex) -> Result<&GroupSequence, SseqError> {
        self.cokernels
            .get(&index)
            .ok_or(SseqError::Undefined { index })
    }

    fn kernel_sequence_mut(
        &mut self,
        index: TrigradedIndex,
    ) -> Result<&mut GroupSequence, SseqError> {
        self.kernels
            .get_mut(&index)
            .ok_or(SseqError::Undefined { index })
    }

    fn cokernel_sequence_mut(
        &mut self,
        index: TrigradedIndex,
    ) -> Result<&mut GroupSequence, SseqError> {
        self.cokernels
            .get_mut(&index)
            .ok_or(SseqError::Undefined { index })
    }

    pub fn get_e2(&self, index: TrigradedIndex) -> Result<AbelianGroup, SseqError> {
        self.get_kernel(index, MIN_PAGE)
    }

    /// The group of `d_2, ..., d_{r-1}` cycles at `index`.
    pub fn get_kernel(&self, index: TrigradedIndex, r: u32) -> Result<AbelianGroup, SseqError> {
        Ok(self.kernel_sequence(index)?.get(r)?.0.clone())
    }

    /// The inclusion of [`Self::get_kernel`] into `E_2`.
    pub fn get_inclusion(&self, index: TrigradedIndex, r: u32) -> Result<Matrix, SseqError> {
        Ok(self.kernel_sequence(index)?.get(r)?.1.clone())
    }

    /// `E_2` modulo the `d_2, ..., d_{r-1}` boundaries at `index`.
    pub fn get_cokernel(&self, index: TrigradedIndex, r: u32) -> Result<AbelianGroup, SseqError> {
        Ok(self.cokernel_sequence(index)?.get(r)?.0.clone())
    }

    /// The projection from `E_2` onto [`Self::get_cokernel`].
    pub fn get_projection(&self, index: TrigradedIndex, r: u32) -> Result<Matrix, SseqError> {
        Ok(self.cokernel_sequence(index)?.get(r)?.1.clone())
    }

    pub fn kernel_page(&self, index: TrigradedIndex) -> Result<u32, SseqError> {
        Ok(self.kernel_sequence(index)?.current_page())
    }

    pub fn cokernel_page(&self, index: TrigradedIndex) -> Result<u32, SseqError> {
        Ok(self.cokernel_sequence(index)?.current_page())
    }

    fn check_page(
        &self,
        sequence: &GroupSequence,
        index: TrigradedIndex,
        r: u32,
    ) -> Result<(), SseqError> {
        if sequence.is_done() {
            return Err(SseqError::AlreadySet { page: r + 1 });
        }
        let found = sequence.current_page();
        if found == r {
            Ok(())
        } else {
            Err(SseqError::WrongPage {
                index,
                expected: r,
                found,
            })
        }
    }

    /// Set the `d_r` leaving `index`, as a matrix from `K_r(index)` to `C_r(index.target(r))`.
    ///
    /// Both of these must currently be at page `r`, and both move to page `r + 1`.
    ///
    /// # Errors
    ///  - `Undefined` if either index was never declared.
    ///  - `WrongPage` if either sequence is not at page `r`.
    ///  - `AlreadySet` if either sequence was finished.
    ///  - `Matrix(DimensionMismatch)` if `d` has the wrong shape.
    #[instrument(skip(self, d))]
    pub fn set_diff(&mut self, index: TrigradedIndex, r: u32, d: Matrix) -> Result<(), SseqError> {
        let target = index.target(r);
        let kernels = self.kernel_sequence(index)?;
        let cokernels = self.cokernel_sequence(target)?;
        self.check_page(kernels, index, r)?;
        self.check_page(cokernels, target, r)?;

        let (source_group, inclusion) = kernels.get(r)?;
        let (target_group, projection) = cokernels.get(r)?;
        MatrixError::check_shape((target_group.rank(), source_group.rank()), d.shape())?;

        if morphism_zero(self.p, &d, target_group)? {
            tracing::debug!("differential is zero");
            self.kernel_sequence_mut(index)?.inc()?;
            self.cokernel_sequence_mut(target)?.inc()?;
            return Ok(());
        }

        let kernel = compute_kernel(
            self.p,
            &d,
            source_group,
            target_group,
            &[],
            std::slice::from_ref(inclusion),
        )?;
        let cokernel = compute_cokernel(
            self.p,
            &d,
            target_group,
            std::slice::from_ref(projection),
            &[],
        )?;
        tracing::debug!(
            kernel = %kernel.group.display(self.p),
            cokernel = %cokernel.group.display(self.p),
            "nonzero differential",
        );

        let GroupWithMorphisms {
            group: kernel_group,
            maps_from: mut new_inclusion,
            ..
        } = kernel;
        let GroupWithMorphisms {
            group: cokernel_group,
            maps_to: mut new_projection,
            ..
        } = cokernel;
        self.kernel_sequence_mut(index)?.append(
            r + 1,
            kernel_group,
            new_inclusion.swap_remove(0),
        )?;
        self.cokernel_sequence_mut(target)?.append(
            r + 1,
            cokernel_group,
            new_projection.swap_remove(0),
        )?;
        self.differentials.insert((index, r), d);
        Ok(())
    }

    /// Record that the `d_r` leaving `index` is zero.
    ///
    /// Only the halves that exist are advanced: the kernel sequence at `index` if `index` is in
    /// bounds, and the cokernel sequence at the target if the target is in bounds.
    #[instrument(skip(self))]
    pub fn set_diff_zero(&mut self, index: TrigradedIndex, r: u32) -> Result<(), SseqError> {
        let target = index.target(r);
        let source_live = self.in_bounds(index);
        let target_live = self.in_bounds(target);
        if source_live {
            self.check_page(self.kernel_sequence(index)?, index, r)?;
        }
        if target_live {
            self.check_page(self.cokernel_sequence(target)?, target, r)?;
        }
        if source_live {
            self.kernel_sequence_mut(index)?.inc()?;
        }
        if target_live {
            self.cokernel_sequence_mut(target)?.inc()?;
        }
        Ok(())
    }

    /// The `d_r` leaving `index`, if a nonzero one was set.
    pub fn get_diff_from(&self, index: TrigradedIndex, r: u32) -> Option<Matrix> {
        self.differentials.get(&(index, r)).cloned()
    }

    /// The `d_r` arriving at `index`, if a nonzero one was set.
    pub fn get_diff_to(&self, index: TrigradedIndex, r: u32) -> Option<Matrix> {
        self.get_diff_from(index.source(r), r)
    }

    /// `K_a / (K_a ∩ B_b)`: the image of `K_a -> E_2 -> C_b`.
    ///
    /// `maps_to` holds the projection from `K_a` and `maps_from` the inclusion into `C_b`.
    #[instrument(skip(self))]
    pub fn get_e_ab(
        &self,
        index: TrigradedIndex,
        a: u32,
        b: u32,
    ) -> Result<GroupWithMorphisms, SseqError> {
        let (kernel, inclusion) = self.kernel_sequence(index)?.get(a)?;
        let (cokernel, projection) = self.cokernel_sequence(index)?.get(b)?;
        let composite = projection.multiply(inclusion)?;
        Ok(compute_image(self.p, &composite, kernel, cokernel)?)
    }

    /// The `E_r` page at `index`.
    pub fn get_e(&self, index: TrigradedIndex, r: u32) -> Result<GroupWithMorphisms, SseqError> {
        self.get_e_ab(index, r, r)
    }

    /// Declare that nothing changes at `index` any more, so every later page can be read.
    ///
    /// Differentials touching a finished sequence are rejected with `AlreadySet`.
    pub fn finish(&mut self, index: TrigradedIndex) -> Result<(), SseqError> {
        self.kernel_sequence_mut(index)?.finish();
        self.cokernel_sequence_mut(index)?.finish();
        Ok(())
    }

    /// Declare that for this value of `q`, the groups with `min_s <= s <= max_s` are populated.
    pub fn set_bounds(&mut self, q: i32, min_s: i32, max_s: i32) {
        self.bounds.insert(q, (min_s, max_s));
    }

    pub fn get_bounds(&self, q: i32) -> Option<(i32, i32)> {
        self.bounds.get(&q).copied()
    }

    pub fn in_bounds(&self, index: TrigradedIndex) -> bool {
        self.get_bounds(index.q())
            .map_or(false, |(min, max)| (min..=max).contains(&index.s()))
    }
}
