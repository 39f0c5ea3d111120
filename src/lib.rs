//! Exact bookkeeping for tri-graded spectral sequences of finitely generated abelian groups,
//! localized at a prime.
//!
//! The work is split over three crates, re-exported here:
//!  - [`plocal`]: rational matrices, `p`-adic valuations and Smith reduction at `p`.
//!  - [`abelian`]: abelian groups and kernels, cokernels, images and lifts of maps between them.
//!  - [`sseq`]: the store holding every group of the spectral sequence page by page.
//!
//! This crate adds the command line front end and a few helpers for it in [`utils`].

pub mod utils;

pub use abelian;
pub use plocal;
pub use sseq;
