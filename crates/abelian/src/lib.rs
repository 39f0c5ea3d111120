pub mod group;
pub mod morphisms;
pub mod parser;

pub use group::{AbelianGroup, TorsionMatrix};
pub use morphisms::{
    compute_cokernel, compute_image, compute_kernel, lift_from_free, morphism_equal,
    morphism_zero, GroupWithMorphisms,
};
