mod change_of_basis;
mod matrix_inner;
mod view;

pub use change_of_basis::ChangeOfBasis;
pub use matrix_inner::{compose, Matrix};
pub use view::{Block, Identity, MatrixSlice, MatrixSliceMut, MatrixView};
