#![allow(clippy::many_single_char_names)]

mod error;
pub mod matrix;
pub mod prime;
pub mod smith;

pub use error::MatrixError;
