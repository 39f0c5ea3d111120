#![deny(clippy::use_self)]

pub mod coordinates;
mod error;
mod group_sequence;
mod sseq;

pub use error::SseqError;
pub use group_sequence::GroupSequence;

pub use crate::sseq::*;
