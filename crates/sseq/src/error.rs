use plocal::MatrixError;
use thiserror::Error;

use crate::coordinates::TrigradedIndex;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SseqError {
    #[error("page {page} has not been computed yet; the sequence is at page {current}")]
    IndexNotYetSet { page: u32, current: u32 },
    #[error("page {page} is below the first page {min}")]
    IndexBelowMinimum { page: u32, min: u32 },
    #[error("expected {index} to be at page {expected}, but it is at page {found}")]
    WrongPage {
        index: TrigradedIndex,
        expected: u32,
        found: u32,
    },
    #[error("page {page} is already set")]
    AlreadySet { page: u32 },
    #[error("E_2 at {index} is already declared")]
    AlreadyDeclared { index: TrigradedIndex },
    #[error("nothing is declared at {index}")]
    Undefined { index: TrigradedIndex },
    #[error(transparent)]
    Matrix(#[from] MatrixError),
}
