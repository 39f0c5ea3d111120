use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// Shapes are given as `(rows, columns)`.
    #[error("dimension mismatch: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("source and destination blocks of the same matrix overlap")]
    AliasingViolation,
    #[error("entry ({row}, {column}) is not integral at the working prime")]
    NegativeValuation { row: usize, column: usize },
}

impl MatrixError {
    pub fn check_shape(
        expected: (usize, usize),
        found: (usize, usize),
    ) -> Result<(), Self> {
        if expected == found {
            Ok(())
        } else {
            Err(Self::DimensionMismatch { expected, found })
        }
    }
}
