use stark101::field::FieldError;
use stark101::fri::FriError;
use thiserror::Error;

/// Ways a proof can fail to be produced. None of them is recoverable: each means either the claim
/// is false or the configuration is inconsistent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProofError {
    #[error("The {constraint} constraint does not divide exactly, leaving a remainder of degree {remainder_degree}")]
    DivisionNotExact {
        constraint: &'static str,
        remainder_degree: usize,
    },
    #[error("Query index {index} plus offset {offset} exceeds the evaluation domain of size {domain_size}")]
    IndexOutOfRange {
        index: usize,
        offset: usize,
        domain_size: usize,
    },
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error(transparent)]
    Fri(FriError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<FriError> for ProofError {
    fn from(err: FriError) -> Self {
        match err {
            FriError::IndexOutOfRange {
                index,
                offset,
                domain_size,
            } => ProofError::IndexOutOfRange {
                index,
                offset,
                domain_size,
            },
            err => ProofError::Fri(err),
        }
    }
}
