use thiserror::Error;

pub mod prover;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FriConfig {
    /// Number of query rounds to perform.
    pub num_query_rounds: usize,

    /// Ratio of the evaluation domain to the trace domain. Each query opens the base layer at
    /// `i`, `i + blowup` and `i + 2 * blowup`, which are the images of `x`, `g * x` and `g^2 * x`.
    pub blowup: usize,
}

impl FriConfig {
    /// Largest query index whose three base-layer openings stay inside a domain of `domain_size`
    /// points.
    pub fn query_upper_bound(&self, domain_size: usize) -> Option<usize> {
        domain_size.checked_sub(1 + 2 * self.blowup)
    }
}

#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum FriError {
    #[error("Query index {index} plus offset {offset} exceeds the domain of size {domain_size}")]
    IndexOutOfRange {
        index: usize,
        offset: usize,
        domain_size: usize,
    },
    #[error("Cannot fold a polynomial of degree {degree} over a domain of size {domain_size}")]
    DomainExhausted { degree: usize, domain_size: usize },
    #[error("Layer {layer} commits to {leaves} values over a domain of size {domain_size}")]
    LayerMismatch {
        layer: usize,
        leaves: usize,
        domain_size: usize,
    },
}
