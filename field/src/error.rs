use num::bigint::BigUint;
use thiserror::Error;

/// Failures of field and polynomial operations that callers are expected to surface, as opposed
/// to operator misuse (mixing fields in `a + b`), which panics.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("operands belong to different fields (moduli {left} and {right})")]
    FieldMismatch { left: BigUint, right: BigUint },

    #[error("{value} has no multiplicative inverse modulo {modulus}")]
    NoInverse { value: BigUint, modulus: BigUint },

    #[error("cannot interpolate {points} points through {values} values")]
    DimensionMismatch { points: usize, values: usize },

    #[error("cannot interpolate between zero points")]
    EmptyInput,

    #[error("division by the zero polynomial")]
    DivisionByZero,

    #[error("the multiplicative group modulo {modulus} has no cyclic subgroup of order {order}")]
    SubgroupOrder { order: usize, modulus: BigUint },
}
