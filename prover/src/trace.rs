use log::debug;
use stark101::field::interpolation::interpolant;
use stark101::field::polynomial::PolynomialCoeffs;
use stark101::field::FieldElement;

use crate::config::StarkConfig;
use crate::error::ProofError;

/// Computes `a_0 = 1`, `a_1 = seed`, `a_i = a_{i-1}^2 + a_{i-2}^2` for `trace_len` steps.
pub fn generate_trace(config: &StarkConfig) -> Vec<FieldElement> {
    let field = &config.field;
    let mut trace = Vec::with_capacity(config.trace_len);
    let (mut a, mut b) = (field.one(), field.from_canonical_u64(config.seed));
    for _ in 0..config.trace_len {
        let next = a.square() + b.square();
        trace.push(std::mem::replace(&mut a, std::mem::replace(&mut b, next)));
    }
    trace
}

/// `g^0, ..., g^(trace_len - 1)`, the trace domain without its last point.
pub fn trace_domain(config: &StarkConfig) -> Result<Vec<FieldElement>, ProofError> {
    let g = config.trace_generator()?;
    Ok(g.powers().take(config.trace_len).collect())
}

/// The coset `w * <h>` of order `lde_domain_size`, `w` being the multiplicative group generator.
/// It is disjoint from the trace domain, so no constraint denominator vanishes on it.
pub fn evaluation_domain(config: &StarkConfig) -> Result<Vec<FieldElement>, ProofError> {
    let h = config.lde_generator()?;
    let shift = config.field.multiplicative_group_generator();
    Ok(config
        .field
        .cyclic_subgroup_coset(&h, &shift, config.lde_domain_size))
}

/// The unique polynomial of degree below `trace_len` through `(g^i, a_i)`.
pub fn trace_polynomial(
    config: &StarkConfig,
    trace: &[FieldElement],
) -> Result<PolynomialCoeffs, ProofError> {
    let domain = trace_domain(config)?;
    let poly = interpolant(&domain, trace)?;
    debug!("Trace polynomial has degree {:?}", poly.degree());
    Ok(poly)
}
