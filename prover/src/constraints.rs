//! The recurrence as three rational constraints on the trace polynomial `f`:
//!
//! - `(f(x) - 1) / (x - 1)`, so `f(g^0) = a_0 = 1`;
//! - `(f(x) - final) / (x - g^(n-1))`, so the last step holds the claimed value;
//! - `(f(g^2 x) - f(g x)^2 - f(x)^2) / Z(x)` where `Z` vanishes on the trace domain except its last
//!   three points, so the recurrence holds everywhere else.
//!
//! Each quotient is a polynomial exactly when the corresponding property holds, and the
//! composition polynomial is a random combination of the three.

use log::debug;
use stark101::field::polynomial::PolynomialCoeffs;
use stark101::field::FieldElement;
use stark101::iop::transcript::Transcript;

use crate::error::ProofError;

/// Divides `numerator` by `denominator`, failing unless the remainder is zero.
pub fn divide_exact(
    numerator: &PolynomialCoeffs,
    denominator: &PolynomialCoeffs,
    constraint: &'static str,
) -> Result<PolynomialCoeffs, ProofError> {
    let (quotient, remainder) = numerator.div_rem(denominator)?;
    if let Some(degree) = remainder.degree() {
        return Err(ProofError::DivisionNotExact {
            constraint,
            remainder_degree: degree,
        });
    }
    Ok(quotient)
}

pub fn boundary_start_constraint(
    trace_poly: &PolynomialCoeffs,
) -> Result<PolynomialCoeffs, ProofError> {
    let field = &trace_poly.field;
    let numerator = trace_poly - &PolynomialCoeffs::constant(field.one());
    let denominator = PolynomialCoeffs::linear(field.neg_one(), field.one());
    divide_exact(&numerator, &denominator, "initial boundary")
}

/// `last_point` is `g^(trace_len - 1)`, where the trace is claimed to hold `final_value`.
pub fn boundary_end_constraint(
    trace_poly: &PolynomialCoeffs,
    last_point: &FieldElement,
    final_value: &FieldElement,
) -> Result<PolynomialCoeffs, ProofError> {
    let field = &trace_poly.field;
    let numerator = trace_poly - &PolynomialCoeffs::constant(final_value.clone());
    let denominator = PolynomialCoeffs::linear(-last_point, field.one());
    divide_exact(&numerator, &denominator, "final boundary")
}

/// `g` generates the trace domain, of order `domain_size`.
pub fn transition_constraint(
    trace_poly: &PolynomialCoeffs,
    g: &FieldElement,
    domain_size: usize,
) -> Result<PolynomialCoeffs, ProofError> {
    let field = &trace_poly.field;

    let f_gx = trace_poly.compose(&PolynomialCoeffs::linear(field.zero(), g.clone()));
    let f_g2x = trace_poly.compose(&PolynomialCoeffs::linear(field.zero(), g.square()));
    let numerator = &(&f_g2x - &(&f_gx * &f_gx)) - &(trace_poly * trace_poly);

    // x^n - 1 over the last three points of the domain.
    let mut vanishing = PolynomialCoeffs::zero(field, domain_size + 1);
    vanishing.coeffs[0] = field.neg_one();
    vanishing.coeffs[domain_size] = field.one();
    let first_excluded = domain_size.checked_sub(3).ok_or_else(|| {
        ProofError::InvalidConfig(format!("Trace domain {domain_size} has fewer than 3 points"))
    })?;
    let excluded = (first_excluded..domain_size)
        .map(|i| PolynomialCoeffs::linear(-g.exp_u64(i as u64), field.one()))
        .fold(PolynomialCoeffs::constant(field.one()), |acc, l| &acc * &l);
    let denominator = divide_exact(&vanishing, &excluded, "transition denominator")?;

    divide_exact(&numerator, &denominator, "transition")
}

/// Draws `alpha0`, `alpha1`, `alpha2` in that order and returns
/// `alpha0 * c1 + alpha1 * c2 - alpha2 * c3`.
pub fn composition_polynomial(
    transcript: &mut Transcript,
    c1: &PolynomialCoeffs,
    c2: &PolynomialCoeffs,
    c3: &PolynomialCoeffs,
) -> PolynomialCoeffs {
    let field = &c1.field;
    let alpha0 = transcript.draw_field_element("alpha0", field);
    let alpha1 = transcript.draw_field_element("alpha1", field);
    let alpha2 = transcript.draw_field_element("alpha2", field);

    let composition = &(&(c1 * &alpha0) + &(c2 * &alpha1)) - &(c3 * &alpha2);
    debug!("Composition polynomial has degree {:?}", composition.degree());
    composition
}
