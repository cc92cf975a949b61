use itertools::Itertools;

use crate::error::FieldError;
use crate::polynomial::PolynomialCoeffs;
use crate::types::{FieldElement, PrimeField};

/// Computes the unique degree < n interpolant of n (point, value) pairs by Lagrange's formula.
///
/// Each basis polynomial `L_i(x) = w_i * Z(x) / (x - x_i)` is obtained from the vanishing
/// polynomial `Z` of the whole domain by a single synthetic division, so the cost is quadratic in
/// the number of points rather than cubic.
pub fn interpolant(
    domain: &[FieldElement],
    values: &[FieldElement],
) -> Result<PolynomialCoeffs, FieldError> {
    if domain.len() != values.len() {
        return Err(FieldError::DimensionMismatch {
            points: domain.len(),
            values: values.len(),
        });
    }
    let field = match domain.first() {
        Some(x) => x.field().clone(),
        None => return Err(FieldError::EmptyInput),
    };
    if let Some(stray) = domain.iter().chain(values).find(|x| x.field() != &field) {
        return Err(FieldError::FieldMismatch {
            left: field.order().clone(),
            right: stray.field().order().clone(),
        });
    }

    let weights = barycentric_weights(domain)?;
    let vanishing = vanishing_polynomial(&field, domain);

    let mut result = PolynomialCoeffs::zero(&field, domain.len());
    for ((x_i, y_i), w_i) in domain.iter().zip(values).zip(&weights) {
        let scale = y_i * w_i;
        if scale.is_zero() {
            continue;
        }
        let basis = vanishing.divide_by_linear(x_i);
        for (acc, c) in result.coeffs.iter_mut().zip(&basis.coeffs) {
            *acc += &(&scale * c);
        }
    }
    Ok(result)
}

/// `w_i = 1 / prod_{j != i} (x_i - x_j)`. Fails if two points coincide.
pub fn barycentric_weights(domain: &[FieldElement]) -> Result<Vec<FieldElement>, FieldError> {
    let Some(first) = domain.first() else {
        return Ok(Vec::new());
    };
    let one = first.field().one();
    let denominators = (0..domain.len())
        .map(|i| {
            (0..domain.len())
                .filter(|&j| j != i)
                .fold(one.clone(), |acc, j| acc * (&domain[i] - &domain[j]))
        })
        .collect_vec();
    FieldElement::batch_multiplicative_inverse(&denominators)
}

/// `prod (x - x_j)` over all points of `domain`.
pub fn vanishing_polynomial(field: &PrimeField, domain: &[FieldElement]) -> PolynomialCoeffs {
    domain
        .iter()
        .fold(PolynomialCoeffs::constant(field.one()), |acc, x_j| {
            &acc * &PolynomialCoeffs::linear(-x_j, field.one())
        })
}
