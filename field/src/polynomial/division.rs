use crate::error::FieldError;
use crate::polynomial::PolynomialCoeffs;
use crate::types::FieldElement;

impl PolynomialCoeffs {
    /// Polynomial long division.
    /// Returns `(q, r)`, the quotient and remainder of the polynomial division of `self` by `b`.
    /// If `deg(self) < deg(b)` the quotient is zero and the remainder is `self`, unchanged.
    pub fn div_rem(&self, b: &Self) -> Result<(Self, Self), FieldError> {
        let b = b.trimmed();

        let (a_degree_plus_1, b_degree_plus_1) = (self.degree_plus_one(), b.degree_plus_one());
        if b_degree_plus_1 == 0 {
            return Err(FieldError::DivisionByZero);
        }
        if a_degree_plus_1 < b_degree_plus_1 {
            return Ok((Self::zero(&self.field, 1), self.clone()));
        }

        let mut quotient = Self::zero(&self.field, a_degree_plus_1 - b_degree_plus_1 + 1);
        let mut remainder = self.trimmed();
        let divisor_leading_inv = b.lead().try_inverse()?;
        while remainder.degree_plus_one() >= b_degree_plus_1 {
            let cur_q_coeff = &remainder.lead() * &divisor_leading_inv;
            let cur_q_degree = remainder.degree_plus_one() - b_degree_plus_1;

            for (i, div_coeff) in b.coeffs.iter().enumerate() {
                remainder.coeffs[cur_q_degree + i] -= &(&cur_q_coeff * div_coeff);
            }
            quotient.coeffs[cur_q_degree] = cur_q_coeff;
            remainder.trim();
        }
        Ok((quotient, remainder))
    }

    /// Let `self=p(X)`, this returns `(p(X)-p(z))/(X-z)`.
    /// See <https://en.wikipedia.org/wiki/Horner%27s_method>
    pub fn divide_by_linear(&self, z: &FieldElement) -> PolynomialCoeffs {
        let mut bs = self
            .coeffs
            .iter()
            .rev()
            .scan(self.field.zero(), |acc, c| {
                *acc = &*acc * z + c;
                Some(acc.clone())
            })
            .collect::<Vec<_>>();
        bs.pop();
        bs.reverse();
        Self::new(&self.field, bs)
    }
}
