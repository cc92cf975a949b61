pub(crate) mod division;

use std::cmp::max;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use itertools::{EitherOrBoth, Itertools};

use crate::types::{FieldElement, PrimeField};

/// A polynomial in coefficient form; `coeffs[i]` is the coefficient of `x^i`.
///
/// Trailing zero coefficients are allowed and never stripped implicitly, so [`Self::len`] is not
/// necessarily related to the degree. Equality ignores them.
#[derive(Clone, Debug)]
pub struct PolynomialCoeffs {
    pub field: PrimeField,
    pub coeffs: Vec<FieldElement>,
}

impl PolynomialCoeffs {
    pub fn new(field: &PrimeField, coeffs: Vec<FieldElement>) -> Self {
        debug_assert!(coeffs.iter().all(|c| c.field() == field));
        PolynomialCoeffs {
            field: field.clone(),
            coeffs,
        }
    }

    pub fn empty(field: &PrimeField) -> Self {
        Self::new(field, Vec::new())
    }

    pub fn zero(field: &PrimeField, len: usize) -> Self {
        Self::new(field, vec![field.zero(); len])
    }

    pub fn constant(c: FieldElement) -> Self {
        let field = c.field().clone();
        Self::new(&field, vec![c])
    }

    /// The identity polynomial `x`.
    pub fn x(field: &PrimeField) -> Self {
        Self::new(field, vec![field.zero(), field.one()])
    }

    /// `c0 + c1 * x`.
    pub fn linear(c0: FieldElement, c1: FieldElement) -> Self {
        let field = c0.field().clone();
        Self::new(&field, vec![c0, c1])
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(FieldElement::is_zero)
    }

    /// The number of coefficients. This does not filter out any zero coefficients, so it is not
    /// necessarily related to the degree.
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    /// Degree of the polynomial + 1, or 0 for a polynomial with no non-zero coefficients.
    pub fn degree_plus_one(&self) -> usize {
        (0usize..self.len())
            .rev()
            .find(|&i| self.coeffs[i].is_nonzero())
            .map_or(0, |i| i + 1)
    }

    /// Highest index of a nonzero coefficient, or `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.degree_plus_one().checked_sub(1)
    }

    /// Leading coefficient.
    pub fn lead(&self) -> FieldElement {
        self.coeffs
            .iter()
            .rev()
            .find(|x| x.is_nonzero())
            .cloned()
            .unwrap_or_else(|| self.field.zero())
    }

    pub fn padded(&self, new_len: usize) -> Self {
        let mut poly = self.clone();
        if new_len > poly.len() {
            poly.coeffs.resize(new_len, self.field.zero());
        }
        poly
    }

    /// Removes any leading zero coefficients.
    pub fn trim(&mut self) {
        self.coeffs.truncate(self.degree_plus_one());
    }

    /// Removes any leading zero coefficients.
    pub fn trimmed(&self) -> Self {
        let coeffs = self.coeffs[..self.degree_plus_one()].to_vec();
        Self::new(&self.field, coeffs)
    }

    /// Evaluates `sum c_i * x^i`, accumulating the successive powers of `x`.
    pub fn eval(&self, x: &FieldElement) -> FieldElement {
        let mut value = self.field.zero();
        let mut x_i = self.field.one();
        for c in &self.coeffs {
            value += &(c * &x_i);
            x_i *= x;
        }
        value
    }

    /// Evaluates the polynomial at every point of `domain`, in order.
    pub fn eval_domain(&self, domain: &[FieldElement]) -> Vec<FieldElement> {
        domain.iter().map(|x| self.eval(x)).collect()
    }

    /// Multiplies every coefficient by `k`. Scaling by zero gives the explicit zero polynomial
    /// `[0]` rather than an empty coefficient list.
    pub fn scalar_mul(&self, k: &FieldElement) -> Self {
        if k.is_zero() {
            return Self::zero(&self.field, 1);
        }
        let coeffs = self.coeffs.iter().map(|c| c * k).collect();
        Self::new(&self.field, coeffs)
    }

    /// Square-and-multiply. `p^0 = 1` for every `p`, the zero polynomial included.
    pub fn exp(&self, power: u64) -> Self {
        let mut acc = Self::constant(self.field.one());
        for i in (0..u64::BITS - power.leading_zeros()).rev() {
            acc = &acc * &acc;
            if (power >> i) & 1 == 1 {
                acc = &acc * self;
            }
        }
        acc
    }

    /// Returns `self(q(x))`, summing `c_i * q(x)^i` with the powers of `q` built incrementally.
    pub fn compose(&self, q: &Self) -> Self {
        let mut result = Self::zero(&self.field, 1);
        let mut q_i = Self::constant(self.field.one());
        for (i, c) in self.coeffs.iter().enumerate() {
            if c.is_nonzero() {
                result += &q_i.scalar_mul(c);
            }
            if i + 1 < self.len() {
                q_i = &q_i * q;
            }
        }
        result
    }

    /// The polynomial whose `i`-th coefficient is `coeffs[2i]`.
    pub fn even_coeffs(&self) -> Self {
        Self::new(&self.field, self.coeffs.iter().step_by(2).cloned().collect())
    }

    /// The polynomial whose `i`-th coefficient is `coeffs[2i + 1]`.
    pub fn odd_coeffs(&self) -> Self {
        Self::new(
            &self.field,
            self.coeffs.iter().skip(1).step_by(2).cloned().collect(),
        )
    }
}

impl PartialEq for PolynomialCoeffs {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field
            && self.coeffs.iter().zip_longest(&other.coeffs).all(|pair| match pair {
                EitherOrBoth::Both(a, b) => a == b,
                EitherOrBoth::Left(c) | EitherOrBoth::Right(c) => c.is_zero(),
            })
    }
}

impl Eq for PolynomialCoeffs {}

impl Add for &PolynomialCoeffs {
    type Output = PolynomialCoeffs;

    fn add(self, rhs: Self) -> Self::Output {
        let coeffs = self
            .coeffs
            .iter()
            .zip_longest(&rhs.coeffs)
            .map(|pair| match pair {
                EitherOrBoth::Both(a, b) => a + b,
                EitherOrBoth::Left(c) | EitherOrBoth::Right(c) => c.clone(),
            })
            .collect();
        PolynomialCoeffs::new(&self.field, coeffs)
    }
}

impl Sub for &PolynomialCoeffs {
    type Output = PolynomialCoeffs;

    fn sub(self, rhs: Self) -> Self::Output {
        let len = max(self.len(), rhs.len());
        let mut coeffs = self.padded(len).coeffs;
        for (l, r) in coeffs.iter_mut().zip(&rhs.coeffs) {
            *l -= r;
        }
        PolynomialCoeffs::new(&self.field, coeffs)
    }
}

impl AddAssign<&Self> for PolynomialCoeffs {
    fn add_assign(&mut self, rhs: &Self) {
        let len = max(self.len(), rhs.len());
        self.coeffs.resize(len, self.field.zero());
        for (l, r) in self.coeffs.iter_mut().zip(&rhs.coeffs) {
            *l += r;
        }
    }
}

impl SubAssign<&Self> for PolynomialCoeffs {
    fn sub_assign(&mut self, rhs: &Self) {
        let len = max(self.len(), rhs.len());
        self.coeffs.resize(len, self.field.zero());
        for (l, r) in self.coeffs.iter_mut().zip(&rhs.coeffs) {
            *l -= r;
        }
    }
}

impl Neg for &PolynomialCoeffs {
    type Output = PolynomialCoeffs;

    fn neg(self) -> Self::Output {
        PolynomialCoeffs::new(&self.field, self.coeffs.iter().map(|c| -c).collect())
    }
}

impl Mul<&FieldElement> for &PolynomialCoeffs {
    type Output = PolynomialCoeffs;

    fn mul(self, rhs: &FieldElement) -> Self::Output {
        self.scalar_mul(rhs)
    }
}

impl Mul for &PolynomialCoeffs {
    type Output = PolynomialCoeffs;

    /// Schoolbook convolution. An empty operand gives the (empty) zero polynomial.
    fn mul(self, rhs: Self) -> Self::Output {
        if self.coeffs.is_empty() || rhs.coeffs.is_empty() {
            return PolynomialCoeffs::empty(&self.field);
        }
        let mut coeffs = vec![self.field.zero(); self.len() + rhs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] += &(a * b);
            }
        }
        PolynomialCoeffs::new(&self.field, coeffs)
    }
}

#[cfg(test)]
mod tests {
    use rand::{thread_rng, Rng};

    use super::*;

    fn poly(field: &PrimeField, coeffs: &[u64]) -> PolynomialCoeffs {
        PolynomialCoeffs::new(
            field,
            coeffs.iter().map(|&c| field.from_canonical_u64(c)).collect(),
        )
    }

    #[test]
    fn test_trimmed() {
        let field = PrimeField::stark101();

        assert!(PolynomialCoeffs::empty(&field).trimmed().coeffs.is_empty());
        assert!(poly(&field, &[0]).trimmed().coeffs.is_empty());
        assert_eq!(
            poly(&field, &[1, 2, 0, 0]).trimmed().coeffs,
            poly(&field, &[1, 2]).coeffs
        );
    }

    #[test]
    fn test_degree() {
        let field = PrimeField::stark101();

        assert_eq!(PolynomialCoeffs::empty(&field).degree(), None);
        assert_eq!(poly(&field, &[0, 0, 0]).degree(), None);
        assert_eq!(poly(&field, &[5]).degree(), Some(0));
        assert_eq!(poly(&field, &[0, 1, 0, 3, 0]).degree(), Some(3));
        assert_eq!(poly(&field, &[0, 1, 0, 3, 0]).lead(), field.from_canonical_u64(3));
    }

    #[test]
    fn eq_ignores_trailing_zeros() {
        let field = PrimeField::stark101();
        assert_eq!(poly(&field, &[1, 2]), poly(&field, &[1, 2, 0, 0]));
        assert_eq!(PolynomialCoeffs::empty(&field), poly(&field, &[0]));
        assert_ne!(poly(&field, &[1, 2]), poly(&field, &[1, 2, 3]));
    }

    #[test]
    fn test_add_sub() {
        let field = PrimeField::stark101();
        let a = poly(&field, &[1, 2, 3]);
        let b = poly(&field, &[5, 7]);

        assert_eq!(&a + &b, poly(&field, &[6, 9, 3]));
        assert_eq!(&b + &a, poly(&field, &[6, 9, 3]));
        assert_eq!(&(&a + &b) - &b, a);
        assert_eq!(&b - &a, &-&a + &b);

        let mut c = a.clone();
        c += &b;
        c -= &a;
        assert_eq!(c, b);
    }

    #[test]
    fn test_polynomial_multiplication() {
        let field = PrimeField::stark101();
        let mut rng = thread_rng();
        let (a_deg, b_deg) = (rng.gen_range(1..100), rng.gen_range(1..100));
        let a = PolynomialCoeffs::new(&field, field.rand_vec(a_deg));
        let b = PolynomialCoeffs::new(&field, field.rand_vec(b_deg));
        let m = &a * &b;
        for _ in 0..100 {
            let x = field.rand();
            assert_eq!(m.eval(&x), a.eval(&x) * b.eval(&x));
        }
    }

    #[test]
    fn mul_by_empty_is_zero() {
        let field = PrimeField::stark101();
        let a = poly(&field, &[1, 2, 3]);
        let empty = PolynomialCoeffs::empty(&field);
        assert!((&a * &empty).is_zero());
        assert!((&empty * &a).is_zero());
    }

    #[test]
    fn scalar_mul_by_zero_is_explicit_zero() {
        let field = PrimeField::stark101();
        let a = poly(&field, &[1, 2, 3]);
        assert_eq!(a.scalar_mul(&field.zero()).coeffs, vec![field.zero()]);
        assert_eq!(&a * &field.two(), poly(&field, &[2, 4, 6]));
    }

    #[test]
    fn test_eval() {
        let field = PrimeField::stark101();
        // 1 + 2x + 3x^2 at x = 2
        let a = poly(&field, &[1, 2, 3]);
        assert_eq!(a.eval(&field.two()), field.from_canonical_u64(17));
        assert_eq!(PolynomialCoeffs::empty(&field).eval(&field.two()), field.zero());

        let domain = field.rand_vec(10);
        let evals = a.eval_domain(&domain);
        assert_eq!(evals.len(), 10);
        for (x, y) in domain.iter().zip(&evals) {
            assert_eq!(&a.eval(x), y);
        }
    }

    #[test]
    fn test_exp() {
        let field = PrimeField::stark101();
        let one = poly(&field, &[1]);
        let a = poly(&field, &[1, 1]);

        assert_eq!(a.exp(0), one);
        assert_eq!(PolynomialCoeffs::empty(&field).exp(0), one);
        assert_eq!(poly(&field, &[0]).exp(0), one);
        assert!(PolynomialCoeffs::empty(&field).exp(3).is_zero());
        assert_eq!(a.exp(1), a);
        // (1 + x)^4
        assert_eq!(a.exp(4), poly(&field, &[1, 4, 6, 4, 1]));

        let b = PolynomialCoeffs::new(&field, field.rand_vec(5));
        let x = field.rand();
        assert_eq!(b.exp(13).eval(&x), b.eval(&x).exp_u64(13));
    }

    #[test]
    fn test_compose() {
        let field = PrimeField::stark101();
        let p = PolynomialCoeffs::new(&field, field.rand_vec(12));
        let q = PolynomialCoeffs::new(&field, field.rand_vec(3));
        let composed = p.compose(&q);
        assert_eq!(composed.degree(), Some(22));
        for _ in 0..10 {
            let x = field.rand();
            assert_eq!(composed.eval(&x), p.eval(&q.eval(&x)));
        }

        // p(g * x) scales coefficient i by g^i.
        let g = field.primitive_root_of_unity(1024).unwrap();
        let scaled = p.compose(&PolynomialCoeffs::linear(field.zero(), g.clone()));
        for (i, (c, s)) in p.coeffs.iter().zip(&scaled.coeffs).enumerate() {
            assert_eq!(&(c * &g.exp_u64(i as u64)), s);
        }
    }

    #[test]
    fn even_odd_split() {
        let field = PrimeField::stark101();
        let p = poly(&field, &[1, 2, 3, 4, 5]);
        assert_eq!(p.even_coeffs(), poly(&field, &[1, 3, 5]));
        assert_eq!(p.odd_coeffs(), poly(&field, &[2, 4]));

        // p(x) = even(x^2) + x * odd(x^2)
        let x = field.rand();
        let x2 = x.square();
        assert_eq!(p.eval(&x), p.even_coeffs().eval(&x2) + &x * &p.odd_coeffs().eval(&x2));
    }
}
