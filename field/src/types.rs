use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};
use std::sync::Arc;

use num::bigint::{BigUint, RandBigInt};
use num::{One, ToPrimitive, Zero};
use rand::rngs::OsRng;
use rand::Rng;

use crate::error::FieldError;

/// The modulus of the default field, `3 * 2^30 + 1`.
pub const STARK101_MODULUS: u64 = 3 * (1 << 30) + 1;

/// Generator of the full multiplicative group of the default field.
pub const STARK101_GENERATOR: u64 = 5;

struct FieldParams {
    modulus: BigUint,
    generator: BigUint,
}

/// Descriptor of a prime field `Z/pZ`.
///
/// The descriptor is shared between all elements built from it, so cloning a [`FieldElement`]
/// never copies the modulus. Two descriptors describe the same field iff their moduli agree.
#[derive(Clone)]
pub struct PrimeField {
    params: Arc<FieldParams>,
}

impl PrimeField {
    /// A field of prime order `modulus`, where `generator` generates the full multiplicative
    /// group. Primality is the caller's responsibility.
    pub fn new(modulus: BigUint, generator: BigUint) -> Self {
        assert!(modulus > BigUint::one(), "The modulus must be greater than one");
        let generator = generator % &modulus;
        Self {
            params: Arc::new(FieldParams { modulus, generator }),
        }
    }

    /// The field of order `3 * 2^30 + 1` with multiplicative generator `5`.
    pub fn stark101() -> Self {
        Self::new(
            BigUint::from(STARK101_MODULUS),
            BigUint::from(STARK101_GENERATOR),
        )
    }

    pub fn order(&self) -> &BigUint {
        &self.params.modulus
    }

    pub fn zero(&self) -> FieldElement {
        self.from_biguint(BigUint::zero())
    }

    pub fn one(&self) -> FieldElement {
        self.from_biguint(BigUint::one())
    }

    pub fn two(&self) -> FieldElement {
        self.from_canonical_u64(2)
    }

    pub fn neg_one(&self) -> FieldElement {
        -self.one()
    }

    pub fn from_canonical_u64(&self, n: u64) -> FieldElement {
        self.from_biguint(BigUint::from(n))
    }

    pub fn from_canonical_usize(&self, n: usize) -> FieldElement {
        self.from_biguint(BigUint::from(n))
    }

    /// Reduces `n` modulo the field order.
    pub fn from_biguint(&self, n: BigUint) -> FieldElement {
        FieldElement {
            value: n % self.order(),
            field: self.clone(),
        }
    }

    /// Generator of the entire multiplicative group, i.e. all non-zero elements.
    pub fn multiplicative_group_generator(&self) -> FieldElement {
        self.from_biguint(self.params.generator.clone())
    }

    /// Returns an element of multiplicative order exactly `order`, computed as
    /// `g^((p - 1) / order)` for the multiplicative group generator `g`.
    pub fn primitive_root_of_unity(&self, order: usize) -> Result<FieldElement, FieldError> {
        let group_order = self.order() - BigUint::one();
        let subgroup_order = BigUint::from(order);
        if order == 0 || !(&group_order % &subgroup_order).is_zero() {
            return Err(FieldError::SubgroupOrder {
                order,
                modulus: self.order().clone(),
            });
        }

        let root = self
            .multiplicative_group_generator()
            .exp_biguint(&(group_order / subgroup_order));
        // A generator of the full group always yields a primitive root; a bad generator is caught
        // here instead of producing a silently smaller subgroup.
        let is_primitive = root.exp_u64(order as u64).is_one()
            && (order % 2 == 1 || !root.exp_u64(order as u64 / 2).is_one());
        if !is_primitive {
            return Err(FieldError::SubgroupOrder {
                order,
                modulus: self.order().clone(),
            });
        }
        Ok(root)
    }

    /// Computes `[shift * generator^i for i in 0..n]`.
    pub fn cyclic_subgroup_coset(
        &self,
        generator: &FieldElement,
        shift: &FieldElement,
        n: usize,
    ) -> Vec<FieldElement> {
        generator.powers().take(n).map(|x| shift * &x).collect()
    }

    /// Samples a uniformly random element.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> FieldElement {
        self.from_biguint(rng.gen_biguint_below(self.order()))
    }

    /// Samples a single value using the [`OsRng`].
    pub fn rand(&self) -> FieldElement {
        self.sample(&mut OsRng)
    }

    /// Samples a [`Vec`] of values of length `n` using [`OsRng`].
    pub fn rand_vec(&self, n: usize) -> Vec<FieldElement> {
        (0..n).map(|_| self.rand()).collect()
    }
}

impl PartialEq for PrimeField {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.params, &other.params) || self.order() == other.order()
    }
}

impl Eq for PrimeField {}

impl Hash for PrimeField {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.order().hash(state)
    }
}

impl Debug for PrimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrimeField({})", self.order())
    }
}

/// An element of a [`PrimeField`], always kept in canonical form `[0, p)`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FieldElement {
    value: BigUint,
    field: PrimeField,
}

impl FieldElement {
    pub fn value(&self) -> &BigUint {
        &self.value
    }

    pub fn field(&self) -> &PrimeField {
        &self.field
    }

    /// The canonical value, or `None` if it does not fit in 64 bits.
    pub fn to_canonical_u64(&self) -> Option<u64> {
        self.value.to_u64()
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_nonzero(&self) -> bool {
        !self.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.value.is_one()
    }

    pub fn square(&self) -> Self {
        self * self
    }

    /// Compute the multiplicative inverse of this field element.
    pub fn try_inverse(&self) -> Result<Self, FieldError> {
        if self.is_zero() {
            return Err(FieldError::NoInverse {
                value: self.value.clone(),
                modulus: self.field.order().clone(),
            });
        }
        // Fermat: x^(p - 2) = x^-1 for prime p.
        let p = self.field.order();
        let value = self.value.modpow(&(p - BigUint::from(2u32)), p);
        Ok(self.field.from_biguint(value))
    }

    pub fn inverse(&self) -> Self {
        self.try_inverse().expect("Tried to invert zero")
    }

    /// Division that reports a zero divisor instead of panicking.
    pub fn try_div(&self, rhs: &Self) -> Result<Self, FieldError> {
        self.assert_same_field(rhs);
        Ok(self * &rhs.try_inverse()?)
    }

    /// Raises `self` to the integer value of `power`, which must live in the same field.
    pub fn exp(&self, power: &Self) -> Self {
        self.assert_same_field(power);
        self.exp_biguint(&power.value)
    }

    pub fn exp_u64(&self, power: u64) -> Self {
        self.exp_biguint(&BigUint::from(power))
    }

    /// Square-and-multiply over the bits of `power`, most significant first. `x^0 = 1` for every
    /// `x`, including zero.
    pub fn exp_biguint(&self, power: &BigUint) -> Self {
        let mut acc = self.field.one();
        for i in (0..power.bits()).rev() {
            acc = acc.square();
            if power.bit(i) {
                acc *= self;
            }
        }
        acc
    }

    /// The sequence `1, x, x^2, ...`.
    pub fn powers(&self) -> Powers {
        Powers {
            base: self.clone(),
            current: self.field.one(),
        }
    }

    /// Montgomery's trick: inverts the product of all inputs once, then recovers each inverse
    /// with two multiplications. Fails if any input is zero.
    pub fn batch_multiplicative_inverse(xs: &[Self]) -> Result<Vec<Self>, FieldError> {
        let Some(first) = xs.first() else {
            return Ok(Vec::new());
        };

        // prefix[i] = x_0 * ... * x_{i-1}
        let mut prefix = Vec::with_capacity(xs.len());
        let mut acc = first.field.one();
        for x in xs {
            prefix.push(acc.clone());
            acc *= x;
        }

        let mut inv = acc.try_inverse()?;
        let mut result = prefix;
        for (x, slot) in xs.iter().zip(result.iter_mut()).rev() {
            *slot = &*slot * &inv;
            inv *= x;
        }
        Ok(result)
    }

    fn assert_same_field(&self, other: &Self) {
        assert!(
            self.field == other.field,
            "{}",
            FieldError::FieldMismatch {
                left: self.field.order().clone(),
                right: other.field.order().clone(),
            }
        );
    }

    fn add_ref(&self, rhs: &Self) -> Self {
        self.assert_same_field(rhs);
        self.field.from_biguint(&self.value + &rhs.value)
    }

    fn sub_ref(&self, rhs: &Self) -> Self {
        self.assert_same_field(rhs);
        self.field
            .from_biguint(&self.value + self.field.order() - &rhs.value)
    }

    fn mul_ref(&self, rhs: &Self) -> Self {
        self.assert_same_field(rhs);
        self.field.from_biguint(&self.value * &rhs.value)
    }

    fn div_ref(&self, rhs: &Self) -> Self {
        self.assert_same_field(rhs);
        self.mul_ref(&rhs.inverse())
    }
}

impl Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.value, f)
    }
}

impl Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.value, f)
    }
}

/// Iterator over successive powers of a field element, starting at one.
#[derive(Clone, Debug)]
pub struct Powers {
    base: FieldElement,
    current: FieldElement,
}

impl Iterator for Powers {
    type Item = FieldElement;

    fn next(&mut self) -> Option<FieldElement> {
        let next = &self.current * &self.base;
        Some(std::mem::replace(&mut self.current, next))
    }
}

macro_rules! forward_binop {
    ($trait:ident, $method:ident, $inner:ident) => {
        impl $trait<&FieldElement> for &FieldElement {
            type Output = FieldElement;

            fn $method(self, rhs: &FieldElement) -> FieldElement {
                self.$inner(rhs)
            }
        }

        impl $trait<FieldElement> for &FieldElement {
            type Output = FieldElement;

            fn $method(self, rhs: FieldElement) -> FieldElement {
                self.$inner(&rhs)
            }
        }

        impl $trait<&FieldElement> for FieldElement {
            type Output = FieldElement;

            fn $method(self, rhs: &FieldElement) -> FieldElement {
                self.$inner(rhs)
            }
        }

        impl $trait<FieldElement> for FieldElement {
            type Output = FieldElement;

            fn $method(self, rhs: FieldElement) -> FieldElement {
                self.$inner(&rhs)
            }
        }
    };
}

forward_binop!(Add, add, add_ref);
forward_binop!(Sub, sub, sub_ref);
forward_binop!(Mul, mul, mul_ref);
forward_binop!(Div, div, div_ref);

impl AddAssign<&FieldElement> for FieldElement {
    fn add_assign(&mut self, rhs: &FieldElement) {
        *self = self.add_ref(rhs);
    }
}

impl SubAssign<&FieldElement> for FieldElement {
    fn sub_assign(&mut self, rhs: &FieldElement) {
        *self = self.sub_ref(rhs);
    }
}

impl MulAssign<&FieldElement> for FieldElement {
    fn mul_assign(&mut self, rhs: &FieldElement) {
        *self = self.mul_ref(rhs);
    }
}

impl Neg for &FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        self.field.zero() - self
    }
}

impl Neg for FieldElement {
    type Output = FieldElement;

    fn neg(self) -> FieldElement {
        -&self
    }
}
