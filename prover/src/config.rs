//! A [`StarkConfig`] fixes the claim being proven (the recurrence's seed and final value, the
//! length of its trace) together with the domains and the number of FRI queries used to prove it.
//!
//! The default configuration is the classic instance: 1023 steps over a subgroup of order 1024,
//! extended to a coset of order 8192 and queried 3 times.

use anyhow::{ensure, Result};
use stark101::field::{FieldElement, FieldError, PrimeField};
use stark101::fri::FriConfig;
use stark101::util::{log2_strict, try_log2_strict};

pub const STANDARD_TRACE_DOMAIN_SIZE: usize = 1024;
pub const STANDARD_LDE_DOMAIN_SIZE: usize = 8192;
pub const STANDARD_SEED: u64 = 3141592;
/// Value of the standard trace at its last step, `a_1022`.
pub const STANDARD_FINAL_VALUE: u64 = 2338775057;
pub const STANDARD_NUM_QUERY_ROUNDS: usize = 3;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StarkConfig {
    pub field: PrimeField,

    /// Number of recurrence steps kept in the trace, one less than the trace domain.
    pub trace_len: usize,

    /// Order of the subgroup `<g>` the trace is interpolated over.
    pub trace_domain_size: usize,

    /// Order of the coset the trace and composition polynomials are committed over.
    pub lde_domain_size: usize,

    /// `a_1`; the recurrence always starts from `a_0 = 1`.
    pub seed: u64,

    /// Claimed value of `a_{trace_len - 1}`.
    pub final_value: u64,

    /// Number of query rounds to perform.
    pub num_query_rounds: usize,
}

impl Default for StarkConfig {
    fn default() -> Self {
        Self::standard_config()
    }
}

impl StarkConfig {
    /// Returns a custom configuration over `field`. The trace fills its domain but for the last
    /// point.
    pub fn new(
        field: PrimeField,
        trace_domain_size: usize,
        lde_domain_size: usize,
        seed: u64,
        final_value: u64,
        num_query_rounds: usize,
    ) -> Self {
        Self {
            field,
            trace_len: trace_domain_size.saturating_sub(1),
            trace_domain_size,
            lde_domain_size,
            seed,
            final_value,
            num_query_rounds,
        }
    }

    pub fn standard_config() -> Self {
        Self::new(
            PrimeField::stark101(),
            STANDARD_TRACE_DOMAIN_SIZE,
            STANDARD_LDE_DOMAIN_SIZE,
            STANDARD_SEED,
            STANDARD_FINAL_VALUE,
            STANDARD_NUM_QUERY_ROUNDS,
        )
    }

    /// `log2` of the trace domain size, which is also the number of FRI folds.
    pub fn degree_bits(&self) -> usize {
        log2_strict(self.trace_domain_size)
    }

    pub fn blowup(&self) -> usize {
        self.lde_domain_size / self.trace_domain_size
    }

    /// Largest query index; every query also opens the trace commitment at `index + blowup` and
    /// `index + 2 * blowup`. `None` if the evaluation domain is too small to query at all.
    pub fn query_upper_bound(&self) -> Option<usize> {
        self.fri_config().query_upper_bound(self.lde_domain_size)
    }

    pub fn fri_config(&self) -> FriConfig {
        FriConfig {
            num_query_rounds: self.num_query_rounds,
            blowup: self.blowup(),
        }
    }

    /// Generator `g` of the trace domain.
    pub fn trace_generator(&self) -> Result<FieldElement, FieldError> {
        self.field.primitive_root_of_unity(self.trace_domain_size)
    }

    /// Generator `h` of the subgroup whose coset is the evaluation domain. `h^blowup = g`.
    pub fn lde_generator(&self) -> Result<FieldElement, FieldError> {
        self.field.primitive_root_of_unity(self.lde_domain_size)
    }

    /// Checks that the domains exist in the field and are large enough for the constraints and
    /// the queries.
    pub fn check_config(&self) -> Result<()> {
        let StarkConfig {
            trace_len,
            trace_domain_size,
            lde_domain_size,
            num_query_rounds,
            ..
        } = *self;

        ensure!(
            try_log2_strict(trace_domain_size).is_some()
                && try_log2_strict(lde_domain_size).is_some(),
            "Domain sizes must be powers of two, got {trace_domain_size} and {lde_domain_size}"
        );
        ensure!(
            trace_len + 1 == trace_domain_size,
            "Trace length {trace_len} must be one less than its domain {trace_domain_size}"
        );
        // The transition constraint leaves out the last three points of the domain.
        ensure!(trace_len >= 3, "Trace length {trace_len} is too short");
        ensure!(
            lde_domain_size >= 2 * trace_domain_size,
            "Evaluation domain {lde_domain_size} must be at least twice the trace domain {trace_domain_size}"
        );
        ensure!(num_query_rounds >= 1, "At least one query round is required");
        self.lde_generator()?;

        let bound = self.field.order();
        ensure!(
            &num::BigUint::from(self.seed) < bound && &num::BigUint::from(self.final_value) < bound,
            "Seed and final value must be canonical field elements"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use num::BigUint;

    use super::*;

    #[test]
    fn test_valid_config() {
        let config = StarkConfig::standard_config();
        assert!(config.check_config().is_ok());
        assert_eq!(config, StarkConfig::default());
        assert_eq!(config.trace_len, 1023);
        assert_eq!(config.blowup(), 8);
        assert_eq!(config.degree_bits(), 10);
        assert_eq!(config.query_upper_bound(), Some(8191 - 16));

        let small = StarkConfig::new(PrimeField::stark101(), 32, 256, 3141592, 0, 2);
        assert!(small.check_config().is_ok());
        assert_eq!(small.trace_len, 31);
        assert_eq!(small.fri_config(), FriConfig { num_query_rounds: 2, blowup: 8 });
    }

    #[test]
    fn test_invalid_config() {
        let field = PrimeField::stark101();

        let not_power_of_two = StarkConfig::new(field.clone(), 24, 256, 1, 1, 3);
        assert!(not_power_of_two.check_config().is_err());

        let no_blowup = StarkConfig::new(field.clone(), 32, 32, 1, 1, 3);
        assert!(no_blowup.check_config().is_err());

        let no_queries = StarkConfig::new(field.clone(), 32, 256, 1, 1, 0);
        assert!(no_queries.check_config().is_err());

        let too_short = StarkConfig::new(field.clone(), 2, 256, 1, 1, 3);
        assert!(too_short.check_config().is_err());

        let unqueryable = StarkConfig::new(field.clone(), 2, 2, 1, 1, 3);
        assert!(unqueryable.check_config().is_err());
        assert_eq!(unqueryable.query_upper_bound(), None);

        // p - 1 = 3 * 2^30 has no subgroup of order 2^31.
        let too_large = StarkConfig::new(field.clone(), 1 << 20, 1 << 31, 1, 1, 3);
        assert!(too_large.check_config().is_err());

        let mut bad_length = StarkConfig::standard_config();
        bad_length.trace_len = 1000;
        assert!(bad_length.check_config().is_err());

        let small_field = PrimeField::new(BigUint::from(97u32), BigUint::from(5u32));
        let non_canonical_seed = StarkConfig::new(small_field, 4, 32, 100, 1, 1);
        assert!(non_canonical_seed.check_config().is_err());
    }

    #[test]
    fn generators_are_nested() -> Result<()> {
        let config = StarkConfig::standard_config();
        let g = config.trace_generator()?;
        let h = config.lde_generator()?;
        assert_eq!(h.exp_u64(config.blowup() as u64), g);
        assert!(g.exp_u64(1024).is_one());
        assert!(!g.exp_u64(512).is_one());
        Ok(())
    }
}
