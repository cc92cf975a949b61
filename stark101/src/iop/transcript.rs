use std::fmt::{self, Display, Formatter};

use log::trace;
use num::BigUint;
use serde::{Deserialize, Serialize};

use crate::field::{FieldElement, PrimeField};
use crate::hash::hashing::hash_str;

/// One labelled message of the proof, in the order it was absorbed or squeezed.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq, Hash)]
pub struct TranscriptEntry {
    pub label: String,
    pub value: String,
}

impl Display for TranscriptEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.label, self.value)
    }
}

/// Observes prover messages and derives verifier challenges by hashing the transcript, a la
/// Fiat-Shamir.
///
/// The state is a SHA-256 hash chain, kept as a hex string. Absorbing a message hashes it onto the
/// state; squeezing a challenge reduces the state's integer value into the requested range and
/// then rehashes the state. Every message and challenge is recorded, and the record is the proof.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transcript {
    state: String,
    entries: Vec<TranscriptEntry>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            state: "0".to_string(),
            entries: Vec::new(),
        }
    }

    /// Absorbs `value` and records it under `label`.
    pub fn send(&mut self, label: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        self.state = hash_str(&format!("{}{}", self.state, value));
        self.record(label.into(), value);
    }

    /// Squeezes an integer uniformly-ish distributed in `[min, max]`.
    pub fn draw_int(&mut self, label: impl Into<String>, min: &BigUint, max: &BigUint) -> BigUint {
        assert!(min <= max, "Empty challenge range [{min}, {max}]");
        let state = BigUint::parse_bytes(self.state.as_bytes(), 16)
            .expect("Transcript state is always a hex digest");
        let range_size = max - min + 1u32;
        let result = state % range_size + min;

        self.state = hash_str(&self.state);
        self.record(label.into(), result.to_string());
        result
    }

    /// Squeezes an element of `field`, drawn over its whole range `[0, p - 1]`.
    pub fn draw_field_element(
        &mut self,
        label: impl Into<String>,
        field: &PrimeField,
    ) -> FieldElement {
        let max = field.order() - 1u32;
        let value = self.draw_int(label, &BigUint::default(), &max);
        field.from_biguint(value)
    }

    /// Squeezes an index in `[min, max]`.
    pub fn draw_index(&mut self, label: impl Into<String>, min: usize, max: usize) -> usize {
        let value = self.draw_int(label, &BigUint::from(min), &BigUint::from(max));
        // `value <= max`, so it has at most one digit.
        value.iter_u64_digits().next().unwrap_or(0) as usize
    }

    fn record(&mut self, label: String, value: String) {
        trace!("transcript {label}: {value}");
        self.entries.push(TranscriptEntry { label, value });
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<TranscriptEntry> {
        self.entries
    }
}
