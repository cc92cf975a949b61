//! Concrete instantiation of the hash function: SHA-256 over UTF-8 strings, with digests rendered
//! as lowercase hex. Every digest that enters a commitment or the transcript goes through here.

use sha2::{Digest, Sha256};

use crate::field::FieldElement;

/// Length in characters of a hex-rendered digest.
pub const HASH_HEX_LEN: usize = 64;

pub fn hash_str(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Digest of a Merkle leaf: the hash of the decimal rendering of the value.
pub fn hash_leaf(leaf: &FieldElement) -> String {
    hash_str(&leaf.to_string())
}

/// Compresses two child digests into their parent, hashing the concatenated hex strings.
pub fn two_to_one(left: &str, right: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(left.as_bytes());
    hasher.update(right.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::PrimeField;

    #[test]
    fn known_vectors() {
        assert_eq!(
            hash_str(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hash_str("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn two_to_one_is_hash_of_concatenation() {
        let (l, r) = (hash_str("left"), hash_str("right"));
        assert_eq!(two_to_one(&l, &r), hash_str(&format!("{l}{r}")));
        assert_ne!(two_to_one(&l, &r), two_to_one(&r, &l));
        assert_eq!(two_to_one(&l, &r).len(), HASH_HEX_LEN);
    }

    #[test]
    fn leaves_hash_their_decimal_form() {
        let field = PrimeField::stark101();
        assert_eq!(
            hash_leaf(&field.from_canonical_u64(3141592)),
            hash_str("3141592")
        );
    }
}
