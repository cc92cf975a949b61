use itertools::Itertools;
use log::debug;

use crate::field::polynomial::PolynomialCoeffs;
use crate::field::FieldElement;
use crate::fri::{FriConfig, FriError};
use crate::hash::merkle_tree::MerkleTree;
use crate::iop::transcript::Transcript;
use crate::timed;
use crate::util::log2_ceil;
use crate::util::timing::TimingTree;

/// One round of the commit phase: a polynomial, the domain it is evaluated over, and the Merkle
/// commitment to those evaluations.
#[derive(Clone, Debug)]
pub struct FriLayer {
    pub poly: PolynomialCoeffs,
    pub domain: Vec<FieldElement>,
    pub tree: MerkleTree,
}

impl FriLayer {
    pub fn len(&self) -> usize {
        self.domain.len()
    }

    pub fn evaluations(&self) -> &[FieldElement] {
        &self.tree.leaves
    }

    /// Folds `p(x) = even(x^2) + x * odd(x^2)` into `even(y) + beta * odd(y)`, evaluated over the
    /// squares of the first half of the domain.
    pub fn fold(&self, beta: &FieldElement) -> Self {
        let poly = &self.poly.even_coeffs() + &self.poly.odd_coeffs().scalar_mul(beta);
        let domain = self.domain[..self.domain.len() / 2]
            .iter()
            .map(FieldElement::square)
            .collect_vec();
        let tree = MerkleTree::new(poly.eval_domain(&domain));
        Self { poly, domain, tree }
    }
}

/// Commit phase. Starting from `poly`, committed over `domain` by `tree`, folds until the
/// polynomial is constant, sending each new root and finally the constant itself.
///
/// The returned stack always starts with the input layer.
pub fn fri_commit(
    poly: PolynomialCoeffs,
    domain: Vec<FieldElement>,
    tree: MerkleTree,
    transcript: &mut Transcript,
    timing: &mut TimingTree,
) -> Result<Vec<FriLayer>, FriError> {
    if tree.leaves_len() != domain.len() {
        return Err(FriError::LayerMismatch {
            layer: 0,
            leaves: tree.leaves_len(),
            domain_size: domain.len(),
        });
    }

    let field = poly.field.clone();
    debug!(
        "FRI commit phase on degree {:?} over {} points, expecting {} folds",
        poly.degree(),
        domain.len(),
        log2_ceil(poly.degree_plus_one())
    );
    let mut layers = vec![FriLayer { poly, domain, tree }];
    loop {
        let last = &layers[layers.len() - 1];
        let degree = match last.poly.degree() {
            Some(d) if d > 0 => d,
            _ => break,
        };
        if last.len() < 2 || last.len() % 2 == 1 {
            return Err(FriError::DomainExhausted {
                degree,
                domain_size: last.len(),
            });
        }

        let k = layers.len();
        let beta = transcript.draw_field_element(format!("fri-beta-{k}"), &field);
        let next = timed!(timing, &format!("fold FRI layer {k}"), last.fold(&beta));
        debug!(
            "FRI layer {k}: degree {:?} over {} points",
            next.poly.degree(),
            next.len()
        );
        transcript.send(format!("fri-layer-{k}-root"), next.tree.root());
        layers.push(next);
    }

    let last = &layers[layers.len() - 1];
    let constant = last
        .poly
        .coeffs
        .first()
        .cloned()
        .unwrap_or_else(|| field.zero());
    debug!(
        "FRI commit phase finished after {} folds with constant {constant}",
        layers.len() - 1
    );
    transcript.send("fri-final-constant", constant.to_string());

    Ok(layers)
}

/// Query phase. Draws `config.num_query_rounds` indices and, for each, opens the base layer at the
/// index and its two shifts, then every FRI layer at the reduced index and its sibling.
pub fn fri_decommit(
    base_tree: &MerkleTree,
    layers: &[FriLayer],
    transcript: &mut Transcript,
    config: &FriConfig,
) -> Result<(), FriError> {
    let domain_size = base_tree.leaves_len();
    let upper_bound = config
        .query_upper_bound(domain_size)
        .ok_or(FriError::IndexOutOfRange {
            index: 0,
            offset: 2 * config.blowup,
            domain_size,
        })?;

    for q in 0..config.num_query_rounds {
        let index = transcript.draw_index(format!("query-{q}-index"), 0, upper_bound);
        debug!("FRI query {q} at index {index}");
        decommit_on_query(q, index, base_tree, layers, transcript, config.blowup)?;
    }
    Ok(())
}

fn decommit_on_query(
    q: usize,
    index: usize,
    base_tree: &MerkleTree,
    layers: &[FriLayer],
    transcript: &mut Transcript,
    blowup: usize,
) -> Result<(), FriError> {
    let domain_size = base_tree.leaves_len();
    if index + 2 * blowup >= domain_size {
        return Err(FriError::IndexOutOfRange {
            index,
            offset: 2 * blowup,
            domain_size,
        });
    }

    for (name, offset) in [("x", 0), ("gx", blowup), ("g2x", 2 * blowup)] {
        let i = index + offset;
        transcript.send(format!("query-{q}-trace-{name}"), base_tree.get(i).to_string());
        transcript.send(
            format!("query-{q}-trace-{name}-path"),
            base_tree.prove(i).to_transcript_string(),
        );
    }

    decommit_fri_layers(q, index, layers, transcript);
    Ok(())
}

fn decommit_fri_layers(
    q: usize,
    mut index: usize,
    layers: &[FriLayer],
    transcript: &mut Transcript,
) {
    let Some((last, folded)) = layers.split_last() else {
        return;
    };

    for (k, layer) in folded.iter().enumerate() {
        let len = layer.tree.leaves_len();
        index %= len;
        let sibling = (index + len / 2) % len;

        transcript.send(
            format!("query-{q}-fri-layer-{k}"),
            layer.tree.get(index).to_string(),
        );
        transcript.send(
            format!("query-{q}-fri-layer-{k}-path"),
            layer.tree.prove(index).to_transcript_string_root_first(),
        );
        transcript.send(
            format!("query-{q}-fri-layer-{k}-sibling"),
            layer.tree.get(sibling).to_string(),
        );
        transcript.send(
            format!("query-{q}-fri-layer-{k}-sibling-path"),
            layer.tree.prove(sibling).to_transcript_string_root_first(),
        );
    }

    transcript.send(format!("query-{q}-fri-final"), last.tree.get(0).to_string());
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use num::BigUint;

    use super::*;
    use crate::field::PrimeField;
    use crate::hash::merkle_proofs::{verify_merkle_proof, MerkleProof};
    use crate::util::log2_strict;

    fn coset(field: &PrimeField, n: usize) -> Result<Vec<FieldElement>> {
        let h = field.primitive_root_of_unity(n)?;
        Ok(field.cyclic_subgroup_coset(&h, &field.multiplicative_group_generator(), n))
    }

    fn commit_random(
        n: usize,
        degree_plus_one: usize,
        transcript: &mut Transcript,
    ) -> Result<Vec<FriLayer>> {
        let field = PrimeField::stark101();
        let domain = coset(&field, n)?;
        let poly = PolynomialCoeffs::new(&field, field.rand_vec(degree_plus_one));
        let tree = MerkleTree::new(poly.eval_domain(&domain));
        Ok(fri_commit(
            poly,
            domain,
            tree,
            transcript,
            &mut TimingTree::default(),
        )?)
    }

    #[test]
    fn fold_matches_even_odd_decomposition() -> Result<()> {
        let field = PrimeField::stark101();
        let domain = coset(&field, 16)?;
        let poly = PolynomialCoeffs::new(&field, field.rand_vec(16));
        let layer = FriLayer {
            tree: MerkleTree::new(poly.eval_domain(&domain)),
            poly,
            domain,
        };
        let beta = field.rand();
        let next = layer.fold(&beta);
        assert_eq!(next.len(), 8);
        assert_eq!(next.poly.degree_plus_one(), 8);

        // next(x^2) = (p(x) + p(-x)) / 2 + beta * (p(x) - p(-x)) / (2x), and -x sits half a
        // domain away.
        let two_inv = field.two().inverse();
        for i in 0..8 {
            let (x, px, pnx) = (
                &layer.domain[i],
                &layer.evaluations()[i],
                &layer.evaluations()[i + 8],
            );
            assert_eq!(&layer.domain[i + 8], &-x);
            let expected = (px + pnx) * &two_inv + &beta * &((px - pnx) * &two_inv / x);
            assert_eq!(next.evaluations()[i], expected);
        }
        Ok(())
    }

    #[test]
    fn commit_round_count_is_log_of_domain() -> Result<()> {
        for log_n in 1..7 {
            let n = 1 << log_n;
            let mut transcript = Transcript::new();
            let layers = commit_random(n, n, &mut transcript)?;
            assert_eq!(layers.len() - 1, log2_strict(n));
            assert_eq!(layers[layers.len() - 1].len(), 1);
            // One beta and one root per fold, plus the final constant.
            assert_eq!(transcript.len(), 2 * log_n + 1);
        }
        Ok(())
    }

    #[test]
    fn final_constant_is_fully_folded_constant_term() -> Result<()> {
        let field = PrimeField::stark101();
        let mut transcript = Transcript::new();
        let layers = commit_random(64, 64, &mut transcript)?;

        // Replay the folds with the betas recorded in the transcript.
        let mut poly = layers[0].poly.clone();
        for entry in transcript.entries() {
            if entry.label.starts_with("fri-beta-") {
                let beta = field.from_biguint(entry.value.parse::<BigUint>()?);
                poly = &poly.even_coeffs() + &poly.odd_coeffs().scalar_mul(&beta);
            }
        }
        assert_eq!(poly.degree(), Some(0));

        let last = transcript.entries().last().unwrap();
        assert_eq!(last.label, "fri-final-constant");
        assert_eq!(last.value, poly.coeffs[0].to_string());

        let final_layer = &layers[layers.len() - 1];
        assert!(final_layer.evaluations().iter().all(|v| v == &poly.coeffs[0]));
        Ok(())
    }

    #[test]
    fn low_degree_input_stops_early() -> Result<()> {
        let mut transcript = Transcript::new();
        let layers = commit_random(64, 8, &mut transcript)?;
        assert_eq!(layers.len(), 4);
        assert_eq!(layers[3].len(), 8);
        let roots = transcript
            .entries()
            .iter()
            .filter(|e| e.label.ends_with("-root"))
            .map(|e| e.label.as_str())
            .collect_vec();
        assert_eq!(roots, vec!["fri-layer-1-root", "fri-layer-2-root", "fri-layer-3-root"]);
        Ok(())
    }

    #[test]
    fn commit_rejects_degree_above_domain() -> Result<()> {
        let field = PrimeField::stark101();
        let domain = coset(&field, 4)?;
        let poly = PolynomialCoeffs::new(&field, field.rand_vec(11));
        let tree = MerkleTree::new(poly.eval_domain(&domain));
        let err = fri_commit(
            poly,
            domain,
            tree,
            &mut Transcript::new(),
            &mut TimingTree::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            FriError::DomainExhausted { domain_size: 1, .. }
        ));
        Ok(())
    }

    #[test]
    fn decommit_opens_every_layer() -> Result<()> {
        let field = PrimeField::stark101();
        let mut transcript = Transcript::new();
        let layers = commit_random(64, 8, &mut transcript)?;
        let base = MerkleTree::new(field.rand_vec(64));
        let config = FriConfig {
            num_query_rounds: 2,
            blowup: 4,
        };
        let committed = transcript.len();
        fri_decommit(&base, &layers, &mut transcript, &config)?;

        let queries = &transcript.entries()[committed..];
        // Index, three trace openings with paths, four entries per folded layer, the final value.
        let per_query = 1 + 6 + 4 * (layers.len() - 1) + 1;
        assert_eq!(queries.len(), config.num_query_rounds * per_query);

        for (q, round) in queries.chunks(per_query).enumerate() {
            assert_eq!(round[0].label, format!("query-{q}-index"));
            let index: usize = round[0].value.parse()?;
            assert!(index <= 64 - 1 - 8);

            for (j, offset) in [0, 4, 8].into_iter().enumerate() {
                let leaf = field.from_biguint(round[1 + 2 * j].value.parse::<BigUint>()?);
                let proof = MerkleProof {
                    siblings: round[2 + 2 * j]
                        .value
                        .split(' ')
                        .map(String::from)
                        .collect(),
                };
                verify_merkle_proof(&leaf, index + offset, base.root(), &proof)?;
            }

            let mut i = index;
            for (k, layer) in layers[..layers.len() - 1].iter().enumerate() {
                let e = &round[7 + 4 * k..11 + 4 * k];
                assert_eq!(e[0].label, format!("query-{q}-fri-layer-{k}"));
                i %= layer.len();
                let sibling = (i + layer.len() / 2) % layer.len();
                for (value, path, at) in [(&e[0], &e[1], i), (&e[2], &e[3], sibling)] {
                    let leaf = field.from_biguint(value.value.parse::<BigUint>()?);
                    let proof = MerkleProof {
                        siblings: path.value.rsplit(' ').map(String::from).collect(),
                    };
                    verify_merkle_proof(&leaf, at, layer.tree.root(), &proof)?;
                }
            }
            assert_eq!(round[per_query - 1].label, format!("query-{q}-fri-final"));
        }
        Ok(())
    }

    #[test]
    fn decommit_rejects_tiny_base_domain() -> Result<()> {
        let field = PrimeField::stark101();
        let layers = commit_random(8, 2, &mut Transcript::new())?;
        let base = MerkleTree::new(field.rand_vec(8));
        let config = FriConfig {
            num_query_rounds: 1,
            blowup: 4,
        };
        assert_eq!(
            fri_decommit(&base, &layers, &mut Transcript::new(), &config).unwrap_err(),
            FriError::IndexOutOfRange {
                index: 0,
                offset: 8,
                domain_size: 8
            }
        );
        Ok(())
    }
}
