use std::time::Duration;

use anyhow::Result;
use log::{info, Level};
use stark101::fri::prover::{fri_commit, fri_decommit};
use stark101::hash::merkle_tree::MerkleTree;
use stark101::iop::transcript::Transcript;
use stark101::timed;
use stark101::util::timing::TimingTree;

use crate::config::StarkConfig;
use crate::constraints::{
    boundary_end_constraint, boundary_start_constraint, composition_polynomial,
    transition_constraint,
};
use crate::error::ProofError;
use crate::proof::StarkProof;
use crate::trace::{evaluation_domain, generate_trace, trace_polynomial};

/// Proves that the recurrence of `config`, started from `1, seed`, reaches `final_value` at step
/// `trace_len - 1`.
///
/// The transcript is advanced in protocol order: trace root, the three composition coefficients,
/// composition root, the FRI commit phase, then the queries. The returned proof is a copy of
/// everything recorded in `transcript`.
pub fn prove(
    config: &StarkConfig,
    transcript: &mut Transcript,
    timing: &mut TimingTree,
) -> Result<StarkProof> {
    config
        .check_config()
        .map_err(|e| ProofError::InvalidConfig(e.to_string()))?;
    let field = &config.field;
    info!(
        "Proving {} steps of the recurrence over 2^{} points",
        config.trace_len,
        config.degree_bits()
    );

    let trace = timed!(timing, "generate trace", generate_trace(config));
    let trace_poly = timed!(
        timing,
        "interpolate trace",
        trace_polynomial(config, &trace)?
    );

    let eval_domain = evaluation_domain(config)?;
    let trace_tree = timed!(
        timing,
        "compute trace commitment",
        MerkleTree::new(trace_poly.eval_domain(&eval_domain))
    );
    transcript.send("trace-root", trace_tree.root());

    let g = config.trace_generator().map_err(ProofError::from)?;
    let last_point = g.exp_u64(config.trace_len as u64 - 1);
    let final_value = field.from_canonical_u64(config.final_value);
    let (c1, c2, c3) = timed!(timing, "compute constraint polynomials", {
        let c1 = boundary_start_constraint(&trace_poly)?;
        let c2 = boundary_end_constraint(&trace_poly, &last_point, &final_value)?;
        let c3 = transition_constraint(&trace_poly, &g, config.trace_domain_size)?;
        (c1, c2, c3)
    });

    let composition = composition_polynomial(transcript, &c1, &c2, &c3);
    let composition_tree = timed!(
        timing,
        "compute composition commitment",
        MerkleTree::new(composition.eval_domain(&eval_domain))
    );
    transcript.send("composition-root", composition_tree.root());

    let layers = timed!(
        timing,
        "FRI commit phase",
        fri_commit(
            composition,
            eval_domain,
            composition_tree,
            transcript,
            timing
        )
        .map_err(ProofError::from)?
    );
    timed!(
        timing,
        "FRI query phase",
        fri_decommit(&trace_tree, &layers, transcript, &config.fri_config())
            .map_err(ProofError::from)?
    );

    info!(
        "Proof with {} FRI layers and {} transcript entries",
        layers.len(),
        transcript.len()
    );
    Ok(transcript.entries().to_vec().into())
}

/// Proves the standard claim with a fresh transcript, logging the stage timings that took at least
/// a millisecond.
pub fn prove_default() -> Result<StarkProof> {
    let config = StarkConfig::standard_config();
    let mut transcript = Transcript::new();
    let mut timing = TimingTree::new("prove", Level::Debug);
    let proof = prove(&config, &mut transcript, &mut timing)?;
    timing.filter(Duration::from_millis(1)).print();
    Ok(proof)
}
