use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use kzg_iop_primitives::{
    errors::KzgError,
    helpers,
    srs::SRS,
    types::{Digest, OpeningProof},
};
use tracing::warn;

/// This function performs verification of a KZG opening proof. It implements
/// the core KZG verification algorithm using bilinear pairings.
///
/// # Arguments
///
/// * `digest` - The commitment `[f(τ)]G1` to the polynomial
/// * `proof` - The opening proof: quotient commitment `H`, `point` and `claimed_value`
/// * `srs` - The SRS the commitment was computed with; only `G1[0]` and both
///   G2 points are used
///
/// # Returns
///
/// * `Ok(())` - If `digest` opens to `claimed_value` at `point`
/// * `Err(KzgError::VerificationFailed)` - If the pairing check fails
/// * `Err(KzgError)` - Any other error means the inputs were malformed
///
/// # Examples
///
/// ```rust
/// use ark_bn254::{Bn254, Fr};
/// use kzg_iop_primitives::srs::SRS;
/// use kzg_iop_prover::kzg::{commit, open};
/// use kzg_iop_verifier::verify::verify;
///
/// let srs = SRS::<Bn254>::new(8, &Fr::from(42u64)).unwrap();
/// let coeffs = vec![Fr::from(1u64), Fr::from(2u64), Fr::from(3u64)];
/// let digest = commit(&coeffs, &srs).unwrap();
/// let proof = open(&coeffs, &Fr::from(5u64), &srs).unwrap();
///
/// match verify(&digest, &proof, &srs) {
///     Ok(()) => println!("Proof is valid!"),
///     Err(e) => println!("Verification error: {}", e),
/// }
/// ```
pub fn verify<E: Pairing>(
    digest: &Digest<E>,
    proof: &OpeningProof<E>,
    srs: &SRS<E>,
) -> Result<(), KzgError> {
    let g1 = srs.g1_generator()?;
    let [g2, g2_tau] = srs.g2;

    // [C - y]G1, which is H·(τ - z) when the claim holds
    let commit_minus_value = (digest.into_group() - g1 * proof.claimed_value).into_affine();

    // [τ - z]G2
    let x_minus_z = (g2_tau.into_group() - g2 * proof.point).into_affine();

    // e([C - y]G1, G2) == e(H, [τ - z]G2)
    if helpers::pairings_verify::<E>(commit_minus_value, g2, proof.h, x_minus_z) {
        Ok(())
    } else {
        warn!("opening proof rejected");
        Err(KzgError::VerificationFailed)
    }
}
