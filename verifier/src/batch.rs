use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_std::{rand::Rng, One, UniformRand, Zero};
use kzg_iop_primitives::{
    errors::KzgError,
    helpers::{self, compute_powers},
    srs::SRS,
    transcript::derive_gamma,
    types::{BatchOpeningProof, Digest, OpeningProof},
};
use sha2::digest::{Digest as HashDigest, FixedOutputReset};
use tracing::{debug, instrument, warn};

use crate::verify::verify;

/// Folds a batch opening proof at one point into a single opening proof and
/// the matching folded digest.
///
/// Recomputes γ exactly as the prover did, then returns
/// `(OpeningProof { h, point, Σ γⁱ·yᵢ }, Σ γⁱ·Cᵢ)`. The result can be checked
/// with [`verify`] or combined with proofs at other points in
/// [`batch_verify_multi_points`].
///
/// # Errors
/// `InvalidNbDigests` when `digests` and the claimed values differ in length.
pub fn fold_proof<E, H>(
    digests: &[Digest<E>],
    batch_proof: &BatchOpeningProof<E>,
    hasher: &mut H,
) -> Result<(OpeningProof<E>, Digest<E>), KzgError>
where
    E: Pairing,
    H: HashDigest + FixedOutputReset,
{
    let nb_digests = digests.len();
    if nb_digests != batch_proof.claimed_values.len() {
        return Err(KzgError::InvalidNbDigests {
            digests: nb_digests,
            expected: batch_proof.claimed_values.len(),
        });
    }

    let gamma = derive_gamma::<E, H>(
        &batch_proof.point,
        digests,
        &batch_proof.claimed_values,
        hasher,
    )?;
    let gammas = compute_powers(&gamma, nb_digests);

    let folded_digest = helpers::g1_lincomb::<E>(digests, &gammas)?.into_affine();
    let folded_claim = batch_proof
        .claimed_values
        .iter()
        .zip(gammas.iter())
        .fold(E::ScalarField::zero(), |acc, (y, g)| acc + *y * g);

    Ok((
        OpeningProof {
            h: batch_proof.h,
            point: batch_proof.point,
            claimed_value: folded_claim,
        },
        folded_digest,
    ))
}

/// Verifies a batch opening proof of several digests at one point.
pub fn batch_verify_single_point<E, H>(
    digests: &[Digest<E>],
    batch_proof: &BatchOpeningProof<E>,
    hasher: &mut H,
    srs: &SRS<E>,
) -> Result<(), KzgError>
where
    E: Pairing,
    H: HashDigest + FixedOutputReset,
{
    let (folded_proof, folded_digest) = fold_proof(digests, batch_proof, hasher)?;
    verify(&folded_digest, &folded_proof, srs)
}

/// Verifies opening proofs at different points with a single pairing check,
/// drawing the combination coefficients from the thread-local RNG.
///
/// See [`batch_verify_multi_points_with_rng`].
pub fn batch_verify_multi_points<E: Pairing>(
    digests: &[Digest<E>],
    proofs: &[OpeningProof<E>],
    srs: &SRS<E>,
) -> Result<(), KzgError> {
    batch_verify_multi_points_with_rng(digests, proofs, srs, &mut rand::thread_rng())
}

/// Verifies `(digests[i], proofs[i])` for every `i` at once.
///
/// With random `r₀ = 1, r₁, ...` it checks
/// `e(Σ rᵢ·Cᵢ - [Σ rᵢ·yᵢ]G1 + Σ rᵢ·zᵢ·Hᵢ, G2) == e(Σ rᵢ·Hᵢ, [τ]G2)`,
/// which holds for honest proofs and fails with overwhelming probability if
/// any single proof is invalid. The coefficients must not be predictable by
/// the prover, hence `rng`.
///
/// # Errors
/// * `InvalidNbDigests` - `digests` and `proofs` differ in length, or are empty
/// * `VerificationFailed` - the combined pairing check fails
#[instrument(skip_all, fields(nb_proofs = proofs.len()))]
pub fn batch_verify_multi_points_with_rng<E: Pairing, R: Rng + ?Sized>(
    digests: &[Digest<E>],
    proofs: &[OpeningProof<E>],
    srs: &SRS<E>,
    rng: &mut R,
) -> Result<(), KzgError> {
    let nb_digests = digests.len();
    if nb_digests != proofs.len() || nb_digests == 0 {
        return Err(KzgError::InvalidNbDigests {
            digests: nb_digests,
            expected: proofs.len(),
        });
    }

    if nb_digests == 1 {
        return verify(&digests[0], &proofs[0], srs);
    }

    let random_numbers: Vec<E::ScalarField> = (0..nb_digests)
        .map(|i| {
            if i == 0 {
                E::ScalarField::one()
            } else {
                E::ScalarField::rand(rng)
            }
        })
        .collect();
    debug!("combining opening proofs");

    let quotients: Vec<E::G1Affine> = proofs.iter().map(|p| p.h).collect();
    let folded_quotients = helpers::g1_lincomb::<E>(&quotients, &random_numbers)?;

    let folded_digests = helpers::g1_lincomb::<E>(digests, &random_numbers)?;
    let folded_evals = proofs
        .iter()
        .zip(random_numbers.iter())
        .fold(E::ScalarField::zero(), |acc, (p, r)| acc + p.claimed_value * r);

    let points_times_randoms: Vec<E::ScalarField> = proofs
        .iter()
        .zip(random_numbers.iter())
        .map(|(p, r)| p.point * r)
        .collect();
    let folded_points_quotients = helpers::g1_lincomb::<E>(&quotients, &points_times_randoms)?;

    let g1 = srs.g1_generator()?;
    let folded = folded_digests - g1 * folded_evals + folded_points_quotients;

    if helpers::pairings_verify::<E>(
        folded.into_affine(),
        srs.g2[0],
        folded_quotients.into_affine(),
        srs.g2[1],
    ) {
        Ok(())
    } else {
        warn!("batched opening proofs rejected");
        Err(KzgError::VerificationFailed)
    }
}
