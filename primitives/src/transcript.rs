use ark_ec::pairing::Pairing;
use sha2::digest::{Digest as HashDigest, FixedOutputReset};

use crate::{
    consts::GAMMA_CHALLENGE,
    errors::{KzgError, TranscriptError},
    helpers::hash_to_field_element,
    traits::{FieldBytes, PointBytes},
    types::Digest,
};

#[derive(Clone, Debug)]
struct Challenge {
    id: String,
    bindings: Vec<u8>,
    value: Option<Vec<u8>>,
}

/// Fiat-Shamir transcript over a streaming hash.
///
/// Challenges are declared up front, in order. Each challenge hashes its
/// id, the value of the previous challenge (if any) and the data bound to
/// it, so the whole chain depends on everything bound before it.
pub struct Transcript<'h, H: HashDigest + FixedOutputReset> {
    hasher: &'h mut H,
    challenges: Vec<Challenge>,
}

impl<'h, H: HashDigest + FixedOutputReset> Transcript<'h, H> {
    pub fn new(hasher: &'h mut H, challenge_ids: &[&str]) -> Self {
        Self {
            hasher,
            challenges: challenge_ids
                .iter()
                .map(|id| Challenge {
                    id: id.to_string(),
                    bindings: Vec::new(),
                    value: None,
                })
                .collect(),
        }
    }

    fn position(&self, id: &str) -> Result<usize, TranscriptError> {
        self.challenges
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| TranscriptError::UnknownChallenge(id.to_string()))
    }

    /// Appends `data` to what challenge `id` will hash.
    pub fn bind(&mut self, id: &str, data: &[u8]) -> Result<(), TranscriptError> {
        let pos = self.position(id)?;
        let challenge = &mut self.challenges[pos];
        if challenge.value.is_some() {
            return Err(TranscriptError::ChallengeAlreadyComputed(id.to_string()));
        }
        challenge.bindings.extend_from_slice(data);
        Ok(())
    }

    /// Returns the value of challenge `id`, computing it on first call.
    pub fn compute_challenge(&mut self, id: &str) -> Result<Vec<u8>, TranscriptError> {
        let pos = self.position(id)?;
        if let Some(value) = &self.challenges[pos].value {
            return Ok(value.clone());
        }

        HashDigest::reset(&mut *self.hasher);
        HashDigest::update(&mut *self.hasher, id.as_bytes());
        if pos > 0 {
            let previous = self.challenges[pos - 1]
                .value
                .as_ref()
                .ok_or_else(|| TranscriptError::PreviousChallengeNotComputed(id.to_string()))?;
            HashDigest::update(&mut *self.hasher, previous);
        }
        HashDigest::update(&mut *self.hasher, &self.challenges[pos].bindings);
        let value = HashDigest::finalize_reset(&mut *self.hasher).to_vec();

        self.challenges[pos].value = Some(value.clone());
        Ok(value)
    }
}

/// Derives the folding challenge γ for polynomials opened at `point`.
///
/// Binds the point (big endian), every digest (compressed) then every
/// claimed value (big endian) under the `"gamma"` challenge, and reduces the
/// hash output modulo the field order, so no claim can change once γ is
/// known. Prover and verifier must pass digests and claims in the same order.
pub fn derive_gamma<E, H>(
    point: &E::ScalarField,
    digests: &[Digest<E>],
    claimed_values: &[E::ScalarField],
    hasher: &mut H,
) -> Result<E::ScalarField, KzgError>
where
    E: Pairing,
    H: HashDigest + FixedOutputReset,
{
    let mut transcript = Transcript::new(hasher, &[GAMMA_CHALLENGE]);
    transcript.bind(GAMMA_CHALLENGE, &point.serialize_to_bytes_be())?;
    for digest in digests {
        transcript.bind(GAMMA_CHALLENGE, &digest.serialize_to_bytes_compressed())?;
    }
    for value in claimed_values {
        transcript.bind(GAMMA_CHALLENGE, &value.serialize_to_bytes_be())?;
    }
    let bytes = transcript.compute_challenge(GAMMA_CHALLENGE)?;
    Ok(hash_to_field_element::<E::ScalarField>(&bytes))
}
