use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_std::io::{Read, Write};
use rayon::prelude::*;
use tracing::debug;

use crate::{
    consts::MIN_SRS_SIZE,
    errors::KzgError,
    helpers::{self, compute_powers},
};

/// Represents the Structured Reference String (SRS) used in KZG commitments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SRS<E: Pairing> {
    /// `G1[i] = [τⁱ]G1`, ready to be combined with canonical coefficients.
    pub g1: Vec<E::G1Affine>,
    /// `[G2, [τ]G2]`, all the verifier needs on the G2 side.
    pub g2: [E::G2Affine; 2],
}

impl<E: Pairing> SRS<E> {
    /// Builds an SRS of `size` G1 powers from a known secret.
    ///
    /// Only meant for tests and development: whoever knows `secret` can forge
    /// openings. A production SRS comes out of a multi-party ceremony and is
    /// loaded with [`SRS::from_points`] or [`SRS::read_from`].
    ///
    /// # Errors
    /// `MinSrsSize` when `size < 2`.
    pub fn new(size: usize, secret: &E::ScalarField) -> Result<Self, KzgError> {
        if size < MIN_SRS_SIZE {
            return Err(KzgError::MinSrsSize {
                size,
                min: MIN_SRS_SIZE,
            });
        }
        debug!(size, "generating SRS from secret");

        let g1_gen = E::G1Affine::generator();
        let g2_gen = E::G2Affine::generator();

        let powers = compute_powers(secret, size);
        let g1_projective: Vec<E::G1> = powers.par_iter().map(|p| g1_gen * *p).collect();
        let g1 = E::G1::normalize_batch(&g1_projective);

        Ok(Self {
            g1,
            g2: [g2_gen, (g2_gen * *secret).into_affine()],
        })
    }

    /// Wraps points coming from a ceremony.
    pub fn from_points(g1: Vec<E::G1Affine>, g2: [E::G2Affine; 2]) -> Result<Self, KzgError> {
        if g1.len() < MIN_SRS_SIZE {
            return Err(KzgError::MinSrsSize {
                size: g1.len(),
                min: MIN_SRS_SIZE,
            });
        }
        Ok(Self { g1, g2 })
    }

    /// Number of G1 powers, i.e. the maximum committable polynomial length.
    pub fn len(&self) -> usize {
        self.g1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.g1.is_empty()
    }

    /// `[1]G1`
    pub fn g1_generator(&self) -> Result<E::G1Affine, KzgError> {
        self.g1.first().copied().ok_or(KzgError::MinSrsSize {
            size: 0,
            min: MIN_SRS_SIZE,
        })
    }

    /// Writes the G1 count (u64, big endian), the G1 points then both G2
    /// points, all compressed.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<usize, KzgError> {
        let mut written = helpers::write_u64_be(writer, self.g1.len() as u64)?;
        for p in &self.g1 {
            written += helpers::write_point_compressed(writer, p)?;
        }
        for p in &self.g2 {
            written += helpers::write_point_compressed(writer, p)?;
        }
        Ok(written)
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, KzgError> {
        let len = helpers::read_len_prefix(reader)?;
        let g1 = (0..len)
            .map(|_| helpers::read_point_compressed(reader))
            .collect::<Result<Vec<E::G1Affine>, _>>()?;
        let g2 = [
            helpers::read_point_compressed(reader)?,
            helpers::read_point_compressed(reader)?,
        ];
        Self::from_points(g1, g2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::{Bn254, Fr};

    #[test]
    fn test_srs_minimum_size() {
        let secret = Fr::from(42u64);
        assert_eq!(
            SRS::<Bn254>::new(1, &secret),
            Err(KzgError::MinSrsSize { size: 1, min: 2 })
        );
        assert!(SRS::<Bn254>::new(2, &secret).is_ok());
    }

    #[test]
    fn test_srs_powers() {
        let secret = Fr::from(3u64);
        let srs = SRS::<Bn254>::new(4, &secret).unwrap();
        let g1 = <Bn254 as Pairing>::G1Affine::generator();
        assert_eq!(srs.g1[0], g1);
        assert_eq!(srs.g1[3], (g1 * Fr::from(27u64)).into_affine());
        assert_eq!(srs.g2[1], (srs.g2[0] * secret).into_affine());
    }
}
