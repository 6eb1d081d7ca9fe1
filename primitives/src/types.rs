use ark_ec::pairing::Pairing;
use ark_std::io::{Read, Write};

use crate::{errors::KzgError, helpers};

/// A KZG commitment: `[f(τ)]G1`.
pub type Digest<E> = <E as Pairing>::G1Affine;

pub fn write_digest<E: Pairing, W: Write>(
    writer: &mut W,
    digest: &Digest<E>,
) -> Result<usize, KzgError> {
    helpers::write_point_compressed(writer, digest)
}

pub fn read_digest<E: Pairing, R: Read>(reader: &mut R) -> Result<Digest<E>, KzgError> {
    helpers::read_point_compressed(reader)
}

/// Proof that a committed polynomial takes `claimed_value` at `point`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OpeningProof<E: Pairing> {
    /// Commitment to the quotient `(f(X) - f(point)) / (X - point)`.
    pub h: E::G1Affine,
    pub point: E::ScalarField,
    pub claimed_value: E::ScalarField,
}

impl<E: Pairing> OpeningProof<E> {
    /// Writes `h` (compressed), `point` and `claimed_value` (big endian).
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<usize, KzgError> {
        let mut written = helpers::write_point_compressed(writer, &self.h)?;
        written += helpers::write_field_be(writer, &self.point)?;
        written += helpers::write_field_be(writer, &self.claimed_value)?;
        Ok(written)
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, KzgError> {
        Ok(Self {
            h: helpers::read_point_compressed(reader)?,
            point: helpers::read_field_be(reader)?,
            claimed_value: helpers::read_field_be(reader)?,
        })
    }
}

/// Proof that several committed polynomials take `claimed_values` at the
/// same `point`, with a single quotient commitment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchOpeningProof<E: Pairing> {
    /// Commitment to the quotient of the γ-folded polynomial.
    pub h: E::G1Affine,
    pub point: E::ScalarField,
    /// One claim per polynomial, in the order of the digests.
    pub claimed_values: Vec<E::ScalarField>,
}

impl<E: Pairing> BatchOpeningProof<E> {
    /// Writes `h` (compressed), `point` (big endian), the number of claims
    /// (u64, big endian) then every claim.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<usize, KzgError> {
        let mut written = helpers::write_point_compressed(writer, &self.h)?;
        written += helpers::write_field_be(writer, &self.point)?;
        written += helpers::write_u64_be(writer, self.claimed_values.len() as u64)?;
        for value in &self.claimed_values {
            written += helpers::write_field_be(writer, value)?;
        }
        Ok(written)
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, KzgError> {
        let h = helpers::read_point_compressed(reader)?;
        let point = helpers::read_field_be(reader)?;
        let len = helpers::read_len_prefix(reader)?;
        let claimed_values = (0..len)
            .map(|_| helpers::read_field_be(reader))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            h,
            point,
            claimed_values,
        })
    }
}
