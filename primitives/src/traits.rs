use ark_ec::AffineRepr;
use ark_ff::PrimeField;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};

use crate::errors::KzgError;

/// Fixed-width big-endian encoding of prime field elements.
///
/// arkworks serializes field elements little-endian; this trait reverses the
/// canonical little-endian encoding so every element occupies exactly
/// [`FieldBytes::byte_len`] bytes, most significant byte first.
pub trait FieldBytes: PrimeField {
    /// Number of bytes of one encoded element.
    fn byte_len() -> usize {
        Self::zero().uncompressed_size()
    }

    fn serialize_to_bytes_be(&self) -> Vec<u8>;

    /// Decodes a big-endian element, rejecting values that are not reduced
    /// modulo the field order.
    fn deserialize_from_bytes_be(bytes: &[u8]) -> Result<Self, KzgError>;
}

impl<F: PrimeField> FieldBytes for F {
    fn serialize_to_bytes_be(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::byte_len());
        // writing into a Vec cannot fail
        let _ = self.serialize_uncompressed(&mut bytes);
        bytes.reverse();
        bytes
    }

    fn deserialize_from_bytes_be(bytes: &[u8]) -> Result<Self, KzgError> {
        if bytes.len() != Self::byte_len() {
            return Err(KzgError::InvalidInputLength);
        }
        let mut bytes_le = bytes.to_vec();
        bytes_le.reverse();
        Self::deserialize_uncompressed(&bytes_le[..])
            .map_err(|e| KzgError::InvalidFieldElement(e.to_string()))
    }
}

/// Encoding of curve points in the curve's native compressed format.
pub trait PointBytes: AffineRepr {
    /// Number of bytes of one compressed point.
    fn compressed_len() -> usize {
        Self::generator().compressed_size()
    }

    fn serialize_to_bytes_compressed(&self) -> Vec<u8>;

    /// Decodes a compressed point, checking it is on the curve and in the
    /// prime order subgroup.
    fn read_point_from_bytes_native_compressed(bytes: &[u8]) -> Result<Self, KzgError>;
}

impl<P: AffineRepr> PointBytes for P {
    fn serialize_to_bytes_compressed(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(Self::compressed_len());
        let _ = self.serialize_compressed(&mut bytes);
        bytes
    }

    fn read_point_from_bytes_native_compressed(bytes: &[u8]) -> Result<Self, KzgError> {
        if bytes.len() != Self::compressed_len() {
            return Err(KzgError::InvalidInputLength);
        }
        Self::deserialize_compressed(bytes).map_err(|e| KzgError::NotOnCurveError(e.to_string()))
    }
}
