use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup, VariableBaseMSM};
use ark_ff::{batch_inversion, Field, PrimeField};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::io::{Read, Write};
use ark_std::Zero;

use crate::{
    consts::{MAX_DECODED_LEN, SIZE_PREFIX_BYTES},
    errors::{KzgError, PolynomialError},
    traits::FieldBytes,
};

/// Computes powers of a field element: 1, x, x², ..., x^(count-1).
///
/// # Arguments
/// * `base` - The field element to compute powers of
/// * `count` - Number of powers to compute (including x⁰)
pub fn compute_powers<F: Field>(base: &F, count: usize) -> Vec<F> {
    let mut powers = Vec::with_capacity(count);
    let mut current = F::one();
    for _ in 0..count {
        powers.push(current);
        current *= base;
    }
    powers
}

/// Evaluates `Σ coefficients[i]·xⁱ` with Horner's rule.
pub fn horner<F: Field>(coefficients: &[F], x: &F) -> F {
    coefficients
        .iter()
        .rev()
        .fold(F::zero(), |acc, c| acc * x + c)
}

/// Computes a linear combination of G1 points weighted by scalar coefficients.
///
/// Given points P₁, P₂, ..., Pₙ and scalars s₁, s₂, ..., sₙ
/// Computes: s₁P₁ + s₂P₂ + ... + sₙPₙ
/// Uses Multi-Scalar Multiplication (MSM) for efficient computation.
///
/// # Arguments
/// * `points` - Array of G1 points in affine form
/// * `scalars` - Array of scalar field elements, one per point
///
/// # Returns
/// * `Result<E::G1, KzgError>` - The combination in projective form, or a
///   `MsmError` when the two slices have different lengths.
pub fn g1_lincomb<E: Pairing>(
    points: &[E::G1Affine],
    scalars: &[E::ScalarField],
) -> Result<E::G1, KzgError> {
    E::G1::msm(points, scalars).map_err(|len| {
        KzgError::MsmError(format!(
            "{} points against {} scalars (mismatch at {})",
            points.len(),
            scalars.len(),
            len
        ))
    })
}

/// Checks `e(a1, a2) == e(b1, b2)` with a single multi-pairing.
pub fn pairings_verify<E: Pairing>(
    a1: E::G1Affine,
    a2: E::G2Affine,
    b1: E::G1Affine,
    b2: E::G2Affine,
) -> bool {
    let neg_b1 = (-b1.into_group()).into_affine();
    let p = [a1, neg_b1];
    let q = [a2, b2];
    E::multi_pairing(p, q).is_zero()
}

/// Interprets a digest as a big-endian integer and reduces it modulo the field order.
pub fn hash_to_field_element<F: PrimeField>(digest: &[u8]) -> F {
    F::from_be_bytes_mod_order(digest)
}

/// Position of index `i` once the lowest `log_n` bits are reversed.
pub fn bit_reverse_index(i: usize, log_n: u32) -> usize {
    if log_n == 0 {
        return 0;
    }
    i.reverse_bits() >> (usize::BITS - log_n)
}

/// Evaluates, at `z`, the polynomial whose values on the coset
/// `{shift·ωⁱ}` are `evaluations` (natural order), with the barycentric formula:
///
/// `P(z) = (zⁿ - shiftⁿ) / (n·shiftⁿ) · Σ yᵢ·hᵢ / (z - hᵢ)`, where `hᵢ = shift·ωⁱ`.
///
/// Returns the stored value directly when `z` lies on the coset.
/// Ref: https://github.com/ethereum/consensus-specs/blob/master/specs/deneb/polynomial-commitments.md#evaluate_polynomial_in_evaluation_form
pub fn evaluate_barycentric<F: PrimeField>(
    evaluations: &[F],
    z: &F,
    generator: &F,
    shift: &F,
) -> Result<F, PolynomialError> {
    let width = evaluations.len();
    if width == 0 {
        return Ok(F::zero());
    }

    let mut points = Vec::with_capacity(width);
    let mut h = *shift;
    for y in evaluations {
        if h == *z {
            return Ok(*y);
        }
        points.push(h);
        h *= generator;
    }

    let mut denominators: Vec<F> = points.iter().map(|h| *z - h).collect();
    batch_inversion(&mut denominators);

    let sum = evaluations
        .iter()
        .zip(points.iter())
        .zip(denominators.iter())
        .fold(F::zero(), |acc, ((y, h), d)| acc + *y * h * d);

    let shift_n = shift.pow([width as u64]);
    let scale = (F::from(width as u64) * shift_n)
        .inverse()
        .ok_or_else(|| PolynomialError::GenericError("degenerate coset".to_string()))?;

    Ok((z.pow([width as u64]) - shift_n) * scale * sum)
}

/// Returns `true` if `n` is a non-zero power of two.
pub fn is_power_of_two(n: usize) -> bool {
    n != 0 && n.is_power_of_two()
}

/// Smallest `k` such that `2^k >= n`.
pub fn log2_ceil(n: usize) -> u32 {
    n.max(1).next_power_of_two().trailing_zeros()
}

pub fn write_u64_be<W: Write>(writer: &mut W, value: u64) -> Result<usize, KzgError> {
    writer
        .write_all(&value.to_be_bytes())
        .map_err(|e| KzgError::SerializationError(e.to_string()))?;
    Ok(SIZE_PREFIX_BYTES)
}

pub fn read_u64_be<R: Read>(reader: &mut R) -> Result<u64, KzgError> {
    let mut buf = [0u8; SIZE_PREFIX_BYTES];
    read_exact(reader, &mut buf)?;
    Ok(u64::from_be_bytes(buf))
}

/// Reads a length prefix and checks it against [`MAX_DECODED_LEN`].
pub fn read_len_prefix<R: Read>(reader: &mut R) -> Result<usize, KzgError> {
    let len = read_u64_be(reader)?;
    if len > MAX_DECODED_LEN as u64 {
        return Err(KzgError::SerializationError(format!(
            "decoded length {} exceeds the maximum of {}",
            len, MAX_DECODED_LEN
        )));
    }
    Ok(len as usize)
}

pub fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<(), KzgError> {
    reader
        .read_exact(buf)
        .map_err(|e| KzgError::SerializationError(format!("short buffer: {}", e)))
}

pub fn write_field_be<F: PrimeField, W: Write>(
    writer: &mut W,
    element: &F,
) -> Result<usize, KzgError> {
    let bytes = element.serialize_to_bytes_be();
    writer
        .write_all(&bytes)
        .map_err(|e| KzgError::SerializationError(e.to_string()))?;
    Ok(bytes.len())
}

pub fn read_field_be<F: PrimeField, R: Read>(reader: &mut R) -> Result<F, KzgError> {
    let mut buf = vec![0u8; F::byte_len()];
    read_exact(reader, &mut buf)?;
    F::deserialize_from_bytes_be(&buf)
}

/// Writes a point in its native compressed encoding.
pub fn write_point_compressed<P: AffineRepr, W: Write>(
    writer: &mut W,
    point: &P,
) -> Result<usize, KzgError> {
    point
        .serialize_compressed(&mut *writer)
        .map_err(|e| KzgError::SerializationError(e.to_string()))?;
    Ok(point.compressed_size())
}

/// Reads a compressed point, validating curve and subgroup membership.
pub fn read_point_compressed<P: AffineRepr, R: Read>(reader: &mut R) -> Result<P, KzgError> {
    P::deserialize_compressed(&mut *reader).map_err(|e| match e {
        ark_serialize::SerializationError::IoError(io) => {
            KzgError::SerializationError(format!("short buffer: {}", io))
        },
        other => KzgError::NotOnCurveError(other.to_string()),
    })
}
