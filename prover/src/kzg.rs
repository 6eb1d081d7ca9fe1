use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::Field;
use ark_std::Zero;
use kzg_iop_primitives::{
    domain::Domain,
    errors::KzgError,
    helpers::{self, compute_powers},
    polynomial::Polynomial,
    srs::SRS,
    transcript::derive_gamma,
    types::{BatchOpeningProof, Digest, OpeningProof},
};
use rayon::prelude::*;
use sha2::digest::{Digest as HashDigest, FixedOutputReset};
use tracing::{debug, instrument};

/// Commits to a polynomial given by its canonical coefficients, in natural
/// order: `Σ cᵢ·G1[i]`.
///
/// # Errors
/// * `InvalidPolynomialSize` - the polynomial is empty
/// * `SrsCapacityExceeded` - it has more coefficients than the SRS has G1 powers
///
/// # Example
/// ```
/// use ark_bn254::{Bn254, Fr};
/// use kzg_iop_primitives::srs::SRS;
/// use kzg_iop_prover::kzg::commit;
///
/// let srs = SRS::<Bn254>::new(8, &Fr::from(42u64)).unwrap();
/// let coeffs = vec![Fr::from(1u64), Fr::from(2u64), Fr::from(3u64)];
/// let digest = commit(&coeffs, &srs).unwrap();
/// ```
pub fn commit<E: Pairing>(
    coefficients: &[E::ScalarField],
    srs: &SRS<E>,
) -> Result<Digest<E>, KzgError> {
    check_size(coefficients.len(), srs)?;

    let bases = &srs.g1[..coefficients.len()];
    Ok(helpers::g1_lincomb::<E>(bases, coefficients)?.into_affine())
}

fn check_size<E: Pairing>(len: usize, srs: &SRS<E>) -> Result<(), KzgError> {
    if len == 0 {
        return Err(KzgError::InvalidPolynomialSize);
    }
    if len > srs.g1.len() {
        return Err(KzgError::SrsCapacityExceeded {
            polynomial_len: len,
            srs_len: srs.g1.len(),
        });
    }
    Ok(())
}

/// Commits to a [`Polynomial`] in any form. Evaluation forms are brought back
/// to canonical coefficients on a copy, which needs `domain`.
pub fn commit_polynomial<E: Pairing>(
    polynomial: &Polynomial<E::ScalarField>,
    domain: Option<&Domain<E::ScalarField>>,
    srs: &SRS<E>,
) -> Result<Digest<E>, KzgError> {
    let coefficients = polynomial.canonical_coefficients(domain)?;
    commit(&coefficients, srs)
}

/// Divides `f` in place by `(X - a)`, given `fa = f(a)`, and returns the
/// quotient (one coefficient shorter than `f`).
///
/// Uses synthetic division: since `a` is a root of `f(X) - f(a)` the
/// remainder is zero and is dropped.
pub fn divide_by_x_minus_a<F: Field>(mut f: Vec<F>, fa: &F, a: &F) -> Vec<F> {
    if f.is_empty() {
        return f;
    }
    f[0] -= fa;
    for i in (0..f.len() - 1).rev() {
        let carry = f[i + 1] * a;
        f[i] += carry;
    }
    f.remove(0);
    f
}

fn commit_quotient<E: Pairing>(
    quotient: &[E::ScalarField],
    srs: &SRS<E>,
) -> Result<Digest<E>, KzgError> {
    // a constant polynomial has a zero quotient
    if quotient.is_empty() {
        return Ok(E::G1Affine::zero());
    }
    commit(quotient, srs)
}

/// Computes the opening proof of `f` at `point`.
///
/// The proof carries `f(point)` and a commitment to
/// `h(X) = (f(X) - f(point)) / (X - point)`.
///
/// # Errors
/// Same size checks as [`commit`].
#[instrument(skip_all, fields(len = coefficients.len()))]
pub fn open<E: Pairing>(
    coefficients: &[E::ScalarField],
    point: &E::ScalarField,
    srs: &SRS<E>,
) -> Result<OpeningProof<E>, KzgError> {
    check_size(coefficients.len(), srs)?;

    let claimed_value = helpers::horner(coefficients, point);
    let h = divide_by_x_minus_a(coefficients.to_vec(), &claimed_value, point);
    let h = commit_quotient(&h, srs)?;

    Ok(OpeningProof {
        h,
        point: *point,
        claimed_value,
    })
}

/// [`open`] for a [`Polynomial`] in any form, converted on a copy with `domain`.
pub fn open_polynomial<E: Pairing>(
    polynomial: &Polynomial<E::ScalarField>,
    point: &E::ScalarField,
    domain: &Domain<E::ScalarField>,
    srs: &SRS<E>,
) -> Result<OpeningProof<E>, KzgError> {
    let coefficients = polynomial.canonical_coefficients(Some(domain))?;
    open(&coefficients, point, srs)
}

/// Opens several polynomials at the same point with a single quotient.
///
/// γ is derived from `point`, `digests` and the claimed values through
/// `hasher`, the polynomials are folded into `g = Σ γⁱ·fᵢ`, and `g` is
/// opened at `point`.
/// The proof keeps every individual claim `fᵢ(point)`.
///
/// # Errors
/// * `InvalidNbDigests` - `digests` and `polynomials` differ in length, or are empty
/// * `InvalidPolynomialSize` - a polynomial is empty
/// * `SrsCapacityExceeded` - a polynomial is longer than the SRS
#[instrument(skip_all, fields(nb_polynomials = polynomials.len()))]
pub fn batch_open_single_point<E, H, P>(
    polynomials: &[P],
    digests: &[Digest<E>],
    point: &E::ScalarField,
    hasher: &mut H,
    srs: &SRS<E>,
) -> Result<BatchOpeningProof<E>, KzgError>
where
    E: Pairing,
    H: HashDigest + FixedOutputReset,
    P: AsRef<[E::ScalarField]> + Sync,
{
    if polynomials.len() != digests.len() || polynomials.is_empty() {
        return Err(KzgError::InvalidNbDigests {
            digests: digests.len(),
            expected: polynomials.len(),
        });
    }

    let mut largest = 0;
    for p in polynomials {
        let len = p.as_ref().len();
        check_size(len, srs)?;
        largest = largest.max(len);
    }

    let claimed_values: Vec<E::ScalarField> = polynomials
        .par_iter()
        .map(|p| helpers::horner(p.as_ref(), point))
        .collect();

    let gamma = derive_gamma::<E, H>(point, digests, &claimed_values, hasher)?;
    let gammas = compute_powers(&gamma, polynomials.len());
    debug!(largest, "folding polynomials");

    let mut folded = vec![E::ScalarField::zero(); largest];
    folded.par_iter_mut().enumerate().for_each(|(j, c)| {
        for (p, g) in polynomials.iter().zip(gammas.iter()) {
            if let Some(coeff) = p.as_ref().get(j) {
                *c += *coeff * g;
            }
        }
    });
    let folded_claim = claimed_values
        .iter()
        .zip(gammas.iter())
        .fold(E::ScalarField::zero(), |acc, (y, g)| acc + *y * g);

    let h = divide_by_x_minus_a(folded, &folded_claim, point);
    let h = commit_quotient(&h, srs)?;

    Ok(BatchOpeningProof {
        h,
        point: *point,
        claimed_values,
    })
}

/// [`batch_open_single_point`] for [`Polynomial`]s in any form, each one
/// converted to canonical coefficients on a copy with `domain`.
pub fn batch_open_polynomials<E, H>(
    polynomials: &[Polynomial<E::ScalarField>],
    digests: &[Digest<E>],
    point: &E::ScalarField,
    hasher: &mut H,
    domain: &Domain<E::ScalarField>,
    srs: &SRS<E>,
) -> Result<BatchOpeningProof<E>, KzgError>
where
    E: Pairing,
    H: HashDigest + FixedOutputReset,
{
    let coefficients = polynomials
        .par_iter()
        .map(|p| p.canonical_coefficients(Some(domain)))
        .collect::<Result<Vec<_>, _>>()?;
    batch_open_single_point(&coefficients, digests, point, hasher, srs)
}
