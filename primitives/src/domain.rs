use ark_ff::{FftField, PrimeField};
use ark_std::io::{Read, Write};
use rayon::prelude::*;

use crate::{
    consts::PARALLEL_BUTTERFLY_THRESHOLD,
    errors::{KzgError, PolynomialError},
    helpers::{self, bit_reverse_index, compute_powers, log2_ceil},
};

/// Order in which the butterfly network consumes and produces its data.
///
/// `Dif` (decimation in frequency) reads natural order and leaves the result
/// in bit-reversed order. `Dit` (decimation in time) reads bit-reversed order
/// and leaves the result in natural order. Pairing a forward `Dif` with an
/// inverse `Dit` (or the reverse) never needs an explicit [`bit_reverse`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Decimation {
    Dit,
    Dif,
}

/// Options for [`Domain::fft`] and [`Domain::fft_inverse`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FftOptions {
    /// Evaluate on (or interpolate from) the coset `shift·H` instead of `H`.
    pub on_coset: bool,
    /// Upper bound on the number of parallel tasks the recursion fans out to.
    pub nb_tasks: usize,
}

impl Default for FftOptions {
    fn default() -> Self {
        Self {
            on_coset: false,
            nb_tasks: rayon::current_num_threads(),
        }
    }
}

impl FftOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_coset(mut self) -> Self {
        self.on_coset = true;
        self
    }

    pub fn with_nb_tasks(mut self, nb_tasks: usize) -> Self {
        self.nb_tasks = nb_tasks.max(1);
        self
    }

    fn max_splits(&self) -> usize {
        log2_ceil(self.nb_tasks) as usize
    }
}

/// A multiplicative subgroup `H = <ω>` of power-of-two order, together with a
/// coset `shift·H`, and the twiddle tables needed to run radix-2 FFTs over it.
///
/// A domain is immutable once built and can be shared across threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Domain<F: PrimeField> {
    cardinality: usize,
    log_cardinality: u32,
    cardinality_inv: F,
    generator: F,
    generator_inv: F,
    coset_shift: F,
    coset_shift_inv: F,
    // twiddles[s][j] = ω^(j·2^s) for j < cardinality / 2^(s+1)
    twiddles: Vec<Vec<F>>,
    twiddles_inv: Vec<Vec<F>>,
    coset_table: Vec<F>,
    coset_table_inv: Vec<F>,
}

impl<F: PrimeField> Domain<F> {
    /// Builds the domain of size `size` rounded up to the next power of two,
    /// with the field's multiplicative generator as coset shift.
    ///
    /// # Errors
    /// `DomainTooLarge` when the rounded size exceeds `2^TWO_ADICITY`.
    pub fn new(size: usize) -> Result<Self, PolynomialError> {
        Self::with_coset_shift(size, F::GENERATOR)
    }

    /// Same as [`Domain::new`] with an explicit coset shift.
    pub fn with_coset_shift(size: usize, coset_shift: F) -> Result<Self, PolynomialError> {
        let log_cardinality = log2_ceil(size);
        if log_cardinality > F::TWO_ADICITY {
            return Err(PolynomialError::DomainTooLarge {
                requested: size as u64,
                two_adicity: F::TWO_ADICITY,
            });
        }
        let cardinality = 1usize << log_cardinality;

        let generator = F::get_root_of_unity(cardinality as u64).ok_or_else(|| {
            PolynomialError::FFTError(format!("no root of unity of order {}", cardinality))
        })?;
        let generator_inv = generator
            .inverse()
            .ok_or_else(|| PolynomialError::FFTError("generator is not invertible".to_string()))?;
        let cardinality_inv = F::from(cardinality as u64)
            .inverse()
            .ok_or_else(|| PolynomialError::FFTError("cardinality is zero in the field".to_string()))?;
        let coset_shift_inv = coset_shift
            .inverse()
            .ok_or_else(|| PolynomialError::FFTError("coset shift must be non-zero".to_string()))?;

        let twiddles = Self::stage_twiddles(&generator, log_cardinality);
        let twiddles_inv = Self::stage_twiddles(&generator_inv, log_cardinality);

        tracing::trace!(cardinality, "built FFT domain");

        Ok(Self {
            cardinality,
            log_cardinality,
            cardinality_inv,
            generator,
            generator_inv,
            coset_shift,
            coset_shift_inv,
            twiddles,
            twiddles_inv,
            coset_table: compute_powers(&coset_shift, cardinality),
            coset_table_inv: compute_powers(&coset_shift_inv, cardinality),
        })
    }

    fn stage_twiddles(root: &F, log_cardinality: u32) -> Vec<Vec<F>> {
        let mut stages = Vec::with_capacity(log_cardinality as usize);
        let mut w = *root;
        for s in 0..log_cardinality {
            stages.push(compute_powers(&w, 1usize << (log_cardinality - s - 1)));
            w.square_in_place();
        }
        stages
    }

    pub fn cardinality(&self) -> usize {
        self.cardinality
    }

    pub fn log_cardinality(&self) -> u32 {
        self.log_cardinality
    }

    /// Primitive `cardinality`-th root of unity ω.
    pub fn generator(&self) -> F {
        self.generator
    }

    pub fn generator_inv(&self) -> F {
        self.generator_inv
    }

    pub fn cardinality_inv(&self) -> F {
        self.cardinality_inv
    }

    pub fn coset_shift(&self) -> F {
        self.coset_shift
    }

    pub fn coset_shift_inv(&self) -> F {
        self.coset_shift_inv
    }

    /// ωⁱ
    pub fn element(&self, i: usize) -> F {
        self.generator.pow([(i % self.cardinality) as u64])
    }

    /// In-place forward FFT: evaluates the polynomial whose coefficients are
    /// `a` on `H` (or `shift·H` with [`FftOptions::on_coset`]).
    ///
    /// With `Dif` the coefficients are read in natural order and the
    /// evaluations come out bit-reversed; with `Dit` it is the opposite.
    pub fn fft(
        &self,
        a: &mut [F],
        decimation: Decimation,
        options: FftOptions,
    ) -> Result<(), PolynomialError> {
        self.check_len(a)?;

        if options.on_coset {
            let table = &self.coset_table;
            let log_n = self.log_cardinality;
            match decimation {
                Decimation::Dif => a
                    .par_iter_mut()
                    .zip(table.par_iter())
                    .for_each(|(x, g)| *x *= g),
                Decimation::Dit => a
                    .par_iter_mut()
                    .enumerate()
                    .for_each(|(i, x)| *x *= table[bit_reverse_index(i, log_n)]),
            }
        }

        let max_splits = options.max_splits();
        match decimation {
            Decimation::Dif => dif(a, &self.twiddles, 0, max_splits),
            Decimation::Dit => dit(a, &self.twiddles, 0, max_splits),
        }
        Ok(())
    }

    /// In-place inverse FFT: recovers coefficients from evaluations on `H`
    /// (or `shift·H`). Layout conventions match [`Domain::fft`].
    pub fn fft_inverse(
        &self,
        a: &mut [F],
        decimation: Decimation,
        options: FftOptions,
    ) -> Result<(), PolynomialError> {
        self.check_len(a)?;

        let max_splits = options.max_splits();
        match decimation {
            Decimation::Dif => dif(a, &self.twiddles_inv, 0, max_splits),
            Decimation::Dit => dit(a, &self.twiddles_inv, 0, max_splits),
        }

        let n_inv = self.cardinality_inv;
        if !options.on_coset {
            a.par_iter_mut().for_each(|x| *x *= n_inv);
            return Ok(());
        }

        let table = &self.coset_table_inv;
        let log_n = self.log_cardinality;
        match decimation {
            Decimation::Dit => a
                .par_iter_mut()
                .zip(table.par_iter())
                .for_each(|(x, g)| *x *= *g * n_inv),
            Decimation::Dif => a
                .par_iter_mut()
                .enumerate()
                .for_each(|(i, x)| *x *= table[bit_reverse_index(i, log_n)] * n_inv),
        }
        Ok(())
    }

    fn check_len(&self, a: &[F]) -> Result<(), PolynomialError> {
        if a.len() != self.cardinality {
            return Err(PolynomialError::FFTError(format!(
                "input of length {} on a domain of cardinality {}",
                a.len(),
                self.cardinality
            )));
        }
        Ok(())
    }

    /// Writes the cardinality (u64, big endian) then the coset shift.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<usize, KzgError> {
        let mut written = helpers::write_u64_be(writer, self.cardinality as u64)?;
        written += helpers::write_field_be(writer, &self.coset_shift)?;
        Ok(written)
    }

    /// Reads a domain written by [`Domain::write_to`] and rebuilds its tables.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, KzgError> {
        let cardinality = helpers::read_u64_be(reader)?;
        if !cardinality.is_power_of_two() || cardinality > 1u64 << F::TWO_ADICITY {
            return Err(KzgError::SerializationError(format!(
                "invalid domain cardinality {}",
                cardinality
            )));
        }
        let coset_shift: F = helpers::read_field_be(reader)?;
        Ok(Self::with_coset_shift(cardinality as usize, coset_shift)?)
    }
}

/// Permutes `a` into bit-reversed index order; applying it twice is the
/// identity.
///
/// # Panics
/// If `a.len()` is not zero or a power of two.
pub fn bit_reverse<T>(a: &mut [T]) {
    let n = a.len();
    assert!(
        n == 0 || n.is_power_of_two(),
        "bit reversal of a slice of length {}",
        n
    );
    if n <= 2 {
        return;
    }
    let log_n = n.trailing_zeros();
    for i in 0..n {
        let j = bit_reverse_index(i, log_n);
        if i < j {
            a.swap(i, j);
        }
    }
}

// Gentleman-Sande butterflies, natural order in, bit-reversed out.
fn dif<F: FftField>(a: &mut [F], twiddles: &[Vec<F>], stage: usize, max_splits: usize) {
    let n = a.len();
    if n < 2 {
        return;
    }
    let m = n >> 1;
    let tw = &twiddles[stage];
    let parallel = stage < max_splits;
    let (lo, hi) = a.split_at_mut(m);

    if parallel && m >= PARALLEL_BUTTERFLY_THRESHOLD {
        lo.par_iter_mut()
            .zip(hi.par_iter_mut())
            .zip(tw.par_iter())
            .for_each(|((x, y), w)| dif_butterfly(x, y, w));
    } else {
        for ((x, y), w) in lo.iter_mut().zip(hi.iter_mut()).zip(tw.iter()) {
            dif_butterfly(x, y, w);
        }
    }

    if m == 1 {
        return;
    }
    if parallel {
        rayon::join(
            || dif(lo, twiddles, stage + 1, max_splits),
            || dif(hi, twiddles, stage + 1, max_splits),
        );
    } else {
        dif(lo, twiddles, stage + 1, max_splits);
        dif(hi, twiddles, stage + 1, max_splits);
    }
}

#[inline]
fn dif_butterfly<F: FftField>(x: &mut F, y: &mut F, w: &F) {
    let t = *x;
    *x += *y;
    *y = (t - *y) * w;
}

// Cooley-Tukey butterflies, bit-reversed in, natural order out.
fn dit<F: FftField>(a: &mut [F], twiddles: &[Vec<F>], stage: usize, max_splits: usize) {
    let n = a.len();
    if n < 2 {
        return;
    }
    let m = n >> 1;
    let tw = &twiddles[stage];
    let parallel = stage < max_splits;
    let (lo, hi) = a.split_at_mut(m);

    if m > 1 {
        if parallel {
            rayon::join(
                || dit(lo, twiddles, stage + 1, max_splits),
                || dit(hi, twiddles, stage + 1, max_splits),
            );
        } else {
            dit(lo, twiddles, stage + 1, max_splits);
            dit(hi, twiddles, stage + 1, max_splits);
        }
    }

    if parallel && m >= PARALLEL_BUTTERFLY_THRESHOLD {
        lo.par_iter_mut()
            .zip(hi.par_iter_mut())
            .zip(tw.par_iter())
            .for_each(|((x, y), w)| dit_butterfly(x, y, w));
    } else {
        for ((x, y), w) in lo.iter_mut().zip(hi.iter_mut()).zip(tw.iter()) {
            dit_butterfly(x, y, w);
        }
    }
}

#[inline]
fn dit_butterfly<F: FftField>(x: &mut F, y: &mut F, w: &F) {
    let t = *y * w;
    *y = *x - t;
    *x += t;
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use ark_ff::Field;
    use ark_std::{One, UniformRand};

    #[test]
    fn test_generator_has_exact_order() {
        let domain = Domain::<Fr>::new(16).unwrap();
        let w = domain.generator();
        assert_eq!(w.pow([16u64]), Fr::one());
        assert_ne!(w.pow([8u64]), Fr::one());
        assert_eq!(w * domain.generator_inv(), Fr::one());
        assert_eq!(Fr::from(16u64) * domain.cardinality_inv(), Fr::one());
    }

    #[test]
    fn test_size_rounds_up() {
        assert_eq!(Domain::<Fr>::new(5).unwrap().cardinality(), 8);
        assert_eq!(Domain::<Fr>::new(0).unwrap().cardinality(), 1);
        assert_eq!(Domain::<Fr>::new(64).unwrap().cardinality(), 64);
    }

    #[test]
    fn test_twiddle_table_shape() {
        let domain = Domain::<Fr>::new(32).unwrap();
        assert_eq!(domain.twiddles.len(), 5);
        for (s, stage) in domain.twiddles.iter().enumerate() {
            assert_eq!(stage.len(), 16 >> s);
            if stage.len() > 1 {
                assert_eq!(stage[1], domain.generator().pow([1u64 << s]));
            }
        }
    }

    #[test]
    fn test_parallel_split_matches_sequential() {
        let mut rng = ark_std::test_rng();
        let domain = Domain::<Fr>::new(1 << 12).unwrap();
        let coeffs: Vec<Fr> = (0..1 << 12).map(|_| Fr::rand(&mut rng)).collect();

        let mut seq = coeffs.clone();
        domain
            .fft(&mut seq, Decimation::Dif, FftOptions::new().with_nb_tasks(1))
            .unwrap();
        let mut par = coeffs;
        domain
            .fft(&mut par, Decimation::Dif, FftOptions::new().with_nb_tasks(8))
            .unwrap();
        assert_eq!(seq, par);
    }
}
