use std::borrow::Cow;
use std::sync::Arc;

use ark_ff::PrimeField;
use ark_std::io::{Read, Write};
use ark_std::rand::Rng;
use ark_std::UniformRand;

use crate::{
    consts::MAX_DECODED_LEN,
    domain::{bit_reverse, Decimation, Domain, FftOptions},
    errors::{KzgError, PolynomialError},
    helpers::{self, bit_reverse_index, evaluate_barycentric, horner},
};

/// What the stored values mean.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Basis {
    /// Coefficients in the monomial basis.
    Canonical,
    /// Evaluations on the domain `H`.
    Lagrange,
    /// Evaluations on the coset `shift·H`.
    LagrangeCoset,
}

/// Index order of the stored values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layout {
    Regular,
    BitReverse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Form {
    pub basis: Basis,
    pub layout: Layout,
}

impl Form {
    pub const CANONICAL_REGULAR: Form = Form::new(Basis::Canonical, Layout::Regular);
    pub const CANONICAL_BIT_REVERSE: Form = Form::new(Basis::Canonical, Layout::BitReverse);
    pub const LAGRANGE_REGULAR: Form = Form::new(Basis::Lagrange, Layout::Regular);
    pub const LAGRANGE_BIT_REVERSE: Form = Form::new(Basis::Lagrange, Layout::BitReverse);
    pub const LAGRANGE_COSET_REGULAR: Form = Form::new(Basis::LagrangeCoset, Layout::Regular);
    pub const LAGRANGE_COSET_BIT_REVERSE: Form =
        Form::new(Basis::LagrangeCoset, Layout::BitReverse);

    /// Every form, in encoding order.
    pub const ALL: [Form; 6] = [
        Form::CANONICAL_REGULAR,
        Form::CANONICAL_BIT_REVERSE,
        Form::LAGRANGE_REGULAR,
        Form::LAGRANGE_BIT_REVERSE,
        Form::LAGRANGE_COSET_REGULAR,
        Form::LAGRANGE_COSET_BIT_REVERSE,
    ];

    pub const fn new(basis: Basis, layout: Layout) -> Self {
        Self { basis, layout }
    }
}

/// A polynomial stored as a vector of field elements tagged with its [`Form`].
///
/// The storage is reference counted: [`Polynomial::shallow_clone`] shares it,
/// and every in-place conversion copies it first if it is shared, so a
/// conversion never shows through another handle.
///
/// A non-zero `shift` k turns the logical polynomial into `Q(X) = P(ωᵏ·X)`,
/// where `P` is the stored polynomial and ω the primitive `size`-th root of
/// unity. On a domain of cardinality `size` the evaluations of `Q` are those
/// of `P` rotated by k positions, which is what [`Polynomial::get_coeff`]
/// reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial<F: PrimeField> {
    coefficients: Arc<Vec<F>>,
    form: Form,
    shift: usize,
    size: usize,
    blinded_size: usize,
}

impl<F: PrimeField> Polynomial<F> {
    /// Wraps `coefficients`, which must already be in `form`.
    ///
    /// # Panics
    /// If `form` is bit-reversed and the length is not a power of two.
    pub fn new(coefficients: Vec<F>, form: Form) -> Self {
        let size = coefficients.len();
        assert!(
            form.layout == Layout::Regular || size == 0 || size.is_power_of_two(),
            "bit-reversed storage of length {}",
            size
        );
        Self {
            coefficients: Arc::new(coefficients),
            form,
            shift: 0,
            size,
            blinded_size: size,
        }
    }

    /// Canonical, regular: the usual entry point.
    pub fn from_coefficients(coefficients: Vec<F>) -> Self {
        Self::new(coefficients, Form::CANONICAL_REGULAR)
    }

    pub fn coefficients(&self) -> &[F] {
        &self.coefficients
    }

    pub fn into_coefficients(self) -> Vec<F> {
        Arc::try_unwrap(self.coefficients).unwrap_or_else(|shared| (*shared).clone())
    }

    pub fn form(&self) -> Form {
        self.form
    }

    pub fn basis(&self) -> Basis {
        self.form.basis
    }

    pub fn layout(&self) -> Layout {
        self.form.layout
    }

    pub fn shift(&self) -> usize {
        self.shift
    }

    /// Logical size, the one the shift wraps around.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Size once blinded; equal to `size` for a polynomial that never was.
    pub fn blinded_size(&self) -> usize {
        self.blinded_size
    }

    /// Length of the backing storage.
    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// A new handle on the same storage, with its own form and shift.
    pub fn shallow_clone(&self) -> Self {
        self.clone()
    }

    /// A copy that owns its storage.
    pub fn deep_clone(&self) -> Self {
        self.deep_clone_with_capacity(self.len())
    }

    /// A copy that owns its storage, with room for `capacity` elements.
    pub fn deep_clone_with_capacity(&self, capacity: usize) -> Self {
        let mut coefficients = Vec::with_capacity(capacity.max(self.len()));
        coefficients.extend_from_slice(&self.coefficients);
        Self {
            coefficients: Arc::new(coefficients),
            ..*self
        }
    }

    /// `true` when another handle shares this storage.
    pub fn is_shared(&self) -> bool {
        Arc::strong_count(&self.coefficients) > 1
    }

    fn coefficients_mut(&mut self) -> &mut Vec<F> {
        Arc::make_mut(&mut self.coefficients)
    }

    /// Sets the shift, reduced modulo `size`.
    ///
    /// # Errors
    /// `InvalidShift` for a non-zero shift on a polynomial whose size is not
    /// a power of two.
    pub fn set_shift(&mut self, shift: usize) -> Result<&mut Self, PolynomialError> {
        if self.size == 0 {
            self.shift = 0;
            return Ok(self);
        }
        let shift = shift % self.size;
        if shift != 0 && !self.size.is_power_of_two() {
            return Err(PolynomialError::InvalidShift(format!(
                "size {} is not a power of two",
                self.size
            )));
        }
        self.shift = shift;
        Ok(self)
    }

    /// Builder flavour of [`Polynomial::set_shift`].
    pub fn with_shift(mut self, shift: usize) -> Result<Self, PolynomialError> {
        self.set_shift(shift)?;
        Ok(self)
    }

    /// Logical value at index `i` (natural order): the stored entry at
    /// `(i + ρ·shift) mod len`, with `ρ = len / size`, read through the
    /// bit-reversal when the layout is [`Layout::BitReverse`].
    pub fn get_coeff(&self, i: usize) -> F {
        let n = self.len();
        if n == 0 {
            return F::zero();
        }
        let rho = if self.size == 0 { 1 } else { (n / self.size).max(1) };
        let idx = (i + rho * self.shift) % n;
        match self.form.layout {
            Layout::Regular => self.coefficients[idx],
            Layout::BitReverse => self.coefficients[bit_reverse_index(idx, n.trailing_zeros())],
        }
    }

    fn check_bit_reversible(&self) -> Result<(), PolynomialError> {
        let n = self.len();
        if n != 0 && !n.is_power_of_two() {
            return Err(PolynomialError::NotPowerOfTwo(n));
        }
        Ok(())
    }

    /// Puts the storage in natural order.
    ///
    /// # Errors
    /// `NotPowerOfTwo` when the storage is bit-reversed but its length is not
    /// a power of two.
    pub fn to_regular(&mut self) -> Result<&mut Self, PolynomialError> {
        if self.form.layout == Layout::BitReverse {
            self.check_bit_reversible()?;
            bit_reverse(self.coefficients_mut());
            self.form.layout = Layout::Regular;
        }
        Ok(self)
    }

    /// Puts the storage in bit-reversed order.
    ///
    /// # Errors
    /// `NotPowerOfTwo` when the length is not a power of two; the polynomial
    /// is left untouched.
    pub fn to_bit_reverse(&mut self) -> Result<&mut Self, PolynomialError> {
        if self.form.layout == Layout::Regular {
            self.check_bit_reversible()?;
            bit_reverse(self.coefficients_mut());
            self.form.layout = Layout::BitReverse;
        }
        Ok(self)
    }

    /// Pads canonical coefficients with zeros up to the domain cardinality;
    /// rejects storage that cannot be interpreted on `domain`.
    fn fit_to_domain(&mut self, domain: &Domain<F>) -> Result<(), PolynomialError> {
        let n = domain.cardinality();
        let len = self.len();
        if len == n {
            return Ok(());
        }
        if self.form.basis != Basis::Canonical || len > n {
            return Err(PolynomialError::DomainMismatch {
                polynomial_len: len,
                domain_len: n,
            });
        }
        self.to_regular()?;
        self.coefficients_mut().resize(n, F::zero());
        Ok(())
    }

    fn fft(
        &mut self,
        domain: &Domain<F>,
        decimation: Decimation,
        coset: bool,
    ) -> Result<(), PolynomialError> {
        domain.fft(self.coefficients_mut(), decimation, fft_options(coset))
    }

    fn fft_inverse(
        &mut self,
        domain: &Domain<F>,
        decimation: Decimation,
        coset: bool,
    ) -> Result<(), PolynomialError> {
        domain.fft_inverse(self.coefficients_mut(), decimation, fft_options(coset))
    }

    fn set_form(&mut self, basis: Basis, layout: Layout) {
        self.form = Form::new(basis, layout);
    }

    /// Converts to evaluations on `domain`. The resulting layout is whichever
    /// avoids an extra bit-reversal pass.
    pub fn to_lagrange(&mut self, domain: &Domain<F>) -> Result<&mut Self, PolynomialError> {
        use Basis::*;
        use Layout::*;

        if self.form.basis == Lagrange {
            return Ok(self);
        }
        self.fit_to_domain(domain)?;
        match (self.form.basis, self.form.layout) {
            (Canonical, Regular) => {
                self.fft(domain, Decimation::Dif, false)?;
                self.set_form(Lagrange, BitReverse);
            },
            (Canonical, BitReverse) => {
                self.fft(domain, Decimation::Dit, false)?;
                self.set_form(Lagrange, Regular);
            },
            (LagrangeCoset, Regular) => {
                self.fft_inverse(domain, Decimation::Dif, true)?;
                self.fft(domain, Decimation::Dit, false)?;
                self.set_form(Lagrange, Regular);
            },
            (LagrangeCoset, BitReverse) => {
                self.fft_inverse(domain, Decimation::Dit, true)?;
                self.fft(domain, Decimation::Dif, false)?;
                self.set_form(Lagrange, BitReverse);
            },
            (Lagrange, _) => {},
        }
        Ok(self)
    }

    /// Converts to coefficients in the monomial basis.
    pub fn to_canonical(&mut self, domain: &Domain<F>) -> Result<&mut Self, PolynomialError> {
        use Basis::*;
        use Layout::*;

        if self.form.basis == Canonical {
            return Ok(self);
        }
        self.fit_to_domain(domain)?;
        match (self.form.basis, self.form.layout) {
            (Lagrange, Regular) => {
                self.fft_inverse(domain, Decimation::Dif, false)?;
                self.set_form(Canonical, BitReverse);
            },
            (Lagrange, BitReverse) => {
                self.fft_inverse(domain, Decimation::Dit, false)?;
                self.set_form(Canonical, Regular);
            },
            (LagrangeCoset, Regular) => {
                self.fft_inverse(domain, Decimation::Dif, true)?;
                self.set_form(Canonical, BitReverse);
            },
            (LagrangeCoset, BitReverse) => {
                self.fft_inverse(domain, Decimation::Dit, true)?;
                self.set_form(Canonical, Regular);
            },
            (Canonical, _) => {},
        }
        Ok(self)
    }

    /// Converts to evaluations on the coset `shift·H` of `domain`.
    pub fn to_lagrange_coset(
        &mut self,
        domain: &Domain<F>,
    ) -> Result<&mut Self, PolynomialError> {
        use Basis::*;
        use Layout::*;

        if self.form.basis == LagrangeCoset {
            return Ok(self);
        }
        self.fit_to_domain(domain)?;
        match (self.form.basis, self.form.layout) {
            (Canonical, Regular) => {
                self.fft(domain, Decimation::Dif, true)?;
                self.set_form(LagrangeCoset, BitReverse);
            },
            (Canonical, BitReverse) => {
                self.fft(domain, Decimation::Dit, true)?;
                self.set_form(LagrangeCoset, Regular);
            },
            (Lagrange, Regular) => {
                self.fft_inverse(domain, Decimation::Dif, false)?;
                self.fft(domain, Decimation::Dit, true)?;
                self.set_form(LagrangeCoset, Regular);
            },
            (Lagrange, BitReverse) => {
                self.fft_inverse(domain, Decimation::Dit, false)?;
                self.fft(domain, Decimation::Dif, true)?;
                self.set_form(LagrangeCoset, BitReverse);
            },
            (LagrangeCoset, _) => {},
        }
        Ok(self)
    }

    /// Converts to `form` through the basis conversions above, then fixes the
    /// layout.
    pub fn to_form(
        &mut self,
        form: Form,
        domain: &Domain<F>,
    ) -> Result<&mut Self, PolynomialError> {
        match form.basis {
            Basis::Canonical => self.to_canonical(domain)?,
            Basis::Lagrange => self.to_lagrange(domain)?,
            Basis::LagrangeCoset => self.to_lagrange_coset(domain)?,
        };
        match form.layout {
            Layout::Regular => self.to_regular(),
            Layout::BitReverse => self.to_bit_reverse(),
        }
    }

    /// ωᵏ where ω generates the subgroup of order `size` and k is the shift.
    fn shift_factor(&self) -> Result<F, PolynomialError> {
        if self.shift == 0 {
            return Ok(F::one());
        }
        let omega = F::get_root_of_unity(self.size as u64).ok_or_else(|| {
            PolynomialError::InvalidShift(format!("no root of unity of order {}", self.size))
        })?;
        Ok(omega.pow([self.shift as u64]))
    }

    /// Stored values in natural order, borrowed when already regular.
    fn regular_values(&self) -> Cow<'_, [F]> {
        match self.form.layout {
            Layout::Regular => Cow::Borrowed(&self.coefficients[..]),
            Layout::BitReverse => {
                let mut values = self.coefficients.to_vec();
                bit_reverse(&mut values);
                Cow::Owned(values)
            },
        }
    }

    /// Evaluates the logical polynomial at `x`.
    ///
    /// Canonical storage is evaluated with Horner's rule. Evaluation storage
    /// uses the barycentric formula on the subgroup of order `len`, and on its
    /// coset by the field's multiplicative generator for
    /// [`Basis::LagrangeCoset`]; use [`Polynomial::evaluate_on`] when the
    /// polynomial was built with another coset shift.
    pub fn evaluate(&self, x: &F) -> Result<F, PolynomialError> {
        self.evaluate_with_shift(x, F::GENERATOR)
    }

    /// Same as [`Polynomial::evaluate`], taking the coset from `domain`.
    pub fn evaluate_on(&self, x: &F, domain: &Domain<F>) -> Result<F, PolynomialError> {
        self.evaluate_with_shift(x, domain.coset_shift())
    }

    fn evaluate_with_shift(&self, x: &F, coset_shift: F) -> Result<F, PolynomialError> {
        let x = *x * self.shift_factor()?;
        let n = self.len();
        if n == 0 {
            return Ok(F::zero());
        }
        if self.form.layout == Layout::BitReverse {
            self.check_bit_reversible()?;
        }

        if self.form.basis == Basis::Canonical {
            return Ok(match self.form.layout {
                Layout::Regular => horner(&self.coefficients, &x),
                Layout::BitReverse => {
                    let log_n = n.trailing_zeros();
                    (0..n).rev().fold(F::zero(), |acc, i| {
                        acc * x + self.coefficients[bit_reverse_index(i, log_n)]
                    })
                },
            });
        }

        if !n.is_power_of_two() {
            return Err(PolynomialError::DomainMismatch {
                polynomial_len: n,
                domain_len: n.next_power_of_two(),
            });
        }
        let generator = F::get_root_of_unity(n as u64).ok_or_else(|| {
            PolynomialError::FFTError(format!("no root of unity of order {}", n))
        })?;
        let shift = match self.form.basis {
            Basis::LagrangeCoset => coset_shift,
            _ => F::one(),
        };
        evaluate_barycentric(&self.regular_values(), &x, &generator, &shift)
    }

    /// Coefficients of the logical polynomial in canonical basis and natural
    /// order, shift folded in (`cᵢ·ω^(k·i)`).
    ///
    /// Borrows the storage when it is already canonical, regular and
    /// unshifted. Any other form needs `domain` to convert.
    pub fn canonical_coefficients(
        &self,
        domain: Option<&Domain<F>>,
    ) -> Result<Cow<'_, [F]>, PolynomialError> {
        if self.form == Form::CANONICAL_REGULAR && self.shift == 0 {
            return Ok(Cow::Borrowed(&self.coefficients[..]));
        }

        let mut p = self.shallow_clone();
        if p.form.basis != Basis::Canonical {
            let domain = domain.ok_or_else(|| {
                PolynomialError::InvalidForm(
                    "a domain is required to leave the evaluation basis".to_string(),
                )
            })?;
            p.to_canonical(domain)?;
        }
        p.to_regular()?;
        let factor = self.shift_factor()?;
        let mut coefficients = p.into_coefficients();
        if self.shift != 0 {
            let mut acc = F::one();
            for c in coefficients.iter_mut() {
                *c *= acc;
                acc *= factor;
            }
        }
        Ok(Cow::Owned(coefficients))
    }

    /// Adds `Q(X)·(X^size - 1)` to the polynomial, `Q` random of degree
    /// `order`. The values on the domain of order `size` do not change.
    ///
    /// # Errors
    /// `InvalidForm` unless the polynomial is canonical and regular.
    pub fn blind<R: Rng + ?Sized>(
        &mut self,
        order: usize,
        rng: &mut R,
    ) -> Result<&mut Self, PolynomialError> {
        if self.form != Form::CANONICAL_REGULAR {
            return Err(PolynomialError::InvalidForm(
                "blinding needs a canonical, regular polynomial".to_string(),
            ));
        }
        let size = self.size;
        let blinded_size = size + order + 1;
        let coefficients = self.coefficients_mut();
        if coefficients.len() < blinded_size {
            coefficients.resize(blinded_size, F::zero());
        }
        for i in 0..=order {
            let r = F::rand(rng);
            coefficients[i] -= r;
            coefficients[i + size] += r;
        }
        self.blinded_size = blinded_size;
        Ok(self)
    }

    /// Writes `size`, `blinded_size`, `shift` (u64 big endian), basis and
    /// layout (one byte each), then the length-prefixed coefficients.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<usize, KzgError> {
        let mut written = helpers::write_u64_be(writer, self.size as u64)?;
        written += helpers::write_u64_be(writer, self.blinded_size as u64)?;
        written += helpers::write_u64_be(writer, self.shift as u64)?;
        writer
            .write_all(&[basis_to_byte(self.form.basis), layout_to_byte(self.form.layout)])
            .map_err(|e| KzgError::SerializationError(e.to_string()))?;
        written += 2;
        written += helpers::write_u64_be(writer, self.len() as u64)?;
        for c in self.coefficients.iter() {
            written += helpers::write_field_be(writer, c)?;
        }
        Ok(written)
    }

    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, KzgError> {
        let size = helpers::read_len_prefix(reader)?;
        let blinded_size = helpers::read_len_prefix(reader)?;
        let shift = helpers::read_len_prefix(reader)?;
        let mut tags = [0u8; 2];
        helpers::read_exact(reader, &mut tags)?;
        let form = Form::new(basis_from_byte(tags[0])?, layout_from_byte(tags[1])?);

        let len = helpers::read_len_prefix(reader)?;
        let bad_shift = shift != 0 && (shift >= size || !size.is_power_of_two());
        let bad_layout = form.layout == Layout::BitReverse && len != 0 && !len.is_power_of_two();
        if size > len || bad_shift || bad_layout || len > MAX_DECODED_LEN {
            return Err(KzgError::SerializationError(format!(
                "inconsistent polynomial header: size {}, shift {}, length {}, layout {:?}",
                size, shift, len, form.layout
            )));
        }
        let mut coefficients = Vec::with_capacity(len);
        for _ in 0..len {
            coefficients.push(helpers::read_field_be(reader)?);
        }

        Ok(Self {
            coefficients: Arc::new(coefficients),
            form,
            shift,
            size,
            blinded_size,
        })
    }
}

fn fft_options(coset: bool) -> FftOptions {
    if coset {
        FftOptions::new().on_coset()
    } else {
        FftOptions::new()
    }
}

fn basis_to_byte(basis: Basis) -> u8 {
    match basis {
        Basis::Canonical => 0,
        Basis::Lagrange => 1,
        Basis::LagrangeCoset => 2,
    }
}

fn basis_from_byte(byte: u8) -> Result<Basis, KzgError> {
    match byte {
        0 => Ok(Basis::Canonical),
        1 => Ok(Basis::Lagrange),
        2 => Ok(Basis::LagrangeCoset),
        b => Err(KzgError::SerializationError(format!("unknown basis tag {}", b))),
    }
}

fn layout_to_byte(layout: Layout) -> u8 {
    match layout {
        Layout::Regular => 0,
        Layout::BitReverse => 1,
    }
}

fn layout_from_byte(byte: u8) -> Result<Layout, KzgError> {
    match byte {
        0 => Ok(Layout::Regular),
        1 => Ok(Layout::BitReverse),
        b => Err(KzgError::SerializationError(format!("unknown layout tag {}", b))),
    }
}
