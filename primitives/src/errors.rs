use thiserror::Error;

/// Errors related to Domain and Polynomial operations.
///
/// The `PolynomialError` enum covers everything that can go wrong while
/// building an FFT domain or moving a [`crate::polynomial::Polynomial`]
/// between its forms.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PolynomialError {
    /// Error related to Fast Fourier Transform (FFT) operations with a descriptive message.
    #[error("FFT error: {0}")]
    FFTError(String),

    /// The requested domain does not fit in the 2-adic subgroup of the field.
    #[error("domain of size {requested} exceeds the field 2-adicity {two_adicity}")]
    DomainTooLarge { requested: u64, two_adicity: u32 },

    /// The polynomial storage does not fit the domain it is converted with.
    #[error("polynomial of length {polynomial_len} does not fit domain of cardinality {domain_len}")]
    DomainMismatch {
        polynomial_len: usize,
        domain_len: usize,
    },

    /// Bit-reversed layouts only exist for power-of-two lengths.
    #[error("length {0} is not a power of two")]
    NotPowerOfTwo(usize),

    #[error("invalid shift: {0}")]
    InvalidShift(String),

    /// The operation is not defined for the polynomial's current form.
    #[error("invalid form: {0}")]
    InvalidForm(String),

    /// A generic error with a descriptive message.
    #[error("generic error: {0}")]
    GenericError(String),
}

/// Errors raised by the Fiat-Shamir transcript.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TranscriptError {
    #[error("challenge {0:?} was not declared")]
    UnknownChallenge(String),

    #[error("challenge {0:?} is already computed, it cannot take more bindings")]
    ChallengeAlreadyComputed(String),

    #[error("the challenge preceding {0:?} is not computed yet")]
    PreviousChallengeNotComputed(String),
}

/// Errors related to KZG operations.
///
/// The `KzgError` enum encapsulates all possible errors that can occur during
/// KZG-related operations, including those from `PolynomialError` and
/// `TranscriptError`. Malformed inputs each get their own variant;
/// `VerificationFailed` is the only variant meaning "reject the proof".
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum KzgError {
    /// Wraps errors originating from Polynomial operations.
    #[error("polynomial error: {0}")]
    PolynomialError(#[from] PolynomialError),

    /// Wraps errors originating from the Fiat-Shamir transcript.
    #[error("transcript error: {0}")]
    TranscriptError(#[from] TranscriptError),

    #[error("MSM error: {0}")]
    MsmError(String),

    /// Error related to serialization with a descriptive message.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Error when polynomial degree exceeds SRS capacity
    #[error("polynomial degree {polynomial_len} exceeds SRS capacity {srs_len}")]
    SrsCapacityExceeded {
        polynomial_len: usize,
        srs_len: usize,
    },

    /// An empty polynomial, or one that cannot be committed to.
    #[error("invalid polynomial size")]
    InvalidPolynomialSize,

    /// The number of digests does not match the number of polynomials or claims.
    #[error("invalid number of digests: got {digests}, expected {expected}")]
    InvalidNbDigests { digests: usize, expected: usize },

    #[error("SRS size {size} is below the minimum of {min}")]
    MinSrsSize { size: usize, min: usize },

    /// Error related to commitment processes with a descriptive message.
    #[error("not on curve error: {0}")]
    NotOnCurveError(String),

    /// Error indicating an invalid input length scenario, typically in data processing.
    #[error("invalid input length")]
    InvalidInputLength,

    /// Error indicating invalid field element bytes that exceed the field modulus.
    #[error("invalid field element: {0}")]
    InvalidFieldElement(String),

    /// The pairing check rejected the opening proof.
    #[error("can't verify opening proof")]
    VerificationFailed,

    /// A generic error with a descriptive message.
    #[error("generic error: {0}")]
    GenericError(String),
}
