/// Fiat-Shamir challenge id used to fold polynomials opened at a single point.
pub const GAMMA_CHALLENGE: &str = "gamma";

/// An SRS must hold at least `[1]G1` and `[τ]G1`.
pub const MIN_SRS_SIZE: usize = 2;

/// Width of every length/size prefix in the binary encodings (u64, big endian).
pub const SIZE_PREFIX_BYTES: usize = 8;

/// Upper bound on vector lengths accepted while decoding, so a corrupted
/// prefix cannot trigger a huge allocation.
pub const MAX_DECODED_LEN: usize = 1 << 28;

/// Below this half-length the FFT butterflies of one stage run sequentially.
pub const PARALLEL_BUTTERFLY_THRESHOLD: usize = 1 << 10;
