use crate::{ALPHABET, ALPHABET_LEN, OsRandom, RandSource, Result, SystemClock, TimeSource};
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Longest code the generator produces. Longer (or zero) requests are clamped
/// to this length.
pub const MAX_CODE_LENGTH: usize = 10;

/// Codes at least this long start with the 3-digit time prefix.
pub const TIME_PREFIX_MIN_LENGTH: usize = 6;

const TIME_PREFIX_LEN: usize = 3;

/// Generates random, human-presentable coupon codes.
///
/// A code is made of an optional 3-digit prefix derived from the current
/// time, followed by symbols drawn uniformly from [`ALPHABET`] using the
/// configured [`RandSource`]. The prefix spreads codes generated at different
/// instants apart, which reduces clustering when many campaigns are created
/// in sequence.
///
/// The generator does **not** guarantee uniqueness; callers that need
/// distinct codes must deduplicate.
///
/// # Example
/// ```
/// use coupon_pool::{CodeGenerator, MAX_CODE_LENGTH};
///
/// let generator = CodeGenerator::default();
/// let code = generator.generate(MAX_CODE_LENGTH)?;
///
/// assert_eq!(code.chars().count(), MAX_CODE_LENGTH);
/// assert!(code.chars().take(3).all(|c| c.is_ascii_digit()));
/// # Ok::<(), coupon_pool::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct CodeGenerator<R = OsRandom, T = SystemClock>
where
    R: RandSource,
    T: TimeSource,
{
    rand: R,
    time: T,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new(OsRandom, SystemClock)
    }
}

impl<R, T> CodeGenerator<R, T>
where
    R: RandSource,
    T: TimeSource,
{
    /// Creates a generator drawing symbols from `rand` and the prefix from
    /// `time`.
    pub fn new(rand: R, time: T) -> Self {
        Self { rand, time }
    }

    /// Generates a code of `length` symbols.
    ///
    /// A `length` of zero or above [`MAX_CODE_LENGTH`] is clamped to
    /// [`MAX_CODE_LENGTH`]. Codes of at least [`TIME_PREFIX_MIN_LENGTH`]
    /// symbols start with the current time's nanoseconds modulo 1000,
    /// zero-padded to three digits.
    ///
    /// # Errors
    /// Returns [`Error::CodeGeneration`] if the random source fails.
    ///
    /// [`Error::CodeGeneration`]: crate::Error::CodeGeneration
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&self, length: usize) -> Result<String> {
        let length = clamp_length(length);
        // Hangul syllables are three bytes in UTF-8.
        let mut code = String::with_capacity(length * 3);

        let mut written = 0;
        if length >= TIME_PREFIX_MIN_LENGTH {
            let nanos = self.time.now().timestamp_subsec_nanos() % 1000;
            code.push_str(&format!("{nanos:03}"));
            written = TIME_PREFIX_LEN;
        }

        for _ in written..length {
            let index = self.rand.try_below(ALPHABET_LEN as u32)?;
            code.push(ALPHABET[index as usize]);
        }

        Ok(code)
    }
}

/// Normalizes a requested code length into `1..=MAX_CODE_LENGTH`.
pub fn clamp_length(length: usize) -> usize {
    if length == 0 || length > MAX_CODE_LENGTH {
        MAX_CODE_LENGTH
    } else {
        length
    }
}
