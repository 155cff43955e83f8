use crate::Result;

/// A trait for random sources that return uniformly distributed 32-bit words.
///
/// This abstraction allows you to plug in the operating system's CSPRNG, a
/// thread-local CSPRNG, or a mocked random source in tests.
///
/// Unlike an infallible `Rng`, the source may report failure: code
/// generation must surface a broken entropy source instead of panicking.
///
/// # Example
/// ```
/// use coupon_pool::{RandSource, Result};
///
/// struct FixedRand;
/// impl RandSource for FixedRand {
///     fn try_next_u32(&self) -> Result<u32> {
///         Ok(1234)
///     }
/// }
///
/// let rng = FixedRand;
/// assert_eq!(rng.try_next_u32(), Ok(1234));
/// assert_eq!(rng.try_below(10), Ok(4));
/// ```
pub trait RandSource {
    /// Returns a random 32-bit word.
    fn try_next_u32(&self) -> Result<u32>;

    /// Returns a value uniformly distributed in `0..bound`.
    ///
    /// Words from the biased tail above the largest multiple of `bound` are
    /// rejected and redrawn.
    ///
    /// # Panics
    /// Panics if `bound` is zero.
    fn try_below(&self, bound: u32) -> Result<u32> {
        assert!(bound > 0, "bound must be non-zero");
        let zone = (u32::MAX / bound) * bound;
        loop {
            let word = self.try_next_u32()?;
            if word < zone {
                return Ok(word % bound);
            }
        }
    }
}

impl<R: RandSource + ?Sized> RandSource for &R {
    fn try_next_u32(&self) -> Result<u32> {
        (**self).try_next_u32()
    }
}
