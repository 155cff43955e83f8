use crate::{Error, RandSource, Result};
use rand::{TryRngCore, rngs::OsRng};

/// A `RandSource` that reads directly from the operating system's CSPRNG.
///
/// Every call goes to the kernel, which makes this slower than
/// [`ThreadRandom`] but lets a failing entropy source surface as
/// [`Error::CodeGeneration`] instead of a panic. This is the default source
/// for coupon codes.
///
/// [`ThreadRandom`]: crate::ThreadRandom
#[derive(Default, Clone, Copy, Debug)]
pub struct OsRandom;

impl RandSource for OsRandom {
    fn try_next_u32(&self) -> Result<u32> {
        OsRng.try_next_u32().map_err(|err| Error::CodeGeneration {
            reason: err.to_string(),
        })
    }
}
