use ::rand::{Rng, RngCore, SeedableRng, rngs::StdRng};

use crate::{
    generator::Mutex,
    rand::{RandBytes, RandSource},
};

/// A deterministic random source seeded from a `u64`.
///
/// Two sources built from the same seed yield the same stream, which makes
/// generator output reproducible. The stream is **not** stable across
/// versions of the `rand` crate, and it must never be used where
/// unpredictability matters.
///
/// The inner `StdRng` sits behind a mutex so a single source can be shared
/// between threads without torn reads.
///
/// # Example
/// ```
/// use idforge::{NanoIdGenerator, SeededRandom};
///
/// let a = NanoIdGenerator::new(SeededRandom::new(7));
/// let b = NanoIdGenerator::new(SeededRandom::new(7));
/// assert_eq!(a.generate_default()?, b.generate_default()?);
/// # Ok::<(), idforge::Error>(())
/// ```
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    /// Creates a source whose stream is fully determined by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        #[cfg(feature = "parking-lot")]
        let mut rng = self.rng.lock();
        // A panic elsewhere cannot leave a `StdRng` half-updated
        #[cfg(not(feature = "parking-lot"))]
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut rng)
    }
}

impl RandSource<u64> for SeededRandom {
    fn rand(&self) -> u64 {
        self.with_rng(|rng| rng.random())
    }
}

impl RandSource<u128> for SeededRandom {
    fn rand(&self) -> u128 {
        self.with_rng(|rng| rng.random())
    }
}

impl RandBytes for SeededRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        self.with_rng(|rng| rng.fill_bytes(dest));
    }
}
