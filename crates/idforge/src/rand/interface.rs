use std::sync::Arc;

/// A source of random integers.
///
/// Generators are generic over it so tests can substitute fixed, counting or
/// saturated values for real randomness.
///
/// The random type `T` is generic (`u64` or `u128`). ULID generators draw a
/// `u128` and keep the low 80 bits.
///
/// # Example
/// ```
/// use idforge::RandSource;
///
/// struct FixedRand;
/// impl RandSource<u64> for FixedRand {
///     fn rand(&self) -> u64 {
///         1234
///     }
/// }
///
/// let rng = FixedRand;
/// assert_eq!(rng.rand(), 1234);
/// ```
pub trait RandSource<T> {
    fn rand(&self) -> T;
}

/// A source of uniformly distributed random bytes.
///
/// NanoId generation consumes randomness a batch of bytes at a time. Sources
/// that are shared between threads must synchronize internally; the trait
/// takes `&self`.
pub trait RandBytes {
    /// Fills `dest` entirely with random bytes.
    fn fill_bytes(&self, dest: &mut [u8]);
}

impl<T, R: RandSource<T> + ?Sized> RandSource<T> for &R {
    fn rand(&self) -> T {
        (**self).rand()
    }
}

impl<T, R: RandSource<T> + ?Sized> RandSource<T> for Arc<R> {
    fn rand(&self) -> T {
        (**self).rand()
    }
}

impl<R: RandBytes + ?Sized> RandBytes for &R {
    fn fill_bytes(&self, dest: &mut [u8]) {
        (**self).fill_bytes(dest);
    }
}

impl<R: RandBytes + ?Sized> RandBytes for Arc<R> {
    fn fill_bytes(&self, dest: &mut [u8]) {
        (**self).fill_bytes(dest);
    }
}
