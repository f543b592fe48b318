use ::rand::{Rng, RngCore, rng};

use crate::rand::{RandBytes, RandSource};

/// A random source backed by the thread-local RNG (`rand::rng()`).
///
/// This RNG is fast, cryptographically secure (ChaCha-based), and reseeded
/// periodically from the operating system.
///
/// Each OS thread has its own RNG instance, so calls from multiple threads are
/// contention-free. This type does **not** store the RNG; it reaches the
/// thread-local generator on each call, which makes it `Send + Sync` even
/// though `ThreadRng` itself is neither.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource<u64> for ThreadRandom {
    fn rand(&self) -> u64 {
        rng().random()
    }
}

impl RandSource<u128> for ThreadRandom {
    fn rand(&self) -> u128 {
        rng().random()
    }
}

impl RandBytes for ThreadRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        rng().fill_bytes(dest);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_the_whole_buffer() {
        // 64 zero bytes from a CSPRNG is a 2^-512 event
        let mut buf = [0_u8; 64];
        ThreadRandom.fill_bytes(&mut buf);
        assert!(buf.iter().any(|&b| b != 0));
    }

    #[test]
    fn successive_draws_differ() {
        let a: u128 = ThreadRandom.rand();
        let b: u128 = ThreadRandom.rand();
        assert_ne!(a, b);
    }
}
