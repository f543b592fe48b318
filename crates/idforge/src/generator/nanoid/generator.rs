#[cfg(feature = "tracing")]
use tracing::instrument;

use super::{Alphabet, DEFAULT_SIZE};
use crate::{
    error::{Error, Result},
    generator::IdGenerator,
    rand::{RandBytes, ThreadRandom},
};

/// A NanoId generator over an injected byte source.
///
/// NanoIds carry no timestamp or state: each is `size` symbols drawn
/// uniformly from an [`Alphabet`]. With [`ThreadRandom`] the output is
/// unpredictable; with a [`SeededRandom`] it is reproducible.
///
/// ```
/// use idforge::{NanoIdGenerator, ThreadRandom};
///
/// let generator = NanoIdGenerator::new(ThreadRandom);
/// assert_eq!(generator.generate_default()?.len(), 21);
/// assert_eq!(generator.generate_sized(8)?.len(), 8);
///
/// let id = generator.generate("01", 16)?;
/// assert!(id.chars().all(|c| c == '0' || c == '1'));
/// # Ok::<(), idforge::Error>(())
/// ```
///
/// [`SeededRandom`]: crate::SeededRandom
#[derive(Clone, Debug, Default)]
pub struct NanoIdGenerator<R>
where
    R: RandBytes,
{
    rng: R,
}

impl<R> NanoIdGenerator<R>
where
    R: RandBytes,
{
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generates an ID of `size` symbols from `alphabet`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `alphabet` is empty, longer than
    /// 255 symbols, or repeats a symbol, or if `size` is 0.
    pub fn generate(&self, alphabet: &str, size: usize) -> Result<String> {
        self.generate_from(&Alphabet::new(alphabet)?, size)
    }

    /// Generates an ID of `size` symbols from the URL-safe alphabet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `size` is 0.
    pub fn generate_sized(&self, size: usize) -> Result<String> {
        self.generate_from(&Alphabet::url_safe(), size)
    }

    /// Generates a 21-symbol ID from the URL-safe alphabet.
    ///
    /// # Errors
    ///
    /// Never fails; the `Result` matches the other generators.
    pub fn generate_default(&self) -> Result<String> {
        Ok(sample(&self.rng, &Alphabet::url_safe(), DEFAULT_SIZE))
    }

    /// Generates an ID of `size` symbols from a pre-validated alphabet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `size` is 0.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, alphabet)))]
    pub fn generate_from(&self, alphabet: &Alphabet, size: usize) -> Result<String> {
        if size == 0 {
            return Err(Error::argument("size must be at least 1"));
        }
        Ok(sample(&self.rng, alphabet, size))
    }
}

impl<R> IdGenerator for NanoIdGenerator<R>
where
    R: RandBytes,
{
    type Id = String;

    fn generate(&self) -> Result<String> {
        self.generate_default()
    }
}

/// Rejection sampling: mask each random byte and keep it only if it lands
/// inside the alphabet. Leftover bytes of the last batch are discarded.
fn sample<R>(rng: &R, alphabet: &Alphabet, size: usize) -> String
where
    R: RandBytes + ?Sized,
{
    let mask = alphabet.mask();
    let mut bytes = vec![0_u8; alphabet.step(size)];
    let mut id = String::with_capacity(size);
    let mut len = 0;

    loop {
        rng.fill_bytes(&mut bytes);
        for byte in &bytes {
            if let Some(symbol) = alphabet.get(usize::from(byte & mask)) {
                id.push(symbol);
                len += 1;
                if len == size {
                    return id;
                }
            }
        }
    }
}

/// A 21-symbol URL-safe NanoId from the thread-local CSPRNG.
///
/// ```
/// let id = idforge::nanoid();
/// assert_eq!(id.len(), 21);
/// ```
#[must_use]
pub fn nanoid() -> String {
    sample(&ThreadRandom, &Alphabet::url_safe(), DEFAULT_SIZE)
}

/// A URL-safe NanoId of `size` symbols from the thread-local CSPRNG.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `size` is 0.
pub fn nanoid_sized(size: usize) -> Result<String> {
    NanoIdGenerator::new(ThreadRandom).generate_sized(size)
}

/// A NanoId of `size` symbols from `alphabet`, using the thread-local CSPRNG.
///
/// # Errors
///
/// See [`NanoIdGenerator::generate`].
pub fn nanoid_with(alphabet: &str, size: usize) -> Result<String> {
    NanoIdGenerator::new(ThreadRandom).generate(alphabet, size)
}
