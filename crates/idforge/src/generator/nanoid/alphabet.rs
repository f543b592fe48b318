use core::{fmt, str::FromStr};
use std::collections::HashSet;

use crate::error::{Error, Result};

/// The URL-safe 64-symbol alphabet used when none is given.
pub const DEFAULT_ALPHABET: &str =
    "_-0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// The NanoId length used when none is given.
pub const DEFAULT_SIZE: usize = 21;

/// Largest number of symbols an alphabet may hold. Every symbol must be
/// addressable by one masked random byte.
pub const MAX_ALPHABET_LEN: usize = 255;

/// A validated NanoId alphabet: 1 to 255 distinct characters.
///
/// Symbol order matters. Random bytes are masked to the smallest `2^k - 1`
/// covering the last index, then out-of-range indices are rejected, so every
/// position is drawn with equal probability.
///
/// ```
/// use idforge::Alphabet;
///
/// let hex = Alphabet::new("0123456789abcdef")?;
/// assert_eq!(hex.len(), 16);
/// assert_eq!(hex.mask(), 15);
/// assert!(Alphabet::new("aa").is_err());
/// # Ok::<(), idforge::Error>(())
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Alphabet {
    symbols: Vec<char>,
    mask: u8,
}

impl Alphabet {
    /// Validates `symbols` as an alphabet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `symbols` is empty, holds more
    /// than 255 characters, or repeats a character.
    pub fn new(symbols: &str) -> Result<Self> {
        let symbols: Vec<char> = symbols.chars().collect();
        if symbols.is_empty() {
            return Err(Error::argument("alphabet must not be empty"));
        }
        if symbols.len() > MAX_ALPHABET_LEN {
            return Err(Error::argument(format!(
                "alphabet has {} symbols, at most {MAX_ALPHABET_LEN} are allowed",
                symbols.len()
            )));
        }
        let mut seen = HashSet::with_capacity(symbols.len());
        if let Some(dup) = symbols.iter().find(|c| !seen.insert(**c)) {
            return Err(Error::argument(format!(
                "alphabet repeats the symbol {dup:?}"
            )));
        }
        Ok(Self::from_validated(symbols))
    }

    /// The default URL-safe alphabet, [`DEFAULT_ALPHABET`].
    #[must_use]
    pub fn url_safe() -> Self {
        Self::from_validated(DEFAULT_ALPHABET.chars().collect())
    }

    fn from_validated(symbols: Vec<char>) -> Self {
        let mask = mask_for(symbols.len());
        Self { symbols, mask }
    }

    /// Number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always `false`: a validated alphabet holds at least one symbol.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The bit mask applied to each random byte.
    #[must_use]
    pub const fn mask(&self) -> u8 {
        self.mask
    }

    #[must_use]
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Returns the symbol at `index`, or `None` if the masked byte falls
    /// outside the alphabet and must be rejected.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    /// Number of random bytes drawn per batch for an ID of `size` symbols.
    ///
    /// Sized from the expected rejection rate with a 1.6 safety factor, so a
    /// single batch usually suffices.
    #[must_use]
    pub fn step(&self, size: usize) -> usize {
        let step = (1.6 * f64::from(self.mask) * size as f64 / self.len() as f64).ceil();
        (step as usize).max(1)
    }
}

/// `2^k - 1` for the smallest `k` covering index `len - 1`. A single symbol
/// still gets mask 1 so each byte has a chance to land on it.
fn mask_for(len: usize) -> u8 {
    if len <= 1 {
        return 1;
    }
    let bits = (len - 1).ilog2() + 1;
    ((1_u32 << bits) - 1) as u8
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::url_safe()
    }
}

impl FromStr for Alphabet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.symbols.iter().try_for_each(|c| fmt::Write::write_char(f, *c))
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alphabet")
            .field("symbols", &self.to_string())
            .field("mask", &self.mask)
            .finish()
    }
}
