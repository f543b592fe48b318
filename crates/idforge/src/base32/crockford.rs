use crate::base32::Base32Error;

/// Crockford's base32 alphabet: digits and upper-case letters without `I`,
/// `L`, `O` and `U`.
pub const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Characters needed to encode 128 bits at 5 bits per character.
pub const ENCODED_LEN: usize = 26;

const NO_VALUE: u8 = 255;
const BITS_PER_CHAR: u32 = 5;
const CHAR_MASK: u128 = 0x1F;

/// Lookup table for Crockford base32 decoding
const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0_u8;
    // Main alphabet, allow lower-case
    while i < 32 {
        let c = CROCKFORD_ALPHABET[i as usize];
        lut[c as usize] = i;
        if c.is_ascii_uppercase() {
            lut[(c + 32) as usize] = i;
        }
        i += 1;
    }
    // Crockford-specific aliases
    lut[b'O' as usize] = 0;
    lut[b'o' as usize] = 0;
    lut[b'I' as usize] = 1;
    lut[b'i' as usize] = 1;
    lut[b'L' as usize] = 1;
    lut[b'l' as usize] = 1;
    lut
};

/// Encodes a 128-bit value as 26 upper-case Crockford characters, most
/// significant first.
///
/// The 26 characters carry 130 bits; the top two are always zero, so the
/// first character is in `0..=7`. The output sorts lexicographically in the
/// same order as the input integers.
#[must_use]
pub const fn encode_u128(value: u128) -> [u8; ENCODED_LEN] {
    let mut buf = [0_u8; ENCODED_LEN];
    let mut i = 0;
    while i < ENCODED_LEN {
        let shift = BITS_PER_CHAR * (ENCODED_LEN - 1 - i) as u32;
        buf[i] = CROCKFORD_ALPHABET[((value >> shift) & CHAR_MASK) as usize];
        i += 1;
    }
    buf
}

/// Decodes a 26-character Crockford string into a 128-bit value.
///
/// Decoding is case-insensitive and accepts Crockford's aliases (`O`→`0`,
/// `I`/`L`→`1`).
///
/// # Errors
///
/// - [`Base32Error::DecodeInvalidLen`] when the input is not 26 bytes.
/// - [`Base32Error::DecodeInvalidAscii`] for bytes outside the alphabet.
/// - [`Base32Error::DecodeOverflow`] when the first character is above `7`.
pub fn decode_u128(encoded: &str) -> Result<u128, Base32Error> {
    let bytes = encoded.as_bytes();
    if bytes.len() != ENCODED_LEN {
        return Err(Base32Error::DecodeInvalidLen {
            len: bytes.len(),
            expected: ENCODED_LEN,
        });
    }

    let mut acc = 0_u128;
    for (index, &byte) in bytes.iter().enumerate() {
        let val = LOOKUP[usize::from(byte)];
        if val == NO_VALUE {
            return Err(Base32Error::DecodeInvalidAscii { byte, index });
        }
        if index == 0 && val > 7 {
            return Err(Base32Error::DecodeOverflow);
        }
        acc = (acc << BITS_PER_CHAR) | u128::from(val);
    }
    Ok(acc)
}
