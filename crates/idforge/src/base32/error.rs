/// Errors from decoding a Crockford base32 ULID string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Base32Error {
    /// The input was not exactly 26 characters long.
    #[error("invalid length: expected {expected} characters, got {len}")]
    DecodeInvalidLen { len: usize, expected: usize },

    /// The input contains a byte outside the Crockford alphabet.
    #[error("invalid byte 0x{byte:02x} at index {index}")]
    DecodeInvalidAscii { byte: u8, index: usize },

    /// The input encodes a value wider than 128 bits (first character above
    /// `7`).
    #[error("encoded value exceeds 128 bits")]
    DecodeOverflow,
}
