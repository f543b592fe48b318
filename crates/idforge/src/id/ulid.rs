use core::{fmt, str::FromStr};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::{
    base32::{Base32Error, ENCODED_LEN, decode_u128, encode_u128},
    rand::RandSource,
};

/// A 128-bit Universally Unique Lexicographically Sortable Identifier.
///
/// ```text
///  Bit Index:  127            80 79           0
///              +----------------+-------------+
///  Field:      | timestamp (48) | random (80) |
///              +----------------+-------------+
///              |<-- MSB -- 128 bits -- LSB -->|
/// ```
///
/// The timestamp is milliseconds since the UNIX epoch. The canonical text
/// form is 26 Crockford base32 characters: 10 for the timestamp followed by 16
/// for the random component. Integer order, byte order and string order all
/// agree.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Ulid {
    id: u128,
}

impl Ulid {
    pub const TIMESTAMP_BITS: u32 = 48;
    pub const RANDOM_BITS: u32 = 80;

    pub const RANDOM_SHIFT: u32 = 0;
    pub const TIMESTAMP_SHIFT: u32 = Self::RANDOM_SHIFT + Self::RANDOM_BITS;

    pub const TIMESTAMP_MASK: u128 = (1 << Self::TIMESTAMP_BITS) - 1;
    pub const RANDOM_MASK: u128 = (1 << Self::RANDOM_BITS) - 1;

    /// Builds a ULID from its components. Bits outside each field's width are
    /// discarded.
    #[must_use]
    pub const fn from_parts(timestamp: u64, random: u128) -> Self {
        let t = (timestamp as u128 & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let r = (random & Self::RANDOM_MASK) << Self::RANDOM_SHIFT;
        Self { id: t | r }
    }

    /// Builds a ULID for `timestamp` with randomness drawn from `rng`.
    #[must_use]
    pub fn from_timestamp_and_rand<R>(timestamp: u64, rng: &R) -> Self
    where
        R: RandSource<u128> + ?Sized,
    {
        Self::from_parts(timestamp, rng.rand())
    }

    /// Extracts the timestamp (ms since the UNIX epoch).
    #[must_use]
    pub const fn timestamp(&self) -> u64 {
        ((self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK) as u64
    }

    /// Extracts the 80-bit random component.
    #[must_use]
    pub const fn random(&self) -> u128 {
        (self.id >> Self::RANDOM_SHIFT) & Self::RANDOM_MASK
    }

    /// Largest representable timestamp: `2^48 - 1` ms, in the year 10889.
    #[must_use]
    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK as u64
    }

    #[must_use]
    pub const fn max_random() -> u128 {
        Self::RANDOM_MASK
    }

    /// Returns `true` if the random component can be incremented without
    /// wrapping.
    #[must_use]
    pub const fn has_random_room(&self) -> bool {
        self.random() < Self::max_random()
    }

    /// Returns the ULID with the same timestamp and the random component
    /// incremented by one, or `None` if it is already all ones.
    #[must_use]
    pub const fn increment_random(&self) -> Option<Self> {
        if self.has_random_room() {
            Some(Self { id: self.id + 1 })
        } else {
            None
        }
    }

    #[must_use]
    pub const fn from_raw(raw: u128) -> Self {
        Self { id: raw }
    }

    #[must_use]
    pub const fn to_raw(&self) -> u128 {
        self.id
    }

    /// Big-endian byte representation.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; 16] {
        self.id.to_be_bytes()
    }

    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self {
            id: u128::from_be_bytes(bytes),
        }
    }

    /// Returns this ULID's timestamp as a [`SystemTime`].
    #[must_use]
    pub fn datetime(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_millis(self.timestamp())
    }

    /// Returns the canonical 26-character encoding.
    ///
    /// The returned value owns a stack buffer and implements
    /// [`fmt::Display`] and [`AsRef<str>`]; no heap allocation is involved.
    ///
    /// ```
    /// use idforge::Ulid;
    ///
    /// let id = Ulid::from_raw(2_424_242_424_242_424_242);
    /// assert_eq!(id.encode(), "000000000000023953MG16DJDJ");
    /// ```
    #[must_use]
    pub const fn encode(&self) -> EncodedUlid {
        EncodedUlid {
            buf: encode_u128(self.id),
        }
    }

    /// Parses a 26-character Crockford base32 string.
    ///
    /// Decoding is case-insensitive and accepts Crockford's `O`/`I`/`L`
    /// aliases.
    ///
    /// # Errors
    ///
    /// Returns a [`Base32Error`] if the string has the wrong length, contains
    /// a non-Crockford byte, or encodes more than 128 bits.
    pub fn decode(s: impl AsRef<str>) -> Result<Self, Base32Error> {
        decode_u128(s.as_ref()).map(Self::from_raw)
    }
}

impl fmt::Display for Ulid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encode().as_str())
    }
}

impl fmt::Debug for Ulid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ulid")
            .field("id", &format_args!("{}", self.encode()))
            .field("timestamp", &self.timestamp())
            .field("random", &format_args!("{:#022x}", self.random()))
            .finish()
    }
}

impl FromStr for Ulid {
    type Err = Base32Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl From<u128> for Ulid {
    fn from(raw: u128) -> Self {
        Self::from_raw(raw)
    }
}

impl From<Ulid> for u128 {
    fn from(id: Ulid) -> Self {
        id.to_raw()
    }
}

/// The canonical Crockford base32 form of a [`Ulid`], held on the stack.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EncodedUlid {
    buf: [u8; ENCODED_LEN],
}

impl EncodedUlid {
    /// Returns a `&str` view of the encoding.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // The buffer only ever holds bytes from the ASCII Crockford alphabet
        core::str::from_utf8(&self.buf).unwrap_or_default()
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ENCODED_LEN] {
        &self.buf
    }
}

impl fmt::Display for EncodedUlid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for EncodedUlid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl AsRef<str> for EncodedUlid {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for EncodedUlid {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for EncodedUlid {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<String> for EncodedUlid {
    fn eq(&self, other: &String) -> bool {
        self.as_str() == other.as_str()
    }
}

impl From<EncodedUlid> for String {
    fn from(encoded: EncodedUlid) -> Self {
        encoded.as_str().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRand(u128);
    impl RandSource<u128> for FixedRand {
        fn rand(&self) -> u128 {
            self.0
        }
    }

    #[test]
    fn fields_pack_into_expected_bits() {
        let id = Ulid::from_parts(1, 2);
        assert_eq!(id.to_raw(), (1 << 80) | 2);
        assert_eq!(id.timestamp(), 1);
        assert_eq!(id.random(), 2);
    }

    #[test]
    fn from_parts_masks_oversized_fields() {
        let id = Ulid::from_parts(u64::MAX, u128::MAX);
        assert_eq!(id.timestamp(), Ulid::max_timestamp());
        assert_eq!(id.random(), Ulid::max_random());
        assert_eq!(id.to_raw(), u128::MAX);
    }

    #[test]
    fn encode_splits_timestamp_and_random_characters() {
        let id = Ulid::from_parts(Ulid::max_timestamp(), 0);
        let encoded = id.encode();
        assert_eq!(&encoded.as_str()[..10], "7ZZZZZZZZZ");
        assert_eq!(&encoded.as_str()[10..], "0000000000000000");

        let id = Ulid::from_parts(0, Ulid::max_random());
        assert_eq!(id.encode(), "0000000000ZZZZZZZZZZZZZZZZ");
    }

    #[test]
    fn decodes_reference_ulid() {
        let id: Ulid = "01ARZ3NDEKTSV4RRFFQ69G5FAV".parse().unwrap();
        assert_eq!(id.timestamp(), 1_469_922_850_259);
        assert_eq!(id.to_string(), "01ARZ3NDEKTSV4RRFFQ69G5FAV");
    }

    #[test]
    fn decode_recovers_timestamp_and_random() {
        let id = Ulid::from_parts(1_700_000_000_000, 0x00AB_CDEF_0123_4567_89AB);
        let back = Ulid::decode(id.encode()).unwrap();
        assert_eq!(back.timestamp(), 1_700_000_000_000);
        assert_eq!(back.random(), 0x00AB_CDEF_0123_4567_89AB);
    }

    #[test]
    fn increment_random_stops_at_max() {
        let id = Ulid::from_parts(5, Ulid::max_random() - 1);
        let next = id.increment_random().unwrap();
        assert_eq!(next.timestamp(), 5);
        assert_eq!(next.random(), Ulid::max_random());
        assert_eq!(next.increment_random(), None);
    }

    #[test]
    fn bytes_are_big_endian() {
        let id = Ulid::from_parts(1, 0);
        let bytes = id.to_bytes();
        assert_eq!(bytes[5], 1);
        assert_eq!(Ulid::from_bytes(bytes), id);
    }

    #[test]
    fn datetime_matches_timestamp() {
        let id = Ulid::from_timestamp_and_rand(1_000, &FixedRand(9));
        assert_eq!(id.random(), 9);
        assert_eq!(
            id.datetime().duration_since(UNIX_EPOCH).unwrap(),
            Duration::from_millis(1_000)
        );
    }

    #[test]
    fn parse_surfaces_base32_errors() {
        assert!(matches!(
            "not-a-ulid".parse::<Ulid>(),
            Err(Base32Error::DecodeInvalidLen { len: 10, .. })
        ));
    }
}
