use core::fmt;

use crate::error::{Error, Result};

/// A 64-bit Snowflake identifier.
///
/// The bit partition (timestamp, datacenter id, worker id, sequence) is not
/// stored in the ID itself; it is described by the [`SnowflakeLayout`] of the
/// generator that minted it. The most significant bit is always zero, so every
/// generated ID is also a non-negative `i64`.
///
/// IDs compare by their raw value, which for a single layout orders them by
/// timestamp first.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// Wraps a raw value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Returns the value as a signed 64-bit integer, the representation used
    /// by most databases for `BIGINT` primary keys.
    #[must_use]
    pub const fn to_i64(&self) -> i64 {
        self.id as i64
    }

    /// Wraps a signed value, rejecting negative inputs since no layout ever
    /// sets the sign bit.
    #[must_use]
    pub const fn from_i64(raw: i64) -> Option<Self> {
        if raw < 0 {
            None
        } else {
            Some(Self { id: raw as u64 })
        }
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SnowflakeId").field(&self.id).finish()
    }
}

impl From<u64> for SnowflakeId {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

/// The decoded fields of a [`SnowflakeId`].
///
/// Field order (and therefore the derived ordering) follows the bit layout,
/// most significant first.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SnowflakeParts {
    /// Milliseconds since the generator's epoch.
    pub timestamp: u64,
    pub datacenter_id: u64,
    pub worker_id: u64,
    pub sequence: u64,
}

/// The bit widths of a Snowflake ID's fields.
///
/// Fields are laid out from the **most significant bit** to the **least
/// significant bit** in this order, below a single always-zero sign bit:
///
/// ```text
///  Bit Index:  63  62          22 21          17 16      12 11          0
///              +--+--------------+--------------+----------+-------------+
///  Field:      |0 | timestamp(41)| datacenter(5)| worker(5)| sequence(12)|
///              +--+--------------+--------------+----------+-------------+
/// ```
///
/// The widths must sum to exactly 63 bits. Timestamp and sequence need at
/// least one bit each; datacenter and worker may be zero bits wide, in which
/// case the only valid id for that field is `0`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SnowflakeLayout {
    timestamp_bits: u8,
    datacenter_bits: u8,
    worker_bits: u8,
    sequence_bits: u8,
}

impl Default for SnowflakeLayout {
    fn default() -> Self {
        Self::TWITTER
    }
}

const fn mask(bits: u8) -> u64 {
    if bits == 0 { 0 } else { u64::MAX >> (64 - bits as u32) }
}

impl SnowflakeLayout {
    /// Bits available below the sign bit.
    pub const USABLE_BITS: u8 = 63;

    /// The classic Twitter split: 41 timestamp, 5 datacenter, 5 worker, 12
    /// sequence bits.
    pub const TWITTER: Self = Self {
        timestamp_bits: 41,
        datacenter_bits: 5,
        worker_bits: 5,
        sequence_bits: 12,
    };

    /// Creates a validated layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if the widths do not sum to 63 or the
    /// timestamp or sequence field is empty.
    pub fn new(
        timestamp_bits: u8,
        datacenter_bits: u8,
        worker_bits: u8,
        sequence_bits: u8,
    ) -> Result<Self> {
        let total = u32::from(timestamp_bits)
            + u32::from(datacenter_bits)
            + u32::from(worker_bits)
            + u32::from(sequence_bits);
        if total != u32::from(Self::USABLE_BITS) {
            return Err(Error::config(format!(
                "layout widths must sum to {} bits, got {total}",
                Self::USABLE_BITS
            )));
        }
        if timestamp_bits == 0 {
            return Err(Error::config("timestamp field needs at least one bit"));
        }
        if sequence_bits == 0 {
            return Err(Error::config("sequence field needs at least one bit"));
        }
        Ok(Self {
            timestamp_bits,
            datacenter_bits,
            worker_bits,
            sequence_bits,
        })
    }

    #[must_use]
    pub const fn timestamp_bits(&self) -> u8 {
        self.timestamp_bits
    }

    #[must_use]
    pub const fn datacenter_bits(&self) -> u8 {
        self.datacenter_bits
    }

    #[must_use]
    pub const fn worker_bits(&self) -> u8 {
        self.worker_bits
    }

    #[must_use]
    pub const fn sequence_bits(&self) -> u8 {
        self.sequence_bits
    }

    const fn worker_shift(&self) -> u8 {
        self.sequence_bits
    }

    const fn datacenter_shift(&self) -> u8 {
        self.sequence_bits + self.worker_bits
    }

    const fn timestamp_shift(&self) -> u8 {
        self.sequence_bits + self.worker_bits + self.datacenter_bits
    }

    /// Largest timestamp offset (ms since epoch) the layout can represent.
    #[must_use]
    pub const fn max_timestamp(&self) -> u64 {
        mask(self.timestamp_bits)
    }

    #[must_use]
    pub const fn max_datacenter_id(&self) -> u64 {
        mask(self.datacenter_bits)
    }

    #[must_use]
    pub const fn max_worker_id(&self) -> u64 {
        mask(self.worker_bits)
    }

    /// Largest sequence value; a generator can issue `max_sequence() + 1` IDs
    /// per millisecond.
    #[must_use]
    pub const fn max_sequence(&self) -> u64 {
        mask(self.sequence_bits)
    }

    /// Packs `parts` into an ID. Each field is truncated to its width.
    #[must_use]
    pub const fn compose(&self, parts: SnowflakeParts) -> SnowflakeId {
        let t = (parts.timestamp & self.max_timestamp()) << self.timestamp_shift();
        let d = (parts.datacenter_id & self.max_datacenter_id()) << self.datacenter_shift();
        let w = (parts.worker_id & self.max_worker_id()) << self.worker_shift();
        let s = parts.sequence & self.max_sequence();
        SnowflakeId::from_raw(t | d | w | s)
    }

    /// Splits an ID back into its fields.
    #[must_use]
    pub const fn decompose(&self, id: SnowflakeId) -> SnowflakeParts {
        let raw = id.to_raw();
        SnowflakeParts {
            timestamp: (raw >> self.timestamp_shift()) & self.max_timestamp(),
            datacenter_id: (raw >> self.datacenter_shift()) & self.max_datacenter_id(),
            worker_id: (raw >> self.worker_shift()) & self.max_worker_id(),
            sequence: raw & self.max_sequence(),
        }
    }
}
