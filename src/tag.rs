//! The closed registry of node-kind tag bytes.

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::error::{Error, Result};

/// Identifies the kind of an encoded tree node.
///
/// The numeric values are part of the wire contract shared by encoder and
/// decoder; they are frozen. A tagged node writes this byte ahead of its
/// body, and shared-tag containers write it once in their header instead of
/// once per element.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
pub enum Tag {
    /// Unsigned byte.
    Int8 = 1,
    /// Unsigned 16-bit, big-endian.
    Int16 = 2,
    /// Signed 32-bit, big-endian.
    Int32 = 3,
    /// Signed 64-bit, big-endian.
    Int64 = 4,
    /// 16 opaque bytes.
    Int128 = 5,
    /// IEEE-754 double, bit pattern as big-endian 64-bit.
    Float64 = 12,
    /// Unsigned varint.
    Uvint = 16,
    /// Signed zigzag varint.
    Svint = 17,
    /// Length-prefixed byte string.
    Str = 18,
    /// Homogeneous sequence with one shared element tag.
    Array = 19,
    /// Heterogeneous sequence of tagged elements.
    Tuple = 20,
    /// Named fields, carried as hashtags.
    Record = 21,
    /// Small-integer constructor with optional payload.
    NumVariant = 22,
    /// Hashed-name constructor with optional payload.
    Variant = 23,
    /// Row-major tuples sharing one column-tag schema.
    TupleTable = 24,
    /// Row-major records sharing one field header.
    RecordTable = 25,
    /// Rectangular row-major array of one element tag.
    Matrix = 26,
}

impl Tag {
    /// Parses a tag from its wire byte.
    pub fn from_byte(byte: u8) -> Result<Self> {
        Self::try_from(byte).map_err(|_| Error::Corrupted("invalid tag"))
    }

    /// Returns the wire byte for this tag.
    pub fn byte(self) -> u8 {
        self.into()
    }
}
