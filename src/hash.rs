//! Field and variant name hashing, and the reverse lookup used on decode.
//!
//! Names never appear on the wire; a 31-bit hash stands in for each one.
//! The decoder can resolve hashes back to names through an [`Unhash`] built
//! from the set of names the caller expects to see.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::error::{Error, Result};

/// Hashes a field or variant name to its 31-bit wire value.
///
/// The accumulator runs `acc * 223 + byte` over the UTF-8 bytes of the name,
/// is masked to the low 31 bits, and is then sign-extended from bit 30 so
/// the value behaves like a 31-bit signed integer in `i32` arithmetic. The
/// empty string hashes to 0.
///
/// This function is part of the wire contract and must never change.
#[must_use]
pub fn hash_name(name: &str) -> i32 {
    let mut acc = 0u32;
    for &b in name.as_bytes() {
        acc = acc.wrapping_mul(223).wrapping_add(u32::from(b));
    }
    sign_extend(acc & 0x7fff_ffff)
}

/// Re-interprets the low 31 bits of `raw` as a 31-bit signed value.
///
/// Bit 30 is the sign bit; bit 31 of the input is discarded.
pub(crate) fn sign_extend(raw: u32) -> i32 {
    ((raw << 1) as i32) >> 1
}

/// A collision-checked reverse lookup from name hashes to names.
///
/// The default value knows no names and resolves every hash to its
/// placeholder form. Recorded names are purely informational: decoded data
/// is correct either way, and re-encoding writes the hash, not the name.
#[derive(Debug, Clone, Default)]
pub struct Unhash {
    names: HashMap<i32, String>,
}

impl Unhash {
    /// Builds a lookup from a list of names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HashCollision`] if two distinct names hash to the
    /// same value. Repeating the same name is fine.
    pub fn new<I>(names: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut this = Self::default();
        for name in names {
            this.insert(name)?;
        }
        Ok(this)
    }

    /// Registers one name, returning its hash.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HashCollision`] if a different name is already
    /// registered under the same hash.
    pub fn insert(&mut self, name: impl Into<String>) -> Result<i32> {
        let name = name.into();
        let hash = hash_name(&name);
        match self.names.entry(hash) {
            Entry::Vacant(entry) => {
                entry.insert(name);
            }
            Entry::Occupied(entry) => {
                if *entry.get() != name {
                    return Err(Error::HashCollision {
                        first: entry.get().clone(),
                        second: name,
                    });
                }
            }
        }
        Ok(hash)
    }

    /// Returns the registered name for a hash, if any.
    pub fn get(&self, hash: i32) -> Option<&str> {
        self.names.get(&hash).map(String::as_str)
    }

    /// Resolves a hash to its registered name, or to the placeholder form
    /// `#` followed by 8 lowercase hex digits of the hash as a 32-bit value.
    pub fn resolve(&self, hash: i32) -> String {
        match self.get(hash) {
            Some(name) => name.to_owned(),
            None => format!("#{:08x}", hash as u32),
        }
    }
}
