//! LEB128 variable-length integer encoding/decoding.
//!
//! The wire format uses this for its `uvint` and `svint` leaves and for
//! every length prefix. Unsigned values are plain LEB128; signed values are
//! zigzag-folded into unsigned ones first so small magnitudes stay small on
//! the wire regardless of sign.
//!
//! See also: <https://en.wikipedia.org/wiki/LEB128>

use std::io;

use crate::error::{Error, Result};
use crate::read::Read;

// a u64 needs at most ten 7-bit groups
const MAX_LEN: usize = (u64::BITS as usize).div_ceil(7);

/// Writes an unsigned varint.
pub fn write_uvint<W: io::Write>(mut writer: W, mut x: u64) -> Result<()> {
    let mut buf = [0u8; MAX_LEN];
    let mut i = 0usize;
    while x >= 0x80 {
        buf[i] = (x as u8) | 0x80;
        x >>= 7;
        i += 1;
    }

    buf[i] = x as u8;
    Ok(writer.write_all(&buf[..=i])?)
}

/// Reads an unsigned varint.
///
/// Data that does not fit a `u64`, whether by magnitude or by sheer group
/// count, fails with [`Error::IntegerOverflow`].
pub fn read_uvint<R: Read>(mut reader: R) -> Result<u64> {
    let mut x = 0u64;
    let mut s = 0u32;
    loop {
        let b = reader.read_byte()?;

        // ensure the shifted group still fits; the compiler can elide this
        // for all but the last possible iteration
        let group = u64::from(b & 0x7f);
        let shifted = group << s;
        if shifted >> s != group {
            return Err(Error::IntegerOverflow);
        }

        x |= shifted;
        if b < 0x80 {
            // no continuation bit is set
            return Ok(x);
        }

        s += 7;
        if s >= u64::BITS {
            return Err(Error::IntegerOverflow);
        }
    }
}

/// Writes a signed varint in zigzag form.
pub fn write_svint<W: io::Write>(writer: W, x: i64) -> Result<()> {
    let mut z = (x as u64) << 1;
    if x < 0 {
        z = !z;
    }
    write_uvint(writer, z)
}

/// Reads a signed varint in zigzag form.
pub fn read_svint<R: Read>(reader: R) -> Result<i64> {
    let z = read_uvint(reader)?;
    let mut x = z >> 1;
    if z & 1 != 0 {
        x = !x;
    }
    Ok(x as i64)
}
