//! Wire-level primitives: fixed-width integers, length-prefixed strings,
//! and the hashtag/numtag framings.
//!
//! Every multi-byte integer is big-endian on the wire regardless of host
//! byte order. The `read_*` functions consume exactly the bytes of one body
//! and fail before consuming anything out of bounds; the `write_tagged_*`
//! helpers additionally emit the node's [`Tag`] byte first, for consumers
//! that build custom encodings without materialising a whole tree.

use std::io;

use crate::error::{Error, Result};
use crate::hash::sign_extend;
use crate::read::Read;
use crate::tag::Tag;

pub use crate::leb128::{read_svint, read_uvint, write_svint, write_uvint};

/// Writes an unsigned byte.
pub fn write_int8<W: io::Write>(mut writer: W, v: u8) -> Result<()> {
    Ok(writer.write_all(&[v])?)
}

/// Writes an unsigned 16-bit integer.
pub fn write_int16<W: io::Write>(mut writer: W, v: u16) -> Result<()> {
    Ok(writer.write_all(&v.to_be_bytes())?)
}

/// Writes a signed 32-bit integer.
pub fn write_int32<W: io::Write>(mut writer: W, v: i32) -> Result<()> {
    Ok(writer.write_all(&v.to_be_bytes())?)
}

/// Writes a signed 64-bit integer.
pub fn write_int64<W: io::Write>(mut writer: W, v: i64) -> Result<()> {
    Ok(writer.write_all(&v.to_be_bytes())?)
}

/// Writes a 128-bit opaque blob.
pub fn write_int128<W: io::Write>(mut writer: W, v: &[u8; 16]) -> Result<()> {
    Ok(writer.write_all(v)?)
}

/// Writes a double as its IEEE-754 bit pattern.
///
/// This is a bit-cast, never a textual rendering: NaN payloads and signed
/// zeros survive byte for byte.
pub fn write_float64<W: io::Write>(mut writer: W, v: f64) -> Result<()> {
    Ok(writer.write_all(&v.to_bits().to_be_bytes())?)
}

/// Writes a length-prefixed byte string.
pub fn write_str<W: io::Write>(mut writer: W, v: &[u8]) -> Result<()> {
    write_uvint(&mut writer, v.len() as u64)?;
    Ok(writer.write_all(v)?)
}

/// Reads an unsigned byte.
pub fn read_int8<R: Read>(mut reader: R) -> Result<u8> {
    reader.read_byte()
}

/// Reads an unsigned 16-bit integer.
pub fn read_int16<R: Read>(mut reader: R) -> Result<u16> {
    Ok(u16::from_be_bytes(reader.read_bytes()?))
}

/// Reads a signed 32-bit integer.
pub fn read_int32<R: Read>(mut reader: R) -> Result<i32> {
    Ok(i32::from_be_bytes(reader.read_bytes()?))
}

/// Reads a signed 64-bit integer.
pub fn read_int64<R: Read>(mut reader: R) -> Result<i64> {
    Ok(i64::from_be_bytes(reader.read_bytes()?))
}

/// Reads a 128-bit opaque blob.
pub fn read_int128<R: Read>(mut reader: R) -> Result<[u8; 16]> {
    reader.read_bytes()
}

/// Reads a double from its IEEE-754 bit pattern.
pub fn read_float64<R: Read>(mut reader: R) -> Result<f64> {
    Ok(f64::from_bits(u64::from_be_bytes(reader.read_bytes()?)))
}

/// Reads a length-prefixed byte string.
pub fn read_str<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let len = read_len(&mut reader)?;
    reader.read_byte_vec(len)
}

/// Reads a uvint length prefix, checked against the address space.
pub(crate) fn read_len<R: Read>(reader: R) -> Result<usize> {
    let len = read_uvint(reader)?;
    usize::try_from(len).map_err(|_| Error::Corrupted("length overflow"))
}

/// Bound on the declared row count of a table with no columns, shared by
/// encoder and decoder. A zero-width row occupies no bytes, so input length
/// cannot bound the count the way it does for every other container.
pub(crate) const MAX_ZERO_WIDTH_ROWS: usize = 0x1000;

/// Writes a 4-byte hashtag: 31 bits of hash plus the argument flag in the
/// high bit of the first byte.
pub fn write_hashtag<W: io::Write>(mut writer: W, hash: i32, has_arg: bool) -> Result<()> {
    let mut bytes = ((hash as u32) & 0x7fff_ffff).to_be_bytes();
    if has_arg {
        bytes[0] |= 0x80;
    }
    Ok(writer.write_all(&bytes)?)
}

/// Reads a 4-byte hashtag, returning the sign-extended hash and the
/// argument flag.
pub fn read_hashtag<R: Read>(mut reader: R) -> Result<(i32, bool)> {
    let bytes: [u8; 4] = reader.read_bytes()?;
    let has_arg = bytes[0] & 0x80 != 0;
    let hash = sign_extend(u32::from_be_bytes(bytes) & 0x7fff_ffff);
    Ok((hash, has_arg))
}

/// Reads a record-field hashtag.
///
/// A record field always has a value, so the argument flag is an invariant
/// here rather than data: a clear flag fails the decode and the flag is not
/// returned.
pub fn read_field_hashtag<R: Read>(reader: R) -> Result<i32> {
    let (hash, has_arg) = read_hashtag(reader)?;
    if !has_arg {
        return Err(Error::Corrupted("invalid field hashtag"));
    }
    Ok(hash)
}

/// Writes a 1-byte numtag: a 7-bit constructor index plus the argument flag
/// in the high bit.
pub fn write_numtag<W: io::Write>(mut writer: W, index: u8, has_arg: bool) -> Result<()> {
    if index > 0x7f {
        return Err(Error::Malformed("numtag out of range"));
    }
    let flag = if has_arg { 0x80 } else { 0 };
    Ok(writer.write_all(&[index | flag])?)
}

/// Reads a 1-byte numtag, returning the constructor index and the argument
/// flag.
pub fn read_numtag<R: Read>(mut reader: R) -> Result<(u8, bool)> {
    let b = reader.read_byte()?;
    Ok((b & 0x7f, b & 0x80 != 0))
}

macro_rules! impl_write_tagged {
    ($(($fn_name:ident, $write:ident, $tag:ident, $Ty:ty)),* $(,)?) => { $(
        /// Writes the tag byte followed by the body.
        pub fn $fn_name<W: io::Write>(mut writer: W, v: $Ty) -> Result<()> {
            writer.write_all(&[Tag::$tag.byte()])?;
            $write(writer, v)
        }
    )* };
}

impl_write_tagged!(
    (write_tagged_int8, write_int8, Int8, u8),
    (write_tagged_int16, write_int16, Int16, u16),
    (write_tagged_int32, write_int32, Int32, i32),
    (write_tagged_int64, write_int64, Int64, i64),
    (write_tagged_int128, write_int128, Int128, &[u8; 16]),
    (write_tagged_float64, write_float64, Float64, f64),
    (write_tagged_uvint, write_uvint, Uvint, u64),
    (write_tagged_svint, write_svint, Svint, i64),
    (write_tagged_str, write_str, Str, &[u8]),
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_big_endian() {
        let mut buf = Vec::new();
        write_int16(&mut buf, 0x0102).expect("encoding worked");
        write_int32(&mut buf, 0x0304_0506).expect("encoding worked");
        assert_eq!(buf, [0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);

        let mut r = buf.as_slice();
        assert_eq!(read_int16(&mut r).expect("decoding worked"), 0x0102);
        assert_eq!(read_int32(&mut r).expect("decoding worked"), 0x0304_0506);
    }

    #[test]
    fn negative_integers_round_trip() {
        let mut buf = Vec::new();
        write_int32(&mut buf, -2).expect("encoding worked");
        write_int64(&mut buf, i64::MIN).expect("encoding worked");

        let mut r = buf.as_slice();
        assert_eq!(read_int32(&mut r).expect("decoding worked"), -2);
        assert_eq!(read_int64(&mut r).expect("decoding worked"), i64::MIN);
    }

    #[test]
    fn float64_is_a_bit_cast() {
        let mut buf = Vec::new();
        write_float64(&mut buf, 1.0).expect("encoding worked");
        assert_eq!(buf, 0x3ff0_0000_0000_0000u64.to_be_bytes());

        // a non-canonical NaN payload must survive byte for byte
        let nan = f64::from_bits(0x7ff8_0000_dead_beef);
        buf.clear();
        write_float64(&mut buf, nan).expect("encoding worked");
        let back = read_float64(&mut buf.as_slice()).expect("decoding worked");
        assert_eq!(back.to_bits(), 0x7ff8_0000_dead_beef);
    }

    #[test]
    fn str_is_length_prefixed() {
        let mut buf = Vec::new();
        write_str(&mut buf, b"ab").expect("encoding worked");
        assert_eq!(buf, [0x02, 0x61, 0x62]);

        let got = read_str(&mut buf.as_slice()).expect("decoding worked");
        assert_eq!(got, b"ab");
    }

    #[test]
    fn str_short_body_fails() {
        // declared length 5, only 2 bytes present
        let data = [0x05u8, 0x61, 0x62];
        assert!(read_str(&mut &data[..]).is_err());
    }

    #[test]
    fn hashtag_flag_lives_in_the_high_bit() {
        let mut buf = Vec::new();
        write_hashtag(&mut buf, 0x004a_2343, false).expect("encoding worked");
        assert_eq!(buf, [0x00, 0x4a, 0x23, 0x43]);

        buf.clear();
        write_hashtag(&mut buf, 0x004a_2343, true).expect("encoding worked");
        assert_eq!(buf, [0x80, 0x4a, 0x23, 0x43]);

        let (hash, has_arg) = read_hashtag(&mut buf.as_slice()).expect("decoding worked");
        assert_eq!(hash, 0x004a_2343);
        assert!(has_arg);
    }

    #[test]
    fn hashtag_sign_extends_bit_30() {
        // all 31 hash bits set reads back as -1 through signed arithmetic
        let data = [0xffu8, 0xff, 0xff, 0xff];
        let (hash, has_arg) = read_hashtag(&mut &data[..]).expect("decoding worked");
        assert_eq!(hash, -1);
        assert!(has_arg);

        // and a sign-extended hash writes its low 31 bits back out
        let mut buf = Vec::new();
        write_hashtag(&mut buf, -1, true).expect("encoding worked");
        assert_eq!(buf, data);
    }

    #[test]
    fn field_hashtag_requires_the_flag() {
        let data = [0x00u8, 0x4a, 0x23, 0x43];
        assert!(matches!(
            read_field_hashtag(&mut &data[..]),
            Err(Error::Corrupted("invalid field hashtag"))
        ));

        let data = [0x80u8, 0x4a, 0x23, 0x43];
        let hash = read_field_hashtag(&mut &data[..]).expect("decoding worked");
        assert_eq!(hash, 0x004a_2343);
    }

    #[test]
    fn numtag_packs_index_and_flag() {
        let mut buf = Vec::new();
        write_numtag(&mut buf, 3, false).expect("encoding worked");
        write_numtag(&mut buf, 3, true).expect("encoding worked");
        write_numtag(&mut buf, 127, true).expect("encoding worked");
        assert_eq!(buf, [0x03, 0x83, 0xff]);

        let mut r = buf.as_slice();
        assert_eq!(read_numtag(&mut r).expect("decoding worked"), (3, false));
        assert_eq!(read_numtag(&mut r).expect("decoding worked"), (3, true));
        assert_eq!(read_numtag(&mut r).expect("decoding worked"), (127, true));
    }

    #[test]
    fn numtag_out_of_range_fails() {
        let mut buf = Vec::new();
        assert!(matches!(
            write_numtag(&mut buf, 128, false),
            Err(Error::Malformed("numtag out of range"))
        ));
        assert!(buf.is_empty(), "nothing may be written on failure");
    }

    #[test]
    fn tagged_helpers_emit_the_tag_first() {
        let mut buf = Vec::new();
        write_tagged_int16(&mut buf, 0x0102).expect("encoding worked");
        assert_eq!(buf, [0x02, 0x01, 0x02]);

        buf.clear();
        write_tagged_str(&mut buf, b"ab").expect("encoding worked");
        assert_eq!(buf, [0x12, 0x02, 0x61, 0x62]);

        buf.clear();
        write_tagged_uvint(&mut buf, 0).expect("encoding worked");
        assert_eq!(buf, [0x10, 0x00]);
    }
}
