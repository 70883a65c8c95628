//! Exposes the reader seam used by the decoder.

use std::io;

use crate::error::{Error, Result};

/// Returns an [`io::Error`] with kind [`io::ErrorKind::UnexpectedEof`].
fn eof() -> Error {
    // this doesn't have quite the right error message, but it doesn't
    // allocate and short input is short input no matter the phrasing
    io::Error::from(io::ErrorKind::UnexpectedEof).into()
}

/// Specialized reader trait for use with [`Decoder`](crate::de::Decoder).
///
/// By default, this is implemented for byte slices, [`IoRead`], and mutable
/// references to `Read` implementations. Slices advance in place, so a
/// `&mut &[u8]` doubles as a cursor.
pub trait Read {
    /// Reads a constant-size chunk of bytes.
    fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N]>;

    /// Reads a chunk of bytes into a newly allocated [`Vec`].
    fn read_byte_vec(&mut self, len: usize) -> Result<Vec<u8>>;

    /// Reads a single byte. Node tags and numtags come through here.
    fn read_byte(&mut self) -> Result<u8> {
        Ok(self.read_bytes::<1>()?[0])
    }
}

// this implementation is required so the reader can be reborrowed
impl<R: Read> Read for &mut R {
    fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        (**self).read_bytes()
    }

    fn read_byte_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        (**self).read_byte_vec(len)
    }

    fn read_byte(&mut self) -> Result<u8> {
        (**self).read_byte()
    }
}

impl Read for &[u8] {
    fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let (out, rem) = self.split_first_chunk::<N>().ok_or_else(eof)?;
        *self = rem;
        Ok(*out)
    }

    fn read_byte_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let (out, rem) = self.split_at_checked(len).ok_or_else(eof)?;
        *self = rem;
        Ok(out.to_vec())
    }
}

/// Wraps a [`io::Read`] implementation so it can be used as a [`Read`].
///
/// You cannot directly construct this type. Instead use
/// [`Decoder::from_reader`](crate::de::Decoder::from_reader).
#[derive(Debug)]
pub struct IoRead<R> {
    pub(crate) inner: R,
}

impl<R> IoRead<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: io::Read> Read for IoRead<R> {
    fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.inner.read_exact(&mut buf)?;
        Ok(buf)
    }

    #[inline(never)]
    fn read_byte_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        use std::io::Read as _;

        // don't allocate too much up front or a hostile length prefix could
        // lead to a DoS before the read even fails
        let capacity = len.min(0x1000);
        let mut buf = Vec::with_capacity(capacity);
        let limit = u64::try_from(len).map_err(|_| eof())?;
        self.inner.by_ref().take(limit).read_to_end(&mut buf)?;

        if buf.len() == len {
            Ok(buf)
        } else {
            Err(eof())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{IoRead, Read};
    use crate::error::Error;

    fn is_eof(err: Error) -> bool {
        matches!(err, Error::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof)
    }

    #[test]
    fn slice_advances() {
        let mut r: &[u8] = &[1, 2, 3, 4, 5];
        assert_eq!(r.read_bytes::<2>().expect("in bounds"), [1, 2]);
        assert_eq!(r.read_byte().expect("in bounds"), 3);
        assert_eq!(r.read_byte_vec(2).expect("in bounds"), vec![4, 5]);
        assert!(r.is_empty());
    }

    #[test]
    fn slice_short_is_eof() {
        let mut r: &[u8] = &[1, 2];
        let err = r.read_bytes::<4>().expect_err("out of bounds");
        assert!(is_eof(err), "expected eof error");
        // a failed read must not consume anything
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn io_read_short_is_eof() {
        let mut r = IoRead::new(&[1u8, 2][..]);
        let err = r.read_byte_vec(3).expect_err("out of bounds");
        assert!(is_eof(err), "expected eof error");
    }
}
