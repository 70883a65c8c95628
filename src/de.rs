//! Exposes the tree decoder.

use std::io;

use crate::error::{Error, Result};
use crate::hash::Unhash;
use crate::leb128;
use crate::read::{IoRead, Read};
use crate::tag::Tag;
use crate::tree::{Column, Field, Tree};
use crate::wire;

/// Decodes one top-level tagged node from the start of a slice.
///
/// The format is self-delimiting, so trailing bytes past the node are left
/// unconsumed and are the caller's concern. Use [`Decoder::from_slice`] and
/// [`Decoder::remainder`] when they matter.
pub fn from_slice(buf: &[u8], unhash: &Unhash) -> Result<Tree> {
    Decoder::from_slice(buf, unhash).read_tree()
}

/// Decodes one top-level tagged node from a [`io::Read`].
///
/// The reader may still have bytes available when this function returns
/// successfully.
pub fn from_reader<R: io::Read>(reader: R, unhash: &Unhash) -> Result<Tree> {
    Decoder::from_reader(reader, unhash).read_tree()
}

/// Container pre-allocation guard: wire-declared lengths are untrusted, so
/// never reserve more than this many elements ahead of actually reading
/// them.
const PREALLOC: usize = 0x1000;

/// A decoder over a reader plus the name lookup used to resolve field and
/// variant hashes.
///
/// This is useful over [`from_slice`] when you want the remainder of the
/// input or want to decode a sequence of nodes manually.
#[derive(Debug)]
pub struct Decoder<'h, R> {
    reader: R,
    unhash: &'h Unhash,
}

impl<'h, R: Read> Decoder<'h, R> {
    /// Creates a new decoder over a [`Read`].
    pub fn new(reader: R, unhash: &'h Unhash) -> Self {
        Self { reader, unhash }
    }

    /// Reads one tagged tree node.
    pub fn read_tree(&mut self) -> Result<Tree> {
        let tag = self.read_tag()?;
        self.read_body(tag)
    }

    fn read_tag(&mut self) -> Result<Tag> {
        Tag::from_byte(self.reader.read_byte()?)
    }

    fn read_len(&mut self) -> Result<usize> {
        wire::read_len(&mut self.reader)
    }

    fn read_opt_arg(&mut self, has_arg: bool) -> Result<Option<Box<Tree>>> {
        if has_arg {
            Ok(Some(Box::new(self.read_tree()?)))
        } else {
            Ok(None)
        }
    }

    /// Reads the body of a node whose tag is already known, either from the
    /// tag byte just consumed or from a shared-tag container header.
    fn read_body(&mut self, tag: Tag) -> Result<Tree> {
        match tag {
            Tag::Int8 => Ok(Tree::Int8(wire::read_int8(&mut self.reader)?)),
            Tag::Int16 => Ok(Tree::Int16(wire::read_int16(&mut self.reader)?)),
            Tag::Int32 => Ok(Tree::Int32(wire::read_int32(&mut self.reader)?)),
            Tag::Int64 => Ok(Tree::Int64(wire::read_int64(&mut self.reader)?)),
            Tag::Int128 => Ok(Tree::Int128(wire::read_int128(&mut self.reader)?)),
            Tag::Float64 => Ok(Tree::Float64(wire::read_float64(&mut self.reader)?)),
            Tag::Uvint => Ok(Tree::Uvint(leb128::read_uvint(&mut self.reader)?)),
            Tag::Svint => Ok(Tree::Svint(leb128::read_svint(&mut self.reader)?)),
            Tag::Str => Ok(Tree::Str(wire::read_str(&mut self.reader)?)),

            Tag::Array => {
                let len = self.read_len()?;
                let elem = self.read_tag()?;
                let mut items = Vec::with_capacity(len.min(PREALLOC));
                for _ in 0..len {
                    items.push(self.read_body(elem)?);
                }
                Ok(Tree::Array(elem, items))
            }

            Tag::Tuple => {
                let len = self.read_len()?;
                let mut items = Vec::with_capacity(len.min(PREALLOC));
                for _ in 0..len {
                    items.push(self.read_tree()?);
                }
                Ok(Tree::Tuple(items))
            }

            Tag::Record => {
                let len = self.read_len()?;
                let mut fields = Vec::with_capacity(len.min(PREALLOC));
                for _ in 0..len {
                    let hash = wire::read_field_hashtag(&mut self.reader)?;
                    let name = self.unhash.resolve(hash);
                    let value = self.read_tree()?;
                    fields.push(Field { name, hash, value });
                }
                Ok(Tree::Record(fields))
            }

            Tag::NumVariant => {
                let (index, has_arg) = wire::read_numtag(&mut self.reader)?;
                let arg = self.read_opt_arg(has_arg)?;
                Ok(Tree::NumVariant(index, arg))
            }

            Tag::Variant => {
                let (hash, has_arg) = wire::read_hashtag(&mut self.reader)?;
                let name = self.unhash.resolve(hash);
                let arg = self.read_opt_arg(has_arg)?;
                Ok(Tree::Variant { name, hash, arg })
            }

            Tag::TupleTable => {
                let row_num = self.read_len()?;
                let col_num = self.read_len()?;
                let mut col_tags = Vec::with_capacity(col_num.min(PREALLOC));
                for _ in 0..col_num {
                    col_tags.push(self.read_tag()?);
                }
                let rows = self.read_rows(row_num, col_num, |de, col| {
                    de.read_body(col_tags[col])
                })?;
                Ok(Tree::TupleTable(col_tags, rows))
            }

            Tag::RecordTable => {
                let row_num = self.read_len()?;
                let col_num = self.read_len()?;
                let mut header = Vec::with_capacity(col_num.min(PREALLOC));
                for _ in 0..col_num {
                    let hash = wire::read_field_hashtag(&mut self.reader)?;
                    let tag = self.read_tag()?;
                    let name = self.unhash.resolve(hash);
                    header.push(Column { name, hash, tag });
                }
                let rows = self.read_rows(row_num, col_num, |de, col| {
                    de.read_body(header[col].tag)
                })?;
                Ok(Tree::RecordTable(header, rows))
            }

            Tag::Matrix => {
                let row_num = self.read_len()?;
                let cols = self.read_len()?;
                let elem = self.read_tag()?;
                let rows = self.read_rows(row_num, cols, |de, _| de.read_body(elem))?;
                Ok(Tree::Matrix {
                    tag: elem,
                    cols,
                    rows,
                })
            }
        }
    }

    /// Reads `row_num` rows of `col_num` cells each, in row-major order.
    fn read_rows(
        &mut self,
        row_num: usize,
        col_num: usize,
        mut read_cell: impl FnMut(&mut Self, usize) -> Result<Tree>,
    ) -> Result<Vec<Vec<Tree>>> {
        // a zero-width row consumes no input, so the declared count is not
        // bounded by the bytes behind it; every other hostile length runs
        // out of input after at most one cell
        if col_num == 0 && row_num > wire::MAX_ZERO_WIDTH_ROWS {
            return Err(Error::Corrupted("zero-width table row count"));
        }

        let mut rows = Vec::with_capacity(row_num.min(PREALLOC));
        for _ in 0..row_num {
            let mut row = Vec::with_capacity(col_num.min(PREALLOC));
            for col in 0..col_num {
                row.push(read_cell(self, col)?);
            }
            rows.push(row);
        }
        Ok(rows)
    }
}

impl<'h, 'de> Decoder<'h, &'de [u8]> {
    /// Creates a new decoder that reads from a slice.
    pub fn from_slice(buf: &'de [u8], unhash: &'h Unhash) -> Self {
        Self::new(buf, unhash)
    }

    /// Gets the remaining unread part of the slice.
    pub fn remainder(&self) -> &'de [u8] {
        self.reader
    }
}

impl<'h, R: io::Read> Decoder<'h, IoRead<R>> {
    /// Creates a new decoder that reads from a [`io::Read`].
    ///
    /// If you're working with a byte slice, it is more efficient to use
    /// [`Decoder::from_slice`].
    pub fn from_reader(reader: R, unhash: &'h Unhash) -> Self {
        Self::new(IoRead::new(reader), unhash)
    }

    /// Unwraps the decoder into its inner reader.
    pub fn into_reader(self) -> R {
        self.reader.inner
    }
}
