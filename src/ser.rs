//! Exposes the tree encoder.

use std::io;

use crate::error::{Error, Result};
use crate::leb128;
use crate::tag::Tag;
use crate::tree::Tree;
use crate::wire;

/// Encodes a tree to a [`Vec<u8>`] in its top-level tagged form.
///
/// The resulting buffer is exactly one self-delimiting node: there is no
/// file header, no magic, no trailing framing.
pub fn to_vec(tree: &Tree) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    to_writer(&mut buf, tree)?;
    Ok(buf)
}

/// Encodes a tree to a [`io::Write`] in its top-level tagged form.
pub fn to_writer<W: io::Write>(mut writer: W, tree: &Tree) -> Result<()> {
    write_tree(&mut writer, true, tree)
}

/// Writes one node, tag byte first when `tagged`.
///
/// Untagged writes only happen inside shared-tag containers whose header
/// already declares the element kind; getting this flag wrong on either
/// side desynchronises the whole stream, so the recursion below is the only
/// place it is threaded through.
fn write_tree<W: io::Write>(w: &mut W, tagged: bool, tree: &Tree) -> Result<()> {
    if tagged {
        w.write_all(&[tree.tag().byte()])?;
    }

    match tree {
        Tree::Int8(v) => wire::write_int8(&mut *w, *v),
        Tree::Int16(v) => wire::write_int16(&mut *w, *v),
        Tree::Int32(v) => wire::write_int32(&mut *w, *v),
        Tree::Int64(v) => wire::write_int64(&mut *w, *v),
        Tree::Int128(v) => wire::write_int128(&mut *w, v),
        Tree::Float64(v) => wire::write_float64(&mut *w, *v),
        Tree::Uvint(v) => leb128::write_uvint(&mut *w, *v),
        Tree::Svint(v) => leb128::write_svint(&mut *w, *v),
        Tree::Str(v) => wire::write_str(&mut *w, v),

        Tree::Array(tag, items) => {
            // one shared tag instead of one per element
            write_len(w, items.len())?;
            w.write_all(&[tag.byte()])?;
            for item in items {
                check_cell(*tag, item)?;
                write_tree(w, false, item)?;
            }
            Ok(())
        }

        Tree::Tuple(items) => {
            write_len(w, items.len())?;
            for item in items {
                write_tree(w, true, item)?;
            }
            Ok(())
        }

        Tree::Record(fields) => {
            write_len(w, fields.len())?;
            for field in fields {
                // a record field always has a value
                wire::write_hashtag(&mut *w, field.hash, true)?;
                write_tree(w, true, &field.value)?;
            }
            Ok(())
        }

        Tree::NumVariant(index, arg) => {
            wire::write_numtag(&mut *w, *index, arg.is_some())?;
            match arg {
                Some(arg) => write_tree(w, true, arg),
                None => Ok(()),
            }
        }

        Tree::Variant { hash, arg, .. } => {
            wire::write_hashtag(&mut *w, *hash, arg.is_some())?;
            match arg {
                Some(arg) => write_tree(w, true, arg),
                None => Ok(()),
            }
        }

        Tree::TupleTable(col_tags, rows) => {
            check_zero_width(col_tags.len(), rows.len())?;
            write_len(w, rows.len())?;
            write_len(w, col_tags.len())?;
            for tag in col_tags {
                w.write_all(&[tag.byte()])?;
            }
            for row in rows {
                check_row(col_tags.len(), row)?;
                for (tag, cell) in col_tags.iter().zip(row) {
                    check_cell(*tag, cell)?;
                    write_tree(w, false, cell)?;
                }
            }
            Ok(())
        }

        Tree::RecordTable(header, rows) => {
            check_zero_width(header.len(), rows.len())?;
            write_len(w, rows.len())?;
            write_len(w, header.len())?;
            for col in header {
                wire::write_hashtag(&mut *w, col.hash, true)?;
                w.write_all(&[col.tag.byte()])?;
            }
            for row in rows {
                check_row(header.len(), row)?;
                for (col, cell) in header.iter().zip(row) {
                    check_cell(col.tag, cell)?;
                    write_tree(w, false, cell)?;
                }
            }
            Ok(())
        }

        Tree::Matrix { tag, cols, rows } => {
            check_zero_width(*cols, rows.len())?;
            write_len(w, rows.len())?;
            write_len(w, *cols)?;
            w.write_all(&[tag.byte()])?;
            for row in rows {
                check_row(*cols, row)?;
                for cell in row {
                    check_cell(*tag, cell)?;
                    write_tree(w, false, cell)?;
                }
            }
            Ok(())
        }
    }
}

fn write_len<W: io::Write>(w: &mut W, len: usize) -> Result<()> {
    leb128::write_uvint(w, len as u64)
}

fn check_row(cols: usize, row: &[Tree]) -> Result<()> {
    if row.len() != cols {
        return Err(Error::Malformed("ragged table row"));
    }
    Ok(())
}

/// An untagged cell of the wrong kind would decode as garbage, so reject it
/// before it reaches the wire.
fn check_cell(tag: Tag, cell: &Tree) -> Result<()> {
    if cell.tag() != tag {
        return Err(Error::Malformed("cell kind differs from declared tag"));
    }
    Ok(())
}

/// The decoder refuses zero-column tables past this row count, so the
/// encoder must not produce them.
fn check_zero_width(cols: usize, rows: usize) -> Result<()> {
    if cols == 0 && rows > wire::MAX_ZERO_WIDTH_ROWS {
        return Err(Error::Malformed("too many zero-width rows"));
    }
    Ok(())
}
