//! The polymorphic tree value produced and consumed by the codec.

use crate::hash::hash_name;
use crate::tag::Tag;

/// A tagged tree of typed values.
///
/// Trees are plain values: the producer builds one, the encoder consumes it,
/// and the decoder reproduces it. There is no sharing and no cycles.
///
/// Name hashes carried by [`Tree::Variant`], [`Field`], and [`Column`] are
/// expected in canonical sign-extended form as produced by
/// [`hash_name`](crate::hash_name); the hash-computing constructors
/// guarantee this. The wire stores only the low 31 bits, so a
/// non-canonical hash would be normalised by a round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    /// Unsigned byte.
    Int8(u8),
    /// Unsigned 16-bit integer.
    Int16(u16),
    /// Signed 32-bit integer.
    Int32(i32),
    /// Signed 64-bit integer.
    Int64(i64),
    /// 16 opaque bytes.
    Int128([u8; 16]),
    /// Double, carried by bit pattern; NaN payloads survive round trips.
    Float64(f64),
    /// Unsigned varint.
    Uvint(u64),
    /// Signed varint.
    Svint(i64),
    /// Raw bytes; the wire imposes no character encoding.
    Str(Vec<u8>),
    /// Homogeneous sequence. The shared tag is written once; every element
    /// must be of that kind and encodes untagged.
    Array(Tag, Vec<Tree>),
    /// Heterogeneous fixed-length sequence of self-tagged elements.
    Tuple(Vec<Tree>),
    /// Named fields in producer order. Only the hashes go on the wire.
    Record(Vec<Field>),
    /// Small-integer constructor in `0..=127` with an optional payload.
    NumVariant(u8, Option<Box<Tree>>),
    /// Hashed-name constructor with an optional payload. The name is not
    /// serialized; decoding recovers it through the supplied
    /// [`Unhash`](crate::Unhash).
    Variant {
        /// Constructor name, informational.
        name: String,
        /// The name's 31-bit hash; this is what goes on the wire.
        hash: i32,
        /// Optional payload.
        arg: Option<Box<Tree>>,
    },
    /// Row-major tuples sharing one column-tag schema; cells encode
    /// untagged.
    TupleTable(Vec<Tag>, Vec<Vec<Tree>>),
    /// Row-major records sharing one field header; cells encode untagged.
    RecordTable(Vec<Column>, Vec<Vec<Tree>>),
    /// Rectangular row-major array of one element tag.
    Matrix {
        /// The shared element tag.
        tag: Tag,
        /// Column count; kept explicitly so zero-row matrices keep their
        /// shape.
        cols: usize,
        /// Row-major cells.
        rows: Vec<Vec<Tree>>,
    },
}

impl Tree {
    /// The tag identifying this node's kind.
    pub fn tag(&self) -> Tag {
        Tag::from(self)
    }

    /// A string node from text or raw bytes.
    pub fn str(bytes: impl AsRef<[u8]>) -> Self {
        Self::Str(bytes.as_ref().to_vec())
    }

    /// A named variant, hashing the constructor name.
    pub fn variant(name: impl Into<String>, arg: Option<Tree>) -> Self {
        let name = name.into();
        let hash = hash_name(&name);
        Self::Variant {
            name,
            hash,
            arg: arg.map(Box::new),
        }
    }

    /// A numeric variant with an optional payload.
    pub fn num_variant(index: u8, arg: Option<Tree>) -> Self {
        Self::NumVariant(index, arg.map(Box::new))
    }
}

impl From<&Tree> for Tag {
    fn from(tree: &Tree) -> Self {
        match tree {
            Tree::Int8(_) => Tag::Int8,
            Tree::Int16(_) => Tag::Int16,
            Tree::Int32(_) => Tag::Int32,
            Tree::Int64(_) => Tag::Int64,
            Tree::Int128(_) => Tag::Int128,
            Tree::Float64(_) => Tag::Float64,
            Tree::Uvint(_) => Tag::Uvint,
            Tree::Svint(_) => Tag::Svint,
            Tree::Str(_) => Tag::Str,
            Tree::Array(..) => Tag::Array,
            Tree::Tuple(_) => Tag::Tuple,
            Tree::Record(_) => Tag::Record,
            Tree::NumVariant(..) => Tag::NumVariant,
            Tree::Variant { .. } => Tag::Variant,
            Tree::TupleTable(..) => Tag::TupleTable,
            Tree::RecordTable(..) => Tag::RecordTable,
            Tree::Matrix { .. } => Tag::Matrix,
        }
    }
}

/// A named record field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name, informational; only the hash is serialized.
    pub name: String,
    /// The name's 31-bit hash.
    pub hash: i32,
    /// Field value.
    pub value: Tree,
}

impl Field {
    /// Creates a field, hashing the name.
    pub fn new(name: impl Into<String>, value: Tree) -> Self {
        let name = name.into();
        let hash = hash_name(&name);
        Self { name, hash, value }
    }
}

/// A record-table column descriptor: a named field plus the shared tag its
/// cells encode under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name, informational; only the hash is serialized.
    pub name: String,
    /// The name's 31-bit hash.
    pub hash: i32,
    /// The shared cell tag.
    pub tag: Tag,
}

impl Column {
    /// Creates a column descriptor, hashing the name.
    pub fn new(name: impl Into<String>, tag: Tag) -> Self {
        let name = name.into();
        let hash = hash_name(&name);
        Self { name, hash, tag }
    }
}

#[cfg(test)]
mod tests {
    use super::{Field, Tree};
    use crate::hash::hash_name;
    use crate::tag::Tag;

    #[test]
    fn tag_projection() {
        assert_eq!(Tree::Int8(0).tag(), Tag::Int8);
        assert_eq!(Tree::str("x").tag(), Tag::Str);
        assert_eq!(Tree::Tuple(vec![]).tag(), Tag::Tuple);
        assert_eq!(Tree::num_variant(0, None).tag(), Tag::NumVariant);
    }

    #[test]
    fn constructors_hash_their_names() {
        let field = Field::new("abc", Tree::Int8(1));
        assert_eq!(field.hash, hash_name("abc"));

        let Tree::Variant { hash, arg, .. } = Tree::variant("abc", Some(Tree::Int8(1))) else {
            panic!("expected a variant");
        };
        assert_eq!(hash, hash_name("abc"));
        assert_eq!(arg.as_deref(), Some(&Tree::Int8(1)));
    }
}
