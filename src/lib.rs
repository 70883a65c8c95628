//! # treebin
//!
//! Self-describing binary serialization of a tagged tree of typed values.
//!
//! A serialized tree is exactly one node written in tagged form: a one-byte
//! kind tag followed by the node's body, with no file header or envelope.
//! Containers length-prefix their contents with unsigned varints, so the
//! format is self-delimiting. The node kinds are:
//!
//! - `int8`, `int16`, `int32`, `int64`: fixed-width big-endian integers
//! - `int128`: 16 opaque bytes
//! - `float64`: IEEE-754 double by bit pattern
//! - `uvint`, `svint`: LEB128 varints, zigzag for the signed one
//! - `str`: `uvint`-length-prefixed raw bytes
//! - `array`: homogeneous sequence carrying one shared element tag
//! - `tuple`: heterogeneous sequence of self-tagged elements
//! - `record`: named fields, each a 4-byte name-hash tag plus a tagged value
//! - `numvariant`, `variant`: constructors (7-bit index or 31-bit name
//!   hash) with an optional tagged payload
//! - `tuple_table`, `record_table`, `matrix`: row-major tables that factor
//!   the type schema into the header and write their cells *untagged*
//!
//! The tagged/untagged distinction is the heart of the format: inside an
//! `array`, a `matrix`, or a table column, the element kind is declared
//! once in the header and every cell encodes body-only. Field and variant
//! names never appear on the wire; a 31-bit hash ([`hash_name`]) stands in
//! for them, and decoding resolves hashes back to names through an
//! [`Unhash`] — unknown hashes come back in a `#xxxxxxxx` placeholder form,
//! which changes nothing about re-encoding since only the hash is written.
//!
//! Encode with [`to_vec`] or [`to_writer`]; decode with [`from_slice`],
//! [`from_reader`], or a manual [`Decoder`]. The [`wire`] module exposes
//! the underlying primitives for consumers that want to build custom
//! encodings without materialising a [`Tree`].

pub mod de;
mod error;
mod hash;
mod leb128;
mod read;
pub mod ser;
mod tag;
mod tree;
pub mod wire;

pub use de::{Decoder, from_reader, from_slice};
pub use error::{Error, Result};
pub use hash::{Unhash, hash_name};
pub use read::{IoRead, Read};
pub use ser::{to_vec, to_writer};
pub use tag::Tag;
pub use tree::{Column, Field, Tree};

#[cfg(test)]
mod tests {
    // byte-level checks that the encoder emits the exact wire contract,
    // plus round-trips that exercise both directions together
    use super::*;

    fn round_trip(tree: &Tree, unhash: &Unhash) -> Tree {
        let buf = to_vec(tree).expect("encoding must work");
        let back = from_slice(&buf, unhash).expect("decoding must work");
        assert_eq!(*tree, back, "serialization messed up data");
        back
    }

    #[test]
    fn wire_bytes_uvint() {
        assert_eq!(to_vec(&Tree::Uvint(0)).expect("encoding worked"), [
            0x10, 0x00
        ]);
    }

    #[test]
    fn wire_bytes_int16() {
        assert_eq!(to_vec(&Tree::Int16(0x0102)).expect("encoding worked"), [
            0x02, 0x01, 0x02
        ]);
    }

    #[test]
    fn wire_bytes_str() {
        assert_eq!(to_vec(&Tree::str("ab")).expect("encoding worked"), [
            0x12, 0x02, 0x61, 0x62
        ]);
    }

    #[test]
    fn wire_bytes_variant() {
        let bare = Tree::Variant {
            name: "abc".to_owned(),
            hash: 0x004a_2343,
            arg: None,
        };
        assert_eq!(to_vec(&bare).expect("encoding worked"), [
            0x17, 0x00, 0x4a, 0x23, 0x43
        ]);

        let with_arg = Tree::Variant {
            name: "abc".to_owned(),
            hash: 0x004a_2343,
            arg: Some(Box::new(Tree::Int8(5))),
        };
        assert_eq!(to_vec(&with_arg).expect("encoding worked"), [
            0x17, 0x80, 0x4a, 0x23, 0x43, 0x01, 0x05
        ]);
    }

    #[test]
    fn wire_bytes_array() {
        let array = Tree::Array(Tag::Int8, vec![
            Tree::Int8(1),
            Tree::Int8(2),
            Tree::Int8(3),
        ]);
        assert_eq!(to_vec(&array).expect("encoding worked"), [
            0x13, 0x03, 0x01, 0x01, 0x02, 0x03
        ]);
    }

    #[test]
    fn wire_bytes_num_variant() {
        assert_eq!(
            to_vec(&Tree::num_variant(3, None)).expect("encoding worked"),
            [0x16, 0x03]
        );
        assert_eq!(
            to_vec(&Tree::num_variant(3, Some(Tree::Int8(0)))).expect("encoding worked"),
            [0x16, 0x83, 0x01, 0x00]
        );
    }

    #[test]
    fn first_byte_is_the_tag() {
        let nodes = [
            Tree::Int8(1),
            Tree::Int128([0; 16]),
            Tree::Float64(0.5),
            Tree::Svint(-4),
            Tree::Tuple(vec![]),
            Tree::Record(vec![]),
            Tree::variant("x", None),
        ];
        for node in &nodes {
            let buf = to_vec(node).expect("encoding must work");
            assert_eq!(buf[0], node.tag().byte());
        }
    }

    #[test]
    fn round_trip_leaves() {
        let unhash = Unhash::default();
        round_trip(&Tree::Int8(0xff), &unhash);
        round_trip(&Tree::Int16(0xbeef), &unhash);
        round_trip(&Tree::Int32(-123_456_789), &unhash);
        round_trip(&Tree::Int64(i64::MIN), &unhash);
        round_trip(&Tree::Int128(*b"0123456789abcdef"), &unhash);
        round_trip(&Tree::Float64(-0.0), &unhash);
        round_trip(&Tree::Uvint(u64::MAX), &unhash);
        round_trip(&Tree::Svint(i64::MIN), &unhash);
        round_trip(&Tree::str(""), &unhash);
        round_trip(&Tree::Str(vec![0, 1, 2, 0xff]), &unhash);
    }

    #[test]
    fn round_trip_nan_is_bit_exact() {
        // NaN breaks value equality, so compare the re-encoded bytes
        let nan = Tree::Float64(f64::from_bits(0x7ff8_0000_0000_1234));
        let buf = to_vec(&nan).expect("encoding must work");
        let back = from_slice(&buf, &Unhash::default()).expect("decoding must work");
        assert_eq!(
            to_vec(&back).expect("encoding must work"),
            buf,
            "NaN payload must survive byte for byte"
        );
    }

    #[test]
    fn round_trip_containers() {
        let unhash = Unhash::new(["x", "y"]).expect("no collisions");
        round_trip(&Tree::Array(Tag::Uvint, vec![]), &unhash);
        round_trip(
            &Tree::Tuple(vec![Tree::Int8(1), Tree::str("two"), Tree::Svint(-3)]),
            &unhash,
        );
        round_trip(
            &Tree::Record(vec![
                Field::new("x", Tree::Float64(1.5)),
                Field::new("y", Tree::Float64(-2.5)),
            ]),
            &unhash,
        );
        round_trip(
            &Tree::variant("x", Some(Tree::Tuple(vec![Tree::Uvint(1)]))),
            &unhash,
        );
    }
}
