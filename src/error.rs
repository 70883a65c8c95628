//! Error handling types.
//!
//! The whole crate shares one error type: encoding, decoding, and name
//! registration all fail through [`Error`]. There is no partial-result
//! recovery; the first error aborts the operation.

use std::io;

pub type Result<T> = std::result::Result<T, Error>;

/// Potential errors to encounter when encoding or decoding tree data.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The error originated from the [`io::Write`] or [`io::Read`]
    /// implementation.
    ///
    /// Input that runs out before a node is complete surfaces here with kind
    /// [`io::ErrorKind::UnexpectedEof`].
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The input bytes do not form a valid encoded tree.
    #[error("corrupted data: {0}")]
    Corrupted(&'static str),

    /// The value handed to the encoder cannot be represented on the wire.
    #[error("malformed value: {0}")]
    Malformed(&'static str),

    /// While reading LEB128 integer data, the data overflowed the target
    /// type.
    #[error("LEB encoded integer overflows target type")]
    IntegerOverflow,

    /// Two distinct names hashed to the same value during registration.
    #[error("name hash collision between {first:?} and {second:?}")]
    HashCollision {
        /// The name already registered under the hash.
        first: String,
        /// The name whose registration failed.
        second: String,
    },
}
