//! Crate-wide error type.
//!
//! Every container exposes `try_*` operations returning [`Result`]; the
//! plain operations route the same errors through [`crate::fatal::OrAbort`].

use derive_more::{Display, Error, From};

#[derive(Debug, Display, Error, From)]
pub enum Error {
    #[display("stride must be non-zero")]
    ZeroStride,

    #[display("expected a {expected}-byte element, found {found} bytes")]
    StrideMismatch { expected: usize, found: usize },

    #[display("index {index} out of bounds for collection with {len} elements")]
    IndexOutOfBounds { index: usize, len: usize },

    #[display("use of a freed collection")]
    UseAfterFree,

    #[display("collection is empty")]
    Empty,

    #[display("invalid configuration: {_0}")]
    InvalidConfig(#[error(not(source))] &'static str),

    #[display("invalid utf-8: {_0}")]
    #[from]
    Utf8(std::string::FromUtf8Error),

    #[display("io error: {_0}")]
    #[from]
    Io(std::io::Error),
}

pub type Result<T> = core::result::Result<T, Error>;

/// Checks that `bytes` is exactly one element of `stride` bytes.
#[inline]
pub(crate) fn check_stride(stride: usize, bytes: &[u8]) -> Result<()> {
    if bytes.len() == stride {
        Ok(())
    } else {
        Err(Error::StrideMismatch {
            expected: stride,
            found: bytes.len(),
        })
    }
}
