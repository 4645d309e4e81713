//! Conversion errors.

use std::str::Utf8Error;

/// Error from [`convert_bytes`](crate::convert_bytes).
///
/// Conversion of `&str` input never fails; only raw input that is not text
/// is rejected.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Input bytes are not valid UTF-8.
    #[error("input is not valid UTF-8")]
    InvalidUtf8(#[from] Utf8Error),
}
