//! Error types for wire-format handling

use thiserror::Error;

/// Errors from parsing wire values.
///
/// Malformed input is surfaced immediately to the caller, never
/// silently coerced.
#[derive(Debug, Error)]
pub enum ProtoError {
    /// A hex field was not `0x`-prefixed valid hex
    #[error("malformed hex string: {reason}")]
    MalformedHex {
        /// What was wrong with the input
        reason: String,
    },

    /// A fixed-width hex field decoded to the wrong number of bytes
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Expected decoded length in bytes
        expected: usize,
        /// Actual decoded length in bytes
        actual: usize,
    },
}
