//! Error types for Warden cryptographic operations

use thiserror::Error;

/// Errors from key material handling and session operations
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Key material had the wrong length
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Requested KDF output exceeds the HKDF-SHA256 expansion limit
    #[error("kdf output length {requested} exceeds hkdf limit")]
    KdfOutputTooLong {
        /// Requested output length in bytes
        requested: usize,
    },

    /// AEAD authentication tag mismatch on decrypt.
    /// Signals tampering or a wrong key/counter; the session's receive
    /// chain has already advanced when this is returned.
    #[error("decryption failed: authentication tag mismatch")]
    AuthenticationFailed,

    /// A decrypt was supplied with a counter the session is not prepared
    /// to derive. The session does not buffer or reorder; envelopes must
    /// arrive in counter order, one decrypt per envelope.
    #[error("ordering violation: session at counter {expected}, envelope has {actual}")]
    OrderingViolation {
        /// The counter the session expects next
        expected: u64,
        /// The counter carried by the envelope
        actual: u64,
    },

    /// A chain counter would overflow
    #[error("message counter overflow at {current}")]
    CounterOverflow {
        /// Counter value when overflow was detected
        current: u64,
    },
}

impl CryptoError {
    /// Returns true if this error is fatal (unrecoverable)
    ///
    /// Fatal errors indicate malformed inputs or a caller-level
    /// sequencing bug. An authentication failure is not fatal: the
    /// session stays usable and the caller decides whether to drop the
    /// message or tear the channel down.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::AuthenticationFailed => false,

            Self::InvalidKeyLength { .. }
            | Self::KdfOutputTooLong { .. }
            | Self::OrderingViolation { .. }
            | Self::CounterOverflow { .. } => true,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn authentication_failure_is_not_fatal() {
        assert!(!CryptoError::AuthenticationFailed.is_fatal());
    }

    #[test]
    fn ordering_violation_is_fatal() {
        let err = CryptoError::OrderingViolation { expected: 3, actual: 7 };
        assert!(err.is_fatal());
    }

    #[test]
    fn error_display() {
        let err = CryptoError::InvalidKeyLength { expected: 32, actual: 16 };
        assert_eq!(err.to_string(), "invalid key length: expected 32, got 16");
    }
}
