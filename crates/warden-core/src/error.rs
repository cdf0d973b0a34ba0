//! Error types for the recovery core

use thiserror::Error;

/// Errors from the commitment, credential, and policy layers.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Requested proof index outside the leaf list.
    #[error("leaf index {index} out of range for {leaf_count} leaves")]
    LeafIndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of leaves in the tree
        leaf_count: usize,
    },

    /// A disclosure named a claim key the credential does not carry.
    #[error("unknown claim key: {key}")]
    UnknownClaim {
        /// The missing claim key
        key: String,
    },

    /// A claim has no stored salt, so its leaf cannot be recomputed.
    #[error("missing salt for claim key: {key}")]
    MissingSalt {
        /// The unsalted claim key
        key: String,
    },

    /// Recomputed Merkle root disagrees with the anchored root.
    #[error("merkle root mismatch: expected {expected}, recomputed {actual}")]
    RootMismatch {
        /// Anchored root, 0x-hex
        expected: String,
        /// Recomputed root, 0x-hex
        actual: String,
    },

    /// Recovery policy parameters are inconsistent.
    #[error("invalid recovery policy: {reason}")]
    InvalidPolicy {
        /// What check failed
        reason: String,
    },

    /// Wire-format decoding failure.
    #[error(transparent)]
    Proto(#[from] warden_proto::ProtoError),

    /// Cryptographic primitive failure.
    #[error(transparent)]
    Crypto(#[from] warden_crypto::CryptoError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_render_their_context() {
        let err = CoreError::LeafIndexOutOfRange { index: 7, leaf_count: 5 };
        assert_eq!(err.to_string(), "leaf index 7 out of range for 5 leaves");

        let err = CoreError::UnknownClaim { key: "age".to_string() };
        assert!(err.to_string().contains("age"));
    }

    #[test]
    fn proto_errors_convert() {
        let proto = warden_proto::ProtoError::InvalidLength { expected: 32, actual: 4 };
        let err: CoreError = proto.into();
        assert!(matches!(err, CoreError::Proto(_)));
    }
}
