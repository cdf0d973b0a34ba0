//! Public bundle wire form
//!
//! The JSON shape an actor publishes to the directory/relay. All key
//! fields are `0x`-prefixed lowercase hex; private scalars never appear
//! here.

use serde::{Deserialize, Serialize};

/// Published public pre-key bundle.
///
/// ```json
/// {
///   "identityPublicKeyHex": "0x…",
///   "signedPrePublicKeyHex": "0x…",
///   "timestampMillis": 1700000000000,
///   "version": "1.0.0"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleWire {
    /// Public identity key, 32 bytes of `0x`-hex
    pub identity_public_key_hex: String,

    /// Public signed-pre key, 32 bytes of `0x`-hex
    pub signed_pre_public_key_hex: String,

    /// Optional bundle signature, carried opaquely
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub signature: Option<String>,

    /// Bundle creation time, Unix milliseconds
    pub timestamp_millis: u64,

    /// Bundle format version
    pub version: String,
}
