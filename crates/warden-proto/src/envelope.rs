//! Envelope wire form
//!
//! The relay-transported shape of one encrypted message. The relay is
//! content-blind: it routes these by holder address without inspecting
//! them.

use serde::{Deserialize, Serialize};

/// Encrypted message envelope as carried by the relay.
///
/// ```json
/// { "ciphertextHex": "0x…", "nonceHex": "0x…", "counter": 0 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeWire {
    /// Ciphertext (including AEAD tag) as `0x`-hex
    pub ciphertext_hex: String,

    /// 24-byte nonce as `0x`-hex
    pub nonce_hex: String,

    /// Sender-side message counter
    pub counter: u64,
}
