//! Relay routing protocol
//!
//! The relay is a dumb store-and-forward router with no cryptographic
//! role: JSON messages tagged by `type`, broadcast to every connection
//! registered under the matching (case-normalized) holder address.
//! Modeled here as data only — this crate ships the message shapes, not
//! a server.
//!
//! `bundle`, `initEnvelope`, and `replyEnvelope` flow in both
//! directions. A client sends them with the `holder` routing key set;
//! the relay rebroadcasts them stamped with the originating `guardian`
//! instead. Both fields are therefore optional on the wire.

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::bundle::BundleWire;
use crate::envelope::EnvelopeWire;

/// A message on a relay connection, client- or server-originated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RelayMessage {
    /// Mark this connection as the holder for `holder`'s channel set
    #[serde(rename = "registerHolder")]
    RegisterHolder {
        /// Holder address this connection serves
        holder: Address,
    },

    /// Link this connection to a holder's channel set as a guardian
    #[serde(rename = "registerGuardian")]
    RegisterGuardian {
        /// Holder address whose channel set to join
        holder: Address,
        /// The registering guardian's address
        guardian: Address,
    },

    /// A published public pre-key bundle
    #[serde(rename = "bundle")]
    Bundle {
        /// Routing key when client-sent
        #[serde(skip_serializing_if = "Option::is_none", default)]
        holder: Option<Address>,
        /// Originating guardian when relay-broadcast
        #[serde(skip_serializing_if = "Option::is_none", default)]
        guardian: Option<Address>,
        /// The bundle payload, content-blind to the relay
        bundle: BundleWire,
    },

    /// First envelope of a conversation (holder → guardian)
    #[serde(rename = "initEnvelope")]
    InitEnvelope {
        /// Routing key when client-sent
        #[serde(skip_serializing_if = "Option::is_none", default)]
        holder: Option<Address>,
        /// Addressed or originating guardian
        #[serde(skip_serializing_if = "Option::is_none", default)]
        guardian: Option<Address>,
        /// The envelope payload, content-blind to the relay
        envelope: EnvelopeWire,
    },

    /// Reply envelope (guardian → holder)
    #[serde(rename = "replyEnvelope")]
    ReplyEnvelope {
        /// Routing key when client-sent
        #[serde(skip_serializing_if = "Option::is_none", default)]
        holder: Option<Address>,
        /// Addressed or originating guardian
        #[serde(skip_serializing_if = "Option::is_none", default)]
        guardian: Option<Address>,
        /// The envelope payload, content-blind to the relay
        envelope: EnvelopeWire,
    },

    /// Registration acknowledgement from the relay
    #[serde(rename = "ack")]
    Ack {
        /// Role the connection registered as
        role: RelayRole,
        /// Holder address the connection is bound to
        holder: Address,
        /// Guardian address, present for guardian registrations
        #[serde(skip_serializing_if = "Option::is_none", default)]
        guardian: Option<Address>,
    },

    /// Error report from the relay
    #[serde(rename = "error")]
    Error {
        /// Human-readable reason
        message: String,
    },
}

/// Role a relay connection registered as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayRole {
    /// The account owner's connection
    Holder,
    /// A guardian's connection
    Guardian,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn holder_addr() -> Address {
        Address::new([0x11; 20])
    }

    fn guardian_addr() -> Address {
        Address::new([0x22; 20])
    }

    #[test]
    fn register_holder_wire_shape() {
        let msg = RelayMessage::RegisterHolder { holder: holder_addr() };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json.get("type").and_then(serde_json::Value::as_str), Some("registerHolder"));
        assert_eq!(
            json.get("holder").and_then(serde_json::Value::as_str),
            Some(holder_addr().to_hex().as_str())
        );
    }

    #[test]
    fn init_envelope_round_trip() {
        let msg = RelayMessage::InitEnvelope {
            holder: Some(holder_addr()),
            guardian: Some(guardian_addr()),
            envelope: EnvelopeWire {
                ciphertext_hex: "0xbeef".to_string(),
                nonce_hex: format!("0x{}", "cd".repeat(24)),
                counter: 0,
            },
        };
        let json = serde_json::to_string(&msg).unwrap();
        let back: RelayMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }

    #[test]
    fn relay_broadcast_bundle_without_holder_parses() {
        // What a holder connection receives after a guardian publishes.
        let json = r#"{
            "type": "bundle",
            "guardian": "0x2222222222222222222222222222222222222222",
            "bundle": {
                "identityPublicKeyHex": "0x00",
                "signedPrePublicKeyHex": "0x00",
                "timestampMillis": 0,
                "version": "1.0.0"
            }
        }"#;
        let msg: RelayMessage = serde_json::from_str(json).unwrap();
        match msg {
            RelayMessage::Bundle { holder, guardian, .. } => {
                assert!(holder.is_none());
                assert_eq!(guardian, Some(guardian_addr()));
            },
            _ => unreachable!("expected bundle message"),
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        let json = r#"{ "type": "shutdownEverything" }"#;
        assert!(serde_json::from_str::<RelayMessage>(json).is_err());
    }

    #[test]
    fn ack_role_serializes_lowercase() {
        let msg = RelayMessage::Ack { role: RelayRole::Guardian, holder: holder_addr(), guardian: Some(guardian_addr()) };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json.get("role").and_then(serde_json::Value::as_str), Some("guardian"));
    }
}
