//! Bridging between cryptographic values and wire forms
//!
//! `warden-crypto` works in raw bytes and typed state; `warden-proto`
//! ships `0x`-hex JSON. This module is the only place the two meet:
//! export functions are infallible projections, import functions
//! validate lengths strictly and surface `CoreError` on anything
//! malformed. No cryptography happens here.

use serde::{Deserialize, Serialize};
use warden_crypto::session::NONCE_SIZE;
use warden_crypto::{Envelope, PolicyId, PreKeyBundle, PublicKey, PublicPreKeyBundle};
use warden_proto::{BundleWire, EnvelopeWire, decode_0x, decode_0x_fixed, encode_0x};

use crate::error::CoreError;
use crate::merkle::Hash;
use crate::policy::{GuardianDescriptor, RecoveryPolicy};

/// Project a secret bundle to its publishable wire form.
pub fn export_bundle(bundle: &PreKeyBundle) -> BundleWire {
    export_public_bundle(&bundle.to_public())
}

/// Encode a public bundle for publication.
pub fn export_public_bundle(bundle: &PublicPreKeyBundle) -> BundleWire {
    BundleWire {
        identity_public_key_hex: encode_0x(bundle.identity_public.as_bytes()),
        signed_pre_public_key_hex: encode_0x(bundle.signed_pre_public.as_bytes()),
        signature: bundle.signature.as_deref().map(encode_0x),
        timestamp_millis: bundle.timestamp_millis,
        version: bundle.version.clone(),
    }
}

/// Decode a published bundle.
///
/// # Errors
///
/// - `Proto`: a key field is not `0x`-hex or not exactly 32 bytes, or
///   the signature is not valid hex
pub fn import_bundle(wire: &BundleWire) -> Result<PublicPreKeyBundle, CoreError> {
    let identity: [u8; 32] = decode_0x_fixed(&wire.identity_public_key_hex)?;
    let signed_pre: [u8; 32] = decode_0x_fixed(&wire.signed_pre_public_key_hex)?;
    let signature = wire.signature.as_deref().map(decode_0x).transpose()?;
    Ok(PublicPreKeyBundle {
        identity_public: PublicKey::from(identity),
        signed_pre_public: PublicKey::from(signed_pre),
        signature,
        timestamp_millis: wire.timestamp_millis,
        version: wire.version.clone(),
    })
}

/// Encode an envelope for the relay.
pub fn export_envelope(envelope: &Envelope) -> EnvelopeWire {
    EnvelopeWire {
        ciphertext_hex: encode_0x(&envelope.ciphertext),
        nonce_hex: encode_0x(&envelope.nonce),
        counter: envelope.counter,
    }
}

/// Decode a relay-carried envelope.
///
/// # Errors
///
/// - `Proto`: ciphertext is not `0x`-hex, or the nonce is not exactly
///   24 bytes of it
pub fn import_envelope(wire: &EnvelopeWire) -> Result<Envelope, CoreError> {
    let ciphertext = decode_0x(&wire.ciphertext_hex)?;
    let nonce: [u8; NONCE_SIZE] = decode_0x_fixed(&wire.nonce_hex)?;
    Ok(Envelope { ciphertext, nonce, counter: wire.counter })
}

/// Encode a 32-byte value (commitment, root, or nullifier) as `0x`-hex.
pub fn export_hash(hash: &Hash) -> String {
    encode_0x(hash)
}

/// Decode a 32-byte `0x`-hex value.
///
/// # Errors
///
/// - `Proto`: not `0x`-hex or not exactly 32 bytes
pub fn import_hash(hex: &str) -> Result<Hash, CoreError> {
    Ok(decode_0x_fixed(hex)?)
}

/// Encode a commitment list in its registered order.
pub fn export_commitments(commitments: &[Hash]) -> Vec<String> {
    commitments.iter().map(|c| encode_0x(c)).collect()
}

/// Decode a registered commitment list, preserving order.
///
/// # Errors
///
/// - `Proto`: any entry is not 32 bytes of `0x`-hex
pub fn import_commitments(entries: &[String]) -> Result<Vec<Hash>, CoreError> {
    entries.iter().map(|entry| import_hash(entry)).collect()
}

/// Encode a policy identifier as `0x`-hex.
pub fn export_policy_id(policy_id: &PolicyId) -> String {
    encode_0x(policy_id.as_bytes())
}

/// Decode a `0x`-hex policy identifier.
///
/// # Errors
///
/// - `Proto`: not `0x`-hex or not exactly 32 bytes
pub fn import_policy_id(hex: &str) -> Result<PolicyId, CoreError> {
    Ok(PolicyId::new(decode_0x_fixed(hex)?))
}

/// Recovery policy document as exported and imported by wallets.
///
/// ```json
/// {
///   "policyId": "0x…",
///   "threshold": 3,
///   "totalGuardians": 5,
///   "guardianDescriptors": [ … ],
///   "version": "1.0.0",
///   "createdAt": 1700000000
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyWire {
    /// Policy identifier, 32 bytes of `0x`-hex
    pub policy_id: String,
    /// Approvals required
    pub threshold: u32,
    /// Guardian count
    pub total_guardians: u32,
    /// One descriptor per guardian
    pub guardian_descriptors: Vec<GuardianDescriptor>,
    /// Policy format version
    pub version: String,
    /// Creation time, Unix seconds
    pub created_at: u64,
    /// Optional creator signature, carried opaquely
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub policy_signature: Option<String>,
}

/// Encode a policy as its exportable document.
pub fn export_policy(policy: &RecoveryPolicy) -> PolicyWire {
    PolicyWire {
        policy_id: export_policy_id(&policy.policy_id),
        threshold: policy.threshold,
        total_guardians: policy.total_guardians,
        guardian_descriptors: policy.guardian_descriptors.clone(),
        version: policy.version.clone(),
        created_at: policy.created_at,
        policy_signature: policy.policy_signature.clone(),
    }
}

/// Decode and revalidate an imported policy document.
///
/// # Errors
///
/// - `Proto`: the policy id is malformed
/// - `InvalidPolicy`: the threshold arithmetic does not hold, or
///   `totalGuardians` disagrees with the descriptor list
pub fn import_policy(wire: &PolicyWire) -> Result<RecoveryPolicy, CoreError> {
    let policy_id = import_policy_id(&wire.policy_id)?;
    let mut policy =
        RecoveryPolicy::new(policy_id, wire.threshold, wire.guardian_descriptors.clone(), wire.created_at)?;
    if policy.total_guardians != wire.total_guardians {
        return Err(CoreError::InvalidPolicy {
            reason: format!(
                "totalGuardians {} disagrees with {} descriptors",
                wire.total_guardians, policy.total_guardians
            ),
        });
    }
    policy.version = wire.version.clone();
    policy.policy_signature = wire.policy_signature.clone();
    Ok(policy)
}
