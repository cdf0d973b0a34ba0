//! Recovery policy and request artifacts
//!
//! A recovery policy fixes the guardian set and approval threshold for
//! one wallet. Its identifier seeds every per-guardian key agreement,
//! and a recovery request derives its identifier from the policy id, a
//! nonce, and the replacement public key. Both identifiers are the byte
//! values on-chain registration and verification consume; the chain
//! calls themselves live outside this crate.
//!
//! Identifier derivations take caller-supplied randomness and clocks so
//! they are reproducible under test.

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use warden_crypto::PolicyId;
use warden_crypto::hash::{HASH_SIZE, keccak256, keccak256_concat};
use warden_proto::encode_0x;

use crate::error::CoreError;

/// Policy format version stamped into freshly created policies
pub const POLICY_VERSION: &str = "1.0.0";

/// Fixed-width recovery-request identifier.
///
/// Scopes nullifiers to a single recovery attempt: the same guardian
/// approving two different requests produces unlinkable nullifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryRequestId([u8; HASH_SIZE]);

impl RecoveryRequestId {
    /// Wrap raw request identifier bytes.
    pub fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }

    /// Raw identifier bytes.
    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    /// Identifier as `0x`-hex.
    pub fn to_hex(&self) -> String {
        encode_0x(&self.0)
    }
}

/// Public descriptor of one guardian within a policy.
///
/// Carries no addresses or keys: the pseudonym commitment is the only
/// link to the guardian's identity, and the channel reference is an
/// opaque routing hint for the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuardianDescriptor {
    /// Commitment to the guardian's pseudonymous identity
    pub pseudonym_commitment: String,
    /// Opaque channel routing reference
    pub channel_ref: String,
    /// Capability labels (e.g. "approve", "veto")
    pub capabilities: Vec<String>,
}

/// A wallet's recovery policy: guardian set plus approval threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryPolicy {
    /// Policy identifier, the key-agreement domain separator
    pub policy_id: PolicyId,
    /// Number of guardian approvals required
    pub threshold: u32,
    /// Total number of guardians in the set
    pub total_guardians: u32,
    /// One descriptor per guardian
    pub guardian_descriptors: Vec<GuardianDescriptor>,
    /// Policy format version
    pub version: String,
    /// Creation time, Unix seconds
    pub created_at: u64,
    /// Optional creator signature over the policy, carried opaquely
    pub policy_signature: Option<String>,
}

impl RecoveryPolicy {
    /// Assemble a policy, validating its threshold arithmetic.
    ///
    /// # Errors
    ///
    /// - `InvalidPolicy`: `threshold` is zero, exceeds `total_guardians`,
    ///   or `total_guardians` disagrees with the descriptor count
    pub fn new(
        policy_id: PolicyId,
        threshold: u32,
        guardian_descriptors: Vec<GuardianDescriptor>,
        created_at: u64,
    ) -> Result<Self, CoreError> {
        let total_guardians = u32::try_from(guardian_descriptors.len()).map_err(|_| {
            CoreError::InvalidPolicy { reason: "guardian set too large".to_string() }
        })?;
        if threshold == 0 {
            return Err(CoreError::InvalidPolicy { reason: "threshold must be at least 1".to_string() });
        }
        if threshold > total_guardians {
            return Err(CoreError::InvalidPolicy {
                reason: format!("threshold {threshold} exceeds guardian count {total_guardians}"),
            });
        }
        Ok(Self {
            policy_id,
            threshold,
            total_guardians,
            guardian_descriptors,
            version: POLICY_VERSION.to_string(),
            created_at,
            policy_signature: None,
        })
    }
}

/// A request to rotate the wallet key under a policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryRequest {
    /// Policy this request runs under
    pub policy_id: PolicyId,
    /// Derived request identifier
    pub request_id: RecoveryRequestId,
    /// Replacement public key, caller-encoded
    pub new_pub_key: String,
    /// Uniqueness nonce
    pub nonce: String,
    /// Creation time, Unix seconds
    pub timestamp: u64,
    /// Optional requester signature, carried opaquely
    pub request_signature: Option<String>,
}

impl RecoveryRequest {
    /// Assemble a request, deriving its identifier.
    pub fn new(policy_id: PolicyId, new_pub_key: String, nonce: String, timestamp: u64) -> Self {
        let request_id = compute_recovery_request_id(&policy_id, &nonce, &new_pub_key);
        Self { policy_id, request_id, new_pub_key, nonce, timestamp, request_signature: None }
    }
}

/// Generate a fresh policy identifier.
///
/// `keccak256(random_32 || decimal_timestamp)`: 32 random bytes
/// followed by the UTF-8 decimal rendering of `timestamp_millis`. The
/// random bytes make the id unpredictable; the timestamp is a
/// collision backstop, not a secret.
pub fn generate_policy_id(rng: &mut (impl RngCore + CryptoRng), timestamp_millis: u64) -> PolicyId {
    let mut random = [0u8; 32];
    rng.fill_bytes(&mut random);
    let timestamp = timestamp_millis.to_string();
    PolicyId::new(keccak256_concat(&[&random, timestamp.as_bytes()]))
}

/// Derive the request identifier from its binding inputs.
///
/// `keccak256(utf8(json))` where the JSON is exactly
/// `{"policyId":"0x…","nonce":…,"newPubKey":…}` in that field order.
/// Holder, guardians, and the on-chain verifier all recompute this, so
/// the serialization is fixed.
pub fn compute_recovery_request_id(
    policy_id: &PolicyId,
    nonce: &str,
    new_pub_key: &str,
) -> RecoveryRequestId {
    #[derive(Serialize)]
    struct Payload<'a> {
        #[serde(rename = "policyId")]
        policy_id: &'a str,
        nonce: &'a str,
        #[serde(rename = "newPubKey")]
        new_pub_key: &'a str,
    }

    let policy_hex = encode_0x(policy_id.as_bytes());
    let payload = Payload { policy_id: &policy_hex, nonce, new_pub_key };
    let Ok(json) = serde_json::to_string(&payload) else {
        unreachable!("string-field struct serialization cannot fail");
    };
    RecoveryRequestId(keccak256(json.as_bytes()))
}
