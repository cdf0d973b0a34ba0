//! Salted-claim credentials with selective disclosure
//!
//! An issuer turns a subject's attributes into per-claim Merkle leaves:
//! each claim is hashed together with a fresh random salt, and only the
//! root is published. The holder can later disclose any subset of
//! claims with their salts and proof paths; the salts keep undisclosed
//! sibling hashes from being dictionary-ground back to their values.
//!
//! Leaf derivation is fixed down to the byte because issuer, holder,
//! and verifier run independent code instances:
//!
//! ```text
//! leaf = keccak256(utf8(`{"k":<key>,"v":<value>,"salt":"0x…"}`))
//! ```
//!
//! with no whitespace and exactly that field order. Claims are ordered
//! by key (lexicographic byte order) to fix the leaf sequence.

use std::collections::BTreeMap;

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use warden_crypto::hash::keccak256;
use warden_proto::encode_0x;

use crate::error::CoreError;
use crate::merkle::{self, Hash, MerkleProof};

/// Size of a claim salt in bytes
pub const SALT_SIZE: usize = 16;

/// Claim key the subject identifier is stored under
pub const SUBJECT_ID_KEY: &str = "id";

/// Canonical leaf payload. Field order here is the wire byte order.
#[derive(Serialize)]
struct LeafPayload<'a> {
    k: &'a str,
    v: &'a Value,
    salt: &'a str,
}

/// Derive the leaf hash for one salted claim.
pub fn claim_leaf(key: &str, value: &Value, salt_hex: &str) -> Hash {
    let payload = LeafPayload { k: key, v: value, salt: salt_hex };
    let Ok(json) = serde_json::to_string(&payload) else {
        unreachable!("JSON values with string keys serialize infallibly");
    };
    keccak256(json.as_bytes())
}

/// A credential as the holder stores it: claims, their salts, and the
/// anchored root.
///
/// The root is what the issuer published; everything else stays with
/// the holder. `BTreeMap` keeps claims in key byte order, which is the
/// committed leaf order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCredential {
    claims: BTreeMap<String, Value>,
    salts: BTreeMap<String, String>,
    merkle_root: Hash,
}

/// One disclosed claim: enough for a verifier holding only the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisclosedClaim {
    /// Claim key
    pub key: String,
    /// Claim value
    pub value: Value,
    /// Salt as `0x`-hex
    pub salt_hex: String,
    /// Proof path to the credential root
    pub proof: MerkleProof,
}

impl IssuedCredential {
    /// Issue a credential over `subject_id` plus `attributes`.
    ///
    /// The subject identifier becomes the claim under
    /// [`SUBJECT_ID_KEY`], replacing any attribute with that key. Each
    /// claim gets a fresh 16-byte salt from `rng`.
    pub fn issue(
        subject_id: &str,
        attributes: impl IntoIterator<Item = (String, Value)>,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Self {
        let mut claims: BTreeMap<String, Value> = attributes.into_iter().collect();
        claims.insert(SUBJECT_ID_KEY.to_string(), Value::String(subject_id.to_string()));

        let mut salts = BTreeMap::new();
        for key in claims.keys() {
            let mut salt = [0u8; SALT_SIZE];
            rng.fill_bytes(&mut salt);
            salts.insert(key.clone(), encode_0x(&salt));
        }

        let Ok(leaves) = leaves_for(&claims, &salts) else {
            unreachable!("every claim was just salted");
        };
        let merkle_root = merkle::build_root(&leaves);
        Self { claims, salts, merkle_root }
    }

    /// Rebuild a credential from stored parts, checking the anchor.
    ///
    /// # Errors
    ///
    /// - `MissingSalt`: a claim has no salt to recompute its leaf with
    /// - `RootMismatch`: the claims and salts do not hash to
    ///   `merkle_root`, so the document was altered or mis-stored
    pub fn from_parts(
        claims: BTreeMap<String, Value>,
        salts: BTreeMap<String, String>,
        merkle_root: Hash,
    ) -> Result<Self, CoreError> {
        let leaves = leaves_for(&claims, &salts)?;
        let recomputed = merkle::build_root(&leaves);
        if recomputed != merkle_root {
            return Err(CoreError::RootMismatch {
                expected: encode_0x(&merkle_root),
                actual: encode_0x(&recomputed),
            });
        }
        Ok(Self { claims, salts, merkle_root })
    }

    /// The claims, in committed (key byte) order.
    pub fn claims(&self) -> &BTreeMap<String, Value> {
        &self.claims
    }

    /// Per-claim salts as `0x`-hex, keyed like [`Self::claims`].
    pub fn salts(&self) -> &BTreeMap<String, String> {
        &self.salts
    }

    /// The anchored credential root.
    pub fn merkle_root(&self) -> &Hash {
        &self.merkle_root
    }

    /// Disclose the claims named by `keys`, with proofs.
    ///
    /// Undisclosed claims contribute only interior hashes to the
    /// returned proofs; their values and salts stay private.
    ///
    /// # Errors
    ///
    /// - `UnknownClaim`: a requested key is not in the credential
    /// - `RootMismatch`: stored claims no longer hash to the anchored
    ///   root; no proof is emitted in that state
    pub fn disclose(&self, keys: &[&str]) -> Result<Vec<DisclosedClaim>, CoreError> {
        let leaves = leaves_for(&self.claims, &self.salts)?;
        let recomputed = merkle::build_root(&leaves);
        if recomputed != self.merkle_root {
            return Err(CoreError::RootMismatch {
                expected: encode_0x(&self.merkle_root),
                actual: encode_0x(&recomputed),
            });
        }

        let ordered_keys: Vec<&String> = self.claims.keys().collect();
        let mut disclosed = Vec::with_capacity(keys.len());
        for &key in keys {
            let index = ordered_keys
                .iter()
                .position(|k| k.as_str() == key)
                .ok_or_else(|| CoreError::UnknownClaim { key: key.to_string() })?;
            let (value, salt_hex) = match (self.claims.get(key), self.salts.get(key)) {
                (Some(value), Some(salt)) => (value.clone(), salt.clone()),
                _ => unreachable!("key was found in the ordered claim list"),
            };
            let proof = merkle::build_proof(&leaves, index)?;
            disclosed.push(DisclosedClaim { key: key.to_string(), value, salt_hex, proof });
        }
        Ok(disclosed)
    }
}

/// Verify one disclosed claim against a published root.
///
/// Boolean per claim; verifying a batch is a loop over this, and one
/// failing claim says nothing about the others.
pub fn verify_disclosure(claim: &DisclosedClaim, root: &Hash) -> bool {
    let leaf = claim_leaf(&claim.key, &claim.value, &claim.salt_hex);
    merkle::verify(&leaf, &claim.proof, root)
}

/// Leaf sequence for a claim set, in key byte order.
fn leaves_for(
    claims: &BTreeMap<String, Value>,
    salts: &BTreeMap<String, String>,
) -> Result<Vec<Hash>, CoreError> {
    claims
        .iter()
        .map(|(key, value)| {
            let salt = salts
                .get(key)
                .ok_or_else(|| CoreError::MissingSalt { key: key.clone() })?;
            Ok(claim_leaf(key, value, salt))
        })
        .collect()
}
