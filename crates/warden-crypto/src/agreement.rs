//! Policy-scoped key agreement
//!
//! A holder and a guardian derive the same 32-byte shared secret from a
//! published public bundle alone: two X25519 computations, concatenated
//! and fed through the KDF with the policy identifier as the
//! domain-separation label. No round trip is required — either side can
//! compute its half whenever it has the peer's bundle (the bundle is
//! the only transmitted artifact).
//!
//! Initiator side (holder, peer bundle in hand):
//!
//! ```text
//! dh1 = ECDH(identity.secret, peer.signed_pre_public)
//! dh2 = ECDH(identity.secret, peer.identity_public)
//! secret = kdf(dh1 || dh2, policy_id, 32)
//! ```
//!
//! Responder side (guardian, own bundle secret in hand):
//!
//! ```text
//! dh1 = ECDH(signed_pre.secret, peer_identity_public)
//! dh2 = ECDH(identity.secret, peer_identity_public)
//! secret = kdf(dh1 || dh2, policy_id, 32)
//! ```
//!
//! X25519 commutativity makes both sides agree byte-for-byte. Secrets
//! derived under different policy identifiers are independent: the same
//! two parties get unlinkable channels per recovery policy.

use x25519_dalek::PublicKey;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;
use crate::hash::kdf_array;
use crate::keys::{IdentityKeyPair, PreKeyBundle, PublicPreKeyBundle};

/// Size of a shared secret in bytes
pub const SHARED_SECRET_SIZE: usize = 32;

/// Size of a policy identifier in bytes
pub const POLICY_ID_SIZE: usize = 32;

/// Fixed-width recovery-policy identifier.
///
/// Used as the KDF domain separator so that secrets for different
/// policies between the same two parties are unlinkable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PolicyId([u8; POLICY_ID_SIZE]);

impl PolicyId {
    /// Wrap raw policy identifier bytes.
    pub fn new(bytes: [u8; POLICY_ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// Parse a policy identifier from a byte slice.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength`: `bytes` is not exactly 32 bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; POLICY_ID_SIZE] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidKeyLength { expected: POLICY_ID_SIZE, actual: bytes.len() }
        })?;
        Ok(Self(arr))
    }

    /// Raw identifier bytes.
    pub fn as_bytes(&self) -> &[u8; POLICY_ID_SIZE] {
        &self.0
    }
}

/// Shared channel secret between a holder and a guardian.
///
/// Derived once per (holder, guardian, policy) triple. Zeroized on
/// drop; never persisted in plaintext beyond the session or commitment
/// that consumes it.
#[derive(Clone, ZeroizeOnDrop)]
pub struct SharedSecret([u8; SHARED_SECRET_SIZE]);

impl SharedSecret {
    /// Raw secret bytes.
    pub fn as_bytes(&self) -> &[u8; SHARED_SECRET_SIZE] {
        &self.0
    }
}

/// Derive the shared secret as the initiating side (holder).
pub fn derive_as_initiator(
    own_identity: &IdentityKeyPair,
    peer_bundle: &PublicPreKeyBundle,
    policy_id: &PolicyId,
) -> SharedSecret {
    let dh1 = own_identity.secret().diffie_hellman(&peer_bundle.signed_pre_public);
    let dh2 = own_identity.secret().diffie_hellman(&peer_bundle.identity_public);
    derive_from_dh(dh1.as_bytes(), dh2.as_bytes(), policy_id)
}

/// Derive the shared secret as the responding side (guardian).
pub fn derive_as_responder(
    own_bundle: &PreKeyBundle,
    peer_identity_public: &PublicKey,
    policy_id: &PolicyId,
) -> SharedSecret {
    let dh1 = own_bundle.signed_pre().secret().diffie_hellman(peer_identity_public);
    let dh2 = own_bundle.identity().secret().diffie_hellman(peer_identity_public);
    derive_from_dh(dh1.as_bytes(), dh2.as_bytes(), policy_id)
}

/// Concatenate the two DH outputs and run the KDF with the policy id as
/// the domain-separation label. The concatenation buffer is zeroized
/// before returning.
fn derive_from_dh(dh1: &[u8; 32], dh2: &[u8; 32], policy_id: &PolicyId) -> SharedSecret {
    let mut ikm = [0u8; 64];
    ikm[..32].copy_from_slice(dh1);
    ikm[32..].copy_from_slice(dh2);

    let secret: [u8; SHARED_SECRET_SIZE] = kdf_array(&ikm, policy_id.as_bytes());
    ikm.zeroize();

    SharedSecret(secret)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_policy(last_byte: u8) -> PolicyId {
        let mut id = [0u8; POLICY_ID_SIZE];
        id[POLICY_ID_SIZE - 1] = last_byte;
        PolicyId::new(id)
    }

    #[test]
    fn both_sides_derive_the_same_secret() {
        let holder_identity = IdentityKeyPair::generate();
        let guardian_bundle = PreKeyBundle::generate(0);
        let policy = test_policy(0x01);

        let holder_secret =
            derive_as_initiator(&holder_identity, &guardian_bundle.to_public(), &policy);
        let guardian_secret =
            derive_as_responder(&guardian_bundle, &holder_identity.public(), &policy);

        assert_eq!(holder_secret.as_bytes(), guardian_secret.as_bytes());
    }

    #[test]
    fn different_policies_produce_independent_secrets() {
        let holder_identity = IdentityKeyPair::generate();
        let guardian_bundle = PreKeyBundle::generate(0);

        let secret_a = derive_as_initiator(
            &holder_identity,
            &guardian_bundle.to_public(),
            &test_policy(0x01),
        );
        let secret_b = derive_as_initiator(
            &holder_identity,
            &guardian_bundle.to_public(),
            &test_policy(0x02),
        );

        assert_ne!(secret_a.as_bytes(), secret_b.as_bytes());
    }

    #[test]
    fn different_guardians_produce_independent_secrets() {
        let holder_identity = IdentityKeyPair::generate();
        let policy = test_policy(0x01);

        let secret_a = derive_as_initiator(
            &holder_identity,
            &PreKeyBundle::generate(0).to_public(),
            &policy,
        );
        let secret_b = derive_as_initiator(
            &holder_identity,
            &PreKeyBundle::generate(0).to_public(),
            &policy,
        );

        assert_ne!(secret_a.as_bytes(), secret_b.as_bytes());
    }

    #[test]
    fn derivation_is_deterministic() {
        let holder_identity = IdentityKeyPair::generate();
        let guardian_bundle = PreKeyBundle::generate(0);
        let policy = test_policy(0x01);

        let first = derive_as_initiator(&holder_identity, &guardian_bundle.to_public(), &policy);
        let second = derive_as_initiator(&holder_identity, &guardian_bundle.to_public(), &policy);

        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn policy_id_rejects_wrong_length() {
        assert!(matches!(
            PolicyId::from_bytes(&[0u8; 31]),
            Err(CryptoError::InvalidKeyLength { expected: 32, actual: 31 })
        ));
    }
}
