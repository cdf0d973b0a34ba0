//! Guardian commitments and recovery nullifiers
//!
//! A guardian's on-chain presence is a single hash binding its address
//! to the channel secret it shares with the holder. The commitments of
//! all guardians form the Merkle policy root that a recovery proof is
//! verified against. At recovery time the same secret yields a
//! nullifier scoped to one recovery request, so each guardian approves
//! a given request at most once without revealing which guardian it is.
//!
//! All three values are Keccak-256 over tight concatenations, matching
//! the solidity-packed encoding an on-chain verifier recomputes.

use warden_crypto::SharedSecret;
use warden_crypto::hash::keccak256_concat;
use warden_proto::Address;

use crate::merkle::{self, Hash};
use crate::policy::RecoveryRequestId;

/// Commit a guardian's address to its channel secret.
///
/// `keccak256(address || secret)`: 20 address bytes, then the 32 secret
/// bytes. Hiding holds as long as the secret does; binding is collision
/// resistance of the hash.
pub fn commit_guardian(address: &Address, secret: &SharedSecret) -> Hash {
    keccak256_concat(&[address.as_bytes(), secret.as_bytes()])
}

/// Order commitment entries canonically by guardian address.
///
/// Both the holder (building the root) and any verifier (recomputing
/// it) must agree on leaf order; byte order of the addresses is the
/// canonical choice.
pub fn sort_by_address(entries: &mut [(Address, Hash)]) {
    entries.sort_by_key(|(address, _)| *address);
}

/// Build the policy root over an already-ordered commitment list.
pub fn build_policy_root(commitments: &[Hash]) -> Hash {
    merkle::build_root(commitments)
}

/// Derive the nullifier for one guardian approving one request.
///
/// `keccak256(secret || request_id)`. Deterministic per (guardian,
/// request) pair: a second approval of the same request produces the
/// same nullifier and is rejected as a double-vote, while approvals of
/// different requests are unlinkable.
pub fn compute_nullifier(secret: &SharedSecret, request_id: &RecoveryRequestId) -> Hash {
    keccak256_concat(&[secret.as_bytes(), request_id.as_bytes()])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use warden_crypto::{IdentityKeyPair, PolicyId, PreKeyBundle, derive_as_initiator};
    use warden_crypto::hash::keccak256;

    use super::*;

    fn channel_secret() -> SharedSecret {
        let holder = IdentityKeyPair::generate();
        let guardian = PreKeyBundle::generate(0);
        derive_as_initiator(&holder, &guardian.to_public(), &PolicyId::new([0x0a; 32]))
    }

    #[test]
    fn commitment_is_packed_keccak() {
        let address = Address::new([0x11; 20]);
        let secret = channel_secret();

        let mut packed = Vec::with_capacity(52);
        packed.extend_from_slice(address.as_bytes());
        packed.extend_from_slice(secret.as_bytes());
        assert_eq!(commit_guardian(&address, &secret), keccak256(&packed));
    }

    #[test]
    fn commitment_binds_both_inputs() {
        let secret = channel_secret();
        let other_secret = channel_secret();
        let a = commit_guardian(&Address::new([0x11; 20]), &secret);

        assert_ne!(a, commit_guardian(&Address::new([0x12; 20]), &secret));
        assert_ne!(a, commit_guardian(&Address::new([0x11; 20]), &other_secret));
    }

    #[test]
    fn sort_orders_by_address_bytes() {
        let mut entries = vec![
            (Address::new([0xcc; 20]), [3u8; 32]),
            (Address::new([0x01; 20]), [1u8; 32]),
            (Address::new([0xaa; 20]), [2u8; 32]),
        ];
        sort_by_address(&mut entries);
        let order: Vec<u8> = entries.iter().map(|(a, _)| a.as_bytes()[0]).collect();
        assert_eq!(order, vec![0x01, 0xaa, 0xcc]);
    }

    #[test]
    fn nullifier_is_stable_per_request_and_distinct_across_requests() {
        let secret = channel_secret();
        let first = RecoveryRequestId::new([0x01; 32]);
        let second = RecoveryRequestId::new([0x02; 32]);

        assert_eq!(compute_nullifier(&secret, &first), compute_nullifier(&secret, &first));
        assert_ne!(compute_nullifier(&secret, &first), compute_nullifier(&secret, &second));
    }

    #[test]
    fn nullifier_does_not_expose_the_commitment_preimage() {
        let address = Address::new([0x11; 20]);
        let secret = channel_secret();
        let request = RecoveryRequestId::new([0x05; 32]);
        assert_ne!(commit_guardian(&address, &secret), compute_nullifier(&secret, &request));
    }
}
