//! Warden Recovery Core
//!
//! The commitment and policy layer of guardian-based wallet recovery,
//! built on the primitives in `warden-crypto` and the wire shapes in
//! `warden-proto`:
//!
//! - Salted Merkle trees over Keccak-256 ([`merkle`])
//! - Guardian commitments, policy roots, and recovery nullifiers
//!   ([`commitment`])
//! - Credentials with per-claim selective disclosure ([`credential`])
//! - Recovery policy and request artifacts ([`policy`])
//! - Wire-form bridging ([`codec`])
//!
//! Everything here is deterministic given its inputs; randomness
//! (salts, policy ids) and clocks are caller-supplied. On-chain calls
//! and proof-system integration consume the byte values this crate
//! produces but live outside it.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod codec;
pub mod commitment;
pub mod credential;
pub mod error;
pub mod merkle;
pub mod policy;

pub use commitment::{build_policy_root, commit_guardian, compute_nullifier, sort_by_address};
pub use credential::{DisclosedClaim, IssuedCredential, SALT_SIZE, claim_leaf, verify_disclosure};
pub use error::CoreError;
pub use merkle::{Hash, MerkleProof, Position, Sibling};
pub use policy::{
    GuardianDescriptor, POLICY_VERSION, RecoveryPolicy, RecoveryRequest, RecoveryRequestId,
    compute_recovery_request_id, generate_policy_id,
};
