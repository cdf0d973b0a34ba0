//! Warden Cryptographic Primitives
//!
//! Cryptographic building blocks for guardian-based wallet recovery.
//! Pure functions and explicit state values with deterministic outputs;
//! callers provide timestamps and nonce randomness so every operation
//! is reproducible under test.
//!
//! # Key Lifecycle
//!
//! A holder and each of its guardians establish a confidential channel
//! from a published public bundle alone — no prior shared secret and no
//! round trip:
//!
//! ```text
//! Identity / Pre-Key Bundles
//!        │
//!        ▼
//! X25519 Double-DH + HKDF(policy id) → Shared Secret
//!        │
//!        ├──▶ Ratchet Session → Message Keys → AEAD Envelopes
//!        │
//!        └──▶ Guardian Commitments / Recovery Nullifiers
//! ```
//!
//! The shared secret is scoped by a 32-byte policy identifier: secrets
//! for different recovery policies between the same two parties are
//! independent and unlinkable.
//!
//! # Security
//!
//! Forward Secrecy:
//! - Chain keys advance one-way after every message; old keys are
//!   zeroized immediately
//! - Message keys are used for exactly one AEAD operation
//!
//! Interoperability:
//! - All derivations are fixed constructions (Keccak-256, zero-salt
//!   HKDF-SHA256, fixed labels); holder and guardian run independent
//!   code instances and must agree bit-for-bit
//!
//! Authenticity:
//! - XChaCha20-Poly1305 rejects tampered envelopes; a failed tag is an
//!   explicit error, never an empty plaintext, and never fatal to the
//!   session

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod agreement;
pub mod error;
pub mod hash;
pub mod keys;
pub mod session;

pub use agreement::{
    POLICY_ID_SIZE, PolicyId, SHARED_SECRET_SIZE, SharedSecret, derive_as_initiator,
    derive_as_responder,
};
pub use error::CryptoError;
pub use hash::{HASH_SIZE, kdf, keccak256, keccak256_concat};
pub use keys::{BUNDLE_VERSION, IdentityKeyPair, KEY_SIZE, PreKeyBundle, PublicPreKeyBundle};
pub use session::{CHAIN_KEY_SIZE, Envelope, NONCE_SIZE, ROOT_KEY_SIZE, Role, SessionState};
pub use x25519_dalek::{PublicKey, StaticSecret};
