//! Identity keys and pre-key bundles
//!
//! Each actor (holder or guardian) owns a long-term X25519 identity key
//! pair plus a per-epoch pre-key bundle containing a second, signed-pre
//! key pair. The public subset of a bundle is published to a directory
//! or relay; the secret form never leaves the actor.
//!
//! Secret scalars are zeroized on drop (`x25519-dalek` does this for
//! `StaticSecret`); the secret form of a bundle is never serialized for
//! another party.

use rand::rngs::OsRng;
use x25519_dalek::{PublicKey, StaticSecret};

use crate::error::CryptoError;

/// Size of an X25519 key (public or secret) in bytes
pub const KEY_SIZE: usize = 32;

/// Bundle format version stamped into freshly generated bundles
pub const BUNDLE_VERSION: &str = "1.0.0";

/// Long-term X25519 identity key pair.
///
/// Owned exclusively by its holder. The secret scalar is available as
/// raw bytes only for local storage; it is never part of any wire form.
#[derive(Clone)]
pub struct IdentityKeyPair {
    secret: StaticSecret,
}

impl IdentityKeyPair {
    /// Generate a new random identity key pair.
    pub fn generate() -> Self {
        Self { secret: StaticSecret::random_from_rng(&mut OsRng) }
    }

    /// Rebuild a key pair from a stored 32-byte secret scalar.
    ///
    /// # Errors
    ///
    /// - `InvalidKeyLength`: `bytes` is not exactly 32 bytes
    pub fn from_secret_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength { expected: KEY_SIZE, actual: bytes.len() })?;
        Ok(Self { secret: StaticSecret::from(arr) })
    }

    /// Public half of the key pair.
    pub fn public(&self) -> PublicKey {
        PublicKey::from(&self.secret)
    }

    /// Secret scalar, for Diffie-Hellman operations.
    pub fn secret(&self) -> &StaticSecret {
        &self.secret
    }

    /// Export the secret scalar for local storage.
    pub fn secret_bytes(&self) -> [u8; KEY_SIZE] {
        self.secret.to_bytes()
    }
}

/// Per-epoch pre-key bundle, secret form.
///
/// Contains the actor's identity pair and a signed-pre pair. Created
/// once per epoch and retained locally for that epoch's lifetime; only
/// the [`PublicPreKeyBundle`] projection is ever published.
#[derive(Clone)]
pub struct PreKeyBundle {
    identity: IdentityKeyPair,
    signed_pre: IdentityKeyPair,
    signature: Option<Vec<u8>>,
    timestamp_millis: u64,
    version: String,
}

impl PreKeyBundle {
    /// Generate a fresh bundle with two random key pairs.
    ///
    /// `timestamp_millis` is caller-supplied (Unix milliseconds); the
    /// crypto layer takes no clock of its own.
    pub fn generate(timestamp_millis: u64) -> Self {
        Self {
            identity: IdentityKeyPair::generate(),
            signed_pre: IdentityKeyPair::generate(),
            signature: None,
            timestamp_millis,
            version: BUNDLE_VERSION.to_string(),
        }
    }

    /// Rebuild a bundle from stored parts.
    pub fn from_parts(
        identity: IdentityKeyPair,
        signed_pre: IdentityKeyPair,
        signature: Option<Vec<u8>>,
        timestamp_millis: u64,
        version: String,
    ) -> Self {
        Self { identity, signed_pre, signature, timestamp_millis, version }
    }

    /// The identity key pair.
    pub fn identity(&self) -> &IdentityKeyPair {
        &self.identity
    }

    /// The signed-pre key pair.
    pub fn signed_pre(&self) -> &IdentityKeyPair {
        &self.signed_pre
    }

    /// Creation timestamp in Unix milliseconds.
    pub fn timestamp_millis(&self) -> u64 {
        self.timestamp_millis
    }

    /// Bundle format version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Strip the private scalars, producing the publishable subset.
    pub fn to_public(&self) -> PublicPreKeyBundle {
        PublicPreKeyBundle {
            identity_public: self.identity.public(),
            signed_pre_public: self.signed_pre.public(),
            signature: self.signature.clone(),
            timestamp_millis: self.timestamp_millis,
            version: self.version.clone(),
        }
    }
}

/// Public subset of a pre-key bundle, safe to publish.
///
/// The `signature` field is carried opaquely: bundle authentication is
/// out of band and this crate neither produces nor verifies it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicPreKeyBundle {
    /// Public identity key
    pub identity_public: PublicKey,
    /// Public signed-pre key
    pub signed_pre_public: PublicKey,
    /// Optional signature over the bundle, carried opaquely
    pub signature: Option<Vec<u8>>,
    /// Creation timestamp in Unix milliseconds
    pub timestamp_millis: u64,
    /// Bundle format version
    pub version: String,
}
