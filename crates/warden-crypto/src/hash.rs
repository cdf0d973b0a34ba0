//! Hash and key-derivation primitives
//!
//! Two functions carry the whole system: Keccak-256 (the Ethereum
//! variant, not NIST SHA3-256) for every commitment, Merkle node, and
//! nullifier, and a zero-salt HKDF-SHA256 for all key derivation.
//!
//! Both are deterministic and side-effect free. Holder and guardian run
//! independent code instances, so two implementations of this module
//! must produce bit-identical outputs for identical inputs. The HKDF
//! extract step uses a fixed all-zero 32-byte salt; the `info` parameter
//! is the domain-separation label.

use hkdf::Hkdf;
use sha2::Sha256;
use sha3::{Digest, Keccak256};

use crate::error::CryptoError;

/// Size of a hash output in bytes
pub const HASH_SIZE: usize = 32;

/// Fixed extract salt for the KDF (32 zero bytes)
const KDF_SALT: [u8; 32] = [0u8; 32];

/// Compute the Keccak-256 digest of a byte string.
pub fn keccak256(bytes: &[u8]) -> [u8; HASH_SIZE] {
    let mut hasher = Keccak256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

/// Compute the Keccak-256 digest of the tight concatenation of `parts`.
///
/// Equivalent to hashing `parts[0] || parts[1] || ...` with no length
/// prefixes or separators (solidity-packed encoding).
pub fn keccak256_concat(parts: &[&[u8]]) -> [u8; HASH_SIZE] {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Derive `out_len` bytes from `secret` with `info` as the
/// domain-separation label.
///
/// HKDF-SHA256: extract with the fixed zero salt, expand with `info`.
///
/// # Errors
///
/// - `KdfOutputTooLong`: `out_len` exceeds the HKDF-SHA256 expansion
///   limit of 255 * 32 bytes
pub fn kdf(secret: &[u8], info: &[u8], out_len: usize) -> Result<Vec<u8>, CryptoError> {
    let hkdf = Hkdf::<Sha256>::new(Some(&KDF_SALT), secret);
    let mut output = vec![0u8; out_len];
    hkdf.expand(info, &mut output)
        .map_err(|_| CryptoError::KdfOutputTooLong { requested: out_len })?;
    Ok(output)
}

/// Derive a fixed-size array from `secret` with `info` as the label.
///
/// Same construction as [`kdf`], for the short fixed lengths the session
/// and agreement code requests (at most 64 bytes, always valid).
pub(crate) fn kdf_array<const N: usize>(secret: &[u8], info: &[u8]) -> [u8; N] {
    let hkdf = Hkdf::<Sha256>::new(Some(&KDF_SALT), secret);
    let mut output = [0u8; N];
    let Ok(()) = hkdf.expand(info, &mut output) else {
        unreachable!("fixed output lengths are valid for HKDF-SHA256");
    };
    output
}
