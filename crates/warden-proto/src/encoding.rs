//! `0x`-prefixed hex encoding
//!
//! Every byte value that crosses a wire boundary — keys, hashes,
//! nonces, ciphertexts, addresses — travels as a `0x`-prefixed
//! lowercase hex string. Decoding accepts either digit case but
//! requires the prefix; encoding always emits lowercase.

use crate::error::ProtoError;

/// Encode bytes as a `0x`-prefixed lowercase hex string.
pub fn encode_0x(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode a `0x`-prefixed hex string into bytes.
///
/// # Errors
///
/// - `MalformedHex`: missing prefix, odd digit count, or a non-hex
///   character
pub fn decode_0x(input: &str) -> Result<Vec<u8>, ProtoError> {
    let digits = input
        .strip_prefix("0x")
        .ok_or_else(|| ProtoError::MalformedHex { reason: "missing 0x prefix".to_string() })?;
    hex::decode(digits).map_err(|e| ProtoError::MalformedHex { reason: e.to_string() })
}

/// Decode a `0x`-prefixed hex string into exactly `N` bytes.
///
/// # Errors
///
/// - `MalformedHex`: not valid `0x`-hex
/// - `InvalidLength`: decoded to a length other than `N`
pub fn decode_0x_fixed<const N: usize>(input: &str) -> Result<[u8; N], ProtoError> {
    let bytes = decode_0x(input)?;
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| ProtoError::InvalidLength { expected: N, actual })
}
