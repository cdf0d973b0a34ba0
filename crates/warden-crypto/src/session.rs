//! Ratchet sessions over a shared secret
//!
//! Turns a [`SharedSecret`] into a bidirectional session with
//! independently advancing send and receive chains. Each message key is
//! derived from the current chain key and the message counter, used for
//! exactly one XChaCha20-Poly1305 operation, and the chain key is then
//! advanced one-way — a later chain-key leak never exposes past message
//! keys.
//!
//! # Mirrored state
//!
//! The two parties hold independent `SessionState` values that are
//! logically linked: one side's send chain starts equal to the other
//! side's receive chain. The swap happens once, at initialization, via
//! [`Role`] — the initiator takes the first 16-byte chunk of the key
//! schedule as its send chain, the responder takes it as its receive
//! chain. After that, both chains advance with the same one-way step,
//! so a receive chain tracks the peer's send chain in lock-step.
//!
//! # Ordering
//!
//! The session does not buffer or reorder. Callers must decrypt each
//! envelope exactly once, in counter order; an envelope whose counter
//! is not the next expected one is rejected as an ordering violation
//! without touching the chains. An envelope with the right counter but
//! a bad authentication tag still advances the receive chain (the slot
//! is consumed), and the failure is reported explicitly — a corrupted
//! message never kills the session and never decrypts to an empty
//! plaintext.

use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit},
};
use zeroize::Zeroize;

use crate::agreement::SharedSecret;
use crate::error::CryptoError;
use crate::hash::kdf_array;

/// Size of the session root key in bytes
pub const ROOT_KEY_SIZE: usize = 32;

/// Size of a chain key in bytes
pub const CHAIN_KEY_SIZE: usize = 16;

/// Size of an XChaCha20 nonce in bytes
pub const NONCE_SIZE: usize = 24;

/// Label for expanding a shared secret into the session key schedule
const SESSION_ROOT_INFO: &[u8] = b"session-root";

/// Label for the one-way chain advance.
///
/// Both directions advance with this label: a receive chain mirrors the
/// peer's send chain, so their derivation lineages must be identical.
const CHAIN_ADVANCE_LABEL: &[u8] = b"send";

/// Prefix for per-message key derivation; the decimal counter follows
const MESSAGE_KEY_PREFIX: &[u8] = b"msg";

/// Which side of the conversation a session was initialized as.
///
/// Determines the direction swap of the key schedule: the initiator's
/// send chain is the responder's receive chain and vice versa.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// The side that fetched the peer's bundle and derived the secret
    /// as initiator
    Initiator,
    /// The side whose published bundle was used; derived the secret as
    /// responder
    Responder,
}

/// An encrypted, counter-addressed message.
///
/// Immutable once produced. The counter lets the receiver detect
/// replays and ordering gaps; the relay carrying envelopes is
/// content-blind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Envelope {
    /// Ciphertext including the 16-byte Poly1305 tag
    pub ciphertext: Vec<u8>,
    /// The 24-byte XChaCha20 nonce used for this message
    pub nonce: [u8; NONCE_SIZE],
    /// Position of this message in the sender's chain
    pub counter: u64,
}

/// One side of an established conversation.
///
/// Owned exclusively by one actor; mutated only by [`encrypt`] and
/// [`decrypt`](SessionState::decrypt), which advance counters
/// monotonically and never roll back. There is no terminated state —
/// sessions are abandoned by dropping. Chain keys are zeroized on drop.
///
/// [`encrypt`]: SessionState::encrypt
pub struct SessionState {
    root_key: [u8; ROOT_KEY_SIZE],
    send_chain: [u8; CHAIN_KEY_SIZE],
    recv_chain: [u8; CHAIN_KEY_SIZE],
    send_counter: u64,
    recv_counter: u64,
    established: bool,
}

impl Drop for SessionState {
    fn drop(&mut self) {
        self.root_key.zeroize();
        self.send_chain.zeroize();
        self.recv_chain.zeroize();
    }
}

impl SessionState {
    /// Initialize a session from a shared secret.
    ///
    /// Expands `kdf(secret, "session-root", 64)`: bytes 0..32 become the
    /// root key, and the two 16-byte chunks after it become the chain
    /// keys, assigned by `role` so that the two sides mirror each other.
    pub fn init(shared_secret: &SharedSecret, role: Role) -> Self {
        let schedule: [u8; 64] = kdf_array(shared_secret.as_bytes(), SESSION_ROOT_INFO);

        let mut root_key = [0u8; ROOT_KEY_SIZE];
        root_key.copy_from_slice(&schedule[..32]);

        let mut first_chain = [0u8; CHAIN_KEY_SIZE];
        let mut second_chain = [0u8; CHAIN_KEY_SIZE];
        first_chain.copy_from_slice(&schedule[32..48]);
        second_chain.copy_from_slice(&schedule[48..64]);

        let (send_chain, recv_chain) = match role {
            Role::Initiator => (first_chain, second_chain),
            Role::Responder => (second_chain, first_chain),
        };

        Self {
            root_key,
            send_chain,
            recv_chain,
            send_counter: 0,
            recv_counter: 0,
            established: true,
        }
    }

    /// Whether the session has been initialized.
    pub fn established(&self) -> bool {
        self.established
    }

    /// Session root key.
    ///
    /// Not consumed by the symmetric ratchet itself; it is the anchor a
    /// future DH ratchet step would fold new entropy into.
    pub fn root_key(&self) -> &[u8; ROOT_KEY_SIZE] {
        &self.root_key
    }

    /// Counter of the next message this side will send.
    pub fn send_counter(&self) -> u64 {
        self.send_counter
    }

    /// Counter of the next envelope this side expects to receive.
    pub fn recv_counter(&self) -> u64 {
        self.recv_counter
    }

    /// Encrypt a message, producing the next envelope in this side's
    /// chain.
    ///
    /// `nonce` must be fresh cryptographically random bytes, supplied by
    /// the caller (deterministic tests provide fixed values). On return
    /// the send chain has advanced one-way and the counter incremented.
    ///
    /// # Errors
    ///
    /// - `CounterOverflow`: the send counter is exhausted
    pub fn encrypt(
        &mut self,
        plaintext: &[u8],
        nonce: [u8; NONCE_SIZE],
    ) -> Result<Envelope, CryptoError> {
        if self.send_counter == u64::MAX {
            return Err(CryptoError::CounterOverflow { current: self.send_counter });
        }

        let mut message_key = derive_message_key(&self.send_chain, self.send_counter);
        let cipher = XChaCha20Poly1305::new((&message_key).into());
        let Ok(ciphertext) = cipher.encrypt(XNonce::from_slice(&nonce), plaintext) else {
            unreachable!("XChaCha20-Poly1305 encryption cannot fail with valid inputs");
        };
        message_key.zeroize();

        let envelope = Envelope { ciphertext, nonce, counter: self.send_counter };

        advance_chain(&mut self.send_chain);
        self.send_counter += 1;

        Ok(envelope)
    }

    /// Decrypt the next envelope in the peer's chain.
    ///
    /// The receive chain and counter advance exactly once per attempted
    /// decrypt — success or authentication failure — keeping this side
    /// in lock-step with the peer's send chain.
    ///
    /// # Errors
    ///
    /// - `OrderingViolation`: the envelope's counter is not the next
    ///   expected one; state is untouched (caller sequencing bug)
    /// - `CounterOverflow`: the receive counter is exhausted
    /// - `AuthenticationFailed`: tag mismatch; the slot was consumed and
    ///   the session remains usable
    pub fn decrypt(&mut self, envelope: &Envelope) -> Result<Vec<u8>, CryptoError> {
        if envelope.counter != self.recv_counter {
            return Err(CryptoError::OrderingViolation {
                expected: self.recv_counter,
                actual: envelope.counter,
            });
        }
        if self.recv_counter == u64::MAX {
            return Err(CryptoError::CounterOverflow { current: self.recv_counter });
        }

        let mut message_key = derive_message_key(&self.recv_chain, envelope.counter);
        let cipher = XChaCha20Poly1305::new((&message_key).into());
        let result = cipher.decrypt(XNonce::from_slice(&envelope.nonce), envelope.ciphertext.as_slice());
        message_key.zeroize();

        // The slot is consumed whether or not the tag verified.
        advance_chain(&mut self.recv_chain);
        self.recv_counter += 1;

        result.map_err(|_| CryptoError::AuthenticationFailed)
    }
}

/// Derive the one-time message key for `counter` from a chain key.
///
/// Label is `"msg"` followed by the decimal counter, matching the wire
/// peers bit-for-bit.
fn derive_message_key(chain_key: &[u8; CHAIN_KEY_SIZE], counter: u64) -> [u8; 32] {
    let mut info = Vec::with_capacity(MESSAGE_KEY_PREFIX.len() + 20);
    info.extend_from_slice(MESSAGE_KEY_PREFIX);
    info.extend_from_slice(counter.to_string().as_bytes());
    kdf_array(chain_key, &info)
}

/// Advance a chain key one-way, overwriting the old key.
fn advance_chain(chain_key: &mut [u8; CHAIN_KEY_SIZE]) {
    let next: [u8; CHAIN_KEY_SIZE] = kdf_array(chain_key, CHAIN_ADVANCE_LABEL);
    chain_key.zeroize();
    *chain_key = next;
}
