//! Warden Wire Formats
//!
//! External interface shapes for guardian-based wallet recovery: the
//! public bundle export, the envelope wire form, the relay routing
//! protocol, and the `0x`-hex alphabet everything is spelled in.
//!
//! This crate is data only. It performs no cryptography and no I/O;
//! `warden-core` bridges these shapes to and from the cryptographic
//! values in `warden-crypto`. Consumers on the other side of each
//! format are external collaborators: the directory/relay (bundles,
//! envelopes), on-chain policy registration (commitment lists), and a
//! ZK proof system's public-inputs array (nullifiers, policy roots).

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod address;
pub mod bundle;
pub mod encoding;
pub mod envelope;
pub mod error;
pub mod relay;

pub use address::{ADDRESS_SIZE, Address};
pub use bundle::BundleWire;
pub use encoding::{decode_0x, decode_0x_fixed, encode_0x};
pub use envelope::EnvelopeWire;
pub use error::ProtoError;
pub use relay::{RelayMessage, RelayRole};
