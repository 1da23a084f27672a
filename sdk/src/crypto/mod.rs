//! # Key Material and Signatures
//!
//! Ed25519 types for signing Meridian transactions. The SDK consumes
//! key material the caller already has (a wallet file, an environment
//! variable, an HSM export); it never generates keys and carries no
//! RNG. Key bytes enter through [`PrivateKey::from_bytes`] /
//! [`PrivateKey::from_hex`], are used to sign, and are never logged or
//! echoed back.

pub mod keys;

pub use keys::{KeyError, PrivateKey, PublicKey, Signature};
