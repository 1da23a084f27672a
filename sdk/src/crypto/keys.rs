//! Ed25519 private keys, public keys, and signatures.
//!
//! Ed25519 is the network's signature scheme: deterministic (RFC 8032),
//! 32-byte keys, 64-byte signatures. Determinism matters beyond taste
//! here, because a transaction body signed twice must produce identical
//! envelope bytes or downstream byte-equality checks fall apart.
//!
//! Key bytes are never logged. `Debug` on [`PrivateKey`] prints only
//! the derived public key. If you add logging to this module, leave the
//! secret half out of it.

use std::fmt;

use ed25519_dalek::{
    Signature as DalekSignature, Signer as _, SigningKey, Verifier as _, VerifyingKey,
};
use thiserror::Error;

use crate::config::{
    ED25519_PRIVATE_KEY_LENGTH, ED25519_PUBLIC_KEY_LENGTH, ED25519_SIGNATURE_LENGTH,
};

/// Errors raised while importing key material or signature bytes.
///
/// The variants stay vague about key contents on purpose. Error text
/// travels into logs, and logs are not a place for key bytes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    /// The byte length does not fit the scheme.
    #[error("invalid key material: expected {expected} bytes, got {actual}")]
    InvalidKeyMaterial { expected: usize, actual: usize },

    /// The hex form of the key could not be decoded at all.
    #[error("invalid key material: malformed hex encoding")]
    MalformedHex,

    /// The bytes have the right length but do not describe a point on
    /// the curve.
    #[error("invalid key material: not a valid Ed25519 public key")]
    InvalidPoint,

    /// A signature blob with the wrong length.
    #[error("invalid signature bytes: expected {expected} bytes, got {actual}")]
    InvalidSignatureBytes { expected: usize, actual: usize },
}

/// An Ed25519 signing key.
///
/// The 32 bytes behind this struct are the whole of an account's
/// authority. The type deliberately implements neither `Serialize` nor
/// `Clone`: exporting a private key should be an explicit act by the
/// caller, not a side effect of a struct being convenient to move
/// around.
pub struct PrivateKey {
    signing_key: SigningKey,
}

impl PrivateKey {
    /// Imports a key from its raw 32-byte form.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        let arr: [u8; ED25519_PRIVATE_KEY_LENGTH] =
            bytes.try_into().map_err(|_| KeyError::InvalidKeyMaterial {
                expected: ED25519_PRIVATE_KEY_LENGTH,
                actual: bytes.len(),
            })?;
        Ok(Self { signing_key: SigningKey::from_bytes(&arr) })
    }

    /// Imports a key from its hex transport form, the shape wallets and
    /// config files usually hand over.
    pub fn from_hex(text: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(text).map_err(|_| KeyError::MalformedHex)?;
        Self::from_bytes(&bytes)
    }

    /// The verifying half of this key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey { bytes: self.signing_key.verifying_key().to_bytes() }
    }

    /// Signs a message. Deterministic: the same key over the same bytes
    /// always yields the same 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature { bytes: self.signing_key.sign(message).to_bytes() }
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Public half only. A partial dump of the secret is still a dump.
        write!(f, "PrivateKey(pub={})", self.public_key().to_hex())
    }
}

/// An Ed25519 verifying key, safe to share and to embed in signature
/// maps as the public-key prefix.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey {
    bytes: [u8; ED25519_PUBLIC_KEY_LENGTH],
}

impl PublicKey {
    /// Wraps raw bytes after checking they describe a curve point.
    /// Degenerate encodings (off-curve, non-canonical) are refused so a
    /// `PublicKey` value is always verifiable against.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let arr: [u8; ED25519_PUBLIC_KEY_LENGTH] =
            slice.try_into().map_err(|_| KeyError::InvalidKeyMaterial {
                expected: ED25519_PUBLIC_KEY_LENGTH,
                actual: slice.len(),
            })?;
        VerifyingKey::from_bytes(&arr).map_err(|_| KeyError::InvalidPoint)?;
        Ok(Self { bytes: arr })
    }

    /// Parses the hex transport form.
    pub fn from_hex(text: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(text).map_err(|_| KeyError::MalformedHex)?;
        Self::try_from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ED25519_PUBLIC_KEY_LENGTH] {
        &self.bytes
    }

    /// The bytes that go into a signature pair's `publicKeyPrefix`
    /// field. The network matches stored keys by prefix; sending the
    /// full key is always unambiguous, so that is what we send.
    pub fn prefix(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Verifies a signature over a message. A plain boolean: callers
    /// almost always want yes/no, and the failure modes (bad signature,
    /// wrong key) are indistinguishable to them anyway.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let dalek = DalekSignature::from_bytes(&signature.bytes);
        verifying_key.verify(message, &dalek).is_ok()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", &self.to_hex()[..16])
    }
}

/// A 64-byte Ed25519 signature.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    bytes: [u8; ED25519_SIGNATURE_LENGTH],
}

impl Signature {
    pub fn from_bytes(bytes: [u8; ED25519_SIGNATURE_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Wraps a byte slice, refusing anything that is not exactly 64
    /// bytes.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let arr: [u8; ED25519_SIGNATURE_LENGTH] =
            slice.try_into().map_err(|_| KeyError::InvalidSignatureBytes {
                expected: ED25519_SIGNATURE_LENGTH,
                actual: slice.len(),
            })?;
        Ok(Self { bytes: arr })
    }

    pub fn as_bytes(&self) -> &[u8; ED25519_SIGNATURE_LENGTH] {
        &self.bytes
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    pub fn from_hex(text: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(text).map_err(|_| KeyError::MalformedHex)?;
        Self::try_from_slice(&bytes)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        write!(f, "Signature({}..{})", &hex_str[..8], &hex_str[120..])
    }
}
