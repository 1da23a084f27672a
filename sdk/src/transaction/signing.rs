//! Signing transaction bodies.
//!
//! Signing is a separate step from building because key material often
//! lives somewhere else (a wallet process, an operator config, an HSM
//! boundary). What gets signed is always the canonical encoding from
//! [`codec::encode_body`], never a re-derived or hand-assembled byte
//! string: the network verifies the signature against the body bytes
//! embedded in the envelope, and those come from the same encoder.

use thiserror::Error;

use crate::crypto::{KeyError, PrivateKey, Signature};
use crate::schema::SchemaViolation;
use crate::transaction::body::TransactionBody;
use crate::transaction::codec;

/// Errors from the compose-and-sign seams.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignError {
    /// The body failed schema validation, so there are no canonical
    /// bytes to sign.
    #[error(transparent)]
    Schema(#[from] SchemaViolation),

    /// The supplied key material was unusable.
    #[error(transparent)]
    Key(#[from] KeyError),
}

/// Canonically encodes `body` and signs the result.
pub fn sign_body(body: &TransactionBody, key: &PrivateKey) -> Result<Signature, SchemaViolation> {
    let body_bytes = codec::encode_body(body)?;
    Ok(key.sign(&body_bytes))
}

/// Like [`sign_body`], but takes the private key in its hex transport
/// form. The decoded key lives only for the duration of the call.
pub fn sign_body_hex(body: &TransactionBody, private_key_hex: &str) -> Result<Signature, SignError> {
    let key = PrivateKey::from_hex(private_key_hex)?;
    Ok(sign_body(body, &key)?)
}
