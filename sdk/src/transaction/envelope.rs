//! The transaction envelope: a body plus its signature map.
//!
//! An envelope starts unsigned, collects one [`SignaturePair`] per
//! signer, and is then serialized for transport. The API is
//! consume-and-return: [`TransactionEnvelope::attach_signature`] takes
//! the envelope by value and hands back the extended one. There is no
//! way to alter a body that already has signatures hanging off it, so
//! the invariant "signed bytes equal embedded bytes" holds by
//! construction rather than by discipline.
//!
//! Signature attachment order is preserved. The signature map is part
//! of the serialized transaction, and a multi-signature flow where
//! signer order wobbles produces envelopes that are byte-unequal for no
//! semantic reason.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::{KeyError, PrivateKey, PublicKey, Signature};
use crate::schema::SchemaViolation;
use crate::transaction::body::TransactionBody;
use crate::transaction::codec;
use crate::transaction::signing::sign_body;
use crate::transaction::types::TransactionId;
use crate::wire::{self, EncodingError};

/// One signer's entry in the signature map: the raw public-key prefix
/// and the 64-byte Ed25519 signature it vouches for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePair {
    pub public_key_prefix: Vec<u8>,
    pub signature: Vec<u8>,
}

/// Errors from envelope assembly.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    /// Signature attachment was attempted before a body exists.
    #[error("missing transaction body: build the transaction before adding signatures")]
    MissingBody,

    /// A body was offered to an envelope that already has one.
    #[error("transaction body is already set; replacing it would orphan existing signatures")]
    BodyAlreadySet,

    /// The body failed schema validation while being encoded for
    /// signing.
    #[error(transparent)]
    Schema(#[from] SchemaViolation),

    /// Key material could not be used.
    #[error(transparent)]
    Key(#[from] KeyError),
}

/// A transaction envelope.
///
/// Usually created directly from a finished body via
/// [`TransactionEnvelope::unsigned`]. The staged form (no body yet)
/// exists for flows that allocate the envelope before the body is
/// final; every signing operation on a staged envelope fails with
/// [`EnvelopeError::MissingBody`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransactionEnvelope {
    body: Option<TransactionBody>,
    signature_map: Vec<SignaturePair>,
}

impl TransactionEnvelope {
    /// An envelope around a finished body, with no signatures yet.
    pub fn unsigned(body: TransactionBody) -> Self {
        Self { body: Some(body), signature_map: Vec::new() }
    }

    /// An envelope with no body yet. Install one with
    /// [`TransactionEnvelope::with_body`] before signing.
    pub fn staged() -> Self {
        Self::default()
    }

    /// Installs the body into a staged envelope. Refused once a body is
    /// present: swapping bodies under an existing signature map would
    /// leave signatures that vouch for bytes no longer in the envelope.
    pub fn with_body(mut self, body: TransactionBody) -> Result<Self, EnvelopeError> {
        if self.body.is_some() {
            return Err(EnvelopeError::BodyAlreadySet);
        }
        self.body = Some(body);
        Ok(self)
    }

    pub fn body(&self) -> Option<&TransactionBody> {
        self.body.as_ref()
    }

    /// The signature pairs in attachment order.
    pub fn signature_map(&self) -> &[SignaturePair] {
        &self.signature_map
    }

    pub fn is_signed(&self) -> bool {
        !self.signature_map.is_empty()
    }

    /// The transaction's network-wide identity, once a body exists.
    pub fn transaction_id(&self) -> Option<&TransactionId> {
        self.body.as_ref().map(|b| b.transaction_id())
    }

    /// Appends one (publicKeyPrefix, signature) pair to the map.
    ///
    /// The caller vouches that `signature` was produced over this
    /// envelope's canonical body bytes by the private half of
    /// `public_key`; nothing here re-verifies it. Pairs accumulate in
    /// call order.
    pub fn attach_signature(
        mut self,
        signature: &Signature,
        public_key: &PublicKey,
    ) -> Result<Self, EnvelopeError> {
        if self.body.is_none() {
            return Err(EnvelopeError::MissingBody);
        }
        self.signature_map.push(SignaturePair {
            public_key_prefix: public_key.prefix().to_vec(),
            signature: signature.to_vec(),
        });
        tracing::debug!(signatures = self.signature_map.len(), "attached signature to envelope");
        Ok(self)
    }

    /// Encode the body, sign it, attach the result. One call per
    /// signer.
    ///
    /// Signing happens before the envelope is touched, so a schema or
    /// key failure leaves the envelope exactly as it was (it is
    /// returned inside the error-free path only).
    pub fn sign_and_attach(self, key: &PrivateKey) -> Result<Self, EnvelopeError> {
        let body = self.body.as_ref().ok_or(EnvelopeError::MissingBody)?;
        let signature = sign_body(body, key)?;
        let public_key = key.public_key();
        self.attach_signature(&signature, &public_key)
    }

    /// Serializes the envelope to canonical wire bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SchemaViolation> {
        codec::encode_envelope(self)
    }

    /// Serializes the envelope to its hex transport form.
    pub fn to_hex(&self) -> Result<String, SchemaViolation> {
        Ok(wire::to_hex(&self.to_bytes()?))
    }

    /// Decodes an envelope from canonical wire bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncodingError> {
        codec::decode_envelope(bytes)
    }

    /// Decodes an envelope from its hex transport form.
    pub fn from_hex(text: &str) -> Result<Self, EncodingError> {
        Self::from_bytes(&wire::from_hex(text)?)
    }

    /// Decoder-side constructor; the decode path has already validated
    /// the parts.
    pub(crate) fn from_decoded(body: TransactionBody, signature_map: Vec<SignaturePair>) -> Self {
        Self { body: Some(body), signature_map }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TX_FEE;
    use crate::transaction::body::TransactionBody;
    use crate::transaction::codec::encode_body;
    use crate::transaction::types::{AccountId, Timestamp};

    fn test_key() -> PrivateKey {
        PrivateKey::from_bytes(&[7u8; 32]).unwrap()
    }

    fn other_key() -> PrivateKey {
        PrivateKey::from_bytes(&[9u8; 32]).unwrap()
    }

    fn sample_body() -> TransactionBody {
        TransactionBody::builder(AccountId::from_num(2), AccountId::from_num(3))
            .valid_start(Timestamp::new(1_700_000_000, 42))
            .memo("test")
            .build()
    }

    #[test]
    fn fresh_envelope_is_unsigned() {
        let envelope = TransactionEnvelope::unsigned(sample_body());
        assert!(!envelope.is_signed());
        assert!(envelope.signature_map().is_empty());
    }

    #[test]
    fn staged_envelope_refuses_signatures() {
        let key = test_key();
        let signature = key.sign(b"anything");
        assert_eq!(
            TransactionEnvelope::staged().attach_signature(&signature, &key.public_key()),
            Err(EnvelopeError::MissingBody)
        );
        assert_eq!(
            TransactionEnvelope::staged().sign_and_attach(&key),
            Err(EnvelopeError::MissingBody)
        );
    }

    #[test]
    fn staged_envelope_accepts_one_body() {
        let envelope = TransactionEnvelope::staged().with_body(sample_body()).unwrap();
        assert!(envelope.body().is_some());
        assert_eq!(
            envelope.with_body(sample_body()),
            Err(EnvelopeError::BodyAlreadySet)
        );
    }

    #[test]
    fn attach_preserves_order() {
        let first = test_key();
        let second = other_key();
        let envelope = TransactionEnvelope::unsigned(sample_body())
            .sign_and_attach(&first)
            .unwrap()
            .sign_and_attach(&second)
            .unwrap();

        let map = envelope.signature_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map[0].public_key_prefix, first.public_key().prefix());
        assert_eq!(map[1].public_key_prefix, second.public_key().prefix());
    }

    #[test]
    fn sign_and_attach_signs_the_canonical_body_bytes() {
        let key = test_key();
        let body = sample_body();
        let envelope = TransactionEnvelope::unsigned(body.clone())
            .sign_and_attach(&key)
            .unwrap();

        let expected = key.sign(&encode_body(&body).unwrap());
        assert_eq!(envelope.signature_map()[0].signature, expected.to_vec());
    }

    #[test]
    fn sign_and_attach_fails_atomically_on_invalid_body() {
        let body = TransactionBody::builder(AccountId::from_num(2), AccountId::from_num(3))
            .valid_start(Timestamp::from_seconds(1))
            .valid_duration_seconds(0)
            .build();
        let result = TransactionEnvelope::unsigned(body).sign_and_attach(&test_key());
        assert!(matches!(result, Err(EnvelopeError::Schema(_))));
    }

    #[test]
    fn transaction_id_surfaces_from_the_body() {
        let envelope = TransactionEnvelope::unsigned(sample_body());
        assert_eq!(
            envelope.transaction_id().unwrap().account_id,
            AccountId::from_num(2)
        );
        assert!(TransactionEnvelope::staged().transaction_id().is_none());
    }

    #[test]
    fn hex_roundtrip() {
        let envelope = TransactionEnvelope::unsigned(sample_body())
            .sign_and_attach(&test_key())
            .unwrap();
        let hex_form = envelope.to_hex().unwrap();
        assert_eq!(TransactionEnvelope::from_hex(&hex_form).unwrap(), envelope);
    }

    #[test]
    fn from_hex_rejects_garbage() {
        assert!(TransactionEnvelope::from_hex("not hex").is_err());
        assert!(TransactionEnvelope::from_hex("abcd").is_err());
    }

    // The full submission pipeline: build, encode, sign, attach,
    // serialize, decode, verify.
    #[test]
    fn end_to_end_scenario() {
        let key = test_key();
        let body = TransactionBody::builder(AccountId::from_num(2), AccountId::from_num(3))
            .valid_start(Timestamp::new(1_700_000_000, 0))
            .fee(100_000_000)
            .valid_duration_seconds(120)
            .memo("test")
            .build();

        let envelope = TransactionEnvelope::unsigned(body.clone())
            .sign_and_attach(&key)
            .unwrap();
        let hex_form = envelope.to_hex().unwrap();

        let decoded = TransactionEnvelope::from_hex(&hex_form).unwrap();
        let decoded_body = decoded.body().unwrap();
        assert_eq!(decoded_body.fee(), 100_000_000);
        assert_eq!(decoded_body.valid_duration().seconds, 120);
        assert_eq!(decoded_body.memo(), Some("test"));
        assert_eq!(decoded_body, &body);

        let pair = &decoded.signature_map()[0];
        assert_eq!(pair.public_key_prefix, key.public_key().prefix());
        let signature = Signature::try_from_slice(&pair.signature).unwrap();
        let body_bytes = encode_body(decoded_body).unwrap();
        assert!(key.public_key().verify(&body_bytes, &signature));
    }

    #[test]
    fn default_fee_flows_through_the_pipeline() {
        let envelope = TransactionEnvelope::unsigned(sample_body());
        let decoded = TransactionEnvelope::from_hex(&envelope.to_hex().unwrap()).unwrap();
        assert_eq!(decoded.body().unwrap().fee(), DEFAULT_TX_FEE);
    }
}
