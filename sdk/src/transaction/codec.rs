//! Canonical encoding of transaction bodies and envelopes.
//!
//! This module is the bridge between the typed structs in this crate
//! and the network's wire messages. Encoding is validate-then-write:
//! a body or envelope is checked against the schema before the first
//! byte goes out, so a [`SchemaViolation`] can never leave half a
//! message behind. Decoding is the mirror image: strict field-by-field
//! reads against the same schema, with every malformed input reported
//! as an [`EncodingError`] instead of a partially populated value.
//!
//! Determinism is the load-bearing property. The signature over a body
//! is a signature over `encode_body(body)`, and the envelope embeds the
//! body by re-encoding it, so "same logical body, same bytes" is what
//! keeps attached signatures verifiable. Field emission order is fixed
//! (ascending field number), scalar defaults are omitted, and there is
//! no map or set anywhere in the encoding path to introduce iteration
//! order.

use crate::config::MAX_TRANSACTION_BYTES;
use crate::schema::{self, SchemaViolation};
use crate::transaction::body::{AccountAmount, Operation, TransactionBody, TransferList};
use crate::transaction::envelope::{SignaturePair, TransactionEnvelope};
use crate::transaction::types::{AccountId, Timestamp, TransactionId, ValidDuration};
use crate::wire::{self, EncodingError, WireReader, WireWriter};

// ---------------------------------------------------------------------------
// Leaf messages
// ---------------------------------------------------------------------------

pub(crate) fn encode_account_id(id: &AccountId) -> Vec<u8> {
    let mut w = WireWriter::new();
    w.int64(1, id.shard);
    w.int64(2, id.realm);
    w.int64(3, id.num);
    w.into_bytes()
}

pub(crate) fn decode_account_id(bytes: &[u8]) -> Result<AccountId, EncodingError> {
    let mut r = WireReader::new(bytes);
    let mut id = AccountId::new(0, 0, 0);
    while !r.is_empty() {
        let (field, wt) = r.read_tag()?;
        schema::ACCOUNT_ID.check(field, wt)?;
        let value = r.read_varint()? as i64;
        match field {
            1 => id.shard = value,
            2 => id.realm = value,
            3 => id.num = value,
            _ => return Err(EncodingError::UnknownField { message: "AccountId", field }),
        }
    }
    Ok(id)
}

fn encode_timestamp(ts: &Timestamp) -> Vec<u8> {
    let mut w = WireWriter::new();
    w.int64(1, ts.seconds);
    w.int32(2, ts.nanos);
    w.into_bytes()
}

fn decode_timestamp(bytes: &[u8]) -> Result<Timestamp, EncodingError> {
    let mut r = WireReader::new(bytes);
    let mut ts = Timestamp::new(0, 0);
    while !r.is_empty() {
        let (field, wt) = r.read_tag()?;
        schema::TIMESTAMP.check(field, wt)?;
        let value = r.read_varint()?;
        match field {
            1 => ts.seconds = value as i64,
            2 => {
                ts.nanos = i32::try_from(value).map_err(|_| EncodingError::ValueOutOfRange {
                    message: "Timestamp",
                    field: "nanos",
                    value,
                })?;
            }
            _ => return Err(EncodingError::UnknownField { message: "Timestamp", field }),
        }
    }
    Ok(ts)
}

fn encode_duration(duration: &ValidDuration) -> Vec<u8> {
    let mut w = WireWriter::new();
    w.int64(1, duration.seconds);
    w.into_bytes()
}

fn decode_duration(bytes: &[u8]) -> Result<ValidDuration, EncodingError> {
    let mut r = WireReader::new(bytes);
    let mut duration = ValidDuration::from_seconds(0);
    while !r.is_empty() {
        let (field, wt) = r.read_tag()?;
        schema::DURATION.check(field, wt)?;
        match field {
            1 => duration.seconds = r.read_varint()? as i64,
            _ => return Err(EncodingError::UnknownField { message: "Duration", field }),
        }
    }
    Ok(duration)
}

fn encode_transaction_id(id: &TransactionId) -> Vec<u8> {
    let mut w = WireWriter::new();
    w.message(1, &encode_timestamp(&id.valid_start));
    w.message(2, &encode_account_id(&id.account_id));
    w.into_bytes()
}

fn decode_transaction_id(bytes: &[u8]) -> Result<TransactionId, EncodingError> {
    let mut r = WireReader::new(bytes);
    let mut valid_start = None;
    let mut account_id = None;
    while !r.is_empty() {
        let (field, wt) = r.read_tag()?;
        schema::TRANSACTION_ID.check(field, wt)?;
        match field {
            1 => valid_start = Some(decode_timestamp(r.read_length_delimited()?)?),
            2 => account_id = Some(decode_account_id(r.read_length_delimited()?)?),
            _ => return Err(EncodingError::UnknownField { message: "TransactionId", field }),
        }
    }
    Ok(TransactionId {
        valid_start: valid_start.ok_or(EncodingError::MissingField {
            message: "TransactionId",
            field: "validStart",
        })?,
        account_id: account_id.ok_or(EncodingError::MissingField {
            message: "TransactionId",
            field: "accountId",
        })?,
    })
}

// ---------------------------------------------------------------------------
// Operation payload
// ---------------------------------------------------------------------------

fn encode_account_amount(leg: &AccountAmount) -> Vec<u8> {
    let mut w = WireWriter::new();
    w.message(1, &encode_account_id(&leg.account_id));
    w.sint64(2, leg.amount);
    w.into_bytes()
}

fn decode_account_amount(bytes: &[u8]) -> Result<AccountAmount, EncodingError> {
    let mut r = WireReader::new(bytes);
    let mut account_id = None;
    let mut amount = 0i64;
    while !r.is_empty() {
        let (field, wt) = r.read_tag()?;
        schema::ACCOUNT_AMOUNT.check(field, wt)?;
        match field {
            1 => account_id = Some(decode_account_id(r.read_length_delimited()?)?),
            2 => amount = wire::zigzag_decode(r.read_varint()?),
            _ => return Err(EncodingError::UnknownField { message: "AccountAmount", field }),
        }
    }
    Ok(AccountAmount {
        account_id: account_id.ok_or(EncodingError::MissingField {
            message: "AccountAmount",
            field: "accountId",
        })?,
        amount,
    })
}

fn encode_transfer_list(list: &TransferList) -> Vec<u8> {
    let mut w = WireWriter::new();
    for leg in &list.transfers {
        w.message(1, &encode_account_amount(leg));
    }
    w.into_bytes()
}

fn decode_transfer_list(bytes: &[u8]) -> Result<TransferList, EncodingError> {
    let mut r = WireReader::new(bytes);
    let mut list = TransferList::default();
    while !r.is_empty() {
        let (field, wt) = r.read_tag()?;
        schema::TRANSFER_LIST.check(field, wt)?;
        match field {
            1 => list.transfers.push(decode_account_amount(r.read_length_delimited()?)?),
            _ => return Err(EncodingError::UnknownField { message: "TransferList", field }),
        }
    }
    Ok(list)
}

fn encode_crypto_transfer(list: &TransferList) -> Vec<u8> {
    let mut w = WireWriter::new();
    w.message(1, &encode_transfer_list(list));
    w.into_bytes()
}

fn decode_crypto_transfer(bytes: &[u8]) -> Result<TransferList, EncodingError> {
    let mut r = WireReader::new(bytes);
    let mut transfers = None;
    while !r.is_empty() {
        let (field, wt) = r.read_tag()?;
        schema::CRYPTO_TRANSFER.check(field, wt)?;
        match field {
            1 => transfers = Some(decode_transfer_list(r.read_length_delimited()?)?),
            _ => return Err(EncodingError::UnknownField { message: "CryptoTransfer", field }),
        }
    }
    transfers.ok_or(EncodingError::MissingField {
        message: "CryptoTransfer",
        field: "transfers",
    })
}

// ---------------------------------------------------------------------------
// TransactionBody
// ---------------------------------------------------------------------------

/// Canonically encodes a transaction body. These are the bytes a
/// signature covers.
pub fn encode_body(body: &TransactionBody) -> Result<Vec<u8>, SchemaViolation> {
    body.validate()?;

    let mut w = WireWriter::with_capacity(128);
    w.message(1, &encode_transaction_id(body.transaction_id()));
    w.message(2, &encode_account_id(body.node_account_id()));
    w.uint64(3, body.fee());
    w.message(4, &encode_duration(&body.valid_duration()));
    if let Some(memo) = body.memo() {
        w.string(6, memo);
    }
    if let Some(Operation::CryptoTransfer(list)) = body.operation() {
        w.message(14, &encode_crypto_transfer(list));
    }
    Ok(w.into_bytes())
}

/// Decodes and re-validates a transaction body.
pub fn decode_body(bytes: &[u8]) -> Result<TransactionBody, EncodingError> {
    let mut r = WireReader::new(bytes);
    let mut transaction_id = None;
    let mut node_account_id = None;
    let mut fee = 0u64;
    let mut valid_duration = None;
    let mut memo = None;
    let mut operation = None;

    while !r.is_empty() {
        let (field, wt) = r.read_tag()?;
        schema::TRANSACTION_BODY.check(field, wt)?;
        match field {
            1 => transaction_id = Some(decode_transaction_id(r.read_length_delimited()?)?),
            2 => node_account_id = Some(decode_account_id(r.read_length_delimited()?)?),
            3 => fee = r.read_varint()?,
            4 => valid_duration = Some(decode_duration(r.read_length_delimited()?)?),
            6 => {
                let raw = r.read_length_delimited()?;
                let text = std::str::from_utf8(raw).map_err(|_| EncodingError::InvalidUtf8 {
                    message: "TransactionBody",
                    field: "memo",
                })?;
                memo = if text.is_empty() { None } else { Some(text.to_string()) };
            }
            14 => {
                let list = decode_crypto_transfer(r.read_length_delimited()?)?;
                operation = Some(Operation::CryptoTransfer(list));
            }
            _ => return Err(EncodingError::UnknownField { message: "TransactionBody", field }),
        }
    }

    let body = TransactionBody::from_parts(
        transaction_id.ok_or(EncodingError::MissingField {
            message: "TransactionBody",
            field: "transactionId",
        })?,
        node_account_id.ok_or(EncodingError::MissingField {
            message: "TransactionBody",
            field: "nodeAccountId",
        })?,
        fee,
        valid_duration.ok_or(EncodingError::MissingField {
            message: "TransactionBody",
            field: "validDuration",
        })?,
        memo,
        operation,
    );
    body.validate()?;
    Ok(body)
}

// ---------------------------------------------------------------------------
// Signature map
// ---------------------------------------------------------------------------

fn validate_signature_pair(pair: &SignaturePair) -> Result<(), SchemaViolation> {
    if pair.public_key_prefix.is_empty() {
        return Err(SchemaViolation::MissingField {
            message: "SignaturePair",
            field: "publicKeyPrefix",
        });
    }
    if pair.signature.len() != crate::config::ED25519_SIGNATURE_LENGTH {
        return Err(SchemaViolation::InvalidValue {
            message: "SignaturePair",
            field: "ed25519",
            reason: format!("expected 64 bytes, got {}", pair.signature.len()),
        });
    }
    Ok(())
}

fn encode_signature_pair(pair: &SignaturePair) -> Vec<u8> {
    let mut w = WireWriter::new();
    w.bytes(1, &pair.public_key_prefix);
    w.bytes(3, &pair.signature);
    w.into_bytes()
}

fn decode_signature_pair(bytes: &[u8]) -> Result<SignaturePair, EncodingError> {
    let mut r = WireReader::new(bytes);
    let mut prefix = Vec::new();
    let mut signature = None;
    while !r.is_empty() {
        let (field, wt) = r.read_tag()?;
        schema::SIGNATURE_PAIR.check(field, wt)?;
        match field {
            1 => prefix = r.read_length_delimited()?.to_vec(),
            3 => signature = Some(r.read_length_delimited()?.to_vec()),
            _ => return Err(EncodingError::UnknownField { message: "SignaturePair", field }),
        }
    }
    let pair = SignaturePair {
        public_key_prefix: prefix,
        signature: signature.ok_or(EncodingError::MissingField {
            message: "SignaturePair",
            field: "ed25519",
        })?,
    };
    validate_signature_pair(&pair)?;
    Ok(pair)
}

fn encode_signature_map(pairs: &[SignaturePair]) -> Vec<u8> {
    let mut w = WireWriter::new();
    for pair in pairs {
        w.message(1, &encode_signature_pair(pair));
    }
    w.into_bytes()
}

fn decode_signature_map(bytes: &[u8]) -> Result<Vec<SignaturePair>, EncodingError> {
    let mut r = WireReader::new(bytes);
    let mut pairs = Vec::new();
    while !r.is_empty() {
        let (field, wt) = r.read_tag()?;
        schema::SIGNATURE_MAP.check(field, wt)?;
        match field {
            1 => pairs.push(decode_signature_pair(r.read_length_delimited()?)?),
            _ => return Err(EncodingError::UnknownField { message: "SignatureMap", field }),
        }
    }
    Ok(pairs)
}

// ---------------------------------------------------------------------------
// TransactionEnvelope
// ---------------------------------------------------------------------------

/// Canonically encodes a transaction envelope. The embedded body bytes
/// are produced by [`encode_body`], the same function whose output was
/// signed, so the two can never drift apart.
pub fn encode_envelope(envelope: &TransactionEnvelope) -> Result<Vec<u8>, SchemaViolation> {
    let body = envelope.body().ok_or(SchemaViolation::MissingField {
        message: "Transaction",
        field: "body",
    })?;
    for pair in envelope.signature_map() {
        validate_signature_pair(pair)?;
    }

    let mut w = WireWriter::with_capacity(256);
    w.message(1, &encode_body(body)?);
    if !envelope.signature_map().is_empty() {
        w.message(3, &encode_signature_map(envelope.signature_map()));
    }

    let out = w.into_bytes();
    if out.len() > MAX_TRANSACTION_BYTES {
        return Err(SchemaViolation::InvalidValue {
            message: "Transaction",
            field: "body",
            reason: format!(
                "{} bytes exceeds the {MAX_TRANSACTION_BYTES}-byte transaction limit",
                out.len()
            ),
        });
    }
    tracing::trace!(bytes = out.len(), signatures = envelope.signature_map().len(),
        "encoded transaction envelope");
    Ok(out)
}

/// Decodes and re-validates a transaction envelope.
pub fn decode_envelope(bytes: &[u8]) -> Result<TransactionEnvelope, EncodingError> {
    let mut r = WireReader::new(bytes);
    let mut body = None;
    let mut pairs = Vec::new();
    while !r.is_empty() {
        let (field, wt) = r.read_tag()?;
        schema::TRANSACTION.check(field, wt)?;
        match field {
            1 => body = Some(decode_body(r.read_length_delimited()?)?),
            3 => pairs = decode_signature_map(r.read_length_delimited()?)?,
            _ => return Err(EncodingError::UnknownField { message: "Transaction", field }),
        }
    }
    let body = body.ok_or(EncodingError::MissingField {
        message: "Transaction",
        field: "body",
    })?;
    Ok(TransactionEnvelope::from_decoded(body, pairs))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
