//! # Wire Schema Registry
//!
//! Static descriptors for every message the SDK puts on (or takes off)
//! the wire. The registry is plain `'static` data: built into the
//! binary, immutable, shared freely across threads, consulted on both
//! the encode and decode paths.
//!
//! The encode path validates values against the schema's constraints
//! before a single byte is written ([`SchemaViolation`]). The decode
//! path uses [`MessageDescriptor::check`] to reject unknown fields and
//! wire-type mismatches outright. Both directions being strict is what
//! makes the encoding canonical: there is no byte sequence the decoder
//! accepts that the encoder would not itself produce.

use thiserror::Error;

use crate::wire::{EncodingError, WireType};

/// A value failed schema validation before encoding.
///
/// These indicate caller mistakes or corrupted input, not transient
/// conditions. Nothing in the SDK retries them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaViolation {
    /// A required field has no value.
    #[error("{message} is missing required field {field}")]
    MissingField {
        message: &'static str,
        field: &'static str,
    },

    /// A field is present but its value is outside what the schema
    /// allows.
    #[error("{message}.{field} is invalid: {reason}")]
    InvalidValue {
        message: &'static str,
        field: &'static str,
        reason: String,
    },
}

/// How many times a field may appear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Required,
    Optional,
    Repeated,
}

/// One field of a wire message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub number: u32,
    pub name: &'static str,
    pub wire_type: WireType,
    pub label: Label,
}

/// A wire message: its name and its complete field set.
#[derive(Debug)]
pub struct MessageDescriptor {
    pub name: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl MessageDescriptor {
    /// Looks up a field by number.
    pub fn field(&self, number: u32) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|f| f.number == number)
    }

    /// Decode-side gate: the field must exist in this message and must
    /// arrive with the wire type the schema declares.
    pub fn check(
        &'static self,
        number: u32,
        actual: WireType,
    ) -> Result<&'static FieldDescriptor, EncodingError> {
        let field = self.field(number).ok_or(EncodingError::UnknownField {
            message: self.name,
            field: number,
        })?;
        if field.wire_type != actual {
            return Err(EncodingError::WireTypeMismatch {
                message: self.name,
                field: field.name,
                expected: field.wire_type,
                actual,
            });
        }
        Ok(field)
    }
}

const fn varint(number: u32, name: &'static str, label: Label) -> FieldDescriptor {
    FieldDescriptor { number, name, wire_type: WireType::Varint, label }
}

const fn delimited(number: u32, name: &'static str, label: Label) -> FieldDescriptor {
    FieldDescriptor { number, name, wire_type: WireType::LengthDelimited, label }
}

/// `AccountId`: shard / realm / account number triplet.
pub static ACCOUNT_ID: MessageDescriptor = MessageDescriptor {
    name: "AccountId",
    fields: &[
        varint(1, "shardNum", Label::Optional),
        varint(2, "realmNum", Label::Optional),
        varint(3, "accountNum", Label::Optional),
    ],
};

/// `Timestamp`: seconds since the epoch plus a nanosecond remainder.
pub static TIMESTAMP: MessageDescriptor = MessageDescriptor {
    name: "Timestamp",
    fields: &[
        varint(1, "seconds", Label::Optional),
        varint(2, "nanos", Label::Optional),
    ],
};

/// `Duration`: a span in whole seconds.
pub static DURATION: MessageDescriptor = MessageDescriptor {
    name: "Duration",
    fields: &[varint(1, "seconds", Label::Optional)],
};

/// `TransactionId`: payer account plus the start of the validity
/// window. Together they identify a transaction network-wide.
pub static TRANSACTION_ID: MessageDescriptor = MessageDescriptor {
    name: "TransactionId",
    fields: &[
        delimited(1, "validStart", Label::Required),
        delimited(2, "accountId", Label::Required),
    ],
};

/// `AccountAmount`: one leg of a transfer. Amounts are zigzag-encoded
/// because debits are negative.
pub static ACCOUNT_AMOUNT: MessageDescriptor = MessageDescriptor {
    name: "AccountAmount",
    fields: &[
        delimited(1, "accountId", Label::Required),
        varint(2, "amount", Label::Optional),
    ],
};

/// `TransferList`: the legs of a crypto transfer.
pub static TRANSFER_LIST: MessageDescriptor = MessageDescriptor {
    name: "TransferList",
    fields: &[delimited(1, "accountAmounts", Label::Repeated)],
};

/// `CryptoTransfer`: the transfer operation payload.
pub static CRYPTO_TRANSFER: MessageDescriptor = MessageDescriptor {
    name: "CryptoTransfer",
    fields: &[delimited(1, "transfers", Label::Required)],
};

/// `TransactionBody`: everything a signature covers.
///
/// Field 14 is where operation payloads start in the network schema;
/// the gap between 6 and 14 is reserved by the network for body-level
/// fields and must stay unused here.
pub static TRANSACTION_BODY: MessageDescriptor = MessageDescriptor {
    name: "TransactionBody",
    fields: &[
        delimited(1, "transactionId", Label::Required),
        delimited(2, "nodeAccountId", Label::Required),
        varint(3, "fee", Label::Optional),
        delimited(4, "validDuration", Label::Required),
        delimited(6, "memo", Label::Optional),
        delimited(14, "cryptoTransfer", Label::Optional),
    ],
};

/// `SignaturePair`: a public-key prefix and the signature made by the
/// matching private key. Field 2 is reserved for a legacy contract
/// signature form the network no longer issues.
pub static SIGNATURE_PAIR: MessageDescriptor = MessageDescriptor {
    name: "SignaturePair",
    fields: &[
        delimited(1, "publicKeyPrefix", Label::Optional),
        delimited(3, "ed25519", Label::Required),
    ],
};

/// `SignatureMap`: ordered signature pairs.
pub static SIGNATURE_MAP: MessageDescriptor = MessageDescriptor {
    name: "SignatureMap",
    fields: &[delimited(1, "sigPair", Label::Repeated)],
};

/// `Transaction`: the envelope, body plus signature map. Field 2 is
/// reserved for the retired signature-list form.
pub static TRANSACTION: MessageDescriptor = MessageDescriptor {
    name: "Transaction",
    fields: &[
        delimited(1, "body", Label::Required),
        delimited(3, "sigMap", Label::Optional),
    ],
};

/// `QueryHeader`: per-query options. Field 1 is reserved for the query
/// payment transaction, which this SDK does not attach.
pub static QUERY_HEADER: MessageDescriptor = MessageDescriptor {
    name: "QueryHeader",
    fields: &[varint(2, "responseType", Label::Optional)],
};

/// `AccountRecordsQuery`: request for the recent records of an account.
pub static ACCOUNT_RECORDS_QUERY: MessageDescriptor = MessageDescriptor {
    name: "AccountRecordsQuery",
    fields: &[
        delimited(1, "header", Label::Required),
        delimited(2, "accountId", Label::Required),
    ],
};

/// `ResponseHeader`: the part of every query response the SDK
/// interprets.
pub static RESPONSE_HEADER: MessageDescriptor = MessageDescriptor {
    name: "ResponseHeader",
    fields: &[
        varint(1, "precheckCode", Label::Optional),
        varint(2, "responseType", Label::Optional),
        varint(3, "cost", Label::Optional),
    ],
};

/// Every message descriptor the SDK knows, for integrity checks and
/// tooling. Order matches declaration order above.
pub fn registry() -> &'static [&'static MessageDescriptor] {
    static REGISTRY: &[&MessageDescriptor] = &[
        &ACCOUNT_ID,
        &TIMESTAMP,
        &DURATION,
        &TRANSACTION_ID,
        &ACCOUNT_AMOUNT,
        &TRANSFER_LIST,
        &CRYPTO_TRANSFER,
        &TRANSACTION_BODY,
        &SIGNATURE_PAIR,
        &SIGNATURE_MAP,
        &TRANSACTION,
        &QUERY_HEADER,
        &ACCOUNT_RECORDS_QUERY,
        &RESPONSE_HEADER,
    ];
    REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn message_names_are_unique() {
        let mut seen = HashSet::new();
        for message in registry() {
            assert!(seen.insert(message.name), "duplicate message {}", message.name);
        }
    }

    #[test]
    fn field_numbers_are_unique_within_each_message() {
        for message in registry() {
            let mut seen = HashSet::new();
            for field in message.fields {
                assert!(
                    seen.insert(field.number),
                    "{} declares field {} twice",
                    message.name,
                    field.number
                );
                assert!(field.number > 0);
            }
        }
    }

    #[test]
    fn field_names_are_unique_within_each_message() {
        for message in registry() {
            let mut seen = HashSet::new();
            for field in message.fields {
                assert!(seen.insert(field.name));
            }
        }
    }

    #[test]
    fn check_accepts_a_declared_field() {
        let field = TRANSACTION_BODY
            .check(3, WireType::Varint)
            .expect("fee is a varint field");
        assert_eq!(field.name, "fee");
    }

    #[test]
    fn check_rejects_unknown_fields() {
        assert_eq!(
            TRANSACTION_BODY.check(9, WireType::Varint),
            Err(EncodingError::UnknownField { message: "TransactionBody", field: 9 })
        );
    }

    #[test]
    fn check_rejects_wire_type_mismatches() {
        assert!(matches!(
            TRANSACTION_BODY.check(3, WireType::LengthDelimited),
            Err(EncodingError::WireTypeMismatch { message: "TransactionBody", field: "fee", .. })
        ));
    }

    #[test]
    fn body_required_fields_match_the_wire_contract() {
        let required: Vec<&str> = TRANSACTION_BODY
            .fields
            .iter()
            .filter(|f| f.label == Label::Required)
            .map(|f| f.name)
            .collect();
        assert_eq!(required, ["transactionId", "nodeAccountId", "validDuration"]);
    }

    #[test]
    fn repeated_fields_are_only_where_lists_live() {
        for message in registry() {
            for field in message.fields {
                if field.label == Label::Repeated {
                    assert!(
                        matches!(message.name, "TransferList" | "SignatureMap"),
                        "{}.{} is unexpectedly repeated",
                        message.name,
                        field.name
                    );
                }
            }
        }
    }

    #[test]
    fn reserved_gaps_stay_reserved() {
        // Fields 5 and 7..=13 of the body belong to the network.
        for number in [5u32, 7, 8, 9, 10, 11, 12, 13] {
            assert!(TRANSACTION_BODY.field(number).is_none());
        }
        // Envelope field 2 (legacy signature list) likewise.
        assert!(TRANSACTION.field(2).is_none());
        // Query header field 1 (query payment) likewise.
        assert!(QUERY_HEADER.field(1).is_none());
    }
}
