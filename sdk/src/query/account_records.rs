//! The account-records query: ask a node for the recent transaction
//! records of one account.

use serde::{Deserialize, Serialize};

use crate::query::header::QueryHeader;
use crate::schema::{self, SchemaViolation};
use crate::transaction::codec::{decode_account_id, encode_account_id};
use crate::transaction::types::AccountId;
use crate::wire::{self, EncodingError, WireReader, WireWriter};

/// Request for the recent records of `account_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecordsQuery {
    pub account_id: AccountId,
    pub header: QueryHeader,
}

impl AccountRecordsQuery {
    /// A query for `account_id` with the default answer-only header.
    pub fn new(account_id: AccountId) -> Self {
        Self { account_id, header: QueryHeader::default() }
    }

    /// Overrides the requested response type.
    pub fn with_header(mut self, header: QueryHeader) -> Self {
        self.header = header;
        self
    }

    /// Encodes the query to canonical wire bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SchemaViolation> {
        if !self.account_id.is_well_formed() {
            return Err(SchemaViolation::InvalidValue {
                message: "AccountRecordsQuery",
                field: "accountId",
                reason: format!("components must be non-negative, got {}", self.account_id),
            });
        }
        let mut w = WireWriter::new();
        w.message(1, &self.header.encode());
        w.message(2, &encode_account_id(&self.account_id));
        Ok(w.into_bytes())
    }

    /// The hex transport form of the query.
    pub fn to_hex(&self) -> Result<String, SchemaViolation> {
        Ok(wire::to_hex(&self.to_bytes()?))
    }

    /// Decodes a query from canonical wire bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncodingError> {
        let mut r = WireReader::new(bytes);
        let mut header = None;
        let mut account_id = None;
        while !r.is_empty() {
            let (field, wt) = r.read_tag()?;
            schema::ACCOUNT_RECORDS_QUERY.check(field, wt)?;
            match field {
                1 => header = Some(QueryHeader::decode(r.read_length_delimited()?)?),
                2 => account_id = Some(decode_account_id(r.read_length_delimited()?)?),
                _ => {
                    return Err(EncodingError::UnknownField {
                        message: "AccountRecordsQuery",
                        field,
                    })
                }
            }
        }
        Ok(Self {
            header: header.ok_or(EncodingError::MissingField {
                message: "AccountRecordsQuery",
                field: "header",
            })?,
            account_id: account_id.ok_or(EncodingError::MissingField {
                message: "AccountRecordsQuery",
                field: "accountId",
            })?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::header::ResponseType;

    #[test]
    fn query_roundtrip() {
        let query = AccountRecordsQuery::new(AccountId::from_num(1001));
        let bytes = query.to_bytes().unwrap();
        assert_eq!(AccountRecordsQuery::from_bytes(&bytes).unwrap(), query);
    }

    #[test]
    fn query_roundtrip_with_cost_answer() {
        let query = AccountRecordsQuery::new(AccountId::from_num(1001))
            .with_header(QueryHeader { response_type: ResponseType::CostAnswer });
        let bytes = query.to_bytes().unwrap();
        assert_eq!(AccountRecordsQuery::from_bytes(&bytes).unwrap(), query);
    }

    #[test]
    fn hex_form_roundtrip() {
        let query = AccountRecordsQuery::new(AccountId::new(1, 2, 3));
        let hex_form = query.to_hex().unwrap();
        let bytes = wire::from_hex(&hex_form).unwrap();
        assert_eq!(AccountRecordsQuery::from_bytes(&bytes).unwrap(), query);
    }

    #[test]
    fn malformed_account_is_rejected_before_encoding() {
        let query = AccountRecordsQuery::new(AccountId::new(0, 0, -1));
        assert!(matches!(
            query.to_bytes(),
            Err(SchemaViolation::InvalidValue { message: "AccountRecordsQuery", .. })
        ));
    }

    #[test]
    fn decode_requires_both_fields() {
        // Header alone, no account.
        let mut w = WireWriter::new();
        w.message(1, &QueryHeader::default().encode());
        assert_eq!(
            AccountRecordsQuery::from_bytes(&w.into_bytes()),
            Err(EncodingError::MissingField {
                message: "AccountRecordsQuery",
                field: "accountId"
            })
        );
    }

    #[test]
    fn decode_rejects_unknown_fields() {
        let mut w = WireWriter::new();
        w.uint64(5, 1);
        assert_eq!(
            AccountRecordsQuery::from_bytes(&w.into_bytes()),
            Err(EncodingError::UnknownField { message: "AccountRecordsQuery", field: 5 })
        );
    }
}
