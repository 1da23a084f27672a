//! Query and response headers.
//!
//! Every query carries a [`QueryHeader`] saying what kind of answer the
//! caller wants, and every response opens with a [`ResponseHeader`]
//! carrying the precheck code, the response type actually served, and
//! the query cost.

use serde::{Deserialize, Serialize};

use crate::response::{interpret, PrecheckOutcome};
use crate::schema;
use crate::wire::{EncodingError, WireReader, WireWriter};

/// What kind of answer a query requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResponseType {
    /// Just the answer.
    #[default]
    AnswerOnly,
    /// The answer plus a state proof.
    AnswerStateProof,
    /// Only the cost of asking.
    CostAnswer,
    /// The cost of asking with a state proof attached.
    CostAnswerStateProof,
}

impl ResponseType {
    /// The wire value of this response type.
    pub fn code(self) -> u32 {
        match self {
            Self::AnswerOnly => 0,
            Self::AnswerStateProof => 1,
            Self::CostAnswer => 2,
            Self::CostAnswerStateProof => 3,
        }
    }

    /// Parses a wire value. Unknown values are `None`; the decoder
    /// turns that into a range error rather than guessing.
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(Self::AnswerOnly),
            1 => Some(Self::AnswerStateProof),
            2 => Some(Self::CostAnswer),
            3 => Some(Self::CostAnswerStateProof),
            _ => None,
        }
    }
}

/// Per-query options sent to the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryHeader {
    pub response_type: ResponseType,
}

impl QueryHeader {
    pub(crate) fn encode(&self) -> Vec<u8> {
        let mut w = WireWriter::new();
        w.uint64(2, u64::from(self.response_type.code()));
        w.into_bytes()
    }

    pub(crate) fn decode(bytes: &[u8]) -> Result<Self, EncodingError> {
        let mut r = WireReader::new(bytes);
        let mut header = Self::default();
        while !r.is_empty() {
            let (field, wt) = r.read_tag()?;
            schema::QUERY_HEADER.check(field, wt)?;
            match field {
                2 => {
                    let value = r.read_varint()?;
                    header.response_type = ResponseType::from_code(value).ok_or(
                        EncodingError::ValueOutOfRange {
                            message: "QueryHeader",
                            field: "responseType",
                            value,
                        },
                    )?;
                }
                _ => return Err(EncodingError::UnknownField { message: "QueryHeader", field }),
            }
        }
        Ok(header)
    }
}

/// The opening section of every query response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResponseHeader {
    /// Precheck status for the query itself. Zero (or an omitted
    /// field, which decodes to zero) means the node answered.
    pub precheck_code: u32,
    /// The response type the node actually served.
    pub response_type: ResponseType,
    /// What the query cost, in motes.
    pub cost: u64,
}

impl ResponseHeader {
    /// Decodes a response header from wire bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, EncodingError> {
        let mut r = WireReader::new(bytes);
        let mut header = Self::default();
        while !r.is_empty() {
            let (field, wt) = r.read_tag()?;
            schema::RESPONSE_HEADER.check(field, wt)?;
            match field {
                1 => {
                    let value = r.read_varint()?;
                    header.precheck_code =
                        u32::try_from(value).map_err(|_| EncodingError::ValueOutOfRange {
                            message: "ResponseHeader",
                            field: "precheckCode",
                            value,
                        })?;
                }
                2 => {
                    let value = r.read_varint()?;
                    header.response_type = ResponseType::from_code(value).ok_or(
                        EncodingError::ValueOutOfRange {
                            message: "ResponseHeader",
                            field: "responseType",
                            value,
                        },
                    )?;
                }
                3 => header.cost = r.read_varint()?,
                _ => return Err(EncodingError::UnknownField { message: "ResponseHeader", field }),
            }
        }
        Ok(header)
    }

    /// Interprets the header's precheck code through the shared
    /// code→reason table.
    pub fn outcome(&self) -> PrecheckOutcome {
        interpret(Some(self.precheck_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_type_codes_roundtrip() {
        for rt in [
            ResponseType::AnswerOnly,
            ResponseType::AnswerStateProof,
            ResponseType::CostAnswer,
            ResponseType::CostAnswerStateProof,
        ] {
            assert_eq!(ResponseType::from_code(u64::from(rt.code())), Some(rt));
        }
        assert_eq!(ResponseType::from_code(4), None);
    }

    #[test]
    fn default_header_encodes_to_nothing() {
        // AnswerOnly is the zero value, so the field is omitted.
        assert!(QueryHeader::default().encode().is_empty());
        assert_eq!(QueryHeader::decode(&[]).unwrap(), QueryHeader::default());
    }

    #[test]
    fn header_roundtrip() {
        let header = QueryHeader { response_type: ResponseType::CostAnswer };
        assert_eq!(QueryHeader::decode(&header.encode()).unwrap(), header);
    }

    #[test]
    fn header_rejects_unknown_response_type() {
        let mut w = WireWriter::new();
        w.uint64(2, 9);
        assert_eq!(
            QueryHeader::decode(&w.into_bytes()),
            Err(EncodingError::ValueOutOfRange {
                message: "QueryHeader",
                field: "responseType",
                value: 9
            })
        );
    }

    #[test]
    fn response_header_decodes_all_fields() {
        let mut w = WireWriter::new();
        w.uint64(1, 7);
        w.uint64(2, 1);
        w.uint64(3, 25);
        let header = ResponseHeader::decode(&w.into_bytes()).unwrap();
        assert_eq!(header.precheck_code, 7);
        assert_eq!(header.response_type, ResponseType::AnswerStateProof);
        assert_eq!(header.cost, 25);
    }

    #[test]
    fn empty_response_header_is_success() {
        let header = ResponseHeader::decode(&[]).unwrap();
        assert_eq!(header.precheck_code, 0);
        assert!(header.outcome().is_ok());
    }

    #[test]
    fn rejected_header_surfaces_the_reason() {
        let mut w = WireWriter::new();
        w.uint64(1, 7);
        let header = ResponseHeader::decode(&w.into_bytes()).unwrap();
        let outcome = header.outcome();
        assert!(outcome.is_rejected());
        assert_eq!(
            outcome.into_result().unwrap_err().reason,
            "transaction signature is invalid"
        );
    }

    #[test]
    fn response_header_rejects_oversized_precheck_code() {
        let mut w = WireWriter::new();
        w.uint64(1, u64::from(u32::MAX) + 1);
        assert!(matches!(
            ResponseHeader::decode(&w.into_bytes()),
            Err(EncodingError::ValueOutOfRange { field: "precheckCode", .. })
        ));
    }
}
