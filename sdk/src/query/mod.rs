//! # Query Module
//!
//! Wire shapes for read-only queries against a node. Queries share the
//! transaction stack's wire codec and schema registry but involve no
//! signing: a query is built, encoded, handed to the transport layer,
//! and the response header comes back through the same precheck
//! interpretation as transactions.
//!
//! Only the account-records query is implemented; record payloads
//! themselves are ledger data the SDK does not model.

pub mod account_records;
pub mod header;

pub use account_records::AccountRecordsQuery;
pub use header::{QueryHeader, ResponseHeader, ResponseType};
